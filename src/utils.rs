//! Small text helpers shared by the projections and the painter.

/// Format a Pokémon `name` into a human-friendly form.
///
/// Examples: `mr-mime` -> `Mr Mime`, `ho_oh` -> `Ho Oh`.
pub fn format_name(name: &str) -> String {
    let replaced = name.replace('-', " ").replace('_', " ");
    let parts: Vec<String> = replaced
        .split_whitespace()
        .map(|w| {
            let mut chs = w.chars();
            match chs.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chs.as_str().to_lowercase()
                }
            }
        })
        .collect();
    parts.join(" ")
}

/// Uppercase the first character and leave the rest as is: `mr-mime` -> `Mr-mime`.
pub fn capitalize(s: &str) -> String {
    let mut chs = s.chars();
    match chs.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chs.as_str(),
    }
}

/// `#001`-style id label.
pub fn padded_id(id: u32) -> String {
    format!("#{:03}", id)
}

pub fn text_to_lines(s: &str, width: usize) -> Vec<String> {
    // Wrap text into lines no longer than `width` (simple greedy algorithm).
    let mut lines = vec![];
    let mut current = String::new();
    for word in s.split_whitespace() {
        if current.len() + word.len() + 1 > width && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
