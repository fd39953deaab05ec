//! Prefix filtering of the catalog by id text or by name.

use clap::ValueEnum;

use crate::models::CatalogEntry;

/// Which field the search text is matched against. At most one mode is
/// active; `None` leaves the catalog unfiltered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterMode {
    #[default]
    None,
    #[value(name = "number")]
    ByNumber,
    #[value(name = "name")]
    ByName,
}

impl FilterMode {
    pub fn label(self) -> &'static str {
        match self {
            FilterMode::None => "none",
            FilterMode::ByNumber => "number",
            FilterMode::ByName => "name",
        }
    }
}

/// `term_lower` must already be lowercased.
fn matches(entry: &CatalogEntry, term_lower: &str, mode: FilterMode) -> bool {
    match mode {
        FilterMode::None => true,
        FilterMode::ByNumber => entry
            .id()
            .map(|id| id.to_string().starts_with(term_lower))
            .unwrap_or(false),
        FilterMode::ByName => entry.display_name.to_lowercase().starts_with(term_lower),
    }
}

/// Indices into `entries` of every entry matching `term` under `mode`, in
/// their original order.
pub fn filter_indices(entries: &[CatalogEntry], term: &str, mode: FilterMode) -> Vec<usize> {
    let q = term.to_lowercase();
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, e)| matches(e, &q, mode).then_some(i))
        .collect()
}

pub fn filter<'a>(entries: &'a [CatalogEntry], term: &str, mode: FilterMode) -> Vec<&'a CatalogEntry> {
    filter_indices(entries, term, mode)
        .into_iter()
        .map(|i| &entries[i])
        .collect()
}
