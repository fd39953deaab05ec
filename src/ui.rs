use crate::app::{App, Page, SpriteSlot};
use crate::catalog::CatalogStatus;
use crate::detail::{DetailState, DetailView};
use crate::filter::FilterMode;
use crate::sprite::SpriteThumb;
use crate::theme::{badge_color, Rgb};
use crate::utils::{format_name, text_to_lines};
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;

pub fn draw_ui<B: Backend>(terminal: &mut Terminal<B>, app: &App) -> io::Result<()> {
    terminal
        .draw(|f| {
            match app.page {
                Page::Catalog => draw_catalog(f, app),
                Page::Detail => draw_detail(f, app),
            }
            if app.show_help {
                draw_help(f, app.page);
            }
        })
        .map(|_| ())
}

// helper to compute a centered rect for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_w = r.width.saturating_mul(percent_x) / 100;
    let popup_h = r.height.saturating_mul(percent_y) / 100;
    let popup_x = r.x + (r.width.saturating_sub(popup_w) / 2);
    let popup_y = r.y + (r.height.saturating_sub(popup_h) / 2);
    Rect::new(popup_x, popup_y, popup_w, popup_h)
}

fn titled(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).title(title)
}

fn sprite_paragraph<'a>(app: &App, url: &str, rect: Rect, title: &'a str) -> Paragraph<'a> {
    let w = rect.width.saturating_sub(2).clamp(1, 64) as u32;
    let h = rect.height.saturating_sub(2).clamp(1, 64) as u32;
    match app.sprite(url) {
        Some(SpriteSlot::Ready(thumb)) => Paragraph::new(sprite_lines(thumb, w, h)).block(titled(title)),
        Some(SpriteSlot::Pending) => Paragraph::new("(loading sprite)").block(titled(title)),
        Some(SpriteSlot::Missing) => Paragraph::new("(no sprite)").block(titled(title)),
        None => Paragraph::new("(sprites off)").block(titled(title)),
    }
}

fn sprite_lines<'a>(thumb: &SpriteThumb, w: u32, h: u32) -> Vec<Spans<'a>> {
    thumb
        .rows(w, h)
        .into_iter()
        .map(|row| {
            Spans::from(
                row.into_iter()
                    .map(|(r, g, b)| Span::styled(" ", Style::default().bg(Color::Rgb(r, g, b))))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn draw_catalog<B: Backend>(f: &mut Frame<B>, app: &App) {
    let page = &app.catalog;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(f.size());

    let mut left_constraints = vec![Constraint::Min(3), Constraint::Length(3)];
    if page.filter_panel_open {
        left_constraints.push(Constraint::Length(3));
    }
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(left_constraints)
        .split(chunks[0]);

    let list_title = match &page.status {
        CatalogStatus::Loading => "Pokémon (loading)",
        CatalogStatus::Ready => "Pokémon",
        CatalogStatus::Failed(_) => "Pokémon (load failed)",
    };

    if page.not_found {
        let para = Paragraph::new("No Pokémon found").block(titled(list_title));
        f.render_widget(para, left_chunks[0]);
    } else {
        let items: Vec<ListItem> = page
            .rows()
            .iter()
            .map(|row| {
                ListItem::new(Spans::from(Span::raw(format!(
                    "#{} {}",
                    row.id_text,
                    format_name(&row.name)
                ))))
            })
            .collect();
        let list = List::new(items).block(titled(list_title)).highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        let mut state = ListState::default();
        if !page.rows().is_empty() {
            state.select(Some(page.selected));
        }
        f.render_stateful_widget(list, left_chunks[0], &mut state);
    }

    let mut search_text = if page.search_mode {
        format!("/{}", page.search_query)
    } else if page.search_query.is_empty() {
        "Press '/' to search.".to_string()
    } else {
        page.search_query.clone()
    };
    if page.clear_visible() {
        search_text.push_str("  [x] clear");
    }
    let search_title = format!("Search by {}", page.mode.label());
    let search_para = Paragraph::new(search_text).block(titled(&search_title));
    f.render_widget(search_para, left_chunks[1]);

    if page.filter_panel_open {
        let radio = |mode: FilterMode, text: &str| {
            let mark = if page.mode == mode { "(•)" } else { "( )" };
            format!("{mark} {text}")
        };
        let panel = Paragraph::new(format!(
            "{}   {}",
            radio(FilterMode::ByNumber, "Number [n]"),
            radio(FilterMode::ByName, "Name [m]")
        ))
        .block(titled("Sort by"));
        f.render_widget(panel, left_chunks[2]);
    }

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(chunks[1]);

    match page.selected_row().filter(|_| !page.not_found) {
        Some(row) => {
            let para = sprite_paragraph(app, &row.sprite_url, right_chunks[0], "Preview");
            f.render_widget(para, right_chunks[0]);
        }
        None => f.render_widget(Paragraph::new("").block(titled("Preview")), right_chunks[0]),
    }

    let status = match (&page.status, page.pending) {
        (_, Some(id)) => format!("Checking #{id}…"),
        (CatalogStatus::Failed(reason), None) => {
            format!("Catalog unavailable: {reason}  (r to retry)")
        }
        (CatalogStatus::Loading, None) => "Loading catalog…".to_string(),
        (CatalogStatus::Ready, None) => match page.selected_row() {
            Some(row) => format!("{}  Enter to open, h for help", format_name(&row.name)),
            None => "h for help".to_string(),
        },
    };
    f.render_widget(Paragraph::new(status).block(titled("Status")), right_chunks[1]);
}

fn draw_detail<B: Backend>(f: &mut Frame<B>, app: &App) {
    let detail = &app.detail;
    let size = f.size();
    let Some(view) = detail.view() else {
        let text = match (&detail.error, detail.state()) {
            (Some(err), _) => match detail.current_id() {
                Some(id) => format!("Could not load #{id}: {err}\n\nPress b to go back."),
                None => format!("Could not load: {err}\n\nPress b to go back."),
            },
            (None, DetailState::Loading(id)) => format!("Loading #{id}…"),
            _ => String::new(),
        };
        let para = Paragraph::new(text)
            .block(titled("Details"))
            .wrap(Wrap { trim: true });
        f.render_widget(para, size);
        return;
    };

    let accent_fg = view.accent.map(|a| a.color.color());
    let accent_style = accent_fg.map(|c| Style::default().fg(c)).unwrap_or_default();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(12),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(size);

    let header = Paragraph::new(Spans::from(vec![
        Span::styled(
            view.name.clone(),
            accent_style.add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(view.id_text.clone(), accent_style),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(accent_style)
            .title(view.title.as_str()),
    );
    f.render_widget(header, rows[0]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(10)])
        .split(rows[1]);
    f.render_widget(sprite_paragraph(app, &view.sprite_url, top[0], "Sprite"), top[0]);
    f.render_widget(info_paragraph(view), top[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(10)])
        .split(rows[2]);
    draw_stats(f, view, bottom[0]);

    let mut about: Vec<Spans> = vec![Spans::from(Span::styled(
        "About",
        accent_style.add_modifier(Modifier::BOLD),
    ))];
    let width = bottom[1].width.saturating_sub(2).max(10) as usize;
    for line in text_to_lines(&view.description, width) {
        about.push(Spans::from(Span::raw(line)));
    }
    f.render_widget(
        Paragraph::new(about).block(titled("Description")),
        bottom[1],
    );

    f.render_widget(Paragraph::new(footer_line(app, view)), rows[3]);
}

fn info_paragraph(view: &DetailView) -> Paragraph<'_> {
    let mut type_spans: Vec<Span> = vec![Span::raw("Types: ")];
    for (i, t) in view.types.iter().enumerate() {
        let bg = badge_color(t);
        type_spans.push(Span::styled(
            format!(" {} ", format_name(t)),
            Style::default().fg(bg.contrast()).bg(bg.color()),
        ));
        if i + 1 < view.types.len() {
            type_spans.push(Span::raw(" "));
        }
    }
    let abilities: Vec<String> = view.abilities.iter().map(|a| format_name(a)).collect();
    let lines = vec![
        Spans::from(type_spans),
        Spans::from(Span::raw(format!("Weight: {}", view.weight_text))),
        Spans::from(Span::raw(format!("Height: {}", view.height_text))),
        Spans::from(Span::raw(format!("Abilities: {}", abilities.join(", ")))),
    ];
    Paragraph::new(lines)
        .block(titled("Info"))
        .wrap(Wrap { trim: true })
}

fn draw_stats<B: Backend>(f: &mut Frame<B>, view: &DetailView, rect: Rect) {
    let block = titled("Base Stats");
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let constraints: Vec<Constraint> = view
        .stats
        .iter()
        .map(|_| Constraint::Length(1))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let lines = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let gauge_style = match view.accent {
        Some(accent) => Style::default()
            .fg(accent.color.color())
            .bg(accent.track.over(Rgb::BLACK).color()),
        None => Style::default().fg(Color::Gray),
    };

    for (stat, line) in view.stats.iter().zip(lines.iter()) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(11), Constraint::Min(1)])
            .split(*line);
        let label = Paragraph::new(format!("{:<5} {}", stat.label, stat.value_text));
        f.render_widget(label, cols[0]);
        let gauge = Gauge::default()
            .gauge_style(gauge_style)
            .ratio(stat.ratio)
            .label(Span::raw(""));
        f.render_widget(gauge, cols[1]);
    }
}

fn footer_line<'a>(app: &'a App, view: &DetailView) -> Spans<'a> {
    let detail = &app.detail;
    let mut spans = Vec::new();
    match view.nav.prev {
        Some(id) => spans.push(Span::raw(format!("◀ p #{id:03}   "))),
        None => spans.push(Span::styled("◀ p      ", Style::default().fg(Color::DarkGray))),
    }
    match view.nav.next {
        Some(id) => spans.push(Span::raw(format!("n #{id:03} ▶   "))),
        None => spans.push(Span::styled("n      ▶   ", Style::default().fg(Color::DarkGray))),
    }
    spans.push(Span::raw("b back   "));
    if let DetailState::Loading(id) = detail.state() {
        spans.push(Span::raw(format!("loading #{id:03}…   ")));
    }
    if let Some(loc) = detail.location() {
        spans.push(Span::styled(loc, Style::default().fg(Color::DarkGray)));
    }
    if let Some(err) = &detail.error {
        spans.push(Span::styled(
            format!("   {err}"),
            Style::default().fg(Color::Red),
        ));
    }
    Spans::from(spans)
}

fn draw_help<B: Backend>(f: &mut Frame<B>, page: Page) {
    let popup = centered_rect(60, 50, f.size());
    let mut help_lines: Vec<Spans> = vec![
        Spans::from(Span::styled(
            "Keybindings",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::raw("")),
    ];
    let entries: &[&str] = match page {
        Page::Catalog => &[
            "/        Search (Enter/Esc to finish)",
            "Up/Down  Move selection",
            "Enter    Open details",
            "n / m    Filter by number / name",
            "f        Toggle filter panel",
            "x        Clear search",
            "r        Retry a failed catalog load",
        ],
        Page::Detail => &[
            "Left/p   Previous Pokémon",
            "Right/n  Next Pokémon",
            "Esc/b    Back to catalog",
        ],
    };
    for line in entries {
        help_lines.push(Spans::from(Span::raw(*line)));
    }
    help_lines.push(Spans::from(Span::raw("h        Toggle this help")));
    help_lines.push(Spans::from(Span::raw("q        Quit")));

    let help_para = Paragraph::new(help_lines)
        .block(titled("Help"))
        .wrap(Wrap { trim: true });
    f.render_widget(ratatui::widgets::Clear, popup);
    f.render_widget(help_para, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppEvent;
    use crate::config::Config;
    use crate::test_support::{entry, payload};
    use ratatui::backend::TestBackend;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        draw_ui(&mut terminal, app).unwrap();
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(&buf.get(x, y).symbol);
            }
            out.push('\n');
        }
        out
    }

    fn app() -> App {
        App::new(Config {
            sprites: false,
            ..Config::default()
        })
    }

    #[test]
    fn catalog_lists_rows() {
        let mut app = app();
        app.start(None);
        app.handle_event(AppEvent::CatalogLoaded(Ok(vec![
            entry(1, "bulbasaur"),
            entry(2, "ivysaur"),
        ])));
        let text = screen(&app);
        assert!(text.contains("#1 Bulbasaur"));
        assert!(text.contains("#2 Ivysaur"));
    }

    #[test]
    fn catalog_shows_not_found() {
        let mut app = app();
        app.start(None);
        app.handle_event(AppEvent::CatalogLoaded(Ok(vec![entry(1, "bulbasaur")])));
        app.catalog.push_char('z');
        let text = screen(&app);
        assert!(text.contains("No Pokémon found"));
        assert!(text.contains("[x] clear"));
    }

    #[test]
    fn detail_shows_projection() {
        let mut app = app();
        app.start(Some("1"));
        app.handle_event(AppEvent::DetailLoaded {
            id: 1,
            result: Ok(payload(1, "bulbasaur", &["grass", "poison"])),
        });
        let text = screen(&app);
        assert!(text.contains("Bulbasaur"));
        assert!(text.contains("#001"));
        assert!(text.contains("HP    045"));
        assert!(text.contains("n #002"));
        assert!(text.contains("detail?id=1"));
    }
}
