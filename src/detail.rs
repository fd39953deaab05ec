//! Detail screen: entry validation, the stale-response guard and the view
//! projection.

use tracing::{debug, error, warn};

use crate::config::sprite_url;
use crate::error::FetchError;
use crate::models::DetailPayload;
use crate::theme::{type_color, Rgb, Rgba, TRACK_ALPHA};
use crate::utils::{capitalize, padded_id};

/// Upper bound of a stat gauge.
pub const STAT_GAUGE_MAX: u32 = 100;

/// What to do with the id the detail screen was opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Load(u32),
    /// Absent, non-numeric or out of `[1, max_id]`: go back to the catalog.
    Redirect,
}

pub fn resolve_entry(raw: Option<&str>, max_id: u32) -> Entry {
    match raw.map(str::trim).and_then(|s| s.parse::<u32>().ok()) {
        Some(id) if (1..=max_id).contains(&id) => Entry::Load(id),
        _ => Entry::Redirect,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigation {
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl Navigation {
    pub fn around(id: u32, max_id: u32) -> Self {
        Self {
            prev: (id > 1).then(|| id - 1),
            next: (id < max_id).then(|| id + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub label: String,
    pub value: u32,
    pub value_text: String,
    /// Fill of the gauge in `[0, 1]`, saturating at [`STAT_GAUGE_MAX`].
    pub ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accent {
    pub color: Rgb,
    pub track: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub id: u32,
    pub title: String,
    pub name: String,
    pub id_text: String,
    pub sprite_url: String,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub weight_text: String,
    pub height_text: String,
    pub description: String,
    pub stats: Vec<StatRow>,
    /// `None` when the primary type has no colour; the view renders unthemed.
    pub accent: Option<Accent>,
    pub nav: Navigation,
}

fn stat_label(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SATK".to_string(),
        "special-defense" => "SDEF".to_string(),
        "speed" => "SPD".to_string(),
        other => capitalize(other),
    }
}

impl DetailView {
    pub fn project(payload: &DetailPayload, sprite_template: &str, max_id: u32) -> Self {
        let rec = &payload.record;
        let name = capitalize(&rec.name);

        let accent = rec.types.first().and_then(|primary| match type_color(primary) {
            Ok(color) => Some(Accent {
                color,
                track: color.with_alpha(TRACK_ALPHA),
            }),
            Err(err) => {
                warn!(id = rec.id, error = %err, "rendering without accent colour");
                None
            }
        });

        let stats = rec
            .stats
            .iter()
            .map(|s| StatRow {
                label: stat_label(&s.name),
                value: s.base,
                value_text: format!("{:03}", s.base),
                ratio: s.base.min(STAT_GAUGE_MAX) as f64 / STAT_GAUGE_MAX as f64,
            })
            .collect();

        let description = payload
            .species
            .english_flavor_text()
            .replace(['\n', '\u{c}'], " ");

        Self {
            id: rec.id,
            title: name.clone(),
            name,
            id_text: padded_id(rec.id),
            sprite_url: sprite_url(sprite_template, rec.id),
            types: rec.types.clone(),
            abilities: rec.abilities.clone(),
            weight_text: format!("{} kg", rec.weight as f64 / 10.0),
            height_text: format!("{} m", rec.height as f64 / 10.0),
            description,
            stats,
            accent,
            nav: Navigation::around(rec.id, max_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailState {
    Idle,
    Loading(u32),
    Displayed(u32),
}

/// How a finished load was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Rendered(u32),
    /// A newer navigation superseded this response; it was dropped.
    Stale { requested: u32, current: Option<u32> },
    Failed(u32),
}

pub struct DetailPage {
    max_id: u32,
    sprite_template: String,
    current_id: Option<u32>,
    state: DetailState,
    view: Option<DetailView>,
    history: Vec<u32>,
    pub error: Option<String>,
}

impl DetailPage {
    pub fn new(max_id: u32, sprite_template: impl Into<String>) -> Self {
        Self {
            max_id,
            sprite_template: sprite_template.into(),
            current_id: None,
            state: DetailState::Idle,
            view: None,
            history: Vec::new(),
            error: None,
        }
    }

    pub fn current_id(&self) -> Option<u32> {
        self.current_id
    }

    pub fn state(&self) -> DetailState {
        self.state
    }

    pub fn view(&self) -> Option<&DetailView> {
        self.view.as_ref()
    }

    /// Ids accepted for display, oldest first.
    pub fn history(&self) -> &[u32] {
        &self.history
    }

    /// Location of the last accepted render, `detail?id=N`.
    pub fn location(&self) -> Option<String> {
        self.history.last().map(|id| format!("detail?id={id}"))
    }

    /// Make `id` the authoritative id and return it for loading. Ids outside
    /// `[1, max_id]` are refused.
    pub fn navigate(&mut self, id: u32) -> Option<u32> {
        if !(1..=self.max_id).contains(&id) {
            return None;
        }
        self.current_id = Some(id);
        self.state = DetailState::Loading(id);
        Some(id)
    }

    pub fn prev(&mut self) -> Option<u32> {
        let target = self.view.as_ref()?.nav.prev?;
        self.navigate(target)
    }

    pub fn next(&mut self) -> Option<u32> {
        let target = self.view.as_ref()?.nav.next?;
        self.navigate(target)
    }

    /// Apply the result of a load for `id`. Only the response for the current
    /// id is rendered; failures never touch the view.
    pub fn apply(&mut self, id: u32, result: Result<DetailPayload, FetchError>) -> Applied {
        let payload = match result {
            Ok(payload) => payload,
            Err(err) => {
                error!(id, error = %err, "detail load failed");
                if self.current_id == Some(id) {
                    self.error = Some(err.to_string());
                    self.state = match &self.view {
                        Some(v) => DetailState::Displayed(v.id),
                        None => DetailState::Idle,
                    };
                }
                return Applied::Failed(id);
            }
        };

        if self.current_id != Some(id) {
            debug!(requested = id, current = ?self.current_id, "dropping stale detail response");
            return Applied::Stale {
                requested: id,
                current: self.current_id,
            };
        }

        self.view = Some(DetailView::project(
            &payload,
            &self.sprite_template,
            self.max_id,
        ));
        self.state = DetailState::Displayed(id);
        self.history.push(id);
        self.error = None;
        Applied::Rendered(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DETAIL_SPRITE;
    use crate::models::Stat;
    use crate::test_support::payload;

    fn decode_error() -> FetchError {
        FetchError::Decode {
            url: "http://test/pokemon-species/5".into(),
            source: serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
        }
    }

    fn page(max_id: u32) -> DetailPage {
        DetailPage::new(max_id, DEFAULT_DETAIL_SPRITE)
    }

    #[test]
    fn entry_accepts_ids_in_range() {
        assert_eq!(resolve_entry(Some("1"), 151), Entry::Load(1));
        assert_eq!(resolve_entry(Some("151"), 151), Entry::Load(151));
        assert_eq!(resolve_entry(Some("493"), 493), Entry::Load(493));
    }

    #[test]
    fn entry_redirects_otherwise() {
        for raw in [None, Some(""), Some("0"), Some("152"), Some("-3"), Some("abc")] {
            assert_eq!(resolve_entry(raw, 151), Entry::Redirect, "{raw:?}");
        }
    }

    #[test]
    fn navigation_omits_edges() {
        assert_eq!(Navigation::around(1, 151), Navigation { prev: None, next: Some(2) });
        assert_eq!(
            Navigation::around(151, 151),
            Navigation { prev: Some(150), next: None }
        );
        assert_eq!(
            Navigation::around(75, 151),
            Navigation { prev: Some(74), next: Some(76) }
        );
    }

    #[test]
    fn projection_formats_fields() {
        let view = DetailView::project(&payload(1, "bulbasaur", &["grass", "poison"]), DEFAULT_DETAIL_SPRITE, 151);
        assert_eq!(view.title, "Bulbasaur");
        assert_eq!(view.name, "Bulbasaur");
        assert_eq!(view.id_text, "#001");
        assert!(view.sprite_url.ends_with("/official-artwork/1.png"));
        assert_eq!(view.types, ["grass", "poison"]);
        assert_eq!(view.weight_text, "6.9 kg");
        assert_eq!(view.height_text, "0.7 m");
        assert_eq!(view.description, "A strange seed was planted.");
        assert_eq!(view.nav.prev, None);

        let accent = view.accent.unwrap();
        assert_eq!(accent.color, Rgb { r: 120, g: 200, b: 80 });
        assert_eq!(accent.track.css(), "rgba(120, 200, 80, 0.5)");
    }

    #[test]
    fn stat_rows_are_padded_and_bounded() {
        let view = DetailView::project(&payload(1, "bulbasaur", &["grass"]), DEFAULT_DETAIL_SPRITE, 151);
        let hp = &view.stats[0];
        assert_eq!(hp.label, "HP");
        assert_eq!(hp.value_text, "045");
        assert!((hp.ratio - 0.45).abs() < 1e-9);

        let speed = view.stats.last().unwrap();
        assert_eq!(speed.value, 145);
        assert_eq!(speed.ratio, 1.0);
    }

    #[test]
    fn uncommon_stat_names_are_capitalized() {
        let mut p = payload(1, "bulbasaur", &["grass"]);
        p.record.stats = vec![Stat { name: "accuracy".into(), base: 7 }];
        let view = DetailView::project(&p, DEFAULT_DETAIL_SPRITE, 151);
        assert_eq!(view.stats[0].label, "Accuracy");
        assert_eq!(view.stats[0].value_text, "007");
    }

    #[test]
    fn unknown_type_renders_without_accent() {
        let view = DetailView::project(&payload(1, "bulbasaur", &["shadow"]), DEFAULT_DETAIL_SPRITE, 151);
        assert_eq!(view.accent, None);
        assert_eq!(view.name, "Bulbasaur");
        assert_eq!(view.stats.len(), 6);
    }

    #[test]
    fn matching_response_is_displayed() {
        let mut page = page(151);
        assert_eq!(page.navigate(1), Some(1));
        assert_eq!(page.state(), DetailState::Loading(1));

        let applied = page.apply(1, Ok(payload(1, "bulbasaur", &["grass"])));
        assert_eq!(applied, Applied::Rendered(1));
        assert_eq!(page.state(), DetailState::Displayed(1));
        assert_eq!(page.history(), [1]);
        assert_eq!(page.location().as_deref(), Some("detail?id=1"));
    }

    #[test]
    fn superseded_response_is_dropped() {
        let mut page = page(151);
        page.navigate(5);
        page.navigate(6);

        let six = page.apply(6, Ok(payload(6, "charizard", &["fire"])));
        assert_eq!(six, Applied::Rendered(6));
        let five = page.apply(5, Ok(payload(5, "charmeleon", &["fire"])));
        assert_eq!(
            five,
            Applied::Stale {
                requested: 5,
                current: Some(6)
            }
        );

        let view = page.view().unwrap();
        assert_eq!(view.id, 6);
        assert_eq!(view.name, "Charizard");
        assert_eq!(page.state(), DetailState::Displayed(6));
        assert_eq!(page.history(), [6]);
    }

    #[test]
    fn failure_leaves_view_untouched() {
        let mut page = page(151);
        page.navigate(4);
        page.apply(4, Ok(payload(4, "charmander", &["fire"])));
        let before = page.view().cloned();

        page.navigate(5);
        assert_eq!(page.apply(5, Err(decode_error())), Applied::Failed(5));
        assert_eq!(page.view().cloned(), before);
        assert_eq!(page.state(), DetailState::Displayed(4));
        assert!(page.error.is_some());
        assert_eq!(page.history(), [4]);
    }

    #[test]
    fn failure_before_first_render_returns_to_idle() {
        let mut page = page(151);
        page.navigate(5);
        page.apply(5, Err(decode_error()));
        assert_eq!(page.state(), DetailState::Idle);
        assert!(page.view().is_none());
    }

    #[test]
    fn prev_and_next_follow_edges() {
        let mut page = page(3);
        page.navigate(1);
        page.apply(1, Ok(payload(1, "bulbasaur", &["grass"])));
        assert_eq!(page.prev(), None);
        assert_eq!(page.next(), Some(2));
        assert_eq!(page.current_id(), Some(2));

        page.navigate(3);
        page.apply(3, Ok(payload(3, "venusaur", &["grass"])));
        assert_eq!(page.view().unwrap().nav.next, None);
        assert_eq!(page.next(), None);
        assert_eq!(page.prev(), Some(2));
    }

    #[test]
    fn navigate_refuses_out_of_range() {
        let mut page = page(151);
        assert_eq!(page.navigate(0), None);
        assert_eq!(page.navigate(152), None);
        assert_eq!(page.state(), DetailState::Idle);
    }

    #[test]
    fn success_clears_previous_error() {
        let mut page = page(151);
        page.navigate(5);
        page.apply(5, Err(decode_error()));
        page.navigate(5);
        page.apply(5, Ok(payload(5, "charmeleon", &["fire"])));
        assert_eq!(page.error, None);
    }
}
