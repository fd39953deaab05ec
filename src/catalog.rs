//! Catalog screen: row projection and the list controller.

use tracing::warn;

use crate::config::sprite_url;
use crate::filter::{filter_indices, FilterMode};
use crate::models::CatalogEntry;

/// One rendered catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub id: u32,
    /// Raw, unpadded id text.
    pub id_text: String,
    pub name: String,
    pub sprite_url: String,
}

/// Project entries into rows. Entries whose reference URL carries no id are
/// skipped.
pub fn project_rows<'a, I>(entries: I, sprite_template: &str) -> Vec<CatalogRow>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    entries
        .into_iter()
        .filter_map(|e| match e.id() {
            Ok(id) => Some(CatalogRow {
                id,
                id_text: id.to_string(),
                name: e.display_name.clone(),
                sprite_url: sprite_url(sprite_template, id),
            }),
            Err(err) => {
                warn!(name = %e.display_name, error = %err, "skipping catalog entry");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStatus {
    Loading,
    Ready,
    Failed(String),
}

pub struct CatalogPage {
    sprite_template: String,
    all_entries: Vec<CatalogEntry>,
    rows: Vec<CatalogRow>,
    pub selected: usize,
    pub search_mode: bool,
    pub search_query: String,
    pub mode: FilterMode,
    pub not_found: bool,
    pub filter_panel_open: bool,
    pub status: CatalogStatus,
    /// Row id whose record is being re-fetched before navigating.
    pub pending: Option<u32>,
}

impl CatalogPage {
    pub fn new(sprite_template: impl Into<String>, mode: FilterMode) -> Self {
        Self {
            sprite_template: sprite_template.into(),
            all_entries: Vec::new(),
            rows: Vec::new(),
            selected: 0,
            search_mode: false,
            search_query: String::new(),
            mode,
            not_found: false,
            filter_panel_open: false,
            status: CatalogStatus::Loading,
            pending: None,
        }
    }

    /// Install the fetched catalog. Only the first successful load is kept.
    /// Search text typed while loading is applied to the new rows.
    pub fn set_entries(&mut self, entries: Vec<CatalogEntry>) {
        if self.status == CatalogStatus::Ready {
            return;
        }
        self.all_entries = entries;
        self.status = CatalogStatus::Ready;
        self.selected = 0;
        self.apply_filter();
        if self.search_query.is_empty() {
            self.not_found = false;
        }
    }

    pub fn load_failed(&mut self, reason: String) {
        self.status = CatalogStatus::Failed(reason);
    }

    /// A new load may be issued after a failure.
    pub fn retry(&mut self) -> bool {
        if matches!(self.status, CatalogStatus::Failed(_)) {
            self.status = CatalogStatus::Loading;
            true
        } else {
            false
        }
    }

    pub fn entry_count(&self) -> usize {
        self.all_entries.len()
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn selected_row(&self) -> Option<&CatalogRow> {
        self.rows.get(self.selected)
    }

    /// The clear marker is shown while there is search text.
    pub fn clear_visible(&self) -> bool {
        !self.search_query.is_empty()
    }

    pub fn apply_filter(&mut self) {
        let indices = filter_indices(&self.all_entries, &self.search_query, self.mode);
        self.rows = project_rows(
            indices.iter().map(|&i| &self.all_entries[i]),
            &self.sprite_template,
        );
        self.not_found = self.rows.is_empty();

        if self.rows.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.search_query.push(c);
        self.apply_filter();
    }

    pub fn backspace(&mut self) {
        self.search_query.pop();
        self.apply_filter();
    }

    /// Empty the search text, hide the not-found indicator and show everything
    /// the current mode lets through.
    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.apply_filter();
        self.not_found = false;
    }

    pub fn set_mode(&mut self, mode: FilterMode) {
        if self.mode != mode {
            self.mode = mode;
            self.apply_filter();
        }
    }

    pub fn toggle_filter_panel(&mut self) {
        self.filter_panel_open = !self.filter_panel_open;
    }

    pub fn next(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + 1) % self.rows.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.rows.is_empty() {
            if self.selected == 0 {
                self.selected = self.rows.len() - 1;
            } else {
                self.selected -= 1;
            }
        }
    }

    /// Start opening the selected row. Returns the id to validate, or `None`
    /// when nothing is selected or a previous activation is still pending.
    pub fn activate(&mut self) -> Option<u32> {
        if self.pending.is_some() {
            return None;
        }
        let id = self.selected_row()?.id;
        self.pending = Some(id);
        Some(id)
    }

    /// Outcome of the pre-navigation fetch. Returns the id to navigate to.
    pub fn precheck_finished(&mut self, id: u32, ok: bool) -> Option<u32> {
        if self.pending != Some(id) {
            return None;
        }
        self.pending = None;
        ok.then_some(id)
    }
}
