//! Application state and input/result handling.
//!
//! `App` owns every piece of session state and is only touched from the UI
//! task. Handlers never do I/O; they return [`Effect`]s which [`spawn`] turns
//! into background tasks whose results come back as [`AppEvent`]s.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, warn};

use crate::catalog::CatalogPage;
use crate::config::Config;
use crate::detail::{resolve_entry, DetailPage, Entry};
use crate::error::FetchError;
use crate::fetch::PokeApi;
use crate::filter::FilterMode;
use crate::models::{CatalogEntry, DetailPayload};
use crate::sprite::{fetch_sprite, SpriteThumb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Catalog,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadCatalog,
    Precheck(u32),
    LoadDetail(u32),
    LoadSprite(String),
}

#[derive(Debug)]
pub enum AppEvent {
    CatalogLoaded(Result<Vec<CatalogEntry>, FetchError>),
    Prechecked { id: u32, ok: bool },
    DetailLoaded {
        id: u32,
        result: Result<DetailPayload, FetchError>,
    },
    SpriteLoaded {
        url: String,
        result: Result<SpriteThumb, FetchError>,
    },
}

pub enum SpriteSlot {
    Pending,
    Ready(SpriteThumb),
    Missing,
}

pub struct App {
    pub config: Config,
    pub page: Page,
    pub catalog: CatalogPage,
    pub detail: DetailPage,
    pub sprites: HashMap<String, SpriteSlot>,
    pub show_help: bool,
    pub should_quit: bool,
    catalog_requested: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let catalog = CatalogPage::new(config.list_sprite_template.clone(), config.default_filter);
        let detail = DetailPage::new(config.max_id, config.detail_sprite_template.clone());
        Self {
            config,
            page: Page::Catalog,
            catalog,
            detail,
            sprites: HashMap::new(),
            show_help: false,
            should_quit: false,
            catalog_requested: false,
        }
    }

    /// Pick the first screen from the raw `--id` value.
    pub fn start(&mut self, initial_id: Option<&str>) -> Vec<Effect> {
        match initial_id {
            None => self.open_catalog(),
            Some(raw) => match resolve_entry(Some(raw), self.config.max_id) {
                Entry::Load(id) => self.open_detail(id),
                Entry::Redirect => {
                    warn!(id = raw, max_id = self.config.max_id, "id out of range, showing catalog");
                    self.open_catalog()
                }
            },
        }
    }

    fn open_catalog(&mut self) -> Vec<Effect> {
        self.page = Page::Catalog;
        let mut effects = Vec::new();
        if !self.catalog_requested || self.catalog.retry() {
            self.catalog_requested = true;
            effects.push(Effect::LoadCatalog);
        }
        effects.extend(self.preview_sprite());
        effects
    }

    /// Enter a fresh detail screen for `id`, or fall back to the catalog when
    /// `id` is out of range.
    fn open_detail(&mut self, id: u32) -> Vec<Effect> {
        let mut detail = DetailPage::new(self.config.max_id, self.config.detail_sprite_template.clone());
        match detail.navigate(id) {
            Some(id) => {
                self.detail = detail;
                self.page = Page::Detail;
                vec![Effect::LoadDetail(id)]
            }
            None => {
                warn!(id, max_id = self.config.max_id, "id out of range, showing catalog");
                self.open_catalog()
            }
        }
    }

    fn want_sprite(&mut self, url: String) -> Option<Effect> {
        if !self.config.sprites || self.sprites.contains_key(&url) {
            return None;
        }
        self.sprites.insert(url.clone(), SpriteSlot::Pending);
        Some(Effect::LoadSprite(url))
    }

    fn preview_sprite(&mut self) -> Option<Effect> {
        let url = self.catalog.selected_row()?.sprite_url.clone();
        self.want_sprite(url)
    }

    pub fn sprite(&self, url: &str) -> Option<&SpriteSlot> {
        self.sprites.get(url)
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::CatalogLoaded(Ok(entries)) => {
                self.catalog.set_entries(entries);
                info!(count = self.catalog.entry_count(), "catalog loaded");
                if self.page == Page::Catalog {
                    return self.preview_sprite().into_iter().collect();
                }
            }
            AppEvent::CatalogLoaded(Err(err)) => {
                error!(error = %err, "catalog load failed");
                self.catalog.load_failed(err.to_string());
            }
            AppEvent::Prechecked { id, ok } => {
                if let Some(id) = self.catalog.precheck_finished(id, ok) {
                    if self.page == Page::Catalog {
                        return self.open_detail(id);
                    }
                }
            }
            AppEvent::DetailLoaded { id, result } => {
                self.detail.apply(id, result);
                let url = self.detail.view().map(|v| v.sprite_url.clone());
                if let Some(url) = url {
                    return self.want_sprite(url).into_iter().collect();
                }
            }
            AppEvent::SpriteLoaded { url, result } => {
                let slot = match result {
                    Ok(thumb) => SpriteSlot::Ready(thumb),
                    Err(err) => {
                        warn!(%url, error = %err, "sprite unavailable");
                        SpriteSlot::Missing
                    }
                };
                self.sprites.insert(url, slot);
            }
        }
        Vec::new()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::F(1)) {
                self.show_help = false;
            }
            return Vec::new();
        }
        match self.page {
            Page::Catalog => self.catalog_key(key.code),
            Page::Detail => self.detail_key(key.code),
        }
    }

    fn catalog_key(&mut self, code: KeyCode) -> Vec<Effect> {
        if self.catalog.search_mode {
            match code {
                KeyCode::Enter | KeyCode::Esc => self.catalog.search_mode = false,
                KeyCode::Backspace => self.catalog.backspace(),
                KeyCode::Char(c) => self.catalog.push_char(c),
                _ => return Vec::new(),
            }
            return self.preview_sprite().into_iter().collect();
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::F(1) | KeyCode::Char('h') => self.show_help = true,
            KeyCode::Char('/') => self.catalog.search_mode = true,
            KeyCode::Char('x') => self.catalog.clear_search(),
            KeyCode::Char('n') => self.catalog.set_mode(FilterMode::ByNumber),
            KeyCode::Char('m') => self.catalog.set_mode(FilterMode::ByName),
            KeyCode::Char('f') => self.catalog.toggle_filter_panel(),
            KeyCode::Char('r') => {
                if self.catalog.retry() {
                    info!("retrying catalog load");
                    return vec![Effect::LoadCatalog];
                }
                return Vec::new();
            }
            KeyCode::Down => self.catalog.next(),
            KeyCode::Up => self.catalog.previous(),
            KeyCode::Enter => return self.activate(),
            _ => return Vec::new(),
        }
        self.preview_sprite().into_iter().collect()
    }

    fn activate(&mut self) -> Vec<Effect> {
        if !self.config.precheck {
            return match self.catalog.selected_row() {
                Some(row) => {
                    let id = row.id;
                    self.open_detail(id)
                }
                None => Vec::new(),
            };
        }
        self.catalog.activate().map(Effect::Precheck).into_iter().collect()
    }

    fn detail_key(&mut self, code: KeyCode) -> Vec<Effect> {
        let target = match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::F(1) | KeyCode::Char('h') => {
                self.show_help = true;
                None
            }
            KeyCode::Esc | KeyCode::Char('b') => return self.open_catalog(),
            KeyCode::Left | KeyCode::Char('p') => self.detail.prev(),
            KeyCode::Right | KeyCode::Char('n') => self.detail.next(),
            _ => None,
        };
        target.map(Effect::LoadDetail).into_iter().collect()
    }
}

/// Run `effect` on the runtime; its result is sent back on `tx`.
pub fn spawn(effect: Effect, api: &PokeApi, limit: u32, tx: &UnboundedSender<AppEvent>) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match effect {
            Effect::LoadCatalog => AppEvent::CatalogLoaded(api.fetch_catalog(limit).await),
            Effect::Precheck(id) => {
                let ok = match api.load_detail(id).await {
                    Ok(_) => true,
                    Err(err) => {
                        error!(id, error = %err, "detail check before opening failed");
                        false
                    }
                };
                AppEvent::Prechecked { id, ok }
            }
            Effect::LoadDetail(id) => AppEvent::DetailLoaded {
                id,
                result: api.load_detail(id).await,
            },
            Effect::LoadSprite(url) => {
                let result = fetch_sprite(&api, &url).await;
                AppEvent::SpriteLoaded { url, result }
            }
        };
        // The receiver only goes away on shutdown.
        let _ = tx.send(event);
    });
}
