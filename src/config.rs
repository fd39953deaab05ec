//! Command-line and environment configuration.
//!
//! Every tunable the browser pages used to hard code (list cap, detail
//! maximum, sprite sets) lives here so the two screens never disagree.

use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::filter::FilterMode;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_CATALOG_LIMIT: u32 = 151;
pub const DEFAULT_LIST_SPRITE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{id}.png";
pub const DEFAULT_DETAIL_SPRITE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/{id}.png";

const ID_PLACEHOLDER: &str = "{id}";

#[derive(Parser, Debug)]
#[command(name = "dexbrowse", about = "Browse the PokeAPI catalog from the terminal", version)]
pub struct Cli {
    /// Base URL of the PokeAPI v2 endpoints.
    #[arg(long, env = "POKEAPI_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Number of catalog entries to fetch.
    #[arg(long, env = "POKEMON_LIMIT", default_value_t = DEFAULT_CATALOG_LIMIT)]
    pub limit: u32,

    /// Highest id the detail screen accepts. Defaults to the catalog limit.
    #[arg(long, env = "POKEMON_MAX_ID")]
    pub max_id: Option<u32>,

    /// Sprite URL template for catalog rows; `{id}` is replaced by the id.
    #[arg(long, default_value = DEFAULT_LIST_SPRITE)]
    pub list_sprite: String,

    /// Sprite URL template for the detail screen.
    #[arg(long, default_value = DEFAULT_DETAIL_SPRITE)]
    pub detail_sprite: String,

    /// Open the detail screen for this id instead of the catalog.
    #[arg(long)]
    pub id: Option<String>,

    /// Navigate from the catalog without re-fetching the record first.
    #[arg(long)]
    pub skip_precheck: bool,

    /// Filter mode selected when the catalog opens.
    #[arg(long, value_enum, default_value_t = FilterMode::ByName)]
    pub filter: FilterMode,

    /// Do not download sprites.
    #[arg(long)]
    pub no_sprites: bool,

    /// Where log output goes; the terminal is owned by the UI.
    #[arg(long, env = "DEXBROWSE_LOG", default_value = "dexbrowse.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub catalog_limit: u32,
    pub max_id: u32,
    pub list_sprite_template: String,
    pub detail_sprite_template: String,
    pub precheck: bool,
    pub default_filter: FilterMode,
    pub sprites: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            catalog_limit: DEFAULT_CATALOG_LIMIT,
            max_id: DEFAULT_CATALOG_LIMIT,
            list_sprite_template: DEFAULT_LIST_SPRITE.to_string(),
            detail_sprite_template: DEFAULT_DETAIL_SPRITE.to_string(),
            precheck: true,
            default_filter: FilterMode::ByName,
            sprites: true,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.limit == 0 {
            return Err(ConfigError::ZeroBound { name: "limit" });
        }
        let max_id = cli.max_id.unwrap_or(cli.limit);
        if max_id == 0 {
            return Err(ConfigError::ZeroBound { name: "max-id" });
        }
        check_template("list-sprite", &cli.list_sprite)?;
        check_template("detail-sprite", &cli.detail_sprite)?;
        if reqwest::Url::parse(&cli.api_base).is_err() {
            return Err(ConfigError::InvalidApiBase(cli.api_base.clone()));
        }

        Ok(Self {
            api_base: cli.api_base.trim_end_matches('/').to_string(),
            catalog_limit: cli.limit,
            max_id,
            list_sprite_template: cli.list_sprite.clone(),
            detail_sprite_template: cli.detail_sprite.clone(),
            precheck: !cli.skip_precheck,
            default_filter: cli.filter,
            sprites: !cli.no_sprites,
        })
    }

}

/// Substitute `id` into a sprite URL template.
pub fn sprite_url(template: &str, id: u32) -> String {
    template.replace(ID_PLACEHOLDER, &id.to_string())
}

fn check_template(name: &'static str, template: &str) -> Result<(), ConfigError> {
    if template.contains(ID_PLACEHOLDER) {
        Ok(())
    } else {
        Err(ConfigError::MissingPlaceholder {
            name,
            template: template.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["dexbrowse"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn max_id_follows_limit_unless_given() {
        let cfg = Config::from_cli(&parse(&["--limit", "493"])).unwrap();
        assert_eq!(cfg.catalog_limit, 493);
        assert_eq!(cfg.max_id, 493);

        let cfg = Config::from_cli(&parse(&["--limit", "493", "--max-id", "151"])).unwrap();
        assert_eq!(cfg.max_id, 151);
    }

    #[test]
    fn flags_map_onto_config() {
        let cfg = Config::from_cli(&parse(&[
            "--skip-precheck",
            "--no-sprites",
            "--filter",
            "number",
            "--api-base",
            "http://127.0.0.1:9000/api/v2/",
        ]))
        .unwrap();
        assert!(!cfg.precheck);
        assert!(!cfg.sprites);
        assert_eq!(cfg.default_filter, FilterMode::ByNumber);
        assert_eq!(cfg.api_base, "http://127.0.0.1:9000/api/v2");
    }

    #[test]
    fn rejects_zero_limit() {
        let err = Config::from_cli(&parse(&["--limit", "0"])).unwrap_err();
        assert_eq!(err, ConfigError::ZeroBound { name: "limit" });
    }

    #[test]
    fn rejects_template_without_placeholder() {
        let err = Config::from_cli(&parse(&["--detail-sprite", "https://x/sprite.png"])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingPlaceholder { name: "detail-sprite", .. }
        ));
    }

    #[test]
    fn rejects_unparseable_api_base() {
        let err = Config::from_cli(&parse(&["--api-base", "not a url"])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidApiBase("not a url".into()));
    }

    #[test]
    fn templates_substitute_id() {
        let cfg = Config::default();
        assert!(sprite_url(&cfg.list_sprite_template, 25).ends_with("/pokemon/25.png"));
        assert!(sprite_url(&cfg.detail_sprite_template, 7).ends_with("/official-artwork/7.png"));
    }
}
