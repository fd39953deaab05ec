use serde::Deserialize;

use crate::error::IdParseError;

/// One summary row of the catalog listing (`{ name, url }` on the wire).
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    #[serde(rename = "url")]
    pub reference_url: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

impl CatalogEntry {
    pub fn id(&self) -> Result<u32, IdParseError> {
        parse_entry_id(&self.reference_url)
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub results: Vec<CatalogEntry>,
}

/// Extract the numeric resource id from a catalog reference URL.
///
/// PokeAPI addresses resources as `{api}/pokemon/{id}/`, so the id is the
/// last non-empty path segment: `https://pokeapi.co/api/v2/pokemon/25/`
/// yields `25`. Ids are positive; `0` is reported as [`IdParseError::NotNumeric`].
pub fn parse_entry_id(url: &str) -> Result<u32, IdParseError> {
    let parsed =
        reqwest::Url::parse(url).map_err(|_| IdParseError::InvalidUrl(url.to_string()))?;
    let segment = parsed
        .path_segments()
        .and_then(|segs| segs.filter(|s| !s.is_empty()).last())
        .ok_or_else(|| IdParseError::MissingSegment(url.to_string()))?;
    match segment.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(IdParseError::NotNumeric {
            url: url.to_string(),
            segment: segment.to_string(),
        }),
    }
}

/// Full record for a single Pokémon, flattened from the API's nested shape.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(from = "wire::Pokemon")]
pub struct EntityRecord {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    /// Hectograms.
    pub weight: u32,
    /// Decimeters.
    pub height: u32,
    pub abilities: Vec<String>,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Stat {
    pub name: String,
    pub base: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(from = "wire::Species")]
pub struct SpeciesRecord {
    pub flavor_text_entries: Vec<FlavorText>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlavorText {
    pub language: String,
    pub text: String,
}

impl SpeciesRecord {
    /// First English flavor text, or an empty string when there is none.
    pub fn english_flavor_text(&self) -> &str {
        self.flavor_text_entries
            .iter()
            .find(|e| e.language == "en")
            .map(|e| e.text.as_str())
            .unwrap_or("")
    }
}

/// Both halves of a detail load; only ever built when both requests succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPayload {
    pub record: EntityRecord,
    pub species: SpeciesRecord,
}

/// Raw PokeAPI response shapes.
mod wire {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Named {
        pub name: String,
    }

    #[derive(Deserialize)]
    pub struct TypeSlot {
        #[serde(rename = "type")]
        pub kind: Named,
    }

    #[derive(Deserialize)]
    pub struct AbilitySlot {
        pub ability: Named,
    }

    #[derive(Deserialize)]
    pub struct StatSlot {
        pub base_stat: u32,
        pub stat: Named,
    }

    #[derive(Deserialize)]
    pub struct Pokemon {
        pub id: u32,
        pub name: String,
        #[serde(default)]
        pub types: Vec<TypeSlot>,
        #[serde(default)]
        pub weight: u32,
        #[serde(default)]
        pub height: u32,
        #[serde(default)]
        pub abilities: Vec<AbilitySlot>,
        #[serde(default)]
        pub stats: Vec<StatSlot>,
    }

    #[derive(Deserialize)]
    pub struct FlavorEntry {
        pub flavor_text: String,
        pub language: Named,
    }

    #[derive(Deserialize)]
    pub struct Species {
        #[serde(default)]
        pub flavor_text_entries: Vec<FlavorEntry>,
    }
}

impl From<wire::Pokemon> for EntityRecord {
    fn from(p: wire::Pokemon) -> Self {
        Self {
            id: p.id,
            name: p.name,
            types: p.types.into_iter().map(|t| t.kind.name).collect(),
            weight: p.weight,
            height: p.height,
            abilities: p.abilities.into_iter().map(|a| a.ability.name).collect(),
            stats: p
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    base: s.base_stat,
                })
                .collect(),
        }
    }
}

impl From<wire::Species> for SpeciesRecord {
    fn from(s: wire::Species) -> Self {
        Self {
            flavor_text_entries: s
                .flavor_text_entries
                .into_iter()
                .map(|e| FlavorText {
                    language: e.language.name,
                    text: e.flavor_text,
                })
                .collect(),
        }
    }
}
