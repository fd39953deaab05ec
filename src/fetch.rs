use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FetchError;
use crate::models::{CatalogEntry, CatalogResponse, DetailPayload, EntityRecord, SpeciesRecord};

/// Thin client over the PokeAPI v2 endpoints the browser reads.
#[derive(Debug, Clone)]
pub struct PokeApi {
    client: reqwest::Client,
    base: String,
}

impl PokeApi {
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dexbrowse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    pub async fn fetch_catalog(&self, limit: u32) -> Result<Vec<CatalogEntry>, FetchError> {
        let url = format!("{}/pokemon?limit={}", self.base, limit);
        let list: CatalogResponse = self.get_json(&url).await?;
        debug!(count = list.results.len(), limit, "catalog fetched");
        Ok(list.results)
    }

    pub async fn fetch_record(&self, id: u32) -> Result<EntityRecord, FetchError> {
        self.get_json(&format!("{}/pokemon/{}", self.base, id)).await
    }

    pub async fn fetch_species(&self, id: u32) -> Result<SpeciesRecord, FetchError> {
        self.get_json(&format!("{}/pokemon-species/{}", self.base, id))
            .await
    }

    /// Record and species fetched concurrently; either failure fails the load.
    pub async fn load_detail(&self, id: u32) -> Result<DetailPayload, FetchError> {
        let (record, species) = tokio::try_join!(self.fetch_record(id), self.fetch_species(id))?;
        debug!(id, name = %record.name, "detail fetched");
        Ok(DetailPayload { record, species })
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        Ok(bytes.to_vec())
    }
}
