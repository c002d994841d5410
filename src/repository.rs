//! PokeAPI client with a write-through disk cache.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::state::Pokemon;

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
const CACHE_APP_DIR: &str = "pokedex-detail";
const ARTWORK_POINTER: &str = "/other/official-artwork/front_default";

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("pokemon #{0} not found")]
    NotFound(u32),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolves Pokemon records by national dex number.
#[async_trait]
pub trait PokemonRepository: Send + Sync {
    async fn pokemon(&self, id: u32) -> Result<Pokemon, RepositoryError>;
}

/// Loads raw image bytes for artwork URLs.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn image_bytes(&self, url: &str) -> Result<Vec<u8>, RepositoryError>;

    /// Drops any stored copy of `url` so the next load goes to the network.
    async fn evict(&self, _url: &str) {}
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    types: Vec<PokemonTypeSlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

/// Parses a `/pokemon/{id}` body. Type order is preserved.
pub fn parse_pokemon(bytes: &[u8]) -> Result<Pokemon, RepositoryError> {
    let response: PokemonResponse = serde_json::from_slice(bytes)?;
    Ok(Pokemon {
        id: response.id,
        name: response.name,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        artwork_url: pointer_string(&response.sprites, ARTWORK_POINTER),
    })
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Content-addressed response cache: `<root>/<kind>/<sha256(url)>`.
#[derive(Clone, Debug)]
pub struct HttpCache {
    root: PathBuf,
}

impl HttpCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform cache dir, falling back to `./.cache`.
    pub fn default_root() -> PathBuf {
        dirs_next::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join(CACHE_APP_DIR)
    }

    pub fn path(&self, kind: &str, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hex::encode(hasher.finalize());
        self.root.join(kind).join(digest)
    }

    async fn read(&self, path: &Path) -> Option<Vec<u8>> {
        fs::read(path).await.ok()
    }

    async fn write(&self, path: &Path, bytes: &[u8]) {
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent).await {
                tracing::debug!(path = %parent.display(), %err, "cache dir not created");
                return;
            }
        }
        if let Err(err) = fs::write(path, bytes).await {
            tracing::debug!(path = %path.display(), %err, "cache write failed");
        }
    }

    async fn evict(&self, path: &Path) {
        if let Err(err) = fs::remove_file(path).await {
            tracing::debug!(path = %path.display(), %err, "cache evict failed");
        }
    }
}

/// `PokemonRepository` + `ImageSource` backed by PokeAPI.
#[derive(Clone, Debug)]
pub struct PokeApiClient {
    base_url: String,
    client: reqwest::Client,
    cache: Option<HttpCache>,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>, cache: Option<HttpCache>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            cache,
        }
    }

    pub fn pokemon_url(&self, id: u32) -> String {
        format!("{}/pokemon/{id}", self.base_url)
    }

    async fn fetch_bytes_cached(&self, url: &str) -> Result<Vec<u8>, RepositoryError> {
        let cache_path = self.cache.as_ref().map(|cache| cache.path("http", url));
        if let (Some(cache), Some(path)) = (&self.cache, &cache_path) {
            if let Some(bytes) = cache.read(path).await {
                tracing::debug!(%url, "cache hit");
                return Ok(bytes);
            }
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RepositoryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?.to_vec();
        if let (Some(cache), Some(path)) = (&self.cache, &cache_path) {
            cache.write(path, &bytes).await;
        }
        Ok(bytes)
    }
}

#[async_trait]
impl PokemonRepository for PokeApiClient {
    async fn pokemon(&self, id: u32) -> Result<Pokemon, RepositoryError> {
        let url = self.pokemon_url(id);
        let bytes = match self.fetch_bytes_cached(&url).await {
            Err(RepositoryError::Status { status: 404, .. }) => {
                return Err(RepositoryError::NotFound(id))
            }
            other => other?,
        };
        match parse_pokemon(&bytes) {
            Ok(pokemon) => Ok(pokemon),
            Err(err) => {
                if let Some(cache) = &self.cache {
                    cache.evict(&cache.path("http", &url)).await;
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl ImageSource for PokeApiClient {
    async fn image_bytes(&self, url: &str) -> Result<Vec<u8>, RepositoryError> {
        self.fetch_bytes_cached(url).await
    }

    async fn evict(&self, url: &str) {
        if let Some(cache) = &self.cache {
            cache.evict(&cache.path("http", url)).await;
        }
    }
}
