//! Async bodies of the effects. Each resolves to the action that reports
//! its outcome, so the effect handler only has to spawn them.

use std::sync::Arc;

use crate::action::Action;
use crate::artwork::Artwork;
use crate::repository::{ImageSource, PokemonRepository};

/// Collaborators the effect handler is constructed with.
#[derive(Clone)]
pub struct Services {
    pub repository: Arc<dyn PokemonRepository>,
    pub images: Arc<dyn ImageSource>,
}

impl Services {
    pub fn new(repository: Arc<dyn PokemonRepository>, images: Arc<dyn ImageSource>) -> Self {
        Self { repository, images }
    }
}

pub async fn fetch_pokemon(repository: Arc<dyn PokemonRepository>, id: u32) -> Action {
    tracing::info!(id, "fetching pokemon");
    match repository.pokemon(id).await {
        Ok(pokemon) => {
            tracing::info!(id, name = %pokemon.name, types = ?pokemon.types, "pokemon loaded");
            Action::PokemonDidLoad(pokemon)
        }
        Err(err) => {
            tracing::warn!(id, error = %err, "pokemon fetch failed");
            Action::PokemonDidError(err.to_string())
        }
    }
}

pub async fn load_artwork(images: Arc<dyn ImageSource>, url: String) -> Action {
    let bytes = match images.image_bytes(&url).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(%url, error = %err, "artwork download failed");
            return Action::ArtworkDidError(err.to_string());
        }
    };
    let decoded = tokio::task::spawn_blocking(move || Artwork::decode(&bytes)).await;
    match decoded {
        Ok(Ok(artwork)) => {
            tracing::debug!(%url, width = artwork.width, height = artwork.height, "artwork decoded");
            Action::ArtworkDidLoad(artwork)
        }
        Ok(Err(err)) => {
            tracing::warn!(%url, error = %err, "artwork decode failed");
            images.evict(&url).await;
            Action::ArtworkDidError(err.to_string())
        }
        Err(err) => Action::ArtworkDidError(err.to_string()),
    }
}
