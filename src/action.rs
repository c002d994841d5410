//! Actions: intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::artwork::Artwork;
use crate::state::Pokemon;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Pokemon category =====
    /// Intent: screen activated, fetch the record (once)
    PokemonFetch,

    /// Result: record resolved
    PokemonDidLoad(Pokemon),

    /// Result: repository failed; reason kept for debugging only
    PokemonDidError(String),

    // ===== Artwork category =====
    /// Result: artwork downloaded and decoded
    ArtworkDidLoad(Artwork),

    /// Result: artwork unavailable (rendered as nothing)
    ArtworkDidError(String),

    // ===== Uncategorized (global) =====
    /// Timer for the spinner and the artwork fade
    Tick,

    Quit,
}
