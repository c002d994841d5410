//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::artwork::Artwork;
use crate::theme::ThemeColors;

/// Result of the one-shot detail fetch: Loading, Loaded (success) or Failed.
pub type FetchResult<T> = DataResource<T>;

/// A resolved Pokemon record, immutable once fetched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Pokemon {
    pub id: u32,
    /// Raw API name, e.g. `"mr-mime"`.
    pub name: String,
    /// Type names in API slot order.
    pub types: Vec<String>,
    pub artwork_url: Option<String>,
}

/// How the artwork is put on screen.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ArtworkMode {
    /// Kitty graphics protocol, drawn by the kitty backend.
    #[default]
    Kitty,
    /// Half-block cells, any truecolor terminal.
    Blocks,
}

/// Timer resolution for the spinner and the artwork fade.
pub const TICK_MS: u64 = 50;
pub const FADE_DURATION_MS: u64 = 300;
pub const FADE_STEPS: u8 = (FADE_DURATION_MS / TICK_MS) as u8;

#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "Pokemon", label = "Id")]
    pub pokemon_id: u32,

    /// Fetch lifecycle: Loading → Loaded/Failed, once.
    #[debug(section = "Pokemon", label = "Data", debug_fmt)]
    pub pokemon: FetchResult<Pokemon>,

    /// Set when the fetch has been issued for this screen.
    #[debug(section = "Pokemon", label = "Activated")]
    pub activated: bool,

    #[debug(section = "Theme", label = "Colors", debug_fmt)]
    pub colors: ThemeColors,

    /// Colors follow the artwork's dominant color once it loads.
    #[debug(section = "Theme", label = "From artwork")]
    pub colors_from_artwork: bool,

    #[debug(skip)]
    pub artwork: DataResource<Artwork>,

    #[debug(section = "Artwork", label = "Mode", debug_fmt)]
    pub artwork_mode: ArtworkMode,

    /// 0..=FADE_STEPS once the artwork is loaded.
    #[debug(section = "Artwork", label = "Fade step")]
    pub fade_step: u8,

    #[debug(skip)]
    pub tick: u32,
}

impl AppState {
    /// Fresh screen for `pokemon_id`. `colors` of `None` means "derive
    /// from the artwork".
    pub fn new(pokemon_id: u32, colors: Option<ThemeColors>, artwork_mode: ArtworkMode) -> Self {
        Self {
            pokemon_id,
            pokemon: DataResource::Loading,
            activated: false,
            colors_from_artwork: colors.is_none(),
            colors: colors.unwrap_or_default(),
            artwork: DataResource::Empty,
            artwork_mode,
            fade_step: 0,
            tick: 0,
        }
    }

    /// Artwork opacity in `0.0..=1.0` for the current fade step.
    pub fn artwork_opacity(&self) -> f32 {
        if FADE_STEPS == 0 {
            return 1.0;
        }
        self.fade_step.min(FADE_STEPS) as f32 / FADE_STEPS as f32
    }

    pub fn is_fading(&self) -> bool {
        self.artwork.is_loaded() && self.fade_step < FADE_STEPS
    }

    /// Whether `Tick` has anything to animate.
    pub fn is_animating(&self) -> bool {
        matches!(self.pokemon, DataResource::Loading | DataResource::Empty) || self.is_fading()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(1, None, ArtworkMode::default())
    }
}
