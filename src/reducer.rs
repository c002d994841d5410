//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, FADE_STEPS};
use crate::theme::ThemeColors;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Pokemon actions =====
        Action::PokemonFetch => {
            if state.activated {
                return DispatchResult::unchanged();
            }
            state.activated = true;
            state.pokemon = DataResource::Loading;
            DispatchResult::changed_with(Effect::FetchPokemon {
                id: state.pokemon_id,
            })
        }

        Action::PokemonDidLoad(pokemon) => {
            if !is_pending(&state.pokemon) {
                return DispatchResult::unchanged();
            }
            let artwork_url = pokemon.artwork_url.clone();
            state.pokemon = DataResource::Loaded(pokemon);
            match artwork_url {
                Some(url) => {
                    state.artwork = DataResource::Loading;
                    DispatchResult::changed_with(Effect::LoadArtwork { url })
                }
                None => DispatchResult::changed(),
            }
        }

        Action::PokemonDidError(reason) => {
            if !is_pending(&state.pokemon) {
                return DispatchResult::unchanged();
            }
            state.pokemon = DataResource::Failed(reason);
            DispatchResult::changed()
        }

        // ===== Artwork actions =====
        Action::ArtworkDidLoad(artwork) => {
            if !state.artwork.is_loading() {
                return DispatchResult::unchanged();
            }
            if state.colors_from_artwork {
                if let Some(dominant) = artwork.dominant {
                    state.colors = ThemeColors::from_background(dominant);
                }
            }
            state.artwork = DataResource::Loaded(artwork);
            state.fade_step = 0;
            DispatchResult::changed()
        }

        Action::ArtworkDidError(reason) => {
            if !state.artwork.is_loading() {
                return DispatchResult::unchanged();
            }
            state.artwork = DataResource::Failed(reason);
            DispatchResult::changed()
        }

        // ===== Global actions =====
        Action::Tick => {
            if !state.is_animating() {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            if state.is_fading() {
                state.fade_step = (state.fade_step + 1).min(FADE_STEPS);
            }
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn is_pending<T>(resource: &DataResource<T>) -> bool {
    matches!(resource, DataResource::Loading | DataResource::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::Artwork;
    use crate::state::{ArtworkMode, Pokemon};
    use crate::theme::Rgb;
    use pretty_assertions::assert_eq;

    fn bulbasaur(artwork_url: Option<&str>) -> Pokemon {
        Pokemon {
            id: 1,
            name: "bulbasaur".into(),
            types: vec!["grass".into(), "poison".into()],
            artwork_url: artwork_url.map(str::to_string),
        }
    }

    fn green_artwork() -> Artwork {
        Artwork::from_rgba(1, 1, &[120, 200, 80, 255])
    }

    #[test]
    fn test_fetch_issues_one_effect_per_activation() {
        let mut state = AppState::new(7, None, ArtworkMode::Blocks);

        let first = reducer(&mut state, Action::PokemonFetch);
        assert!(first.changed);
        assert_eq!(first.effects, vec![Effect::FetchPokemon { id: 7 }]);
        assert!(state.pokemon.is_loading());

        let second = reducer(&mut state, Action::PokemonFetch);
        assert!(!second.changed);
        assert!(second.effects.is_empty());
    }

    #[test]
    fn test_load_requests_artwork() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PokemonFetch);

        let result = reducer(
            &mut state,
            Action::PokemonDidLoad(bulbasaur(Some("https://example.test/1.png"))),
        );

        assert!(result.changed);
        assert_eq!(state.pokemon.data().map(|p| p.name.as_str()), Some("bulbasaur"));
        assert!(state.artwork.is_loading());
        assert_eq!(
            result.effects,
            vec![Effect::LoadArtwork {
                url: "https://example.test/1.png".into()
            }]
        );
    }

    #[test]
    fn test_load_without_artwork_url() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PokemonFetch);

        let result = reducer(&mut state, Action::PokemonDidLoad(bulbasaur(None)));

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert!(state.artwork.is_empty());
    }

    #[test]
    fn test_error_keeps_reason() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PokemonFetch);

        reducer(&mut state, Action::PokemonDidError("HTTP 500".into()));

        assert!(state.pokemon.is_failed());
        assert_eq!(state.pokemon.error(), Some("HTTP 500"));
    }

    #[test]
    fn test_resolved_states_are_terminal() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PokemonFetch);
        reducer(&mut state, Action::PokemonDidError("offline".into()));

        let late = reducer(&mut state, Action::PokemonDidLoad(bulbasaur(None)));
        assert!(!late.changed);
        assert!(state.pokemon.is_failed());

        let mut state = AppState::default();
        reducer(&mut state, Action::PokemonFetch);
        reducer(&mut state, Action::PokemonDidLoad(bulbasaur(None)));

        let late = reducer(&mut state, Action::PokemonDidError("late".into()));
        assert!(!late.changed);
        assert!(state.pokemon.is_loaded());
    }

    #[test]
    fn test_artwork_sets_colors_when_not_supplied() {
        let mut state = AppState::new(1, None, ArtworkMode::Blocks);
        state.artwork = DataResource::Loading;

        reducer(&mut state, Action::ArtworkDidLoad(green_artwork()));

        assert_eq!(state.colors.background, Rgb::new(120, 200, 80));
        assert_eq!(state.fade_step, 0);
        assert!(state.artwork.is_loaded());
    }

    #[test]
    fn test_artwork_keeps_supplied_colors() {
        let colors = ThemeColors::new(Rgb::new(1, 2, 3), Rgb::new(250, 250, 250));
        let mut state = AppState::new(1, Some(colors), ArtworkMode::Blocks);
        state.artwork = DataResource::Loading;

        reducer(&mut state, Action::ArtworkDidLoad(green_artwork()));

        assert_eq!(state.colors, colors);
    }

    #[test]
    fn test_artwork_error_is_silent() {
        let mut state = AppState::default();
        state.artwork = DataResource::Loading;

        let result = reducer(&mut state, Action::ArtworkDidError("404".into()));

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert!(state.artwork.is_failed());
    }

    #[test]
    fn test_tick_animates_spinner_while_loading() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Tick);
        assert!(result.changed);
        assert_eq!(state.tick, 1);
    }

    #[test]
    fn test_tick_runs_fade_to_completion_then_stops() {
        let mut state = AppState {
            pokemon: DataResource::Loaded(bulbasaur(None)),
            artwork: DataResource::Loaded(green_artwork()),
            ..Default::default()
        };

        for step in 1..=FADE_STEPS {
            assert!(reducer(&mut state, Action::Tick).changed);
            assert_eq!(state.fade_step, step);
        }
        assert_eq!(state.artwork_opacity(), 1.0);

        let idle = reducer(&mut state, Action::Tick);
        assert!(!idle.changed);
        assert_eq!(state.fade_step, FADE_STEPS);
    }

    #[test]
    fn test_tick_idle_after_error() {
        let mut state = AppState {
            pokemon: DataResource::Failed("nope".into()),
            ..Default::default()
        };
        assert!(!reducer(&mut state, Action::Tick).changed);
    }
}
