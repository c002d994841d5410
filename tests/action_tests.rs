//! Action and state tests using TestHarness

use pokedex_detail::{
    action::Action,
    components::{Component, DetailView, DetailViewProps},
    effect::Effect,
    reducer::reducer,
    state::{AppState, ArtworkMode, Pokemon, FADE_STEPS},
    theme::{Rgb, ThemeColors},
};
use tui_dispatch::testing::*;
use tui_dispatch::{assert_emitted, assert_not_emitted, EffectStore, NumericComponentId};

fn bulbasaur() -> Pokemon {
    Pokemon {
        id: 1,
        name: "bulbasaur".into(),
        types: vec!["grass".into(), "poison".into()],
        artwork_url: Some("https://img.example/1.png".into()),
    }
}

#[test]
fn test_reducer_fetch_is_one_shot() {
    let mut store = EffectStore::new(AppState::new(1, None, ArtworkMode::Blocks), reducer);

    assert!(store.state().pokemon.is_loading());
    assert!(!store.state().activated);

    let result = store.dispatch(Action::PokemonFetch);
    assert!(result.changed);
    assert_eq!(result.effects, vec![Effect::FetchPokemon { id: 1 }]);

    // A second activation must not issue another request
    let result = store.dispatch(Action::PokemonFetch);
    assert!(!result.changed);
    assert!(result.effects.is_empty());
}

#[test]
fn test_reducer_load_requests_artwork() {
    let mut store = EffectStore::new(AppState::new(1, None, ArtworkMode::Blocks), reducer);

    store.dispatch(Action::PokemonFetch);
    let result = store.dispatch(Action::PokemonDidLoad(bulbasaur()));

    assert!(store.state().pokemon.is_loaded());
    assert!(store.state().artwork.is_loading());
    assert_eq!(
        result.effects,
        vec![Effect::LoadArtwork {
            url: "https://img.example/1.png".into()
        }]
    );
}

#[test]
fn test_reducer_result_after_resolution_is_ignored() {
    let mut store = EffectStore::new(AppState::new(1, None, ArtworkMode::Blocks), reducer);

    store.dispatch(Action::PokemonFetch);
    store.dispatch(Action::PokemonDidError("timeout".into()));
    let result = store.dispatch(Action::PokemonDidLoad(bulbasaur()));

    assert!(!result.changed);
    assert!(store.state().pokemon.is_failed());
}

#[test]
fn test_reducer_tick_idle_is_unchanged() {
    let colors = ThemeColors::from_background(Rgb::new(120, 200, 80));
    let state = AppState {
        pokemon: tui_dispatch::DataResource::Failed("gone".into()),
        ..AppState::new(1, Some(colors), ArtworkMode::Blocks)
    };
    let mut store = EffectStore::new(state, reducer);

    let result = store.dispatch(Action::Tick);
    assert!(!result.changed);
    assert_eq!(store.state().fade_step, 0);
    assert!(FADE_STEPS > 0);
}

#[test]
fn test_component_keyboard_events() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut component = DetailView;

    let actions = harness.send_keys::<NumericComponentId, _, _>("q", |state, event| {
        let props = DetailViewProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(1);
    actions.assert_first(Action::Quit);
}

#[test]
fn test_component_ignores_when_unfocused() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut component = DetailView;

    let actions = harness.send_keys::<NumericComponentId, _, _>("q r", |state, event| {
        let props = DetailViewProps {
            state,
            is_focused: false,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_empty();
}

#[test]
fn test_action_categories() {
    let did_load = Action::PokemonDidLoad(Pokemon::default());
    let tick = Action::Tick;

    assert_eq!(did_load.category(), Some("pokemon_did"));
    assert_eq!(tick.category(), None);

    assert!(did_load.is_pokemon_did());
}

#[test]
fn test_harness_emit_and_drain() {
    let mut harness = TestHarness::<(), Action>::new(());

    harness.emit(Action::PokemonFetch);
    harness.emit(Action::PokemonDidError("oops".into()));
    harness.emit(Action::Tick);

    let actions = harness.drain_emitted();
    actions.assert_count(3);
}

#[test]
fn test_assert_emitted_macro() {
    let actions = vec![Action::PokemonFetch, Action::PokemonDidLoad(bulbasaur())];

    assert_emitted!(actions, Action::PokemonFetch);
    assert_emitted!(actions, Action::PokemonDidLoad(_));
    assert_not_emitted!(actions, Action::Quit);
    assert_not_emitted!(actions, Action::PokemonDidError(_));
}
