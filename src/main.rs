//! Pokemon detail screen TUI

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokedex_detail::action::Action;
use pokedex_detail::components::{Component, DetailView, DetailViewProps};
use pokedex_detail::effect::Effect;
use pokedex_detail::kitty_backend::{self, KittyBackend};
use pokedex_detail::logging;
use pokedex_detail::reducer::reducer;
use pokedex_detail::repository::{HttpCache, PokeApiClient, API_BASE};
use pokedex_detail::state::{AppState, ArtworkMode, TICK_MS};
use pokedex_detail::tasks::{self, Services};
use pokedex_detail::theme::{Rgb, ThemeColors};
use ratatui::{layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};

/// Pokemon detail screen
#[derive(Parser, Debug)]
#[command(name = "pokedex-detail")]
#[command(about = "Detail screen for a single Pokemon, fetched from PokeAPI")]
struct Args {
    /// National dex number to show
    #[arg(long, default_value = "1")]
    id: u32,

    /// Screen background (#RRGGBB). Derived from the artwork when omitted.
    #[arg(long)]
    background: Option<Rgb>,

    /// Text color on the background (#RRGGBB). Picked by contrast when omitted.
    #[arg(long, requires = "background")]
    on_background: Option<Rgb>,

    /// How the artwork is drawn
    #[arg(long, value_enum, default_value = "kitty")]
    artwork: ArtworkMode,

    /// PokeAPI base URL
    #[arg(long, default_value = API_BASE)]
    api_base: String,

    /// Response cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Disable the on-disk response cache
    #[arg(long)]
    no_cache: bool,

    /// Append tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn theme(&self) -> Option<ThemeColors> {
        let background = self.background?;
        Some(match self.on_background {
            Some(on_background) => ThemeColors::new(background, on_background),
            None => ThemeColors::from_background(background),
        })
    }

    fn services(&self) -> Services {
        let cache = (!self.no_cache).then(|| {
            HttpCache::new(
                self.cache_dir
                    .clone()
                    .unwrap_or_else(HttpCache::default_root),
            )
        });
        let client = Arc::new(PokeApiClient::new(self.api_base.clone(), cache));
        Services::new(client.clone(), client)
    }
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DetailComponentId {
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DetailContext {
    Main,
}

impl EventRoutingState<DetailComponentId, DetailContext> for AppState {
    fn focused(&self) -> Option<DetailComponentId> {
        Some(DetailComponentId::Detail)
    }

    fn modal(&self) -> Option<DetailComponentId> {
        None
    }

    fn binding_context(&self, _id: DetailComponentId) -> DetailContext {
        DetailContext::Main
    }

    fn default_context(&self) -> DetailContext {
        DetailContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref())?;

    let colors = args.theme();
    let services = args.services();
    let (id, artwork) = (args.id, args.artwork);
    tracing::info!(id, ?artwork, api_base = %args.api_base, "starting");

    let debug = DebugSession::new(args.debug);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(id, colors, artwork))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = KittyBackend::new(stdout, kitty_backend::placement_queue());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, services).await;

    kitty_backend::clear();
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

struct DetailUi {
    view: DetailView,
}

impl DetailUi {
    fn new() -> Self {
        Self { view: DetailView }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<DetailComponentId>,
    ) {
        event_ctx.set_component_area(DetailComponentId::Detail, area);
        let props = DetailViewProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.view.render(frame, area, props);
    }

    fn handle_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = DetailViewProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.view.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    services: Services,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DetailUi::new()));
    let mut bus: EventBus<AppState, Action, DetailComponentId, DetailContext> = EventBus::new();
    let keybindings: Keybindings<DetailContext> = Keybindings::new();

    let ui_detail = Rc::clone(&ui);
    bus.register(DetailComponentId::Detail, move |event, state| {
        ui_detail.borrow_mut().handle_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::PokemonFetch),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &services),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: &Services) {
    match effect {
        Effect::FetchPokemon { id } => {
            let repository = Arc::clone(&services.repository);
            ctx.tasks().spawn(
                TaskKey::new("pokemon"),
                tasks::fetch_pokemon(repository, id),
            );
        }
        Effect::LoadArtwork { url } => {
            let images = Arc::clone(&services.images);
            ctx.tasks()
                .spawn(TaskKey::new("artwork"), tasks::load_artwork(images, url));
        }
    }
}
