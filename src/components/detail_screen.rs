use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::DataResource;

use super::{
    Backdrop, BackdropProps, Component, DetailContent, DetailContentProps, CONTENT_PADDING,
};
use crate::action::Action;
use crate::kitty_backend;
use crate::state::{AppState, ArtworkMode, Pokemon};

/// The only text on the failure screen.
pub const ERROR_LABEL: &str = "Error";

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct DetailScreenProps<'a> {
    pub state: &'a AppState,
}

/// Backdrop plus whatever the fetch has produced so far.
#[derive(Default)]
pub struct DetailScreen;

/// What the body shows. Exactly one per frame.
enum ScreenView<'a> {
    Loading,
    Success(&'a Pokemon),
    Error,
}

impl<'a> ScreenView<'a> {
    fn of(state: &'a AppState) -> Self {
        match &state.pokemon {
            DataResource::Loaded(pokemon) => ScreenView::Success(pokemon),
            DataResource::Failed(_) => ScreenView::Error,
            DataResource::Loading | DataResource::Empty => ScreenView::Loading,
        }
    }
}

impl Component<Action> for DetailScreen {
    type Props<'a> = DetailScreenProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let mut backdrop = Backdrop;
        backdrop.render(
            frame,
            area,
            BackdropProps {
                colors: state.colors,
            },
        );

        let view = ScreenView::of(state);
        if state.artwork_mode == ArtworkMode::Kitty && !matches!(view, ScreenView::Success(_)) {
            kitty_backend::clear();
        }

        let text = Style::default().fg(state.colors.on_background.to_color());
        match view {
            ScreenView::Loading => {
                let glyph = SPINNER_FRAMES[state.tick as usize % SPINNER_FRAMES.len()];
                render_label(frame, area, Line::styled(glyph, text));
            }
            ScreenView::Error => {
                let label = Line::styled(ERROR_LABEL, text.add_modifier(Modifier::BOLD));
                render_label(frame, area, label);
            }
            ScreenView::Success(pokemon) => {
                let mut content = DetailContent;
                content.render(
                    frame,
                    area,
                    DetailContentProps {
                        pokemon,
                        colors: state.colors,
                        artwork: state.artwork.data(),
                        artwork_opacity: state.artwork_opacity(),
                        artwork_mode: state.artwork_mode,
                    },
                );
            }
        }
    }
}

/// One line at the content inset.
fn render_label(frame: &mut Frame, area: Rect, line: Line<'_>) {
    let (pad_x, pad_y) = CONTENT_PADDING;
    let target = Rect {
        x: area.x + pad_x,
        y: area.y + pad_y,
        width: area.width.saturating_sub(pad_x),
        height: 1,
    }
    .intersection(area);
    if !target.is_empty() {
        frame.render_widget(Paragraph::new(line), target);
    }
}
