use crossterm::event::KeyCode;
use ratatui::prelude::{Frame, Rect};
use ratatui::style::Style;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{Component, DetailScreen, DetailScreenProps};
use crate::action::Action;
use crate::state::AppState;

/// Props for DetailView - read-only view of state
pub struct DetailViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Root component: the detail screen with a one-line help bar over its last row.
#[derive(Default)]
pub struct DetailView;

impl Component<Action> for DetailView {
    type Props<'a> = DetailViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: DetailViewProps<'_>) {
        // The screen takes the whole area so the backdrop runs under the help bar.
        let mut screen = DetailScreen;
        screen.render(frame, area, DetailScreenProps { state: props.state });

        let help_row = Rect {
            y: area.bottom().saturating_sub(1),
            height: area.height.min(1),
            ..area
        };
        let text = Style::default().fg(props.state.colors.on_background.to_color());
        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            help_row,
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[StatusBarHint::new("q", "quit")]),
                right: StatusBarSection::empty(),
                // No bg, so the backdrop shows through.
                style: StatusBarStyle {
                    text,
                    hint_label: text,
                    ..StatusBarStyle::default()
                },
                is_focused: false,
            },
        );
    }
}
