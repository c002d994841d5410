use ratatui::{layout::Rect, Frame};

use super::{Component, CELL_ASPECT};
use crate::action::Action;
use crate::artwork::Artwork;
use crate::kitty_backend;
use crate::state::ArtworkMode;

/// Artwork overlay. Draws nothing until the artwork has loaded.
pub struct ArtworkView;

pub struct ArtworkViewProps<'a> {
    pub artwork: Option<&'a Artwork>,
    /// Fade-in progress, `0.0..=1.0`.
    pub opacity: f32,
    pub mode: ArtworkMode,
}

impl Component<Action> for ArtworkView {
    type Props<'a> = ArtworkViewProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let area = area.intersection(frame.area());
        let Some(artwork) = props.artwork.filter(|_| props.opacity > 0.0 && !area.is_empty()) else {
            if props.mode == ArtworkMode::Kitty {
                kitty_backend::clear();
            }
            return;
        };

        let (cols, rows) = fit_cells(artwork, area.width, area.height);
        let target = Rect {
            x: area.x + area.width.saturating_sub(cols) / 2,
            y: area.y + area.height.saturating_sub(rows) / 2,
            width: cols,
            height: rows,
        };

        match props.mode {
            ArtworkMode::Kitty => match artwork.kitty_sequence(cols, rows, props.opacity) {
                Ok(sequence) => kitty_backend::place(target.x, target.y, sequence),
                Err(err) => {
                    tracing::debug!(error = %err, "artwork not drawable");
                    kitty_backend::clear();
                }
            },
            ArtworkMode::Blocks => {
                if let Err(err) = artwork.render_blocks(frame.buffer_mut(), target, props.opacity) {
                    tracing::debug!(error = %err, "artwork not drawable");
                }
            }
        }
    }
}

/// Largest cell box inside `max_cols`×`max_rows` that keeps the image ratio.
pub fn fit_cells(artwork: &Artwork, max_cols: u16, max_rows: u16) -> (u16, u16) {
    if max_cols == 0 || max_rows == 0 || artwork.height == 0 {
        return (max_cols, max_rows);
    }
    let ratio = artwork.width as f32 / artwork.height as f32;
    let aspect = CELL_ASPECT as f32;
    let cols_for_rows = ratio * max_rows as f32 * aspect;
    if cols_for_rows <= max_cols as f32 {
        let cols = cols_for_rows.round().max(1.0) as u16;
        return (cols.min(max_cols), max_rows);
    }
    let rows = (max_cols as f32 / (ratio * aspect)).round().max(1.0) as u16;
    (max_cols, rows.min(max_rows))
}
