use ratatui::{buffer::Buffer, layout::Rect, Frame};

use super::{Component, CELL_ASPECT};
use crate::action::Action;
use crate::theme::{self, Rgb, ThemeColors};

/// Emblem height in rows; width follows from the cell aspect.
pub const EMBLEM_ROWS: u16 = 14;
/// How far the emblem hangs past the right edge (columns) and top edge (rows).
pub const EMBLEM_OVERHANG: (u16, u16) = (4, 2);

/// Full-bleed gradient plus the pokeball emblem. Paints cell backgrounds
/// only, so no glyphs end up in the buffer.
pub struct Backdrop;

pub struct BackdropProps {
    pub colors: ThemeColors,
}

impl Component<Action> for Backdrop {
    type Props<'a> = BackdropProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let buf = frame.buffer_mut();
        paint_gradient(buf, area, props.colors.background);
        paint_emblem(buf, area);
    }
}

/// Background at `row`: half opacity at the top, full at the bottom.
pub fn gradient_color(background: Rgb, row: u16, height: u16) -> Rgb {
    let t = if height <= 1 {
        0.0
    } else {
        row as f32 / (height - 1) as f32
    };
    background.blend_over(theme::BASE, 0.5 + 0.5 * t)
}

fn paint_gradient(buf: &mut Buffer, area: Rect, background: Rgb) {
    let area = area.intersection(buf.area);
    for row in 0..area.height {
        let color = gradient_color(background, row, area.height).to_color();
        for col in 0..area.width {
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_bg(color);
            }
        }
    }
}

fn paint_emblem(buf: &mut Buffer, area: Rect) {
    let area = area.intersection(buf.area);
    let rows = EMBLEM_ROWS as i32;
    let cols = (EMBLEM_ROWS * CELL_ASPECT) as i32;
    let (overhang_x, overhang_y) = (EMBLEM_OVERHANG.0 as i32, EMBLEM_OVERHANG.1 as i32);
    let left = area.right() as i32 - cols + overhang_x;
    let top = area.y as i32 - overhang_y;

    for row in 0..rows {
        for col in 0..cols {
            let (x, y) = (left + col, top + row);
            if x < area.x as i32 || y < area.y as i32 || x >= area.right() as i32 || y >= area.bottom() as i32 {
                continue;
            }
            if !emblem_covers(col, row, cols, rows) {
                continue;
            }
            if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
                let under = Rgb::from_color(cell.bg).unwrap_or(theme::BASE);
                cell.set_bg(
                    theme::EMBLEM_TINT
                        .blend_over(under, theme::EMBLEM_OPACITY)
                        .to_color(),
                );
            }
        }
    }
}

/// Pokeball mask: outer ring, equator band and center button ring.
fn emblem_covers(col: i32, row: i32, cols: i32, rows: i32) -> bool {
    let dx = (col as f32 + 0.5 - cols as f32 / 2.0) / (cols as f32 / 2.0);
    let dy = (row as f32 + 0.5 - rows as f32 / 2.0) / (rows as f32 / 2.0);
    let d = (dx * dx + dy * dy).sqrt();
    if d > 1.0 {
        return false;
    }
    let ring = d >= 0.8;
    let band = dy.abs() <= 0.08 && d >= 0.36;
    let button = (0.2..=0.36).contains(&d);
    ring || band || button
}
