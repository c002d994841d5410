use artbox::{
    integrations::ratatui::ArtBox, Alignment as ArtAlignment, Color as ArtColor, Fill,
    LinearGradient, Renderer, fonts,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use super::{ArtworkView, ArtworkViewProps, Component, CELL_ASPECT, CONTENT_PADDING};
use crate::action::Action;
use crate::artwork::Artwork;
use crate::names;
use crate::state::{ArtworkMode, Pokemon};
use crate::theme::{self, Rgb, ThemeColors};

/// Fixed header height (name + badges).
pub const HEADER_HEIGHT: u16 = 14;
/// Rows reserved for the FIGlet name, ending just above the artwork.
pub const NAME_ROWS: u16 = 4;
pub const BADGE_WIDTH: u16 = 12;
/// Blank rows between stacked badges.
pub const BADGE_GAP: u16 = 1;
pub const BADGE_FILL_OPACITY: f32 = 0.2;
pub const ARTWORK_ROWS: u16 = 12;
/// Artwork top edge, measured from the top of the screen.
pub const ARTWORK_OFFSET: u16 = 5;

const CORNER_LEFT: &str = "\u{2597}";
const CORNER_RIGHT: &str = "\u{2596}";
const PILL_LEFT: &str = "\u{25d6}";
const PILL_RIGHT: &str = "\u{25d7}";

/// Static layout for a resolved Pokemon: header, badges, panel, artwork.
pub struct DetailContent;

pub struct DetailContentProps<'a> {
    pub pokemon: &'a Pokemon,
    pub colors: ThemeColors,
    pub artwork: Option<&'a Artwork>,
    pub artwork_opacity: f32,
    pub artwork_mode: ArtworkMode,
}

impl Component<Action> for DetailContent {
    type Props<'a> = DetailContentProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let header_height = HEADER_HEIGHT.min(area.height);
        let header = Rect {
            height: header_height,
            ..area
        };
        let panel = Rect {
            y: area.y + header_height,
            height: area.height - header_height,
            ..area
        };

        render_header(frame, header, props.pokemon, props.colors);
        paint_panel(frame.buffer_mut(), panel);

        // Centered horizontally, straddling the header/panel seam.
        let artwork_cols = ARTWORK_ROWS * CELL_ASPECT;
        let artwork_area = Rect {
            x: area.x + area.width.saturating_sub(artwork_cols) / 2,
            y: area.y + ARTWORK_OFFSET.min(area.height),
            width: artwork_cols.min(area.width),
            height: ARTWORK_ROWS,
        }
        .intersection(area);

        let mut artwork = ArtworkView;
        artwork.render(
            frame,
            artwork_area,
            ArtworkViewProps {
                artwork: props.artwork,
                opacity: props.artwork_opacity,
                mode: props.artwork_mode,
            },
        );
    }
}

fn render_header(frame: &mut Frame, area: Rect, pokemon: &Pokemon, colors: ThemeColors) {
    let (pad_x, pad_y) = CONTENT_PADDING;
    let inner = Rect {
        x: area.x + pad_x.min(area.width),
        y: area.y + pad_y.min(area.height),
        width: area.width.saturating_sub(pad_x * 2),
        height: area.height.saturating_sub(pad_y),
    };
    if inner.is_empty() {
        return;
    }

    let text = Style::default()
        .fg(colors.on_background.to_color())
        .add_modifier(Modifier::BOLD);
    let name_area = Rect {
        height: NAME_ROWS.min(inner.height),
        ..inner
    };
    render_name(frame, name_area, &names::display_name(&pokemon.name), colors, text);

    // One badge per type in list order, below the name.
    let mut y = inner.y + NAME_ROWS + 1;
    for type_name in &pokemon.types {
        let badge = Rect::new(inner.x, y, BADGE_WIDTH, 1).intersection(inner);
        if badge.is_empty() {
            break;
        }
        render_badge(frame, badge, type_name, colors, text);
        y = y.saturating_add(1 + BADGE_GAP);
    }
}

/// FIGlet name in the largest font that fits, plain text when none does.
fn render_name(frame: &mut Frame, area: Rect, name: &str, colors: ThemeColors, text: Style) {
    frame.buffer_mut().set_style(area, text);
    let Rgb { r, g, b } = colors.on_background;
    let ink = ArtColor::rgb(r, g, b);
    let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
        .with_plain_fallback()
        .with_alignment(ArtAlignment::Center)
        .with_fill(Fill::Linear(LinearGradient::horizontal(ink, ink)));
    frame.render_widget(ArtBox::new(&renderer, name), area);
}

/// Pill: half-disc caps in the fill color around a filled label.
fn render_badge(frame: &mut Frame, area: Rect, type_name: &str, colors: ThemeColors, text: Style) {
    let buf = frame.buffer_mut();
    for x in area.left()..area.right() {
        let Some(cell) = buf.cell_mut((x, area.y)) else {
            continue;
        };
        let under = Rgb::from_color(cell.bg).unwrap_or(colors.background);
        let fill = colors
            .on_background
            .blend_over(under, BADGE_FILL_OPACITY)
            .to_color();
        if area.width > 2 && x == area.left() {
            cell.set_symbol(PILL_LEFT).set_fg(fill);
        } else if area.width > 2 && x + 1 == area.right() {
            cell.set_symbol(PILL_RIGHT).set_fg(fill);
        } else {
            cell.set_bg(fill);
        }
    }
    let label_area = if area.width > 2 {
        Rect {
            x: area.x + 1,
            width: area.width - 2,
            ..area
        }
    } else {
        area
    };
    let label = Line::styled(names::capitalize_first(type_name), text);
    frame.render_widget(Paragraph::new(label).alignment(Alignment::Center), label_area);
}

/// Surface-filled panel whose top corners are quarter blocks.
fn paint_panel(buf: &mut Buffer, area: Rect) {
    let area = area.intersection(buf.area);
    if area.is_empty() {
        return;
    }
    let surface = theme::SURFACE.to_color();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let Some(cell) = buf.cell_mut((x, y)) else {
                continue;
            };
            let is_corner = y == area.top()
                && area.width > 2
                && (x == area.left() || x + 1 == area.right());
            if is_corner {
                let glyph = if x == area.left() { CORNER_LEFT } else { CORNER_RIGHT };
                cell.set_symbol(glyph).set_fg(surface);
            } else {
                cell.set_bg(surface);
            }
        }
    }
}
