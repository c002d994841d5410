//! Artwork decoding and the two ways of putting it on a terminal:
//! kitty graphics sequences and half-block cells.

use base64::{engine::general_purpose, Engine as _};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::palette;
use crate::theme::{self, Rgb};

/// Longest edge kept after decoding.
pub const MAX_ARTWORK_PX: u32 = 128;
/// Raw RGBA8, kitty `f=32`.
const KITTY_FORMAT_RGBA: u32 = 32;
const KITTY_CHUNK: usize = 4096;
/// Every transmit reuses this id so one delete removes the image and its data.
pub const KITTY_IMAGE_ID: u32 = 1;
const HALF_BLOCK: &str = "\u{2580}";
/// Below this effective opacity a half-cell is left untouched.
const VISIBLE_ALPHA: f32 = 0.05;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ArtworkError {
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image has no pixels")]
    Empty,
    #[error("corrupt artwork payload: {0}")]
    Payload(String),
}

/// Decoded, downscaled artwork.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Artwork {
    pub width: u32,
    pub height: u32,
    /// Base64 of the RGBA8 pixels, row-major.
    pub payload: String,
    pub dominant: Option<Rgb>,
}

impl Artwork {
    /// Decodes PNG/JPEG/GIF/WebP bytes, shrinking to `MAX_ARTWORK_PX`.
    pub fn decode(bytes: &[u8]) -> Result<Artwork, ArtworkError> {
        let image = image::load_from_memory(bytes).map_err(|err| ArtworkError::Decode(err.to_string()))?;
        let image = if image.width() > MAX_ARTWORK_PX || image.height() > MAX_ARTWORK_PX {
            image.thumbnail(MAX_ARTWORK_PX, MAX_ARTWORK_PX)
        } else {
            image
        };
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(ArtworkError::Empty);
        }
        Ok(Artwork::from_rgba(width, height, rgba.as_raw()))
    }

    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Artwork {
        Artwork {
            width,
            height,
            payload: general_purpose::STANDARD.encode(rgba),
            dominant: palette::dominant_color(rgba),
        }
    }

    pub fn rgba(&self) -> Result<Vec<u8>, ArtworkError> {
        let bytes = general_purpose::STANDARD
            .decode(&self.payload)
            .map_err(|err| ArtworkError::Payload(err.to_string()))?;
        let expected = self.width as usize * self.height as usize * 4;
        if bytes.len() != expected {
            return Err(ArtworkError::Payload(format!(
                "expected {expected} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(bytes)
    }

    /// Kitty graphics sequence drawing this artwork over `cols`×`rows`
    /// cells with alpha scaled by `opacity`.
    pub fn kitty_sequence(&self, cols: u16, rows: u16, opacity: f32) -> Result<String, ArtworkError> {
        let mut rgba = self.rgba()?;
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity < 1.0 {
            for px in rgba.chunks_exact_mut(4) {
                px[3] = (px[3] as f32 * opacity).round() as u8;
            }
        }
        let payload = general_purpose::STANDARD.encode(&rgba);
        Ok(kitty_chunks(&payload, self.width, self.height, cols, rows))
    }

    /// Rasterizes into `area` with `▀` cells (top pixel = fg, bottom = bg),
    /// blending each pixel over the cell's current background.
    pub fn render_blocks(&self, buf: &mut Buffer, area: Rect, opacity: f32) -> Result<(), ArtworkError> {
        let area = area.intersection(buf.area);
        if area.is_empty() || opacity <= 0.0 || self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let rgba = self.rgba()?;
        let opacity = opacity.clamp(0.0, 1.0);
        let sample = |col: u16, half_row: u16| -> (Rgb, f32) {
            let px = (col as u32 * self.width / area.width as u32).min(self.width - 1);
            let py = (half_row as u32 * self.height / (area.height as u32 * 2)).min(self.height - 1);
            let i = ((py * self.width + px) * 4) as usize;
            let alpha = rgba[i + 3] as f32 / 255.0 * opacity;
            (Rgb::new(rgba[i], rgba[i + 1], rgba[i + 2]), alpha)
        };

        for row in 0..area.height {
            for col in 0..area.width {
                let (top, top_alpha) = sample(col, row * 2);
                let (bottom, bottom_alpha) = sample(col, row * 2 + 1);
                if top_alpha < VISIBLE_ALPHA && bottom_alpha < VISIBLE_ALPHA {
                    continue;
                }
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                let under = Rgb::from_color(cell.bg).unwrap_or(theme::BASE);
                cell.set_symbol(HALF_BLOCK)
                    .set_fg(top.blend_over(under, top_alpha).to_color())
                    .set_bg(bottom.blend_over(under, bottom_alpha).to_color());
            }
        }
        Ok(())
    }
}

fn kitty_chunks(payload: &str, width: u32, height: u32, cols: u16, rows: u16) -> String {
    let mut sequences = String::new();
    let chunks: Vec<&[u8]> = payload.as_bytes().chunks(KITTY_CHUNK).collect();
    let total = chunks.len();

    for (index, chunk) in chunks.into_iter().enumerate() {
        let more = u8::from(index + 1 < total);
        // Base64 output is ASCII, so every chunk is valid UTF-8.
        let chunk = String::from_utf8_lossy(chunk);
        if index == 0 {
            let mut params =
                format!("f={KITTY_FORMAT_RGBA},s={width},v={height},a=T,t=d,i={KITTY_IMAGE_ID}");
            if cols > 0 {
                params.push_str(&format!(",c={cols}"));
            }
            if rows > 0 {
                params.push_str(&format!(",r={rows}"));
            }
            params.push_str(&format!(",m={more}"));
            sequences.push_str(&format!("\x1b_G{params};{chunk}\x1b\\"));
        } else {
            sequences.push_str(&format!("\x1b_Gm={more};{chunk}\x1b\\"));
        }
    }
    sequences
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn solid(width: u32, height: u32, px: [u8; 4]) -> Artwork {
        let rgba: Vec<u8> = std::iter::repeat(px)
            .take((width * height) as usize)
            .flatten()
            .collect();
        Artwork::from_rgba(width, height, &rgba)
    }

    fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .expect("encode png");
        buf
    }

    #[test]
    fn test_decode_png_keeps_small_images() {
        let artwork = Artwork::decode(&png_bytes(8, 4, [120, 200, 80, 255])).expect("decode");
        assert_eq!((artwork.width, artwork.height), (8, 4));
        assert_eq!(artwork.dominant, Some(Rgb::new(120, 200, 80)));
        assert_eq!(artwork.rgba().expect("rgba").len(), 8 * 4 * 4);
    }

    #[test]
    fn test_decode_shrinks_large_images() {
        let artwork = Artwork::decode(&png_bytes(512, 256, [1, 2, 3, 255])).expect("decode");
        assert_eq!(artwork.width, MAX_ARTWORK_PX);
        assert!(artwork.height <= MAX_ARTWORK_PX);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            Artwork::decode(b"not an image"),
            Err(ArtworkError::Decode(_))
        ));
    }

    #[test]
    fn test_rgba_detects_truncated_payload() {
        let mut artwork = solid(2, 2, [0, 0, 0, 255]);
        artwork.width = 3;
        assert!(matches!(artwork.rgba(), Err(ArtworkError::Payload(_))));
    }

    #[test]
    fn test_kitty_sequence_header() {
        let artwork = solid(2, 2, [255, 0, 0, 255]);
        let seq = artwork.kitty_sequence(4, 2, 1.0).expect("sequence");
        assert!(seq.starts_with("\x1b_Gf=32,s=2,v=2,a=T,t=d,i=1,c=4,r=2,m=0;"));
        assert!(seq.ends_with("\x1b\\"));
    }

    #[test]
    fn test_kitty_sequence_chunks_large_payloads() {
        let artwork = solid(64, 64, [255, 0, 0, 255]);
        let seq = artwork.kitty_sequence(10, 5, 1.0).expect("sequence");
        assert!(seq.contains(",m=1;"));
        assert!(seq.contains("\x1b_Gm=0;"));
    }

    #[test]
    fn test_kitty_sequence_scales_alpha() {
        let artwork = solid(1, 1, [10, 20, 30, 200]);
        let half = artwork.kitty_sequence(1, 1, 0.5).expect("sequence");
        let expected = general_purpose::STANDARD.encode([10, 20, 30, 100]);
        assert!(half.contains(&expected));
    }

    #[test]
    fn test_render_blocks_paints_opaque_pixels() {
        let artwork = solid(2, 2, [200, 0, 0, 255]);
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        artwork.render_blocks(&mut buf, area, 1.0).expect("render");
        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), HALF_BLOCK);
        assert_eq!(cell.fg, Rgb::new(200, 0, 0).to_color());
        assert_eq!(cell.bg, Rgb::new(200, 0, 0).to_color());
    }

    #[test]
    fn test_render_blocks_skips_transparent_and_zero_opacity() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        solid(2, 2, [200, 0, 0, 0])
            .render_blocks(&mut buf, area, 1.0)
            .expect("render");
        assert_eq!(buf[(0, 0)].symbol(), " ");

        solid(2, 2, [200, 0, 0, 255])
            .render_blocks(&mut buf, area, 0.0)
            .expect("render");
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }

    #[test]
    fn test_render_blocks_blends_with_cell_background() {
        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        buf[(0, 0)].set_bg(Rgb::new(0, 0, 0).to_color());
        solid(1, 2, [200, 100, 0, 255])
            .render_blocks(&mut buf, area, 0.5)
            .expect("render");
        assert_eq!(buf[(0, 0)].fg, Rgb::new(100, 50, 0).to_color());
    }
}
