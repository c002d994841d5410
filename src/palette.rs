//! Dominant color extraction from artwork pixels.

use crate::theme::Rgb;

/// Pixels below this alpha are treated as background and ignored.
const OPAQUE_THRESHOLD: u8 = 128;
/// Bits kept per channel when bucketing colors.
const QUANT_BITS: u32 = 4;

const ON_DARK: Rgb = Rgb::new(255, 255, 255);
const ON_LIGHT: Rgb = Rgb::new(33, 33, 33);

#[derive(Clone, Copy, Default)]
struct Bucket {
    count: u32,
    r: u64,
    g: u64,
    b: u64,
}

/// Most populous color of the opaque pixels in an RGBA8 buffer.
///
/// Colors are bucketed at 4 bits per channel; the winner is the mean of
/// the largest bucket. Returns `None` when every pixel is transparent.
pub fn dominant_color(rgba: &[u8]) -> Option<Rgb> {
    let levels = 1usize << QUANT_BITS;
    let shift = 8 - QUANT_BITS;
    let mut buckets = vec![Bucket::default(); levels * levels * levels];

    for px in rgba.chunks_exact(4) {
        if px[3] < OPAQUE_THRESHOLD {
            continue;
        }
        let index = ((px[0] >> shift) as usize * levels + (px[1] >> shift) as usize) * levels
            + (px[2] >> shift) as usize;
        let bucket = &mut buckets[index];
        bucket.count += 1;
        bucket.r += px[0] as u64;
        bucket.g += px[1] as u64;
        bucket.b += px[2] as u64;
    }

    let best = buckets
        .iter()
        .filter(|bucket| bucket.count > 0)
        .max_by_key(|bucket| bucket.count)?;
    let n = best.count as u64;
    Some(Rgb::new(
        (best.r / n) as u8,
        (best.g / n) as u8,
        (best.b / n) as u8,
    ))
}

/// Text color for `background`: near-black or white, whichever contrasts more.
pub fn on_color_for(background: Rgb) -> Rgb {
    if contrast(background, ON_LIGHT) >= contrast(background, ON_DARK) {
        ON_LIGHT
    } else {
        ON_DARK
    }
}

fn contrast(a: Rgb, b: Rgb) -> f32 {
    let (la, lb) = (a.luminance(), b.luminance());
    let (hi, lo) = if la > lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pixels(runs: &[([u8; 4], usize)]) -> Vec<u8> {
        runs.iter()
            .flat_map(|(px, count)| std::iter::repeat(*px).take(*count).flatten())
            .collect()
    }

    #[test]
    fn test_dominant_picks_most_populous() {
        let rgba = pixels(&[([120, 200, 80, 255], 10), ([160, 64, 160, 255], 3)]);
        assert_eq!(dominant_color(&rgba), Some(Rgb::new(120, 200, 80)));
    }

    #[test]
    fn test_dominant_ignores_transparent_pixels() {
        let rgba = pixels(&[([0, 0, 0, 0], 100), ([200, 40, 40, 255], 2)]);
        assert_eq!(dominant_color(&rgba), Some(Rgb::new(200, 40, 40)));
    }

    #[test]
    fn test_dominant_averages_within_bucket() {
        let rgba = pixels(&[([16, 16, 16, 255], 1), ([18, 18, 18, 255], 1)]);
        assert_eq!(dominant_color(&rgba), Some(Rgb::new(17, 17, 17)));
    }

    #[test]
    fn test_dominant_none_when_fully_transparent() {
        let rgba = pixels(&[([255, 255, 255, 10], 4)]);
        assert_eq!(dominant_color(&rgba), None);
        assert_eq!(dominant_color(&[]), None);
    }

    #[test]
    fn test_on_color_contrast() {
        assert_eq!(on_color_for(Rgb::new(250, 250, 210)), ON_LIGHT);
        assert_eq!(on_color_for(Rgb::new(30, 40, 90)), ON_DARK);
    }
}
