//! Radiance post-processing: tone mapping, gamma and 8-bit quantization.

use crate::Color;

/// Display gamma.
pub const GAMMA: f64 = 2.2;

/// Largest channel value over all pixels, never below zero.
pub fn max_channel(pixels: &[Color]) -> f64 {
    pixels
        .iter()
        .fold(0.0, |max: f64, color| max.max(color.max_element()))
}

/// Extended Reinhard operator: `x * (1 + x / c²) / (1 + x)` per channel,
/// with `white` the value that maps to 1.
#[inline]
pub fn tone_map(color: Color, white: f64) -> Color {
    let white2 = white * white;
    color * (Color::ONE + color / white2) / (Color::ONE + color)
}

/// Tone map a whole frame against its own brightest channel.
///
/// An all-black frame (brightest channel not above zero) is left as is,
/// since `white²` would be zero. Gamma and quantization still map it to
/// black pixels.
pub fn tone_map_frame(pixels: &mut [Color]) {
    let white = max_channel(pixels);
    if white <= 0.0 {
        return;
    }
    for color in pixels.iter_mut() {
        *color = tone_map(*color, white);
    }
}

#[inline]
pub fn gamma_correct(color: Color) -> Color {
    color.powf(1.0 / GAMMA)
}

/// Scale a unit-range value to a byte, saturating; NaN becomes 0.
#[inline]
pub fn quantize(value: f64) -> u8 {
    (255.0 * value) as u8
}

/// Gamma-correct and quantize a tone-mapped color.
pub fn to_rgb(color: Color) -> [u8; 3] {
    let c = gamma_correct(color);
    [quantize(c.x), quantize(c.y), quantize(c.z)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_map_white_point() {
        let c = tone_map(Color::splat(4.0), 4.0);
        assert!((c - Color::ONE).length() < 1e-12);

        let dim = tone_map(Color::new(0.0, 1.0, 2.0), 4.0);
        assert_eq!(dim.x, 0.0);
        assert!(dim.y < 1.0 && dim.z < 1.0 && dim.y < dim.z);
    }

    #[test]
    fn test_tone_map_frame_keeps_black() {
        let mut frame = vec![Color::ZERO; 4];
        tone_map_frame(&mut frame);
        assert!(frame.iter().all(|c| *c == Color::ZERO));
        assert!(frame.iter().all(|c| to_rgb(*c) == [0; 3]));
    }

    #[test]
    fn test_tone_map_frame_maps_max_to_one() {
        let mut frame = vec![Color::new(0.5, 0.1, 0.0), Color::new(8.0, 2.0, 1.0)];
        tone_map_frame(&mut frame);
        assert!((frame[1].x - 1.0).abs() < 1e-12);
        assert!(frame.iter().all(|c| c.max_element() <= 1.0 + 1e-12));
    }

    #[test]
    fn test_max_channel_ignores_negative() {
        assert_eq!(max_channel(&[]), 0.0);
        assert_eq!(max_channel(&[Color::splat(-3.0)]), 0.0);
        assert_eq!(max_channel(&[Color::new(0.2, 0.7, 0.1), Color::new(0.3, 0.0, 0.0)]), 0.7);
    }

    #[test]
    fn test_gamma() {
        let c = gamma_correct(Color::new(0.0, 1.0, 0.5));
        assert_eq!(c.x, 0.0);
        assert_eq!(c.y, 1.0);
        assert!((c.z - 0.5f64.powf(1.0 / 2.2)).abs() < 1e-12);
    }

    #[test]
    fn test_quantize_saturates() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(0.5), 127);
        assert_eq!(quantize(2.0), 255);
        assert_eq!(quantize(-1.0), 0);
        assert_eq!(quantize(f64::NAN), 0);
    }

    #[test]
    fn test_to_rgb() {
        assert_eq!(to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(to_rgb(Color::new(f64::NAN, 1.0, 0.0)), [0, 255, 0]);
    }
}
