//! Heatmap colours for per-chunk similarity.
//!
//! A score maps linearly onto a white → red gradient: red stays at 255 while
//! green and blue fade from 255 to 0 as the score rises.

use std::fmt;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Map `value` in `[min, max]` onto the gradient.
///
/// Out-of-range values are clamped. A degenerate range (`max <= min`) or a
/// NaN value yields the endpoint colour for `max` and `min` respectively.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn heat_color(value: f64, min: f64, max: f64) -> Rgb {
    let ratio = if value.is_nan() {
        0.0
    } else if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let fade = (255.0 * (1.0 - ratio)).floor() as u8;
    Rgb {
        r: 255,
        g: fade,
        b: fade,
    }
}

/// Gradient colour for a similarity percentage.
pub fn similarity_color(percent: f64) -> Rgb {
    heat_color(percent, 0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(similarity_color(0.0).to_string(), "rgb(255, 255, 255)");
        assert_eq!(similarity_color(100.0).to_string(), "rgb(255, 0, 0)");
    }

    #[test]
    fn test_midpoint_floors() {
        // 255 * 0.5 = 127.5
        assert_eq!(similarity_color(50.0), Rgb { r: 255, g: 127, b: 127 });
    }

    #[test]
    fn test_clamped() {
        assert_eq!(similarity_color(150.0), similarity_color(100.0));
        assert_eq!(similarity_color(-3.0), similarity_color(0.0));
        assert_eq!(similarity_color(f64::NAN), similarity_color(0.0));
        assert_eq!(heat_color(5.0, 1.0, 1.0), similarity_color(100.0));
    }
}
