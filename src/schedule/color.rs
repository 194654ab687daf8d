//! Duration color scale: short tracks green, typical ones white, long ones red

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const GREEN: Rgb = Rgb(46, 204, 113);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const RED: Rgb = Rgb(231, 76, 60);
/// used when every track has the same length
pub const NEUTRAL: Rgb = Rgb(128, 128, 128);

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Position of `value` on the green -> white -> red gradient spanning `[min, max]`.
///
/// Values outside the range are clamped onto its ends.
pub fn duration_rgb(value: u64, min: u64, max: u64) -> Rgb {
    if min == max {
        return NEUTRAL;
    }

    let (value, min, max) = (value as f64, min as f64, max as f64);
    let mid = (min + max) / 2.0;

    if value <= mid {
        blend(value, min, mid, GREEN, WHITE)
    } else {
        blend(value, mid, max, WHITE, RED)
    }
}

/// Hex form of [`duration_rgb`], e.g. `#2ecc71`
pub fn duration_color(value: u64, min: u64, max: u64) -> String {
    duration_rgb(value, min, max).to_string()
}

fn blend(value: f64, lo: f64, hi: f64, from: Rgb, to: Rgb) -> Rgb {
    if hi <= lo {
        return from;
    }
    let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    // channels are truncated, not rounded
    let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t) as u8;
    Rgb(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_durations_are_gray() {
        assert_eq!(duration_color(100, 100, 100), "#808080");
        assert_eq!(duration_color(0, 0, 0), "#808080");
    }

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(duration_color(0, 0, 100), "#2ecc71");
        assert_eq!(duration_color(50, 0, 100), "#ffffff");
        assert_eq!(duration_color(100, 0, 100), "#e74c3c");
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        assert_eq!(duration_rgb(10, 50, 150), GREEN);
        assert_eq!(duration_rgb(1_000, 50, 150), RED);
    }

    #[test]
    fn test_channels_truncate() {
        // a quarter of the way from green to white:
        // 46 + 209 * 0.5 = 150.5, 204 + 51 * 0.5 = 229.5, 113 + 142 * 0.5 = 184
        assert_eq!(duration_rgb(25, 0, 100), Rgb(150, 229, 184));
        // three quarters: white halfway to red
        // 255 - 24 * 0.5 = 243, 255 - 179 * 0.5 = 165.5, 255 - 195 * 0.5 = 157.5
        assert_eq!(duration_rgb(75, 0, 100), Rgb(243, 165, 157));
    }

    #[test]
    fn test_hex_is_lowercase_and_padded() {
        assert_eq!(Rgb(0, 10, 255).to_string(), "#000aff");
    }
}
