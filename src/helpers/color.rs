use std::str::FromStr;

use palette::{Srgb, Srgba};

use crate::error::{FigmaError, Result};
use crate::types::Color;

/// 8-bit channels, rounded and clamped to `0..=255`; alpha dropped.
fn to_srgb8(color: &Color) -> Srgb<u8> {
    Srgba::<f64>::from(*color).color.into_format::<u8>()
}

/// `#rrggbb` for the color; alpha is ignored.
pub fn color_to_hex(color: &Color) -> String {
    format!("#{:x}", to_srgb8(color))
}

/// `rgba(R, G, B, A)` with 8-bit channels and the unscaled alpha.
pub fn color_to_rgba(color: &Color) -> String {
    let rgb = to_srgb8(color);
    format!("rgba({}, {}, {}, {})", rgb.red, rgb.green, rgb.blue, color.a)
}

/// Parse `#RRGGBB` (the `#` is optional) into an opaque color.
pub fn hex_to_color(hex: &str) -> Result<Color> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    // palette also takes the 3-digit shorthand; only the full form is accepted
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FigmaError::InvalidHexColor(hex.to_string()));
    }

    let rgb = Srgb::<u8>::from_str(digits)
        .map_err(|_| FigmaError::InvalidHexColor(hex.to_string()))?
        .into_format::<f64>();
    Ok(Srgba::new(rgb.red, rgb.green, rgb.blue, 1.0).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_case_normalized() {
        for hex in ["#000000", "#FFFFFF", "#1a2B3c", "#7f7f7f", "#00ff80"] {
            let color = hex_to_color(hex).unwrap();
            assert_eq!(color_to_hex(&color), hex.to_ascii_lowercase());
        }
    }

    #[test]
    fn hex_without_hash_is_accepted() {
        let color = hex_to_color("ff0000").unwrap();
        assert_eq!(color, Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        for bad in ["", "#", "#fff", "#12345", "#1234567", "#gg0000", "red", "#ff00ff80"] {
            let err = hex_to_color(bad).unwrap_err();
            assert!(matches!(err, FigmaError::InvalidHexColor(_)), "{bad}");
        }
    }

    #[test]
    fn hex_channels_agree_with_palette() {
        let color = hex_to_color("#336699").unwrap();
        assert_eq!(to_srgb8(&color), Srgb::new(0x33u8, 0x66, 0x99));
        assert_eq!(color.a, 1.0);
        // three-digit shorthand stays rejected even though palette parses it
        assert!(Srgb::<u8>::from_str("#fff").is_ok());
        assert!(hex_to_color("#fff").is_err());
    }

    #[test]
    fn out_of_range_channels_clamp() {
        let color = Color::new(1.5, -0.2, 0.5, 1.0);
        assert_eq!(color_to_hex(&color), "#ff0080");
    }

    #[test]
    fn rgba_keeps_alpha_unscaled() {
        let color = Color::new(1.0, 0.5, 0.0, 0.25);
        assert_eq!(color_to_rgba(&color), "rgba(255, 128, 0, 0.25)");
        assert_eq!(color_to_rgba(&Color::rgb(0.0, 0.0, 0.0)), "rgba(0, 0, 0, 1)");
    }
}
