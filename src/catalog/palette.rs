//! Toolbar palette and color parsing.

use image::Rgba;

use crate::error::StudioError;

/// Swatches offered by the toolbar, in display order.
pub const PALETTE: [&str; 14] = [
    "#ef4444", "#f97316", "#f59e0b", "#84cc16", "#10b981", "#06b6d4", "#3b82f6", "#6366f1",
    "#8b5cf6", "#d946ef", "#f43f5e", "#000000", "#ffffff", "#4b5563",
];

/// Brush color selected when a studio opens.
pub const DEFAULT_COLOR: &str = "#ef4444";

/// Brush width in pixels.
pub const DEFAULT_LINE_WIDTH: u32 = 6;

/// Widest brush accepted.
pub const MAX_LINE_WIDTH: u32 = 128;

/// Canvas background. The eraser paints with this color.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Parse a CSS-style color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `white` or `black`.
pub fn parse_color(value: &str) -> Result<Rgba<u8>, StudioError> {
    let value = value.trim();
    match value.to_ascii_lowercase().as_str() {
        "white" => return Ok(BACKGROUND),
        "black" => return Ok(Rgba([0, 0, 0, 255])),
        _ => {}
    }

    let hex = value
        .strip_prefix('#')
        .ok_or_else(|| StudioError::InvalidInput(format!("Unsupported color '{}'", value)))?;
    if !hex.is_ascii() {
        return Err(StudioError::InvalidInput(format!("Invalid hex color '{}'", value)));
    }

    let channel = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|_| StudioError::InvalidInput(format!("Invalid hex color '{}'", value)))
    };

    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.char_indices() {
                let nibble = channel(&hex[i..i + c.len_utf8()])?;
                rgb[i] = nibble * 17;
            }
            Ok(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 | 8 => {
            let r = channel(&hex[0..2])?;
            let g = channel(&hex[2..4])?;
            let b = channel(&hex[4..6])?;
            let a = if hex.len() == 8 { channel(&hex[6..8])? } else { 255 };
            Ok(Rgba([r, g, b, a]))
        }
        _ => Err(StudioError::InvalidInput(format!(
            "Invalid hex color '{}'",
            value
        ))),
    }
}

/// Format a color as `#rrggbb` (alpha dropped).
pub fn to_hex(color: Rgba<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        assert_eq!(parse_color("#ef4444").unwrap(), Rgba([0xef, 0x44, 0x44, 255]));
        assert_eq!(parse_color("#EF4444").unwrap(), Rgba([0xef, 0x44, 0x44, 255]));
    }

    #[test]
    fn test_parse_short_hex_and_names() {
        assert_eq!(parse_color("#fff").unwrap(), BACKGROUND);
        assert_eq!(parse_color("white").unwrap(), BACKGROUND);
        assert_eq!(parse_color("black").unwrap(), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_parse_with_alpha() {
        assert_eq!(parse_color("#00000080").unwrap(), Rgba([0, 0, 0, 0x80]));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_color("red").is_err());
        assert!(parse_color("#12").is_err());
        assert!(parse_color("#gggggg").is_err());
        assert!(parse_color("#ééé").is_err());
        assert!(parse_color("#aéaaa").is_err());
        assert!(parse_color("#ef44éé").is_err());
    }

    #[test]
    fn test_palette_round_trips() {
        for swatch in PALETTE {
            assert_eq!(to_hex(parse_color(swatch).unwrap()), swatch);
        }
    }
}
