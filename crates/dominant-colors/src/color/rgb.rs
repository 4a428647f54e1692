//! 8-bit RGB pixel type
//!
//! Every decoded pixel and every cluster centroid is carried as an [`Rgb`].
//! Centroids are rounded back to integer channels before they leave the
//! extractor, so HEX formatting and parsing round-trip exactly.

use std::fmt;
use std::str::FromStr;

use super::error::ParseColorError;

/// A color with three 8-bit channels in sRGB encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a byte array [R, G, B].
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels scaled to 0.0..=1.0, the form renderers and the clusterer use.
    ///
    /// # Example
    /// ```
    /// use dominant_colors::Rgb;
    /// assert_eq!(Rgb::new(255, 0, 51).to_unit(), [1.0, 0.0, 0.2]);
    /// ```
    #[inline]
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Build a color from 0.0..=1.0 channels, rounding to the nearest
    /// integer and clamping to 0..=255.
    ///
    /// # Example
    /// ```
    /// use dominant_colors::Rgb;
    /// assert_eq!(Rgb::from_unit(1.2, 0.5, -0.1), Rgb::new(255, 128, 0));
    /// ```
    #[inline]
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        Self::new(unit_to_u8(r), unit_to_u8(g), unit_to_u8(b))
    }

    /// Format as `#RRGGBB` with uppercase, zero-padded hex digits.
    ///
    /// # Example
    /// ```
    /// use dominant_colors::Rgb;
    /// assert_eq!(Rgb::new(10, 171, 255).to_hex(), "#0AABFF");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse a HEX color string; see the [`FromStr`] implementation.
    pub fn from_hex(s: &str) -> Result<Self, ParseColorError> {
        s.parse()
    }
}

#[inline]
fn unit_to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB` (shorthand digits are
    /// doubled). Case-insensitive; surrounding whitespace is trimmed.
    ///
    /// ```
    /// use dominant_colors::Rgb;
    ///
    /// let red: Rgb = "#F00".parse().unwrap();
    /// assert_eq!(red, Rgb::new(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_is_uppercase_and_padded() {
        assert_eq!(Rgb::new(0, 0, 0).to_hex(), "#000000");
        assert_eq!(Rgb::new(255, 255, 255).to_hex(), "#FFFFFF");
        assert_eq!(Rgb::new(1, 2, 3).to_hex(), "#010203");
        assert_eq!(Rgb::new(0xab, 0xcd, 0xef).to_hex(), "#ABCDEF");
    }

    #[test]
    fn test_display_matches_hex() {
        let color = Rgb::new(18, 52, 86);
        assert_eq!(color.to_string(), color.to_hex());
    }

    /// Every value of every channel must survive hex formatting and parsing.
    #[test]
    fn test_hex_round_trip_all_channel_values() {
        for v in 0..=255u8 {
            for color in [Rgb::new(v, 0, 0), Rgb::new(0, v, 0), Rgb::new(0, 0, v)] {
                assert_eq!(Rgb::from_hex(&color.to_hex()).unwrap(), color);
            }
            let mixed = Rgb::new(v, v.wrapping_mul(7), 255 - v);
            assert_eq!(Rgb::from_hex(&mixed.to_hex()).unwrap(), mixed);
        }
    }

    #[test]
    fn test_hex_parsing_shorthand_and_no_hash() {
        assert_eq!("#ABC".parse::<Rgb>().unwrap(), Rgb::new(0xAA, 0xBB, 0xCC));
        assert_eq!("00ff00".parse::<Rgb>().unwrap(), Rgb::new(0, 255, 0));
        assert_eq!("  #ffffff ".parse::<Rgb>().unwrap(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_hex_parsing_errors() {
        assert!(matches!(
            "#GGG".parse::<Rgb>(),
            Err(ParseColorError::InvalidHex(_))
        ));
        assert!(matches!(
            "#FFFF".parse::<Rgb>(),
            Err(ParseColorError::InvalidLength)
        ));
        assert!(matches!("".parse::<Rgb>(), Err(ParseColorError::InvalidLength)));
        assert!(matches!("#".parse::<Rgb>(), Err(ParseColorError::InvalidLength)));
        assert!(matches!(
            "#ÄÄÄ".parse::<Rgb>(),
            Err(ParseColorError::InvalidLength)
        ));
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(Rgb::new(0, 0, 0).to_unit(), [0.0, 0.0, 0.0]);
        assert_eq!(Rgb::new(255, 255, 255).to_unit(), [1.0, 1.0, 1.0]);

        for v in 0..=255u8 {
            let [r, g, b] = Rgb::new(v, v, v).to_unit();
            assert_eq!(Rgb::from_unit(r, g, b), Rgb::new(v, v, v));
        }
    }

    #[test]
    fn test_from_unit_rounds_and_clamps() {
        // 0.5 * 255 = 127.5 rounds away from zero
        assert_eq!(Rgb::from_unit(0.5, 0.5, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(Rgb::from_unit(2.0, -1.0, 1.0), Rgb::new(255, 0, 255));
    }
}
