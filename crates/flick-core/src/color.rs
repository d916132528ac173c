//! RGBA color with hex and packed ARGB conversions.

use serde::{Deserialize, Serialize};

/// RGBA color with values in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

impl Color {
    /// Create a new color, clamping values to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB values.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a color from a packed `0xAARRGGBB` value.
    ///
    /// ```
    /// use flick_core::Color;
    ///
    /// let green = Color::from_argb(0xFF51_D367);
    /// assert_eq!(green.a, 1.0);
    /// assert_eq!(green.to_argb(), 0xFF51_D367);
    /// ```
    #[must_use]
    pub fn from_argb(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Pack into a `0xAARRGGBB` value.
    #[must_use]
    pub fn to_argb(&self) -> u32 {
        u32::from_be_bytes([
            Self::channel_byte(self.a),
            Self::channel_byte(self.r),
            Self::channel_byte(self.g),
            Self::channel_byte(self.b),
        ])
    }

    /// Parse a hex color string (e.g., "#ff0000" or "ff0000").
    ///
    /// Supports 6-character `rrggbb` and 8-character `aarrggbb` formats, the
    /// latter with alpha first as in a packed ARGB value.
    ///
    /// ```
    /// use flick_core::Color;
    ///
    /// let shadow = Color::from_hex("#33000000").unwrap();
    /// assert_eq!(shadow.to_argb(), 0x3300_0000);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(ColorParseError::InvalidHex);
        }

        let byte = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|_| ColorParseError::InvalidHex)
        };

        match hex.len() {
            6 => Ok(Self::rgb(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
            8 => Ok(Self::new(byte(2..4)?, byte(4..6)?, byte(6..8)?, byte(0..2)?)),
            _ => Err(ColorParseError::InvalidLength),
        }
    }

    /// Convert to hex string (RGB only).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            Self::channel_byte(self.r),
            Self::channel_byte(self.g),
            Self::channel_byte(self.b)
        )
    }

    /// Convert to an `#aarrggbb` hex string.
    #[must_use]
    pub fn to_hex_argb(&self) -> String {
        format!("#{:08x}", self.to_argb())
    }

    /// Per-channel linear interpolation between two colors.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            (other.r - self.r).mul_add(t, self.r),
            (other.g - self.g).mul_add(t, self.g),
            (other.b - self.b).mul_add(t, self.b),
            (other.a - self.a).mul_add(t, self.a),
        )
    }

    fn channel_byte(c: f32) -> u8 {
        (c * 255.0).round() as u8
    }

    // Common colors
    /// Black color
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// White color
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    /// Transparent color
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Invalid hex characters
    InvalidHex,
    /// Invalid string length
    InvalidLength,
}

impl std::fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHex => write!(f, "invalid hex characters"),
            Self::InvalidLength => write!(f, "invalid hex string length (expected 6 or 8)"),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// Serde adapter storing a [`Color`] as an `#aarrggbb` string.
///
/// Use with `#[serde(with = "flick_core::color::hex")]`.
pub mod hex {
    use super::Color;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    /// Serialize as `#aarrggbb`.
    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&color.to_hex_argb())
    }

    /// Deserialize from `#rrggbb` or `#aarrggbb`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::from_hex(&raw).map_err(D::Error::custom)
    }

    /// The same adapter for `Option<Color>` fields.
    pub mod option {
        use super::Color;
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        /// Serialize as `#aarrggbb`, or as none.
        pub fn serialize<S: Serializer>(
            color: &Option<Color>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match color {
                Some(color) => serializer.serialize_some(&color.to_hex_argb()),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize from an optional `#rrggbb` or `#aarrggbb` string.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Color>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| Color::from_hex(&raw).map_err(D::Error::custom))
                .transpose()
        }
    }
}
