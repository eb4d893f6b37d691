use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{EngineError, Result};

/// An RGB color held by a color palette slot. Serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn get_rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parses `#rrggbb` or the short `#rgb` form. The leading `#` is optional.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidHexColor`] for anything else.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidHexColor { value: hex.to_string() };
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Color::new(channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?)),
            3 => {
                let expand = |i: usize| channel(&digits[i..=i]).map(|v| v * 0x11);
                Ok(Color::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from(value: (u8, u8, u8)) -> Self {
        Color::new(value.0, value.1, value.2)
    }
}

impl TryFrom<String> for Color {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}
