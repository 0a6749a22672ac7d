use crate::foundation::{
    error::{StampError, StampResult},
    math::mul_div255,
};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Straight (non-premultiplied) RGBA8 color, serialized as a CSS-style hex string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> StampResult<Self> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| StampError::validation(format!("color '{s}' must start with '#'")))?;
        if !hex.is_ascii() {
            return Err(StampError::validation(format!("color '{s}' is not ascii")));
        }

        let nibble = |c: u8| -> StampResult<u8> {
            (c as char)
                .to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| StampError::validation(format!("color '{s}' has a non-hex digit")))
        };
        let bytes = hex.as_bytes();
        let channels: Vec<u8> = match bytes.len() {
            3 | 4 => bytes
                .iter()
                .map(|&c| nibble(c).map(|v| v * 17))
                .collect::<StampResult<_>>()?,
            6 | 8 => bytes
                .chunks_exact(2)
                .map(|pair| Ok(nibble(pair[0])? * 16 + nibble(pair[1])?))
                .collect::<StampResult<_>>()?,
            _ => {
                return Err(StampError::validation(format!(
                    "color '{s}' must have 3, 4, 6 or 8 hex digits"
                )));
            }
        };

        Ok(Self {
            r: channels[0],
            g: channels[1],
            b: channels[2],
            a: channels.get(3).copied().unwrap_or(255),
        })
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Premultiplied RGBA8 bytes.
    pub fn to_premul(self) -> [u8; 4] {
        let premul = |c: u8| mul_div255(c, self.a);
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

impl TryFrom<String> for Color {
    type Error = StampError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
