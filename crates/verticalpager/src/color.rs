//! Indicator color parsing using nom
//!
//! Accepted forms:
//! ```text
//! #RGB        -> opaque, each nibble doubled
//! #RRGGBB     -> opaque
//! #AARRGGBB   -> alpha first
//! transparent | white | black
//! ```

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, hex_digit1},
    combinator::{all_consuming, map_res, value},
    sequence::preceded,
    IResult,
};
use pagerstore::{Error, Result};
use serde::{Deserialize, Serialize};

/// ARGB color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Alpha
    pub a: u8,
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Color {
    /// Fully transparent black
    pub const TRANSPARENT: Color = Color::argb(0x00, 0x00, 0x00, 0x00);
    /// Opaque white
    pub const WHITE: Color = Color::argb(0xFF, 0xFF, 0xFF, 0xFF);
    /// Opaque black
    pub const BLACK: Color = Color::argb(0xFF, 0x00, 0x00, 0x00);

    /// Build a color from its channels
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color { a, r, g, b }
    }

    /// Pack as `0xAARRGGBB`
    pub fn to_argb_u32(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: u8) -> Self {
        Color { a, ..self }
    }
}

fn hex_color(input: &str) -> IResult<&str, Color> {
    map_res(preceded(char('#'), hex_digit1), decode_hex)(input)
}

fn named_color(input: &str) -> IResult<&str, Color> {
    alt((
        value(Color::TRANSPARENT, tag_no_case("transparent")),
        value(Color::WHITE, tag_no_case("white")),
        value(Color::BLACK, tag_no_case("black")),
    ))(input)
}

fn decode_hex(digits: &str) -> std::result::Result<Color, String> {
    if !matches!(digits.len(), 3 | 6 | 8) {
        return Err(format!("expected 3, 6 or 8 hex digits, found {}", digits.len()));
    }
    let packed = u32::from_str_radix(digits, 16).map_err(|e| e.to_string())?;
    let [a, r, g, b] = packed.to_be_bytes();

    Ok(match digits.len() {
        3 => {
            let nibble = |shift: u32| ((packed >> shift) & 0xF) as u8 * 0x11;
            Color::argb(0xFF, nibble(8), nibble(4), nibble(0))
        }
        6 => Color::argb(0xFF, r, g, b),
        _ => Color::argb(a, r, g, b),
    })
}

/// Parse an indicator color
pub fn parse_color(input: &str) -> Result<Color> {
    all_consuming(alt((hex_color, named_color)))(input.trim())
        .map(|(_, color)| color)
        .map_err(|e| Error::InvalidArgument(format!("invalid color {:?}: {:?}", input, e)))
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_color(s)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        parse_color(&s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.to_argb_u32())
    }
}
