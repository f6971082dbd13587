//! Drawing events exchanged between clients, and the values they carry.
//!
//! Every type here is plain data. Text conversion lives in
//! [`crate::codec`]; the only textual knowledge in this module is the
//! `#rrggbb` form of [`Color`], which is shared by the wire format and
//! the configuration file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::format_coordinate;
use crate::error::ScrawlError;

// ── Point ────────────────────────────────────────────────────────

/// A position in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point as a peer decodes it after one trip over the wire
    /// (both axes rounded to one fractional digit).
    pub fn quantized(self) -> Self {
        Self {
            x: quantize(self.x),
            y: quantize(self.y),
        }
    }
}

fn quantize(v: f64) -> f64 {
    format_coordinate(v).parse().unwrap_or(v)
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Color ────────────────────────────────────────────────────────

/// A 24-bit RGB stroke color. Textual form is `#rrggbb`, lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xff);
    pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
    pub const ORANGE: Color = Color::rgb(0xff, 0x7f, 0x00);

    /// Canvas background used by [`crate::canvas::CanvasConfig::default`].
    pub const BACKGROUND: Color = Color::rgb(0xf1, 0xf1, 0xf1);

    /// The colors offered by the default palette, in display order.
    pub const PALETTE: [(&'static str, Color); 6] = [
        ("red", Color::RED),
        ("blue", Color::BLUE),
        ("yellow", Color::YELLOW),
        ("green", Color::GREEN),
        ("orange", Color::ORANGE),
        ("black", Color::BLACK),
    ];

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Look up a palette entry by name.
    pub fn named(name: &str) -> Option<Self> {
        Self::PALETTE
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c)
    }

    /// Strict parse of the wire form: exactly `#` plus six lowercase hex
    /// digits. Uppercase is not accepted.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?.as_bytes();
        if digits.len() != 6 || !digits.iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return None;
        }
        let byte = |i: usize| (nibble(digits[i]) << 4) | nibble(digits[i + 1]);
        Some(Self::rgb(byte(0), byte(2), byte(4)))
    }
}

fn nibble(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        _ => b - b'a' + 10,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ScrawlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s).ok_or_else(|| ScrawlError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ScrawlError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

// ── Message ──────────────────────────────────────────────────────

/// A drawing event.
///
/// `Clear` resets every client's canvas to the background fill; `Line`
/// strokes one straight segment with the shared, fixed line width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Clear,
    Line { color: Color, from: Point, to: Point },
}

impl Message {
    pub const CLEAR_TAG: char = 'C';
    pub const LINE_TAG: char = 'L';

    pub fn line(color: Color, from: Point, to: Point) -> Self {
        Message::Line { color, from, to }
    }

    /// The single-character wire tag of this message.
    pub fn tag(&self) -> char {
        match self {
            Message::Clear => Self::CLEAR_TAG,
            Message::Line { .. } => Self::LINE_TAG,
        }
    }

    /// The message as peers decode it: `Line` endpoints rounded to wire
    /// precision, `Clear` unchanged.
    pub fn quantized(self) -> Self {
        match self {
            Message::Clear => Message::Clear,
            Message::Line { color, from, to } => Message::Line {
                color,
                from: from.quantized(),
                to: to.quantized(),
            },
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Clear => write!(f, "Clear"),
            Message::Line { color, from, to } => write!(f, "Line {color} {from} -> {to}"),
        }
    }
}
