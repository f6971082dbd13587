//! Text form of a [`Message`].
//!
//! ```text
//! C
//! L #rrggbb x1 y1 x2 y2
//! ```
//!
//! Coordinates are written with exactly one fractional digit and read
//! back with ordinary decimal parsing, so the decoder accepts any
//! numeric spelling a peer might produce.

use crate::error::Rejection;
use crate::message::{Color, Message, Point};

/// Serialize a message to its wire text (no line terminator).
pub fn encode(message: &Message) -> String {
    match message {
        Message::Clear => Message::CLEAR_TAG.to_string(),
        Message::Line { color, from, to } => format!(
            "{} {} {} {} {} {}",
            Message::LINE_TAG,
            color,
            format_coordinate(from.x),
            format_coordinate(from.y),
            format_coordinate(to.x),
            format_coordinate(to.y),
        ),
    }
}

/// Parse wire text into a message.
///
/// Total over all inputs: anything that is not a well-formed message
/// comes back as a [`Rejection`] describing the first problem found.
pub fn decode(input: &str) -> Result<Message, Rejection> {
    match input.chars().next() {
        None => Err(Rejection::Empty),
        Some(Message::CLEAR_TAG) => decode_clear(input),
        Some(Message::LINE_TAG) => decode_line(input),
        Some(other) => Err(Rejection::UnknownTag(other.to_string())),
    }
}

fn decode_clear(input: &str) -> Result<Message, Rejection> {
    if input.len() == 1 {
        Ok(Message::Clear)
    } else {
        Err(Rejection::TrailingContent)
    }
}

fn decode_line(input: &str) -> Result<Message, Rejection> {
    let tokens: Vec<&str> = input.split(' ').collect();
    let [tag, color, x1, y1, x2, y2] = tokens.as_slice() else {
        return Err(Rejection::TokenCount {
            found: tokens.len(),
        });
    };

    if *tag != "L" {
        return Err(Rejection::UnknownTag((*tag).to_string()));
    }
    let color = Color::parse_hex(color).ok_or_else(|| Rejection::InvalidColor((*color).to_string()))?;

    Ok(Message::Line {
        color,
        from: Point::new(coordinate("from.x", x1)?, coordinate("from.y", y1)?),
        to: Point::new(coordinate("to.x", x2)?, coordinate("to.y", y2)?),
    })
}

fn coordinate(field: &'static str, token: &str) -> Result<f64, Rejection> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Rejection::InvalidCoordinate {
            field,
            token: token.to_string(),
        })
}

/// Fixed-point rendering with one fractional digit.
///
/// Rounds half away from zero on the exact binary value, so `15.25`
/// becomes `15.3` while `0.15` (stored just below the tie) becomes
/// `0.1`. A negative value keeps its sign even when it rounds to zero.
pub fn format_coordinate(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // Thirty places is far past the last significant digit for any value
    // whose first two fractional digits matter.
    let exact = format!("{:.30}", v.abs());
    let (whole, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = whole.bytes().collect();
    let mut frac = frac.bytes();
    digits.push(frac.next().unwrap_or(b'0'));

    if frac.next().is_some_and(|d| d >= b'5') {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, b'1');
                break;
            }
            i -= 1;
            if digits[i] == b'9' {
                digits[i] = b'0';
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let (int_digits, tenth) = digits.split_at(digits.len() - 1);
    let mut out = String::with_capacity(digits.len() + 2);
    if v < 0.0 {
        out.push('-');
    }
    out.extend(int_digits.iter().map(|&d| d as char));
    out.push('.');
    out.push(tenth[0] as char);
    out
}
