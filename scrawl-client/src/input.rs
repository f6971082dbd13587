//! Local command lines → drawing input events.
//!
//! The terminal client reads one command per line from stdin:
//!
//! ```text
//! down X Y        pointer pressed at (X, Y)
//! move X Y        pointer moved to (X, Y)
//! up              pointer released
//! color #rrggbb   select a stroke color (or a palette name: red, blue, ...)
//! clear           ask everyone on the topic to clear
//! ```

use thiserror::Error;

use scrawl_core::{Color, InputEvent, Point};

/// Why a command line could not be turned into an [`InputEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("{command} expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("not a finite number: {0:?}")]
    InvalidNumber(String),

    #[error("not a color: {0:?} (use #rrggbb or a palette name)")]
    InvalidColor(String),

    #[error("{command} takes no more arguments, got {extra:?}")]
    TooManyArguments { command: &'static str, extra: String },
}

/// Parse one command line. Palette names work as bare commands too.
pub fn parse_command(line: &str) -> Result<InputEvent, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err(InputError::Empty);
    };
    let args: Vec<&str> = words.collect();

    let event = match command.to_ascii_lowercase().as_str() {
        "down" | "press" => InputEvent::Press(point("down", &args)?),
        "move" => InputEvent::Move(point("move", &args)?),
        "up" | "release" => {
            no_args("up", &args)?;
            InputEvent::Release
        }
        "clear" => {
            no_args("clear", &args)?;
            InputEvent::Clear
        }
        "color" => {
            let [value] = args.as_slice() else {
                return Err(match args.len() {
                    0 => InputError::MissingArgument {
                        command: "color",
                        expected: "#rrggbb or a palette name",
                    },
                    _ => InputError::TooManyArguments {
                        command: "color",
                        extra: args[1..].join(" "),
                    },
                });
            };
            InputEvent::SetColor(color(value)?)
        }
        other => match Color::named(other) {
            Some(c) if args.is_empty() => InputEvent::SetColor(c),
            Some(_) => {
                return Err(InputError::TooManyArguments {
                    command: "color",
                    extra: args.join(" "),
                });
            }
            None => return Err(InputError::UnknownCommand(command.to_string())),
        },
    };
    Ok(event)
}

fn point(command: &'static str, args: &[&str]) -> Result<Point, InputError> {
    match args {
        [x, y] => Ok(Point::new(number(x)?, number(y)?)),
        [_, _, rest @ ..] => Err(InputError::TooManyArguments {
            command,
            extra: rest.join(" "),
        }),
        _ => Err(InputError::MissingArgument {
            command,
            expected: "X Y",
        }),
    }
}

fn number(token: &str) -> Result<f64, InputError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::InvalidNumber(token.to_string()))
}

fn no_args(command: &'static str, args: &[&str]) -> Result<(), InputError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(InputError::TooManyArguments {
            command,
            extra: args.join(" "),
        })
    }
}

/// Hex colors are accepted in either case here; only the wire is strict.
fn color(value: &str) -> Result<Color, InputError> {
    Color::named(&value.to_ascii_lowercase())
        .or_else(|| Color::parse_hex(&value.to_ascii_lowercase()))
        .ok_or_else(|| InputError::InvalidColor(value.to_string()))
}
