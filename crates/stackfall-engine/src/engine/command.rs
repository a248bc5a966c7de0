use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CommandParseError, core::shape::ShapeKind};

/// One drop instruction: a shape and the grid column of its leftmost block.
///
/// The column is kept as written; range checking happens when the shape is placed.
///
/// # Example
///
/// ```
/// use stackfall_engine::{DropCommand, ShapeKind};
///
/// let command: DropCommand = "T-3".parse().unwrap();
/// assert_eq!(command, DropCommand::new(ShapeKind::T, -3));
/// assert_eq!(command.to_string(), "T-3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropCommand {
    shape: ShapeKind,
    left_column: i64,
}

impl DropCommand {
    #[must_use]
    pub const fn new(shape: ShapeKind, left_column: i64) -> Self {
        Self { shape, left_column }
    }

    #[must_use]
    pub const fn shape(&self) -> ShapeKind {
        self.shape
    }

    #[must_use]
    pub const fn left_column(&self) -> i64 {
        self.left_column
    }
}

impl fmt::Display for DropCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.shape.as_char(), self.left_column)
    }
}

impl FromStr for DropCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(CommandParseError::Empty)?;
        let shape = ShapeKind::from_char(letter).ok_or_else(|| CommandParseError::UnknownShape {
            command: s.to_owned(),
            letter,
        })?;
        let left_column = chars.as_str().parse().map_err(|source| {
            CommandParseError::InvalidCommand {
                command: s.to_owned(),
                source,
            }
        })?;
        Ok(Self { shape, left_column })
    }
}

impl Serialize for DropCommand {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Same format as the input stream: "Q4", "I-1"
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DropCommand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Splits a record line into drop commands.
///
/// Tokens are separated by commas and trimmed; empty tokens (from trailing or doubled commas)
/// are skipped. Parsing is lazy so a caller can stop at the first bad token.
pub fn parse_record(
    line: &str,
) -> impl Iterator<Item = Result<DropCommand, CommandParseError>> + '_ {
    line.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::parse)
}

#[cfg(test)]
mod tests {
    use crate::FailureKind;

    use super::*;

    #[test]
    fn test_parse_valid_commands() {
        assert_eq!("Q0".parse(), Ok(DropCommand::new(ShapeKind::Q, 0)));
        assert_eq!("I6".parse(), Ok(DropCommand::new(ShapeKind::I, 6)));
        assert_eq!("L-1".parse(), Ok(DropCommand::new(ShapeKind::L, -1)));
        assert_eq!("J+2".parse(), Ok(DropCommand::new(ShapeKind::J, 2)));
        assert_eq!("Z12".parse(), Ok(DropCommand::new(ShapeKind::Z, 12)));
        assert_eq!("S007".parse(), Ok(DropCommand::new(ShapeKind::S, 7)));
    }

    #[test]
    fn test_parse_errors() {
        let err = "X5".parse::<DropCommand>().unwrap_err();
        assert_eq!(err.kind(), FailureKind::UnknownShape);
        assert!(matches!(err, CommandParseError::UnknownShape { letter: 'X', .. }));

        assert_eq!(
            "q0".parse::<DropCommand>().unwrap_err().kind(),
            FailureKind::UnknownShape
        );
        assert_eq!(
            "5Q".parse::<DropCommand>().unwrap_err().kind(),
            FailureKind::UnknownShape
        );

        for token in ["Q", "Qx", "Q1.5", "Q 1", "Q--1", "Q99999999999999999999"] {
            let err = token.parse::<DropCommand>().unwrap_err();
            assert_eq!(err.kind(), FailureKind::InvalidCommand, "{token}");
        }

        assert_eq!("".parse::<DropCommand>(), Err(CommandParseError::Empty));
        assert_eq!(CommandParseError::Empty.kind(), FailureKind::InvalidCommand);
    }

    #[test]
    fn test_display_round_trip() {
        for command in [
            DropCommand::new(ShapeKind::Q, 0),
            DropCommand::new(ShapeKind::T, -4),
            DropCommand::new(ShapeKind::I, 10),
        ] {
            assert_eq!(command.to_string().parse(), Ok(command));
        }
    }

    #[test]
    fn test_parse_record_skips_empty_tokens() {
        let commands: Vec<_> = parse_record("Q0,, I2 ,T4,\r").collect();
        assert_eq!(
            commands,
            [
                Ok(DropCommand::new(ShapeKind::Q, 0)),
                Ok(DropCommand::new(ShapeKind::I, 2)),
                Ok(DropCommand::new(ShapeKind::T, 4)),
            ]
        );
        assert_eq!(parse_record("").count(), 0);
        assert_eq!(parse_record(",,,").count(), 0);
    }

    #[test]
    fn test_parse_record_is_lazy() {
        let mut commands = parse_record("Q0,X0,Q2");
        assert!(commands.next().unwrap().is_ok());
        assert!(commands.next().unwrap().is_err());
        assert!(commands.next().unwrap().is_ok());
    }

    #[test]
    fn test_command_serialization() {
        let command = DropCommand::new(ShapeKind::S, -2);
        let serialized = serde_json::to_string(&command).unwrap();
        assert_eq!(serialized, "\"S-2\"");
        let deserialized: DropCommand = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, command);

        assert!(serde_json::from_str::<DropCommand>("\"O1\"").is_err());
    }
}
