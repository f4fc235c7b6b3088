use std::result::Result as StdResult;

use thiserror::Error;

use crate::level::{Direction, Level};

/// Result type for stepform operations.
pub type Result<T> = StdResult<T, Error>;

/// Parse error marker type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
#[error("{message}")]
pub struct ParseError {
    /// Parse error message, optionally including location.
    message: String,
}

impl ParseError {
    /// Construct a parse error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Construct a parse error with optional line/offset information.
    pub fn with_position(
        message: impl Into<String>,
        line: Option<usize>,
        offset: Option<usize>,
    ) -> Self {
        let message = message.into();
        let message = match (line, offset) {
            (Some(line), Some(offset)) => format!("{message} (line {line}, offset {offset})"),
            (Some(line), None) => format!("{message} (line {line})"),
            (None, Some(offset)) => format!("{message} (offset {offset})"),
            (None, None) => message,
        };
        Self { message }
    }
}

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// An index past the end of a registry was used to address an item.
    #[error("index {index} out of range for {level} registry (len {len})")]
    IndexOutOfRange {
        /// Registry level.
        level: Level,
        /// Offending index.
        index: usize,
        /// Registry length at the time of the call.
        len: usize,
    },

    /// No item with this id exists at the level.
    #[error("unknown {level} item: {id}")]
    UnknownItem {
        /// Registry level.
        level: Level,
        /// Requested id.
        id: String,
    },

    /// A resolved position has no backing item. The registries are out of
    /// sync with each other.
    #[error("structural: no {level} item at position {position} moving {direction}")]
    Structural {
        /// Level the position was resolved at.
        level: Level,
        /// Resolved position.
        position: usize,
        /// Direction of travel.
        direction: Direction,
    },

    #[error("unknown step mode: {0}")]
    /// Step-mode tag not recognised.
    UnknownStepMode(String),

    #[error("discovery: {0}")]
    /// Required structure missing or malformed at discovery time.
    Discovery(String),

    #[error("config: {0}")]
    /// Configuration failure.
    Config(String),

    #[error("invariant: {0}")]
    /// Activation flags violate a hierarchy invariant.
    Invariant(String),

    #[error("invalid: {0}")]
    /// Invalid input error.
    Invalid(String),

    #[error("parse error: {0}")]
    /// Parsing failure.
    Parse(#[source] ParseError),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        let line = (e.line() > 0).then_some(e.line());
        let column = (e.column() > 0).then_some(e.column());
        Self::Parse(ParseError::with_position(e.to_string(), line, column))
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        let offset = e.span().map(|span| span.start);
        Self::Parse(ParseError::with_position(e.message(), None, offset))
    }
}
