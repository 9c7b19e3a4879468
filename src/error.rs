//! Error types for the engine

use std::fmt;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur inside the engine.
///
/// Very little of the public surface returns these: analytical operations
/// swallow failures and degrade to empty or sentinel results. The error type
/// exists for the flag-string codec and for internal pattern compilation,
/// whose failure text feeds `validate_pattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A flag string contained a character outside `gimsuy`
    UnknownFlag(char),
    /// The native engine rejected the pattern
    Compile(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownFlag(ch) => write!(f, "Unknown regex flag: '{ch}'"),
            EngineError::Compile(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
