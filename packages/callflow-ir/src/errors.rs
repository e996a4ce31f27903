//! Error types for callflow-ir.
//!
//! Provides unified error handling across the crate, per SPEC_FULL.md §7/§10.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for callflow-ir operations.
#[derive(Debug, Error)]
pub enum CallflowError {
    /// Invalid flag combination, unrecognized output extension, no/ambiguous
    /// subset target match.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required external tool (the `dot` binary, for image output) is missing.
    #[error("missing dependency: {0}")]
    Dependency(String),

    /// A source file could not be parsed.
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Filesystem error reading a source path or writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CallflowError {
    pub fn config(msg: impl Into<String>) -> Self {
        CallflowError::Config(msg.into())
    }

    pub fn dependency(msg: impl Into<String>) -> Self {
        CallflowError::Dependency(msg.into())
    }

    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CallflowError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// A stable string for CLI exit-code mapping and the JSON error payload.
    pub fn kind(&self) -> &'static str {
        match self {
            CallflowError::Config(_) => "config",
            CallflowError::Dependency(_) => "dependency",
            CallflowError::Parse { .. } => "parse",
            CallflowError::Io(_) => "io",
        }
    }
}

/// Result type alias for callflow operations.
pub type Result<T> = std::result::Result<T, CallflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_stable_per_variant() {
        assert_eq!(CallflowError::config("x").kind(), "config");
        assert_eq!(CallflowError::dependency("dot").kind(), "dependency");
        assert_eq!(CallflowError::parse("a.py", "bad syntax").kind(), "parse");
    }
}
