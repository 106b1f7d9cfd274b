//! Error types for ValueSet lookup generation
//!
//! Every fallible library operation returns [`GenError`]. The binary wraps these
//! in `anyhow` for reporting; usage errors are produced by argument parsing in
//! the binary and never reach this type.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    /// An input file is not valid JSON or does not match the expected
    /// ValueSet/CodeSystem shape. Aborts the run.
    #[error("Malformed resource {}: {message}", .path.display())]
    MalformedResource { path: PathBuf, message: String },

    /// `compose.exclude` names a system with no `concept` list. An empty list is
    /// accepted and excludes nothing.
    #[error(
        "ValueSet '{value_set}' excludes system '{system}' without listing concepts; whole-system excludes are not supported"
    )]
    UnsupportedExclude { value_set: String, system: String },

    /// The ValueSet `name` cannot be used as a type name by the selected emitter.
    #[error("'{name}' is not a valid {target} identifier")]
    InvalidIdentifier { name: String, target: &'static str },

    /// Generated source failed to re-parse before pretty-printing.
    #[error("Failed to render {name}: {message}")]
    Render { name: String, message: String },

    #[error("Invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Resources directory not found: {}", .0.display())]
    MissingResourceDir(PathBuf),

    #[error("Failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GenError::MalformedResource {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, GenError>;
