//! All error types for the langsync crate.
//!
//! These are returned from every fallible operation (validation, index
//! building, merging, committing, configuration loading).

use std::path::PathBuf;

use thiserror::Error;

use crate::validate::Eligibility;

/// Result type for langsync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("invalid config at {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("invalid locale directory pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("not an Android resource file: {}", .0.display())]
    NotAResourceFile(PathBuf),

    #[error("cannot sync {}: {reason}", .path.display())]
    Ineligible { path: PathBuf, reason: Eligibility },

    #[error("target {} does not share the source file name `{source_name}`", .target.display())]
    FileNameMismatch { source_name: String, target: PathBuf },

    #[error("invalid session: {0}")]
    InvalidSession(String),
}

impl Error {
    /// Wraps an I/O error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new session precondition error
    pub fn invalid_session(message: impl Into<String>) -> Self {
        Error::InvalidSession(message.into())
    }
}
