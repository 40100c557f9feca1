use std::fmt;

use thiserror::Error;

/// Which identifier rule a segment was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRule {
    /// `[a-zA-Z0-9-_.]+`
    Standard,
    /// The standard rule plus `/`, used for file names.
    File,
}

impl fmt::Display for IdRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdRule::Standard => f.write_str("letters, digits, '-', '_' or '.'"),
            IdRule::File => f.write_str("letters, digits, '-', '_', '.' or '/'"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid id '{id}' (expected {rule})")]
    InvalidId { id: String, rule: IdRule },

    #[error("unrecognized resource name '{0}'")]
    Unrecognized(String),

    #[error("'{0}' names a collection, not a single resource")]
    NotSingular(String),

    #[error("'{0}' has a '.' or '..' segment and cannot be addressed over HTTP")]
    UnaddressableName(String),

    #[error("registry returned page token '{0}' more than once")]
    RepeatedPageToken(String),

    #[error("{message} (HTTP {status})")]
    Remote { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode registry response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the registry reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Remote { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
