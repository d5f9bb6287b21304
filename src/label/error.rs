//! Label errors
//!
//! Only configuration problems are errors. Stale ranges, lookup misses and
//! missing handlers degrade to "no effect" and never reach this type.

use thiserror::Error;

/// Errors surfaced to the caller when configuring or scanning
#[derive(Debug, Error)]
pub enum LabelError {
    /// A custom regex/emoticon pattern failed to compile
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A colour string was not `#RRGGBB` or `#RRGGBBAA`
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Options could not be parsed
    #[error("invalid label config: {0}")]
    InvalidConfig(String),
}

pub type LabelResult<T> = Result<T, LabelError>;

impl From<serde_json::Error> for LabelError {
    fn from(e: serde_json::Error) -> Self {
        LabelError::InvalidConfig(e.to_string())
    }
}
