//! Error types for chain resolution and request payloads

use std::fmt;
use thiserror::Error;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Which half of a proxy chain an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainField {
    Subject,
    Issuer,
}

impl fmt::Display for ChainField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainField::Subject => write!(f, "subject"),
            ChainField::Issuer => write!(f, "issuer"),
        }
    }
}

/// A proxy chain that cannot be turned into a principal set
///
/// Every variant is a client error; none of them consult a trust store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// No frontline caller at all
    #[error("proxy chain is empty")]
    Empty,

    /// One issuer per subject is required
    #[error("proxy chain has {subjects} subjects but {issuers} issuers")]
    LengthMismatch { subjects: usize, issuers: usize },

    /// Blank entry at the given chain position
    #[error("{field} at position {index} is empty")]
    EmptyEntry { field: ChainField, index: usize },

    /// Entry present but not a usable name
    #[error("{field} at position {index} is unparseable: {reason}")]
    Unparseable {
        field: ChainField,
        index: usize,
        reason: String,
    },

    /// Proxied header text not in `<dn><dn>...` form
    #[error("invalid {field} chain header: {reason}")]
    InvalidHeader { field: ChainField, reason: String },
}

/// Errors building or decoding modification request payloads
#[derive(Error, Debug)]
pub enum CoreError {
    /// Payload did not serialize to a JSON object
    #[error("request payload for '{0}' must be an object")]
    PayloadNotObject(String),

    /// Payload uses the field name reserved for the variant tag
    #[error("request payload uses reserved field '{0}'")]
    ReservedField(String),

    /// Decoding asked for a different variant than the request carries
    #[error("request variant mismatch: expected '{expected}', got '{actual}'")]
    VariantMismatch { expected: String, actual: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
