//! Core error types for slideport-core.
//!
//! These cover caller-supplied values that fail to parse or violate a
//! documented range. The server maps every variant to a validation failure.

use thiserror::Error;

/// Errors produced while parsing or validating core values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An identifier string is malformed or belongs to another namespace.
    #[error("invalid {expected} id: '{raw}'")]
    InvalidId { raw: String, expected: &'static str },

    /// A layout name is not part of the supported set.
    #[error("unknown layout '{name}', expected one of: {expected}")]
    UnknownLayout { name: String, expected: String },

    /// A geometry value is out of range.
    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// A font value is out of range.
    #[error("invalid font: {reason}")]
    InvalidFont { reason: String },
}
