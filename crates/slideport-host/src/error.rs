//! Host error types for slideport-host.
//!
//! [`HostError`] covers every way a host backend can refuse or fail an
//! operation: connection problems, stale native handles, caller mistakes the
//! host itself detects, and I/O while reading or writing documents.

use std::path::{Path, PathBuf};

use slideport_core::{DocHandle, ShapeHandle, SlideHandle};
use thiserror::Error;

/// Errors produced by host operations.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host application could not be launched.
    #[error("host application is not available: {0}")]
    NotInstalled(String),

    /// An operation was issued before the host was attached.
    #[error("host application is not running")]
    NotRunning,

    /// The document handle no longer refers to an open document.
    #[error("document {0} is not open")]
    DocumentNotFound(DocHandle),

    /// The slide handle is not part of the document.
    #[error("slide {slide} not found in document {doc}")]
    SlideNotFound { doc: DocHandle, slide: SlideHandle },

    /// The shape handle is not part of the slide.
    #[error("shape {shape} not found on slide {slide}")]
    ShapeNotFound { slide: SlideHandle, shape: ShapeHandle },

    /// A 1-based slide position outside the document.
    #[error("slide position {position} out of range 1..={count}")]
    PositionOutOfRange { position: usize, count: usize },

    /// Text or font operation on a shape without a text frame.
    #[error("shape {0} has no text frame")]
    NoTextFrame(ShapeHandle),

    /// In-place save of a document that was never saved.
    #[error("document {0} has no file path yet")]
    NoPath(DocHandle),

    /// The host refused to open a file.
    #[error("host refused to open {path:?}: {reason}")]
    OpenRejected { path: PathBuf, reason: String },

    /// The host rejected or failed an operation.
    #[error("host rejected {operation}: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },

    /// Reading or writing a document file failed.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Deck (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HostError {
    /// Create an I/O error with path context.
    pub fn io(source: std::io::Error, path: &Path) -> Self {
        HostError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        HostError::Rejected {
            operation,
            reason: reason.into(),
        }
    }
}
