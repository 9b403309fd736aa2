//! Host application abstraction for slideport.
//!
//! Provides the [`PresentationHost`] trait defining the contract every host
//! backend implements, plus [`MemoryHost`], a first-class in-process backend
//! used by tests, the stdio CLI and anywhere a real desktop application is not
//! available.
//!
//! # Modules
//!
//! - [`error`]: HostError enum with all host-side failure modes
//! - [`types`]: status, document, slide, section and selection reports
//! - [`traits`]: PresentationHost trait definition
//! - [`deck`]: the in-memory document model and its file format
//! - [`persist`]: atomic deck file reads and writes
//! - [`hash`]: content fingerprints used to re-bind drifted objects
//! - [`memory`]: MemoryHost implementation

pub mod deck;
pub mod error;
pub mod hash;
pub mod memory;
pub mod persist;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::HostError;
pub use hash::{shape_fingerprint, SlideFingerprint};
pub use memory::{HostFault, MemoryHost};
pub use traits::PresentationHost;
pub use types::{AppStatus, DocumentInfo, HostSelection, SectionInfo, SlideSummary};
