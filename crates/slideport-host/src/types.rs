//! Reports returned by host queries.
//!
//! All positions are 1-based and reflect the host's structure at the moment
//! of the query. None of them are stored by the host backend.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use slideport_core::{DocHandle, LayoutType, ShapeHandle, SlideHandle};

/// State of the host application process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatus {
    pub running: bool,
    pub visible: bool,
    /// Host product/version string.
    pub version: String,
}

/// An open document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub handle: DocHandle,
    /// File name, or the host's placeholder name for unsaved documents.
    pub name: String,
    pub path: Option<PathBuf>,
    /// Unsaved changes present.
    pub dirty: bool,
    pub slide_count: usize,
}

/// A slide as currently positioned in its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSummary {
    pub handle: SlideHandle,
    pub position: usize,
    pub layout: LayoutType,
    /// Name of the slide master the slide inherits from.
    pub master: String,
    pub shape_count: usize,
}

/// A named, contiguous range of slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub name: String,
    /// Position of the first slide; for an empty section, where it would start.
    pub first_slide: usize,
    pub slide_count: usize,
}

/// What the user currently has selected in the host window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSelection {
    pub document: DocHandle,
    pub slide: Option<SlideHandle>,
    pub shapes: Vec<ShapeHandle>,
    /// Selected characters when the selection is inside a text frame.
    pub text: Option<String>,
}
