//! Application and presentation request/response types.

use serde::{Deserialize, Serialize};
use slideport_core::{PresentationId, SlideId};

use super::shapes::ShapeView;

/// Response from initializing the host connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    pub running: bool,
    pub visible: bool,
    /// Host product/version string.
    pub version: String,
}

/// Summary view of an open presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationSummary {
    pub id: PresentationId,
    /// File name, or "Untitled" for documents never saved.
    pub name: String,
    pub path: Option<String>,
    pub slide_count: usize,
    /// Unsaved changes present.
    pub dirty: bool,
    /// Shown in the host's active window.
    pub active: bool,
}

/// Response for listing all open presentations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationListResponse {
    pub presentations: Vec<PresentationSummary>,
}

/// Request to open a presentation file.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenPresentationRequest {
    pub path: String,
}

/// Request to save a presentation, in place or under a new path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavePresentationRequest {
    #[serde(default)]
    pub path: Option<String>,
}

/// Request to write a copy of a presentation.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveCopyRequest {
    pub path: String,
}

/// Response from saving or copying a presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePresentationResponse {
    pub presentation_id: PresentationId,
    /// The file written.
    pub path: String,
}

/// Request to close a presentation.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosePresentationRequest {
    /// Save in place before closing. Defaults to `true`.
    #[serde(default = "default_save")]
    pub save: bool,
}

impl Default for ClosePresentationRequest {
    fn default() -> Self {
        ClosePresentationRequest {
            save: default_save(),
        }
    }
}

pub(crate) fn default_save() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosePresentationResponse {
    pub presentation_id: PresentationId,
    pub saved: bool,
}

/// 1-based, inclusive slide range of a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideRange {
    pub start: usize,
    pub end: usize,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionView {
    /// 1-based section index.
    pub index: usize,
    pub name: String,
    pub slide_range: SlideRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionsResponse {
    pub presentation_id: PresentationId,
    pub total_slides: usize,
    pub has_sections: bool,
    pub section_count: usize,
    pub sections: Vec<SectionView>,
}

/// Query for the current selection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionQuery {
    /// Restrict to this presentation, which must be the active one.
    #[serde(default)]
    pub presentation_id: Option<String>,
}

/// The user's selection in the host window, in registry ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub presentation_id: PresentationId,
    pub slide_id: Option<SlideId>,
    pub slide_position: Option<usize>,
    pub shapes: Vec<ShapeView>,
    /// Highlighted characters when the caret is inside a text frame.
    pub selected_text: Option<String>,
}
