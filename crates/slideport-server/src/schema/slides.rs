//! Slide request/response types.

use serde::{Deserialize, Serialize};
use slideport_core::{LayoutType, PresentationId, ShapeId, SlideId};

/// A slide as currently positioned in its presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideView {
    pub id: SlideId,
    /// 1-based position at the time of the call.
    pub position: usize,
    /// Text of the title placeholder, if it has any.
    pub title: Option<String>,
    pub layout: LayoutType,
    pub shape_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideListResponse {
    pub presentation_id: PresentationId,
    pub slide_count: usize,
    pub slides: Vec<SlideView>,
}

/// Request to append a slide.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddSlideRequest {
    /// Layout name; `title_and_content` when omitted.
    #[serde(default)]
    pub layout: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSlideResponse {
    pub slide_id: SlideId,
    pub position: usize,
    pub layout: LayoutType,
    /// Ids of the placeholders the layout provided.
    pub shape_ids: Vec<ShapeId>,
}

/// Request to duplicate a slide.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CopySlideRequest {
    /// Logical position the copy goes after; 0 places it first, omitted
    /// places it last.
    #[serde(default)]
    pub insert_after: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopySlideResponse {
    pub slide_id: SlideId,
    pub source_slide_id: SlideId,
    pub position: usize,
    pub shape_ids: Vec<ShapeId>,
}

/// Request to move a slide.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveSlideRequest {
    pub new_position: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveSlideResponse {
    pub slide_id: SlideId,
    pub position: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSlideResponse {
    pub slide_id: SlideId,
    /// Slides remaining after the delete.
    pub slide_count: usize,
}
