//! Shape and text request/response types.

use serde::{Deserialize, Serialize};
use slideport_core::{Font, Geometry, PlaceholderRole, ShapeId, ShapeKind, ShapeSnapshot, SlideId};

/// A shape as reported to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeView {
    pub id: ShapeId,
    pub name: String,
    pub kind: ShapeKind,
    /// Native shape type code.
    #[serde(rename = "type")]
    pub type_code: i32,
    pub type_name: String,
    pub placeholder: Option<PlaceholderRole>,
    pub text: Option<String>,
    pub geometry: Geometry,
}

impl ShapeView {
    pub fn new(id: ShapeId, snapshot: &ShapeSnapshot) -> Self {
        ShapeView {
            id,
            name: snapshot.name.clone(),
            kind: snapshot.kind,
            type_code: snapshot.native_type.code(),
            type_name: snapshot.native_type.type_name().to_string(),
            placeholder: snapshot.placeholder,
            text: snapshot.text.clone(),
            geometry: snapshot.geometry,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeText {
    pub shape_id: ShapeId,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideTextResponse {
    pub slide_id: SlideId,
    /// Text-bearing shapes in z-order.
    pub texts: Vec<ShapeText>,
    /// All texts joined by newlines.
    pub combined: String,
}

/// Request to replace the text of a shape.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTextRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTextResponse {
    pub shape_id: ShapeId,
    pub text: String,
}

/// Request to add a text box, in points.
#[derive(Debug, Clone, Deserialize)]
pub struct AddTextBoxRequest {
    pub text: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTextBoxResponse {
    pub shape_id: ShapeId,
    pub geometry: Geometry,
}

/// Request to set the slide title.
#[derive(Debug, Clone, Deserialize)]
pub struct SetTitleRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTitleResponse {
    pub slide_id: SlideId,
    /// The title placeholder that received the text.
    pub shape_id: ShapeId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeListResponse {
    pub slide_id: SlideId,
    pub shape_count: usize,
    pub shapes: Vec<ShapeView>,
}

/// Full detail of one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapePropertiesResponse {
    #[serde(flatten)]
    pub shape: ShapeView,
    pub slide_id: SlideId,
    /// 1-based z-order position.
    pub z_order: usize,
    pub font: Option<Font>,
}

/// Request to set the font size of a whole text frame.
#[derive(Debug, Clone, Deserialize)]
pub struct FontSizeRequest {
    pub size: f64,
}

/// Request to set the font face of a whole text frame.
#[derive(Debug, Clone, Deserialize)]
pub struct FontNameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontResponse {
    pub shape_id: ShapeId,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryResponse {
    pub shape_id: ShapeId,
    pub geometry: Geometry,
}

/// Request to copy a shape onto another slide.
#[derive(Debug, Clone, Deserialize)]
pub struct CopyShapeRequest {
    pub target_slide_id: String,
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub top: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyShapeResponse {
    pub shape_id: ShapeId,
    pub slide_id: SlideId,
    pub name: String,
    pub geometry: Geometry,
}
