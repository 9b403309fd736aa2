//! Shape vocabulary: kinds, native types, geometry and fonts.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::handle::ShapeHandle;
use crate::layout::PlaceholderRole;

/// Largest font size the host accepts, in points.
pub const MAX_FONT_SIZE: f64 = 4000.0;

/// Capability class of a shape, decided once when the shape is discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Text,
    Picture,
    Other,
}

impl ShapeKind {
    /// Whether the shape carries an editable text frame.
    pub fn supports_text(self) -> bool {
        matches!(self, ShapeKind::Text)
    }

    /// Classifies a shape from what the host reports about it.
    pub fn classify(
        native: NativeShapeType,
        has_text_frame: bool,
        placeholder: Option<PlaceholderRole>,
    ) -> Self {
        if has_text_frame {
            return ShapeKind::Text;
        }
        match (native, placeholder) {
            (NativeShapeType::Picture | NativeShapeType::LinkedPicture, _)
            | (_, Some(PlaceholderRole::Picture)) => ShapeKind::Picture,
            _ => ShapeKind::Other,
        }
    }
}

/// Native shape type as reported by the host (`MsoShapeType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeShapeType {
    AutoShape,
    Chart,
    Freeform,
    Group,
    EmbeddedObject,
    Line,
    LinkedPicture,
    Picture,
    Placeholder,
    TextBox,
    Media,
    Table,
    Diagram,
    Unknown,
}

impl NativeShapeType {
    /// Numeric `MsoShapeType` code.
    pub fn code(self) -> i32 {
        match self {
            NativeShapeType::AutoShape => 1,
            NativeShapeType::Chart => 3,
            NativeShapeType::Freeform => 5,
            NativeShapeType::Group => 6,
            NativeShapeType::EmbeddedObject => 7,
            NativeShapeType::Line => 9,
            NativeShapeType::LinkedPicture => 11,
            NativeShapeType::Picture => 13,
            NativeShapeType::Placeholder => 14,
            NativeShapeType::TextBox => 17,
            NativeShapeType::Media => 18,
            NativeShapeType::Table => 19,
            NativeShapeType::Diagram => 21,
            NativeShapeType::Unknown => -2,
        }
    }

    /// `MsoShapeType` constant name.
    pub fn type_name(self) -> &'static str {
        match self {
            NativeShapeType::AutoShape => "msoAutoShape",
            NativeShapeType::Chart => "msoChart",
            NativeShapeType::Freeform => "msoFreeform",
            NativeShapeType::Group => "msoGroup",
            NativeShapeType::EmbeddedObject => "msoEmbeddedOLEObject",
            NativeShapeType::Line => "msoLine",
            NativeShapeType::LinkedPicture => "msoLinkedPicture",
            NativeShapeType::Picture => "msoPicture",
            NativeShapeType::Placeholder => "msoPlaceholder",
            NativeShapeType::TextBox => "msoTextBox",
            NativeShapeType::Media => "msoMedia",
            NativeShapeType::Table => "msoTable",
            NativeShapeType::Diagram => "msoDiagram",
            NativeShapeType::Unknown => "msoShapeTypeMixed",
        }
    }
}

/// Position and size of a shape, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Geometry {
            left,
            top,
            width,
            height,
        }
    }

    /// Offsets must be finite and non-negative, extents strictly positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_offset("left", self.left)?;
        check_offset("top", self.top)?;
        check_extent("width", self.width)?;
        check_extent("height", self.height)?;
        Ok(())
    }
}

/// Partial geometry update; `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryPatch {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl GeometryPatch {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none() && self.width.is_none() && self.height.is_none()
    }

    /// Validates only the supplied fields.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(left) = self.left {
            check_offset("left", left)?;
        }
        if let Some(top) = self.top {
            check_offset("top", top)?;
        }
        if let Some(width) = self.width {
            check_extent("width", width)?;
        }
        if let Some(height) = self.height {
            check_extent("height", height)?;
        }
        Ok(())
    }

    pub fn apply(&self, base: Geometry) -> Geometry {
        Geometry {
            left: self.left.unwrap_or(base.left),
            top: self.top.unwrap_or(base.top),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
        }
    }
}

fn check_offset(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::InvalidGeometry {
            reason: format!("{field} must be a finite number >= 0, got {value}"),
        });
    }
    Ok(())
}

fn check_extent(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::InvalidGeometry {
            reason: format!("{field} must be a finite number > 0, got {value}"),
        });
    }
    Ok(())
}

/// Character formatting of a text frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: Option<bool>,
}

/// Partial font update applied to a whole text frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontPatch {
    pub name: Option<String>,
    pub size: Option<f64>,
}

impl FontPatch {
    pub fn size(size: f64) -> Self {
        FontPatch {
            name: None,
            size: Some(size),
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        FontPatch {
            name: Some(name.into()),
            size: None,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(size) = self.size {
            if !size.is_finite() || size <= 0.0 || size > MAX_FONT_SIZE {
                return Err(CoreError::InvalidFont {
                    reason: format!("size must be in (0, {MAX_FONT_SIZE}] points, got {size}"),
                });
            }
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(CoreError::InvalidFont {
                    reason: "font name must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn apply(&self, base: &Font) -> Font {
        Font {
            name: self.name.clone().or_else(|| base.name.clone()),
            size: self.size.or(base.size),
            bold: base.bold,
        }
    }
}

/// Everything the host reports about one shape at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    pub handle: ShapeHandle,
    pub name: String,
    pub native_type: NativeShapeType,
    pub kind: ShapeKind,
    pub placeholder: Option<PlaceholderRole>,
    pub geometry: Geometry,
    /// Text of the frame; `None` for shapes without one.
    pub text: Option<String>,
    pub font: Option<Font>,
}

impl ShapeSnapshot {
    /// Whether the shape carries non-blank text.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn is_title_placeholder(&self) -> bool {
        self.placeholder.is_some_and(PlaceholderRole::is_title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_frame_wins_classification() {
        assert_eq!(
            ShapeKind::classify(NativeShapeType::Placeholder, true, Some(PlaceholderRole::Title)),
            ShapeKind::Text
        );
        assert_eq!(
            ShapeKind::classify(NativeShapeType::AutoShape, true, None),
            ShapeKind::Text
        );
    }

    #[test]
    fn pictures_and_others() {
        assert_eq!(
            ShapeKind::classify(NativeShapeType::Picture, false, None),
            ShapeKind::Picture
        );
        assert_eq!(
            ShapeKind::classify(NativeShapeType::Placeholder, false, Some(PlaceholderRole::Picture)),
            ShapeKind::Picture
        );
        assert_eq!(
            ShapeKind::classify(NativeShapeType::Group, false, None),
            ShapeKind::Other
        );
        assert!(!ShapeKind::Picture.supports_text());
    }

    #[test]
    fn geometry_rejects_empty_box() {
        assert!(Geometry::new(0.0, 0.0, 10.0, 10.0).validate().is_ok());
        assert!(Geometry::new(0.0, 0.0, 0.0, 10.0).validate().is_err());
        assert!(Geometry::new(0.0, 0.0, 10.0, -1.0).validate().is_err());
        assert!(Geometry::new(-5.0, 0.0, 10.0, 10.0).validate().is_err());
        assert!(Geometry::new(f64::NAN, 0.0, 10.0, 10.0).validate().is_err());
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let base = Geometry::new(10.0, 20.0, 30.0, 40.0);
        let patch = GeometryPatch {
            left: Some(50.0),
            height: Some(5.0),
            ..GeometryPatch::default()
        };
        assert!(patch.validate().is_ok());
        assert_eq!(patch.apply(base), Geometry::new(50.0, 20.0, 30.0, 5.0));
        assert!(GeometryPatch { width: Some(0.0), ..GeometryPatch::default() }
            .validate()
            .is_err());
    }

    #[test]
    fn font_patch_bounds() {
        assert!(FontPatch::size(44.0).validate().is_ok());
        assert!(FontPatch::size(0.0).validate().is_err());
        assert!(FontPatch::size(4000.5).validate().is_err());
        assert!(FontPatch::name("  ").validate().is_err());

        let base = Font {
            name: Some("Calibri".into()),
            size: Some(18.0),
            bold: Some(true),
        };
        let patched = FontPatch::size(24.0).apply(&base);
        assert_eq!(patched.name.as_deref(), Some("Calibri"));
        assert_eq!(patched.size, Some(24.0));
        assert_eq!(patched.bold, Some(true));
    }

    #[test]
    fn native_codes_are_stable() {
        assert_eq!(NativeShapeType::TextBox.code(), 17);
        assert_eq!(NativeShapeType::Picture.code(), 13);
        assert_eq!(NativeShapeType::Placeholder.code(), 14);
        assert_eq!(NativeShapeType::Group.code(), 6);
        assert_eq!(NativeShapeType::TextBox.type_name(), "msoTextBox");
    }
}
