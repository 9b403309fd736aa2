//! Deterministic content fingerprints for slides and shapes using blake3.
//!
//! Fingerprints identify an object by what it looks like rather than by its
//! native handle. The registry stores them so that an id whose handle was
//! invalidated out-of-band (cut and paste in the host UI re-creates the
//! object) can be re-bound to the one object with identical content.
//!
//! A slide carries two hashes. The content hash covers every shape field; the
//! outline hash covers only the layout and the shape structure, so it still
//! matches after text or geometry was edited in the application window.
//!
//! Hashes are derived state. They are never persisted and never shown to
//! callers. Every variable-length field is length-prefixed so that adjacent
//! fields cannot collide.

use slideport_core::{Geometry, LayoutType, ShapeSnapshot};

/// Content and outline fingerprints of one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideFingerprint {
    pub content: blake3::Hash,
    pub outline: blake3::Hash,
}

impl SlideFingerprint {
    pub fn of(layout: LayoutType, shapes: &[ShapeSnapshot]) -> Self {
        SlideFingerprint {
            content: slide_fingerprint(layout, shapes),
            outline: slide_outline(layout, shapes),
        }
    }
}

/// Fingerprint of one shape: name, type, placeholder role, geometry, text
/// and font. The native handle is deliberately excluded.
pub fn shape_fingerprint(shape: &ShapeSnapshot) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    update_shape(&mut hasher, shape);
    hasher.finalize()
}

/// Fingerprint of a slide: its layout followed by every shape in z-order.
pub fn slide_fingerprint(layout: LayoutType, shapes: &[ShapeSnapshot]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&layout.pp_code().to_le_bytes());
    hasher.update(&(shapes.len() as u64).to_le_bytes());
    for shape in shapes {
        update_shape(&mut hasher, shape);
    }
    hasher.finalize()
}

/// Fingerprint of a slide's structure: its layout and the type, kind and
/// placeholder role of every shape in z-order.
pub fn slide_outline(layout: LayoutType, shapes: &[ShapeSnapshot]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&layout.pp_code().to_le_bytes());
    hasher.update(&(shapes.len() as u64).to_le_bytes());
    for shape in shapes {
        update_structure(&mut hasher, shape);
    }
    hasher.finalize()
}

fn update_structure(hasher: &mut blake3::Hasher, shape: &ShapeSnapshot) {
    hasher.update(&shape.native_type.code().to_le_bytes());
    hasher.update(&[shape.kind as u8]);
    match shape.placeholder {
        Some(role) => hasher.update(&role.pp_code().to_le_bytes()),
        None => hasher.update(&[0xff]),
    };
}

fn update_shape(hasher: &mut blake3::Hasher, shape: &ShapeSnapshot) {
    update_str(hasher, &shape.name);
    update_structure(hasher, shape);
    update_geometry(hasher, &shape.geometry);
    match &shape.text {
        Some(text) => {
            hasher.update(&[1]);
            update_str(hasher, text);
        }
        None => {
            hasher.update(&[0]);
        }
    }
    if let Some(font) = &shape.font {
        update_str(hasher, font.name.as_deref().unwrap_or_default());
        hasher.update(&font.size.unwrap_or_default().to_le_bytes());
        hasher.update(&[font.bold.map_or(2, u8::from)]);
    }
}

fn update_geometry(hasher: &mut blake3::Hasher, geometry: &Geometry) {
    for value in [geometry.left, geometry.top, geometry.width, geometry.height] {
        hasher.update(&value.to_le_bytes());
    }
}

fn update_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use slideport_core::{Font, NativeShapeType, ShapeHandle, ShapeKind};

    fn text_box(handle: u64, text: &str) -> ShapeSnapshot {
        ShapeSnapshot {
            handle: ShapeHandle(handle),
            name: "TextBox 1".into(),
            native_type: NativeShapeType::TextBox,
            kind: ShapeKind::Text,
            placeholder: None,
            geometry: Geometry::new(10.0, 10.0, 200.0, 50.0),
            text: Some(text.into()),
            font: Some(Font::default()),
        }
    }

    #[test]
    fn handle_does_not_affect_fingerprint() {
        assert_eq!(
            shape_fingerprint(&text_box(1, "hello")),
            shape_fingerprint(&text_box(99, "hello"))
        );
    }

    #[test]
    fn text_changes_fingerprint() {
        assert_ne!(
            shape_fingerprint(&text_box(1, "hello")),
            shape_fingerprint(&text_box(1, "hello!"))
        );
    }

    #[test]
    fn slide_fingerprint_depends_on_layout_and_order() {
        let a = text_box(1, "a");
        let b = text_box(2, "b");
        let forward = slide_fingerprint(LayoutType::Blank, &[a.clone(), b.clone()]);
        let reversed = slide_fingerprint(LayoutType::Blank, &[b.clone(), a.clone()]);
        let other_layout = slide_fingerprint(LayoutType::TitleOnly, &[a, b]);
        assert_ne!(forward, reversed);
        assert_ne!(forward, other_layout);
    }

    #[test]
    fn outline_ignores_text_and_geometry() {
        let before = text_box(1, "draft");
        let mut after = text_box(7, "final wording");
        after.geometry = Geometry::new(40.0, 40.0, 300.0, 80.0);
        let first = SlideFingerprint::of(LayoutType::Blank, &[before.clone()]);
        let second = SlideFingerprint::of(LayoutType::Blank, &[after]);
        assert_ne!(first.content, second.content);
        assert_eq!(first.outline, second.outline);
        assert_ne!(
            first.outline,
            SlideFingerprint::of(LayoutType::Blank, &[before.clone(), before]).outline
        );
    }

    #[test]
    fn length_prefix_prevents_field_bleed() {
        let mut first = text_box(1, "bc");
        first.name = "a".into();
        let mut second = text_box(1, "c");
        second.name = "ab".into();
        assert_ne!(shape_fingerprint(&first), shape_fingerprint(&second));
    }
}
