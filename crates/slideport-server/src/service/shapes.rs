//! Shape and text operations.

use slideport_core::{
    FontPatch, Geometry, GeometryPatch, PresentationId, ShapeHandle, ShapeId, ShapeSnapshot,
    SlideId,
};

use slideport_host::PresentationHost;

use super::{parse_id, DeckService};
use crate::error::ApiError;
use crate::registry::{ObjectRegistry, ResolvedShape};
use crate::schema::shapes::{
    AddTextBoxResponse, CopyShapeResponse, FontResponse, GeometryResponse, SetTitleResponse,
    ShapeListResponse, ShapePropertiesResponse, ShapeText, ShapeView, SlideTextResponse,
    UpdateTextResponse,
};

/// Parsed `(presentation, slide, shape)` triple.
fn parse_shape_path(
    presentation_id: &str,
    slide_id: &str,
    shape_id: &str,
) -> Result<(PresentationId, SlideId, ShapeId), ApiError> {
    Ok((
        parse_id(presentation_id)?,
        parse_id(slide_id)?,
        parse_id(shape_id)?,
    ))
}

fn require_text(shape: &ResolvedShape) -> Result<(), ApiError> {
    if shape.snapshot.kind.supports_text() {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "shape {} ({}) does not support text",
            shape.id,
            shape.snapshot.native_type.type_name()
        )))
    }
}

fn find_handle(shapes: &[(ShapeId, ShapeSnapshot)], handle: ShapeHandle) -> Option<&(ShapeId, ShapeSnapshot)> {
    shapes.iter().find(|(_, snapshot)| snapshot.handle == handle)
}

/// Re-walks a slide after a host edit already took effect. Failure is logged
/// and not returned, so callers never report an applied edit as failed; the
/// next resolve repairs the registry.
fn refresh_slide(
    registry: &mut ObjectRegistry,
    host: &dyn PresentationHost,
    presentation: PresentationId,
    slide: SlideId,
) -> Option<Vec<(ShapeId, ShapeSnapshot)>> {
    match registry.sync_shapes(host, presentation, slide) {
        Ok((_, shapes)) => Some(shapes),
        Err(err) => {
            tracing::warn!(slide = %slide, error = %err, "refreshing slide after edit failed");
            None
        }
    }
}

impl DeckService {
    /// Text of every text-bearing shape in z-order, plus the concatenation.
    pub fn get_slide_text(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
    ) -> Result<SlideTextResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let slide: SlideId = parse_id(slide_id)?;
        let (host, registry) = self.session()?;
        let (_, shapes) = registry.sync_shapes(&*host, id, slide)?;
        let texts: Vec<ShapeText> = shapes
            .into_iter()
            .filter(|(_, snapshot)| snapshot.kind.supports_text() && snapshot.has_text())
            .filter_map(|(shape_id, snapshot)| {
                snapshot.text.map(|text| ShapeText { shape_id, text })
            })
            .collect();
        let combined = texts
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(SlideTextResponse {
            slide_id: slide,
            texts,
            combined,
        })
    }

    /// Replaces the text of a shape, keeping geometry and formatting.
    pub fn update_text(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
        shape_id: &str,
        text: &str,
    ) -> Result<UpdateTextResponse, ApiError> {
        let (id, slide, shape) = parse_shape_path(presentation_id, slide_id, shape_id)?;
        let (host, registry) = self.session()?;
        let resolved = registry.resolve_shape(&*host, id, slide, shape)?;
        require_text(&resolved)?;
        host.set_text(
            resolved.slide.doc,
            resolved.slide.handle,
            resolved.handle(),
            text,
        )?;
        refresh_slide(registry, &*host, id, slide);
        tracing::info!(presentation = %id, slide = %slide, shape = %shape, chars = text.chars().count(), "text updated");
        Ok(UpdateTextResponse {
            shape_id: shape,
            text: text.to_string(),
        })
    }

    /// Adds a text box; offsets must be finite and non-negative, extents
    /// strictly positive.
    pub fn add_text_box(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
        text: &str,
        geometry: Geometry,
    ) -> Result<AddTextBoxResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let slide: SlideId = parse_id(slide_id)?;
        geometry.validate()?;

        let (host, registry) = self.session()?;
        let resolved = registry.resolve_slide(&*host, id, slide)?;
        let handle = host.add_text_box(resolved.doc, resolved.handle, geometry, text)?;
        let registered = registry
            .sync_shapes(&*host, id, slide)
            .map_err(ApiError::from)
            .and_then(|(_, shapes)| {
                find_handle(&shapes, handle)
                    .map(|(shape, snapshot)| (*shape, snapshot.geometry))
                    .ok_or_else(|| {
                        ApiError::HostOperation(format!("new text box is missing from slide {slide}"))
                    })
            });
        let (shape, geometry) = match registered {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(slide = %slide, error = %err, "registering new text box failed, rolling back");
                if let Err(rollback) = host.delete_shape(resolved.doc, resolved.handle, handle) {
                    tracing::error!(error = %rollback, "rollback of new text box failed");
                }
                return Err(err);
            }
        };
        tracing::info!(presentation = %id, slide = %slide, shape = %shape, "text box added");
        Ok(AddTextBoxResponse {
            shape_id: shape,
            geometry,
        })
    }

    /// Puts `title` into the slide's title placeholder.
    pub fn set_slide_title(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
        title: &str,
    ) -> Result<SetTitleResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let slide: SlideId = parse_id(slide_id)?;

        let (host, registry) = self.session()?;
        let (resolved, shapes) = registry.sync_shapes(&*host, id, slide)?;
        let (shape, snapshot) = shapes
            .iter()
            .find(|(_, snapshot)| snapshot.is_title_placeholder())
            .ok_or_else(|| {
                ApiError::Validation(format!(
                    "slide {slide} ({} layout) has no title placeholder",
                    resolved.layout
                ))
            })?;
        host.set_text(resolved.doc, resolved.handle, snapshot.handle, title)?;
        let shape = *shape;
        refresh_slide(registry, &*host, id, slide);
        tracing::info!(presentation = %id, slide = %slide, shape = %shape, "slide title set");
        Ok(SetTitleResponse {
            slide_id: slide,
            shape_id: shape,
            title: title.to_string(),
        })
    }

    /// Every shape of a slide in z-order.
    pub fn list_all_shapes_in_slide(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
    ) -> Result<ShapeListResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let slide: SlideId = parse_id(slide_id)?;
        let (host, registry) = self.session()?;
        let (_, shapes) = registry.sync_shapes(&*host, id, slide)?;
        let shapes: Vec<ShapeView> = shapes
            .iter()
            .map(|(shape_id, snapshot)| ShapeView::new(*shape_id, snapshot))
            .collect();
        Ok(ShapeListResponse {
            slide_id: slide,
            shape_count: shapes.len(),
            shapes,
        })
    }

    pub fn get_shape_properties(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
        shape_id: &str,
    ) -> Result<ShapePropertiesResponse, ApiError> {
        let (id, slide, shape) = parse_shape_path(presentation_id, slide_id, shape_id)?;
        let (host, registry) = self.session()?;
        let resolved = registry.resolve_shape(&*host, id, slide, shape)?;
        Ok(ShapePropertiesResponse {
            shape: ShapeView::new(shape, &resolved.snapshot),
            slide_id: slide,
            z_order: resolved.position,
            font: resolved.snapshot.font.clone(),
        })
    }

    /// Sets the font size, in points, of a whole text frame.
    pub fn set_text_font_size(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
        shape_id: &str,
        size: f64,
    ) -> Result<FontResponse, ApiError> {
        self.apply_font(presentation_id, slide_id, shape_id, FontPatch::size(size))
    }

    /// Sets the font face of a whole text frame.
    pub fn set_text_font_name(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
        shape_id: &str,
        name: &str,
    ) -> Result<FontResponse, ApiError> {
        self.apply_font(presentation_id, slide_id, shape_id, FontPatch::name(name.trim()))
    }

    fn apply_font(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
        shape_id: &str,
        patch: FontPatch,
    ) -> Result<FontResponse, ApiError> {
        let (id, slide, shape) = parse_shape_path(presentation_id, slide_id, shape_id)?;
        patch.validate()?;

        let (host, registry) = self.session()?;
        let resolved = registry.resolve_shape(&*host, id, slide, shape)?;
        require_text(&resolved)?;
        host.set_font(
            resolved.slide.doc,
            resolved.slide.handle,
            resolved.handle(),
            &patch,
        )?;
        let font = refresh_slide(registry, &*host, id, slide)
            .and_then(|shapes| {
                find_handle(&shapes, resolved.handle()).and_then(|(_, snapshot)| snapshot.font.clone())
            })
            .unwrap_or_else(|| patch.apply(&resolved.snapshot.font.clone().unwrap_or_default()));
        tracing::info!(presentation = %id, shape = %shape, ?patch, "font updated");
        Ok(FontResponse {
            shape_id: shape,
            font,
        })
    }

    /// Moves and/or resizes a shape; omitted values are unchanged.
    pub fn set_shape_position(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
        shape_id: &str,
        patch: GeometryPatch,
    ) -> Result<GeometryResponse, ApiError> {
        let (id, slide, shape) = parse_shape_path(presentation_id, slide_id, shape_id)?;
        if patch.is_empty() {
            return Err(ApiError::Validation(
                "at least one of left, top, width or height is required".to_string(),
            ));
        }
        patch.validate()?;

        let (host, registry) = self.session()?;
        let resolved = registry.resolve_shape(&*host, id, slide, shape)?;
        let geometry = host.set_geometry(
            resolved.slide.doc,
            resolved.slide.handle,
            resolved.handle(),
            &patch,
        )?;
        refresh_slide(registry, &*host, id, slide);
        tracing::info!(presentation = %id, shape = %shape, ?geometry, "shape repositioned");
        Ok(GeometryResponse {
            shape_id: shape,
            geometry,
        })
    }

    /// Copies a shape onto another slide of the same presentation, optionally
    /// moving the copy. The copy is removed again if positioning or
    /// registering it fails.
    pub fn copy_shape(
        &mut self,
        presentation_id: &str,
        source_slide_id: &str,
        shape_id: &str,
        target_slide_id: &str,
        left: Option<f64>,
        top: Option<f64>,
    ) -> Result<CopyShapeResponse, ApiError> {
        let (id, source, shape) = parse_shape_path(presentation_id, source_slide_id, shape_id)?;
        let target: SlideId = parse_id(target_slide_id)?;
        let offset = GeometryPatch {
            left,
            top,
            width: None,
            height: None,
        };
        offset.validate()?;

        let (host, registry) = self.session()?;
        let resolved = registry.resolve_shape(&*host, id, source, shape)?;
        let destination = registry.resolve_slide(&*host, id, target)?;
        let doc = destination.doc;
        let copy = host.copy_shape(doc, resolved.slide.handle, resolved.handle(), destination.handle)?;
        if !offset.is_empty() {
            if let Err(err) = host.set_geometry(doc, destination.handle, copy, &offset) {
                tracing::warn!(shape = %shape, error = %err, "positioning copied shape failed, rolling back");
                if let Err(rollback) = host.delete_shape(doc, destination.handle, copy) {
                    tracing::error!(error = %rollback, "rollback of copied shape failed");
                }
                return Err(err.into());
            }
        }

        let registered = registry
            .sync_shapes(&*host, id, target)
            .map_err(ApiError::from)
            .and_then(|(_, shapes)| {
                find_handle(&shapes, copy)
                    .map(|(new_id, snapshot)| (*new_id, snapshot.name.clone(), snapshot.geometry))
                    .ok_or_else(|| {
                        ApiError::HostOperation(format!("copied shape is missing from slide {target}"))
                    })
            });
        let (new_id, name, geometry) = match registered {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(shape = %shape, error = %err, "registering copied shape failed, rolling back");
                if let Err(rollback) = host.delete_shape(doc, destination.handle, copy) {
                    tracing::error!(error = %rollback, "rollback of copied shape failed");
                }
                return Err(err);
            }
        };
        tracing::info!(presentation = %id, source = %shape, shape = %new_id, slide = %target, "shape copied");
        Ok(CopyShapeResponse {
            shape_id: new_id,
            slide_id: target,
            name,
            geometry,
        })
    }
}
