//! Slide operations, including the structural copy.

use slideport_core::{LayoutType, PresentationId, ShapeSnapshot, SlideId};

use super::{parse_id, DeckService};
use crate::error::ApiError;
use crate::schema::slides::{
    AddSlideResponse, CopySlideResponse, DeleteSlideResponse, MoveSlideResponse,
    SlideListResponse, SlideView,
};

/// Text of the slide's title placeholder, if it has any.
pub(crate) fn title_of(shapes: &[ShapeSnapshot]) -> Option<String> {
    shapes
        .iter()
        .find(|shape| shape.is_title_placeholder())
        .and_then(|shape| shape.text.clone())
        .filter(|text| !text.trim().is_empty())
}

impl DeckService {
    /// Slides in structural order with their ids.
    pub fn get_slides(&mut self, presentation_id: &str) -> Result<SlideListResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let (host, registry) = self.session()?;
        let walked = registry.sync_slides(&*host, id)?;
        let slides: Vec<SlideView> = walked
            .iter()
            .map(|bound| SlideView {
                id: bound.id,
                position: bound.summary.position,
                title: title_of(&bound.shapes),
                layout: bound.summary.layout,
                shape_count: bound.summary.shape_count,
            })
            .collect();
        Ok(SlideListResponse {
            presentation_id: id,
            slide_count: slides.len(),
            slides,
        })
    }

    /// Appends a slide built from `layout` (`title_and_content` when omitted).
    pub fn add_slide(
        &mut self,
        presentation_id: &str,
        layout: Option<&str>,
    ) -> Result<AddSlideResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let layout = match layout {
            Some(name) => name.parse::<LayoutType>()?,
            None => LayoutType::TitleAndContent,
        };

        let (host, registry) = self.session()?;
        let doc = registry.resolve_presentation(&*host, id)?;
        let position = host.slides(doc)?.len() + 1;
        let handle = host.add_slide(doc, position, layout)?;
        let (slide, shape_ids) = match registry
            .register_slide_tree(&*host, id, doc, handle, position, layout)
        {
            Ok(registered) => registered,
            Err(err) => {
                tracing::warn!(presentation = %id, error = %err, "registering new slide failed, rolling back");
                if let Err(rollback) = host.delete_slide(doc, handle) {
                    tracing::error!(error = %rollback, "rollback of new slide failed");
                }
                return Err(err.into());
            }
        };
        tracing::info!(presentation = %id, slide = %slide, position, layout = layout.name(), "slide added");
        Ok(AddSlideResponse {
            slide_id: slide,
            position,
            layout,
            shape_ids,
        })
    }

    /// Duplicates a slide with its layout, master, formatting and shapes,
    /// placing the copy right after logical position `insert_after` (0 puts
    /// it first; omitted puts it last). The copy's shapes get fresh ids.
    pub fn copy_slide(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
        insert_after: Option<usize>,
    ) -> Result<CopySlideResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let source: SlideId = parse_id(slide_id)?;

        let (host, registry) = self.session()?;
        let resolved = registry.resolve_slide(&*host, id, source)?;
        let count = host.slides(resolved.doc)?.len();
        let insert_after = insert_after.unwrap_or(count);
        if insert_after > count {
            return Err(ApiError::Validation(format!(
                "insert_after {insert_after} is outside 0..={count}"
            )));
        }
        let target = insert_after + 1;

        // The host places the duplicate right after the source.
        let duplicate = host.duplicate_slide(resolved.doc, resolved.handle)?;
        if let Err(err) = host.move_slide(resolved.doc, duplicate, target) {
            tracing::warn!(slide = %source, target, error = %err, "moving duplicate failed, rolling back");
            if let Err(rollback) = host.delete_slide(resolved.doc, duplicate) {
                tracing::error!(error = %rollback, "rollback of duplicate failed");
            }
            return Err(err.into());
        }

        let (slide, shape_ids) = match registry.register_slide_tree(
            &*host,
            id,
            resolved.doc,
            duplicate,
            target,
            resolved.layout,
        ) {
            Ok(registered) => registered,
            Err(err) => {
                tracing::warn!(slide = %source, error = %err, "registering duplicate failed, rolling back");
                if let Err(rollback) = host.delete_slide(resolved.doc, duplicate) {
                    tracing::error!(error = %rollback, "rollback of duplicate failed");
                }
                return Err(err.into());
            }
        };
        if let Ok(summaries) = host.slides(resolved.doc) {
            registry.refresh_positions(id, &summaries);
        }

        tracing::info!(
            presentation = %id,
            source = %source,
            slide = %slide,
            position = target,
            shapes = shape_ids.len(),
            "slide copied"
        );
        Ok(CopySlideResponse {
            slide_id: slide,
            source_slide_id: source,
            position: target,
            shape_ids,
        })
    }

    /// Deletes a slide and evicts it with its shapes. The last remaining
    /// slide cannot be deleted.
    pub fn delete_slide(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
    ) -> Result<DeleteSlideResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let slide: SlideId = parse_id(slide_id)?;

        let (host, registry) = self.session()?;
        let resolved = registry.resolve_slide(&*host, id, slide)?;
        let count = host.slides(resolved.doc)?.len();
        if count <= 1 {
            return Err(ApiError::Validation(format!(
                "cannot delete {slide}: a presentation must keep at least one slide"
            )));
        }
        host.delete_slide(resolved.doc, resolved.handle)?;
        registry.evict_slide(slide);
        let slide_count = match host.slides(resolved.doc) {
            Ok(summaries) => {
                registry.refresh_positions(id, &summaries);
                summaries.len()
            }
            Err(err) => {
                tracing::warn!(presentation = %id, error = %err, "refreshing positions after delete failed");
                count - 1
            }
        };
        tracing::info!(presentation = %id, slide = %slide, "slide deleted");
        Ok(DeleteSlideResponse {
            slide_id: slide,
            slide_count,
        })
    }

    /// Moves a slide to `new_position` (1-based). Ids are unaffected.
    pub fn move_slide(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
        new_position: usize,
    ) -> Result<MoveSlideResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let slide: SlideId = parse_id(slide_id)?;

        let (host, registry) = self.session()?;
        let resolved = registry.resolve_slide(&*host, id, slide)?;
        let count = host.slides(resolved.doc)?.len();
        if new_position == 0 || new_position > count {
            return Err(ApiError::Validation(format!(
                "new_position {new_position} is outside 1..={count}"
            )));
        }
        host.move_slide(resolved.doc, resolved.handle, new_position)?;
        match host.slides(resolved.doc) {
            Ok(summaries) => registry.refresh_positions(id, &summaries),
            Err(err) => {
                tracing::warn!(presentation = %id, error = %err, "refreshing positions after move failed");
            }
        }
        tracing::info!(presentation = %id, slide = %slide, from = resolved.position, to = new_position, "slide moved");
        Ok(MoveSlideResponse {
            slide_id: slide,
            position: new_position,
        })
    }
}
