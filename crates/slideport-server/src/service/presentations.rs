//! Application and presentation operations.

use std::fs;
use std::path::{Path, PathBuf};

use slideport_core::{DocHandle, PresentationId, SlideId};
use slideport_host::{DocumentInfo, HostError};

use super::{parse_id, DeckService};
use crate::error::ApiError;
use crate::schema::presentations::{
    ClosePresentationResponse, InitializeResponse, PresentationListResponse, PresentationSummary,
    SavePresentationResponse, SectionView, SectionsResponse, SelectionResponse, SlideRange,
};
use crate::schema::shapes::ShapeView;

fn summary(id: PresentationId, info: &DocumentInfo, active: Option<DocHandle>) -> PresentationSummary {
    let name = info
        .path
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string());
    PresentationSummary {
        id,
        name,
        path: info.path.as_ref().map(|p| p.display().to_string()),
        slide_count: info.slide_count,
        dirty: info.dirty,
        active: active == Some(info.handle),
    }
}

fn non_blank_path(raw: &str) -> Result<PathBuf, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("path must not be empty".to_string()));
    }
    Ok(PathBuf::from(trimmed))
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|parent| !parent.as_os_str().is_empty())
}

impl DeckService {
    /// Attaches to the host application. Idempotent.
    pub fn initialize(&mut self) -> Result<InitializeResponse, ApiError> {
        let status = self.app.initialize()?;
        Ok(InitializeResponse {
            running: status.running,
            visible: status.visible,
            version: status.version,
        })
    }

    /// Lists open presentations, binding documents opened and evicting
    /// documents closed in the application window.
    pub fn list_presentations(&mut self) -> Result<PresentationListResponse, ApiError> {
        let (host, registry) = self.session()?;
        let listed = registry.sync_presentations(&*host)?;
        let active = host.active_document()?;
        Ok(PresentationListResponse {
            presentations: listed
                .iter()
                .map(|(id, info)| summary(*id, info, active))
                .collect(),
        })
    }

    /// Creates a blank presentation with one title slide.
    pub fn create_presentation(&mut self) -> Result<PresentationSummary, ApiError> {
        let (host, registry) = self.session()?;
        let doc = host.create_document()?;
        let id = registry.register_presentation(doc);
        if let Err(err) = registry.sync_slides(&*host, id) {
            registry.evict_presentation(id);
            if let Err(close) = host.close_document(doc) {
                tracing::error!(error = %close, "failed to discard new document");
            }
            return Err(err.into());
        }
        let info = host.document(doc)?;
        tracing::info!(presentation = %id, "presentation created");
        Ok(summary(id, &info, host.active_document()?))
    }

    /// Opens a presentation file. A file that is already open keeps its id.
    pub fn open_presentation(&mut self, path: &str) -> Result<PresentationSummary, ApiError> {
        let path = non_blank_path(path)?;
        if !path.is_file() {
            return Err(ApiError::Validation(format!(
                "{} is not a readable file",
                path.display()
            )));
        }
        if let Err(err) = fs::File::open(&path) {
            return Err(ApiError::Validation(format!(
                "{} is not readable: {err}",
                path.display()
            )));
        }

        let (host, registry) = self.session()?;
        if !host.supports_format(&path) {
            return Err(ApiError::Validation(format!(
                "{} is not a supported presentation format",
                path.display()
            )));
        }
        let doc = host.open_document(&path)?;
        let known = registry.presentation_by_handle(doc).is_some();
        let id = registry.register_presentation(doc);
        if !known {
            if let Err(err) = registry.sync_slides(&*host, id) {
                registry.evict_presentation(id);
                return Err(err.into());
            }
        }
        let info = host.document(doc)?;
        tracing::info!(presentation = %id, path = %path.display(), reopened = known, "presentation opened");
        Ok(summary(id, &info, host.active_document()?))
    }

    /// Saves in place, or under `path` which becomes the document's path.
    pub fn save_presentation(
        &mut self,
        presentation_id: &str,
        path: Option<&str>,
    ) -> Result<SavePresentationResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let target = path.map(non_blank_path).transpose()?;
        if let Some(dir) = target.as_deref().and_then(parent_dir) {
            if !dir.is_dir() {
                return Err(ApiError::Validation(format!(
                    "directory {} does not exist",
                    dir.display()
                )));
            }
        }

        let (host, registry) = self.session()?;
        let doc = registry.resolve_presentation(&*host, id)?;
        if let Some(target) = &target {
            if !host.supports_format(target) {
                return Err(ApiError::Validation(format!(
                    "{} is not a supported presentation format",
                    target.display()
                )));
            }
        }
        let written = host.save_document(doc, target.as_deref())?;
        tracing::info!(presentation = %id, path = %written.display(), "presentation saved");
        Ok(SavePresentationResponse {
            presentation_id: id,
            path: written.display().to_string(),
        })
    }

    /// Writes a full copy; the live document keeps its path and dirty state.
    pub fn save_copy(
        &mut self,
        presentation_id: &str,
        path: &str,
    ) -> Result<SavePresentationResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let target = non_blank_path(path)?;

        let (host, registry) = self.session()?;
        let doc = registry.resolve_presentation(&*host, id)?;
        if !host.supports_format(&target) {
            return Err(ApiError::Validation(format!(
                "{} is not a supported presentation format",
                target.display()
            )));
        }
        if let Some(dir) = parent_dir(&target) {
            fs::create_dir_all(dir).map_err(|e| HostError::io(e, dir))?;
        }
        host.save_copy(doc, &target)?;
        tracing::info!(presentation = %id, path = %target.display(), "presentation copy saved");
        Ok(SavePresentationResponse {
            presentation_id: id,
            path: target.display().to_string(),
        })
    }

    /// Optionally saves, then closes and evicts the presentation with all of
    /// its slide and shape ids. A failed save leaves it open.
    pub fn close_presentation(
        &mut self,
        presentation_id: &str,
        save: bool,
    ) -> Result<ClosePresentationResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let (host, registry) = self.session()?;
        let doc = registry.resolve_presentation(&*host, id)?;
        if save {
            host.save_document(doc, None)?;
        }
        host.close_document(doc)?;
        registry.evict_presentation(id);
        tracing::info!(presentation = %id, saved = save, "presentation closed");
        Ok(ClosePresentationResponse {
            presentation_id: id,
            saved: save,
        })
    }

    pub fn get_presentation_info(
        &mut self,
        presentation_id: &str,
    ) -> Result<PresentationSummary, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let (host, registry) = self.session()?;
        let doc = registry.resolve_presentation(&*host, id)?;
        let info = host.document(doc)?;
        Ok(summary(id, &info, host.active_document()?))
    }

    /// Sections with their slide ranges; empty when the document has none.
    pub fn get_presentation_sections(
        &mut self,
        presentation_id: &str,
    ) -> Result<SectionsResponse, ApiError> {
        let id: PresentationId = parse_id(presentation_id)?;
        let (host, registry) = self.session()?;
        let doc = registry.resolve_presentation(&*host, id)?;
        let total_slides = host.document(doc)?.slide_count;
        let sections: Vec<SectionView> = host
            .sections(doc)?
            .into_iter()
            .enumerate()
            .map(|(index, section)| SectionView {
                index: index + 1,
                name: section.name,
                slide_range: SlideRange {
                    start: section.first_slide,
                    end: section.first_slide + section.slide_count - 1,
                    count: section.slide_count,
                },
            })
            .collect();
        Ok(SectionsResponse {
            presentation_id: id,
            total_slides,
            has_sections: !sections.is_empty(),
            section_count: sections.len(),
            sections,
        })
    }

    /// The user's current selection, in registry ids. Without an id the
    /// active document is used and bound if it is not registered yet.
    pub fn get_selected_shapes(
        &mut self,
        presentation_id: Option<&str>,
    ) -> Result<SelectionResponse, ApiError> {
        let requested = presentation_id
            .map(parse_id::<PresentationId>)
            .transpose()?;
        let (host, registry) = self.session()?;
        let active = host.active_document()?;

        let (id, doc) = match requested {
            Some(id) => {
                let doc = registry.resolve_presentation(&*host, id)?;
                if active != Some(doc) {
                    return Err(ApiError::Validation(format!(
                        "presentation {id} is not the active document"
                    )));
                }
                (id, doc)
            }
            None => {
                let doc = active.ok_or_else(|| {
                    ApiError::Validation("no presentation is active in the host".to_string())
                })?;
                let known = registry.presentation_by_handle(doc).is_some();
                let id = registry.register_presentation(doc);
                if !known {
                    if let Err(err) = registry.sync_slides(&*host, id) {
                        registry.evict_presentation(id);
                        return Err(err.into());
                    }
                }
                (id, doc)
            }
        };

        let mut response = SelectionResponse {
            presentation_id: id,
            slide_id: None,
            slide_position: None,
            shapes: Vec::new(),
            selected_text: None,
        };
        let Some(selection) = host.selection()?.filter(|s| s.document == doc) else {
            return Ok(response);
        };
        response.selected_text = selection.text.clone();
        let Some(slide_handle) = selection.slide else {
            return Ok(response);
        };

        let walked = registry.sync_slides(&*host, id)?;
        let Some(slide) = walked.iter().find(|bound| bound.summary.handle == slide_handle) else {
            return Ok(response);
        };
        let slide_id: SlideId = slide.id;
        response.slide_id = Some(slide_id);
        response.slide_position = Some(slide.summary.position);

        let (_, shapes) = registry.sync_shapes(&*host, id, slide_id)?;
        response.shapes = selection
            .shapes
            .iter()
            .filter_map(|handle| {
                shapes
                    .iter()
                    .find(|(_, snapshot)| snapshot.handle == *handle)
                    .map(|(shape_id, snapshot)| ShapeView::new(*shape_id, snapshot))
            })
            .collect();
        Ok(response)
    }
}
