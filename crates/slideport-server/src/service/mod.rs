//! DeckService: the command facade over the host and the object registry.
//!
//! [`DeckService`] owns the [`ApplicationHandle`] and the [`ObjectRegistry`].
//! Every boundary operation follows the same sequence:
//!
//! 1. parse ids and validate arguments (no host call yet);
//! 2. attach to the host lazily;
//! 3. resolve ids through the registry, which re-validates them;
//! 4. perform the host calls, rolling back host-side partial work on failure;
//! 5. update the registry only once the host side has succeeded.
//!
//! All failures leave as [`ApiError`]. HTTP handlers and the command
//! transports are thin wrappers around these methods.

mod presentations;
mod shapes;
mod slides;

use std::str::FromStr;

use serde::Serialize;
use slideport_core::CoreError;
use slideport_host::{MemoryHost, PresentationHost};

use crate::app::ApplicationHandle;
use crate::error::ApiError;
use crate::registry::ObjectRegistry;
use crate::schema::commands::Command;

/// The facade every transport talks to.
pub struct DeckService {
    app: ApplicationHandle,
    registry: ObjectRegistry,
}

impl DeckService {
    pub fn new(host: impl PresentationHost + 'static) -> Self {
        DeckService {
            app: ApplicationHandle::new(host),
            registry: ObjectRegistry::new(),
        }
    }

    /// A service over a fresh in-memory host. The returned host clone shares
    /// state with the service and can stand in for the user.
    pub fn in_memory(hidden: bool) -> (Self, MemoryHost) {
        let host = if hidden {
            MemoryHost::hidden()
        } else {
            MemoryHost::new()
        };
        (DeckService::new(host.clone()), host)
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// The attached host together with the registry.
    fn session(&mut self) -> Result<(&mut dyn PresentationHost, &mut ObjectRegistry), ApiError> {
        let host = self.app.host()?;
        Ok((host, &mut self.registry))
    }

    /// Executes a command by name and returns its payload as JSON.
    pub fn execute(&mut self, command: Command) -> Result<serde_json::Value, ApiError> {
        tracing::debug!(op = command.name(), "executing command");
        match command {
            Command::Initialize => to_json(self.initialize()),
            Command::ListPresentations => to_json(self.list_presentations()),
            Command::CreatePresentation => to_json(self.create_presentation()),
            Command::OpenPresentation { path } => to_json(self.open_presentation(&path)),
            Command::SavePresentation {
                presentation_id,
                path,
            } => to_json(self.save_presentation(&presentation_id, path.as_deref())),
            Command::SaveCopy {
                presentation_id,
                path,
            } => to_json(self.save_copy(&presentation_id, &path)),
            Command::ClosePresentation {
                presentation_id,
                save,
            } => to_json(self.close_presentation(&presentation_id, save)),
            Command::GetPresentationInfo { presentation_id } => {
                to_json(self.get_presentation_info(&presentation_id))
            }
            Command::GetPresentationSections { presentation_id } => {
                to_json(self.get_presentation_sections(&presentation_id))
            }
            Command::GetSelectedShapes { presentation_id } => {
                to_json(self.get_selected_shapes(presentation_id.as_deref()))
            }
            Command::GetSlides { presentation_id } => to_json(self.get_slides(&presentation_id)),
            Command::AddSlide {
                presentation_id,
                layout,
            } => to_json(self.add_slide(&presentation_id, layout.as_deref())),
            Command::CopySlide {
                presentation_id,
                slide_id,
                insert_after,
            } => to_json(self.copy_slide(&presentation_id, &slide_id, insert_after)),
            Command::DeleteSlide {
                presentation_id,
                slide_id,
            } => to_json(self.delete_slide(&presentation_id, &slide_id)),
            Command::MoveSlide {
                presentation_id,
                slide_id,
                new_position,
            } => to_json(self.move_slide(&presentation_id, &slide_id, new_position)),
            Command::GetSlideText {
                presentation_id,
                slide_id,
            } => to_json(self.get_slide_text(&presentation_id, &slide_id)),
            Command::UpdateText {
                presentation_id,
                slide_id,
                shape_id,
                text,
            } => to_json(self.update_text(&presentation_id, &slide_id, &shape_id, &text)),
            Command::AddTextBox {
                presentation_id,
                slide_id,
                text,
                left,
                top,
                width,
                height,
            } => to_json(self.add_text_box(
                &presentation_id,
                &slide_id,
                &text,
                slideport_core::Geometry::new(left, top, width, height),
            )),
            Command::SetSlideTitle {
                presentation_id,
                slide_id,
                title,
            } => to_json(self.set_slide_title(&presentation_id, &slide_id, &title)),
            Command::ListAllShapesInSlide {
                presentation_id,
                slide_id,
            } => to_json(self.list_all_shapes_in_slide(&presentation_id, &slide_id)),
            Command::GetShapeProperties {
                presentation_id,
                slide_id,
                shape_id,
            } => to_json(self.get_shape_properties(&presentation_id, &slide_id, &shape_id)),
            Command::SetTextFontSize {
                presentation_id,
                slide_id,
                shape_id,
                size,
            } => to_json(self.set_text_font_size(&presentation_id, &slide_id, &shape_id, size)),
            Command::SetTextFontName {
                presentation_id,
                slide_id,
                shape_id,
                name,
            } => to_json(self.set_text_font_name(&presentation_id, &slide_id, &shape_id, &name)),
            Command::SetShapePosition {
                presentation_id,
                slide_id,
                shape_id,
                left,
                top,
                width,
                height,
            } => to_json(self.set_shape_position(
                &presentation_id,
                &slide_id,
                &shape_id,
                slideport_core::GeometryPatch {
                    left,
                    top,
                    width,
                    height,
                },
            )),
            Command::CopyShape {
                presentation_id,
                source_slide_id,
                shape_id,
                target_slide_id,
                left,
                top,
            } => to_json(self.copy_shape(
                &presentation_id,
                &source_slide_id,
                &shape_id,
                &target_slide_id,
                left,
                top,
            )),
        }
    }

    /// Decodes a raw JSON command and executes it.
    pub fn execute_json(&mut self, raw: &str) -> Result<serde_json::Value, ApiError> {
        let command: Command = serde_json::from_str(raw)
            .map_err(|e| ApiError::Validation(format!("invalid command: {e}")))?;
        self.execute(command)
    }
}

fn to_json<T: Serialize>(result: Result<T, ApiError>) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(result?)
        .map_err(|e| ApiError::HostOperation(format!("failed to encode response: {e}")))
}

/// Parses a caller-supplied id of any namespace.
pub(crate) fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = CoreError>,
{
    raw.parse().map_err(ApiError::from)
}

#[cfg(test)]
mod tests;
