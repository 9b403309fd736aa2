//! Command dispatch by name.
//!
//! A [`Command`] names one boundary operation and carries all of its
//! arguments, ids included. It is the request type of `POST /commands` and
//! of each line on the stdio transport:
//!
//! ```json
//! {"op": "copy_slide", "presentation_id": "pres-1", "slide_id": "slide-2", "insert_after": 3}
//! ```

use serde::Deserialize;

use super::presentations::default_save;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Initialize,
    ListPresentations,
    CreatePresentation,
    OpenPresentation {
        path: String,
    },
    SavePresentation {
        presentation_id: String,
        #[serde(default)]
        path: Option<String>,
    },
    SaveCopy {
        presentation_id: String,
        path: String,
    },
    ClosePresentation {
        presentation_id: String,
        #[serde(default = "default_save")]
        save: bool,
    },
    GetPresentationInfo {
        presentation_id: String,
    },
    GetPresentationSections {
        presentation_id: String,
    },
    GetSelectedShapes {
        #[serde(default)]
        presentation_id: Option<String>,
    },
    GetSlides {
        presentation_id: String,
    },
    AddSlide {
        presentation_id: String,
        #[serde(default, alias = "layout_type")]
        layout: Option<String>,
    },
    CopySlide {
        presentation_id: String,
        slide_id: String,
        #[serde(default)]
        insert_after: Option<usize>,
    },
    DeleteSlide {
        presentation_id: String,
        slide_id: String,
    },
    MoveSlide {
        presentation_id: String,
        slide_id: String,
        new_position: usize,
    },
    GetSlideText {
        presentation_id: String,
        slide_id: String,
    },
    UpdateText {
        presentation_id: String,
        slide_id: String,
        shape_id: String,
        text: String,
    },
    AddTextBox {
        presentation_id: String,
        slide_id: String,
        text: String,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    SetSlideTitle {
        presentation_id: String,
        slide_id: String,
        title: String,
    },
    ListAllShapesInSlide {
        presentation_id: String,
        slide_id: String,
    },
    GetShapeProperties {
        presentation_id: String,
        slide_id: String,
        shape_id: String,
    },
    SetTextFontSize {
        presentation_id: String,
        slide_id: String,
        shape_id: String,
        size: f64,
    },
    SetTextFontName {
        presentation_id: String,
        slide_id: String,
        shape_id: String,
        name: String,
    },
    SetShapePosition {
        presentation_id: String,
        slide_id: String,
        shape_id: String,
        #[serde(default)]
        left: Option<f64>,
        #[serde(default)]
        top: Option<f64>,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        height: Option<f64>,
    },
    CopyShape {
        presentation_id: String,
        source_slide_id: String,
        shape_id: String,
        target_slide_id: String,
        #[serde(default)]
        left: Option<f64>,
        #[serde(default)]
        top: Option<f64>,
    },
}

impl Command {
    /// The `op` name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Initialize => "initialize",
            Command::ListPresentations => "list_presentations",
            Command::CreatePresentation => "create_presentation",
            Command::OpenPresentation { .. } => "open_presentation",
            Command::SavePresentation { .. } => "save_presentation",
            Command::SaveCopy { .. } => "save_copy",
            Command::ClosePresentation { .. } => "close_presentation",
            Command::GetPresentationInfo { .. } => "get_presentation_info",
            Command::GetPresentationSections { .. } => "get_presentation_sections",
            Command::GetSelectedShapes { .. } => "get_selected_shapes",
            Command::GetSlides { .. } => "get_slides",
            Command::AddSlide { .. } => "add_slide",
            Command::CopySlide { .. } => "copy_slide",
            Command::DeleteSlide { .. } => "delete_slide",
            Command::MoveSlide { .. } => "move_slide",
            Command::GetSlideText { .. } => "get_slide_text",
            Command::UpdateText { .. } => "update_text",
            Command::AddTextBox { .. } => "add_text_box",
            Command::SetSlideTitle { .. } => "set_slide_title",
            Command::ListAllShapesInSlide { .. } => "list_all_shapes_in_slide",
            Command::GetShapeProperties { .. } => "get_shape_properties",
            Command::SetTextFontSize { .. } => "set_text_font_size",
            Command::SetTextFontName { .. } => "set_text_font_name",
            Command::SetShapePosition { .. } => "set_shape_position",
            Command::CopyShape { .. } => "copy_shape",
        }
    }
}
