//! Text and shape handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use slideport_core::{Geometry, GeometryPatch};

use crate::error::ApiError;
use crate::schema::shapes::{
    AddTextBoxRequest, AddTextBoxResponse, CopyShapeRequest, CopyShapeResponse, FontNameRequest,
    FontResponse, FontSizeRequest, GeometryResponse, SetTitleRequest, SetTitleResponse,
    ShapeListResponse, ShapePropertiesResponse, SlideTextResponse, UpdateTextRequest,
    UpdateTextResponse,
};
use crate::state::AppState;

type SlidePath = Path<(String, String)>;
type ShapePath = Path<(String, String, String)>;

/// `GET /presentations/{id}/slides/{slide_id}/text`
pub async fn get_slide_text(
    State(state): State<AppState>,
    Path((id, slide_id)): SlidePath,
) -> Result<Json<SlideTextResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.get_slide_text(&id, &slide_id)?))
}

/// `PUT /presentations/{id}/slides/{slide_id}/title`
pub async fn set_slide_title(
    State(state): State<AppState>,
    Path((id, slide_id)): SlidePath,
    body: Result<Json<SetTitleRequest>, JsonRejection>,
) -> Result<Json<SetTitleResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.set_slide_title(&id, &slide_id, &req.title)?))
}

/// `GET /presentations/{id}/slides/{slide_id}/shapes`
pub async fn list_all_shapes_in_slide(
    State(state): State<AppState>,
    Path((id, slide_id)): SlidePath,
) -> Result<Json<ShapeListResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.list_all_shapes_in_slide(&id, &slide_id)?))
}

/// Adds a text box.
///
/// `POST /presentations/{id}/slides/{slide_id}/shapes`
pub async fn add_text_box(
    State(state): State<AppState>,
    Path((id, slide_id)): SlidePath,
    body: Result<Json<AddTextBoxRequest>, JsonRejection>,
) -> Result<Json<AddTextBoxResponse>, ApiError> {
    let Json(req) = body?;
    let geometry = Geometry::new(req.left, req.top, req.width, req.height);
    let mut service = state.service.lock().await;
    Ok(Json(service.add_text_box(&id, &slide_id, &req.text, geometry)?))
}

/// `GET /presentations/{id}/slides/{slide_id}/shapes/{shape_id}`
pub async fn get_shape_properties(
    State(state): State<AppState>,
    Path((id, slide_id, shape_id)): ShapePath,
) -> Result<Json<ShapePropertiesResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.get_shape_properties(&id, &slide_id, &shape_id)?))
}

/// `PUT /presentations/{id}/slides/{slide_id}/shapes/{shape_id}/text`
pub async fn update_text(
    State(state): State<AppState>,
    Path((id, slide_id, shape_id)): ShapePath,
    body: Result<Json<UpdateTextRequest>, JsonRejection>,
) -> Result<Json<UpdateTextResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.update_text(&id, &slide_id, &shape_id, &req.text)?))
}

/// `PUT /presentations/{id}/slides/{slide_id}/shapes/{shape_id}/font-size`
pub async fn set_text_font_size(
    State(state): State<AppState>,
    Path((id, slide_id, shape_id)): ShapePath,
    body: Result<Json<FontSizeRequest>, JsonRejection>,
) -> Result<Json<FontResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.set_text_font_size(&id, &slide_id, &shape_id, req.size)?))
}

/// `PUT /presentations/{id}/slides/{slide_id}/shapes/{shape_id}/font-name`
pub async fn set_text_font_name(
    State(state): State<AppState>,
    Path((id, slide_id, shape_id)): ShapePath,
    body: Result<Json<FontNameRequest>, JsonRejection>,
) -> Result<Json<FontResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.set_text_font_name(&id, &slide_id, &shape_id, &req.name)?))
}

/// Partial move/resize; omitted fields keep their value.
///
/// `PUT /presentations/{id}/slides/{slide_id}/shapes/{shape_id}/position`
pub async fn set_shape_position(
    State(state): State<AppState>,
    Path((id, slide_id, shape_id)): ShapePath,
    body: Result<Json<GeometryPatch>, JsonRejection>,
) -> Result<Json<GeometryResponse>, ApiError> {
    let Json(patch) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.set_shape_position(&id, &slide_id, &shape_id, patch)?))
}

/// `POST /presentations/{id}/slides/{slide_id}/shapes/{shape_id}/copy`
pub async fn copy_shape(
    State(state): State<AppState>,
    Path((id, slide_id, shape_id)): ShapePath,
    body: Result<Json<CopyShapeRequest>, JsonRejection>,
) -> Result<Json<CopyShapeResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.copy_shape(
        &id,
        &slide_id,
        &shape_id,
        &req.target_slide_id,
        req.left,
        req.top,
    )?))
}
