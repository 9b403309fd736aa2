//! Slide handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::schema::slides::{
    AddSlideRequest, AddSlideResponse, CopySlideRequest, CopySlideResponse, DeleteSlideResponse,
    MoveSlideRequest, MoveSlideResponse, SlideListResponse,
};
use crate::state::AppState;

/// `GET /presentations/{id}/slides`
pub async fn get_slides(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SlideListResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.get_slides(&id)?))
}

/// Appends a slide with the given layout.
///
/// `POST /presentations/{id}/slides`
pub async fn add_slide(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<AddSlideRequest>, JsonRejection>,
) -> Result<Json<AddSlideResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.add_slide(&id, req.layout.as_deref())?))
}

/// `POST /presentations/{id}/slides/{slide_id}/copy`
pub async fn copy_slide(
    State(state): State<AppState>,
    Path((id, slide_id)): Path<(String, String)>,
    body: Result<Json<CopySlideRequest>, JsonRejection>,
) -> Result<Json<CopySlideResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.copy_slide(&id, &slide_id, req.insert_after)?))
}

/// `POST /presentations/{id}/slides/{slide_id}/move`
pub async fn move_slide(
    State(state): State<AppState>,
    Path((id, slide_id)): Path<(String, String)>,
    body: Result<Json<MoveSlideRequest>, JsonRejection>,
) -> Result<Json<MoveSlideResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.move_slide(&id, &slide_id, req.new_position)?))
}

/// `DELETE /presentations/{id}/slides/{slide_id}`
pub async fn delete_slide(
    State(state): State<AppState>,
    Path((id, slide_id)): Path<(String, String)>,
) -> Result<Json<DeleteSlideResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.delete_slide(&id, &slide_id)?))
}
