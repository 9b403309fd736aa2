//! Application and presentation handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::schema::presentations::{
    ClosePresentationRequest, ClosePresentationResponse, InitializeResponse,
    OpenPresentationRequest, PresentationListResponse, PresentationSummary, SaveCopyRequest,
    SavePresentationRequest, SavePresentationResponse, SectionsResponse, SelectionQuery,
    SelectionResponse,
};
use crate::state::AppState;

/// Attaches to the host application.
///
/// `POST /initialize`
pub async fn initialize(
    State(state): State<AppState>,
) -> Result<Json<InitializeResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.initialize()?))
}

/// `GET /presentations`
pub async fn list_presentations(
    State(state): State<AppState>,
) -> Result<Json<PresentationListResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.list_presentations()?))
}

/// Creates a blank presentation.
///
/// `POST /presentations`
pub async fn create_presentation(
    State(state): State<AppState>,
) -> Result<Json<PresentationSummary>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.create_presentation()?))
}

/// `POST /presentations/open`
pub async fn open_presentation(
    State(state): State<AppState>,
    body: Result<Json<OpenPresentationRequest>, JsonRejection>,
) -> Result<Json<PresentationSummary>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.open_presentation(&req.path)?))
}

/// `GET /presentations/{id}`
pub async fn get_presentation_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PresentationSummary>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.get_presentation_info(&id)?))
}

/// Saves in place, or under `path` when given.
///
/// `POST /presentations/{id}/save`
pub async fn save_presentation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SavePresentationRequest>, JsonRejection>,
) -> Result<Json<SavePresentationResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.save_presentation(&id, req.path.as_deref())?))
}

/// `POST /presentations/{id}/save-copy`
pub async fn save_copy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SaveCopyRequest>, JsonRejection>,
) -> Result<Json<SavePresentationResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.save_copy(&id, &req.path)?))
}

/// `POST /presentations/{id}/close`
pub async fn close_presentation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ClosePresentationRequest>, JsonRejection>,
) -> Result<Json<ClosePresentationResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    Ok(Json(service.close_presentation(&id, req.save)?))
}

/// `GET /presentations/{id}/sections`
pub async fn get_presentation_sections(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SectionsResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.get_presentation_sections(&id)?))
}

/// `GET /selection?presentation_id=`
pub async fn get_selected_shapes(
    State(state): State<AppState>,
    query: Result<Query<SelectionQuery>, QueryRejection>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let Query(query) = query?;
    let mut service = state.service.lock().await;
    Ok(Json(
        service.get_selected_shapes(query.presentation_id.as_deref())?,
    ))
}
