//! Command dispatch by name over HTTP.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::state::AppState;

/// Executes one `{"op": ...}` command and always answers with the
/// [`ApiResponse`] envelope, so failures keep a 200 status and carry their
/// kind in the body.
///
/// `POST /commands`
pub async fn execute(
    State(state): State<AppState>,
    body: String,
) -> Json<ApiResponse<serde_json::Value>> {
    let mut service = state.service.lock().await;
    let result: Result<serde_json::Value, ApiError> = service.execute_json(&body);
    if let Err(err) = &result {
        tracing::debug!(kind = err.kind(), error = %err, "command failed");
    }
    Json(result.into())
}
