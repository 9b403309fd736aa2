//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for every boundary operation. Lower
//! layer failures ([`CoreError`], [`HostError`], [`RegistryError`] and request
//! decoding rejections) are translated into exactly one of four kinds. It
//! implements `axum::response::IntoResponse` to produce structured JSON error
//! responses, and [`ApiError::detail`] gives the same body for the command
//! transport.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use slideport_core::CoreError;
use slideport_host::HostError;

use crate::registry::RegistryError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// One of `ConnectionError`, `NotFoundError`, `ValidationError`,
    /// `HostOperationError`.
    pub kind: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors, one variant per error kind.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The host application cannot be launched, attached, or refused to open
    /// a document (503).
    #[error("{0}")]
    Connection(String),

    /// An id that is unknown, evicted, or no longer resolves (404).
    #[error("{0}")]
    NotFound(String),

    /// Bad arguments, checked before the host is touched where possible (400).
    #[error("{0}")]
    Validation(String),

    /// The host rejected or failed an otherwise valid operation (502).
    #[error("{0}")]
    HostOperation(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Connection(_) => "ConnectionError",
            ApiError::NotFound(_) => "NotFoundError",
            ApiError::Validation(_) => "ValidationError",
            ApiError::HostOperation(_) => "HostOperationError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::HostOperation(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn detail(&self) -> ApiErrorDetail {
        ApiErrorDetail {
            kind: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "success": false,
            "error": self.detail(),
        });

        (self.status(), axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<HostError> for ApiError {
    fn from(err: HostError) -> Self {
        match &err {
            HostError::NotInstalled(_)
            | HostError::NotRunning
            | HostError::OpenRejected { .. } => ApiError::Connection(err.to_string()),
            HostError::DocumentNotFound(_)
            | HostError::SlideNotFound { .. }
            | HostError::ShapeNotFound { .. } => ApiError::NotFound(err.to_string()),
            HostError::PositionOutOfRange { .. }
            | HostError::NoTextFrame(_)
            | HostError::NoPath(_) => ApiError::Validation(err.to_string()),
            HostError::Rejected { .. } | HostError::Io { .. } | HostError::Serialization(_) => {
                ApiError::HostOperation(err.to_string())
            }
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Host(host) => host.into(),
            other => ApiError::NotFound(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
