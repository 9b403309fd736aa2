//! Common API response wrapper types.
//!
//! [`ApiResponse`] is the envelope used by the command transports (`POST
//! /commands` and stdio), where every reply, successful or not, has the same
//! outer shape.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiErrorDetail};

/// Standard command response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// `true` when `data` is present, `false` when `error` is.
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorDetail>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: &ApiError) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error.detail()),
        }
    }
}

impl<T> From<Result<T, ApiError>> for ApiResponse<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(err) => ApiResponse::err(&err),
        }
    }
}
