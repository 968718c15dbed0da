use crate::utils::error::{ErrorCategory, ExtractError};
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 錯誤回應內容
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

pub fn error_response(status: StatusCode, error: impl Into<String>, detail: Option<String>) -> Response {
    let body = Json(ErrorBody {
        error: error.into(),
        detail,
    });
    (status, body).into_response()
}

/// 成功：二進位內容，明確的 Content-Length
pub fn payload_response(payload: Vec<u8>) -> Response {
    let length = HeaderValue::from(payload.len());
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_LENGTH, length),
        ],
        payload,
    )
        .into_response()
}

impl IntoResponse for ExtractError {
    fn into_response(self) -> Response {
        match self.category() {
            ErrorCategory::Validation => {
                error_response(StatusCode::BAD_REQUEST, self.to_string(), None)
            }
            _ => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Processing failed",
                Some(self.to_string()),
            ),
        }
    }
}
