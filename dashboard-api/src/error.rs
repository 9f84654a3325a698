use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Per-request failure taxonomy for the read endpoints.
///
/// `InvalidRequest` and `NoDataInRange` carry client-facing messages.
/// `Internal` is logged with full detail and surfaced only as a generic
/// message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NoDataInRange(String),
    #[error("internal failure")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NoDataInRange(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::InvalidRequest(m) | ApiError::NoDataInRange(m) => m.clone(),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "request failed with internal error");
                metrics::counter!("http_internal_errors_total").increment(1);
                "An unexpected error occurred while processing your request. \
                 Please try again or contact support if the issue persists."
                    .to_string()
            }
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}
