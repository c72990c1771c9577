//! HTTP mapping for errors surfaced by non-filter handlers (admin API).
//!
//! The filter itself never produces these: a blocked request is a bare 403.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use urlguard_core::error::{ClientCode, UrlGuardError};

#[derive(Debug)]
pub struct ApiError(pub UrlGuardError);

impl From<UrlGuardError> for ApiError {
    fn from(e: UrlGuardError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status = match code {
            ClientCode::BadRequest | ClientCode::InvalidPattern => StatusCode::BAD_REQUEST,
            ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "error": code.as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
