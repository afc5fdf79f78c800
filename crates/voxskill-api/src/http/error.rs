//! Application error type mapping skill failures to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use voxskill_types::error::{LocaleError, SkillError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The skill could not produce a response.
    Skill(SkillError),
}

impl From<SkillError> for AppError {
    fn from(e: SkillError) -> Self {
        AppError::Skill(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Skill(e @ SkillError::NoHandler { .. }) => {
                (StatusCode::BAD_REQUEST, "NO_HANDLER", e.to_string())
            }
            AppError::Skill(e @ SkillError::Locale(LocaleError::Unavailable { .. })) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "LOCALE_UNAVAILABLE", e.to_string())
            }
            AppError::Skill(e) => (StatusCode::INTERNAL_SERVER_ERROR, "SKILL_ERROR", e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "data": null,
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
