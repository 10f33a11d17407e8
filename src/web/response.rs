use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;

use crate::error::GradebookError;

impl IntoResponse for GradebookError {
    fn into_response(self) -> Response {
        match self {
            GradebookError::AuthenticationRequired => Redirect::to("/login").into_response(),
            GradebookError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "not_found", "message": self.to_string() })),
            )
                .into_response(),
            GradebookError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "validation", "fields": fields })),
            )
                .into_response(),
            GradebookError::Database(_)
            | GradebookError::Connection(_)
            | GradebookError::Migration(_)
            | GradebookError::Task(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal", "message": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
