//! Who is making a request.
//!
//! A teacher is identified by the session token issued when their account was created, sent either
//! as the `token` cookie (set by `POST /login`) or as an `Authorization: Bearer` header.

use axum::Json;
use axum::async_trait;
use axum::extract::{Form, FromRequestParts, State};
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::AppState;
use crate::error::GradebookError;
use crate::models::Teacher;

pub const SESSION_COOKIE: &str = "token";

/// The logged-in teacher. Extracting it from a request without a valid session fails with
/// [`GradebookError::AuthenticationRequired`].
pub struct CurrentTeacher(pub Teacher);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentTeacher {
    type Rejection = GradebookError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)
            .ok_or(GradebookError::AuthenticationRequired)?
            .to_string();

        let teacher = state
            .with_manager(move |m| m.find_teacher_by_token(&token))
            .await?;
        match teacher {
            Some(teacher) => Ok(CurrentTeacher(teacher)),
            None => {
                tracing::warn!(path = %parts.uri.path(), "rejected unknown session token");
                Err(GradebookError::AuthenticationRequired)
            }
        }
    }
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(bearer) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(bearer.trim());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|part| {
            part.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|token| !token.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub token: Option<String>,
}

pub async fn login_hint() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "authentication_required",
            "message": "POST username and token to /login to start a session",
        })),
    )
        .into_response()
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, GradebookError> {
    let username = form.username.as_deref().map(str::trim).unwrap_or_default();
    let token = form
        .token
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let teacher = if token.is_empty() {
        None
    } else {
        state
            .with_manager(move |m| m.find_teacher_by_token(&token))
            .await?
    };
    let Some(teacher) = teacher.filter(|t| t.username == username) else {
        tracing::warn!(username, "failed login");
        return Err(GradebookError::invalid(
            "__all__",
            "Please enter a correct username and token.",
        ));
    };

    tracing::info!(teacher = %teacher.username, "logged in");
    let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", teacher.token);
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
}

pub async fn logout() -> Response {
    let cookie = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0");
    ([(SET_COOKIE, cookie)], Redirect::to("/login")).into_response()
}
