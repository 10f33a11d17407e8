//! HTTP surface of the gradebook.
//!
//! Pages answer with JSON documents; successful form submissions redirect to the grade matrix
//! they changed.

mod handlers;
mod response;
mod session;

use axum::Router;
use axum::routing::get;
use parking_lot::Mutex;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::manager::GradebookManager;

pub use session::{CurrentTeacher, SESSION_COOKIE};

/// Shared state: one database connection, used by one request at a time.
pub struct AppState {
    pub manager: Mutex<GradebookManager>,
}

impl AppState {
    pub fn new(manager: GradebookManager) -> Arc<Self> {
        Arc::new(Self {
            manager: Mutex::new(manager),
        })
    }

    /// Runs `f` against the database on the blocking thread pool.
    pub async fn with_manager<T, F>(self: &Arc<Self>, f: F) -> Result<T>
    where
        F: FnOnce(&mut GradebookManager) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let mut manager = state.manager.lock();
            f(&mut manager)
        })
        .await?
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", get(session::login_hint).post(session::login))
        .route("/logout", get(session::logout).post(session::logout))
        .route("/dashboard", get(handlers::dashboard))
        .route(
            "/subject/:subject_id/:class_label",
            get(handlers::subject_class_detail),
        )
        .route(
            "/grade/edit/:grade_id",
            get(handlers::grade_edit_form).post(handlers::grade_edit),
        )
        .route(
            "/subject/:subject_id/:class_label/grade/add/:student_id/:grade_date",
            get(handlers::grade_create_cell_form).post(handlers::grade_create_cell),
        )
        .route(
            "/subject/:subject_id/:class_label/grade/add",
            get(handlers::grade_create_generic_form).post(handlers::grade_create_generic),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Characters escaped in a path segment: controls, separators, and everything a URI forbids.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Path of the grade matrix for one subject and class.
pub fn matrix_path(subject_id: i32, class_label: &str) -> String {
    format!("/subject/{subject_id}/{}", utf8_percent_encode(class_label, PATH_SEGMENT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_path_escapes_the_class_label() {
        assert_eq!(matrix_path(3, "5A"), "/subject/3/5A");
        assert_eq!(matrix_path(3, "5 A"), "/subject/3/5%20A");
        assert_eq!(matrix_path(3, "5/A?\n"), "/subject/3/5%2FA%3F%0A");
        assert_eq!(matrix_path(3, "5ä"), "/subject/3/5%C3%A4");
    }
}
