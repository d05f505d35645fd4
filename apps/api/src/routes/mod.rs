pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::editor::handlers as editor;
use crate::editor::picture::MAX_PICTURE_BYTES;
use crate::export::handlers as export;
use crate::render::handlers as render;
use crate::session::handlers as session;
use crate::state::AppState;

/// Multipart framing on top of the largest accepted picture.
const PICTURE_BODY_LIMIT: usize = MAX_PICTURE_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(render::handle_list_templates))
        // Session lifecycle
        .route(
            "/api/v1/session",
            post(session::handle_sign_in).delete(session::handle_sign_out),
        )
        .route(
            "/api/v1/session/notices",
            get(session::handle_drain_notices),
        )
        // Resume editing
        .route(
            "/api/v1/resume",
            get(session::handle_get_resume).put(session::handle_replace_resume),
        )
        .route("/api/v1/resume/edits", post(editor::handle_edit))
        .route("/api/v1/resume/save", post(session::handle_manual_save))
        .route(
            "/api/v1/resume/picture",
            post(editor::handle_upload_picture)
                .delete(editor::handle_remove_picture)
                .layer(DefaultBodyLimit::max(PICTURE_BODY_LIMIT)),
        )
        // Preview and export
        .route("/api/v1/resume/preview", get(render::handle_preview))
        .route("/api/v1/resume/export", post(export::handle_export))
        .with_state(state)
}
