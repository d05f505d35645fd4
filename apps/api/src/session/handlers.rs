use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::autosave::SaveOutcome;
use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::session::notices::Notice;
use crate::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/session
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state
        .sessions
        .sign_in(req.user_id, state.store.clone())
        .await?;
    Ok(Json(session.snapshot()))
}

/// DELETE /api/v1/session
pub async fn handle_sign_out(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> StatusCode {
    state.sessions.sign_out(params.user_id);
    StatusCode::NO_CONTENT
}

/// GET /api/v1/session/notices
pub async fn handle_drain_notices(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<Notice>>, AppError> {
    let session = state.sessions.get(params.user_id)?;
    Ok(Json(session.notices().drain()))
}

/// GET /api/v1/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(params.user_id)?;
    Ok(Json(session.snapshot()))
}

/// PUT /api/v1/resume
///
/// Replaces the whole document. The write itself happens after the autosave
/// window.
pub async fn handle_replace_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(params.user_id)?;
    session.replace_document(document)?;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/resume/save
pub async fn handle_manual_save(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<SaveOutcome>, AppError> {
    let session = state.sessions.get(params.user_id)?;
    Ok(Json(session.save().await?))
}
