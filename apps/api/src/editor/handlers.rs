use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::editor::picture::{encode_profile_picture, PictureError};
use crate::editor::{EditCommand, EditOutcome};
use crate::errors::AppError;
use crate::session::handlers::UserIdQuery;
use crate::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Serialize)]
pub struct EditResponse {
    #[serde(flatten)]
    pub outcome: EditOutcome,
    pub session: SessionSnapshot,
}

/// POST /api/v1/resume/edits
pub async fn handle_edit(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(command): Json<EditCommand>,
) -> Result<Json<EditResponse>, AppError> {
    let session = state.sessions.get(params.user_id)?;
    let outcome = session.edit(command)?;
    Ok(Json(EditResponse {
        outcome,
        session: session.snapshot(),
    }))
}

/// POST /api/v1/resume/picture (multipart, field `file`)
///
/// Rejected uploads leave the document untouched.
pub async fn handle_upload_picture(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    mut multipart: Multipart,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(params.user_id)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        upload = Some((content_type, bytes));
        break;
    }

    let encoded = upload
        .ok_or(PictureError::Missing)
        .and_then(|(content_type, bytes)| encode_profile_picture(content_type.as_deref(), &bytes));

    let picture = match encoded {
        Ok(picture) => picture,
        Err(e) => {
            warn!("Rejected profile picture for user {}: {e}", params.user_id);
            session.notices().error("Upload rejected", e.to_string());
            return Err(e.into());
        }
    };

    session.set_profile_picture(picture)?;
    Ok(Json(session.snapshot()))
}

/// DELETE /api/v1/resume/picture
pub async fn handle_remove_picture(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(params.user_id)?;
    session.edit(EditCommand::ClearProfilePicture)?;
    Ok(Json(session.snapshot()))
}
