use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::TemplateId;
use crate::render::render_document;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub user_id: Uuid,
    /// Renders with this layout instead of the document's own choice.
    pub template: Option<TemplateId>,
}

#[derive(Serialize)]
pub struct TemplateOption {
    pub id: TemplateId,
    pub label: &'static str,
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateOption>> {
    Json(
        TemplateId::ALL
            .into_iter()
            .map(|id| TemplateOption {
                id,
                label: id.label(),
            })
            .collect(),
    )
}

/// GET /api/v1/resume/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(params): Query<PreviewQuery>,
) -> Result<Html<String>, AppError> {
    let session = state.sessions.get(params.user_id)?;
    let document = session.document();
    let template = params.template.unwrap_or(document.template_id);
    Ok(Html(render_document(&document, template).html))
}
