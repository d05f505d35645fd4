use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::resume::{ResumeDocument, ResumeRow, TemplateId};
use crate::store::{ResumeStore, StoreError};

/// `resumes` table in Postgres, one JSONB column per list section.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn load_by_user(&self, user_id: Uuid) -> Result<Option<ResumeDocument>, StoreError> {
        let row: Option<ResumeRow> = sqlx::query_as(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(document_from_row).transpose()
    }

    async fn create(&self, user_id: Uuid, document: &ResumeDocument) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, user_id, title, personal_info, education, work_experience, skills, template_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&document.title)
        .bind(Json(&document.personal_info))
        .bind(Json(&document.education))
        .bind(Json(&document.work_experience))
        .bind(Json(&document.skills))
        .bind(document.template_id.as_str())
        .execute(&self.pool)
        .await?;

        info!("Created resume {id} for user {user_id}");
        Ok(id)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        document: &ResumeDocument,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE resumes
            SET title = $3,
                personal_info = $4,
                education = $5,
                work_experience = $6,
                skills = $7,
                template_id = $8,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&document.title)
        .bind(Json(&document.personal_info))
        .bind(Json(&document.education))
        .bind(Json(&document.work_experience))
        .bind(Json(&document.skills))
        .bind(document.template_id.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn document_from_row(row: ResumeRow) -> Result<ResumeDocument, StoreError> {
    let template_id = row.template_id.parse().unwrap_or_else(|e| {
        warn!("Resume {} has {e}; falling back to modern", row.id);
        TemplateId::Modern
    });

    Ok(ResumeDocument {
        id: Some(row.id),
        title: row.title,
        personal_info: serde_json::from_value(row.personal_info)?,
        education: serde_json::from_value(row.education)?,
        work_experience: serde_json::from_value(row.work_experience)?,
        skills: serde_json::from_value(row.skills)?,
        template_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn row(template_id: &str, skills: serde_json::Value) -> ResumeRow {
        ResumeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Backend CV".into(),
            personal_info: json!({ "fullName": "Grace Hopper", "email": "grace@navy.mil" }),
            education: json!([]),
            work_experience: json!([{
                "id": "w1", "company": "Navy", "position": "Rear Admiral",
                "startDate": "1943-12-01", "endDate": "", "current": true, "description": ""
            }]),
            skills,
            template_id: template_id.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_hydrates_document() {
        let r = row("creative", json!([]));
        let id = r.id;
        let doc = document_from_row(r).unwrap();
        assert_eq!(doc.id, Some(id));
        assert_eq!(doc.personal_info.full_name, "Grace Hopper");
        assert!(doc.work_experience[0].current);
        assert_eq!(doc.template_id, TemplateId::Creative);
    }

    #[test]
    fn test_unknown_template_falls_back_to_modern() {
        let doc = document_from_row(row("retro", json!([]))).unwrap();
        assert_eq!(doc.template_id, TemplateId::Modern);
    }

    #[test]
    fn test_malformed_section_is_an_error() {
        let err = document_from_row(row("modern", json!({ "not": "a list" }))).unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
