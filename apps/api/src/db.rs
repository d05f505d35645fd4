use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tracing::info;

/// One row per saved resume. List sections are stored as JSONB arrays.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS resumes (
    id              UUID PRIMARY KEY,
    user_id         UUID NOT NULL,
    title           TEXT NOT NULL,
    personal_info   JSONB NOT NULL,
    education       JSONB NOT NULL DEFAULT '[]'::jsonb,
    work_experience JSONB NOT NULL DEFAULT '[]'::jsonb,
    skills          JSONB NOT NULL DEFAULT '[]'::jsonb,
    template_id     TEXT NOT NULL DEFAULT 'modern',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS resumes_user_updated_idx ON resumes (user_id, updated_at DESC);
"#;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `resumes` table if this database has never seen it.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    pool.execute(SCHEMA).await?;
    info!("Resume schema ready");
    Ok(())
}
