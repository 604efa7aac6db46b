use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const CREATE_RESUMES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS resumes (
        id SERIAL PRIMARY KEY,
        user_id TEXT NOT NULL,
        file_key TEXT NOT NULL,
        bucket_name TEXT NOT NULL,
        name TEXT,
        email TEXT,
        phone TEXT,
        skills TEXT[],
        experience TEXT[],
        education TEXT[],
        parsed_at TIMESTAMP NOT NULL DEFAULT NOW()
    )
"#;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `resumes` table if it does not exist. An existing table is
/// left exactly as it is.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_RESUMES_TABLE)
        .execute(pool)
        .await
        .context("Failed to create resumes table")?;

    info!("resumes table ready");
    Ok(())
}
