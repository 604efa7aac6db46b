use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::resume::NewResumeRecord;

/// Insert-only store of parsed resumes. There is deliberately no update,
/// delete, or read path.
///
/// Carried in `AppState` as `Arc<dyn ResumeStore>`.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert(&self, record: &NewResumeRecord) -> Result<()>;
}

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
    /// Appends one row. No uniqueness constraint: parsing the same file twice
    /// yields two rows.
    async fn insert(&self, record: &NewResumeRecord) -> Result<()> {
        let NewResumeRecord {
            user_id,
            file_key,
            bucket_name,
            parsed,
            parsed_at,
        } = record;

        sqlx::query(
            r#"
            INSERT INTO resumes
                (user_id, file_key, bucket_name, name, email, phone,
                 skills, experience, education, parsed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user_id)
        .bind(file_key)
        .bind(bucket_name)
        .bind(parsed.name())
        .bind(parsed.email())
        .bind(parsed.phone())
        .bind(parsed.skills())
        .bind(parsed.experience())
        .bind(parsed.education())
        .bind(parsed_at)
        .execute(&self.pool)
        .await?;

        info!("Inserted resume record for user {user_id} (s3://{bucket_name}/{file_key})");
        Ok(())
    }
}
