use async_trait::async_trait;
use clipvault_core::models::{Clip, ClipUpdate, NewClip};
use clipvault_core::AppError;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::records::{ClipRecords, RecordTransaction};
use super::transaction::PgRecordTransaction;

const CLIP_COLUMNS: &str = "id, title, description, unlisted, created_at, updated_at";

/// Repository for clip rows
#[derive(Clone)]
pub struct ClipRepository {
    pool: PgPool,
}

impl ClipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl ClipRecords for ClipRepository {
    #[tracing::instrument(skip(self), fields(db.table = "clips", db.operation = "select", db.record_id = %id))]
    async fn find(&self, id: &str) -> Result<Option<Clip>, AppError> {
        let clip = sqlx::query_as::<Postgres, Clip>(&format!(
            "SELECT {} FROM clips WHERE id = $1",
            CLIP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(clip)
    }

    #[tracing::instrument(skip(self), fields(db.table = "clips", db.operation = "select", db.record_id = %id))]
    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<Postgres, bool>("SELECT EXISTS(SELECT 1 FROM clips WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    #[tracing::instrument(skip(self), fields(db.table = "clips", db.operation = "select"))]
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Clip>, AppError> {
        let clips = sqlx::query_as::<Postgres, Clip>(&format!(
            "SELECT {} FROM clips ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            CLIP_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(clips)
    }

    #[tracing::instrument(skip(self), fields(db.table = "clips", db.operation = "select"))]
    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Clip>, AppError> {
        let clips = sqlx::query_as::<Postgres, Clip>(&format!(
            "SELECT {} FROM clips WHERE title ILIKE $1 OR description ILIKE $1 \
             ORDER BY created_at DESC, id LIMIT $2",
            CLIP_COLUMNS
        ))
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(clips)
    }

    #[tracing::instrument(skip(self, update), fields(db.table = "clips", db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: &str, update: &ClipUpdate) -> Result<Option<Clip>, AppError> {
        if update.is_empty() {
            return self.find(id).await;
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE clips SET ");
        let mut columns = builder.separated(", ");
        if let Some(title) = &update.title {
            columns.push("title = ");
            columns.push_bind_unseparated(title.clone());
        }
        if let Some(description) = &update.description {
            columns.push("description = ");
            columns.push_bind_unseparated(description.clone());
        }
        if let Some(unlisted) = update.unlisted {
            columns.push("unlisted = ");
            columns.push_bind_unseparated(unlisted);
        }
        columns.push("updated_at = NOW()");

        builder.push(" WHERE id = ");
        builder.push_bind(id.to_string());
        builder.push(" RETURNING ");
        builder.push(CLIP_COLUMNS);

        let clip = builder
            .build_query_as::<Clip>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(clip)
    }

    #[tracing::instrument(skip(self, new_clip), fields(db.table = "clips", db.operation = "insert"))]
    async fn begin_insert(
        &self,
        new_clip: &NewClip,
    ) -> Result<(Clip, Box<dyn RecordTransaction>), AppError> {
        let mut tx = self.pool.begin().await?;

        // On failure `tx` is dropped here and sqlx rolls it back.
        let clip = sqlx::query_as::<Postgres, Clip>(&format!(
            "INSERT INTO clips (id, title, description, unlisted) VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            CLIP_COLUMNS
        ))
        .bind(Clip::generate_id())
        .bind(&new_clip.title)
        .bind(&new_clip.description)
        .bind(new_clip.unlisted)
        .fetch_one(&mut *tx)
        .await?;

        tracing::debug!(clip_id = %clip.id, "Clip row inserted in open transaction");

        Ok((clip, Box::new(PgRecordTransaction::new(tx))))
    }
}
