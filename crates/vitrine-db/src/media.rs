use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vitrine_core::{AppError, Media, MediaType, NewMedia};

use crate::traits::{MediaFileUpdate, MediaStore};
use crate::transaction::with_transaction;

/// Postgres repository for the `medias` table.
///
/// Rows returned by read methods never include soft-deleted records; the
/// query endpoint, the slideshow filter, and the reconciliation scans all
/// treat `deleted_at IS NOT NULL` as gone.
#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaStore for MediaRepository {
    #[tracing::instrument(skip(self, media), fields(db.table = "medias", db.operation = "insert"))]
    async fn insert(&self, media: NewMedia) -> Result<Media, AppError> {
        let now = Utc::now();

        let row: Media = sqlx::query_as::<Postgres, Media>(
            r#"
            INSERT INTO medias (
                uuid, filename, original_name, mime_type, extension, size,
                disk, path, url, "type", metadata, description,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(media.uuid)
        .bind(&media.filename)
        .bind(&media.original_name)
        .bind(&media.mime_type)
        .bind(&media.extension)
        .bind(media.size)
        .bind(&media.disk)
        .bind(&media.path)
        .bind(&media.url)
        .bind(media.media_type)
        .bind(&media.metadata)
        .bind(&media.description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "medias", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: i64) -> Result<Option<Media>, AppError> {
        let row: Option<Media> = sqlx::query_as::<Postgres, Media>(
            "SELECT * FROM medias WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "medias", db.operation = "select", db.record_uuid = %uuid))]
    async fn get_by_uuid(&self, uuid: Uuid) -> Result<Option<Media>, AppError> {
        let row: Option<Media> = sqlx::query_as::<Postgres, Media>(
            "SELECT * FROM medias WHERE uuid = $1 AND deleted_at IS NULL",
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "medias", db.operation = "select"))]
    async fn list(
        &self,
        media_type: Option<MediaType>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Media>, u64), AppError> {
        let (rows, total): (Vec<Media>, i64) = match media_type {
            None => {
                let rows = sqlx::query_as::<Postgres, Media>(
                    "SELECT * FROM medias WHERE deleted_at IS NULL \
                     ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM medias WHERE deleted_at IS NULL",
                )
                .fetch_one(&self.pool)
                .await?;

                (rows, total)
            }
            Some(mt) => {
                let rows = sqlx::query_as::<Postgres, Media>(
                    "SELECT * FROM medias WHERE deleted_at IS NULL AND \"type\" = $1 \
                     ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
                )
                .bind(mt)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM medias WHERE deleted_at IS NULL AND \"type\" = $1",
                )
                .bind(mt)
                .fetch_one(&self.pool)
                .await?;

                (rows, total)
            }
        };

        Ok((rows, total.max(0) as u64))
    }

    #[tracing::instrument(skip(self), fields(db.table = "medias", db.operation = "select"))]
    async fn list_all(&self) -> Result<Vec<Media>, AppError> {
        let rows: Vec<Media> = sqlx::query_as::<Postgres, Media>(
            "SELECT * FROM medias WHERE deleted_at IS NULL ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self, update), fields(db.table = "medias", db.operation = "update", db.record_id = %id))]
    async fn update_file(
        &self,
        id: i64,
        update: MediaFileUpdate,
    ) -> Result<Option<Media>, AppError> {
        let row: Option<Media> = sqlx::query_as::<Postgres, Media>(
            r#"
            UPDATE medias SET
                filename = $2, original_name = $3, mime_type = $4,
                extension = $5, size = $6, path = $7, url = $8,
                "type" = $9, metadata = $10, updated_at = $11
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.filename)
        .bind(&update.original_name)
        .bind(&update.mime_type)
        .bind(&update.extension)
        .bind(update.size)
        .bind(&update.path)
        .bind(&update.url)
        .bind(update.media_type)
        .bind(&update.metadata)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "medias", db.operation = "update", db.record_id = %id))]
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE medias SET deleted_at = $2, updated_at = $2 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "medias", db.operation = "delete", db.record_id = %id))]
    async fn hard_delete(&self, id: i64) -> Result<bool, AppError> {
        // Row lock so two concurrent force-deletes cannot both report success.
        let deleted = with_transaction(&self.pool, |tx| {
            Box::pin(async move {
                let locked: Option<i64> =
                    sqlx::query_scalar("SELECT id FROM medias WHERE id = $1 FOR UPDATE")
                        .bind(id)
                        .fetch_optional(&mut **tx)
                        .await?;

                if locked.is_none() {
                    return Ok::<_, sqlx::Error>(false);
                }

                sqlx::query("DELETE FROM medias WHERE id = $1")
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;

                Ok(true)
            })
        })
        .await?;

        Ok(deleted)
    }

    #[tracing::instrument(skip(self), fields(db.table = "medias", db.operation = "select"))]
    async fn referenced_paths(&self) -> Result<Vec<String>, AppError> {
        let paths: Vec<String> =
            sqlx::query_scalar("SELECT path FROM medias WHERE deleted_at IS NULL")
                .fetch_all(&self.pool)
                .await?;

        Ok(paths)
    }
}
