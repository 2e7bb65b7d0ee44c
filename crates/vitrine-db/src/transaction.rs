//! Database transaction utilities

use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres, Transaction};

/// Execute a closure within a database transaction
///
/// Begins a transaction, executes the closure, and commits if successful or
/// rolls back on error.
///
/// # Example
///
/// ```ignore
/// use vitrine_db::transaction::with_transaction;
///
/// async fn example(pool: &sqlx::PgPool) -> anyhow::Result<()> {
///     with_transaction(pool, |tx| {
///         Box::pin(async move {
///             sqlx::query("DELETE FROM medias WHERE id = $1")
///                 .bind(1i64)
///                 .execute(&mut **tx)
///                 .await?;
///             Ok::<_, sqlx::Error>(())
///         })
///     })
///     .await
/// }
/// ```
pub async fn with_transaction<F, R, E>(pool: &PgPool, f: F) -> Result<R>
where
    F: for<'a> FnOnce(
        &'a mut Transaction<'_, Postgres>,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<R, E>> + Send + 'a>,
    >,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    match f(&mut tx).await {
        Ok(result) => {
            tx.commit().await.context("Failed to commit transaction")?;
            Ok(result)
        }
        Err(e) => {
            tx.rollback().await.ok(); // Ignore rollback errors
            Err(anyhow::Error::from(e))
        }
    }
}
