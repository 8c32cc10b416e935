//! Schema migrations for the todos table

use sqlx::PgPool;

use crate::error::Result;

/// Embedded migrations from `todoctl-store/migrations`
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Apply any pending migrations.
pub async fn run(pool: &PgPool) -> Result<()> {
    tracing::info!("Running todo store migrations...");
    MIGRATOR.run(pool).await?;
    tracing::info!("Todo store migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_todos_migration() {
        let first = MIGRATOR.iter().next().expect("no migrations embedded");
        assert_eq!(first.version, 1);
        assert!(first.sql.contains("CREATE TABLE IF NOT EXISTS todos"));
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires database"]
    async fn run_is_idempotent(pool: PgPool) -> Result<()> {
        run(&pool).await?;
        run(&pool).await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 0);
        Ok(())
    }
}
