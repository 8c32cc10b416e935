//! Todo store
//!
//! Handles todo CRUD with:
//! - update: compare-and-swap on `version` (zero rows = edit conflict)
//! - delete: explicit rows_affected check (zero rows = not found)
//! - get_all: search + containment filter, total via COUNT(*) OVER()
//!
//! Every call is a single statement bounded by the store's deadline.

use std::future::Future;
use std::time::Duration;

use sqlx::PgPool;
use todoctl_core::{Filters, Metadata, Todo};
use tracing::{debug, instrument, warn};

use super::pool::create_pool;
use super::rows::{self, InsertedRow, TodoPageRow, TodoRow};
use crate::config::{StoreConfig, DEFAULT_QUERY_TIMEOUT};
use crate::error::{Result, StoreError};

/// PostgreSQL-backed todo store.
///
/// Holds no state besides the pool, so clones can be handed to any number of
/// tasks. Concurrent writers are arbitrated by the version check in
/// [`TodoStore::update`].
#[derive(Debug, Clone)]
pub struct TodoStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl TodoStore {
    /// Store with the default 3 second deadline.
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Connect a pool from `config` and wrap it.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let pool = create_pool(config).await?;
        tracing::info!(
            max_connections = config.max_connections,
            query_timeout_secs = config.query_timeout_secs,
            "todo store connected"
        );
        Ok(Self::with_timeout(pool, config.query_timeout()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Insert a new todo.
    ///
    /// Writes the store-assigned `id`, `created_at` and `version` (always 0)
    /// back into `todo`; any values already there are ignored.
    #[instrument(skip(self, todo), fields(name = %todo.name), err)]
    pub async fn insert(&self, todo: &mut Todo) -> Result<()> {
        let query = rows::bind_fields(
            sqlx::query_as::<_, InsertedRow>(
                r#"
                INSERT INTO todos (name, level, contact, phone, email, website, address, mode)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, created_at, version
                "#,
            ),
            todo,
        );

        let inserted = self
            .within_deadline("insert", query.fetch_one(&self.pool))
            .await?;
        inserted.apply_to(todo);

        debug!(id = todo.id, "todo inserted");
        Ok(())
    }

    /// Fetch a single todo by id.
    #[instrument(skip(self), err)]
    pub async fn get(&self, id: i64) -> Result<Todo> {
        // ids start at 1, nothing below can exist
        if id < 1 {
            return Err(StoreError::RecordNotFound);
        }

        let query = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, created_at, name, level, contact, phone, email, website, address, mode, version
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id);

        let row = self
            .within_deadline("get", query.fetch_optional(&self.pool))
            .await?
            .ok_or(StoreError::RecordNotFound)?;

        Ok(row.into())
    }

    /// Replace every caller-owned field of `todo`, provided the stored row is
    /// still at `todo.version`.
    ///
    /// On success `todo.version` holds the new version. If the row moved on
    /// (or no longer exists) nothing is written and [`StoreError::EditConflict`]
    /// is returned; reloading and retrying is the caller's decision.
    #[instrument(skip(self, todo), fields(id = todo.id, version = todo.version), err)]
    pub async fn update(&self, todo: &mut Todo) -> Result<()> {
        let query = rows::bind_fields(
            sqlx::query_as::<_, (i32,)>(
                r#"
                UPDATE todos
                SET name = $1, level = $2, contact = $3,
                    phone = $4, email = $5, website = $6,
                    address = $7, mode = $8, version = version + 1
                WHERE id = $9
                AND version = $10
                RETURNING version
                "#,
            ),
            todo,
        )
        .bind(todo.id)
        .bind(todo.version);

        let updated = self
            .within_deadline("update", query.fetch_optional(&self.pool))
            .await?;

        match updated {
            Some((version,)) => {
                todo.version = version;
                debug!(new_version = version, "todo updated");
                Ok(())
            }
            None => {
                warn!(id = todo.id, version = todo.version, "edit conflict");
                Err(StoreError::EditConflict)
            }
        }
    }

    /// Hard-delete a todo.
    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: i64) -> Result<()> {
        if id < 1 {
            return Err(StoreError::RecordNotFound);
        }

        let query = sqlx::query("DELETE FROM todos WHERE id = $1").bind(id);
        let result = self
            .within_deadline("delete", query.execute(&self.pool))
            .await?;

        // deleting a missing key is not an error for postgres, so check
        if result.rows_affected() == 0 {
            return Err(StoreError::RecordNotFound);
        }

        debug!("todo deleted");
        Ok(())
    }

    /// Search, filter, sort and paginate todos.
    ///
    /// - `name` / `level`: full-text match (`simple` config); empty matches all
    /// - `mode`: rows whose mode contains every given tag; empty matches all
    ///
    /// Rows are ordered by the allow-listed sort column, then `id` ascending so
    /// equal keys page deterministically. The total comes from the same
    /// statement, so it describes the same snapshot as the page.
    ///
    /// # Panics
    ///
    /// Panics if `filters.sort` is not in `filters.sort_list` (see
    /// [`Filters::sort_column`]). Run `validate_filters` first.
    #[instrument(
        skip(self, mode, filters),
        fields(
            mode = ?mode,
            page = filters.page,
            page_size = filters.page_size,
            sort = %filters.sort,
        ),
        err
    )]
    pub async fn get_all(
        &self,
        name: &str,
        level: &str,
        mode: &[String],
        filters: &Filters,
    ) -> Result<(Vec<Todo>, Metadata)> {
        let column = filters.sort_column();
        let direction = filters.sort_direction();
        debug!(%column, %direction, "building todo list query");

        let sql = format!(
            r#"
            SELECT COUNT(*) OVER() AS total_records,
                   id, created_at, name, level, contact, phone, email, website, address, mode, version
            FROM todos
            WHERE (to_tsvector('simple', name) @@ plainto_tsquery('simple', $1) OR $1 = '')
            AND (to_tsvector('simple', level) @@ plainto_tsquery('simple', $2) OR $2 = '')
            AND (mode @> $3 OR $3 = '{{}}')
            ORDER BY {column} {direction}, id ASC
            LIMIT $4 OFFSET $5
            "#
        );

        let query = sqlx::query_as::<_, TodoPageRow>(&sql)
            .bind(name)
            .bind(level)
            .bind(mode)
            .bind(filters.limit())
            .bind(filters.offset());

        let rows = self
            .within_deadline("get_all", query.fetch_all(&self.pool))
            .await?;

        let total = rows.first().map(|r| r.total_records).unwrap_or(0);
        let todos: Vec<Todo> = rows.into_iter().map(|r| r.todo.into()).collect();
        let metadata = Metadata::calculate(total, filters.page, filters.page_size);

        debug!(returned = todos.len(), total, "todo list fetched");
        Ok((todos, metadata))
    }

    /// Run one database round trip under the store deadline.
    ///
    /// Expiry drops the in-flight future, which abandons the query.
    async fn within_deadline<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "query deadline exceeded"
                );
                Err(StoreError::Timeout(self.query_timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use sqlx::postgres::PgPoolOptions;
    use tokio::net::TcpListener;

    /// Store over a pool that has been closed: any attempt to use it fails.
    async fn closed_store() -> TodoStore {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://todoctl@127.0.0.1:1/todoctl")
            .expect("valid url");
        pool.close().await;
        TodoStore::new(pool)
    }

    #[tokio::test]
    async fn get_rejects_non_positive_ids_without_database() {
        let store = closed_store().await;

        for id in [0, -1, i64::MIN] {
            let err = store.get(id).await.unwrap_err();
            assert!(matches!(err, StoreError::RecordNotFound), "id {id}: {err}");
        }

        // a positive id does go to the (closed) pool
        let err = store.get(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(sqlx::Error::PoolClosed)));
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[tokio::test]
    async fn delete_rejects_non_positive_ids_without_database() {
        let store = closed_store().await;

        let err = store.delete(0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = store.delete(-42).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = store.delete(42).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[tokio::test]
    #[should_panic(expected = "unsafe sort parameter")]
    async fn get_all_panics_on_unlisted_sort() {
        let store = closed_store().await;
        let filters = Filters::for_todos(1, 20, "phone");
        let _ = store.get_all("", "", &[], &filters).await;
    }

    #[tokio::test]
    async fn stalled_server_hits_deadline() {
        // accepts connections and never answers the startup handshake
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(30))
            .connect_lazy(&format!("postgres://todoctl@{addr}/todoctl?sslmode=disable"))
            .expect("valid url");
        let store = TodoStore::with_timeout(pool, Duration::from_millis(100));

        let err = store.get(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(d) if d == Duration::from_millis(100)));
        assert_eq!(err.kind(), ErrorKind::Unexpected);

        let mut todo = Todo {
            id: 1,
            ..Todo::default()
        };
        let err = store.update(&mut todo).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)));
        assert_eq!(todo.version, 0);

        server.abort();
    }

    #[tokio::test]
    async fn store_defaults_to_three_second_deadline() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/todoctl")
            .expect("valid url");
        let store = TodoStore::new(pool);
        assert_eq!(store.query_timeout(), Duration::from_secs(3));
    }
}
