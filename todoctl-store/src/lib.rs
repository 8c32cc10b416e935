//! todoctl-store: PostgreSQL record store for todos
//!
//! Turns [`Todo`] values into single SQL statements: insert, fetch by id,
//! version-checked update, delete, and a searchable, sortable, paginated
//! listing. Field validation is the caller's job (see
//! [`todoctl_core::validate_todo`]); the store only guards identity.
//!
//! ```ignore
//! let store = TodoStore::connect(&StoreConfig::from_env()?).await?;
//! todoctl_store::db::migrations::run(store.pool()).await?;
//!
//! let mut todo = Todo { name: "Math Club".into(), /* ... */ ..Todo::default() };
//! store.insert(&mut todo).await?;
//!
//! todo.address = "3 Cedar Lane".into();
//! match store.update(&mut todo).await {
//!     Err(e) if e.kind() == ErrorKind::EditConflict => { /* reload and retry */ }
//!     other => other?,
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;

pub use config::StoreConfig;
pub use db::{create_pool, TodoStore, MIGRATOR};
pub use error::{ErrorKind, Result, StoreError};
pub use todoctl_core::{Filters, Metadata, Todo};
