//! Database layer - connection pool, schema and the todo store
//!
//! # Design Principles
//!
//! - One statement per store call, bounded by a deadline
//! - Optimistic locking through a conditional UPDATE, never read-check-write
//! - List queries carry their total via COUNT(*) OVER() (no second query)
//! - Sort columns come from an allow-list, never from raw input

pub mod migrations;
pub mod pool;
pub mod rows;
pub mod todos;

pub use migrations::MIGRATOR;
pub use pool::create_pool;
pub use todos::TodoStore;
