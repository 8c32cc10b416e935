//! todoctl-core: domain types for the todo record store
//!
//! Plain values and pure functions only. Nothing here performs I/O;
//! the PostgreSQL store lives in `todoctl-store`.

pub mod models;

pub use models::{
    validate_filters, validate_todo, Filters, Metadata, SortDirection, Todo, TodoPatch,
    ValidationError, ValidationErrors, DEFAULT_PAGE_SIZE, TODO_SORT_LIST,
};
