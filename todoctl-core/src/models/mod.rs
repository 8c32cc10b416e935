//! Domain models
//!
//! The store trusts these values. Callers run [`validate_todo`] and
//! [`validate_filters`] before handing anything to it.

pub mod filters;
pub mod metadata;
pub mod todo;
pub mod validation;

pub use filters::{Filters, SortDirection, DEFAULT_PAGE_SIZE, MAX_PAGE, MAX_PAGE_SIZE, TODO_SORT_LIST};
pub use metadata::Metadata;
pub use todo::{Todo, TodoPatch, MAX_MODE_ENTRIES};
pub use validation::{validate_filters, validate_todo, ValidationError, ValidationErrors};
