//! List filters: paging and allow-listed sorting
//!
//! SQL cannot bind identifiers, so the sort key ends up spliced into
//! `ORDER BY`. A key is only used when it appears verbatim in the
//! caller-supplied allow-list.

use std::fmt;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Highest page number accepted by validation
pub const MAX_PAGE: u32 = 1000;

/// Maximum items per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort keys accepted by the todo list endpoint.
///
/// Descending variants are listed separately; `name` does not imply `-name`.
pub const TODO_SORT_LIST: &[&str] = &["id", "name", "level", "-id", "-name", "-level"];

/// Sort direction for the primary `ORDER BY` column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Paging and sorting parameters for a list query.
///
/// Built per request. No clamping happens here: run
/// [`validate_filters`](super::validate_filters) first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page
    pub page_size: u32,
    /// Sort key, `-` prefix for descending
    pub sort: String,
    /// Allowed values for `sort`
    pub sort_list: Vec<String>,
}

impl Filters {
    pub fn new<I, S>(page: u32, page_size: u32, sort: impl Into<String>, sort_list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            page,
            page_size,
            sort: sort.into(),
            sort_list: sort_list.into_iter().map(Into::into).collect(),
        }
    }

    /// Filters using the standard todo allow-list ([`TODO_SORT_LIST`]).
    pub fn for_todos(page: u32, page_size: u32, sort: impl Into<String>) -> Self {
        Self::new(page, page_size, sort, TODO_SORT_LIST.iter().copied())
    }

    /// Whether `sort` appears in the allow-list.
    pub fn is_sort_allowed(&self) -> bool {
        self.sort_list.iter().any(|safe| *safe == self.sort)
    }

    /// Column name for `ORDER BY`, with any leading `-` removed.
    ///
    /// # Panics
    ///
    /// Panics if `sort` is not in `sort_list`. Validation rejects such filters
    /// before they reach a query, so getting here means the two checks are out
    /// of sync and falling back to a default column would hide it.
    pub fn sort_column(&self) -> &str {
        if !self.is_sort_allowed() {
            panic!("unsafe sort parameter: {:?}", self.sort);
        }
        self.sort.strip_prefix('-').unwrap_or(&self.sort)
    }

    pub fn sort_direction(&self) -> SortDirection {
        if self.sort.starts_with('-') {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    /// SQL `LIMIT` value.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// SQL `OFFSET` value.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self::for_todos(1, DEFAULT_PAGE_SIZE, "id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        let f = Filters::for_todos(1, 10, "id");
        assert_eq!(f.offset(), 0);

        let f = Filters::for_todos(2, 10, "id");
        assert_eq!(f.offset(), 10);

        let f = Filters::for_todos(3, 25, "id");
        assert_eq!(f.offset(), 50);
        assert_eq!(f.limit(), 25);
    }

    #[test]
    fn no_clamping() {
        // out-of-range values are the validator's problem
        let f = Filters::for_todos(1000, 100, "id");
        assert_eq!(f.offset(), 99_900);

        let f = Filters::for_todos(0, 20, "id");
        assert_eq!(f.offset(), -20);
    }

    #[test]
    fn ascending_sort() {
        let f = Filters::for_todos(1, 20, "name");
        assert_eq!(f.sort_column(), "name");
        assert_eq!(f.sort_direction(), SortDirection::Ascending);
        assert_eq!(f.sort_direction().to_string(), "ASC");
    }

    #[test]
    fn descending_sort_strips_prefix() {
        let f = Filters::for_todos(1, 20, "-level");
        assert_eq!(f.sort_column(), "level");
        assert_eq!(f.sort_direction(), SortDirection::Descending);
        assert_eq!(f.sort_direction().as_sql(), "DESC");
    }

    #[test]
    fn custom_allow_list() {
        let f = Filters::new(1, 20, "-created_at", ["created_at", "-created_at"]);
        assert_eq!(f.sort_column(), "created_at");
    }

    #[test]
    #[should_panic(expected = "unsafe sort parameter")]
    fn unlisted_sort_panics() {
        let f = Filters::for_todos(1, 20, "name; DROP TABLE todos");
        let _ = f.sort_column();
    }

    #[test]
    #[should_panic(expected = "unsafe sort parameter")]
    fn descending_variant_must_be_listed() {
        let f = Filters::new(1, 20, "-name", ["name"]);
        let _ = f.sort_column();
    }

    #[test]
    fn default_filters() {
        let f = Filters::default();
        assert_eq!(f.page, 1);
        assert_eq!(f.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(f.sort_column(), "id");
        assert_eq!(f.sort_list.len(), TODO_SORT_LIST.len());
    }
}
