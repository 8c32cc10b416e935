//! Field validation for todos and list filters
//!
//! Every failing field is reported, one error per field (the first rule that
//! fails wins).

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Url;

use super::filters::{Filters, MAX_PAGE, MAX_PAGE_SIZE};
use super::todo::{Todo, MAX_MODE_ENTRIES};

/// Maximum length for short text fields (name, level, contact)
const MAX_TEXT_LEN: usize = 200;

/// Maximum length for the address
const MAX_ADDRESS_LEN: usize = 500;

/// Local (666-7777) or full (+1 (501) 666-7777) phone numbers
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+?\d{1,3}[\s.-]?)?(\(?\d{3}\)?[\s.-]?)?\d{3}[\s.-]?\d{4}$")
        .expect("invalid phone regex")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("invalid email regex")
});

/// Validation error for a single field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    #[error("{field} must be provided")]
    Empty { field: &'static str },

    /// Field exceeds maximum length
    #[error("{field} must not be more than {max} bytes long")]
    TooLong { field: &'static str, max: usize },

    /// String doesn't match the required format
    #[error("{field} must be {expected}")]
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
    },

    /// Collection has fewer entries than required
    #[error("{field} must contain at least {min} entries")]
    TooFew { field: &'static str, min: usize },

    /// Collection has more entries than allowed
    #[error("{field} must contain at most {max} entries")]
    TooMany { field: &'static str, max: usize },

    #[error("{field} must not contain duplicate entries")]
    Duplicate { field: &'static str },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },

    /// Value is not in the allowed set
    #[error("invalid {field} value: '{value}'")]
    NotAllowed { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::TooFew { field, .. }
            | Self::TooMany { field, .. }
            | Self::Duplicate { field }
            | Self::OutOfRange { field, .. }
            | Self::NotAllowed { field, .. } => field,
        }
    }
}

/// All validation failures for one value, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `err` unless its field already has an error.
    pub fn add(&mut self, err: ValidationError) {
        self.errors.entry(err.field()).or_insert(err);
    }

    /// Record `err` when `ok` is false.
    pub fn check(&mut self, ok: bool, err: impl FnOnce() -> ValidationError) {
        if !ok {
            self.add(err());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ValidationError)> {
        self.errors.iter().map(|(field, err)| (*field, err))
    }

    /// `Ok(())` if nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed: ")?;
        for (i, err) in self.errors.values().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a todo before insert or update.
///
/// Identity fields (`id`, `created_at`, `version`) are not checked.
pub fn validate_todo(todo: &Todo) -> Result<(), ValidationErrors> {
    let mut v = ValidationErrors::new();

    check_text(&mut v, "name", &todo.name, MAX_TEXT_LEN);
    check_text(&mut v, "level", &todo.level, MAX_TEXT_LEN);
    check_text(&mut v, "contact", &todo.contact, MAX_TEXT_LEN);

    if required(&mut v, "phone", &todo.phone) {
        v.check(PHONE_RE.is_match(&todo.phone), || ValidationError::InvalidFormat {
            field: "phone",
            expected: "a valid phone number",
        });
    }

    if required(&mut v, "email", &todo.email) {
        v.check(EMAIL_RE.is_match(&todo.email), || ValidationError::InvalidFormat {
            field: "email",
            expected: "a valid email address",
        });
    }

    if required(&mut v, "website", &todo.website) {
        v.check(is_valid_website(&todo.website), || {
            ValidationError::InvalidFormat {
                field: "website",
                expected: "a valid http or https url",
            }
        });
    }

    check_text(&mut v, "address", &todo.address, MAX_ADDRESS_LEN);
    check_mode(&mut v, &todo.mode);

    v.into_result()
}

/// Validate list filters before they reach the store.
pub fn validate_filters(filters: &Filters) -> Result<(), ValidationErrors> {
    let mut v = ValidationErrors::new();

    v.check((1..=MAX_PAGE).contains(&filters.page), || {
        ValidationError::OutOfRange {
            field: "page",
            min: 1,
            max: MAX_PAGE,
        }
    });
    v.check((1..=MAX_PAGE_SIZE).contains(&filters.page_size), || {
        ValidationError::OutOfRange {
            field: "page_size",
            min: 1,
            max: MAX_PAGE_SIZE,
        }
    });
    v.check(filters.is_sort_allowed(), || ValidationError::NotAllowed {
        field: "sort",
        value: filters.sort.clone(),
    });

    v.into_result()
}

/// Records `Empty` and returns false when the value is blank.
fn required(v: &mut ValidationErrors, field: &'static str, value: &str) -> bool {
    let present = !value.trim().is_empty();
    v.check(present, || ValidationError::Empty { field });
    present
}

fn check_text(v: &mut ValidationErrors, field: &'static str, value: &str, max: usize) {
    if required(v, field, value) {
        v.check(value.len() <= max, || ValidationError::TooLong { field, max });
    }
}

fn check_mode(v: &mut ValidationErrors, mode: &[String]) {
    v.check(!mode.is_empty(), || ValidationError::TooFew {
        field: "mode",
        min: 1,
    });
    v.check(mode.len() <= MAX_MODE_ENTRIES, || ValidationError::TooMany {
        field: "mode",
        max: MAX_MODE_ENTRIES,
    });

    let mut seen = HashSet::with_capacity(mode.len());
    v.check(mode.iter().all(|entry| seen.insert(entry.as_str())), || {
        ValidationError::Duplicate { field: "mode" }
    });
}

fn is_valid_website(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
