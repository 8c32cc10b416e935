//! Pagination metadata for list responses

use serde::{Deserialize, Serialize};

/// Paging information returned alongside a page of records.
///
/// An empty result, including a page past the last one, yields the zero
/// value, so `total_records == 0` doubles as the "no results" signal. Zero
/// fields are left out when serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_page: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_records: i64,
}

impl Metadata {
    /// Compute metadata from the windowed total count and the requested page.
    pub fn calculate(total_records: i64, page: u32, page_size: u32) -> Self {
        if total_records == 0 {
            return Self::default();
        }

        let last_page = (total_records as f64 / f64::from(page_size)).ceil() as u32;

        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page,
            total_records,
        }
    }

    /// True when nothing matched.
    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}

fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
