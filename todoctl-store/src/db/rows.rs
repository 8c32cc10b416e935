//! Row mapping between the `todos` table and [`Todo`]
//!
//! `mode` travels as a native `TEXT[]`, which keeps element order and exact
//! contents in both directions.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use sqlx::FromRow;
use todoctl_core::Todo;

/// Full todo row
#[derive(Debug, Clone, FromRow)]
pub struct TodoRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub level: String,
    pub contact: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub address: String,
    pub mode: Vec<String>,
    pub version: i32,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            name: row.name,
            level: row.level,
            contact: row.contact,
            phone: row.phone,
            email: row.email,
            website: row.website,
            address: row.address,
            mode: row.mode,
            version: row.version,
        }
    }
}

/// Todo row from a list query, carrying the windowed total
#[derive(Debug, Clone, FromRow)]
pub struct TodoPageRow {
    pub total_records: i64,
    #[sqlx(flatten)]
    pub todo: TodoRow,
}

/// Store-assigned columns returned by INSERT
#[derive(Debug, Clone, Copy, FromRow)]
pub struct InsertedRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

impl InsertedRow {
    pub fn apply_to(self, todo: &mut Todo) {
        todo.id = self.id;
        todo.created_at = self.created_at;
        todo.version = self.version;
    }
}

/// Bind the caller-owned columns as `$1..$8`, in this order:
/// name, level, contact, phone, email, website, address, mode.
pub fn bind_fields<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    todo: &'q Todo,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query
        .bind(&todo.name)
        .bind(&todo.level)
        .bind(&todo.contact)
        .bind(&todo.phone)
        .bind(&todo.email)
        .bind(&todo.website)
        .bind(&todo.address)
        .bind(&todo.mode)
}
