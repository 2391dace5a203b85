//! Persistence capability shared by every entity type.
//!
//! # Responsibility
//! - Describe an entity's table and columns at compile time, so a single
//!   `GenericRepository<T>` can read and write any mapped type.
//!
//! # Invariants
//! - `FIELDS` lists every persisted column, the key column included.
//! - Fields flagged `immutable` (always the key) are never part of an
//!   update's `SET` list.

use super::generic_repo::RepoResult;
use super::predicate::FieldValue;
use crate::model::EntityId;
use rusqlite::Row;

/// Column descriptor: name, accessor, and whether updates may rewrite it.
pub struct Field<T> {
    pub column: &'static str,
    pub immutable: bool,
    pub read: fn(&T) -> FieldValue,
}

/// Types that `GenericRepository` can persist.
pub trait Entity: Sized + 'static {
    /// Entity name used in diagnostics and not-found messages.
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Primary key column; also the default sort key.
    const KEY: &'static str;
    const FIELDS: &'static [Field<Self>];

    fn id(&self) -> EntityId;

    /// Decodes one row selected with the columns of `FIELDS`.
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;

    fn field(column: &str) -> Option<&'static Field<Self>> {
        Self::FIELDS.iter().find(|field| field.column == column)
    }
}
