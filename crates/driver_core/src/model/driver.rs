//! Driver domain model.
//!
//! # Invariants
//! - `id` is fixed at construction; updates replace every other field.
//! - `last_name` and `email` are unique across the store (enforced by the
//!   schema, not by this type).

use super::EntityId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person record with identity and contact fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl Driver {
    /// Creates a driver with a freshly generated identifier.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), first_name, last_name, email, phone_number)
    }

    /// Creates a driver with a caller-provided identifier.
    pub fn with_id(
        id: EntityId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
        }
    }

    /// Returns `"first last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
