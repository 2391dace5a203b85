//! Column mapping for `Driver` onto the `Driver` table.

use super::entity::{Entity, Field};
use super::generic_repo::{RepoError, RepoResult};
use super::predicate::FieldValue;
use crate::model::driver::Driver;
use crate::model::EntityId;
use rusqlite::Row;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Typed column names for building driver predicates and sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverField {
    #[default]
    Id,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
}

impl DriverField {
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::FirstName => "FirstName",
            Self::LastName => "LastName",
            Self::Email => "Email",
            Self::PhoneNumber => "PhoneNumber",
        }
    }
}

impl Display for DriverField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

impl From<DriverField> for String {
    fn from(value: DriverField) -> Self {
        value.column().to_string()
    }
}

impl Entity for Driver {
    const NAME: &'static str = "Driver";
    const TABLE: &'static str = "Driver";
    const KEY: &'static str = "Id";
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            column: "Id",
            immutable: true,
            read: |driver| FieldValue::from(driver.id),
        },
        Field {
            column: "FirstName",
            immutable: false,
            read: |driver| FieldValue::from(driver.first_name.as_str()),
        },
        Field {
            column: "LastName",
            immutable: false,
            read: |driver| FieldValue::from(driver.last_name.as_str()),
        },
        Field {
            column: "Email",
            immutable: false,
            read: |driver| FieldValue::from(driver.email.as_str()),
        },
        Field {
            column: "PhoneNumber",
            immutable: false,
            read: |driver| FieldValue::from(driver.phone_number.as_str()),
        },
    ];

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let id_text: String = row.get("Id")?;
        let id = Uuid::parse_str(&id_text).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{id_text}` in Driver.Id"))
        })?;

        Ok(Driver {
            id,
            first_name: row.get("FirstName")?,
            last_name: row.get("LastName")?,
            email: row.get("Email")?,
            phone_number: row.get("PhoneNumber")?,
        })
    }
}
