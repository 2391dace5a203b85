//! Declarative field validation for write commands.
//!
//! # Responsibility
//! - Collect every failed field rule of a command into one error value.
//! - Provide the validators bound to each driver write command.
//!
//! # Invariants
//! - Validators are pure: they never touch the store.
//! - All rules run; failures keep the order in which rules were declared.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod driver_rules;
pub mod rules;

pub use driver_rules::{CreateDriverValidator, UpdateDriverValidator};
pub use rules::Rules;

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

/// Aggregated rule failures for one command. Never empty when returned as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns whether any failure concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(value: Vec<ValidationError>) -> Self {
        Self(value)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed:")?;
        for error in &self.0 {
            write!(f, " {}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Validator bound to one command type.
pub trait Validator<R> {
    fn validate(&self, request: &R) -> Result<(), ValidationErrors>;
}
