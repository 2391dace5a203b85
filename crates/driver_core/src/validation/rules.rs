//! Fluent rule builder used by command validators.

use super::{ValidationError, ValidationErrors};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Accumulates failures across all declared field rules.
#[derive(Debug, Default)]
pub struct Rules {
    errors: Vec<ValidationError>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a rule chain for one string field.
    pub fn rule_for<'a>(&'a mut self, field: &'static str, value: &'a str) -> FieldRules<'a> {
        FieldRules {
            errors: &mut self.errors,
            field,
            value,
        }
    }

    /// Fails with `message` when `id` is the nil UUID.
    pub fn non_nil_id(&mut self, field: &'static str, id: Uuid, message: &str) -> &mut Self {
        if id.is_nil() {
            self.errors.push(ValidationError {
                field,
                message: message.to_string(),
            });
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::from(self.errors))
        }
    }
}

/// Rule chain for one field; each failing rule records one error.
pub struct FieldRules<'a> {
    errors: &'a mut Vec<ValidationError>,
    field: &'static str,
    value: &'a str,
}

impl FieldRules<'_> {
    /// Rejects empty and whitespace-only values.
    pub fn not_empty(self) -> Self {
        if self.value.trim().is_empty() {
            let message = format!("'{}' must not be empty.", display_name(self.field));
            self.fail(message)
        } else {
            self
        }
    }

    /// Rejects values longer than `max` characters.
    pub fn max_length(self, max: usize) -> Self {
        let length = self.value.chars().count();
        if length > max {
            let message = format!(
                "The length of '{}' must be {max} characters or fewer. You entered {length} characters.",
                display_name(self.field)
            );
            self.fail(message)
        } else {
            self
        }
    }

    /// Requires `local@domain.tld` shape with a single `@`.
    pub fn email(self) -> Self {
        if EMAIL_RE.is_match(self.value) {
            self
        } else {
            let message = format!("'{}' is not a valid email address.", display_name(self.field));
            self.fail(message)
        }
    }

    pub fn matches(self, pattern: &Regex, message: &str) -> Self {
        if pattern.is_match(self.value) {
            self
        } else {
            self.fail(message.to_string())
        }
    }

    fn fail(self, message: String) -> Self {
        self.errors.push(ValidationError {
            field: self.field,
            message,
        });
        self
    }
}

/// `PhoneNumber` -> `Phone Number`.
fn display_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len() + 2);
    for (index, ch) in field.chars().enumerate() {
        if index > 0 && ch.is_uppercase() {
            name.push(' ');
        }
        name.push(ch);
    }
    name
}
