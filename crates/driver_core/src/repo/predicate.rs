//! Declarative filter and sort expressions.
//!
//! # Responsibility
//! - Describe which rows a read should return and in which order, without
//!   carrying any store handle or query syntax.
//!
//! # Invariants
//! - Field names are column names of the target entity; the repository
//!   rejects names the entity does not map.
//! - An absent predicate matches every row.

use crate::model::EntityId;

/// Literal compared against a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Null,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<EntityId> for FieldValue {
    fn from(value: EntityId) -> Self {
        Self::Text(value.to_string())
    }
}

/// Comparison applied by a field predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Exact equality.
    Eq,
    /// SQL `LIKE` pattern match; `%` and `_` are wildcards, `\` escapes.
    Like,
}

/// Boolean combinator for predicate groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOperator {
    And,
    Or,
}

/// Filter expression: one field comparison or a group of child predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Field {
        field: String,
        operator: Operator,
        value: FieldValue,
    },
    /// An empty `And` group matches every row, an empty `Or` group none.
    Group {
        operator: GroupOperator,
        predicates: Vec<Predicate>,
    },
}

impl Predicate {
    pub fn field(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<FieldValue>,
    ) -> Self {
        Self::Field {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::field(field, Operator::Eq, value)
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::field(field, Operator::Like, FieldValue::Text(pattern.into()))
    }

    /// Substring match. Wildcard characters in `needle` match literally.
    pub fn contains(field: impl Into<String>, needle: &str) -> Self {
        Self::like(field, format!("%{}%", escape_like(needle)))
    }

    pub fn and(predicates: Vec<Predicate>) -> Self {
        Self::Group {
            operator: GroupOperator::And,
            predicates,
        }
    }

    pub fn or(predicates: Vec<Predicate>) -> Self {
        Self::Group {
            operator: GroupOperator::Or,
            predicates,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One sort key. A read takes an ordered slice of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, ascending: bool) -> Self {
        Self {
            field: field.into(),
            direction: if ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            },
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, true)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, false)
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, Operator, Predicate, Sort, SortDirection};

    #[test]
    fn contains_wraps_and_escapes_wildcards() {
        let predicate = Predicate::contains("LastName", "50%_off");
        assert_eq!(
            predicate,
            Predicate::Field {
                field: "LastName".to_string(),
                operator: Operator::Like,
                value: FieldValue::Text("%50\\%\\_off%".to_string()),
            }
        );
    }

    #[test]
    fn sort_new_maps_ascending_flag() {
        assert_eq!(Sort::new("Id", false).direction, SortDirection::Descending);
        assert_eq!(Sort::asc("Id").direction, SortDirection::Ascending);
    }
}
