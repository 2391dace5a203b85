//! Command/query handlers over the driver roster.
//!
//! # Responsibility
//! - Orchestrate validation, transactions and repository calls per use case.
//! - Map store outcomes to `HandlerError` kinds callers can branch on.
//!
//! # Invariants
//! - Write handlers run inside `UnitOfWork::in_transaction`; any error rolls
//!   the whole operation back before it is returned.
//! - Read handlers never open a transaction.

use crate::repo::entity::Entity;
use crate::repo::generic_repo::RepoError;
use crate::repo::unit_of_work::UnitOfWork;
use crate::validation::ValidationErrors;
use log::{error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod commands;
pub mod driver_service;
pub mod pipeline;
pub mod queries;

pub type HandlerResult<T> = Result<T, HandlerError>;

/// A command or query with its result type.
pub trait Request {
    type Output;
}

/// Executes one request against a unit of work.
pub trait Handler<R: Request> {
    fn handle(&self, uow: &mut UnitOfWork, request: R) -> HandlerResult<R::Output>;
}

/// Failure of a command or query.
#[derive(Debug)]
pub enum HandlerError {
    /// Field rules rejected the command; nothing reached the store.
    Validation(ValidationErrors),
    NotFound {
        entity: &'static str,
        key: String,
    },
    /// A record with the same unique value already exists.
    AlreadyExists {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
    Repo(RepoError),
}

impl HandlerError {
    pub fn not_found<T: Entity>(key: impl Display) -> Self {
        Self::NotFound {
            entity: T::NAME,
            key: key.to_string(),
        }
    }

    /// True for failures a caller should report as a generic internal error.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Repo(_))
    }
}

impl Display for HandlerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::NotFound { entity, key } => write!(f, "'{entity}' ({key}) was not found."),
            Self::AlreadyExists {
                entity,
                field,
                value,
            } => write!(f, "'{entity}' with {field} `{value}` already exists."),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for HandlerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ValidationErrors> for HandlerError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

fn log_failure(event: &str, err: &HandlerError) {
    let reason = log_reason(err);
    if err.is_internal() {
        error!("event={event} module=service status=error {reason}");
    } else {
        warn!("event={event} module=service status=rejected {reason}");
    }
}

/// Key/value detail for a failure event. Unique values such as emails are
/// left out; only not-found keys are echoed.
fn log_reason(err: &HandlerError) -> String {
    match err {
        HandlerError::AlreadyExists { entity, field, .. } => {
            format!("reason=already_exists entity={entity} field={field}")
        }
        HandlerError::Repo(RepoError::MultipleMatches { entity, .. }) => {
            format!("error=multiple_matches entity={entity}")
        }
        HandlerError::Repo(err) => format!("error={err}"),
        HandlerError::Validation(_) | HandlerError::NotFound { .. } => format!("reason={err}"),
    }
}
