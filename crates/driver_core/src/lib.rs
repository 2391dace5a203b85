//! Driver roster data-access core.
//!
//! Generic repositories and a unit of work over SQLite, with validated
//! command/query handlers for driver records on top.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::driver::Driver;
pub use model::EntityId;
pub use repo::driver_map::DriverField;
pub use repo::generic_repo::{GenericRepository, RepoError, RepoResult};
pub use repo::predicate::{Predicate, Sort, SortDirection};
pub use repo::unit_of_work::{TransactionState, UnitOfWork};
pub use service::driver_service::DriverService;
pub use service::{Handler, HandlerError, HandlerResult, Request};

/// Minimal health-check API for embedding callers.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
