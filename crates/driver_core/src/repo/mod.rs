//! Repository layer: predicate model, entity mapping, generic repository
//! and unit of work.
//!
//! # Responsibility
//! - Keep every SQL string inside this module tree.
//! - Expose store failures as `RepoError` kinds rather than raw SQLite codes.
//!
//! # Invariants
//! - Repositories are only obtained from a `UnitOfWork`, which scopes them
//!   to its connection and transaction.

pub mod driver_map;
pub mod entity;
pub mod generic_repo;
pub mod predicate;
pub mod unit_of_work;
