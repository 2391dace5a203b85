//! Domain model for the driver roster.
//!
//! # Responsibility
//! - Define identity-bearing records used by handlers and repositories.
//!
//! # Invariants
//! - Every record carries an `EntityId` assigned by its creator, never by
//!   the store, and never reassigned afterwards.

use uuid::Uuid;

pub mod driver;

/// Globally unique identifier shared by every persisted record.
pub type EntityId = Uuid;
