//! Unit of work: one connection, at most one active transaction.
//!
//! # Responsibility
//! - Own the store connection for one logical request.
//! - Drive the `Idle -> Active -> Idle` transaction state machine.
//! - Hand out repositories memoized per entity type for this instance only.
//!
//! # Invariants
//! - `begin_transaction` is idempotent while a transaction is active.
//! - A successful `commit` or `rollback` leaves the state `Idle`; a failed
//!   commit is rolled back and also ends `Idle`.
//! - Dropping the unit of work rolls back a pending transaction and releases
//!   the connection; repositories handed out earlier then fail with
//!   `RepoError::UnitOfWorkClosed`.
//! - Not `Send`: one instance must not be shared between concurrent callers.

use super::entity::Entity;
use super::generic_repo::{GenericRepository, RepoError, RepoResult};
use crate::db::{open_db, open_db_in_memory};
use log::{debug, error, info, warn};
use rusqlite::Connection;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

/// Transaction state of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    Active,
}

pub struct UnitOfWork {
    conn: Rc<Connection>,
    state: TransactionState,
    repositories: HashMap<TypeId, Rc<dyn Any>>,
}

impl UnitOfWork {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Rc::new(conn),
            state: TransactionState::Idle,
            repositories: HashMap::new(),
        }
    }

    /// Opens (and migrates) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a fresh, migrated in-memory store.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Raw access to the owned connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn is_transaction_active(&self) -> bool {
        self.state == TransactionState::Active
    }

    /// Starts a transaction unless one is already active.
    ///
    /// A transaction opened directly on `connection()` is adopted rather
    /// than nested.
    pub fn begin_transaction(&mut self) -> RepoResult<()> {
        if self.is_transaction_active() {
            return Ok(());
        }
        if !self.conn.is_autocommit() {
            self.state = TransactionState::Active;
            warn!("event=tx_begin module=uow status=ok adopted=true");
            return Ok(());
        }

        self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        self.state = TransactionState::Active;
        debug!("event=tx_begin module=uow status=ok");
        Ok(())
    }

    /// Returns the repository for `T`, creating it on first request.
    pub fn repository<T: Entity>(&mut self) -> Rc<GenericRepository<T>> {
        let key = TypeId::of::<T>();
        if let Some(existing) = self.repositories.get(&key) {
            if let Ok(repository) = Rc::clone(existing).downcast::<GenericRepository<T>>() {
                return repository;
            }
        }

        let repository = Rc::new(GenericRepository::<T>::new(Rc::downgrade(&self.conn)));
        let erased: Rc<dyn Any> = repository.clone();
        self.repositories.insert(key, erased);
        repository
    }

    /// Commits the active transaction; a no-op when idle.
    ///
    /// When the commit itself fails the transaction is rolled back and the
    /// commit error returned.
    pub fn commit(&mut self) -> RepoResult<()> {
        if !self.is_transaction_active() {
            return Ok(());
        }

        let result = self.conn.execute_batch("COMMIT;");
        self.state = TransactionState::Idle;
        match result {
            Ok(()) => {
                info!("event=tx_commit module=uow status=ok");
                Ok(())
            }
            Err(err) => {
                error!("event=tx_commit module=uow status=error error={err}");
                if let Err(rollback_err) = self.abort_pending() {
                    error!(
                        "event=tx_rollback module=uow status=error trigger=commit_failed error={rollback_err}"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Aborts the active transaction; a no-op when idle.
    ///
    /// The state stays `Active` when SQLite refuses the rollback.
    pub fn rollback(&mut self) -> RepoResult<()> {
        if !self.is_transaction_active() {
            return Ok(());
        }

        self.abort_pending()?;
        self.state = TransactionState::Idle;
        info!("event=tx_rollback module=uow status=ok");
        Ok(())
    }

    /// Runs `work` inside a transaction: commit on `Ok`, rollback on `Err`.
    ///
    /// Joins a transaction that is already active and ends it either way.
    pub fn in_transaction<R, E>(
        &mut self,
        work: impl FnOnce(&mut Self) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<RepoError>,
    {
        self.begin_transaction()?;
        match work(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback() {
                    warn!("event=tx_rollback module=uow status=error error={rollback_err}");
                }
                Err(err)
            }
        }
    }

    fn abort_pending(&self) -> RepoResult<()> {
        // SQLite may already have rolled back on its own after a failed COMMIT.
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK;")?;
        }
        Ok(())
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.is_transaction_active() {
            warn!("event=uow_dispose module=uow status=ok pending_tx=rollback");
            if let Err(err) = self.rollback() {
                error!("event=uow_dispose module=uow status=error error={err}");
            }
        }
        self.repositories.clear();
    }
}
