//! Driver use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for every driver command and query.
//! - Route write commands through their validators before any store access.
//!
//! # Invariants
//! - One service owns one unit of work; calls are strictly sequential.
//! - Service APIs never bypass handler validation or transaction contracts.

use super::commands::{
    CreateDriverCommand, CreateDriverHandler, DeleteDriverCommand, DeleteDriverHandler,
    GenerateRandomDriversCommand, GenerateRandomDriversHandler, UpdateDriverCommand,
    UpdateDriverHandler,
};
use super::pipeline::ValidationPipeline;
use super::queries::{
    AlphabetizedName, AlphabetizedNameHandler, AlphabetizedRosterHandler,
    GetAlphabetizedDriversQuery, GetDriverByEmailHandler, GetDriverByEmailQuery,
    GetDriverByIdHandler, GetDriverByIdQuery, GetDriverNameAlphabetizedQuery,
    ListDriversHandler, ListDriversQuery,
};
use super::{Handler, HandlerResult};
use crate::config::CoreConfig;
use crate::model::driver::Driver;
use crate::model::EntityId;
use crate::repo::generic_repo::RepoResult;
use crate::repo::unit_of_work::UnitOfWork;
use crate::validation::{CreateDriverValidator, UpdateDriverValidator};

/// Use-case service wrapper over one unit of work.
pub struct DriverService {
    uow: UnitOfWork,
}

impl DriverService {
    pub fn new(uow: UnitOfWork) -> Self {
        Self { uow }
    }

    /// Opens the store described by `config`.
    pub fn open(config: &CoreConfig) -> RepoResult<Self> {
        Ok(Self::new(config.open_unit_of_work()?))
    }

    /// Validates and inserts a new driver, returning its fresh id.
    pub fn create(&mut self, command: CreateDriverCommand) -> HandlerResult<EntityId> {
        ValidationPipeline::new(CreateDriverValidator, CreateDriverHandler)
            .handle(&mut self.uow, command)
    }

    /// Validates and replaces every mutable field of an existing driver.
    pub fn update(&mut self, command: UpdateDriverCommand) -> HandlerResult<()> {
        ValidationPipeline::new(UpdateDriverValidator, UpdateDriverHandler)
            .handle(&mut self.uow, command)
    }

    pub fn delete(&mut self, id: EntityId) -> HandlerResult<()> {
        DeleteDriverHandler.handle(&mut self.uow, DeleteDriverCommand { id })
    }

    /// Inserts a batch of random drivers atomically and returns them.
    pub fn generate_random(&mut self) -> HandlerResult<Vec<Driver>> {
        GenerateRandomDriversHandler.handle(&mut self.uow, GenerateRandomDriversCommand)
    }

    pub fn list(&mut self, query: ListDriversQuery) -> HandlerResult<Vec<Driver>> {
        ListDriversHandler.handle(&mut self.uow, query)
    }

    pub fn get(&mut self, id: EntityId) -> HandlerResult<Driver> {
        GetDriverByIdHandler.handle(&mut self.uow, GetDriverByIdQuery { id })
    }

    pub fn get_by_email(&mut self, email: impl Into<String>) -> HandlerResult<Driver> {
        let query = GetDriverByEmailQuery {
            email: email.into(),
        };
        GetDriverByEmailHandler.handle(&mut self.uow, query)
    }

    pub fn alphabetized_roster(&mut self) -> HandlerResult<Vec<String>> {
        AlphabetizedRosterHandler.handle(&mut self.uow, GetAlphabetizedDriversQuery)
    }

    pub fn alphabetized_name(&mut self, id: EntityId) -> HandlerResult<AlphabetizedName> {
        AlphabetizedNameHandler.handle(&mut self.uow, GetDriverNameAlphabetizedQuery { id })
    }

    pub fn unit_of_work(&mut self) -> &mut UnitOfWork {
        &mut self.uow
    }
}
