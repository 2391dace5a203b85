//! Write-side commands and their handlers.
//!
//! # Invariants
//! - Every handler mutates the store only inside one transaction.
//! - `GenerateRandomDrivers` inserts its whole batch or nothing.

use super::{log_failure, Handler, HandlerError, HandlerResult, Request};
use crate::model::driver::Driver;
use crate::model::EntityId;
use crate::repo::driver_map::DriverField;
use crate::repo::entity::Entity;
use crate::repo::predicate::Predicate;
use crate::repo::unit_of_work::UnitOfWork;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of drivers produced by one `GenerateRandomDriversCommand`.
pub const RANDOM_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverCommand {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl Request for CreateDriverCommand {
    type Output = EntityId;
}

/// Full replacement of every field except the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverCommand {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl Request for UpdateDriverCommand {
    type Output = ();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteDriverCommand {
    pub id: EntityId,
}

impl Request for DeleteDriverCommand {
    type Output = ();
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateRandomDriversCommand;

impl Request for GenerateRandomDriversCommand {
    type Output = Vec<Driver>;
}

/// Creates a driver with a fresh id.
///
/// Rejects a second driver with the same email before inserting; a duplicate
/// last name still surfaces as a store constraint violation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateDriverHandler;

impl Handler<CreateDriverCommand> for CreateDriverHandler {
    fn handle(
        &self,
        uow: &mut UnitOfWork,
        command: CreateDriverCommand,
    ) -> HandlerResult<EntityId> {
        let driver = Driver::new(
            command.first_name,
            command.last_name,
            command.email,
            command.phone_number,
        );

        let result: HandlerResult<EntityId> = uow.in_transaction(|uow| {
            let repo = uow.repository::<Driver>();
            let same_email = Predicate::eq(DriverField::Email, driver.email.as_str());
            if repo.count(Some(&same_email))? > 0 {
                return Err(HandlerError::AlreadyExists {
                    entity: Driver::NAME,
                    field: "Email",
                    value: driver.email.clone(),
                });
            }

            repo.insert(&driver)?;
            Ok(driver.id)
        });

        match &result {
            Ok(id) => info!("event=driver_create module=service status=ok driver_id={id}"),
            Err(err) => log_failure("driver_create", err),
        }
        result
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateDriverHandler;

impl Handler<UpdateDriverCommand> for UpdateDriverHandler {
    fn handle(&self, uow: &mut UnitOfWork, command: UpdateDriverCommand) -> HandlerResult<()> {
        let id = command.id;
        let result: HandlerResult<()> = uow.in_transaction(|uow| {
            let repo = uow.repository::<Driver>();
            let mut driver = repo
                .get_by_id(id)?
                .ok_or_else(|| HandlerError::not_found::<Driver>(id))?;

            driver.first_name = command.first_name;
            driver.last_name = command.last_name;
            driver.email = command.email;
            driver.phone_number = command.phone_number;

            repo.update(&driver)?;
            Ok(())
        });

        match &result {
            Ok(()) => info!("event=driver_update module=service status=ok driver_id={id}"),
            Err(err) => log_failure("driver_update", err),
        }
        result
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteDriverHandler;

impl Handler<DeleteDriverCommand> for DeleteDriverHandler {
    fn handle(&self, uow: &mut UnitOfWork, command: DeleteDriverCommand) -> HandlerResult<()> {
        let id = command.id;
        let result: HandlerResult<()> = uow.in_transaction(|uow| {
            let repo = uow.repository::<Driver>();
            let driver = repo
                .get_by_id(id)?
                .ok_or_else(|| HandlerError::not_found::<Driver>(id))?;

            if !repo.delete(&driver)? {
                return Err(HandlerError::not_found::<Driver>(id));
            }
            Ok(())
        });

        match &result {
            Ok(()) => info!("event=driver_delete module=service status=ok driver_id={id}"),
            Err(err) => log_failure("driver_delete", err),
        }
        result
    }
}

/// Seeds the store with `RANDOM_BATCH_SIZE` random drivers in one transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateRandomDriversHandler;

impl Handler<GenerateRandomDriversCommand> for GenerateRandomDriversHandler {
    fn handle(
        &self,
        uow: &mut UnitOfWork,
        _command: GenerateRandomDriversCommand,
    ) -> HandlerResult<Vec<Driver>> {
        let mut rng = rand::thread_rng();
        let drivers = (0..RANDOM_BATCH_SIZE)
            .map(|_| random_driver(&mut rng))
            .collect();

        let result = insert_batch(uow, drivers);
        match &result {
            Ok(drivers) => info!(
                "event=driver_generate module=service status=ok count={}",
                drivers.len()
            ),
            Err(err) => log_failure("driver_generate", err),
        }
        result
    }
}

/// Inserts all `drivers` atomically; one failure discards the whole batch.
pub(crate) fn insert_batch(
    uow: &mut UnitOfWork,
    drivers: Vec<Driver>,
) -> HandlerResult<Vec<Driver>> {
    uow.in_transaction(|uow| {
        let repo = uow.repository::<Driver>();
        for driver in &drivers {
            repo.insert(driver)?;
        }
        Ok(drivers)
    })
}

/// Builds one driver with random lowercase names, an `example.com` email and
/// a `+`-prefixed 8 or 9 digit phone number.
pub fn random_driver<R: Rng + ?Sized>(rng: &mut R) -> Driver {
    let first_name = random_letters(rng, 6);
    let last_name = random_letters(rng, 8);
    let email = format!("{}@example.com", random_letters(rng, 5));
    let phone_number = format!("+{}", rng.gen_range(10_000_000u32..999_999_999));
    Driver::new(first_name, last_name, email, phone_number)
}

fn random_letters<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
        .collect()
}
