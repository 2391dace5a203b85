//! Read-side queries and their handlers.
//!
//! # Invariants
//! - Queries never open a transaction and never mutate the store.
//! - Name transforms only reorder characters; they never add or drop any.

use super::{log_failure, Handler, HandlerError, HandlerResult, Request};
use crate::model::driver::Driver;
use crate::model::EntityId;
use crate::repo::driver_map::DriverField;
use crate::repo::entity::Entity;
use crate::repo::generic_repo::RepoError;
use crate::repo::predicate::{Predicate, Sort};
use crate::repo::unit_of_work::UnitOfWork;
use log::debug;
use serde::{Deserialize, Serialize};

const LIST_DEFAULT_TAKE: u32 = 10;

/// Filtered, sorted page of drivers.
///
/// Name filters are substring matches (ASCII case-insensitive); email and
/// phone filters are exact. Blank filters are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDriversQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub order_by: DriverField,
    pub ascending: bool,
    pub skip: u32,
    pub take: u32,
}

impl Default for ListDriversQuery {
    fn default() -> Self {
        Self {
            first_name: None,
            last_name: None,
            email: None,
            phone_number: None,
            order_by: DriverField::Id,
            ascending: true,
            skip: 0,
            take: LIST_DEFAULT_TAKE,
        }
    }
}

impl ListDriversQuery {
    /// Combines the non-blank filters with AND; `None` when there are none.
    pub fn predicate(&self) -> Option<Predicate> {
        let mut predicates = Vec::new();

        if let Some(first_name) = non_blank(&self.first_name) {
            predicates.push(Predicate::contains(DriverField::FirstName, first_name));
        }
        if let Some(last_name) = non_blank(&self.last_name) {
            predicates.push(Predicate::contains(DriverField::LastName, last_name));
        }
        if let Some(email) = non_blank(&self.email) {
            predicates.push(Predicate::eq(DriverField::Email, email));
        }
        if let Some(phone_number) = non_blank(&self.phone_number) {
            predicates.push(Predicate::eq(DriverField::PhoneNumber, phone_number));
        }

        if predicates.is_empty() {
            None
        } else {
            Some(Predicate::and(predicates))
        }
    }
}

impl Request for ListDriversQuery {
    type Output = Vec<Driver>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetDriverByIdQuery {
    pub id: EntityId,
}

impl Request for GetDriverByIdQuery {
    type Output = Driver;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDriverByEmailQuery {
    pub email: String,
}

impl Request for GetDriverByEmailQuery {
    type Output = Driver;
}

/// Every driver's `"first last"` in ordinal order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetAlphabetizedDriversQuery;

impl Request for GetAlphabetizedDriversQuery {
    type Output = Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetDriverNameAlphabetizedQuery {
    pub id: EntityId,
}

impl Request for GetDriverNameAlphabetizedQuery {
    type Output = AlphabetizedName;
}

/// A driver's full name next to its character-sorted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphabetizedName {
    pub original: String,
    pub alphabetized: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListDriversHandler;

impl Handler<ListDriversQuery> for ListDriversHandler {
    fn handle(&self, uow: &mut UnitOfWork, query: ListDriversQuery) -> HandlerResult<Vec<Driver>> {
        let predicate = query.predicate();
        let sort = [Sort::new(query.order_by, query.ascending)];
        let drivers = uow.repository::<Driver>().get_all(
            predicate.as_ref(),
            &sort,
            Some(query.skip),
            Some(query.take),
        )?;

        debug!(
            "event=driver_list module=service status=ok filtered={} skip={} take={} returned={}",
            predicate.is_some(),
            query.skip,
            query.take,
            drivers.len()
        );
        Ok(drivers)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetDriverByIdHandler;

impl Handler<GetDriverByIdQuery> for GetDriverByIdHandler {
    fn handle(&self, uow: &mut UnitOfWork, query: GetDriverByIdQuery) -> HandlerResult<Driver> {
        let result = load_driver(uow, query.id);
        match &result {
            Ok(driver) => debug!(
                "event=driver_get module=service status=ok driver_id={}",
                driver.id
            ),
            Err(err) => log_failure("driver_get", err),
        }
        result
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetDriverByEmailHandler;

impl Handler<GetDriverByEmailQuery> for GetDriverByEmailHandler {
    fn handle(&self, uow: &mut UnitOfWork, query: GetDriverByEmailQuery) -> HandlerResult<Driver> {
        let predicate = Predicate::eq(DriverField::Email, query.email.as_str());
        let mut matches = uow
            .repository::<Driver>()
            .get_all(Some(&predicate), &[], None, None)?;

        let result = match matches.len() {
            0 => Err(HandlerError::not_found::<Driver>(&query.email)),
            1 => Ok(matches.remove(0)),
            _ => Err(HandlerError::Repo(RepoError::MultipleMatches {
                entity: Driver::NAME,
                key: query.email.clone(),
            })),
        };
        match &result {
            Ok(driver) => debug!(
                "event=driver_get_by_email module=service status=ok driver_id={}",
                driver.id
            ),
            Err(err) => log_failure("driver_get_by_email", err),
        }
        result
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlphabetizedRosterHandler;

impl Handler<GetAlphabetizedDriversQuery> for AlphabetizedRosterHandler {
    fn handle(
        &self,
        uow: &mut UnitOfWork,
        _query: GetAlphabetizedDriversQuery,
    ) -> HandlerResult<Vec<String>> {
        let drivers = uow
            .repository::<Driver>()
            .get_all(None, &[], None, None)?;

        let mut names: Vec<String> = drivers.iter().map(Driver::full_name).collect();
        names.sort_unstable();
        debug!(
            "event=driver_roster module=service status=ok count={}",
            names.len()
        );
        Ok(names)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlphabetizedNameHandler;

impl Handler<GetDriverNameAlphabetizedQuery> for AlphabetizedNameHandler {
    fn handle(
        &self,
        uow: &mut UnitOfWork,
        query: GetDriverNameAlphabetizedQuery,
    ) -> HandlerResult<AlphabetizedName> {
        let driver = match load_driver(uow, query.id) {
            Ok(driver) => driver,
            Err(err) => {
                log_failure("driver_alphabetize_name", &err);
                return Err(err);
            }
        };

        debug!(
            "event=driver_alphabetize_name module=service status=ok driver_id={}",
            driver.id
        );
        Ok(AlphabetizedName {
            original: driver.full_name(),
            alphabetized: format!(
                "{} {}",
                alphabetize(&driver.first_name),
                alphabetize(&driver.last_name)
            ),
        })
    }
}

/// Sorts the characters of `input` by lowercase value, ties by the original
/// character, so `"Oliver"` becomes `"eilOrv"`.
pub fn alphabetize(input: &str) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    chars.sort_by(|left, right| {
        left.to_lowercase()
            .cmp(right.to_lowercase())
            .then_with(|| left.cmp(right))
    });
    chars.into_iter().collect()
}

fn load_driver(uow: &mut UnitOfWork, id: EntityId) -> HandlerResult<Driver> {
    uow.repository::<Driver>()
        .get_by_id(id)?
        .ok_or_else(|| HandlerError::not_found::<Driver>(id))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|value| !value.trim().is_empty())
}
