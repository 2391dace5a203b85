//! Field rules for driver write commands.

use super::{Rules, ValidationErrors, Validator};
use crate::service::commands::{CreateDriverCommand, UpdateDriverCommand};
use once_cell::sync::Lazy;
use regex::Regex;

/// Optional leading `+` followed by 7 to 15 digits.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("valid phone regex"));

pub const NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateDriverValidator;

impl Validator<CreateDriverCommand> for CreateDriverValidator {
    fn validate(&self, command: &CreateDriverCommand) -> Result<(), ValidationErrors> {
        let mut rules = Rules::new();
        name_rules(&mut rules, &command.first_name, &command.last_name);
        rules.rule_for("Email", &command.email).email().not_empty();
        rules
            .rule_for("PhoneNumber", &command.phone_number)
            .not_empty()
            .matches(&PHONE_RE, "'Phone Number' is not in the correct format.");
        rules.finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateDriverValidator;

impl Validator<UpdateDriverCommand> for UpdateDriverValidator {
    fn validate(&self, command: &UpdateDriverCommand) -> Result<(), ValidationErrors> {
        let mut rules = Rules::new();
        rules.non_nil_id("Id", command.id, "Id must be a valid non-empty Guid.");
        name_rules(&mut rules, &command.first_name, &command.last_name);
        rules.rule_for("Email", &command.email).email().not_empty();
        rules
            .rule_for("PhoneNumber", &command.phone_number)
            .not_empty()
            .matches(&PHONE_RE, "Phone number must be valid.");
        rules.finish()
    }
}

fn name_rules(rules: &mut Rules, first_name: &str, last_name: &str) {
    rules
        .rule_for("FirstName", first_name)
        .not_empty()
        .max_length(NAME_MAX_LENGTH);
    rules
        .rule_for("LastName", last_name)
        .not_empty()
        .max_length(NAME_MAX_LENGTH);
}
