use driver_core::service::commands::CreateDriverCommand;
use driver_core::service::queries::AlphabetizedName;
use driver_core::{default_log_level, CoreConfig, Driver};
use serde_json::json;
use std::path::PathBuf;
use uuid::Uuid;

#[test]
fn driver_serializes_with_camel_case_fields() {
    let id = Uuid::parse_str("6f9619ff-8b86-d011-b42d-00cf4fc964ff").unwrap();
    let driver = Driver::with_id(id, "Ann", "Lee", "ann@x.com", "+12345678");

    let value = serde_json::to_value(&driver).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            "firstName": "Ann",
            "lastName": "Lee",
            "email": "ann@x.com",
            "phoneNumber": "+12345678",
        })
    );
}

#[test]
fn create_command_reads_camel_case_payload() {
    let command: CreateDriverCommand = serde_json::from_value(json!({
        "firstName": "Ann",
        "lastName": "Lee",
        "email": "ann@x.com",
        "phoneNumber": "+12345678",
    }))
    .unwrap();
    assert_eq!(command.first_name, "Ann");
    assert_eq!(command.phone_number, "+12345678");
}

#[test]
fn alphabetized_name_shape() {
    let name = AlphabetizedName {
        original: "Oliver Johnson".to_string(),
        alphabetized: "eilOrv hJnnoos".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&name).unwrap(),
        json!({ "original": "Oliver Johnson", "alphabetized": "eilOrv hJnnoos" })
    );
}

#[test]
fn core_config_reads_camel_case_and_fills_defaults() {
    let config: CoreConfig = serde_json::from_value(json!({
        "databasePath": "/var/lib/drivers/drivers.db",
        "logDir": "/var/log/drivers",
    }))
    .unwrap();
    assert_eq!(
        config.database_path,
        Some(PathBuf::from("/var/lib/drivers/drivers.db"))
    );
    assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/drivers")));
    assert_eq!(config.log_level, default_log_level());

    let empty: CoreConfig = serde_json::from_value(json!({})).unwrap();
    assert_eq!(empty, CoreConfig::default());
}
