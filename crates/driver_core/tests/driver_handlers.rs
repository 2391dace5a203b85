use driver_core::service::commands::{CreateDriverCommand, UpdateDriverCommand, RANDOM_BATCH_SIZE};
use driver_core::service::queries::ListDriversQuery;
use driver_core::validation::{CreateDriverValidator, Validator};
use driver_core::{Driver, DriverField, DriverService, HandlerError, RepoError, UnitOfWork};
use std::collections::HashSet;
use uuid::Uuid;

fn service() -> DriverService {
    DriverService::new(UnitOfWork::open_in_memory().unwrap())
}

fn create_command(first: &str, last: &str, email: &str, phone: &str) -> CreateDriverCommand {
    CreateDriverCommand {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone_number: phone.to_string(),
    }
}

fn update_command(
    id: Uuid,
    first: &str,
    last: &str,
    email: &str,
    phone: &str,
) -> UpdateDriverCommand {
    UpdateDriverCommand {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone_number: phone.to_string(),
    }
}

fn seed(service: &mut DriverService) -> Vec<Uuid> {
    [
        ("Ann", "Lee", "ann@x.com", "+11111111"),
        ("Bob", "Brown", "bob@x.com", "+22222222"),
        ("Cara", "Lewis", "cara@x.com", "+33333333"),
        ("Dan", "Ng", "dan@x.com", "+44444444"),
        ("Eve", "Leone", "eve@x.com", "+55555555"),
        ("anna", "Mills", "anna@x.com", "+66666666"),
    ]
    .into_iter()
    .map(|(first, last, email, phone)| {
        service
            .create(create_command(first, last, email, phone))
            .unwrap()
    })
    .collect()
}

#[test]
fn create_get_update_delete_lifecycle() {
    let mut service = service();

    let id = service
        .create(create_command("Ann", "Lee", "ann@x.com", "+12345678"))
        .unwrap();
    let loaded = service.get(id).unwrap();
    assert_eq!(
        loaded,
        Driver::with_id(id, "Ann", "Lee", "ann@x.com", "+12345678")
    );

    service
        .update(update_command(id, "Anna", "Lee", "anna@x.com", "+12345678"))
        .unwrap();
    let updated = service.get(id).unwrap();
    assert_eq!(updated.first_name, "Anna");
    assert_eq!(updated.email, "anna@x.com");
    assert_eq!(service.get_by_email("anna@x.com").unwrap().id, id);

    service.delete(id).unwrap();
    let err = service.get(id).unwrap_err();
    assert_eq!(err.to_string(), format!("'Driver' ({id}) was not found."));
}

#[test]
fn update_and_delete_of_missing_driver_are_not_found_and_change_nothing() {
    let mut service = service();
    seed(&mut service);
    let missing = Uuid::new_v4();

    let err = service
        .update(update_command(missing, "Zed", "Zulu", "zed@x.com", "+12345678"))
        .unwrap_err();
    assert!(matches!(err, HandlerError::NotFound { entity: "Driver", .. }));

    let err = service.delete(missing).unwrap_err();
    assert!(matches!(err, HandlerError::NotFound { .. }));
    assert!(!err.is_internal());

    let count = service
        .unit_of_work()
        .repository::<Driver>()
        .count(None)
        .unwrap();
    assert_eq!(count, 6);
}

#[test]
fn invalid_create_never_reaches_the_store() {
    let mut service = service();

    let err = service
        .create(create_command("", "Lee", "not-an-email", "12"))
        .unwrap_err();
    match err {
        HandlerError::Validation(errors) => {
            assert!(errors.has_field("FirstName"));
            assert!(errors.has_field("Email"));
            assert!(errors.has_field("PhoneNumber"));
            assert!(!errors.has_field("LastName"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let count = service
        .unit_of_work()
        .repository::<Driver>()
        .count(None)
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn invalid_update_is_rejected_before_lookup() {
    let mut service = service();
    let err = service
        .update(update_command(Uuid::nil(), "Ann", "Lee", "ann@x.com", "+12345678"))
        .unwrap_err();
    match err {
        HandlerError::Validation(errors) => assert!(errors.has_field("Id")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_email_is_already_exists() {
    let mut service = service();
    service
        .create(create_command("Ann", "Lee", "ann@x.com", "+12345678"))
        .unwrap();

    let err = service
        .create(create_command("Bob", "Brown", "ann@x.com", "+12345678"))
        .unwrap_err();
    assert!(matches!(
        err,
        HandlerError::AlreadyExists {
            field: "Email",
            ..
        }
    ));
    assert!(!err.is_internal());
}

#[test]
fn duplicate_last_name_is_an_internal_constraint_failure() {
    let mut service = service();
    service
        .create(create_command("Ann", "Lee", "ann@x.com", "+12345678"))
        .unwrap();

    let err = service
        .create(create_command("Bob", "Lee", "bob@x.com", "+12345678"))
        .unwrap_err();
    assert!(matches!(
        err,
        HandlerError::Repo(RepoError::ConstraintViolation(_))
    ));
    assert!(err.is_internal());
    assert!(!service.unit_of_work().is_transaction_active());
}

#[test]
fn list_defaults_to_first_ten_by_id() {
    let mut service = service();
    for index in 0..12 {
        service
            .create(create_command(
                "Racer",
                &format!("Number{index:02}"),
                &format!("racer{index}@x.com"),
                "+12345678",
            ))
            .unwrap();
    }

    let page = service.list(ListDriversQuery::default()).unwrap();
    assert_eq!(page.len(), 10);
    let ids: Vec<Uuid> = page.iter().map(|driver| driver.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_by_key(|id| id.to_string());
    assert_eq!(ids, sorted);
}

#[test]
fn list_filters_match_in_memory_evaluation() {
    let mut service = service();
    seed(&mut service);
    let all = service
        .list(ListDriversQuery {
            take: 100,
            ..ListDriversQuery::default()
        })
        .unwrap();

    let query = ListDriversQuery {
        first_name: Some("an".to_string()),
        order_by: DriverField::LastName,
        ascending: false,
        take: 100,
        ..ListDriversQuery::default()
    };
    let filtered = service.list(query).unwrap();

    let mut expected: Vec<Driver> = all
        .into_iter()
        .filter(|driver| driver.first_name.to_lowercase().contains("an"))
        .collect();
    expected.sort_by(|left, right| right.last_name.cmp(&left.last_name));
    assert_eq!(filtered, expected);

    let names: Vec<&str> = filtered.iter().map(|driver| driver.first_name.as_str()).collect();
    assert_eq!(names, vec!["Dan", "anna", "Ann"]);
}

#[test]
fn list_exact_filters_and_paging() {
    let mut service = service();
    seed(&mut service);

    let by_email = service
        .list(ListDriversQuery {
            email: Some("bob@x.com".to_string()),
            ..ListDriversQuery::default()
        })
        .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].last_name, "Brown");

    let page = service
        .list(ListDriversQuery {
            last_name: Some("le".to_string()),
            order_by: DriverField::LastName,
            skip: 1,
            take: 1,
            ..ListDriversQuery::default()
        })
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].last_name, "Leone");
}

#[test]
fn get_by_email_missing_is_not_found() {
    let mut service = service();
    seed(&mut service);

    let err = service.get_by_email("nobody@x.com").unwrap_err();
    assert_eq!(err.to_string(), "'Driver' (nobody@x.com) was not found.");
}

#[test]
fn generate_random_inserts_a_valid_batch() {
    let mut service = service();

    let generated = service.generate_random().unwrap();
    assert_eq!(generated.len(), RANDOM_BATCH_SIZE);

    let ids: HashSet<Uuid> = generated.iter().map(|driver| driver.id).collect();
    assert_eq!(ids.len(), RANDOM_BATCH_SIZE);

    for driver in &generated {
        let command = create_command(
            &driver.first_name,
            &driver.last_name,
            &driver.email,
            &driver.phone_number,
        );
        assert!(
            CreateDriverValidator.validate(&command).is_ok(),
            "generated driver fails validation: {driver:?}"
        );
        assert_eq!(&service.get(driver.id).unwrap(), driver);
    }
}

#[test]
fn roster_is_full_names_in_ordinal_order() {
    let mut service = service();
    seed(&mut service);

    let roster = service.alphabetized_roster().unwrap();
    assert_eq!(
        roster,
        vec![
            "Ann Lee",
            "Bob Brown",
            "Cara Lewis",
            "Dan Ng",
            "Eve Leone",
            "anna Mills",
        ]
    );
}

#[test]
fn roster_of_empty_store_is_empty() {
    let mut service = service();
    assert!(service.alphabetized_roster().unwrap().is_empty());
}

#[test]
fn alphabetized_name_sorts_each_part() {
    let mut service = service();
    let id = service
        .create(create_command("Oliver", "Johnson", "oliver@x.com", "+12345678"))
        .unwrap();

    let name = service.alphabetized_name(id).unwrap();
    assert_eq!(name.original, "Oliver Johnson");
    assert_eq!(name.alphabetized, "eilOrv hJnnoos");

    let mut original: Vec<char> = name.original.chars().collect();
    let mut sorted: Vec<char> = name.alphabetized.chars().collect();
    original.sort_unstable();
    sorted.sort_unstable();
    assert_eq!(original, sorted);
}

#[test]
fn alphabetized_name_of_missing_driver_is_not_found() {
    let mut service = service();
    let err = service.alphabetized_name(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, HandlerError::NotFound { .. }));
}
