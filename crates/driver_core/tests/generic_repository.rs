use driver_core::repo::predicate::{Predicate, Sort};
use driver_core::{Driver, DriverField, RepoError, UnitOfWork};
use uuid::Uuid;

fn seeded() -> UnitOfWork {
    let mut uow = UnitOfWork::open_in_memory().unwrap();
    let repo = uow.repository::<Driver>();
    for (first, last, email, phone) in [
        ("Ann", "Lee", "ann@x.com", "+11111111"),
        ("Bob", "Brown", "bob@x.com", "+22222222"),
        ("Cara", "Lewis", "cara@x.com", "+33333333"),
        ("Dan", "Ng", "dan@y.org", "+44444444"),
        ("Eve", "Leone", "eve@y.org", "+55555555"),
    ] {
        repo.insert(&Driver::new(first, last, email, phone)).unwrap();
    }
    uow
}

#[test]
fn insert_then_get_by_id_roundtrip() {
    let mut uow = UnitOfWork::open_in_memory().unwrap();
    let repo = uow.repository::<Driver>();
    let driver = Driver::new("Ann", "Lee", "ann@x.com", "+12345678");
    repo.insert(&driver).unwrap();

    assert_eq!(repo.get_by_id(driver.id).unwrap(), Some(driver.clone()));
    assert!(repo.exists(driver.id).unwrap());
    assert!(!repo.exists(Uuid::new_v4()).unwrap());
    assert_eq!(repo.get_by_id(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn insert_duplicate_key_is_constraint_violation() {
    let mut uow = UnitOfWork::open_in_memory().unwrap();
    let repo = uow.repository::<Driver>();
    let driver = Driver::new("Ann", "Lee", "ann@x.com", "+12345678");
    repo.insert(&driver).unwrap();

    let mut clash = driver.clone();
    clash.last_name = "Other".to_string();
    clash.email = "other@x.com".to_string();
    let err = repo.insert(&clash).unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert_eq!(repo.count(None).unwrap(), 1);
}

#[test]
fn update_rewrites_fields_and_missing_row_fails() {
    let mut uow = UnitOfWork::open_in_memory().unwrap();
    let repo = uow.repository::<Driver>();
    let mut driver = Driver::new("Ann", "Lee", "ann@x.com", "+12345678");
    repo.insert(&driver).unwrap();

    driver.first_name = "Anna".to_string();
    driver.phone_number = "+87654321".to_string();
    repo.update(&driver).unwrap();
    assert_eq!(repo.get_by_id(driver.id).unwrap(), Some(driver));

    let ghost = Driver::new("No", "Body", "no@x.com", "+12345678");
    let err = repo.update(&ghost).unwrap_err();
    match err {
        RepoError::UpdateFailed { entity, id } => {
            assert_eq!(entity, "Driver");
            assert_eq!(id, ghost.id);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn delete_reports_whether_a_row_was_removed() {
    let mut uow = UnitOfWork::open_in_memory().unwrap();
    let repo = uow.repository::<Driver>();
    let driver = Driver::new("Ann", "Lee", "ann@x.com", "+12345678");
    repo.insert(&driver).unwrap();

    assert!(repo.delete(&driver).unwrap());
    assert!(!repo.delete(&driver).unwrap());
    assert_eq!(repo.count(None).unwrap(), 0);
}

#[test]
fn get_all_filters_sorts_and_pages() {
    let mut uow = seeded();
    let repo = uow.repository::<Driver>();
    let starts_with_le = Predicate::like(DriverField::LastName, "Le%");

    let names: Vec<String> = repo
        .get_all(Some(&starts_with_le), &[Sort::desc(DriverField::LastName)], None, None)
        .unwrap()
        .into_iter()
        .map(|driver| driver.last_name)
        .collect();
    assert_eq!(names, vec!["Lewis", "Leone", "Lee"]);

    let page: Vec<String> = repo
        .get_all(None, &[Sort::asc(DriverField::FirstName)], Some(1), Some(2))
        .unwrap()
        .into_iter()
        .map(|driver| driver.first_name)
        .collect();
    assert_eq!(page, vec!["Bob", "Cara"]);

    let tail = repo
        .get_all(None, &[Sort::asc(DriverField::FirstName)], Some(4), None)
        .unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].first_name, "Eve");
}

#[test]
fn get_all_without_sort_is_ordered_by_key() {
    let mut uow = seeded();
    let repo = uow.repository::<Driver>();

    let ids: Vec<String> = repo
        .get_all(None, &[], None, None)
        .unwrap()
        .into_iter()
        .map(|driver| driver.id.to_string())
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn or_groups_and_counts_agree() {
    let mut uow = seeded();
    let repo = uow.repository::<Driver>();
    let predicate = Predicate::or(vec![
        Predicate::eq(DriverField::Email, "ann@x.com"),
        Predicate::contains(DriverField::Email, "@y.org"),
    ]);

    let matches = repo.get_all(Some(&predicate), &[], None, None).unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(repo.count(Some(&predicate)).unwrap(), 3);
    assert_eq!(repo.count(Some(&Predicate::or(Vec::new()))).unwrap(), 0);
    assert_eq!(repo.count(Some(&Predicate::and(Vec::new()))).unwrap(), 5);
}

#[test]
fn contains_treats_wildcards_literally() {
    let mut uow = seeded();
    let repo = uow.repository::<Driver>();

    let percent = Predicate::contains(DriverField::FirstName, "%");
    assert_eq!(repo.count(Some(&percent)).unwrap(), 0);
}

#[test]
fn first_or_default_follows_sort() {
    let mut uow = seeded();
    let repo = uow.repository::<Driver>();

    let last = repo
        .first_or_default(None, &[Sort::desc(DriverField::FirstName)])
        .unwrap()
        .unwrap();
    assert_eq!(last.first_name, "Eve");

    let none = Predicate::eq(DriverField::Email, "nobody@x.com");
    assert_eq!(repo.first_or_default(Some(&none), &[]).unwrap(), None);
}

#[test]
fn unknown_field_is_rejected_before_sql() {
    let mut uow = seeded();
    let repo = uow.repository::<Driver>();

    let bad_filter = Predicate::eq("Nickname; DROP TABLE Driver", "x");
    let err = repo.get_all(Some(&bad_filter), &[], None, None).unwrap_err();
    assert!(matches!(err, RepoError::UnknownField { .. }));

    let err = repo.get_all(None, &[Sort::asc("Age")], None, None).unwrap_err();
    assert!(matches!(err, RepoError::UnknownField { entity: "Driver", .. }));
    assert_eq!(repo.count(None).unwrap(), 5);
}
