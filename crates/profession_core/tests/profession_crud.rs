use profession_core::db::migrations::latest_version;
use profession_core::db::{open_db_in_memory, DbError, FileDatabase, SharedConnection};
use profession_core::{
    MemoryProfessionRepository, NewProfession, PageRequest, Profession, ProfessionRepository,
    ProfessionService, RepoError, ServiceError, SqliteProfessionRepository,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn create(repo: &impl ProfessionRepository, name: &str) -> Profession {
    repo.create(&NewProfession::new(name)).unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();

    let created = create(&repo, "Engineer");
    assert!(created.id > 0);
    assert_eq!(created.name, "Engineer");

    let loaded = repo.get_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn get_missing_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();

    assert_eq!(repo.get_by_id(999).unwrap(), None);
}

#[test]
fn list_page_returns_first_two_of_three_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    create(&repo, "Architect");
    create(&repo, "Baker");
    create(&repo, "Chef");

    let page = repo.list_page(0, 2).unwrap();

    let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Architect", "Baker"]);
    assert_eq!(page.pagination.current_page, 1);
    assert_eq!(page.pagination.per_page, 2);
    assert_eq!(page.pagination.total_items, 3);
    assert_eq!(page.pagination.total_pages, 2);
}

#[test]
fn list_page_orders_by_name_regardless_of_insert_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    for name in ["Plumber", "Dentist", "Welder", "Baker", "Nurse", "Farmer", "Judge"] {
        create(&repo, name);
    }

    let mut seen = Vec::new();
    for offset in (0..7).step_by(3) {
        let page = repo.list_page(offset, 3).unwrap();
        assert!(page.items.len() <= 3);
        assert_eq!(page.pagination.current_page, u64::from(offset / 3) + 1);
        assert_eq!(page.pagination.total_pages, 3);
        seen.extend(page.items.into_iter().map(|p| p.name));
    }

    assert_eq!(
        seen,
        ["Baker", "Dentist", "Farmer", "Judge", "Nurse", "Plumber", "Welder"]
    );
}

#[test]
fn list_page_past_the_end_is_empty_but_keeps_totals() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    create(&repo, "Architect");

    let page = repo.list_page(50, 10).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.pagination.current_page, 6);
    assert_eq!(page.pagination.total_items, 1);
    assert_eq!(page.pagination.total_pages, 1);
}

#[test]
fn list_page_on_empty_table_has_zero_pages() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();

    let page = repo.list_page(0, 5).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.pagination.current_page, 1);
    assert_eq!(page.pagination.total_pages, 0);
}

#[test]
fn list_page_rejects_zero_limit() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();

    let err = repo.list_page(0, 0).unwrap_err();
    assert!(matches!(err, RepoError::InvalidPageRequest(_)));
}

#[test]
fn update_existing_profession() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    let created = create(&repo, "Draft");

    let updated = repo
        .update(created.id, &NewProfession::new("Updated Name"))
        .unwrap()
        .unwrap();
    assert_eq!(updated, Profession::new(created.id, "Updated Name"));

    let loaded = repo.get_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Updated Name");
}

#[test]
fn update_missing_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();

    let result = repo.update(999, &NewProfession::new("Updated Name")).unwrap();
    assert_eq!(result, None);
}

#[test]
fn delete_reports_removal() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    let created = create(&repo, "Chef");

    assert!(repo.delete(created.id).unwrap());
    assert!(!repo.delete(created.id).unwrap());
    assert!(!repo.delete(999).unwrap());
    assert_eq!(repo.get_by_id(created.id).unwrap(), None);
}

#[test]
fn exists_by_name_ignores_case() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    create(&repo, "Engineer");

    assert!(repo.exists_by_name("Engineer").unwrap());
    assert!(repo.exists_by_name("ENGINEER").unwrap());
    assert!(repo.exists_by_name("engineer").unwrap());
    assert!(!repo.exists_by_name("Engineers").unwrap());
}

#[test]
fn duplicate_name_in_other_case_fails_as_storage_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    create(&repo, "Engineer");

    let err = repo.create(&NewProfession::new("ENGINEER")).unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));
    assert_eq!(repo.list_page(0, 10).unwrap().pagination.total_items, 1);
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();

    let err = repo.create(&NewProfession::new("   ")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let created = create(&repo, "Baker");
    let err = repo
        .update(created.id, &NewProfession::new("\t\n"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    assert_eq!(repo.get_by_id(created.id).unwrap(), Some(created));
}

#[test]
fn long_names_are_stored_and_listed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    let long_name = format!("Z{}", "e".repeat(149));

    let created = create(&repo, &long_name);
    assert_eq!(created.name.chars().count(), 150);
    assert_eq!(repo.get_by_id(created.id).unwrap(), Some(created));
}

#[test]
fn rows_written_outside_the_repository_are_listed_as_stored() {
    let conn = open_db_in_memory().unwrap();
    let long_name = "x".repeat(150);
    conn.execute(
        "INSERT INTO profession (name) VALUES ('Architect'), (?1);",
        [long_name.as_str()],
    )
    .unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();

    let page = repo.list_page(0, 10).unwrap();
    let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Architect", long_name.as_str()]);
    assert_eq!(page.pagination.total_items, 2);
}

#[test]
fn exists_by_name_folds_non_ascii_case() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    create(&repo, "Ébéniste");

    assert!(repo.exists_by_name("ÉBÉNISTE").unwrap());
    assert!(repo.exists_by_name("ébéniste").unwrap());
    assert!(!repo.exists_by_name("Ebeniste").unwrap());
}

#[test]
fn duplicate_non_ascii_name_in_other_case_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    create(&repo, "Ébéniste");

    let err = repo.create(&NewProfession::new("éBÉNISTE")).unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));

    let service = ProfessionService::new(repo);
    let err = service.create_profession("ÉBÉNISTE").unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateName(_)));
}

/// Drives one repository through a fixed script and records what it saw.
fn run_catalogue_script(repo: &impl ProfessionRepository) -> Vec<String> {
    let long_name = format!("Lexicographer {}", "of Ancient Scripts ".repeat(8));
    let mut transcript = Vec::new();

    let mut ids = Vec::new();
    for name in ["Welder", "Ébéniste", "baker", long_name.as_str(), "Übersetzer", "Chef"] {
        let created = repo.create(&NewProfession::new(name)).unwrap();
        transcript.push(format!("create {} {}", created.id, created.name));
        ids.push(created.id);
    }

    for name in ["ÉBÉNISTE", "BAKER", "übersetzer", "Ebeniste", "Plumber"] {
        transcript.push(format!("exists {name} {}", repo.exists_by_name(name).unwrap()));
    }

    for name in ["CHEF", "ébéniste", "Welder"] {
        let failed = repo.create(&NewProfession::new(name)).is_err();
        transcript.push(format!("duplicate {name} rejected={failed}"));
    }

    let renamed = repo.update(ids[2], &NewProfession::new("Baker")).unwrap();
    transcript.push(format!("rename own case {renamed:?}"));
    let clash = repo.update(ids[0], &NewProfession::new("übersetzer")).is_err();
    transcript.push(format!("rename clash rejected={clash}"));
    let missing = repo.update(999, &NewProfession::new("Ghost")).unwrap();
    transcript.push(format!("rename missing {missing:?}"));

    transcript.push(format!("delete {}", repo.delete(ids[1]).unwrap()));
    transcript.push(format!("delete again {}", repo.delete(ids[1]).unwrap()));
    transcript.push(format!("get deleted {:?}", repo.get_by_id(ids[1]).unwrap()));
    let reused = repo.create(&NewProfession::new("Ébéniste")).unwrap();
    transcript.push(format!("recreate {} {}", reused.id, reused.name));

    for offset in [0, 2, 4, 6] {
        let page = repo.list_page(offset, 2).unwrap();
        transcript.push(format!("page {offset} {page:?}"));
    }

    transcript
}

#[test]
fn sqlite_and_memory_repositories_agree_on_the_same_script() {
    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteProfessionRepository::try_new(&conn).unwrap();
    let memory = MemoryProfessionRepository::new();

    let from_sqlite = run_catalogue_script(&sqlite);
    let from_memory = run_catalogue_script(&memory);

    assert_eq!(from_sqlite, from_memory);
    assert!(from_sqlite.contains(&"exists ÉBÉNISTE true".to_string()));
    assert!(from_sqlite.contains(&"duplicate ébéniste rejected=true".to_string()));
}

#[test]
fn page_envelope_uses_metadata_and_data_keys() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    let chef = create(&repo, "Chef");

    let page = repo.list(&PageRequest::new(0, 5).unwrap()).unwrap();
    let json = serde_json::to_value(page.envelope()).unwrap();

    assert_eq!(json["metadata"]["pagination"]["totalItems"], 1);
    assert_eq!(json["metadata"]["pagination"]["perPage"], 5);
    assert_eq!(json["data"][0]["id"], chef.id);
    assert_eq!(json["data"][0]["name"], "Chef");
}

#[test]
fn service_rejects_duplicates_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfessionRepository::try_new(&conn).unwrap();
    let service = ProfessionService::new(repo);

    let nurse = service.create_profession("Nurse").unwrap();
    let err = service.create_profession("nurse").unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateName(_)));

    let renamed = service.update_profession(nurse.id, "NURSE").unwrap();
    assert_eq!(renamed, Some(Profession::new(nurse.id, "NURSE")));
}

#[test]
fn file_database_keeps_rows_across_calls_and_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("professions.db");

    let created = {
        let repo = SqliteProfessionRepository::try_new(FileDatabase::open(&path).unwrap()).unwrap();
        create(&repo, "Librarian")
    };

    let repo = SqliteProfessionRepository::try_new(FileDatabase::open(&path).unwrap()).unwrap();
    assert_eq!(repo.get_by_id(created.id).unwrap(), Some(created));
    assert!(repo.exists_by_name("LIBRARIAN").unwrap());
}

#[test]
fn shared_connection_serves_concurrent_writers() {
    let repo = SqliteProfessionRepository::try_new(SharedConnection::in_memory().unwrap()).unwrap();

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let repo = &repo;
            scope.spawn(move || {
                for index in 0..5 {
                    create(repo, &format!("Worker {worker} Role {index}"));
                }
            });
        }
    });

    let page = repo.list_page(0, 100).unwrap();
    assert_eq!(page.pagination.total_items, 20);
    let ids: HashSet<_> = page.items.iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 20);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteProfessionRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_profession_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProfessionRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("profession"))
    ));
}

#[test]
fn repository_rejects_connection_missing_name_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE profession (id INTEGER PRIMARY KEY);")
        .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProfessionRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "profession",
            column: "name"
        })
    ));
}
