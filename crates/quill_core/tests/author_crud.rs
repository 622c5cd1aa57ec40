use quill_core::db::migrations::latest_version;
use quill_core::db::open_db_in_memory;
use quill_core::{Author, AuthorRepository, RepoError, SqliteAuthorRepository};
use rusqlite::{params, Connection};

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    let author = Author::new("Jane", "(555) 123-4567").unwrap();
    let id = repo.create_author(&author).unwrap();

    let loaded = repo.get_author(id).unwrap().unwrap();
    assert_eq!(loaded.id(), Some(id));
    assert_eq!(loaded.name(), "Jane");
    assert_eq!(loaded.phone_number(), "(555) 123-4567");
    assert!(loaded.created_at().is_some());
    assert_eq!(loaded.created_at(), loaded.updated_at());
}

#[test]
fn get_missing_author_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    assert!(repo.get_author(42).unwrap().is_none());
}

#[test]
fn duplicate_name_differing_only_in_case_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    repo.create_author(&Author::new("Jane", "5551234567").unwrap())
        .unwrap();
    let err = repo
        .create_author(&Author::new("jane", "5559876543").unwrap())
        .unwrap_err();

    match err {
        RepoError::Validation(err) => {
            assert_eq!(err.field, "name");
            assert_eq!(err.message, "Name must be unique");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.list_authors().unwrap().len(), 1);
}

#[test]
fn author_may_keep_its_own_name_under_different_case() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    let id = repo
        .create_author(&Author::new("Jane", "5551234567").unwrap())
        .unwrap();
    let mut author = repo.get_author(id).unwrap().unwrap();
    author.set_name("JANE").unwrap();
    repo.update_author(&author).unwrap();

    assert_eq!(repo.get_author(id).unwrap().unwrap().name(), "JANE");
}

#[test]
fn renaming_onto_another_authors_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    repo.create_author(&Author::new("Jane", "5551234567").unwrap())
        .unwrap();
    let id = repo
        .create_author(&Author::new("John", "5559876543").unwrap())
        .unwrap();

    let mut john = repo.get_author(id).unwrap().unwrap();
    john.set_name("jANE").unwrap();
    let err = repo.update_author(&john).unwrap_err();
    assert!(matches!(err, RepoError::Validation(ref v) if v.message == "Name must be unique"));
    assert_eq!(repo.get_author(id).unwrap().unwrap().name(), "John");
}

#[test]
fn validate_name_runs_emptiness_and_uniqueness_checks() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();
    let id = repo
        .create_author(&Author::new("Jane", "5551234567").unwrap())
        .unwrap();

    assert!(matches!(
        repo.validate_name("", None),
        Err(RepoError::Validation(ref v)) if v.message == "Name must be entered"
    ));
    assert!(repo.validate_name("JANE", None).is_err());
    repo.validate_name("JANE", Some(id)).unwrap();
    repo.validate_name("John", None).unwrap();
}

#[test]
fn update_of_unsaved_author_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    let author = Author::new("Jane", "5551234567").unwrap();
    let err = repo.update_author(&author).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn update_of_deleted_author_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    let id = repo
        .create_author(&Author::new("Jane", "5551234567").unwrap())
        .unwrap();
    let author = repo.get_author(id).unwrap().unwrap();
    repo.delete_author(id).unwrap();

    let err = repo.update_author(&author).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "author", id: missing } if missing == id));
}

#[test]
fn update_bumps_updated_at_and_keeps_created_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    let id = repo
        .create_author(&Author::new("Jane", "5551234567").unwrap())
        .unwrap();
    conn.execute(
        "UPDATE authors SET created_at = 1000, updated_at = 1000 WHERE id = ?1;",
        params![id],
    )
    .unwrap();

    let mut author = repo.get_author(id).unwrap().unwrap();
    author.set_phone_number("555-987-6543").unwrap();
    repo.update_author(&author).unwrap();

    let loaded = repo.get_author(id).unwrap().unwrap();
    assert_eq!(loaded.phone_number(), "555-987-6543");
    assert_eq!(loaded.created_at(), Some(1000));
    assert!(loaded.updated_at().unwrap() > 1000);
}

#[test]
fn find_by_name_is_case_insensitive() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    let id = repo
        .create_author(&Author::new("Jane", "5551234567").unwrap())
        .unwrap();

    let found = repo.find_author_by_name("jAnE").unwrap().unwrap();
    assert_eq!(found.id(), Some(id));
    assert!(repo.find_author_by_name("John").unwrap().is_none());
}

#[test]
fn list_is_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    for name in ["Zed", "Amy", "Mia"] {
        repo.create_author(&Author::new(name, "5551234567").unwrap())
            .unwrap();
    }

    let names: Vec<String> = repo
        .list_authors()
        .unwrap()
        .iter()
        .map(|author| author.name().to_string())
        .collect();
    assert_eq!(names, vec!["Zed", "Amy", "Mia"]);
}

#[test]
fn delete_removes_row_and_second_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    let id = repo
        .create_author(&Author::new("Jane", "5551234567").unwrap())
        .unwrap();
    repo.delete_author(id).unwrap();

    assert!(repo.get_author(id).unwrap().is_none());
    assert!(matches!(
        repo.delete_author(id),
        Err(RepoError::NotFound { .. })
    ));
}

#[test]
fn deleted_name_becomes_available_again() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    let id = repo
        .create_author(&Author::new("Jane", "5551234567").unwrap())
        .unwrap();
    repo.delete_author(id).unwrap();

    repo.create_author(&Author::new("jane", "5551234567").unwrap())
        .unwrap();
}

#[test]
fn invalid_persisted_row_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    conn.execute(
        "INSERT INTO authors (name, phone_number) VALUES ('Broken', '123');",
        [],
    )
    .unwrap();
    let id = conn.last_insert_rowid();

    assert!(matches!(
        repo.get_author(id),
        Err(RepoError::InvalidData(_))
    ));
    assert!(matches!(repo.list_authors(), Err(RepoError::InvalidData(_))));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteAuthorRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_authors_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteAuthorRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("authors"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE authors (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteAuthorRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "authors",
            column: "phone_number"
        })
    ));
}

#[test]
fn update_soon_after_create_still_advances_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuthorRepository::try_new(&conn).unwrap();

    let id = repo
        .create_author(&Author::new("Jane", "5551234567").unwrap())
        .unwrap();
    let mut author = repo.get_author(id).unwrap().unwrap();
    std::thread::sleep(std::time::Duration::from_millis(20));
    author.set_phone_number("555-987-6543").unwrap();
    repo.update_author(&author).unwrap();

    let loaded = repo.get_author(id).unwrap().unwrap();
    assert_eq!(loaded.created_at(), author.created_at());
    assert!(loaded.updated_at().unwrap() > loaded.created_at().unwrap());
}
