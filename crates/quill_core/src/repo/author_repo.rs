//! Author repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `authors` table.
//! - Own the case-insensitive name uniqueness rule, which needs storage.
//!
//! # Invariants
//! - Write paths call `Author::validate()` and `validate_name()` before SQL
//!   mutations.
//! - The `UNIQUE COLLATE NOCASE` constraint on `authors.name` backs the
//!   pre-check; a violation surfaces as the same validation error.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::model::author::{self, Author, AuthorId};
use crate::model::validation::{ValidationError, FIELD_NAME};
use crate::repo::{ensure_table_ready, RepoError, RepoResult, AUTHOR_ENTITY};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};

const AUTHOR_COLUMNS: &[&str] = &["id", "name", "phone_number", "created_at", "updated_at"];

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    name,
    phone_number,
    created_at,
    updated_at
FROM authors";

/// Repository interface for author CRUD operations.
pub trait AuthorRepository {
    /// Inserts a new author and returns the storage-assigned id.
    fn create_author(&self, author: &Author) -> RepoResult<AuthorId>;
    /// Rewrites `name`/`phone_number` of a persisted author and stamps
    /// `updated_at` with the current epoch milliseconds.
    fn update_author(&self, author: &Author) -> RepoResult<()>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    /// Case-insensitive exact name lookup.
    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>>;
    /// Lists all authors ordered by id.
    fn list_authors(&self) -> RepoResult<Vec<Author>>;
    fn delete_author(&self, id: AuthorId) -> RepoResult<()>;
    /// Runs the full name rule: non-empty and not held by another author.
    ///
    /// `current_id` is the author being written, so it may keep its own name.
    fn validate_name(&self, name: &str, current_id: Option<AuthorId>) -> RepoResult<()>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "authors", AUTHOR_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, author: &Author) -> RepoResult<AuthorId> {
        author.validate()?;
        self.validate_name(author.name(), None)?;

        self.conn
            .execute(
                "INSERT INTO authors (name, phone_number) VALUES (?1, ?2);",
                params![author.name(), author.phone_number()],
            )
            .map_err(map_name_conflict)?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_author(&self, author: &Author) -> RepoResult<()> {
        let id = author.id().ok_or_else(|| {
            RepoError::InvalidData("cannot update an author that was never persisted".to_string())
        })?;
        author.validate()?;
        self.validate_name(author.name(), Some(id))?;

        let changed = self
            .conn
            .execute(
                "UPDATE authors
                 SET
                    name = ?1,
                    phone_number = ?2,
                    updated_at = (CAST(unixepoch('subsec') * 1000 AS INTEGER))
                 WHERE id = ?3;",
                params![author.name(), author.phone_number(), id],
            )
            .map_err(map_name_conflict)?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: AUTHOR_ENTITY,
                id,
            });
        }

        Ok(())
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_author_row(row)?));
        }

        Ok(None)
    }

    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        let mut stmt = self.conn.prepare(&format!(
            "{AUTHOR_SELECT_SQL} WHERE name = ?1 COLLATE NOCASE LIMIT 1;"
        ))?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_author_row(row)?));
        }

        Ok(None)
    }

    fn list_authors(&self) -> RepoResult<Vec<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }

        Ok(authors)
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM authors WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: AUTHOR_ENTITY,
                id,
            });
        }

        Ok(())
    }

    fn validate_name(&self, name: &str, current_id: Option<AuthorId>) -> RepoResult<()> {
        author::validate_name(name)?;

        // Only the id is needed, and a full row parse would fail on rows
        // that no longer validate.
        let holder: Option<AuthorId> = self
            .conn
            .query_row(
                "SELECT id FROM authors WHERE name = ?1 COLLATE NOCASE LIMIT 1;",
                [name],
                |row| row.get(0),
            )
            .optional()?;

        match holder {
            Some(holder_id) if Some(holder_id) != current_id => Err(name_taken().into()),
            _ => Ok(()),
        }
    }
}

fn name_taken() -> ValidationError {
    ValidationError::new(FIELD_NAME, "Name must be unique")
}

fn map_name_conflict(err: rusqlite::Error) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::Validation(name_taken())
        }
        _ => err.into(),
    }
}

fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    let id: AuthorId = row.get("id")?;
    Author::from_storage(
        id,
        row.get("name")?,
        row.get("phone_number")?,
        row.get("created_at")?,
        row.get("updated_at")?,
    )
    .map_err(|err| RepoError::InvalidData(format!("authors row {id}: {err}")))
}
