//! Author use-case service.
//!
//! # Responsibility
//! - Provide create/rename/re-number/delete entry points for authors.
//! - Return records as read back from storage, timestamps included.
//!
//! # Invariants
//! - A rejected field leaves storage untouched.
//! - Updates go through model setters, so a failed validator never reaches
//!   the repository.

use crate::model::author::{Author, AuthorId};
use crate::model::validation::ValidationError;
use crate::repo::author_repo::AuthorRepository;
use crate::repo::AUTHOR_ENTITY;
use crate::service::{log_outcome, ServiceError, ServiceResult};

/// Use-case service wrapper for author operations.
pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates, persists and reads back a new author.
    pub fn create_author(
        &self,
        name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> ServiceResult<Author> {
        let result = self.insert(name.into(), phone_number.into());
        log_outcome(
            "author_create",
            result.as_ref().ok().and_then(Author::id),
            &result,
        );
        result
    }

    pub fn get_author(&self, id: AuthorId) -> ServiceResult<Option<Author>> {
        Ok(self.repo.get_author(id)?)
    }

    pub fn list_authors(&self) -> ServiceResult<Vec<Author>> {
        Ok(self.repo.list_authors()?)
    }

    /// Replaces an author's name.
    ///
    /// The author may keep its own name under a different case.
    pub fn rename_author(&self, id: AuthorId, name: impl Into<String>) -> ServiceResult<Author> {
        let name = name.into();
        let result = self.modify(id, |author| author.set_name(name));
        log_outcome("author_rename", Some(id), &result);
        result
    }

    /// Replaces an author's phone number.
    pub fn change_phone_number(
        &self,
        id: AuthorId,
        phone_number: impl Into<String>,
    ) -> ServiceResult<Author> {
        let phone_number = phone_number.into();
        let result = self.modify(id, |author| author.set_phone_number(phone_number));
        log_outcome("author_phone_update", Some(id), &result);
        result
    }

    pub fn delete_author(&self, id: AuthorId) -> ServiceResult<()> {
        let result = self.repo.delete_author(id).map_err(ServiceError::from);
        log_outcome("author_delete", Some(id), &result);
        result
    }

    fn insert(&self, name: String, phone_number: String) -> ServiceResult<Author> {
        let author = Author::new(name, phone_number)?;
        let id = self.repo.create_author(&author)?;
        self.read_back(id, "author missing after create")
    }

    fn modify(
        &self,
        id: AuthorId,
        apply: impl FnOnce(&mut Author) -> Result<(), ValidationError>,
    ) -> ServiceResult<Author> {
        let mut author = self
            .repo
            .get_author(id)?
            .ok_or(ServiceError::NotFound {
                entity: AUTHOR_ENTITY,
                id,
            })?;
        apply(&mut author)?;
        self.repo.update_author(&author)?;
        self.read_back(id, "author missing after update")
    }

    fn read_back(&self, id: AuthorId, details: &'static str) -> ServiceResult<Author> {
        self.repo
            .get_author(id)?
            .ok_or(ServiceError::InconsistentState(details))
    }
}
