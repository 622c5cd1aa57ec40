//! Author domain model.
//!
//! # Responsibility
//! - Define the canonical author record and its field validators.
//! - Route every field write through a validating setter.
//!
//! # Invariants
//! - `name` is never empty.
//! - `phone_number` always contains exactly 10 decimal digits once
//!   non-digit characters are stripped.
//! - `id`, `created_at` and `updated_at` are assigned by storage only.
//! - Name uniqueness needs a storage lookup and is enforced by the author
//!   repository, not here.

use crate::model::validation::{ValidationError, FIELD_NAME, FIELD_PHONE_NUMBER};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Storage-assigned author identity.
pub type AuthorId = i64;

pub const PHONE_NUMBER_DIGITS: usize = 10;

static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("valid digit regex"));

/// Blog author record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    id: Option<AuthorId>,
    name: String,
    /// Kept exactly as entered; see `phone_digits` for the normalized form.
    phone_number: String,
    created_at: Option<i64>,
    updated_at: Option<i64>,
}

impl Author {
    /// Creates an unsaved author after validating every field.
    ///
    /// Validators run in field order and the first failure is returned.
    pub fn new(
        name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let phone_number = phone_number.into();
        validate_name(&name)?;
        validate_phone_number(&phone_number)?;

        Ok(Self {
            id: None,
            name,
            phone_number,
            created_at: None,
            updated_at: None,
        })
    }

    /// Rebuilds a persisted author, re-running validators on stored values.
    pub(crate) fn from_storage(
        id: AuthorId,
        name: String,
        phone_number: String,
        created_at: i64,
        updated_at: i64,
    ) -> Result<Self, ValidationError> {
        let mut author = Self::new(name, phone_number)?;
        author.id = Some(id);
        author.created_at = Some(created_at);
        author.updated_at = Some(updated_at);
        Ok(author)
    }

    pub fn id(&self) -> Option<AuthorId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Returns only the digits of `phone_number`.
    pub fn phone_digits(&self) -> String {
        extract_digits(&self.phone_number)
    }

    /// Epoch milliseconds of creation. `None` until persisted.
    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    /// Epoch milliseconds of the last persisted write. `None` until persisted.
    pub fn updated_at(&self) -> Option<i64> {
        self.updated_at
    }

    /// Replaces `name`. On failure the previous name is kept.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Replaces `phone_number`. On failure the previous number is kept.
    pub fn set_phone_number(
        &mut self,
        phone_number: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let phone_number = phone_number.into();
        validate_phone_number(&phone_number)?;
        self.phone_number = phone_number;
        Ok(())
    }

    /// Re-runs every local field validator.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_phone_number(&self.phone_number)
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Author(id={id}, name={})", self.name),
            None => write!(f, "Author(id=None, name={})", self.name),
        }
    }
}

/// Rejects an empty name.
///
/// Whitespace-only names are accepted.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new(FIELD_NAME, "Name must be entered"));
    }
    Ok(())
}

/// Requires exactly ten decimal digits once every other character is dropped.
///
/// A digit is a Unicode decimal digit (general category `Nd`), so ASCII and
/// e.g. Arabic-Indic digits count. Characters that only carry a digit value,
/// such as superscripts (`²`) or circled numbers (`①`), are not counted and
/// are dropped like punctuation.
pub fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    let digit_count = DIGIT_RE.find_iter(phone_number).count();
    if digit_count != PHONE_NUMBER_DIGITS {
        return Err(ValidationError::new(
            FIELD_PHONE_NUMBER,
            "Phone number must be 10 digits",
        ));
    }
    Ok(())
}

fn extract_digits(value: &str) -> String {
    DIGIT_RE
        .find_iter(value)
        .map(|digit| digit.as_str())
        .collect()
}
