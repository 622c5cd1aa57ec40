//! Field validation error shared by all record types.
//!
//! # Responsibility
//! - Carry the single "invalid field value" failure kind.
//! - Expose field-name constants so callers can match on the failing field.
//!
//! # Invariants
//! - `message` is human-readable and never includes the rejected value.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub const FIELD_NAME: &str = "name";
pub const FIELD_PHONE_NUMBER: &str = "phone_number";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_CONTENT: &str = "content";
pub const FIELD_SUMMARY: &str = "summary";
pub const FIELD_CATEGORY: &str = "category";

/// Rejected field assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the field whose validator failed.
    pub field: &'static str,
    /// Human-readable failure message.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ValidationError {}

/// Counts Unicode scalar values, which is what length limits are defined over.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
