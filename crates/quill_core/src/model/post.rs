//! Post domain model.
//!
//! # Responsibility
//! - Define the canonical post record, its category enum and validators.
//! - Route every field write through a validating setter.
//!
//! # Invariants
//! - `title` always contains at least one clickbait phrase.
//! - `content`, when set, has at least `CONTENT_MIN_CHARS` characters.
//! - `summary`, when set, has at most `SUMMARY_MAX_CHARS` characters.
//! - `category`, when set, is one of the `Category` variants.
//! - Lengths are counted in characters, not bytes.

use crate::model::validation::{
    char_len, ValidationError, FIELD_CATEGORY, FIELD_CONTENT, FIELD_SUMMARY, FIELD_TITLE,
};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned post identity.
pub type PostId = i64;

pub const CONTENT_MIN_CHARS: usize = 250;
pub const SUMMARY_MAX_CHARS: usize = 250;

/// Phrases a title must contain at least one of. Matching is case-sensitive.
pub const CLICKBAIT_PHRASES: [&str; 4] = ["Won't Believe", "Secret", "Top", "Guess"];

/// Fixed post category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Fiction,
    NonFiction,
}

impl Category {
    /// Returns the stored/display spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-Fiction",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        validate_category(value)
    }
}

/// Construction input for a new post.
///
/// `category` stays a raw string so the constructor is the single place
/// that validates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub category: Option<String>,
}

/// Blog post record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: Option<PostId>,
    title: String,
    content: Option<String>,
    summary: Option<String>,
    category: Option<Category>,
    created_at: Option<i64>,
    updated_at: Option<i64>,
}

impl Post {
    /// Creates an unsaved post.
    ///
    /// Validates title, content, summary and category in that order and
    /// returns the first failure.
    pub fn new(input: NewPost) -> Result<Self, ValidationError> {
        validate_clickbait(&input.title)?;
        if let Some(content) = input.content.as_deref() {
            validate_content(content)?;
        }
        if let Some(summary) = input.summary.as_deref() {
            validate_summary(summary)?;
        }
        let category = input
            .category
            .as_deref()
            .map(validate_category)
            .transpose()?;

        Ok(Self {
            id: None,
            title: input.title,
            content: input.content,
            summary: input.summary,
            category,
            created_at: None,
            updated_at: None,
        })
    }

    /// Rebuilds a persisted post, re-running validators on stored values.
    pub(crate) fn from_storage(
        id: PostId,
        input: NewPost,
        created_at: i64,
        updated_at: i64,
    ) -> Result<Self, ValidationError> {
        let mut post = Self::new(input)?;
        post.id = Some(id);
        post.created_at = Some(created_at);
        post.updated_at = Some(updated_at);
        Ok(post)
    }

    pub fn id(&self) -> Option<PostId> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.updated_at
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        let title = title.into();
        validate_clickbait(&title)?;
        self.title = title;
        Ok(())
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> Result<(), ValidationError> {
        let content = content.into();
        validate_content(&content)?;
        self.content = Some(content);
        Ok(())
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) -> Result<(), ValidationError> {
        let summary = summary.into();
        validate_summary(&summary)?;
        self.summary = Some(summary);
        Ok(())
    }

    /// Parses and assigns `category`. On failure the previous value is kept.
    pub fn set_category(&mut self, category: &str) -> Result<(), ValidationError> {
        self.category = Some(validate_category(category)?);
        Ok(())
    }

    /// Re-runs validators on every assigned field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_clickbait(&self.title)?;
        if let Some(content) = self.content.as_deref() {
            validate_content(content)?;
        }
        if let Some(summary) = self.summary.as_deref() {
            validate_summary(summary)?;
        }
        Ok(())
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = self
            .id
            .map_or_else(|| "None".to_string(), |id| id.to_string());
        write!(
            f,
            "Post(id={id}, title={} content={}, summary={})",
            self.title,
            self.content.as_deref().unwrap_or("None"),
            self.summary.as_deref().unwrap_or("None"),
        )
    }
}

pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if char_len(content) < CONTENT_MIN_CHARS {
        return Err(ValidationError::new(
            FIELD_CONTENT,
            "Content is less than 250 characters",
        ));
    }
    Ok(())
}

pub fn validate_summary(summary: &str) -> Result<(), ValidationError> {
    if char_len(summary) > SUMMARY_MAX_CHARS {
        return Err(ValidationError::new(
            FIELD_SUMMARY,
            "Summary is more than 250 characters",
        ));
    }
    Ok(())
}

/// Accepts exactly `Fiction` or `Non-Fiction`.
pub fn validate_category(category: &str) -> Result<Category, ValidationError> {
    match category {
        "Fiction" => Ok(Category::Fiction),
        "Non-Fiction" => Ok(Category::NonFiction),
        _ => Err(ValidationError::new(
            FIELD_CATEGORY,
            "Category should be Fiction or Non-Fiction",
        )),
    }
}

/// Title validator: requires one of `CLICKBAIT_PHRASES` as a substring.
pub fn validate_clickbait(title: &str) -> Result<(), ValidationError> {
    if !CLICKBAIT_PHRASES.iter().any(|phrase| title.contains(phrase)) {
        return Err(ValidationError::new(
            FIELD_TITLE,
            "The title is not clickbait-y enough",
        ));
    }
    Ok(())
}
