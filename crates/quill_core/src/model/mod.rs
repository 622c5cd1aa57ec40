//! Domain model for blog authors and posts.
//!
//! # Responsibility
//! - Define canonical record types and their per-field validators.
//! - Keep every field write behind a validating setter.
//!
//! # Invariants
//! - A record value that exists in memory has passed every local validator.
//! - Identity and timestamps are assigned by storage, never by callers.

pub mod author;
pub mod post;
pub mod validation;
