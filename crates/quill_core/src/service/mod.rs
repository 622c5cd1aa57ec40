//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Translate repository failures into semantic service errors.
//! - Emit metadata-only outcome logs for every write.
//!
//! # Invariants
//! - Services never bypass repository validation.
//! - Log lines carry ids and field names only, never field values.

use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author_service;
pub mod post_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for author/post use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// A field value was rejected.
    Validation(ValidationError),
    /// Target record does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

pub(crate) fn log_outcome<T>(
    event: &'static str,
    entity_id: Option<i64>,
    result: &ServiceResult<T>,
) {
    let id = entity_id.map_or_else(|| "none".to_string(), |id| id.to_string());
    match result {
        Ok(_) => info!("event={event} module=service status=ok id={id}"),
        Err(ServiceError::Validation(err)) => warn!(
            "event={event} module=service status=rejected id={id} field={}",
            err.field
        ),
        Err(ServiceError::NotFound { entity, .. }) => warn!(
            "event={event} module=service status=not_found id={id} entity={entity}"
        ),
        Err(err) => error!("event={event} module=service status=error id={id} error={err}"),
    }
}
