//! Typed errors for the task-allocation engine.
//!
//! Every store operation that can fail for a business reason returns one of
//! these variants, so the HTTP boundary can map each kind to a distinct
//! status code instead of collapsing everything into a 500.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The referenced entity does not exist.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A natural-key collision, currently only department titles.
    #[error("{entity} \"{key}\" already exists")]
    Conflict { entity: &'static str, key: String },

    /// A task can only be allocated to a person in the task's department.
    #[error("person must belong to the task's department")]
    DepartmentMismatch,

    /// The entity is still referenced by other rows and cannot be deleted.
    #[error("{entity} still has people or tasks attached")]
    InUse { entity: &'static str },

    /// Infrastructure fault from the underlying store. Never used for
    /// control flow.
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

impl Error {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn conflict(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Conflict {
            entity,
            key: key.into(),
        }
    }

    pub fn in_use(entity: &'static str) -> Self {
        Self::InUse { entity }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
