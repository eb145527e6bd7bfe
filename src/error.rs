/// Structured error types for the analytics engine.
///
/// Empty inputs are never errors: operations defined as "0 if empty" or
/// "none if empty" return those values directly. Errors are reserved for
/// caller-supplied ids that do not exist, malformed snapshot data, and
/// failures of the SQLite-backed store.
use thiserror::Error;

use crate::entities::EntityId;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A caller asked for an entity id that is not in the snapshot
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: EntityId },

    /// Store data breaks a relational or value invariant
    #[error("invalid {entity} {id}: {reason}")]
    InvariantViolation {
        entity: &'static str,
        id: EntityId,
        reason: String,
    },

    /// A stored column could not be decoded into its typed value
    #[error("cannot decode column '{column}' from {value:?}: {reason}")]
    Decode {
        column: &'static str,
        value: String,
        reason: String,
    },

    /// SQLite store failure
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl AnalyticsError {
    pub fn not_found(entity: &'static str, id: EntityId) -> Self {
        AnalyticsError::NotFound { entity, id }
    }

    pub fn invariant(entity: &'static str, id: EntityId, reason: impl Into<String>) -> Self {
        AnalyticsError::InvariantViolation {
            entity,
            id,
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AnalyticsError::NotFound { .. })
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, AnalyticsError::InvariantViolation { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
