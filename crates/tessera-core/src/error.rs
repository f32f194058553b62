//! Error types for the Tessera system.
//!
//! One variant per failure kind, each with a stable message, so that
//! callers can tell "log in again" apart from "provide a reason" apart
//! from "this task was already decided". All failures are raised at the
//! point of violation, before any state is written.

use thiserror::Error;
use uuid::Uuid;

use crate::models::workflow::TaskStatus;

#[derive(Debug, Error)]
pub enum TesseraError {
    #[error("actor not found: {id}")]
    ActorNotFound { id: Uuid },

    #[error("actor is inactive: {id}")]
    ActorInactive { id: Uuid },

    #[error("session not found: {id}")]
    SessionNotFound { id: Uuid },

    #[error("session has been revoked: {id}")]
    SessionRevoked { id: Uuid },

    #[error("session has expired: {id}")]
    SessionExpired { id: Uuid },

    #[error("tenant mismatch: session belongs to {actual}, but {required} was required")]
    TenantMismatch { required: Uuid, actual: Uuid },

    #[error("no active identity context; establish a session before tenant-scoped operations")]
    NoActiveContext,

    #[error("workflow definition not found or has no steps: {id}")]
    DefinitionNotFound { id: String },

    #[error("task not found: {id}")]
    TaskNotFound { id: Uuid },

    #[error("task is not pending: {id} (status: {status:?})")]
    TaskNotPending { id: Uuid, status: TaskStatus },

    #[error("a non-empty justification is required to decide a task")]
    JustificationRequired,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type TesseraResult<T> = Result<T, TesseraError>;
