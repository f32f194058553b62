//! Actor domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of principal an actor represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActorKind {
    HumanUser,
    ServiceAccount,
    System,
}

/// A principal capable of acting: holding sessions, being assigned work,
/// deciding tasks.
///
/// An actor belongs to exactly one tenant for its lifetime and is never
/// reassigned. Actors are deactivated rather than deleted so historical
/// session and task references stay resolvable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub kind: ActorKind,
    pub display_name: String,
    /// Contact identifier (e.g. an email address), if any.
    pub contact: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActor {
    pub tenant_id: Uuid,
    pub kind: ActorKind,
    pub display_name: String,
    pub contact: Option<String>,
}
