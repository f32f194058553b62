//! Resolved identity projection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::actor::ActorKind;

/// The validated, flattened output of resolving a session.
///
/// Never persisted — held only for the duration of one unit of work and
/// read by downstream authorization checks as the sole source of
/// "current tenant/actor".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
    pub session_id: Uuid,
    pub actor_kind: ActorKind,
}
