//! Repository trait definitions for data access abstraction.
//!
//! The stores behind these traits are passive keyed maps: they enforce no
//! state-machine rules and never reject a well-formed write. All lifecycle
//! rules live in the services (`tessera-identity`, `tessera-workflow`).
//! Operations are async so that a durable adapter can implement the same
//! seams; the in-memory implementations never suspend.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::TesseraResult;
use crate::models::{
    actor::{Actor, CreateActor},
    audit::{AuditEntry, CreateAuditEntry},
    session::{CreateSession, Session},
    workflow::{StepTask, WorkflowInstance},
};

pub trait ActorRepository: Send + Sync {
    /// Allocate a fresh id and store a new active actor.
    ///
    /// No uniqueness constraint is enforced on display name or contact;
    /// callers de-duplicate if they care. No delete exists — deactivation
    /// is a future extension point.
    fn create(&self, input: CreateActor) -> impl Future<Output = TesseraResult<Actor>> + Send;

    /// Pure lookup, no side effects.
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TesseraResult<Option<Actor>>> + Send;
}

pub trait SessionRepository: Send + Sync {
    /// Allocate a fresh id and store a new session. The issuance and
    /// expiry timestamps are computed by the registry, not the store.
    fn create(&self, input: CreateSession) -> impl Future<Output = TesseraResult<Session>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TesseraResult<Option<Session>>> + Send;

    /// Set `revoked_at = at` if the session exists and is not already
    /// revoked. Revoking a missing or already-revoked session is a no-op,
    /// not an error.
    fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> impl Future<Output = TesseraResult<()>> + Send;
}

/// Keyed store for workflow instances and their step tasks.
///
/// Reads are always tenant- or id-scoped; the two upserts overwrite
/// unconditionally by id. The sole mutation path for callers outside the
/// engine is `WorkflowEngine::complete_human_task` — UIs consume only the
/// read side of this trait.
pub trait WorkflowStore: Send + Sync {
    fn get_instance(
        &self,
        id: Uuid,
    ) -> impl Future<Output = TesseraResult<Option<WorkflowInstance>>> + Send;

    /// Instances in the tenant, most recently touched first.
    fn get_instances(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = TesseraResult<Vec<WorkflowInstance>>> + Send;

    fn get_task(&self, id: Uuid) -> impl Future<Output = TesseraResult<Option<StepTask>>> + Send;

    /// Pending tasks visible to `actor_id` within `tenant_id`: assigned to
    /// the actor, or unassigned and passing the [`RoleVisibility`] check.
    fn get_pending_tasks(
        &self,
        actor_id: Uuid,
        tenant_id: Uuid,
    ) -> impl Future<Output = TesseraResult<Vec<StepTask>>> + Send;

    /// Tasks of one instance, ordered by creation time ascending.
    fn get_tasks_for_instance(
        &self,
        instance_id: Uuid,
    ) -> impl Future<Output = TesseraResult<Vec<StepTask>>> + Send;

    fn upsert_instance(
        &self,
        instance: WorkflowInstance,
    ) -> impl Future<Output = TesseraResult<()>> + Send;

    fn upsert_task(&self, task: StepTask) -> impl Future<Output = TesseraResult<()>> + Send;
}

/// Append-only decision journal. No update or delete operations exist.
pub trait AuditLog: Send + Sync {
    fn append(
        &self,
        input: CreateAuditEntry,
    ) -> impl Future<Output = TesseraResult<AuditEntry>> + Send;

    /// Entries for one tenant, oldest first.
    fn entries_for_tenant(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = TesseraResult<Vec<AuditEntry>>> + Send;
}

/// Extension point for role-based task visibility.
///
/// An unassigned task names a role via `assigned_role`; whether a given
/// actor holds that role is answered here. The shipped [`AnyRole`] treats
/// every role as held, which makes unassigned tasks visible to any actor
/// in the tenant.
pub trait RoleVisibility: Send + Sync {
    fn actor_holds_role(&self, tenant_id: Uuid, actor_id: Uuid, role: &str) -> bool;
}

/// Permissive default: every actor holds every role.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyRole;

impl RoleVisibility for AnyRole {
    fn actor_holds_role(&self, _tenant_id: Uuid, _actor_id: Uuid, _role: &str) -> bool {
        true
    }
}
