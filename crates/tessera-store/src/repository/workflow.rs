//! In-memory implementation of [`WorkflowStore`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tessera_core::TesseraResult;
use tessera_core::models::workflow::{StepTask, TaskStatus, WorkflowInstance};
use tessera_core::repository::{AnyRole, RoleVisibility, WorkflowStore};
use uuid::Uuid;

use super::lock_poisoned;

/// Keyed maps for instances and tasks, plus the role-visibility seam
/// used by the pending-task query. Cheap-to-clone handle; clones share
/// state. Lock order where both maps are held: instances, then tasks.
#[derive(Clone)]
pub struct MemWorkflowStore {
    instances: Arc<RwLock<HashMap<Uuid, WorkflowInstance>>>,
    tasks: Arc<RwLock<HashMap<Uuid, StepTask>>>,
    roles: Arc<dyn RoleVisibility>,
}

impl MemWorkflowStore {
    pub fn new() -> Self {
        Self::with_role_visibility(Arc::new(AnyRole))
    }

    pub fn with_role_visibility(roles: Arc<dyn RoleVisibility>) -> Self {
        Self {
            instances: Arc::new(RwLock::new(HashMap::new())),
            tasks: Arc::new(RwLock::new(HashMap::new())),
            roles,
        }
    }

    /// Seed an instance record directly, bypassing the engine.
    pub fn insert_instance(&self, instance: WorkflowInstance) -> TesseraResult<()> {
        self.instances
            .write()
            .map_err(lock_poisoned)?
            .insert(instance.id, instance);
        Ok(())
    }

    /// Seed a task record directly, bypassing the engine.
    pub fn insert_task(&self, task: StepTask) -> TesseraResult<()> {
        self.tasks
            .write()
            .map_err(lock_poisoned)?
            .insert(task.id, task);
        Ok(())
    }
}

impl Default for MemWorkflowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowStore for MemWorkflowStore {
    async fn get_instance(&self, id: Uuid) -> TesseraResult<Option<WorkflowInstance>> {
        Ok(self
            .instances
            .read()
            .map_err(lock_poisoned)?
            .get(&id)
            .cloned())
    }

    async fn get_instances(&self, tenant_id: Uuid) -> TesseraResult<Vec<WorkflowInstance>> {
        let instances = self.instances.read().map_err(lock_poisoned)?;
        let mut out: Vec<WorkflowInstance> = instances
            .values()
            .filter(|i| i.tenant_id == tenant_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }

    async fn get_task(&self, id: Uuid) -> TesseraResult<Option<StepTask>> {
        Ok(self.tasks.read().map_err(lock_poisoned)?.get(&id).cloned())
    }

    async fn get_pending_tasks(
        &self,
        actor_id: Uuid,
        tenant_id: Uuid,
    ) -> TesseraResult<Vec<StepTask>> {
        let instances = self.instances.read().map_err(lock_poisoned)?;
        let tasks = self.tasks.read().map_err(lock_poisoned)?;
        let mut out: Vec<StepTask> = tasks
            .values()
            .filter(|t| t.status == TaskStatus::Pending)
            .filter(|t| {
                instances
                    .get(&t.instance_id)
                    .is_some_and(|i| i.tenant_id == tenant_id)
            })
            .filter(|t| match t.assigned_actor_id {
                Some(assignee) => assignee == actor_id,
                // Unassigned: visible to any actor holding the task's role.
                None => t
                    .assigned_role
                    .as_deref()
                    .map(|role| self.roles.actor_holds_role(tenant_id, actor_id, role))
                    .unwrap_or(true),
            })
            .cloned()
            .collect();
        out.sort_by_key(|t| t.created_at);
        Ok(out)
    }

    async fn get_tasks_for_instance(&self, instance_id: Uuid) -> TesseraResult<Vec<StepTask>> {
        let tasks = self.tasks.read().map_err(lock_poisoned)?;
        let mut out: Vec<StepTask> = tasks
            .values()
            .filter(|t| t.instance_id == instance_id)
            .cloned()
            .collect();
        out.sort_by_key(|t| t.created_at);
        Ok(out)
    }

    async fn upsert_instance(&self, instance: WorkflowInstance) -> TesseraResult<()> {
        self.insert_instance(instance)
    }

    async fn upsert_task(&self, task: StepTask) -> TesseraResult<()> {
        self.insert_task(task)
    }
}
