//! Workflow engine — task completion and instance re-evaluation.

use chrono::{DateTime, Utc};
use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::models::audit::CreateAuditEntry;
use tessera_core::models::workflow::{
    Decision, DecisionRecord, InstanceStatus, StepTask, StepType, TaskStatus, WorkflowInstance,
};
use tessera_core::repository::{AuditLog, WorkflowStore};
use tessera_core::time::{Clock, SystemClock};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::plan::{PlannedStep, StepPlan};

/// Input for starting a workflow instance.
#[derive(Debug, Clone)]
pub struct StartInstance {
    pub definition_id: String,
    pub definition_version: String,
    pub tenant_id: Uuid,
    pub owner_actor_id: Option<Uuid>,
    /// Captured once at intake and carried forward to every task the
    /// instance creates.
    pub context_snapshot: Option<serde_json::Value>,
}

/// Advances tasks from pending to a terminal decision and keeps the
/// owning instance derived from task state.
///
/// Generic over the store and journal implementations. The transition
/// mutex serializes task transitions: two concurrent decision attempts
/// on the same task cannot both pass the pending check.
pub struct WorkflowEngine<W: WorkflowStore, J: AuditLog> {
    store: W,
    journal: J,
    plan: Box<dyn StepPlan>,
    clock: Box<dyn Clock>,
    transition_lock: Mutex<()>,
}

impl<W: WorkflowStore, J: AuditLog> WorkflowEngine<W, J> {
    pub fn new(store: W, journal: J, plan: Box<dyn StepPlan>) -> Self {
        Self::with_clock(store, journal, plan, Box::new(SystemClock))
    }

    pub fn with_clock(
        store: W,
        journal: J,
        plan: Box<dyn StepPlan>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            store,
            journal,
            plan,
            clock,
            transition_lock: Mutex::new(()),
        }
    }

    /// Start an instance at its definition's first step, with one
    /// pending task for that step.
    pub async fn start_instance(
        &self,
        input: StartInstance,
    ) -> TesseraResult<(WorkflowInstance, StepTask)> {
        let first = self.plan.first_step(&input.definition_id).ok_or_else(|| {
            TesseraError::DefinitionNotFound {
                id: input.definition_id.clone(),
            }
        })?;

        let now = self.clock.now();
        let instance = WorkflowInstance {
            id: Uuid::new_v4(),
            definition_id: input.definition_id,
            definition_version: input.definition_version,
            status: status_for_step(first.step_type),
            current_step_id: first.step_id.clone(),
            started_at: now,
            updated_at: now,
            tenant_id: input.tenant_id,
            owner_actor_id: input.owner_actor_id,
        };
        let task = new_task(&instance, &first, input.context_snapshot, now);

        self.store.upsert_instance(instance.clone()).await?;
        self.store.upsert_task(task.clone()).await?;

        info!(
            instance_id = %instance.id,
            definition_id = %instance.definition_id,
            tenant_id = %instance.tenant_id,
            step_id = %instance.current_step_id,
            "workflow instance started"
        );
        Ok((instance, task))
    }

    /// Decide a pending task and re-evaluate its instance.
    ///
    /// Preconditions are checked before any state is written; a failed
    /// call leaves both the task and the instance untouched.
    pub async fn complete_human_task(
        &self,
        task_id: Uuid,
        decision: Decision,
        justification: &str,
        actor_id: Uuid,
    ) -> TesseraResult<StepTask> {
        let _guard = self.transition_lock.lock().await;

        // 1. The task must exist.
        let mut task = self
            .store
            .get_task(task_id)
            .await?
            .ok_or(TesseraError::TaskNotFound { id: task_id })?;

        // 2. A task is decided exactly once.
        if task.status != TaskStatus::Pending {
            return Err(TesseraError::TaskNotPending {
                id: task_id,
                status: task.status,
            });
        }

        // 3. No silent approvals — enforced here, not in the UI.
        if justification.trim().is_empty() {
            return Err(TesseraError::JustificationRequired);
        }

        // 4. Terminal transition with its decision record.
        let now = self.clock.now();
        task.status = match decision {
            Decision::Approve => TaskStatus::Completed,
            Decision::Reject => TaskStatus::Rejected,
        };
        task.completed_at = Some(now);
        task.decision = Some(DecisionRecord {
            decision,
            justification: justification.to_string(),
            actor_id,
            decided_at: now,
        });

        // 5. Persist the task.
        self.store.upsert_task(task.clone()).await?;

        let instance = self
            .store
            .get_instance(task.instance_id)
            .await?
            .ok_or_else(|| {
                TesseraError::Internal(format!(
                    "instance {} missing for task {}",
                    task.instance_id, task.id
                ))
            })?;

        self.journal
            .append(CreateAuditEntry {
                tenant_id: instance.tenant_id,
                actor_id,
                action: match decision {
                    Decision::Approve => "workflow.task.approved".to_string(),
                    Decision::Reject => "workflow.task.rejected".to_string(),
                },
                resource_id: Some(task.id),
                metadata: serde_json::json!({
                    "instance_id": task.instance_id,
                    "step_id": task.step_id,
                    "justification": justification,
                }),
                recorded_at: now,
            })
            .await?;

        // 6. Re-derive the instance from task state.
        self.reevaluate_instance(instance, &task, decision, now)
            .await?;

        info!(
            task_id = %task.id,
            instance_id = %task.instance_id,
            actor_id = %actor_id,
            decision = ?decision,
            "task decided"
        );
        Ok(task)
    }

    /// Instances in the tenant, most recently touched first.
    pub async fn instances(&self, tenant_id: Uuid) -> TesseraResult<Vec<WorkflowInstance>> {
        self.store.get_instances(tenant_id).await
    }

    /// Pending tasks visible to an actor within a tenant.
    pub async fn pending_tasks(
        &self,
        actor_id: Uuid,
        tenant_id: Uuid,
    ) -> TesseraResult<Vec<StepTask>> {
        self.store.get_pending_tasks(actor_id, tenant_id).await
    }

    /// All tasks of one instance, oldest first.
    pub async fn tasks_for_instance(&self, instance_id: Uuid) -> TesseraResult<Vec<StepTask>> {
        self.store.get_tasks_for_instance(instance_id).await
    }

    /// Re-derive instance status after a task transition, and write the
    /// instance back with a bumped `updated_at` even when the status did
    /// not change, so polling consumers can detect the write.
    async fn reevaluate_instance(
        &self,
        mut instance: WorkflowInstance,
        decided: &StepTask,
        decision: Decision,
        now: DateTime<Utc>,
    ) -> TesseraResult<()> {
        if instance.status.is_terminal() {
            // Terminal statuses are absorbing; the late decision is kept
            // on the task but cannot move the instance.
            warn!(
                instance_id = %instance.id,
                status = ?instance.status,
                task_id = %decided.id,
                "task decided on a terminal instance"
            );
        } else {
            match decision {
                Decision::Reject => {
                    instance.status = InstanceStatus::Failed;
                }
                Decision::Approve => {
                    let open_on_step = self
                        .store
                        .get_tasks_for_instance(instance.id)
                        .await?
                        .into_iter()
                        .filter(|t| {
                            t.step_id == instance.current_step_id
                                && t.status == TaskStatus::Pending
                        })
                        .count();

                    if open_on_step == 0 {
                        match self
                            .plan
                            .step_after(&instance.definition_id, &instance.current_step_id)
                        {
                            Some(next) => {
                                let next_task =
                                    new_task(&instance, &next, decided.context_snapshot.clone(), now);
                                self.store.upsert_task(next_task).await?;
                                instance.current_step_id = next.step_id;
                                instance.status = status_for_step(next.step_type);
                            }
                            None => {
                                instance.status = InstanceStatus::Completed;
                            }
                        }
                    }
                    // Otherwise the current step still owes decisions and
                    // the status stands.
                }
            }
        }

        instance.updated_at = instance.updated_at.max(now);
        self.store.upsert_instance(instance).await
    }
}

fn status_for_step(step_type: StepType) -> InstanceStatus {
    match step_type {
        StepType::SystemWait => InstanceStatus::Waiting,
        StepType::HumanApproval => InstanceStatus::Running,
    }
}

fn new_task(
    instance: &WorkflowInstance,
    step: &PlannedStep,
    context_snapshot: Option<serde_json::Value>,
    now: DateTime<Utc>,
) -> StepTask {
    StepTask {
        id: Uuid::new_v4(),
        instance_id: instance.id,
        step_id: step.step_id.clone(),
        step_type: step.step_type,
        status: TaskStatus::Pending,
        assigned_role: step.assigned_role.clone(),
        assigned_actor_id: step.assigned_actor_id,
        created_at: now,
        completed_at: None,
        decision: None,
        context_snapshot,
    }
}
