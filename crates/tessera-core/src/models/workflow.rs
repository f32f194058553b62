//! Workflow runtime domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Instance lifecycle. `Running ⇄ Waiting → {Completed, Failed}`;
/// terminal statuses are absorbing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InstanceStatus {
    Running,
    Waiting,
    Completed,
    Failed,
}

impl InstanceStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, InstanceStatus::Completed | InstanceStatus::Failed)
    }
}

/// Task lifecycle. `Pending → {Completed, Rejected}`; both terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Completed,
    Rejected,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StepType {
    HumanApproval,
    SystemWait,
}

/// The decision value attached to a terminal task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// The immutable outcome embedded in a completed or rejected task.
///
/// `justification` is always non-empty — there is no silent approval path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecisionRecord {
    pub decision: Decision,
    pub justification: String,
    pub actor_id: Uuid,
    pub decided_at: DateTime<Utc>,
}

/// One running or completed execution of a workflow definition.
///
/// `updated_at` is monotonically non-decreasing and is bumped on every
/// engine re-evaluation, even when the status did not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub id: Uuid,
    pub definition_id: String,
    pub definition_version: String,
    pub status: InstanceStatus,
    pub current_step_id: String,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tenant_id: Uuid,
    /// Actor that started the instance, if known.
    pub owner_actor_id: Option<Uuid>,
}

/// One actionable unit within an instance, normally a human-approval
/// checkpoint.
///
/// `decision` is populated if and only if `status` is terminal; a task
/// that reached `Completed` or `Rejected` is never mutated again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepTask {
    pub id: Uuid,
    pub instance_id: Uuid,
    pub step_id: String,
    pub step_type: StepType,
    pub status: TaskStatus,
    pub assigned_role: Option<String>,
    /// Absent means the task is open to any actor holding the role.
    pub assigned_actor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub decision: Option<DecisionRecord>,
    /// Snapshot of relevant data captured at creation, immutable after.
    pub context_snapshot: Option<serde_json::Value>,
}
