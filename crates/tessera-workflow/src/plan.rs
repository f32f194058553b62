//! Step plans — the pluggable workflow-definition seam.
//!
//! The engine's contract with a definition is deliberately narrow: what
//! is the first step, and what (if anything) follows the current one.
//! Branching, fan-out, and gate evaluation belong to a richer definition
//! layer behind this same trait.

use std::collections::HashMap;

use tessera_core::models::workflow::StepType;
use uuid::Uuid;

/// One step as described by a workflow definition. Tasks created for the
/// step inherit its type, role, and assignee.
#[derive(Debug, Clone)]
pub struct PlannedStep {
    pub step_id: String,
    pub step_type: StepType,
    pub assigned_role: Option<String>,
    /// Pre-assigned actor; absent leaves the task open to the role.
    pub assigned_actor_id: Option<Uuid>,
}

impl PlannedStep {
    /// A human-approval step open to any holder of `role`.
    pub fn approval(step_id: impl Into<String>, role: Option<String>) -> Self {
        Self {
            step_id: step_id.into(),
            step_type: StepType::HumanApproval,
            assigned_role: role,
            assigned_actor_id: None,
        }
    }

    /// A system-wait step; the owning instance derives to `Waiting`
    /// while its task is pending.
    pub fn system_wait(step_id: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            step_type: StepType::SystemWait,
            assigned_role: None,
            assigned_actor_id: None,
        }
    }
}

pub trait StepPlan: Send + Sync {
    /// The entry step of a definition, if the definition is known and
    /// non-empty.
    fn first_step(&self, definition_id: &str) -> Option<PlannedStep>;

    /// The step after `current_step_id`, or `None` when the plan is
    /// exhausted.
    fn step_after(&self, definition_id: &str, current_step_id: &str) -> Option<PlannedStep>;
}

/// An ordered step list per definition id — sufficient for linear
/// approval chains.
#[derive(Debug, Clone, Default)]
pub struct LinearPlan {
    definitions: HashMap<String, Vec<PlannedStep>>,
}

impl LinearPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definition(
        mut self,
        definition_id: impl Into<String>,
        steps: Vec<PlannedStep>,
    ) -> Self {
        self.definitions.insert(definition_id.into(), steps);
        self
    }
}

impl StepPlan for LinearPlan {
    fn first_step(&self, definition_id: &str) -> Option<PlannedStep> {
        self.definitions
            .get(definition_id)
            .and_then(|steps| steps.first())
            .cloned()
    }

    fn step_after(&self, definition_id: &str, current_step_id: &str) -> Option<PlannedStep> {
        let steps = self.definitions.get(definition_id)?;
        let idx = steps.iter().position(|s| s.step_id == current_step_id)?;
        steps.get(idx + 1).cloned()
    }
}
