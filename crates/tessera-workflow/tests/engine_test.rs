//! Integration tests for the workflow engine.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use tessera_core::error::TesseraError;
use tessera_core::models::workflow::{
    Decision, InstanceStatus, StepTask, StepType, TaskStatus, WorkflowInstance,
};
use tessera_core::repository::{AuditLog, WorkflowStore};
use tessera_core::time::Clock;
use tessera_store::{MemAuditLog, MemWorkflowStore};
use tessera_workflow::{LinearPlan, PlannedStep, StartInstance, WorkflowEngine};
use uuid::Uuid;

/// Manually advanced clock so instance timestamps are exact.
#[derive(Debug, Clone)]
struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    fn at(start: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(start)))
    }

    fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }

    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        ManualClock::now(self)
    }
}

const EXPENSE: &str = "expense-approval";
const DEPLOYMENT: &str = "deployment";

fn plan() -> LinearPlan {
    LinearPlan::new()
        .with_definition(
            EXPENSE,
            vec![
                PlannedStep::approval("step-initial-review", Some("reviewer".into())),
                PlannedStep::approval("step-manager-approval", Some("manager".into())),
            ],
        )
        .with_definition(
            DEPLOYMENT,
            vec![
                PlannedStep::approval("step-plan-review", None),
                PlannedStep::system_wait("step-deploy-window"),
                PlannedStep::approval("step-verify", None),
            ],
        )
}

fn setup() -> (
    WorkflowEngine<MemWorkflowStore, MemAuditLog>,
    MemWorkflowStore,
    MemAuditLog,
    ManualClock,
) {
    let store = MemWorkflowStore::new();
    let journal = MemAuditLog::new();
    let clock = ManualClock::at(Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap());
    let engine = WorkflowEngine::with_clock(
        store.clone(),
        journal.clone(),
        Box::new(plan()),
        Box::new(clock.clone()),
    );
    (engine, store, journal, clock)
}

async fn started_expense(
    engine: &WorkflowEngine<MemWorkflowStore, MemAuditLog>,
    tenant_id: Uuid,
) -> (WorkflowInstance, StepTask) {
    engine
        .start_instance(StartInstance {
            definition_id: EXPENSE.into(),
            definition_version: "1.0.0".into(),
            tenant_id,
            owner_actor_id: None,
            context_snapshot: Some(serde_json::json!({
                "amount": 50_000,
                "currency": "USD",
            })),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn start_instance_creates_first_pending_task() {
    let (engine, _, _, clock) = setup();
    let tenant_id = Uuid::new_v4();
    let (instance, task) = started_expense(&engine, tenant_id).await;

    assert_eq!(instance.status, InstanceStatus::Running);
    assert_eq!(instance.current_step_id, "step-initial-review");
    assert_eq!(instance.started_at, clock.now());
    assert_eq!(instance.tenant_id, tenant_id);

    assert_eq!(task.instance_id, instance.id);
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.step_type, StepType::HumanApproval);
    assert_eq!(task.assigned_role.as_deref(), Some("reviewer"));
    assert!(task.assigned_actor_id.is_none());
    assert!(task.decision.is_none());
    assert!(task.context_snapshot.is_some());
}

#[tokio::test]
async fn start_instance_unknown_definition_fails() {
    let (engine, _, _, _) = setup();
    let err = engine
        .start_instance(StartInstance {
            definition_id: "no-such-definition".into(),
            definition_version: "1.0.0".into(),
            tenant_id: Uuid::new_v4(),
            owner_actor_id: None,
            context_snapshot: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TesseraError::DefinitionNotFound { .. }));
}

#[tokio::test]
async fn approve_advances_to_the_next_step() {
    let (engine, store, _, clock) = setup();
    let tenant_id = Uuid::new_v4();
    let actor_id = Uuid::new_v4();
    let (instance, task) = started_expense(&engine, tenant_id).await;

    clock.advance(Duration::minutes(5));
    let decided = engine
        .complete_human_task(task.id, Decision::Approve, "Looks good to me.", actor_id)
        .await
        .unwrap();

    assert_eq!(decided.status, TaskStatus::Completed);
    assert_eq!(decided.completed_at, Some(clock.now()));
    let record = decided.decision.unwrap();
    assert_eq!(record.decision, Decision::Approve);
    assert_eq!(record.justification, "Looks good to me.");
    assert_eq!(record.actor_id, actor_id);

    let updated = engine.tasks_for_instance(instance.id).await.unwrap();
    assert_eq!(updated.len(), 2);
    let next = &updated[1];
    assert_eq!(next.step_id, "step-manager-approval");
    assert_eq!(next.status, TaskStatus::Pending);
    assert_eq!(next.assigned_role.as_deref(), Some("manager"));
    // The intake snapshot follows the work to the next decider.
    assert_eq!(next.context_snapshot, task.context_snapshot);

    let instance = store.get_instance(instance.id).await.unwrap().unwrap();
    assert_eq!(instance.status, InstanceStatus::Running);
    assert_eq!(instance.current_step_id, "step-manager-approval");
    assert_eq!(instance.updated_at, clock.now());
}

#[tokio::test]
async fn approving_the_final_step_completes_the_instance() {
    let (engine, store, _, clock) = setup();
    let actor_id = Uuid::new_v4();
    let (instance, first) = started_expense(&engine, Uuid::new_v4()).await;

    engine
        .complete_human_task(first.id, Decision::Approve, "Reviewed.", actor_id)
        .await
        .unwrap();
    let tasks = engine.tasks_for_instance(instance.id).await.unwrap();
    let second = tasks.last().unwrap().clone();

    clock.advance(Duration::minutes(1));
    engine
        .complete_human_task(second.id, Decision::Approve, "Approved for payment.", actor_id)
        .await
        .unwrap();

    let instance = store.get_instance(instance.id).await.unwrap().unwrap();
    assert_eq!(instance.status, InstanceStatus::Completed);
    assert_eq!(instance.updated_at, clock.now());
}

#[tokio::test]
async fn reject_fails_the_instance() {
    let (engine, store, _, _) = setup();
    let (instance, task) = started_expense(&engine, Uuid::new_v4()).await;

    engine
        .complete_human_task(task.id, Decision::Reject, "Amount exceeds budget.", Uuid::new_v4())
        .await
        .unwrap();

    let instance = store.get_instance(instance.id).await.unwrap().unwrap();
    assert_eq!(instance.status, InstanceStatus::Failed);
    // Rejection does not spawn a follow-on task.
    assert_eq!(engine.tasks_for_instance(instance.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn a_task_is_decided_exactly_once() {
    let (engine, _, _, _) = setup();
    let actor_id = Uuid::new_v4();
    let (_, task) = started_expense(&engine, Uuid::new_v4()).await;

    let first = engine
        .complete_human_task(task.id, Decision::Approve, "Looks good to me.", actor_id)
        .await
        .unwrap();

    let err = engine
        .complete_human_task(task.id, Decision::Reject, "Changed my mind.", actor_id)
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            TesseraError::TaskNotPending { id, status: TaskStatus::Completed } if id == task.id
        ),
        "expected TaskNotPending, got: {err:?}"
    );

    // The decision record is the first one, not an overwrite.
    let stored = engine.tasks_for_instance(task.instance_id).await.unwrap();
    let decided = stored.iter().find(|t| t.id == task.id).unwrap();
    assert_eq!(decided.decision, first.decision);
}

#[tokio::test]
async fn blank_justification_is_refused_before_any_write() {
    let (engine, store, journal, _) = setup();
    let tenant_id = Uuid::new_v4();
    let (instance, task) = started_expense(&engine, tenant_id).await;
    let before = store.get_instance(instance.id).await.unwrap().unwrap();

    for justification in ["", "   ", "\t\n"] {
        let err = engine
            .complete_human_task(task.id, Decision::Approve, justification, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, TesseraError::JustificationRequired));
    }

    // Nothing moved: the task is still pending and the instance record
    // was not touched.
    let task = store.get_task(task.id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.decision.is_none());
    let after = store.get_instance(instance.id).await.unwrap().unwrap();
    assert_eq!(after.updated_at, before.updated_at);
    assert!(journal.entries_for_tenant(tenant_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_task_fails() {
    let (engine, _, _, _) = setup();
    let missing = Uuid::new_v4();
    let err = engine
        .complete_human_task(missing, Decision::Approve, "ok", Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, TesseraError::TaskNotFound { id } if id == missing));
}

#[tokio::test]
async fn updated_at_bumps_even_when_status_does_not_change() {
    let (engine, store, _, clock) = setup();
    let (instance, task) = started_expense(&engine, Uuid::new_v4()).await;

    // A second reviewer still owes a decision on the same step.
    let mut parallel = task.clone();
    parallel.id = Uuid::new_v4();
    store.insert_task(parallel.clone()).unwrap();

    clock.advance(Duration::minutes(3));
    engine
        .complete_human_task(task.id, Decision::Approve, "First sign-off.", Uuid::new_v4())
        .await
        .unwrap();

    let after = store.get_instance(instance.id).await.unwrap().unwrap();
    // Step not cleared yet: status and step stand, but pollers can see
    // that something happened.
    assert_eq!(after.status, InstanceStatus::Running);
    assert_eq!(after.current_step_id, "step-initial-review");
    assert_eq!(after.updated_at, clock.now());

    clock.advance(Duration::minutes(3));
    engine
        .complete_human_task(parallel.id, Decision::Approve, "Second sign-off.", Uuid::new_v4())
        .await
        .unwrap();
    let after = store.get_instance(instance.id).await.unwrap().unwrap();
    assert_eq!(after.current_step_id, "step-manager-approval");
}

#[tokio::test]
async fn system_wait_steps_derive_waiting_and_release() {
    let (engine, store, _, _) = setup();
    let actor_id = Uuid::new_v4();
    let (instance, review) = engine
        .start_instance(StartInstance {
            definition_id: DEPLOYMENT.into(),
            definition_version: "2.1.0".into(),
            tenant_id: Uuid::new_v4(),
            owner_actor_id: Some(actor_id),
            context_snapshot: None,
        })
        .await
        .unwrap();

    engine
        .complete_human_task(review.id, Decision::Approve, "Plan reviewed.", actor_id)
        .await
        .unwrap();

    let waiting = store.get_instance(instance.id).await.unwrap().unwrap();
    assert_eq!(waiting.status, InstanceStatus::Waiting);
    assert_eq!(waiting.current_step_id, "step-deploy-window");
    let tasks = engine.tasks_for_instance(instance.id).await.unwrap();
    let window = tasks.last().unwrap().clone();
    assert_eq!(window.step_type, StepType::SystemWait);

    // A system principal releases the wait through the same completion
    // path; the instance derives back to Running on the verify step.
    engine
        .complete_human_task(window.id, Decision::Approve, "Deploy window reached.", actor_id)
        .await
        .unwrap();
    let running = store.get_instance(instance.id).await.unwrap().unwrap();
    assert_eq!(running.status, InstanceStatus::Running);
    assert_eq!(running.current_step_id, "step-verify");
}

#[tokio::test]
async fn terminal_instances_absorb_late_decisions() {
    let (engine, store, _, clock) = setup();
    let (instance, task) = started_expense(&engine, Uuid::new_v4()).await;

    engine
        .complete_human_task(task.id, Decision::Reject, "Not in budget.", Uuid::new_v4())
        .await
        .unwrap();

    // A stale pending task decided after the instance already failed.
    let mut stale = task.clone();
    stale.id = Uuid::new_v4();
    stale.status = TaskStatus::Pending;
    stale.completed_at = None;
    stale.decision = None;
    store.insert_task(stale.clone()).unwrap();

    clock.advance(Duration::minutes(2));
    let decided = engine
        .complete_human_task(stale.id, Decision::Approve, "Late sign-off.", Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(decided.status, TaskStatus::Completed);

    let after = store.get_instance(instance.id).await.unwrap().unwrap();
    assert_eq!(after.status, InstanceStatus::Failed, "terminal status never regresses");
    assert_eq!(after.updated_at, clock.now());
}

#[tokio::test]
async fn concurrent_decisions_cannot_both_succeed() {
    let (engine, _, _, _) = setup();
    let (_, task) = started_expense(&engine, Uuid::new_v4()).await;

    let (a, b) = tokio::join!(
        engine.complete_human_task(task.id, Decision::Approve, "First decider.", Uuid::new_v4()),
        engine.complete_human_task(task.id, Decision::Reject, "Second decider.", Uuid::new_v4()),
    );

    let oks = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(oks, 1, "exactly one concurrent decision may win");
    let err = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert!(matches!(err, TesseraError::TaskNotPending { .. }));
}

#[tokio::test]
async fn every_decision_is_journaled() {
    let (engine, _, journal, _) = setup();
    let tenant_id = Uuid::new_v4();
    let approver = Uuid::new_v4();

    let (_, first) = started_expense(&engine, tenant_id).await;
    engine
        .complete_human_task(first.id, Decision::Approve, "Looks good to me.", approver)
        .await
        .unwrap();

    let (_, second) = started_expense(&engine, tenant_id).await;
    engine
        .complete_human_task(second.id, Decision::Reject, "Missing receipts.", approver)
        .await
        .unwrap();

    let entries = journal.entries_for_tenant(tenant_id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "workflow.task.approved");
    assert_eq!(entries[1].action, "workflow.task.rejected");
    assert!(entries.iter().all(|e| e.actor_id == approver));
    assert_eq!(entries[0].resource_id, Some(first.id));
    assert_eq!(entries[1].metadata["justification"], "Missing receipts.");
}
