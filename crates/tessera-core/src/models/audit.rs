//! Audit journal domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One append-only journal entry. Workflow decisions are journaled with
/// the deciding actor and justification so decisions remain auditable
/// independently of the task records themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub resource_id: Option<Uuid>,
    pub metadata: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEntry {
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub resource_id: Option<Uuid>,
    pub metadata: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}
