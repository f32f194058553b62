//! In-memory implementation of [`AuditLog`].

use std::sync::{Arc, RwLock};

use tessera_core::TesseraResult;
use tessera_core::models::audit::{AuditEntry, CreateAuditEntry};
use tessera_core::repository::AuditLog;
use uuid::Uuid;

use super::lock_poisoned;

/// Append-only journal kept in append order. Cheap-to-clone handle;
/// clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemAuditLog {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl MemAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for MemAuditLog {
    async fn append(&self, input: CreateAuditEntry) -> TesseraResult<AuditEntry> {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            actor_id: input.actor_id,
            action: input.action,
            resource_id: input.resource_id,
            metadata: input.metadata,
            recorded_at: input.recorded_at,
        };
        self.entries
            .write()
            .map_err(lock_poisoned)?
            .push(entry.clone());
        Ok(entry)
    }

    async fn entries_for_tenant(&self, tenant_id: Uuid) -> TesseraResult<Vec<AuditEntry>> {
        Ok(self
            .entries
            .read()
            .map_err(lock_poisoned)?
            .iter()
            .filter(|e| e.tenant_id == tenant_id)
            .cloned()
            .collect())
    }
}
