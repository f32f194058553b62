//! In-memory implementation of [`SessionRepository`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tessera_core::TesseraResult;
use tessera_core::models::session::{CreateSession, Session};
use tessera_core::repository::SessionRepository;
use tracing::debug;
use uuid::Uuid;

use super::lock_poisoned;

/// Cheap-to-clone handle; clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemSessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl MemSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a session record by id. Seeding path for fixtures.
    pub fn insert(&self, session: Session) -> TesseraResult<()> {
        self.sessions
            .write()
            .map_err(lock_poisoned)?
            .insert(session.id, session);
        Ok(())
    }
}

impl SessionRepository for MemSessionRepository {
    async fn create(&self, input: CreateSession) -> TesseraResult<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            actor_id: input.actor_id,
            issued_at: input.issued_at,
            expires_at: input.expires_at,
            revoked_at: None,
        };
        self.sessions
            .write()
            .map_err(lock_poisoned)?
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_by_id(&self, id: Uuid) -> TesseraResult<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .map_err(lock_poisoned)?
            .get(&id)
            .cloned())
    }

    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> TesseraResult<()> {
        let mut sessions = self.sessions.write().map_err(lock_poisoned)?;
        if let Some(session) = sessions.get_mut(&id) {
            // First revocation wins; later calls are no-ops.
            if session.revoked_at.is_none() {
                session.revoked_at = Some(at);
                debug!(session_id = %id, "session revoked");
            }
        }
        Ok(())
    }
}
