//! Session registry — issuance, resolution, and revocation.

use chrono::Duration;
use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::models::identity::ResolvedIdentity;
use tessera_core::models::session::{CreateSession, Session};
use tessera_core::repository::{ActorRepository, SessionRepository};
use tessera_core::time::{Clock, SystemClock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::IdentityConfig;

/// Issues, resolves, and revokes sessions bound to one actor and one
/// tenant.
///
/// Generic over repository implementations so the registry has no
/// dependency on a concrete store. The clock is injected so expiry
/// behavior is deterministic under test.
pub struct SessionRegistry<A: ActorRepository, S: SessionRepository> {
    actors: A,
    sessions: S,
    config: IdentityConfig,
    clock: Box<dyn Clock>,
}

impl<A: ActorRepository, S: SessionRepository> SessionRegistry<A, S> {
    pub fn new(actors: A, sessions: S, config: IdentityConfig) -> Self {
        Self::with_clock(actors, sessions, config, Box::new(SystemClock))
    }

    pub fn with_clock(
        actors: A,
        sessions: S,
        config: IdentityConfig,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            actors,
            sessions,
            config,
            clock,
        }
    }

    /// Issue a session for an already-authenticated actor.
    ///
    /// The session's tenant id is snapshotted from the actor at issuance
    /// and never re-derived. `duration` falls back to the configured
    /// default lifetime when absent.
    pub async fn create_session(
        &self,
        actor_id: Uuid,
        duration: Option<Duration>,
    ) -> TesseraResult<Session> {
        let actor = self
            .actors
            .get_by_id(actor_id)
            .await?
            .ok_or(TesseraError::ActorNotFound { id: actor_id })?;

        if !actor.is_active {
            return Err(TesseraError::ActorInactive { id: actor_id });
        }

        let now = self.clock.now();
        let lifetime = duration.unwrap_or_else(|| {
            Duration::seconds(self.config.default_session_lifetime_secs as i64)
        });

        let session = self
            .sessions
            .create(CreateSession {
                tenant_id: actor.tenant_id,
                actor_id,
                issued_at: now,
                expires_at: now + lifetime,
            })
            .await?;

        info!(
            session_id = %session.id,
            actor_id = %actor_id,
            tenant_id = %session.tenant_id,
            expires_at = %session.expires_at,
            "session issued"
        );
        Ok(session)
    }

    /// Validate a session and return the flattened identity projection.
    ///
    /// Each check is a distinct failure mode, in order: unknown id,
    /// revoked, expired, tenant mismatch, dangling actor. Resolution is a
    /// pure read — repeated calls with a valid id are idempotent and
    /// side-effect-free (no last-seen bump).
    pub async fn resolve_session(
        &self,
        session_id: Uuid,
        required_tenant_id: Option<Uuid>,
    ) -> TesseraResult<ResolvedIdentity> {
        // 1. The session must exist.
        let session = self
            .sessions
            .get_by_id(session_id)
            .await?
            .ok_or(TesseraError::SessionNotFound { id: session_id })?;

        // 2. Explicit logout wins over everything else.
        if session.revoked_at.is_some() {
            debug!(session_id = %session_id, "resolution refused: revoked");
            return Err(TesseraError::SessionRevoked { id: session_id });
        }

        // 3. Passive expiry — checked lazily, never by a sweep. A
        //    resolution at exactly `expires_at` still succeeds.
        if self.clock.now() > session.expires_at {
            debug!(session_id = %session_id, "resolution refused: expired");
            return Err(TesseraError::SessionExpired { id: session_id });
        }

        // 4. Multi-tenant isolation boundary: when the caller asserts a
        //    tenant, an otherwise-valid session from another tenant must
        //    not leak through.
        if let Some(required) = required_tenant_id {
            if required != session.tenant_id {
                return Err(TesseraError::TenantMismatch {
                    required,
                    actual: session.tenant_id,
                });
            }
        }

        // 5. The actor must still resolve. Actor and session stores are
        //    independent, so this is checked even though it should not
        //    fail under normal operation.
        let actor = self
            .actors
            .get_by_id(session.actor_id)
            .await?
            .ok_or(TesseraError::ActorNotFound {
                id: session.actor_id,
            })?;

        // 6. Flattened projection.
        Ok(ResolvedIdentity {
            tenant_id: session.tenant_id,
            actor_id: actor.id,
            session_id: session.id,
            actor_kind: actor.kind,
        })
    }

    /// Revoke a session (logout). Revoking an already-revoked or unknown
    /// session is a no-op, not an error.
    pub async fn revoke_session(&self, session_id: Uuid) -> TesseraResult<()> {
        self.sessions.revoke(session_id, self.clock.now()).await?;
        info!(session_id = %session_id, "session revocation requested");
        Ok(())
    }
}
