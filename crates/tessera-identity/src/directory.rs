//! Actor directory — creation and lookup of principals.

use tessera_core::TesseraResult;
use tessera_core::models::actor::{Actor, CreateActor};
use tessera_core::repository::ActorRepository;
use tracing::info;
use uuid::Uuid;

/// Directory of actors, scoped to tenants.
///
/// Generic over the repository implementation so the directory has no
/// dependency on a concrete store.
pub struct ActorDirectory<A: ActorRepository> {
    actors: A,
}

impl<A: ActorRepository> ActorDirectory<A> {
    pub fn new(actors: A) -> Self {
        Self { actors }
    }

    /// Register a new, active actor. Always succeeds given valid input —
    /// no uniqueness is enforced on display name or contact.
    pub async fn create_actor(&self, input: CreateActor) -> TesseraResult<Actor> {
        let actor = self.actors.create(input).await?;
        info!(
            actor_id = %actor.id,
            tenant_id = %actor.tenant_id,
            kind = ?actor.kind,
            "actor registered"
        );
        Ok(actor)
    }

    /// Pure lookup, no side effects.
    pub async fn get_actor(&self, actor_id: Uuid) -> TesseraResult<Option<Actor>> {
        self.actors.get_by_id(actor_id).await
    }
}
