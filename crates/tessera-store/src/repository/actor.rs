//! In-memory implementation of [`ActorRepository`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tessera_core::TesseraResult;
use tessera_core::models::actor::{Actor, CreateActor};
use tessera_core::repository::ActorRepository;
use tracing::debug;
use uuid::Uuid;

use super::lock_poisoned;

/// Cheap-to-clone handle; clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemActorRepository {
    actors: Arc<RwLock<HashMap<Uuid, Actor>>>,
}

impl MemActorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite an actor record by id. The store is a dumb keyed map;
    /// used to seed fixtures (e.g. an inactive actor, which has no
    /// creation path through the directory).
    pub fn insert(&self, actor: Actor) -> TesseraResult<()> {
        self.actors
            .write()
            .map_err(lock_poisoned)?
            .insert(actor.id, actor);
        Ok(())
    }
}

impl ActorRepository for MemActorRepository {
    async fn create(&self, input: CreateActor) -> TesseraResult<Actor> {
        let actor = Actor {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            kind: input.kind,
            display_name: input.display_name,
            contact: input.contact,
            is_active: true,
            created_at: Utc::now(),
        };
        self.actors
            .write()
            .map_err(lock_poisoned)?
            .insert(actor.id, actor.clone());
        debug!(actor_id = %actor.id, tenant_id = %actor.tenant_id, "actor created");
        Ok(actor)
    }

    async fn get_by_id(&self, id: Uuid) -> TesseraResult<Option<Actor>> {
        Ok(self.actors.read().map_err(lock_poisoned)?.get(&id).cloned())
    }
}
