//! Tests for the single-slot identity context holder.

use tessera_core::error::TesseraError;
use tessera_core::models::actor::ActorKind;
use tessera_core::models::identity::ResolvedIdentity;
use tessera_identity::IdentityContext;
use uuid::Uuid;

fn identity() -> ResolvedIdentity {
    ResolvedIdentity {
        tenant_id: Uuid::new_v4(),
        actor_id: Uuid::new_v4(),
        session_id: Uuid::new_v4(),
        actor_kind: ActorKind::HumanUser,
    }
}

#[test]
fn get_before_set_is_an_error() {
    let ctx = IdentityContext::new();
    assert!(matches!(ctx.get(), Err(TesseraError::NoActiveContext)));
}

#[test]
fn set_then_get_roundtrips() {
    let ctx = IdentityContext::new();
    let id = identity();
    ctx.set(id.clone());
    assert_eq!(ctx.get().unwrap(), id);
}

#[test]
fn set_overwrites_unconditionally() {
    let ctx = IdentityContext::new();
    ctx.set(identity());
    let replacement = identity();
    ctx.set(replacement.clone());
    assert_eq!(ctx.get().unwrap(), replacement);
}

#[test]
fn clear_is_idempotent() {
    let ctx = IdentityContext::new();
    ctx.set(identity());
    ctx.clear();
    ctx.clear();
    assert!(matches!(ctx.get(), Err(TesseraError::NoActiveContext)));
}
