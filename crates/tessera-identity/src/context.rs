//! Identity context holder.

use std::sync::{Mutex, PoisonError};

use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::models::identity::ResolvedIdentity;

/// Single-slot holder for the currently active resolved identity.
///
/// Exactly zero or one identity is current per unit of work. Create one
/// holder per logical request or interaction, populate it after session
/// resolution, and clear it when the unit of work ends. Sharing one
/// holder across concurrently executing requests is a correctness bug —
/// one request would observe another's tenant and actor mid-flight —
/// which is why this is an owned value and not a process-wide global.
#[derive(Debug, Default)]
pub struct IdentityContext {
    current: Mutex<Option<ResolvedIdentity>>,
}

impl IdentityContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an identity, replacing any previous one unconditionally.
    pub fn set(&self, identity: ResolvedIdentity) {
        *self.slot() = Some(identity);
    }

    /// The current identity. Reading before any session has been set is
    /// an error, not an empty value: downstream code must never proceed
    /// with an ambiguous identity.
    pub fn get(&self) -> TesseraResult<ResolvedIdentity> {
        self.slot().clone().ok_or(TesseraError::NoActiveContext)
    }

    /// Drop the current identity. Idempotent.
    pub fn clear(&self) {
        *self.slot() = None;
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<ResolvedIdentity>> {
        // A poisoned slot only means a panic elsewhere in this unit of
        // work; the stored value is a plain Option and stays usable.
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
