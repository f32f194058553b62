//! Tessera Store — in-memory implementations of the `tessera-core`
//! repository traits.
//!
//! Each store is a keyed map behind a single read/write lock, as the
//! concurrency model requires. Durable persistence is out of scope for
//! the core; a durable adapter would implement the same traits behind the
//! same seams.

pub mod repository;

pub use repository::{MemActorRepository, MemAuditLog, MemSessionRepository, MemWorkflowStore};
