//! Tessera Core — domain models, error taxonomy, clock abstraction, and
//! the repository trait seams shared by all crates.
//!
//! This crate has no storage or service logic of its own. The in-memory
//! adapters live in `tessera-store`; the identity and workflow services
//! live in `tessera-identity` and `tessera-workflow`.

pub mod error;
pub mod models;
pub mod repository;
pub mod time;

pub use error::{TesseraError, TesseraResult};
pub use time::{Clock, SystemClock};
