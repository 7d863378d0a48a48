//! Session tracking for Broadside.
//!
//! One job: remember which room each live connection belongs to, so that
//! a disconnect (or a second create/join attempt) resolves in O(1) instead
//! of a scan over every room.
//!
//! ```text
//! Gateway (socket drops) ──→ SessionRegistry::room_of ──→ Engine teardown
//! ```

mod error;
mod registry;

pub use error::RegistryError;
pub use registry::SessionRegistry;
