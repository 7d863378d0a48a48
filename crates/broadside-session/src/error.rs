//! Error types for the session registry.

use broadside_protocol::{ConnectionId, RoomId};

/// Errors that can occur when binding connections to rooms.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The connection is already bound to a room. A connection belongs to
    /// at most one room at a time; this guard catches clients that try to
    /// create or join a second room without leaving the first.
    #[error("connection {0} is already in room {1}")]
    AlreadyBound(ConnectionId, RoomId),
}
