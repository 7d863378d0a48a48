//! Error types for the engine.

use broadside_protocol::{ConnectionId, ErrorCode, RoomId};
use broadside_session::RegistryError;

/// Errors produced by room and turn operations.
///
/// Every variant is a recoverable validation failure: it is reported back
/// to the originating connection only and never mutates state. None of
/// these are fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `create_room` named an id that is already live.
    #[error("room {0} already exists")]
    RoomAlreadyExists(RoomId),

    /// The referenced room does not exist. Also covers events that name a
    /// room the sender is not a member of — from that sender's point of
    /// view the room is unknown.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The room already has two players.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The connection is already bound to a room.
    #[error("connection {0} is already in room {1}")]
    AlreadyInRoom(ConnectionId, RoomId),

    /// A `fire` arrived out of turn.
    #[error("it is not {0}'s turn")]
    TurnViolation(ConnectionId),

    /// The action is not valid in the room's current state — firing before
    /// the match started, or re-placing ships after it did.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl EngineError {
    /// The machine-readable code carried on the wire for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::RoomAlreadyExists(_) => ErrorCode::RoomAlreadyExists,
            Self::RoomNotFound(_) => ErrorCode::RoomNotFound,
            Self::RoomFull(_) => ErrorCode::RoomFull,
            Self::AlreadyInRoom(..) => ErrorCode::AlreadyInRoom,
            Self::TurnViolation(_) => ErrorCode::TurnViolation,
            Self::InvalidState(_) => ErrorCode::InvalidState,
        }
    }
}

impl From<RegistryError> for EngineError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AlreadyBound(conn, room) => {
                Self::AlreadyInRoom(conn, room)
            }
        }
    }
}
