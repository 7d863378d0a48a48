//! Core wire types: identities and the inbound/outbound event surface.
//!
//! Everything here is what clients and the server exchange as JSON. Field
//! names are camelCase on the wire (`roomId`, not `room_id`) to match the
//! browser clients; exactly one casing is accepted — there is deliberately
//! no alias fallback for alternate spellings of `roomId`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Board;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The opaque identity of one connected client.
///
/// Minted by the gateway when a socket is accepted; the engine only ever
/// references these, it never creates or destroys one. Newtype over `String`
/// so a `ConnectionId` can't be confused with a `RoomId` in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A caller-supplied room identifier.
///
/// The engine does not generate room ids — clients pick them when creating
/// a room, and the store rejects collisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one ship within a player's layout (e.g. `"destroyer"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipId(String);

impl ShipId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One grid coordinate, as an opaque comparable token (e.g. `"3,4"`).
///
/// The engine never parses coordinates — membership and equality are all
/// it needs, so the token format is entirely the client's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cell(String);

impl Cell {
    pub fn new(cell: impl Into<String>) -> Self {
        Self(cell.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// One entry of the player list carried by `room_update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    /// The player's connection identity.
    pub id: ConnectionId,
    /// The display name they joined with.
    pub name: String,
}

/// Events a client sends to the server.
///
/// Internally tagged: `{ "type": "create_room", "roomId": "R1", ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Open a new room under a caller-chosen id.
    CreateRoom { room_id: RoomId, name: String },

    /// Join an existing room as the second player.
    JoinRoom { room_id: RoomId, name: String },

    /// Submit a full ship layout and mark the sender ready.
    PlaceShips { room_id: RoomId, board: Board },

    /// Attack one cell of the opponent's hidden layout.
    Fire { room_id: RoomId, cell: Cell },
}

/// Events the server sends to clients.
///
/// Unless noted, these are broadcast to every member of the affected room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Unicast on accept: tells the client its own connection identity,
    /// so it can recognize itself in `turn` and `player_ready` fields.
    Connected { id: ConnectionId },

    /// Current membership of a room, in join order. Sent after every
    /// successful create or join.
    RoomUpdate {
        room_id: RoomId,
        players: Vec<PlayerSummary>,
    },

    /// A player submitted their layout.
    PlayerReady { id: ConnectionId },

    /// Both players are ready; `turn` is the first joiner, who moves first.
    GameStarted { turn: ConnectionId },

    /// Outcome of one attack. `sunk` carries the ship id only when this
    /// shot destroyed the ship's last intact cell.
    FireResult {
        by: ConnectionId,
        cell: Cell,
        hit: bool,
        sunk: Option<ShipId>,
    },

    /// The turn passed to the named player.
    TurnChanged { turn: ConnectionId },

    /// All of the loser's cells are hit. The room is already gone when
    /// this arrives.
    GameOver { winner: ConnectionId },

    /// Unicast to the remaining member when their peer's socket drops.
    OpponentLeft,

    /// The room sat idle past the configured limit and was reclaimed.
    RoomExpired { room_id: RoomId },

    /// Unicast to the originating connection when its event was rejected.
    ErrorMessage { code: ErrorCode, message: String },
}

/// Machine-readable rejection codes carried by `error_message`.
///
/// Every one of these is a recoverable, local validation failure: state is
/// untouched and only the sender hears about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// `create_room` named an id that is already live.
    RoomAlreadyExists,
    /// The referenced room does not exist (or no longer does).
    RoomNotFound,
    /// The room already has two players.
    RoomFull,
    /// The connection is already bound to a room.
    AlreadyInRoom,
    /// A `fire` arrived from the player whose turn it is not.
    TurnViolation,
    /// The action is not valid in the room's current state.
    InvalidState,
    /// The inbound frame could not be decoded as a client event.
    BadRequest,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RoomAlreadyExists => "RoomAlreadyExists",
            Self::RoomNotFound => "RoomNotFound",
            Self::RoomFull => "RoomFull",
            Self::AlreadyInRoom => "AlreadyInRoom",
            Self::TurnViolation => "TurnViolation",
            Self::InvalidState => "InvalidState",
            Self::BadRequest => "BadRequest",
        };
        f.write_str(s)
    }
}

// =========================================================================
// Tests
// =========================================================================
