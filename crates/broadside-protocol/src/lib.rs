//! Wire protocol for Broadside.
//!
//! Defines the event surface clients and the server exchange:
//!
//! - **Identities** ([`ConnectionId`], [`RoomId`], [`ShipId`], [`Cell`]) —
//!   opaque string newtypes; the engine references them, never mints them
//!   (the gateway mints connection ids, clients pick room ids).
//! - **Events** ([`ClientEvent`], [`ServerEvent`], [`ErrorCode`]) — the
//!   inbound/outbound messages, internally tagged JSON.
//! - **Board** ([`Board`]) — the insertion-ordered ship layout.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — byte conversion.
//!
//! The protocol layer knows nothing about sockets, rooms, or turn order —
//! it is purely the shared vocabulary of the other crates.

mod board;
mod codec;
mod error;
mod types;

pub use board::Board;
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Cell, ClientEvent, ConnectionId, ErrorCode, PlayerSummary, RoomId,
    ServerEvent, ShipId,
};
