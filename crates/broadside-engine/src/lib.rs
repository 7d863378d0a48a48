//! Room lifecycle and turn resolution for Broadside.
//!
//! This crate is the authoritative core: how rooms are created, joined,
//! and torn down; how readiness synchronizes into a match start; how each
//! shot is validated, resolved, and reported; and how disconnects are
//! reconciled. The transport that delivers events is someone else's
//! problem — the engine takes decoded events in and hands delivery lists
//! back.
//!
//! # Key types
//!
//! - [`Engine`] — one entry point per inbound event
//! - [`RoomStore`] — owns the live rooms, keyed by caller-supplied id
//! - [`Room`] — the per-match turn state machine
//! - [`EngineConfig`] — idle-expiry tunables
//! - [`EngineError`] — the rejection taxonomy

mod config;
mod engine;
mod error;
mod room;
mod store;

pub use config::EngineConfig;
pub use engine::{Engine, Outbound};
pub use error::EngineError;
pub use room::{
    FireOutcome, FireReport, MatchPhase, PlacementOutcome, Player, Room,
    MAX_PLAYERS,
};
pub use store::RoomStore;
