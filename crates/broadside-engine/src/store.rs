//! The room store: owns every live room, keyed by caller-supplied id.
//!
//! The store is the sole authority for room creation and destruction.
//! It is an explicitly constructed value — no process-wide statics — so
//! independent instances can coexist (one per server, many per test).

use std::collections::HashMap;

use broadside_protocol::{ConnectionId, RoomId};

use crate::{EngineError, Room};

/// All live rooms.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<RoomId, Room>,
}

impl RoomStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a room with `host` seated, under the caller-chosen id.
    ///
    /// # Errors
    /// [`EngineError::RoomAlreadyExists`] if the id is already live —
    /// ids are never silently reused while a room holds them.
    pub fn create(
        &mut self,
        room_id: RoomId,
        host: ConnectionId,
        host_name: String,
    ) -> Result<&Room, EngineError> {
        if self.rooms.contains_key(&room_id) {
            return Err(EngineError::RoomAlreadyExists(room_id));
        }

        let room = Room::new(room_id.clone(), host, host_name);
        tracing::info!(%room_id, "room created");
        Ok(self.rooms.entry(room_id).or_insert(room))
    }

    /// Seats `conn` as the second player of an existing room.
    ///
    /// # Errors
    /// - [`EngineError::RoomNotFound`] if no room has this id.
    /// - [`EngineError::RoomFull`] if both seats are taken.
    pub fn join(
        &mut self,
        room_id: &RoomId,
        conn: ConnectionId,
        name: String,
    ) -> Result<&Room, EngineError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| EngineError::RoomNotFound(room_id.clone()))?;

        room.add_player(conn, name)?;
        tracing::info!(%room_id, players = room.members().len(), "player joined");
        Ok(room)
    }

    /// Looks up a room.
    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Looks up a room mutably.
    pub fn get_mut(&mut self, room_id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// Removes and returns a room. After this, every event referencing the
    /// id resolves to `RoomNotFound`.
    pub fn remove(&mut self, room_id: &RoomId) -> Option<Room> {
        let room = self.rooms.remove(room_id);
        if room.is_some() {
            tracing::info!(%room_id, "room destroyed");
        }
        room
    }

    /// Ids of all live rooms.
    pub fn ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if no rooms are live.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
