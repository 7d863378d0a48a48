//! The session registry: which room does a connection belong to?
//!
//! This is the authoritative reverse index used by disconnect handling —
//! without it, reconciling a dropped socket would mean scanning every live
//! room for the departed member.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is NOT thread-safe by itself — it uses a plain
//! `HashMap`. That is intentional: the registry is owned by the engine,
//! which is itself reached through a single mutex, so adding interior
//! locking here would only hide contention.

use std::collections::HashMap;

use broadside_protocol::{ConnectionId, RoomId};

use crate::RegistryError;

/// Maps each connected client to the room it currently occupies.
///
/// A connection is bound to at most one room; `bind` enforces this.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    rooms: HashMap<ConnectionId, RoomId>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `conn` is now a member of `room`.
    ///
    /// # Errors
    /// Returns [`RegistryError::AlreadyBound`] if the connection is already
    /// in a room (this one or any other).
    pub fn bind(
        &mut self,
        conn: ConnectionId,
        room: RoomId,
    ) -> Result<(), RegistryError> {
        if let Some(current) = self.rooms.get(&conn) {
            return Err(RegistryError::AlreadyBound(conn, current.clone()));
        }
        tracing::debug!(conn_id = %conn, room_id = %room, "session bound");
        self.rooms.insert(conn, room);
        Ok(())
    }

    /// Clears the binding for `conn`. Idempotent — unbinding a connection
    /// that was never bound is a no-op.
    pub fn unbind(&mut self, conn: &ConnectionId) {
        if self.rooms.remove(conn).is_some() {
            tracing::debug!(conn_id = %conn, "session unbound");
        }
    }

    /// Returns the room `conn` is bound to, if any.
    pub fn room_of(&self, conn: &ConnectionId) -> Option<&RoomId> {
        self.rooms.get(conn)
    }

    /// Number of bound connections.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if no connections are bound.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(s: &str) -> ConnectionId {
        ConnectionId::new(s)
    }

    fn rid(s: &str) -> RoomId {
        RoomId::new(s)
    }

    #[test]
    fn test_bind_then_room_of_returns_room() {
        let mut reg = SessionRegistry::new();

        reg.bind(cid("c-1"), rid("R1")).unwrap();

        assert_eq!(reg.room_of(&cid("c-1")), Some(&rid("R1")));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_bind_twice_returns_already_bound() {
        let mut reg = SessionRegistry::new();
        reg.bind(cid("c-1"), rid("R1")).unwrap();

        let result = reg.bind(cid("c-1"), rid("R2"));

        assert!(
            matches!(result, Err(RegistryError::AlreadyBound(c, r))
                if c == cid("c-1") && r == rid("R1")),
            "error should name the existing binding"
        );
        // Original binding is untouched.
        assert_eq!(reg.room_of(&cid("c-1")), Some(&rid("R1")));
    }

    #[test]
    fn test_bind_same_room_twice_still_rejected() {
        // Re-binding to the same room is just as invalid as a different one.
        let mut reg = SessionRegistry::new();
        reg.bind(cid("c-1"), rid("R1")).unwrap();

        assert!(reg.bind(cid("c-1"), rid("R1")).is_err());
    }

    #[test]
    fn test_unbind_clears_binding() {
        let mut reg = SessionRegistry::new();
        reg.bind(cid("c-1"), rid("R1")).unwrap();

        reg.unbind(&cid("c-1"));

        assert_eq!(reg.room_of(&cid("c-1")), None);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_unbind_unknown_connection_is_noop() {
        let mut reg = SessionRegistry::new();
        reg.unbind(&cid("c-ghost"));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_rebind_after_unbind_succeeds() {
        let mut reg = SessionRegistry::new();
        reg.bind(cid("c-1"), rid("R1")).unwrap();
        reg.unbind(&cid("c-1"));

        reg.bind(cid("c-1"), rid("R2")).unwrap();

        assert_eq!(reg.room_of(&cid("c-1")), Some(&rid("R2")));
    }

    #[test]
    fn test_room_of_unknown_connection_returns_none() {
        let reg = SessionRegistry::new();
        assert_eq!(reg.room_of(&cid("c-1")), None);
    }

    #[test]
    fn test_multiple_connections_same_room() {
        // Two members of one room each get their own binding.
        let mut reg = SessionRegistry::new();
        reg.bind(cid("c-1"), rid("R1")).unwrap();
        reg.bind(cid("c-2"), rid("R1")).unwrap();

        assert_eq!(reg.room_of(&cid("c-1")), Some(&rid("R1")));
        assert_eq!(reg.room_of(&cid("c-2")), Some(&rid("R1")));
        assert_eq!(reg.len(), 2);
    }
}
