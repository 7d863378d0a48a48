//! The engine: one entry point per inbound event.
//!
//! Each handler is an indivisible validate → mutate → emit unit. The
//! returned messages are computed only after the mutation they describe is
//! committed, so a caller that delivers them afterwards can never show an
//! observer a message whose preconditions aren't yet in authoritative
//! state. The engine is not internally synchronized; the owner serializes
//! access (the server wraps it in one mutex).

use broadside_protocol::{
    Board, Cell, ClientEvent, ConnectionId, RoomId, ServerEvent,
};
use broadside_session::SessionRegistry;

use crate::{
    EngineConfig, EngineError, FireOutcome, PlacementOutcome, RoomStore,
};

/// One outbound message: which connection gets which event. Broadcasts are
/// pre-expanded against room membership captured before any deletion.
pub type Outbound = (ConnectionId, ServerEvent);

/// Room lifecycle + turn arbitration over a store and a session registry.
#[derive(Debug, Default)]
pub struct Engine {
    store: RoomStore,
    registry: SessionRegistry,
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with the given housekeeping config.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: RoomStore::new(),
            registry: SessionRegistry::new(),
            config,
        }
    }

    /// The housekeeping config this engine runs with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read access to the room store (rooms live here).
    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    /// Read access to the session registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Dispatches one decoded client event.
    ///
    /// Rejections never escape as errors: they become a single
    /// `error_message` unicast to the sender, with state untouched.
    pub fn handle_event(
        &mut self,
        conn: &ConnectionId,
        event: ClientEvent,
    ) -> Vec<Outbound> {
        let result = match event {
            ClientEvent::CreateRoom { room_id, name } => {
                self.create_room(conn, room_id, name)
            }
            ClientEvent::JoinRoom { room_id, name } => {
                self.join_room(conn, room_id, name)
            }
            ClientEvent::PlaceShips { room_id, board } => {
                self.place_ships(conn, &room_id, board)
            }
            ClientEvent::Fire { room_id, cell } => {
                self.fire(conn, &room_id, cell)
            }
        };

        match result {
            Ok(out) => out,
            Err(err) => {
                tracing::debug!(conn_id = %conn, error = %err, "event rejected");
                vec![(
                    conn.clone(),
                    ServerEvent::ErrorMessage {
                        code: err.code(),
                        message: err.to_string(),
                    },
                )]
            }
        }
    }

    /// Opens a room under a caller-chosen id with `conn` as host.
    pub fn create_room(
        &mut self,
        conn: &ConnectionId,
        room_id: RoomId,
        name: String,
    ) -> Result<Vec<Outbound>, EngineError> {
        if let Some(current) = self.registry.room_of(conn) {
            return Err(EngineError::AlreadyInRoom(
                conn.clone(),
                current.clone(),
            ));
        }

        let room = self.store.create(room_id.clone(), conn.clone(), name)?;
        let update = room_update(room);

        self.registry.bind(conn.clone(), room_id)?;
        Ok(vec![(conn.clone(), update)])
    }

    /// Seats `conn` as the second player of an existing room.
    pub fn join_room(
        &mut self,
        conn: &ConnectionId,
        room_id: RoomId,
        name: String,
    ) -> Result<Vec<Outbound>, EngineError> {
        if let Some(current) = self.registry.room_of(conn) {
            return Err(EngineError::AlreadyInRoom(
                conn.clone(),
                current.clone(),
            ));
        }

        let room = self.store.join(&room_id, conn.clone(), name)?;
        let update = room_update(room);
        let members = room.members().to_vec();

        self.registry.bind(conn.clone(), room_id)?;
        Ok(members
            .into_iter()
            .map(|m| (m, update.clone()))
            .collect())
    }

    /// Records `conn`'s layout; starts the match when it readies the
    /// second player.
    pub fn place_ships(
        &mut self,
        conn: &ConnectionId,
        room_id: &RoomId,
        board: Board,
    ) -> Result<Vec<Outbound>, EngineError> {
        let room = self.member_room_mut(conn, room_id)?;
        let outcome = room.place_ships(conn, board)?;
        let members = room.members().to_vec();

        let ready = ServerEvent::PlayerReady { id: conn.clone() };
        let mut out: Vec<Outbound> = members
            .iter()
            .cloned()
            .map(|m| (m, ready.clone()))
            .collect();

        if let PlacementOutcome::Started { turn } = outcome {
            tracing::info!(%room_id, first_turn = %turn, "match started");
            let started = ServerEvent::GameStarted { turn };
            out.extend(members.into_iter().map(|m| (m, started.clone())));
        }
        Ok(out)
    }

    /// Arbitrates one shot. On a win the room is deleted before the
    /// messages are handed back — a later event naming this room id gets
    /// `RoomNotFound`.
    pub fn fire(
        &mut self,
        conn: &ConnectionId,
        room_id: &RoomId,
        cell: Cell,
    ) -> Result<Vec<Outbound>, EngineError> {
        let room = self.member_room_mut(conn, room_id)?;
        let outcome = room.fire(conn, cell)?;
        let members = room.members().to_vec();

        match outcome {
            FireOutcome::Continue { report, next_turn } => {
                let result = ServerEvent::FireResult {
                    by: report.by,
                    cell: report.cell,
                    hit: report.hit,
                    sunk: report.sunk,
                };
                let turn = ServerEvent::TurnChanged { turn: next_turn };

                let mut out: Vec<Outbound> = members
                    .iter()
                    .cloned()
                    .map(|m| (m, result.clone()))
                    .collect();
                out.extend(members.into_iter().map(|m| (m, turn.clone())));
                Ok(out)
            }
            FireOutcome::Win { report } => {
                tracing::info!(%room_id, winner = %report.by, "match won");
                let winner = report.by.clone();
                let result = ServerEvent::FireResult {
                    by: report.by,
                    cell: report.cell,
                    hit: report.hit,
                    sunk: report.sunk,
                };
                let over = ServerEvent::GameOver { winner };

                self.store.remove(room_id);
                for member in &members {
                    self.registry.unbind(member);
                }

                let mut out: Vec<Outbound> = members
                    .iter()
                    .cloned()
                    .map(|m| (m, result.clone()))
                    .collect();
                out.extend(members.into_iter().map(|m| (m, over.clone())));
                Ok(out)
            }
        }
    }

    /// Reconciles an abrupt disconnect reported by the gateway.
    ///
    /// Valid in any state. If `conn` was in a room, the room is torn down,
    /// both members are unbound, and the remaining member (if any) gets a
    /// unicast `opponent_left`. No-op for connections not in a room —
    /// disconnects are never an error.
    pub fn disconnect(&mut self, conn: &ConnectionId) -> Vec<Outbound> {
        let Some(room_id) = self.registry.room_of(conn).cloned() else {
            return Vec::new();
        };

        tracing::info!(conn_id = %conn, %room_id, "member disconnected, tearing down room");

        let mut out = Vec::new();
        match self.store.remove(&room_id) {
            Some(room) => {
                for member in room.members() {
                    self.registry.unbind(member);
                    if member != conn {
                        out.push((member.clone(), ServerEvent::OpponentLeft));
                    }
                }
            }
            None => {
                // Registry said so, store disagrees; heal the index.
                self.registry.unbind(conn);
            }
        }
        out
    }

    /// Reclaims rooms idle past `config.idle_timeout`, notifying members.
    ///
    /// Run from a periodic sweep; closes the leak where an abandoned room
    /// (e.g. deserted mid-placement without a disconnect report) would
    /// otherwise persist forever.
    pub fn expire_idle(&mut self) -> Vec<Outbound> {
        let idle_timeout = self.config.idle_timeout;
        let expired: Vec<RoomId> = self
            .store
            .ids()
            .into_iter()
            .filter(|id| {
                self.store
                    .get(id)
                    .is_some_and(|room| room.idle_for() > idle_timeout)
            })
            .collect();

        let mut out = Vec::new();
        for room_id in expired {
            let Some(room) = self.store.remove(&room_id) else {
                continue;
            };
            tracing::info!(%room_id, "idle room expired");
            for member in room.members() {
                self.registry.unbind(member);
                out.push((
                    member.clone(),
                    ServerEvent::RoomExpired {
                        room_id: room_id.clone(),
                    },
                ));
            }
        }
        out
    }

    /// Resolves a room the sender is a member of. A room that exists but
    /// does not contain the sender is unknown *to that sender*, so both
    /// cases are `RoomNotFound`.
    fn member_room_mut(
        &mut self,
        conn: &ConnectionId,
        room_id: &RoomId,
    ) -> Result<&mut crate::Room, EngineError> {
        let room = self
            .store
            .get_mut(room_id)
            .ok_or_else(|| EngineError::RoomNotFound(room_id.clone()))?;
        if !room.is_member(conn) {
            return Err(EngineError::RoomNotFound(room_id.clone()));
        }
        Ok(room)
    }
}

fn room_update(room: &crate::Room) -> ServerEvent {
    ServerEvent::RoomUpdate {
        room_id: room.room_id().clone(),
        players: room.player_summaries(),
    }
}
