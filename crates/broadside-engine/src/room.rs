//! One room's state and the turn-resolution state machine that runs on it.
//!
//! A room moves through three observable phases:
//!
//! ```text
//! Waiting (1 player) → Placement (2 players, not all ready) → InProgress
//! ```
//!
//! There is no stored "finished" phase — a won room is deleted by the
//! engine the instant the winning shot resolves, so the terminal state is
//! only ever observed as an outbound `game_over` event.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use broadside_protocol::{Board, Cell, ConnectionId, PlayerSummary, RoomId, ShipId};

use crate::EngineError;

/// Maximum members of a room. Matches fix the opponent by position, so
/// this is structural, not configurable.
pub const MAX_PLAYERS: usize = 2;

/// One player's slot in a room.
#[derive(Debug, Clone)]
pub struct Player {
    /// The gateway identity this player joined with.
    pub conn_id: ConnectionId,
    /// Display name supplied at create/join time.
    pub name: String,
    /// Set once the player has submitted a layout.
    pub ready: bool,
    /// The submitted layout. Empty until `ready`.
    pub board: Board,
    /// Cells of THIS player's ships that the opponent has hit.
    /// Always a subset of the board's cells; grows monotonically.
    pub hits: HashSet<Cell>,
}

impl Player {
    fn new(conn_id: ConnectionId, name: String) -> Self {
        Self {
            conn_id,
            name,
            ready: false,
            board: Board::new(),
            hits: HashSet::new(),
        }
    }
}

/// The observable lifecycle phase of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Fewer than two players; waiting for an opponent.
    Waiting,
    /// Two players, at least one still placing ships.
    Placement,
    /// Both ready; turns alternate.
    InProgress,
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::Placement => write!(f, "Placement"),
            Self::InProgress => write!(f, "InProgress"),
        }
    }
}

/// Result of a successful `place_ships`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// The sender is ready; the match has not started yet.
    Ready,
    /// Both players are now ready — the match just started and `turn`
    /// (the first joiner) moves first.
    Started { turn: ConnectionId },
}

/// What one shot did to the opponent's layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireReport {
    /// Who fired.
    pub by: ConnectionId,
    /// The targeted cell.
    pub cell: Cell,
    /// Whether any ship occupies that cell.
    pub hit: bool,
    /// The ship this shot finished off, if any.
    pub sunk: Option<ShipId>,
}

/// Result of a successful `fire`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// The match continues; the turn has passed to `next_turn`.
    Continue {
        report: FireReport,
        next_turn: ConnectionId,
    },
    /// Every opposing cell is hit. The caller must delete the room —
    /// this state is never kept.
    Win { report: FireReport },
}

/// A single match between (up to) two players.
///
/// The room trusts its caller for cross-room concerns (existence checks,
/// membership routing, deletion); everything in here is the pure per-room
/// state machine.
#[derive(Debug)]
pub struct Room {
    room_id: RoomId,
    /// Player state keyed by connection. Join order lives in `turn_order`.
    players: HashMap<ConnectionId, Player>,
    /// Seat order: host first, joiner second. Never longer than two.
    turn_order: Vec<ConnectionId>,
    /// Index into `turn_order` of the player to move. Meaningful only
    /// once `started`.
    turn_index: usize,
    started: bool,
    created_at: Instant,
    /// Refreshed by every successful mutating operation; drives idle expiry.
    last_activity: Instant,
}

impl Room {
    /// Creates a room with its host as the sole member.
    pub fn new(room_id: RoomId, host_conn: ConnectionId, host_name: String) -> Self {
        let now = Instant::now();
        let mut players = HashMap::new();
        players.insert(
            host_conn.clone(),
            Player::new(host_conn.clone(), host_name),
        );
        Self {
            room_id,
            players,
            turn_order: vec![host_conn],
            turn_index: 0,
            started: false,
            created_at: now,
            last_activity: now,
        }
    }

    /// The room's identifier.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Seat order (host first). Also the membership list.
    pub fn members(&self) -> &[ConnectionId] {
        &self.turn_order
    }

    /// Whether `conn` occupies a seat in this room.
    pub fn is_member(&self, conn: &ConnectionId) -> bool {
        self.turn_order.contains(conn)
    }

    /// Returns one player's state.
    pub fn player(&self, conn: &ConnectionId) -> Option<&Player> {
        self.players.get(conn)
    }

    /// Whether the match has started.
    pub fn started(&self) -> bool {
        self.started
    }

    /// The connection whose turn it is. `None` before the match starts.
    pub fn current_turn(&self) -> Option<&ConnectionId> {
        self.started.then(|| &self.turn_order[self.turn_index])
    }

    /// The room's current observable phase.
    pub fn phase(&self) -> MatchPhase {
        if self.started {
            MatchPhase::InProgress
        } else if self.turn_order.len() < MAX_PLAYERS {
            MatchPhase::Waiting
        } else {
            MatchPhase::Placement
        }
    }

    /// When the room was created.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Time since the last successful mutating operation.
    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    /// Member summaries in seat order, for `room_update`.
    pub fn player_summaries(&self) -> Vec<PlayerSummary> {
        self.turn_order
            .iter()
            .filter_map(|conn| self.players.get(conn))
            .map(|p| PlayerSummary {
                id: p.conn_id.clone(),
                name: p.name.clone(),
            })
            .collect()
    }

    /// Seats a second player.
    ///
    /// # Errors
    /// [`EngineError::RoomFull`] if both seats are taken.
    pub fn add_player(
        &mut self,
        conn: ConnectionId,
        name: String,
    ) -> Result<(), EngineError> {
        if self.turn_order.len() >= MAX_PLAYERS {
            return Err(EngineError::RoomFull(self.room_id.clone()));
        }
        self.players
            .insert(conn.clone(), Player::new(conn.clone(), name));
        self.turn_order.push(conn);
        self.touch();
        Ok(())
    }

    /// Accepts `conn`'s layout and marks them ready.
    ///
    /// When this readies the second of two players, the match starts:
    /// `started` flips (exactly once in the room's life) and the host
    /// takes the first turn.
    ///
    /// # Errors
    /// [`EngineError::InvalidState`] if the match already started —
    /// layouts are immutable once play begins.
    pub fn place_ships(
        &mut self,
        conn: &ConnectionId,
        board: Board,
    ) -> Result<PlacementOutcome, EngineError> {
        if self.started {
            return Err(EngineError::InvalidState(
                "cannot place ships after the match has started".into(),
            ));
        }

        // Membership is checked by the engine before dispatch; guard anyway
        // so the state machine is safe on its own.
        let player = self.players.get_mut(conn).ok_or_else(|| {
            EngineError::RoomNotFound(self.room_id.clone())
        })?;
        player.board = board;
        player.ready = true;
        self.touch();

        let all_ready = self.turn_order.len() == MAX_PLAYERS
            && self
                .turn_order
                .iter()
                .all(|c| self.players[c].ready);
        if all_ready {
            self.started = true;
            self.turn_index = 0;
            Ok(PlacementOutcome::Started {
                turn: self.turn_order[0].clone(),
            })
        } else {
            Ok(PlacementOutcome::Ready)
        }
    }

    /// Resolves one attack by `conn` against the opponent's layout.
    ///
    /// The opponent's ships are scanned in the order the opponent listed
    /// them; the first ship containing the cell takes the hit. A shot that
    /// leaves every opposing cell hit wins the match; otherwise the turn
    /// flips. A rejected shot changes nothing — in particular the turn
    /// never advances on a [`EngineError::TurnViolation`].
    ///
    /// # Errors
    /// - [`EngineError::InvalidState`] if the match has not started.
    /// - [`EngineError::TurnViolation`] if it is not `conn`'s turn.
    pub fn fire(
        &mut self,
        conn: &ConnectionId,
        cell: Cell,
    ) -> Result<FireOutcome, EngineError> {
        if !self.started {
            return Err(EngineError::InvalidState(
                "cannot fire before the match has started".into(),
            ));
        }

        let current = &self.turn_order[self.turn_index];
        if conn != current {
            return Err(EngineError::TurnViolation(conn.clone()));
        }

        let opponent_id = self.turn_order[1 - self.turn_index].clone();
        let opponent = self
            .players
            .get_mut(&opponent_id)
            .ok_or_else(|| EngineError::RoomNotFound(self.room_id.clone()))?;

        let mut hit = false;
        let mut sunk = None;
        if let Some((ship, cells)) = opponent.board.ship_at(&cell) {
            hit = true;
            let ship = ship.clone();
            let cells = cells.clone();
            opponent.hits.insert(cell.clone());
            if cells.iter().all(|c| opponent.hits.contains(c)) {
                sunk = Some(ship);
            }
        }

        let report = FireReport {
            by: conn.clone(),
            cell,
            hit,
            sunk,
        };

        // A player with an empty layout can never be destroyed.
        let destroyed = opponent.board.total_cells() > 0
            && opponent
                .board
                .iter()
                .all(|(_, cells)| cells.iter().all(|c| opponent.hits.contains(c)));
        self.touch();

        if destroyed {
            Ok(FireOutcome::Win { report })
        } else {
            self.turn_index = 1 - self.turn_index;
            Ok(FireOutcome::Continue {
                report,
                next_turn: self.turn_order[self.turn_index].clone(),
            })
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

// =========================================================================
// Tests
// =========================================================================
