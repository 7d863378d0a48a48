//! A player's ship layout: an insertion-ordered mapping of ship → cells.
//!
//! Order matters. When an attack lands on a cell, the engine scans ships in
//! the order the client listed them and credits the first match. With an
//! unordered map, a cell that (illegally) belongs to two ships would resolve
//! non-deterministically, so `Board` keeps entries in encounter order and a
//! hand-written deserializer preserves the order of the JSON object.

use std::collections::HashSet;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Cell, ShipId};

/// An ordered `ShipId → set of cells` mapping.
///
/// On the wire this is a plain JSON object:
/// `{ "destroyer": ["0,0", "0,1"], "sub": ["3,3"] }`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    ships: Vec<(ShipId, HashSet<Cell>)>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a ship. Replaces the cell set in place if the ship id is
    /// already present, keeping its original position in the order.
    pub fn insert(&mut self, ship: ShipId, cells: HashSet<Cell>) {
        if let Some(entry) = self.ships.iter_mut().find(|(id, _)| *id == ship) {
            entry.1 = cells;
        } else {
            self.ships.push((ship, cells));
        }
    }

    /// Iterates ships in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ShipId, &HashSet<Cell>)> {
        self.ships.iter().map(|(id, cells)| (id, cells))
    }

    /// Returns the cell set of one ship.
    pub fn get(&self, ship: &ShipId) -> Option<&HashSet<Cell>> {
        self.ships
            .iter()
            .find(|(id, _)| id == ship)
            .map(|(_, cells)| cells)
    }

    /// The first ship (in insertion order) whose cell set contains `cell`.
    pub fn ship_at(&self, cell: &Cell) -> Option<(&ShipId, &HashSet<Cell>)> {
        self.ships
            .iter()
            .find(|(_, cells)| cells.contains(cell))
            .map(|(id, cells)| (id, cells))
    }

    /// Total number of cells across all ships.
    pub fn total_cells(&self) -> usize {
        self.ships.iter().map(|(_, cells)| cells.len()).sum()
    }

    /// Number of ships.
    pub fn len(&self) -> usize {
        self.ships.len()
    }

    /// Returns `true` if no ships have been placed.
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.ships.len()))?;
        for (ship, cells) in &self.ships {
            // Emit cells sorted so output is stable for logging and tests.
            let mut sorted: Vec<&Cell> = cells.iter().collect();
            sorted.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            map.serialize_entry(ship, &sorted)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BoardVisitor;

        impl<'de> Visitor<'de> for BoardVisitor {
            type Value = Board;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of ship id to an array of cells")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Board, A::Error> {
                let mut ships: Vec<(ShipId, HashSet<Cell>)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));

                while let Some((ship, cells)) =
                    access.next_entry::<ShipId, HashSet<Cell>>()?
                {
                    if ships.iter().any(|(id, _)| *id == ship) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate ship id: {ship}"
                        )));
                    }
                    ships.push((ship, cells));
                }

                Ok(Board { ships })
            }
        }

        deserializer.deserialize_map(BoardVisitor)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(tokens: &[&str]) -> HashSet<Cell> {
        tokens.iter().map(|t| Cell::new(*t)).collect()
    }

    fn sample() -> Board {
        let mut board = Board::new();
        board.insert(ShipId::new("destroyer"), cells(&["0,0", "0,1"]));
        board.insert(ShipId::new("sub"), cells(&["3,3"]));
        board
    }

    #[test]
    fn test_total_cells_sums_all_ships() {
        assert_eq!(sample().total_cells(), 3);
        assert_eq!(Board::new().total_cells(), 0);
    }

    #[test]
    fn test_ship_at_finds_containing_ship() {
        let board = sample();
        let (ship, _) = board.ship_at(&Cell::new("0,1")).unwrap();
        assert_eq!(ship.as_str(), "destroyer");
        assert!(board.ship_at(&Cell::new("9,9")).is_none());
    }

    #[test]
    fn test_ship_at_overlap_resolves_to_first_in_order() {
        // Overlap is illegal upstream, but resolution must stay
        // deterministic: first ship in insertion order wins.
        let mut board = Board::new();
        board.insert(ShipId::new("first"), cells(&["1,1"]));
        board.insert(ShipId::new("second"), cells(&["1,1", "1,2"]));

        let (ship, _) = board.ship_at(&Cell::new("1,1")).unwrap();
        assert_eq!(ship.as_str(), "first");
    }

    #[test]
    fn test_insert_same_ship_replaces_in_place() {
        let mut board = sample();
        board.insert(ShipId::new("destroyer"), cells(&["5,5"]));

        assert_eq!(board.len(), 2);
        let order: Vec<&str> = board.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["destroyer", "sub"]);
        assert_eq!(board.get(&ShipId::new("destroyer")), Some(&cells(&["5,5"])));
    }

    #[test]
    fn test_deserialize_preserves_json_object_order() {
        let json = r#"{"zebra":["0,0"],"alpha":["1,1"],"mid":["2,2"]}"#;
        let board: Board = serde_json::from_str(json).unwrap();

        let order: Vec<&str> = board.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["zebra", "alpha", "mid"]);
    }

    #[test]
    fn test_deserialize_duplicate_ship_id_returns_error() {
        let json = r#"{"sub":["0,0"],"sub":["1,1"]}"#;
        let result: Result<Board, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let board = sample();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn test_deserialize_rejects_non_map() {
        let result: Result<Board, _> = serde_json::from_str(r#"["0,0"]"#);
        assert!(result.is_err());
    }
}
