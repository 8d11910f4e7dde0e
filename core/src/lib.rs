#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the gridmine bot.
//!
//! This crate defines the message surface that connects the engine adapter,
//! the per-turn world state, and the pure decision systems. The adapter
//! feeds the world with authoritative state, systems consume immutable
//! snapshots and respond exclusively with [`Command`] batches, and the
//! adapter serializes those batches back to the match engine.

use serde::{Deserialize, Serialize};

/// Unique identifier assigned to a drone for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DroneId(u32);

impl DroneId {
    /// Creates a new drone identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as x and y coordinates.
///
/// Positions are plain labels; wrapping arithmetic lives with the grid that
/// knows its own dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }
}

/// Cardinal movement directions available to drones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Fixed enumeration order used wherever neighbouring cells are scanned.
    ///
    /// Foraging ties are broken by this order, so it must never change.
    pub const SCAN_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];
}

/// Commands that express every action a drone or the depot may take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves a drone one cell in the given direction.
    Move {
        /// Identifier of the drone that moves.
        drone: DroneId,
        /// Direction of travel for the step.
        direction: Direction,
    },
    /// Keeps a drone on its current cell, harvesting in place.
    Hold {
        /// Identifier of the drone that holds.
        drone: DroneId,
    },
    /// Requests that the depot produce a new drone.
    Spawn,
}

fn default_return_margin() -> u32 {
    25
}

/// Fixed configuration supplied by the match engine during initialization.
///
/// The core never computes these values; they arrive as a single JSON object
/// on the first protocol line and stay constant for the whole match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constants {
    capacity: u32,
    spawn_cost: u32,
    max_turns: u32,
    #[serde(default = "default_return_margin")]
    return_margin: u32,
}

impl Constants {
    /// Creates a constants record with explicit values.
    #[must_use]
    pub const fn new(capacity: u32, spawn_cost: u32, max_turns: u32, return_margin: u32) -> Self {
        Self {
            capacity,
            spawn_cost,
            max_turns,
            return_margin,
        }
    }

    /// Maximum ore a single drone can carry.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Ore cost of producing one drone at the depot.
    #[must_use]
    pub const fn spawn_cost(&self) -> u32 {
        self.spawn_cost
    }

    /// Total number of turns in the match.
    #[must_use]
    pub const fn max_turns(&self) -> u32 {
        self.max_turns
    }

    /// Number of turns before the end of the match at which every drone is
    /// unconditionally sent home.
    #[must_use]
    pub const fn return_margin(&self) -> u32 {
        self.return_margin
    }
}

/// Immutable representation of a single drone's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DroneSnapshot {
    /// Unique identifier assigned to the drone.
    pub id: DroneId,
    /// Grid cell currently occupied by the drone.
    pub position: Position,
    /// Ore currently carried, within `[0, capacity]` by engine contract.
    pub cargo: u32,
}

/// Read-only snapshot describing every drone owned this turn.
///
/// Snapshots keep the engine's enumeration order. The orchestrator's cargo
/// ranking breaks ties by this order, so the view must never reorder what
/// the engine sent.
#[derive(Clone, Debug, Default)]
pub struct DroneView {
    snapshots: Vec<DroneSnapshot>,
}

impl DroneView {
    /// Creates a new drone view preserving the provided enumeration order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<DroneSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured drone snapshots in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &DroneSnapshot> {
        self.snapshots.iter()
    }

    /// Number of drones captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no drones.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<DroneSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{Constants, Direction, DroneId, DroneSnapshot, DroneView, Position};

    #[test]
    fn constants_round_trip_through_json() {
        let constants = Constants::new(1000, 1000, 400, 25);
        let encoded = serde_json::to_string(&constants).expect("serialize");
        let restored: Constants = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(restored, constants);
    }

    #[test]
    fn constants_default_return_margin_when_absent() {
        let constants: Constants =
            serde_json::from_str(r#"{"capacity":800,"spawn_cost":500,"max_turns":300}"#)
                .expect("deserialize");
        assert_eq!(constants.capacity(), 800);
        assert_eq!(constants.spawn_cost(), 500);
        assert_eq!(constants.max_turns(), 300);
        assert_eq!(constants.return_margin(), 25);
    }

    #[test]
    fn drone_view_preserves_enumeration_order() {
        let snapshots = vec![
            DroneSnapshot {
                id: DroneId::new(7),
                position: Position::new(1, 1),
                cargo: 10,
            },
            DroneSnapshot {
                id: DroneId::new(3),
                position: Position::new(2, 2),
                cargo: 10,
            },
        ];
        let view = DroneView::from_snapshots(snapshots.clone());
        assert_eq!(view.len(), 2);
        assert!(!view.is_empty());
        assert_eq!(view.into_vec(), snapshots);
    }

    #[test]
    fn scan_order_lists_each_direction_once() {
        let order = Direction::SCAN_ORDER;
        assert_eq!(order.len(), 4);
        for direction in [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ] {
            assert_eq!(order.iter().filter(|entry| **entry == direction).count(), 1);
        }
    }
}
