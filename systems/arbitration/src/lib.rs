#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-scoped destination arbitration preventing friendly collisions.
//!
//! Each turn the orchestrator creates a fresh arbiter, registers every cell
//! a drone intends to occupy next turn, and defers any drone whose intended
//! cell was already claimed. The claim set never outlives the turn.

use std::collections::HashSet;

use gridmine_core::Position;

/// Records the destination cells already promised to a drone this turn.
#[derive(Debug, Default)]
pub struct DestinationArbiter {
    claimed: HashSet<Position>,
}

impl DestinationArbiter {
    /// Creates an arbiter with no claimed cells.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the cell for the calling drone.
    ///
    /// Returns `true` and records the cell when it was unclaimed; returns
    /// `false` without recording when another drone claimed it earlier this
    /// turn. The caller defers to a hold command on failure.
    pub fn claim(&mut self, position: Position) -> bool {
        self.claimed.insert(position)
    }

    /// Reports whether the cell has been claimed this turn.
    #[must_use]
    pub fn is_claimed(&self, position: Position) -> bool {
        self.claimed.contains(&position)
    }
}
