#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stateless foraging policy choosing a harvest or relocation target.
//!
//! Evaluated only for drones the return scheduler left foraging. The policy
//! is a one-cell-lookahead greedy choice: harvest in place when the current
//! cell is rich enough, otherwise move to the strictly best unoccupied
//! cardinal neighbour, otherwise harvest in place anyway.

use gridmine_core::{Direction, DroneSnapshot, Position};
use gridmine_world::query::GridView;

/// Divisor applied to the capacity to decide that a cell is worth
/// harvesting in place.
const RICH_CELL_DIVISOR: u32 = 10;

/// Picks the cell the drone should head for this turn.
///
/// Returns the drone's own position when staying put is at least as good as
/// any reachable neighbour. Neighbours are scanned in the fixed
/// [`Direction::SCAN_ORDER`]; only a strictly higher ore amount displaces
/// the best candidate, so ties keep the earlier cell and a move is only
/// ever proposed toward strictly richer ground.
#[must_use]
pub fn select_target(drone: &DroneSnapshot, grid: &GridView<'_>, capacity: u32) -> Position {
    let here = drone.position;
    let ore_here = grid.ore(here);

    if ore_here >= capacity / RICH_CELL_DIVISOR {
        return here;
    }

    let mut best = here;
    let mut best_ore = ore_here;
    for direction in Direction::SCAN_ORDER {
        let neighbour = grid.offset(here, direction);
        if grid.is_occupied(neighbour) {
            continue;
        }
        let ore = grid.ore(neighbour);
        if ore > best_ore {
            best = neighbour;
            best_ore = ore;
        }
    }

    best
}
