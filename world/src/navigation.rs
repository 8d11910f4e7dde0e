//! Single-step navigation primitive owned by the world.
//!
//! Given a drone's cell and a desired destination, [`single_step_toward`]
//! yields at most one cardinal direction that shortens the toroidal
//! distance while avoiding cells the world already knows to be occupied.
//! Friendly same-turn collisions are not its concern; the destination
//! arbiter resolves those on top of this primitive.

use gridmine_core::{Direction, Position};

use crate::query::GridView;

/// Picks one safe step from `from` toward `target`, if any exists.
///
/// Candidates are the wrap-aware shortest step along each axis, x axis
/// first. An exact half-grid distance ties toward East or South. The first
/// candidate whose destination cell is unoccupied wins; `None` means the
/// drone is already at the target or every shortening step is blocked.
#[must_use]
pub fn single_step_toward(
    grid: &GridView<'_>,
    from: Position,
    target: Position,
) -> Option<Direction> {
    axis_candidates(grid, from, target)
        .into_iter()
        .flatten()
        .find(|direction| !grid.is_occupied(grid.offset(from, *direction)))
}

fn axis_candidates(
    grid: &GridView<'_>,
    from: Position,
    target: Position,
) -> [Option<Direction>; 2] {
    let (width, height) = grid.dimensions();
    let mut candidates = [None, None];
    let mut count = 0;

    let eastward = (target.x() % width + width - from.x() % width) % width;
    if eastward != 0 {
        let westward = width - eastward;
        candidates[count] = Some(if eastward <= westward {
            Direction::East
        } else {
            Direction::West
        });
        count += 1;
    }

    let southward = (target.y() % height + height - from.y() % height) % height;
    if southward != 0 {
        let northward = height - southward;
        candidates[count] = Some(if southward <= northward {
            Direction::South
        } else {
            Direction::North
        });
    }

    candidates
}
