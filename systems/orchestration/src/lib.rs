#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn orchestration sequencing scheduler, policy, navigation and arbiter.
//!
//! One [`TurnOrchestrator::handle`] call plans a whole turn: the roster is
//! ranked by cargo, each drone is routed home or to forage, every intended
//! destination passes through a fresh [`DestinationArbiter`], and the spawn
//! decision closes the batch. The orchestrator owns the return scheduler,
//! the only state carried between turns.

use std::cmp::Reverse;

use gridmine_core::{Command, Constants, DroneId, DroneSnapshot, DroneView, Position};
use gridmine_system_arbitration::DestinationArbiter;
use gridmine_system_foraging::select_target;
use gridmine_system_returning::{Config as ReturnConfig, ReturnScheduler};
use gridmine_world::navigation::single_step_toward;
use gridmine_world::query::GridView;

/// Last turn on which the depot may still spawn a new drone.
const SPAWN_HORIZON: u32 = 200;

/// Per-turn planner producing one command per drone plus an optional spawn.
#[derive(Debug)]
pub struct TurnOrchestrator {
    constants: Constants,
    scheduler: ReturnScheduler,
}

impl TurnOrchestrator {
    /// Creates an orchestrator with a fresh return scheduler.
    #[must_use]
    pub fn new(constants: Constants) -> Self {
        let scheduler = ReturnScheduler::new(ReturnConfig::new(
            constants.capacity(),
            constants.max_turns(),
            constants.return_margin(),
        ));
        Self {
            constants,
            scheduler,
        }
    }

    /// Plans the turn, appending one command per drone plus any spawn.
    ///
    /// Drones are processed in cargo-descending order, ties by enumeration
    /// order, so a higher-carrying drone wins any contested destination and
    /// the loser holds for one turn.
    pub fn handle(
        &mut self,
        turn: u32,
        drones: &DroneView,
        grid: &GridView<'_>,
        depot: Position,
        balance: u32,
        out: &mut Vec<Command>,
    ) {
        let ranked = rank_by_cargo(drones);
        let mut arbiter = DestinationArbiter::new();

        for drone in &ranked {
            self.scheduler.update_status(drone, depot);
            let target = if self.scheduler.should_return(drone, turn, &ranked) {
                depot
            } else {
                select_target(drone, grid, self.constants.capacity())
            };
            out.push(resolve_step(drone, target, grid, &mut arbiter));
        }

        if turn <= SPAWN_HORIZON
            && balance >= self.constants.spawn_cost()
            && !grid.is_occupied(depot)
        {
            out.push(Command::Spawn);
        }
    }

    /// Reports whether the scheduler currently flags the drone as returning.
    #[must_use]
    pub fn is_returning(&self, drone: DroneId) -> bool {
        self.scheduler.is_returning(drone)
    }
}

/// Full roster sorted by cargo descending; the stable sort keeps the
/// engine's enumeration order for equal cargo.
fn rank_by_cargo(drones: &DroneView) -> Vec<DroneSnapshot> {
    let mut ranked: Vec<DroneSnapshot> = drones.iter().copied().collect();
    ranked.sort_by_key(|drone| Reverse(drone.cargo));
    ranked
}

/// Converts a chosen target into a move or hold command via the arbiter.
fn resolve_step(
    drone: &DroneSnapshot,
    target: Position,
    grid: &GridView<'_>,
    arbiter: &mut DestinationArbiter,
) -> Command {
    if target != drone.position {
        if let Some(direction) = single_step_toward(grid, drone.position, target) {
            let destination = grid.offset(drone.position, direction);
            if arbiter.claim(destination) {
                return Command::Move {
                    drone: drone.id,
                    direction,
                };
            }
        }
    }

    // A holding drone keeps occupying its cell next turn; claim it so later
    // drones defer instead of steering into it. The claim may already be
    // taken, in which case the drone holds regardless.
    let _ = arbiter.claim(drone.position);
    Command::Hold { drone: drone.id }
}
