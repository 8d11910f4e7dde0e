#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Return scheduling system deciding, per drone, forage versus haul home.
//!
//! This is the only state that survives across turns: the set of drones
//! currently committed to returning and the single lead returner pulled
//! home early by rank. The scheduler owns both fields exclusively; the
//! orchestrator drives it through [`ReturnScheduler::update_status`] and
//! [`ReturnScheduler::should_return`] once per drone per turn.

use std::collections::HashSet;

use gridmine_core::{DroneId, DroneSnapshot, Position};

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    capacity: u32,
    max_turns: u32,
    return_margin: u32,
}

impl Config {
    /// Creates a new configuration from the match constants.
    #[must_use]
    pub const fn new(capacity: u32, max_turns: u32, return_margin: u32) -> Self {
        Self {
            capacity,
            max_turns,
            return_margin,
        }
    }
}

/// Stateful per-drone scheduler deciding when a drone heads for the depot.
#[derive(Debug)]
pub struct ReturnScheduler {
    config: Config,
    returning: HashSet<DroneId>,
    lead: Option<DroneId>,
}

impl ReturnScheduler {
    /// Creates a scheduler with an empty return set and no lead returner.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            returning: HashSet::new(),
            lead: None,
        }
    }

    /// Clears the drone's returning commitment once it stands on the depot.
    ///
    /// Must run once per drone per turn, before the decision query, so a
    /// drone that arrived home this turn forages again from the next turn.
    pub fn update_status(&mut self, drone: &DroneSnapshot, depot: Position) {
        if drone.position != depot {
            return;
        }
        let _ = self.returning.remove(&drone.id);
        if self.lead == Some(drone.id) {
            self.lead = None;
        }
    }

    /// Decides whether the drone should head home this turn.
    ///
    /// Rules are evaluated in priority order, first match wins: an existing
    /// commitment is sticky; the endgame cutoff sends everyone home; a
    /// nearly full drone commits; otherwise the single highest-carrying
    /// drone in `ranked` may commit as lead returner once it carries at
    /// least half its capacity. `ranked` must be the full roster sorted by
    /// cargo descending with ties in enumeration order.
    pub fn should_return(
        &mut self,
        drone: &DroneSnapshot,
        turn: u32,
        ranked: &[DroneSnapshot],
    ) -> bool {
        if self.returning.contains(&drone.id) {
            return true;
        }

        if turn >= self.config.max_turns.saturating_sub(self.config.return_margin) {
            let _ = self.returning.insert(drone.id);
            return true;
        }

        // cargo >= 90% of capacity, in integers.
        if u64::from(drone.cargo) * 10 >= u64::from(self.config.capacity) * 9 {
            let _ = self.returning.insert(drone.id);
            return true;
        }

        let is_top_carrier = ranked.first().map(|top| top.id) == Some(drone.id);
        if self.lead.is_none()
            && is_top_carrier
            && u64::from(drone.cargo) * 2 >= u64::from(self.config.capacity)
        {
            self.lead = Some(drone.id);
            let _ = self.returning.insert(drone.id);
            return true;
        }

        false
    }

    /// Reports whether the drone is currently committed to returning.
    #[must_use]
    pub fn is_returning(&self, drone: DroneId) -> bool {
        self.returning.contains(&drone)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ReturnScheduler};
    use gridmine_core::{DroneId, DroneSnapshot, Position};

    const CAPACITY: u32 = 1000;
    const MAX_TURNS: u32 = 400;
    const MARGIN: u32 = 25;

    fn scheduler() -> ReturnScheduler {
        ReturnScheduler::new(Config::new(CAPACITY, MAX_TURNS, MARGIN))
    }

    fn drone(id: u32, cargo: u32) -> DroneSnapshot {
        DroneSnapshot {
            id: DroneId::new(id),
            position: Position::new(5, 5),
            cargo,
        }
    }

    #[test]
    fn nearly_full_drone_commits_regardless_of_rank() {
        let mut scheduler = scheduler();
        let ranked = vec![drone(1, 960), drone(2, 950)];
        // Rank 1, not rank 0; rule 3 must still fire.
        assert!(scheduler.should_return(&ranked[1], 10, &ranked));
        assert!(scheduler.is_returning(DroneId::new(2)));
    }

    #[test]
    fn commitment_is_sticky_until_the_depot_clears_it() {
        let mut scheduler = scheduler();
        let ranked = vec![drone(1, 900)];
        assert!(scheduler.should_return(&ranked[0], 10, &ranked));

        // Cargo no longer qualifies on its own, yet the flag holds.
        let emptied = vec![drone(1, 0)];
        assert!(scheduler.should_return(&emptied[0], 11, &emptied));

        let mut at_depot = drone(1, 0);
        at_depot.position = Position::new(0, 0);
        scheduler.update_status(&at_depot, Position::new(0, 0));
        assert!(!scheduler.is_returning(DroneId::new(1)));
        assert!(!scheduler.should_return(&emptied[0], 12, &emptied));
    }

    #[test]
    fn endgame_cutoff_fires_exactly_at_the_margin() {
        let mut scheduler = scheduler();
        let ranked = vec![drone(1, 0)];
        assert!(!scheduler.should_return(&ranked[0], MAX_TURNS - MARGIN - 1, &ranked));

        let mut scheduler = self::scheduler();
        assert!(scheduler.should_return(&ranked[0], MAX_TURNS - MARGIN, &ranked));
        assert!(scheduler.is_returning(DroneId::new(1)));
    }

    #[test]
    fn only_the_top_carrier_becomes_lead_returner() {
        let mut scheduler = scheduler();
        let ranked = vec![drone(1, 600), drone(2, 550)];
        assert!(scheduler.should_return(&ranked[0], 10, &ranked));
        // Second carrier is above half capacity but a lead already exists.
        assert!(!scheduler.should_return(&ranked[1], 10, &ranked));
    }

    #[test]
    fn lead_slot_frees_up_after_the_lead_reaches_the_depot() {
        let mut scheduler = scheduler();
        let depot = Position::new(0, 0);
        let ranked = vec![drone(1, 600), drone(2, 550)];
        assert!(scheduler.should_return(&ranked[0], 10, &ranked));

        let mut arrived = drone(1, 0);
        arrived.position = depot;
        scheduler.update_status(&arrived, depot);

        let ranked = vec![drone(2, 550), drone(1, 0)];
        assert!(scheduler.should_return(&ranked[0], 11, &ranked));
        assert!(scheduler.is_returning(DroneId::new(2)));
    }

    #[test]
    fn top_carrier_below_half_capacity_keeps_foraging() {
        let mut scheduler = scheduler();
        let ranked = vec![drone(1, 499), drone(2, 100)];
        assert!(!scheduler.should_return(&ranked[0], 10, &ranked));
        assert!(!scheduler.is_returning(DroneId::new(1)));
    }

    #[test]
    fn mid_cargo_drone_keeps_foraging_before_the_cutoff() {
        let mut scheduler = scheduler();
        let ranked = vec![drone(1, 600), drone(2, 400)];
        let turn = MAX_TURNS - MARGIN - 5;
        assert!(scheduler.should_return(&ranked[0], turn, &ranked));
        assert!(!scheduler.should_return(&ranked[1], turn, &ranked));
    }
}
