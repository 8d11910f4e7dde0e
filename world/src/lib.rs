#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative per-turn world state for the gridmine bot.
//!
//! The engine adapter owns the protocol; this crate owns what the protocol
//! describes: the toroidal ore grid, the drone roster in the engine's
//! enumeration order, the depot, and the player's balance. Systems never
//! touch the world directly; they consume the read-only views produced by
//! the [`query`] module.

use gridmine_core::{DroneId, DroneSnapshot, Position};

pub mod navigation;

/// Sparse ore amount update for a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellUpdate {
    /// Cell whose ore amount changed since the previous turn.
    pub position: Position,
    /// New ore amount stored in the cell.
    pub ore: u32,
}

/// Complete observable state for one turn, as parsed from the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnFrame {
    /// One-based turn number reported by the engine.
    pub turn: u32,
    /// Player ore balance available for spawning.
    pub balance: u32,
    /// Full drone roster in the engine's enumeration order.
    pub drones: Vec<DroneSnapshot>,
    /// Cells whose ore amount changed since the previous turn.
    pub cells: Vec<CellUpdate>,
}

/// Represents the authoritative per-player world state.
#[derive(Clone, Debug)]
pub struct World {
    grid: OreGrid,
    occupancy: OccupancyGrid,
    drones: Vec<DroneSnapshot>,
    depot: Position,
    balance: u32,
    turn: u32,
}

impl World {
    /// Creates a world from the engine's initialization data.
    ///
    /// `ore` holds one amount per cell in row-major order and must contain
    /// exactly `width * height` entries; the engine adapter validates this
    /// before construction.
    #[must_use]
    pub fn from_setup(width: u32, height: u32, ore: Vec<u32>, depot: Position) -> Self {
        Self {
            grid: OreGrid::new(width, height, ore),
            occupancy: OccupancyGrid::new(width, height),
            drones: Vec::new(),
            depot,
            balance: 0,
            turn: 0,
        }
    }

    /// Applies a turn frame, replacing the roster and rebuilding occupancy.
    pub fn begin_turn(&mut self, frame: TurnFrame) {
        self.turn = frame.turn;
        self.balance = frame.balance;
        for update in &frame.cells {
            self.grid.set_ore(update.position, update.ore);
        }
        self.drones = frame.drones;
        self.occupancy.rebuild(&self.drones);
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use gridmine_core::{Direction, DroneId, DroneView, Position};

    use super::{OccupancyGrid, OreGrid, World};

    /// Captures a read-only view of the drones owned this turn.
    ///
    /// The view preserves the engine's enumeration order; callers that need
    /// a ranking sort their own copy.
    #[must_use]
    pub fn drone_view(world: &World) -> DroneView {
        DroneView::from_snapshots(world.drones.clone())
    }

    /// Exposes a read-only view combining ore amounts and occupancy.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView {
            grid: &world.grid,
            occupancy: &world.occupancy,
        }
    }

    /// Position of the player's depot, the fixed return target.
    #[must_use]
    pub fn depot(world: &World) -> Position {
        world.depot
    }

    /// Player ore balance available for spawning this turn.
    #[must_use]
    pub fn balance(world: &World) -> u32 {
        world.balance
    }

    /// One-based turn number of the frame currently applied.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turn
    }

    /// Read-only view of the ore grid and the drones occupying it.
    ///
    /// The grid is toroidal: [`GridView::offset`] wraps at the edges and all
    /// accessors normalize their argument, so any position arithmetic stays
    /// inside the grid.
    #[derive(Clone, Copy, Debug)]
    pub struct GridView<'a> {
        pub(crate) grid: &'a OreGrid,
        pub(crate) occupancy: &'a OccupancyGrid,
    }

    impl GridView<'_> {
        /// Ore amount stored in the provided cell.
        #[must_use]
        pub fn ore(&self, position: Position) -> u32 {
            self.grid.ore(position)
        }

        /// Returns the drone occupying the provided cell, if any.
        #[must_use]
        pub fn occupant(&self, position: Position) -> Option<DroneId> {
            self.occupancy.occupant(position)
        }

        /// Reports whether any drone currently occupies the cell.
        #[must_use]
        pub fn is_occupied(&self, position: Position) -> bool {
            self.occupancy.occupant(position).is_some()
        }

        /// Cell reached by stepping once in the given direction, wrapping at
        /// the grid edges.
        #[must_use]
        pub fn offset(&self, position: Position, direction: Direction) -> Position {
            let (width, height) = self.dimensions();
            let x = position.x() % width;
            let y = position.y() % height;
            match direction {
                Direction::North => Position::new(x, (y + height - 1) % height),
                Direction::South => Position::new(x, (y + 1) % height),
                Direction::East => Position::new((x + 1) % width, y),
                Direction::West => Position::new((x + width - 1) % width, y),
            }
        }

        /// Toroidal Manhattan distance between two cells.
        #[must_use]
        pub fn distance(&self, a: Position, b: Position) -> u32 {
            let (width, height) = self.dimensions();
            let dx = a.x().abs_diff(b.x()) % width;
            let dy = a.y().abs_diff(b.y()) % height;
            dx.min(width - dx) + dy.min(height - dy)
        }

        /// Width and height of the grid in cells.
        #[must_use]
        pub fn dimensions(&self) -> (u32, u32) {
            (self.grid.width(), self.grid.height())
        }
    }
}

/// Dense row-major ore storage.
#[derive(Clone, Debug)]
struct OreGrid {
    width: u32,
    height: u32,
    ore: Vec<u32>,
}

impl OreGrid {
    fn new(width: u32, height: u32, ore: Vec<u32>) -> Self {
        debug_assert_eq!(
            ore.len(),
            usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(usize::MAX),
            "ore rows must cover the whole grid"
        );
        Self { width, height, ore }
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn ore(&self, position: Position) -> u32 {
        self.index(position)
            .and_then(|index| self.ore.get(index).copied())
            .unwrap_or(0)
    }

    fn set_ore(&mut self, position: Position, amount: u32) {
        if let Some(index) = self.index(position) {
            if let Some(slot) = self.ore.get_mut(index) {
                *slot = amount;
            }
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let x = usize::try_from(position.x() % self.width).ok()?;
        let y = usize::try_from(position.y() % self.height).ok()?;
        let width = usize::try_from(self.width).ok()?;
        y.checked_mul(width)?.checked_add(x)
    }
}

/// Dense occupancy grid rebuilt from the roster each turn.
#[derive(Clone, Debug)]
struct OccupancyGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<DroneId>>,
}

impl OccupancyGrid {
    fn new(width: u32, height: u32) -> Self {
        let count = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![None; count],
        }
    }

    fn rebuild(&mut self, drones: &[DroneSnapshot]) {
        for cell in &mut self.cells {
            *cell = None;
        }
        for drone in drones {
            if let Some(index) = self.index(drone.position) {
                if let Some(slot) = self.cells.get_mut(index) {
                    *slot = Some(drone.id);
                }
            }
        }
    }

    fn occupant(&self, position: Position) -> Option<DroneId> {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    fn index(&self, position: Position) -> Option<usize> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let x = usize::try_from(position.x() % self.width).ok()?;
        let y = usize::try_from(position.y() % self.height).ok()?;
        let width = usize::try_from(self.width).ok()?;
        y.checked_mul(width)?.checked_add(x)
    }
}
