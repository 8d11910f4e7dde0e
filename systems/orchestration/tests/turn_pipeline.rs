use std::collections::HashSet;

use gridmine_core::{Command, Constants, Direction, DroneId, DroneSnapshot, Position};
use gridmine_system_orchestration::TurnOrchestrator;
use gridmine_world::{query, CellUpdate, TurnFrame, World};

const CAPACITY: u32 = 1000;
const MAX_TURNS: u32 = 400;

fn constants() -> Constants {
    Constants::new(CAPACITY, 1000, MAX_TURNS, 25)
}

fn drone(id: u32, x: u32, y: u32, cargo: u32) -> DroneSnapshot {
    DroneSnapshot {
        id: DroneId::new(id),
        position: Position::new(x, y),
        cargo,
    }
}

fn setup(depot: Position) -> World {
    World::from_setup(8, 8, vec![0; 64], depot)
}

fn frame(turn: u32, balance: u32, drones: Vec<DroneSnapshot>, cells: Vec<CellUpdate>) -> TurnFrame {
    TurnFrame {
        turn,
        balance,
        drones,
        cells,
    }
}

fn plan(orchestrator: &mut TurnOrchestrator, world: &World) -> Vec<Command> {
    let mut out = Vec::new();
    orchestrator.handle(
        query::turn(world),
        &query::drone_view(world),
        &query::grid_view(world),
        query::depot(world),
        query::balance(world),
        &mut out,
    );
    out
}

fn move_destinations(world: &World, commands: &[Command]) -> Vec<Position> {
    let grid = query::grid_view(world);
    let positions: Vec<Position> = query::drone_view(world)
        .iter()
        .map(|entry| entry.position)
        .collect();
    let ids: Vec<DroneId> = query::drone_view(world).iter().map(|entry| entry.id).collect();
    commands
        .iter()
        .filter_map(|command| match command {
            Command::Move { drone, direction } => {
                let index = ids.iter().position(|id| id == drone).expect("known drone");
                Some(grid.offset(positions[index], *direction))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn two_foragers_chasing_one_cell_resolve_to_a_single_move() {
    let mut world = setup(Position::new(0, 0));
    // A rich cell between two foragers; both would step onto (3, 3).
    world.begin_turn(frame(
        10,
        0,
        vec![drone(1, 3, 2, 10), drone(2, 3, 4, 5)],
        vec![CellUpdate {
            position: Position::new(3, 3),
            ore: 80,
        }],
    ));

    let mut orchestrator = TurnOrchestrator::new(constants());
    let commands = plan(&mut orchestrator, &world);

    assert_eq!(
        commands,
        vec![
            Command::Move {
                drone: DroneId::new(1),
                direction: Direction::South,
            },
            Command::Hold {
                drone: DroneId::new(2),
            },
        ]
    );
}

#[test]
fn move_destinations_never_collide() {
    let depot = Position::new(4, 4);
    let mut world = setup(depot);
    // Four nearly full drones ring the depot; only one may enter it.
    world.begin_turn(frame(
        50,
        0,
        vec![
            drone(1, 3, 4, 950),
            drone(2, 4, 3, 940),
            drone(3, 5, 4, 930),
            drone(4, 4, 5, 920),
        ],
        Vec::new(),
    ));

    let mut orchestrator = TurnOrchestrator::new(constants());
    let commands = plan(&mut orchestrator, &world);
    assert_eq!(commands.len(), 4);

    let destinations = move_destinations(&world, &commands);
    let unique: HashSet<Position> = destinations.iter().copied().collect();
    assert_eq!(unique.len(), destinations.len(), "duplicate destination");

    // The highest carrier takes the depot cell; the rest defer.
    assert!(matches!(
        commands[0],
        Command::Move { drone, .. } if drone == DroneId::new(1)
    ));
    assert_eq!(destinations, vec![depot]);
}

#[test]
fn return_commitment_persists_until_the_depot_is_reached() {
    let depot = Position::new(1, 1);
    let mut world = setup(depot);
    let mut orchestrator = TurnOrchestrator::new(constants());

    world.begin_turn(frame(10, 0, vec![drone(7, 4, 1, 950)], Vec::new()));
    let commands = plan(&mut orchestrator, &world);
    assert_eq!(
        commands,
        vec![Command::Move {
            drone: DroneId::new(7),
            direction: Direction::West,
        }]
    );
    assert!(orchestrator.is_returning(DroneId::new(7)));

    // Cargo drained mid-route must not release the commitment.
    world.begin_turn(frame(11, 0, vec![drone(7, 3, 1, 400)], Vec::new()));
    let commands = plan(&mut orchestrator, &world);
    assert_eq!(
        commands,
        vec![Command::Move {
            drone: DroneId::new(7),
            direction: Direction::West,
        }]
    );
    assert!(orchestrator.is_returning(DroneId::new(7)));

    // Arrival clears the flag; with nothing to harvest the drone holds.
    world.begin_turn(frame(12, 0, vec![drone(7, 1, 1, 0)], Vec::new()));
    let commands = plan(&mut orchestrator, &world);
    assert_eq!(
        commands,
        vec![Command::Hold {
            drone: DroneId::new(7),
        }]
    );
    assert!(!orchestrator.is_returning(DroneId::new(7)));
}

#[test]
fn endgame_turn_routes_every_drone_toward_the_depot() {
    let depot = Position::new(0, 0);
    let mut world = setup(depot);
    world.begin_turn(frame(
        MAX_TURNS - 25,
        0,
        vec![drone(1, 3, 0, 0), drone(2, 0, 5, 10), drone(3, 6, 6, 0)],
        Vec::new(),
    ));

    let mut orchestrator = TurnOrchestrator::new(constants());
    let commands = plan(&mut orchestrator, &world);
    assert_eq!(commands.len(), 3);

    let grid = query::grid_view(&world);
    let roster = query::drone_view(&world).into_vec();
    for command in &commands {
        let Command::Move { drone, direction } = command else {
            panic!("expected a move, got {command:?}");
        };
        let entry = roster
            .iter()
            .find(|candidate| candidate.id == *drone)
            .expect("known drone");
        let destination = grid.offset(entry.position, *direction);
        assert!(
            grid.distance(destination, depot) < grid.distance(entry.position, depot),
            "step must shorten the way home"
        );
    }
}

#[test]
fn spawning_stops_once_the_horizon_passes() {
    let depot = Position::new(2, 2);
    let mut world = setup(depot);
    let mut orchestrator = TurnOrchestrator::new(constants());

    world.begin_turn(frame(200, 1500, Vec::new(), Vec::new()));
    assert_eq!(plan(&mut orchestrator, &world), vec![Command::Spawn]);

    world.begin_turn(frame(201, 1500, Vec::new(), Vec::new()));
    assert!(plan(&mut orchestrator, &world).is_empty());
}
