#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line entry point that runs the gridmine bot against the engine.
//!
//! Stdout belongs to the protocol, so logging goes to stderr; set `RUST_LOG`
//! to see it. The loop is strictly turn-driven: read a frame, plan, submit,
//! until the engine stops talking.

use anyhow::Result;
use clap::Parser;
use gridmine_engine::{Engine, Setup};
use gridmine_system_orchestration::TurnOrchestrator;
use gridmine_world::query;

/// Arguments accepted by the gridmine binary.
#[derive(Debug, Parser)]
#[command(about = "Turn-based harvest bot for the gridmine engine")]
struct Args {
    /// Bot name sent to the engine during the ready handshake.
    #[arg(long, default_value = "gridmine")]
    name: String,
}

/// Entry point: connect, initialize, then run the turn loop to completion.
fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();
    let args = Args::parse();

    let mut engine = Engine::stdio();
    let Setup {
        constants,
        mut world,
    } = engine.initialize(&args.name)?;
    let mut orchestrator = TurnOrchestrator::new(constants);

    let mut commands = Vec::new();
    while let Some(frame) = engine.next_turn()? {
        world.begin_turn(frame);
        commands.clear();
        orchestrator.handle(
            query::turn(&world),
            &query::drone_view(&world),
            &query::grid_view(&world),
            query::depot(&world),
            query::balance(&world),
            &mut commands,
        );
        log::debug!(
            "turn {}: {} drone(s), {} command(s)",
            query::turn(&world),
            query::drone_view(&world).len(),
            commands.len()
        );
        if !engine.submit(&commands)? {
            break;
        }
    }

    Ok(())
}
