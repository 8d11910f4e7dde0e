#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adapter speaking the match engine's line-oriented text protocol.
//!
//! The engine writes an initialization block followed by one frame per turn
//! on the bot's stdin and reads one command line per turn from the bot's
//! stdout. This crate owns every byte of that exchange: it parses the
//! constants, the ore map and the per-turn frames into world types, and it
//! renders command batches back out. End of match is not an error; it shows
//! up as EOF on the next frame read or as the engine closing the bot's
//! output pipe.

use std::io::{self, BufRead, StdinLock, StdoutLock, Write};

use gridmine_core::{Command, Constants, Direction, DroneId, DroneSnapshot, Position};
use gridmine_world::{CellUpdate, TurnFrame, World};
use thiserror::Error;

/// Failures while exchanging protocol lines with the match engine.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The underlying stream failed.
    #[error("engine stream failed: {0}")]
    Io(#[from] io::Error),
    /// The engine closed the stream in the middle of a structure.
    #[error("engine closed the stream while reading {context}")]
    UnexpectedEof {
        /// Structure that was being read when the stream ended.
        context: &'static str,
    },
    /// A line did not match the shape the protocol requires.
    #[error("malformed {context} line: {line:?}")]
    Malformed {
        /// Structure the line belongs to.
        context: &'static str,
        /// Offending line as received.
        line: String,
    },
    /// The constants line was not valid JSON.
    #[error("invalid constants line: {0}")]
    Constants(#[from] serde_json::Error),
}

/// Everything the initialization block describes.
#[derive(Debug)]
pub struct Setup {
    /// Fixed match configuration from the engine's constants line.
    pub constants: Constants,
    /// World primed with the ore map and depot; no frame applied yet.
    pub world: World,
}

/// Blocking protocol endpoint over a reader/writer pair.
#[derive(Debug)]
pub struct Engine<R, W> {
    input: R,
    output: W,
}

impl Engine<StdinLock<'static>, StdoutLock<'static>> {
    /// Connects to the engine over the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout().lock())
    }
}

impl<R: BufRead, W: Write> Engine<R, W> {
    /// Wraps an arbitrary reader/writer pair; tests use in-memory buffers.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the initialization block and answers the ready handshake.
    ///
    /// Expects, in order: one JSON constants line, `width height`, `height`
    /// rows of `width` ore amounts, and the depot coordinates. Writes the
    /// bot name as the ready line before returning.
    pub fn initialize(&mut self, bot_name: &str) -> Result<Setup, ProtocolError> {
        let constants_line = self.expect_line("constants")?;
        let constants: Constants = serde_json::from_str(&constants_line)?;

        let dimensions_line = self.expect_line("dimensions")?;
        let dimensions = numbers(&dimensions_line, 2, "dimensions")?;
        let (width, height) = (dimensions[0], dimensions[1]);
        if width == 0 || height == 0 {
            return Err(ProtocolError::Malformed {
                context: "dimensions",
                line: dimensions_line,
            });
        }

        let mut ore = Vec::with_capacity((width as usize) * (height as usize));
        for _ in 0..height {
            let row_line = self.expect_line("ore row")?;
            let row = numbers(&row_line, width as usize, "ore row")?;
            ore.extend(row);
        }

        let depot_line = self.expect_line("depot")?;
        let depot = numbers(&depot_line, 2, "depot")?;
        let depot = Position::new(depot[0], depot[1]);

        log::info!(
            "initialized: {width}x{height} grid, depot ({}, {}), capacity {}",
            depot.x(),
            depot.y(),
            constants.capacity()
        );

        writeln!(self.output, "{bot_name}")?;
        self.output.flush()?;

        Ok(Setup {
            constants,
            world: World::from_setup(width, height, ore, depot),
        })
    }

    /// Reads the next turn frame; `None` means the match is over.
    pub fn next_turn(&mut self) -> Result<Option<TurnFrame>, ProtocolError> {
        let Some(header_line) = self.read_line()? else {
            log::info!("engine stream ended, match over");
            return Ok(None);
        };
        let header = numbers(&header_line, 2, "turn header")?;
        let (turn, balance) = (header[0], header[1]);

        let count_line = self.expect_line("drone count")?;
        let drone_count = numbers(&count_line, 1, "drone count")?[0];
        let mut drones = Vec::with_capacity(drone_count as usize);
        for _ in 0..drone_count {
            let drone_line = self.expect_line("drone")?;
            let fields = numbers(&drone_line, 4, "drone")?;
            drones.push(DroneSnapshot {
                id: DroneId::new(fields[0]),
                position: Position::new(fields[1], fields[2]),
                cargo: fields[3],
            });
        }

        let count_line = self.expect_line("cell update count")?;
        let update_count = numbers(&count_line, 1, "cell update count")?[0];
        let mut cells = Vec::with_capacity(update_count as usize);
        for _ in 0..update_count {
            let update_line = self.expect_line("cell update")?;
            let fields = numbers(&update_line, 3, "cell update")?;
            cells.push(CellUpdate {
                position: Position::new(fields[0], fields[1]),
                ore: fields[2],
            });
        }

        log::debug!(
            "turn {turn}: balance {balance}, {} drone(s), {} cell update(s)",
            drones.len(),
            cells.len()
        );

        Ok(Some(TurnFrame {
            turn,
            balance,
            drones,
            cells,
        }))
    }

    /// Submits the turn's command batch on a single flushed line.
    ///
    /// Returns `false` when the engine has already closed the bot's output,
    /// the normal end-of-match signal; every other failure is an error.
    pub fn submit(&mut self, commands: &[Command]) -> Result<bool, ProtocolError> {
        let line = render_commands(commands);
        log::debug!("submitting: {line:?}");
        match writeln!(self.output, "{line}").and_then(|()| self.output.flush()) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::BrokenPipe => {
                log::info!("engine closed the command pipe, match over");
                Ok(false)
            }
            Err(error) => Err(ProtocolError::Io(error)),
        }
    }

    fn read_line(&mut self) -> Result<Option<String>, ProtocolError> {
        let mut buffer = String::new();
        let read = self.input.read_line(&mut buffer)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim_end().to_string()))
    }

    fn expect_line(&mut self, context: &'static str) -> Result<String, ProtocolError> {
        self.read_line()?
            .ok_or(ProtocolError::UnexpectedEof { context })
    }
}

/// Parses exactly `expected` whitespace-separated numbers from one line.
fn numbers(line: &str, expected: usize, context: &'static str) -> Result<Vec<u32>, ProtocolError> {
    let malformed = || ProtocolError::Malformed {
        context,
        line: line.to_string(),
    };
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != expected {
        return Err(malformed());
    }
    fields
        .into_iter()
        .map(|field| field.parse::<u32>().map_err(|_| malformed()))
        .collect()
}

fn render_commands(commands: &[Command]) -> String {
    let mut tokens = Vec::with_capacity(commands.len());
    for command in commands {
        match command {
            Command::Move { drone, direction } => {
                tokens.push(format!("m {} {}", drone.get(), direction_letter(*direction)));
            }
            Command::Hold { drone } => tokens.push(format!("h {}", drone.get())),
            Command::Spawn => tokens.push("g".to_string()),
        }
    }
    tokens.join(" ")
}

fn direction_letter(direction: Direction) -> char {
    match direction {
        Direction::North => 'n',
        Direction::South => 's',
        Direction::East => 'e',
        Direction::West => 'w',
    }
}
