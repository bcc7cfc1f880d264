//! Flip Runner headless entry point
//!
//! Runs a seeded session against a level description and logs what happens.
//!
//! ```text
//! flip-runner [LEVELS] [PLAYERS] [SEED] [TICKS]
//! ```
//!
//! Without a path the bundled demo levels are used. Verbosity follows
//! `RUST_LOG` (e.g. `RUST_LOG=debug`).

use std::process::ExitCode;

use flip_runner::SessionConfig;
use flip_runner::sim::{GameEvent, GamePhase, GameState, LevelCatalog, LevelLoadError, TickInput, tick};

const DEMO_LEVELS: &str = include_str!("../levels/demo.lvl");

const DEFAULT_PLAYERS: usize = 2;
const DEFAULT_SEED: u64 = 0x5EED;
const DEFAULT_TICKS: u64 = 6000;
/// Scripted flips: each player flips on a staggered period
const FLIP_PERIOD_TICKS: u64 = 450;

struct RunOptions {
    levels: Option<String>,
    players: usize,
    seed: u64,
    ticks: u64,
}

impl RunOptions {
    fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let levels = args.next().filter(|path| path != "-");
        let players = parse_arg(args.next(), "PLAYERS", DEFAULT_PLAYERS)?;
        let seed = parse_arg(args.next(), "SEED", DEFAULT_SEED)?;
        let ticks = parse_arg(args.next(), "TICKS", DEFAULT_TICKS)?;
        Ok(Self {
            levels,
            players,
            seed,
            ticks,
        })
    }
}

fn parse_arg<T: std::str::FromStr>(value: Option<String>, name: &str, default: T) -> Result<T, String> {
    match value {
        Some(text) => text
            .parse()
            .map_err(|_| format!("invalid {name}: `{text}`")),
        None => Ok(default),
    }
}

fn load_catalog(options: &RunOptions, config: &SessionConfig) -> Result<LevelCatalog, LevelLoadError> {
    match &options.levels {
        Some(path) => {
            log::info!("Loading levels from {}", path);
            LevelCatalog::load_file(path, config)
        }
        None => LevelCatalog::parse(DEMO_LEVELS, config),
    }
}

/// Staggered flips so every player exercises both gravity directions
fn scripted_input(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    for (slot, flip) in input.flip_gravity.iter_mut().enumerate() {
        let phase = slot as u64 * FLIP_PERIOD_TICKS / 4;
        *flip = state.time_ticks % FLIP_PERIOD_TICKS == phase;
    }
    input
}

fn run(options: RunOptions) -> Result<(), LevelLoadError> {
    let config = SessionConfig::default();
    let catalog = load_catalog(&options, &config)?;

    let mut state = GameState::new(config, catalog, options.seed);
    log::info!("Session initialized with seed: {}", options.seed);
    state.start_round(options.players);

    for _ in 0..options.ticks {
        let input = scripted_input(&state);
        tick(&mut state, &input);
        for event in state.drain_events() {
            match event {
                GameEvent::LevelSpawned { .. } | GameEvent::LevelRetired { .. } => {
                    log::debug!("[{}] {:?}", state.time_ticks, event)
                }
                GameEvent::HazardContact { .. } => log::trace!("[{}] {:?}", state.time_ticks, event),
                _ => log::info!("[{}] {:?}", state.time_ticks, event),
            }
        }
        if state.phase == GamePhase::RoundOver {
            break;
        }
    }

    log::info!(
        "Finished after {} ticks ({:?}), scroll speed {:.3}",
        state.time_ticks,
        state.phase,
        state.world.speed()
    );
    for (place, id) in state.scoreboard.ranking(&state.players).into_iter().enumerate() {
        let status = if state.players[id].is_dead { "dead" } else { "alive" };
        log::info!(
            "#{} player {}: {:.1} ({})",
            place + 1,
            id,
            state.scoreboard.score(id),
            status
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Flip Runner (headless) starting...");

    let options = match RunOptions::from_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            log::error!("{}", message);
            eprintln!("usage: flip-runner [LEVELS] [PLAYERS] [SEED] [TICKS]");
            return ExitCode::FAILURE;
        }
    };

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Failed to load levels: {}", e);
            ExitCode::FAILURE
        }
    }
}
