//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]. Collaborators
//! read it between ticks and drain [`GameState::events`] after each one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::GravityDirection;
use super::loader::LevelCatalog;
use super::object::PickupKind;
use super::player::{DEFAULT_GRAVITY_KEYS, Player};
use super::streaming::WorldStreamer;
use crate::consts::*;
use crate::score::Scoreboard;
use crate::settings::SessionConfig;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Round-start countdown; the world holds still and flips are ignored
    Countdown { ticks_remaining: u32 },
    /// Active gameplay
    Playing,
    /// Every active player is dead
    RoundOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Hazard,
    OutOfBounds,
}

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerDied { player: usize, cause: DeathCause },
    /// Emitted every tick a live player overlaps a saw, god mode included
    HazardContact { player: usize },
    PickupCollected { player: usize, kind: PickupKind },
    GravityFlipped { player: usize, direction: GravityDirection },
    LevelSpawned { params: String, x_offset: f32 },
    LevelRetired { params: String },
    CountdownFinished,
    RoundOver,
}

/// Starting rows (in tiles) for each player count
fn start_rows(player_count: usize) -> &'static [f32] {
    match player_count {
        1 => &[5.0],
        2 => &[5.0, 10.0],
        3 => &[2.0, 7.0, 10.0],
        _ => &[2.0, 5.0, 8.0, 10.0],
    }
}

/// Complete simulation state for a session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub config: SessionConfig,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// One slot per possible player; unused slots are inactive
    pub players: Vec<Player>,
    pub world: WorldStreamer,
    pub scoreboard: Scoreboard,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session; call [`GameState::start_round`] before ticking
    pub fn new(config: SessionConfig, catalog: LevelCatalog, seed: u64) -> Self {
        let players = (0..MAX_PLAYERS)
            .map(|id| {
                let mut player = Player::new(id, config.scale, DEFAULT_GRAVITY_KEYS[id]);
                player.is_inactive = true;
                player
            })
            .collect();
        let world = WorldStreamer::new(catalog, &config, seed);
        Self {
            seed,
            config,
            phase: GamePhase::RoundOver,
            time_ticks: 0,
            players,
            world,
            scoreboard: Scoreboard::new(),
            events: Vec::new(),
        }
    }

    /// Reset the world and seat `player_count` players for a new round
    pub fn start_round(&mut self, player_count: usize) {
        let player_count = player_count.clamp(1, MAX_PLAYERS);
        let tile = self.config.tile_size();
        let rows = start_rows(player_count);

        for (slot, player) in self.players.iter_mut().enumerate() {
            match rows.get(slot) {
                Some(row) => {
                    player.reset_for_round(Vec2::new(PLAYER_START_COLUMN * tile, row * tile), true)
                }
                None => player.reset_for_round(Vec2::new(-1000.0, 1000.0), false),
            }
        }

        self.world.reset(&self.config);
        self.world.seat_spawn_levels(player_count, &mut self.events);
        self.scoreboard.reset();
        self.phase = GamePhase::Countdown {
            ticks_remaining: self.config.countdown_ticks(),
        };
        log::info!("Round started for {} players", player_count);
    }

    pub fn active_player_count(&self) -> usize {
        self.players.iter().filter(|p| !p.is_inactive).count()
    }

    /// True when every player taking part is dead
    pub fn all_players_dead(&self) -> bool {
        self.players
            .iter()
            .filter(|p| !p.is_inactive)
            .all(|p| p.is_dead)
    }

    /// Current scroll speed; zero while the countdown holds the world
    pub fn scroll_speed(&self) -> f32 {
        match self.phase {
            GamePhase::Playing => self.world.speed(),
            _ => 0.0,
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        let config = SessionConfig::default();
        let catalog = LevelCatalog::parse(include_str!("../../levels/demo.lvl"), &config)
            .expect("demo levels parse");
        GameState::new(config, catalog, 99)
    }

    #[test]
    fn test_new_session_is_idle() {
        let state = state();
        assert_eq!(state.phase, GamePhase::RoundOver);
        assert_eq!(state.players.len(), MAX_PLAYERS);
        assert_eq!(state.active_player_count(), 0);
    }

    #[test]
    fn test_start_round_seats_players() {
        let mut state = state();
        state.start_round(3);
        let tile = state.config.tile_size();

        assert_eq!(state.active_player_count(), 3);
        assert!(state.players[3].is_inactive);
        let ys: Vec<f32> = state.players[..3].iter().map(|p| p.pos.y).collect();
        assert_eq!(ys, vec![2.0 * tile, 7.0 * tile, 10.0 * tile]);
        assert!(state.players[..3].iter().all(|p| p.pos.x == 11.0 * tile));
        assert_eq!(
            state.phase,
            GamePhase::Countdown {
                ticks_remaining: state.config.countdown_ticks()
            }
        );
        assert_eq!(state.world.active_levels().len(), 1);
        assert_eq!(state.world.active_levels()[0].params, "spawn_p3");
    }

    #[test]
    fn test_player_count_clamped() {
        let mut state = state();
        state.start_round(9);
        assert_eq!(state.active_player_count(), MAX_PLAYERS);
    }

    #[test]
    fn test_drain_events() {
        let mut state = state();
        state.start_round(1);
        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::LevelSpawned { x_offset, .. } if x_offset == 0.0));
        assert!(state.drain_events().is_empty());
    }
}
