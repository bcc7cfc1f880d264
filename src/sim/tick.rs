//! Fixed timestep simulation tick
//!
//! One call advances the session by one update at the configured tick rate:
//! flips → scroll → integrate → resolve → stream → score → round-over check.

use super::collision::resolve;
use super::player::Player;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Gravity flip requested, per player slot
    pub flip_gravity: [bool; MAX_PLAYERS],
}

impl TickInput {
    /// Map keys released since the last tick to flip requests
    pub fn from_released_keys(players: &[Player], released: &[u32]) -> Self {
        let mut input = Self::default();
        for player in players.iter().filter(|p| !p.is_inactive) {
            if player.id < MAX_PLAYERS && released.contains(&player.change_gravity_key) {
                input.flip_gravity[player.id] = true;
            }
        }
        input
    }

    /// Flip request for a single slot
    pub fn flip(player: usize) -> Self {
        let mut input = Self::default();
        if let Some(slot) = input.flip_gravity.get_mut(player) {
            *slot = true;
        }
        input
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::RoundOver => return,
        GamePhase::Countdown { ticks_remaining } => {
            countdown_tick(state);
            if ticks_remaining <= 1 {
                state.world.reset_speed(&state.config);
                for player in &mut state.players {
                    player.disable_controls = false;
                }
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::CountdownFinished);
                log::info!("Countdown finished, speed {:.3}", state.world.speed());
            } else {
                state.phase = GamePhase::Countdown {
                    ticks_remaining: ticks_remaining - 1,
                };
            }
        }
        GamePhase::Playing => playing_tick(state, input),
    }
    state.time_ticks += 1;
}

/// World holds still; players settle onto the spawn level with gravity down
fn countdown_tick(state: &mut GameState) {
    for player in state.players.iter_mut().filter(|p| p.is_alive()) {
        player.force_gravity_down();
    }
    state.world.hold();
    step_physics(state, 0.0);
}

fn playing_tick(state: &mut GameState, input: &TickInput) {
    let cooldown = state.config.flip_cooldown_ticks();
    for (player, &wants_flip) in state.players.iter_mut().zip(&input.flip_gravity) {
        if wants_flip && player.request_gravity_flip(cooldown) {
            state.events.push(GameEvent::GravityFlipped {
                player: player.id,
                direction: player.body.gravity_direction,
            });
        }
    }

    state.world.scroll(&state.config);
    let speed = state.world.speed();
    step_physics(state, speed);
    state.scoreboard.accrue(&state.players, speed);

    if state.all_players_dead() {
        state.phase = GamePhase::RoundOver;
        state.events.push(GameEvent::RoundOver);
        log::info!("Round over after {} ticks", state.time_ticks);
    }
}

fn step_physics(state: &mut GameState, speed: f32) {
    for player in &mut state.players {
        player.update();
    }
    resolve(
        &mut state.players,
        state.world.active_levels(),
        speed,
        &state.config,
        &mut state.events,
    );
    state.world.maintain(&mut state.events);
}
