//! Flip Runner - simulation core of a gravity-flipping side-scroller
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, world streaming)
//! - `settings`: Session configuration snapshot
//! - `score`: Distance-based scoreboard

pub mod score;
pub mod settings;
pub mod sim;

pub use score::Scoreboard;
pub use settings::{SessionConfig, SpeedMode};

/// Game configuration constants
pub mod consts {
    /// Simulation updates per second
    pub const TICK_RATE: u32 = 200;

    /// Unscaled tile edge in pixels
    pub const TILES_DEFAULT_SIZE: f32 = 32.0;
    /// Tiles across one level chunk
    pub const TILES_IN_WIDTH: u32 = 26;
    /// Tiles down one level chunk
    pub const TILES_IN_HEIGHT: u32 = 14;

    /// Default window dimensions (the world scale derives from the height)
    pub const WINDOW_WIDTH: f32 = 1440.0;
    pub const WINDOW_HEIGHT: f32 = 900.0;

    /// Player slots in a session
    pub const MAX_PLAYERS: usize = 4;
    /// Non-spawn level chunks kept live at once
    pub const MAX_CONCURRENT_LEVELS: usize = 3;

    /// Player body
    pub const PLAYER_MASS: f32 = 0.5;
    pub const GRAVITY_SCALE: f32 = 3.2;
    /// Unscaled sprite edge; the hitbox is the middle third of it
    pub const PLAYER_SPRITE_SIZE: f32 = 96.0;
    /// Column (in tiles) where players are seated at round start
    pub const PLAYER_START_COLUMN: f32 = 11.0;

    /// Pickup velocity multiplier and effect duration
    pub const BONUS_VELOCITY_FACTOR: f32 = 10.0;
    pub const BONUS_DURATION_SECS: f32 = 3.0;
    /// Delay before a player may flip gravity again
    pub const GRAVITY_FLIP_COOLDOWN_SECS: f32 = 0.5;
    /// Round-start countdown (three steps of 1.2 s)
    pub const COUNTDOWN_SECS: f32 = 3.6;

    /// Scroll speeds, multiplied by the world scale
    pub const SPEED_NORMAL: f32 = 0.8;
    pub const SPEED_SLOW: f32 = 0.4;
    pub const SPEED_INCREASED_START: f32 = 0.7;
    /// Increased-speed mode ramps every few seconds
    pub const SPEED_STEP_SECS: f32 = 6.0;
    pub const SPEED_STEP_FAST: f32 = 0.08;
    pub const SPEED_STEP_SLOW: f32 = 0.02;
    /// Above this speed the ramp uses the slow step
    pub const SPEED_STEP_THRESHOLD: f32 = 1.5;

    /// Hazards and pickups
    pub const SAW_SIZE: f32 = 50.0;
    pub const MOVABLE_SAW_SPEED: f32 = 1.5;
    pub const SPEED_UP_INCREMENT: f32 = 10.0;
    pub const SPEED_DOWN_INCREMENT: f32 = -15.0;

    /// Out-of-bounds margins, in tiles
    pub const FALL_BEHIND_TILES: f32 = 2.0;
    pub const VERTICAL_DEATH_TILES: f32 = 2.5;

    /// Probe insets used to avoid grazing contacts
    pub const WALL_VERTICAL_INSET: f32 = 0.1;
    pub const PLAYER_VERTICAL_INSET: f32 = 0.15;
    pub const PLAYER_HORIZONTAL_INSET: f32 = 0.1;
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32, tick_rate: u32) -> u32 {
    (secs * tick_rate as f32).round() as u32
}
