//! Session configuration
//!
//! An immutable snapshot of the session flags, handed to the streaming
//! manager and the resolver every tick. Persisting it is the settings UI's job.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::secs_to_ticks;

/// World scroll speed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedMode {
    #[default]
    Normal,
    Slow,
    /// Starts slightly slower and ramps up over time
    Increased,
}

impl SpeedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedMode::Normal => "Normal",
            SpeedMode::Slow => "Slow",
            SpeedMode::Increased => "Increased",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(SpeedMode::Normal),
            "slow" => Some(SpeedMode::Slow),
            "increased" | "fast" => Some(SpeedMode::Increased),
            _ => None,
        }
    }

    /// Unscaled scroll speed at the start of a round
    pub fn base_speed(&self) -> f32 {
        match self {
            SpeedMode::Normal => SPEED_NORMAL,
            SpeedMode::Slow => SPEED_SLOW,
            SpeedMode::Increased => SPEED_INCREASED_START,
        }
    }
}

/// Session flags and world dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Hazards are non-lethal
    pub god_mode: bool,
    /// Players pass through each other
    pub ghost_mode: bool,
    /// Vertical excursions clamp instead of killing
    pub borderless_mode: bool,
    pub speed_mode: SpeedMode,

    /// Simulation updates per second
    pub tick_rate: u32,
    /// World scale factor (tile size = 32 * scale, rounded up)
    pub scale: f32,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            god_mode: false,
            ghost_mode: false,
            borderless_mode: false,
            speed_mode: SpeedMode::Normal,
            tick_rate: TICK_RATE,
            scale: WINDOW_HEIGHT / (TILES_DEFAULT_SIZE * TILES_IN_HEIGHT as f32),
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
        }
    }
}

impl SessionConfig {
    /// Config for a window size, scaling the world to fit its height
    pub fn for_window(width: f32, height: f32) -> Self {
        Self {
            scale: height / (TILES_DEFAULT_SIZE * TILES_IN_HEIGHT as f32),
            window_width: width,
            window_height: height,
            ..Self::default()
        }
    }

    /// Parse a snapshot handed over by the settings collaborator
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Scaled tile edge in pixels
    pub fn tile_size(&self) -> f32 {
        (TILES_DEFAULT_SIZE * self.scale).ceil()
    }

    /// Width of one level chunk in pixels
    pub fn level_width(&self) -> f32 {
        self.tile_size() * TILES_IN_WIDTH as f32
    }

    /// Scroll speed a round starts with
    pub fn base_speed(&self) -> f32 {
        self.speed_mode.base_speed() * self.scale
    }

    pub fn bonus_ticks(&self) -> u32 {
        secs_to_ticks(BONUS_DURATION_SECS, self.tick_rate)
    }

    pub fn flip_cooldown_ticks(&self) -> u32 {
        secs_to_ticks(GRAVITY_FLIP_COOLDOWN_SECS, self.tick_rate)
    }

    pub fn countdown_ticks(&self) -> u32 {
        secs_to_ticks(COUNTDOWN_SECS, self.tick_rate)
    }

    pub fn speed_step_ticks(&self) -> u32 {
        secs_to_ticks(SPEED_STEP_SECS, self.tick_rate)
    }
}
