//! World streaming: keeps a bounded window of level chunks live
//!
//! Levels scroll left at the session speed. Chunks that have fully left the
//! screen are retired and random templates are appended at the right edge.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::level::Level;
use super::loader::LevelCatalog;
use super::state::GameEvent;
use crate::consts::*;
use crate::settings::{SessionConfig, SpeedMode};

#[derive(Debug, Clone)]
pub struct WorldStreamer {
    catalog: LevelCatalog,
    /// Live levels, ascending by offset
    active: Vec<Level>,
    max_concurrent: usize,
    level_width: f32,
    /// Current scroll speed (pixels per tick, positive = leftward)
    speed: f32,
    /// Ticks since the last speed ramp step
    speed_ticks: u32,
    rng: Pcg32,
}

impl WorldStreamer {
    pub fn new(catalog: LevelCatalog, config: &SessionConfig, seed: u64) -> Self {
        Self {
            catalog,
            active: Vec::new(),
            max_concurrent: MAX_CONCURRENT_LEVELS,
            level_width: config.level_width(),
            speed: config.base_speed(),
            speed_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Drop all live levels and restore the starting speed
    pub fn reset(&mut self, config: &SessionConfig) {
        self.active.clear();
        self.level_width = config.level_width();
        self.reset_speed(config);
    }

    pub fn reset_speed(&mut self, config: &SessionConfig) {
        self.speed = config.base_speed();
        self.speed_ticks = 0;
    }

    /// Seat the spawn levels for `player_count` players, left to right from 0
    pub fn seat_spawn_levels(&mut self, player_count: usize, events: &mut Vec<GameEvent>) {
        let templates: Vec<_> = self.catalog.spawn_templates(player_count).cloned().collect();
        if templates.is_empty() {
            log::warn!("No spawn level for {} players", player_count);
        }
        for template in &templates {
            let x_offset = self.active.len() as f32 * self.level_width;
            log::info!("Spawn level added: {} at {}", template.params, x_offset);
            self.active.push(Level::instantiate(template, x_offset));
            events.push(GameEvent::LevelSpawned {
                params: template.params.clone(),
                x_offset,
            });
        }
    }

    /// Scroll every live level by the current speed, ramping it first in
    /// increased-speed mode
    pub fn scroll(&mut self, config: &SessionConfig) {
        if config.speed_mode == SpeedMode::Increased {
            self.ramp_speed(config);
        }
        let velocity = -self.speed;
        for level in &mut self.active {
            level.advance(velocity);
        }
    }

    /// Keep levels in place for a tick (round-start countdown)
    pub fn hold(&mut self) {
        for level in &mut self.active {
            level.advance(0.0);
        }
    }

    fn ramp_speed(&mut self, config: &SessionConfig) {
        self.speed_ticks += 1;
        if self.speed_ticks < config.speed_step_ticks() {
            return;
        }
        self.speed_ticks = 0;
        let step = if self.speed >= SPEED_STEP_THRESHOLD {
            SPEED_STEP_SLOW
        } else {
            SPEED_STEP_FAST
        };
        self.speed += step * config.scale;
        log::debug!("Scroll speed increased to {:.3}", self.speed);
    }

    /// Retire levels that scrolled off screen, then top up the random pool
    pub fn maintain(&mut self, events: &mut Vec<GameEvent>) {
        let limit = -self.level_width;
        let (retired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|level| level.x_offset <= limit);
        self.active = kept;
        for level in retired {
            log::debug!("Level retired: {}", level.params);
            events.push(GameEvent::LevelRetired {
                params: level.params,
            });
        }

        let streamed = self.active.iter().filter(|l| !l.is_spawn()).count();
        if streamed < self.max_concurrent {
            self.spawn_random(events);
        }
    }

    fn spawn_random(&mut self, events: &mut Vec<GameEvent>) {
        let pool = &self.catalog.levels;
        if pool.is_empty() {
            return;
        }
        let index = self.rng.random_range(0..pool.len());
        let x_offset = self.right_edge();
        let level = Level::instantiate(&pool[index], x_offset);
        log::debug!("New level added: {} ({}) at {}", index, level.params, x_offset);
        events.push(GameEvent::LevelSpawned {
            params: level.params.clone(),
            x_offset,
        });
        self.active.push(level);
    }

    /// World x just past the rightmost live level, 0 when none are live
    pub fn right_edge(&self) -> f32 {
        self.active
            .iter()
            .map(|level| level.right_edge(self.level_width))
            .fold(None, |edge: Option<f32>, x| Some(edge.map_or(x, |e| e.max(x))))
            .unwrap_or(0.0)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn active_levels(&self) -> &[Level] {
        &self.active
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn level_width(&self) -> f32 {
        self.level_width
    }
}
