//! Kinematic body: force accumulation, gravity and axis gating
//!
//! The resolver gates motion by clearing `able_to_up` / `able_to_down` after
//! a tick's integration. The next `integrate` honours the gates and then
//! re-opens them, so a gate only lives for one tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which way "down" points for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GravityDirection {
    #[default]
    Down,
    Up,
}

impl GravityDirection {
    /// +1 for down (screen y grows downward), -1 for up
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            GravityDirection::Down => 1.0,
            GravityDirection::Up => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            GravityDirection::Down => GravityDirection::Up,
            GravityDirection::Up => GravityDirection::Down,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub mass: f32,
    pub gravity_scale: f32,
    pub gravity_direction: GravityDirection,
    pub able_to_up: bool,
    pub able_to_down: bool,
}

impl KinematicBody {
    pub fn new(mass: f32, gravity_scale: f32) -> Self {
        debug_assert!(mass > 0.0, "body mass must be positive");
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass,
            gravity_scale,
            gravity_direction: GravityDirection::Down,
            able_to_up: true,
            able_to_down: true,
        }
    }

    /// Accumulate a force (a = F / m) until the next integration
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force / self.mass;
    }

    /// Advance `position` by one tick
    pub fn integrate(&mut self, position: &mut Vec2, gravity_enabled: bool) {
        if self.able_to_down && gravity_enabled {
            let gravity = self.gravity_scale * self.gravity_direction.sign() * self.mass;
            self.apply_force(Vec2::new(0.0, gravity));
        }

        self.velocity += self.acceleration;

        if !self.able_to_down && self.velocity.y > 0.0 {
            self.velocity.y = 0.0;
        }
        if !self.able_to_up && self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }

        *position += self.velocity;
        debug_assert!(position.is_finite(), "body integrated to a non-finite position");

        self.acceleration = Vec2::ZERO;
        self.able_to_up = true;
        self.able_to_down = true;
    }

    /// Flip gravity instantly
    pub fn change_gravity(&mut self) {
        self.velocity.y = 0.0;
        self.gravity_direction = self.gravity_direction.flipped();
        self.able_to_up = true;
        self.able_to_down = true;
    }

    /// Block motion along gravity (standing on something)
    pub fn land(&mut self) {
        match self.gravity_direction {
            GravityDirection::Down => self.able_to_down = false,
            GravityDirection::Up => self.able_to_up = false,
        }
    }
}
