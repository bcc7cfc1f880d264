//! Player entity: sprite box, hitbox collider and kinematic body
//!
//! `pos` is the sprite's top-left corner. The collision box is the middle
//! third of the sprite and always tracks `pos`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{GravityDirection, KinematicBody};
use super::collider::{Collider, DebugCanvas, Rect};
use crate::consts::*;

/// Default flip keys per slot (W, Up arrow, G, P as virtual key codes)
pub const DEFAULT_GRAVITY_KEYS: [u32; MAX_PLAYERS] = [87, 38, 71, 80];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: usize,
    /// Sprite top-left corner
    pub pos: Vec2,
    /// Sprite size
    pub size: Vec2,
    pub collider: Collider,
    pub body: KinematicBody,
    pub is_dead: bool,
    /// Slot not taking part in the round
    pub is_inactive: bool,
    /// Set while another player stands on this one
    pub disable_controls: bool,
    pub disable_gravity: bool,
    pub consumed_bonus: bool,
    /// Ticks since the current bonus was collected
    pub bonus_ticks: u32,
    /// Ticks left before another gravity flip is accepted
    pub flip_cooldown: u32,
    /// Leftward drift captured at death
    pub death_speed: f32,
    pub change_gravity_key: u32,
}

impl Player {
    pub fn new(id: usize, scale: f32, change_gravity_key: u32) -> Self {
        let size = Vec2::splat(PLAYER_SPRITE_SIZE * scale);
        let hitbox = size / 3.0;
        Self {
            id,
            pos: Vec2::ZERO,
            size,
            collider: Collider::new_box(hitbox.x, hitbox.y, hitbox.x, hitbox.y),
            body: KinematicBody::new(PLAYER_MASS, GRAVITY_SCALE),
            is_dead: false,
            is_inactive: false,
            disable_controls: false,
            disable_gravity: false,
            consumed_bonus: false,
            bonus_ticks: 0,
            flip_cooldown: 0,
            death_speed: 0.0,
            change_gravity_key,
        }
    }

    #[inline]
    fn hitbox_offset(&self) -> Vec2 {
        self.size / 3.0
    }

    /// Collision box in world space
    pub fn hitbox(&self) -> Rect {
        self.collider.bounds()
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
        let corner = pos + self.hitbox_offset();
        self.collider.update_bounds(corner.x, corner.y);
    }

    pub fn set_x(&mut self, x: f32) {
        self.set_pos(Vec2::new(x, self.pos.y));
    }

    pub fn set_y(&mut self, y: f32) {
        self.set_pos(Vec2::new(self.pos.x, y));
    }

    /// Place the hitbox bottom at `y`
    pub fn snap_bottom_to(&mut self, y: f32) {
        let hitbox = self.hitbox();
        self.set_y(y - hitbox.h - self.hitbox_offset().y);
    }

    /// Place the hitbox top at `y`
    pub fn snap_top_to(&mut self, y: f32) {
        self.set_y(y - self.hitbox_offset().y);
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead && !self.is_inactive
    }

    /// Per-tick motion: dead players drift, live players integrate
    pub fn update(&mut self) {
        if self.is_inactive {
            return;
        }
        if self.is_dead {
            self.set_x(self.pos.x - self.death_speed);
            return;
        }

        self.flip_cooldown = self.flip_cooldown.saturating_sub(1);

        // Vertical motion restarts every tick; the resolver gates it
        self.body.velocity.y = 0.0;
        let mut pos = self.pos;
        self.body.integrate(&mut pos, !self.disable_gravity);
        self.set_pos(pos);
    }

    /// Flip gravity if controls allow it; returns whether it flipped
    pub fn request_gravity_flip(&mut self, cooldown_ticks: u32) -> bool {
        if !self.is_alive() || self.disable_controls || self.flip_cooldown > 0 {
            return false;
        }
        self.body.change_gravity();
        self.flip_cooldown = cooldown_ticks;
        true
    }

    /// Point gravity down without the flip cooldown (round start)
    pub fn force_gravity_down(&mut self) {
        if self.body.gravity_direction == GravityDirection::Up {
            self.body.change_gravity();
        }
    }

    /// Mark dead and drift left at `speed`; false if already dead
    pub fn kill(&mut self, speed: f32) -> bool {
        if self.is_dead {
            return false;
        }
        self.is_dead = true;
        self.death_speed = speed;
        self.body.velocity.x = -speed;
        true
    }

    /// Revive at `pos` for a new round
    pub fn reset_for_round(&mut self, pos: Vec2, active: bool) {
        self.body = KinematicBody::new(self.body.mass, self.body.gravity_scale);
        self.is_dead = false;
        self.is_inactive = !active;
        self.disable_controls = false;
        self.disable_gravity = false;
        self.consumed_bonus = false;
        self.bonus_ticks = 0;
        self.flip_cooldown = 0;
        self.death_speed = 0.0;
        self.set_pos(pos);
    }

    pub fn draw_debug(&self, canvas: &mut impl DebugCanvas) {
        if !self.is_inactive {
            self.collider.draw(canvas);
        }
    }
}
