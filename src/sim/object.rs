//! Special level objects: hazards, pickups and decorations
//!
//! Objects are cloned out of an [`ObjectRegistry`] when a level is parsed and
//! cloned again when a level goes live. Sprite keys are `&'static str` so
//! every copy shares them.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collider::{DebugCanvas, Rect};
use crate::consts::*;

/// Speed modifiers a player can collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    SpeedUp,
    SpeedDown,
}

/// Back-and-forth motion of a movable saw, in the level-local frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SawPath {
    /// Destination in grid cells, as authored
    pub destination: (i32, i32),
    /// Vector from the start position to the destination
    pub travel: Vec2,
    /// Current displacement from the start position
    pub progress: Vec2,
    pub speed: f32,
    pub outbound: bool,
}

impl SawPath {
    fn step(&mut self) {
        let length = self.travel.length();
        if length <= f32::EPSILON {
            return;
        }
        let delta = self.travel / length * self.speed;
        if self.outbound {
            self.progress += delta;
            if self.progress.length() >= length {
                self.progress = self.travel;
                self.outbound = false;
            }
        } else {
            self.progress -= delta;
            if self.progress.dot(self.travel) <= 0.0 {
                self.progress = Vec2::ZERO;
                self.outbound = true;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HazardKind {
    Saw,
    MovableSaw(SawPath),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ObjectKind {
    Hazard(HazardKind),
    Pickup { kind: PickupKind, increment: f32 },
    /// Palm trees; `size_multiplier` scales the base sprite
    Decoration { size_multiplier: f32 },
}

/// A placed special object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameObject {
    /// Registry key, also the tag used in level descriptions
    pub tag: &'static str,
    pub sprite: &'static str,
    /// Grid coordinates as authored (1-based)
    pub grid: Vec2,
    /// Start position inside the level, in pixels
    pub local: Vec2,
    /// World position
    pub pos: Vec2,
    /// Unscaled-by-multiplier size of the collision bounds or sprite
    pub size: Vec2,
    /// Draw layer: -1 behind players, 0 tile layer, 1 in front
    pub z_index: i8,
    pub kind: ObjectKind,
}

impl GameObject {
    /// Position at a 1-based grid cell
    pub fn at(mut self, grid: Vec2, tile_size: f32) -> Self {
        self.grid = grid;
        self.local = (grid - Vec2::ONE) * tile_size;
        self.pos = self.local;
        self
    }

    /// Attach a movable-saw path ending at `destination` (grid cells, not offset)
    ///
    /// Returns `None` when the path has zero length.
    pub fn with_path(mut self, destination: (i32, i32), tile_size: f32) -> Option<Self> {
        let ObjectKind::Hazard(HazardKind::MovableSaw(path)) = &mut self.kind else {
            return Some(self);
        };
        let end = Vec2::new(destination.0 as f32, destination.1 as f32) * tile_size;
        let travel = end - self.local;
        if travel.length() <= f32::EPSILON {
            return None;
        }
        path.destination = destination;
        path.travel = travel;
        path.progress = Vec2::ZERO;
        path.outbound = true;
        Some(self)
    }

    pub fn with_size_multiplier(mut self, multiplier: f32) -> Self {
        if let ObjectKind::Decoration { size_multiplier } = &mut self.kind {
            *size_multiplier = multiplier;
        }
        self
    }

    /// Advance per-object motion by one tick
    pub fn update(&mut self) {
        if let ObjectKind::Hazard(HazardKind::MovableSaw(path)) = &mut self.kind {
            path.step();
        }
    }

    /// Re-derive the world position from the level offset
    pub fn place(&mut self, x_offset: f32) {
        let motion = match &self.kind {
            ObjectKind::Hazard(HazardKind::MovableSaw(path)) => path.progress,
            _ => Vec2::ZERO,
        };
        self.pos = self.local + motion + Vec2::new(x_offset, 0.0);
    }

    /// Rendered size, including a decoration's multiplier
    pub fn draw_size(&self) -> Vec2 {
        match self.kind {
            ObjectKind::Decoration { size_multiplier } => self.size * size_multiplier,
            _ => self.size,
        }
    }

    pub fn bounds(&self) -> Rect {
        let size = self.draw_size();
        Rect::new(self.pos.x, self.pos.y, size.x, size.y)
    }

    /// Whether the object's contact shape overlaps `rect`
    ///
    /// Saws are round; pickups use their box. Decorations never touch.
    pub fn touches(&self, rect: &Rect) -> bool {
        match self.kind {
            ObjectKind::Hazard(_) => self.bounds().ellipse_intersects(rect),
            ObjectKind::Pickup { .. } => self.bounds().intersects(rect),
            ObjectKind::Decoration { .. } => false,
        }
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self.kind, ObjectKind::Hazard(_))
    }

    /// Extra fields this object carries in a level description
    pub fn extra_fields(&self) -> Vec<String> {
        match &self.kind {
            ObjectKind::Hazard(HazardKind::MovableSaw(path)) => {
                vec![path.destination.0.to_string(), path.destination.1.to_string()]
            }
            ObjectKind::Decoration { size_multiplier } => vec![size_multiplier.to_string()],
            _ => Vec::new(),
        }
    }

    pub fn draw_debug(&self, canvas: &mut impl DebugCanvas) {
        match self.kind {
            ObjectKind::Hazard(_) => canvas.fill_ellipse(&self.bounds()),
            ObjectKind::Pickup { .. } => canvas.fill_rect(&self.bounds()),
            ObjectKind::Decoration { .. } => {}
        }
    }
}

/// Prototype objects keyed by their level-description tag
#[derive(Debug, Clone)]
pub struct ObjectRegistry {
    prototypes: HashMap<&'static str, GameObject>,
}

impl ObjectRegistry {
    /// The standard object set, sized for `scale` and `tile_size`
    pub fn standard(scale: f32, tile_size: f32) -> Self {
        let saw = SAW_SIZE * scale;
        let tile = Vec2::splat(tile_size);

        let mut prototypes = HashMap::new();
        let mut add = |tag: &'static str, sprite: &'static str, size: Vec2, z_index: i8, kind: ObjectKind| {
            prototypes.insert(
                tag,
                GameObject {
                    tag,
                    sprite,
                    grid: Vec2::ONE,
                    local: Vec2::ZERO,
                    pos: Vec2::ZERO,
                    size,
                    z_index,
                    kind,
                },
            );
        };

        add("Saw", "saw", Vec2::splat(saw), 1, ObjectKind::Hazard(HazardKind::Saw));
        add(
            "MovableSaw",
            "saw",
            Vec2::splat(saw),
            1,
            ObjectKind::Hazard(HazardKind::MovableSaw(SawPath {
                destination: (0, 0),
                travel: Vec2::ZERO,
                progress: Vec2::ZERO,
                speed: MOVABLE_SAW_SPEED,
                outbound: true,
            })),
        );
        add(
            "SpeedUp",
            "power_ups",
            tile,
            0,
            ObjectKind::Pickup { kind: PickupKind::SpeedUp, increment: SPEED_UP_INCREMENT },
        );
        add(
            "SpeedDown",
            "power_ups",
            tile,
            0,
            ObjectKind::Pickup { kind: PickupKind::SpeedDown, increment: SPEED_DOWN_INCREMENT },
        );

        let palm = |w: f32, h: f32| Vec2::new(w, h) * scale;
        let decoration = ObjectKind::Decoration { size_multiplier: 1.0 };
        add("BackPalm1", "palm_back_1", palm(64.0, 64.0), -1, decoration.clone());
        add("BackPalm2", "palm_back_2", palm(51.0, 53.0), -1, decoration.clone());
        add("BackPalm3", "palm_back_3", palm(52.0, 53.0), -1, decoration.clone());
        add("FrontPalm1", "palm_front_1", palm(39.0, 96.0), 1, decoration.clone());
        add("FrontPalm2", "palm_front_2", palm(78.0, 64.0), 1, decoration.clone());
        add("FrontPalm3", "palm_front_3", palm(39.0, 64.0), 1, decoration);

        Self { prototypes }
    }

    /// A fresh copy of the prototype for `tag`
    pub fn spawn(&self, tag: &str) -> Option<GameObject> {
        self.prototypes.get(tag).cloned()
    }

    /// Number of extra fields a `tag` line carries after the type tag
    pub fn extra_field_count(&self, tag: &str) -> Option<usize> {
        self.prototypes.get(tag).map(|proto| match proto.kind {
            ObjectKind::Hazard(HazardKind::MovableSaw(_)) => 2,
            ObjectKind::Decoration { .. } => 1,
            _ => 0,
        })
    }
}
