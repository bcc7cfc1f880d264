//! Level tiles and their collision shapes
//!
//! Tiles keep the position they were authored at (level-local) and derive
//! their world position from the owning level's scroll offset.

use glam::Vec2;
use serde::Serialize;

use super::collider::{Collider, DebugCanvas, Rect};

/// Triangular slope outlines in tile units, relative to the tile corner
const SLOPES: &[(&str, [(f32, f32); 3])] = &[
    ("slide1-1", [(1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]),
    ("slide2-1", [(2.0, 1.0), (2.0, 0.0), (0.0, 1.0)]),
    ("slide3-1", [(3.0, 1.0), (3.0, 0.0), (0.0, 1.0)]),
    ("slide4-1", [(1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]),
    ("slide5-1", [(2.0, 1.0), (2.0, 0.0), (0.0, 0.0)]),
    ("slide6-1", [(3.0, 1.0), (3.0, 0.0), (0.0, 0.0)]),
    ("slide7-1", [(3.0, 1.0), (0.0, 1.0), (0.0, 0.0)]),
    ("slide8-1", [(2.0, 1.0), (0.0, 1.0), (0.0, 0.0)]),
    ("slide9-1", [(1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]),
    ("slide10-1", [(3.0, 0.0), (0.0, 1.0), (0.0, 0.0)]),
    ("slide11-1", [(2.0, 0.0), (0.0, 1.0), (0.0, 0.0)]),
    ("slide12-1", [(1.0, 0.0), (1.0, 0.0), (0.0, 0.0)]),
];

/// Decorative tags and the trailing cells of multi-cell slopes
const NON_SOLID: &[&str] = &[
    "grass",
    "spices",
    "slide2-2",
    "slide3-2",
    "slide3-3",
    "slide5-2",
    "slide6-2",
    "slide6-3",
    "slide7-2",
    "slide7-3",
    "slide8-2",
    "slide10-2",
    "slide10-3",
    "slide11-2",
];

/// Build the collider a tile with `tile_type` gets at `pos`
pub fn collider_for(tile_type: &str, pos: Vec2, tile_size: f32) -> Option<Collider> {
    if NON_SOLID.contains(&tile_type) {
        return None;
    }
    if tile_type == "platform" {
        let half = tile_size / 2.0;
        return Some(Collider::new_box(pos.x, pos.y, half, half));
    }
    if let Some((_, outline)) = SLOPES.iter().find(|(tag, _)| *tag == tile_type) {
        let points = outline
            .iter()
            .map(|&(x, y)| Vec2::new(x, y) * tile_size)
            .collect();
        return Some(Collider::new_polygon(pos, points));
    }
    Some(Collider::new_box(pos.x, pos.y, tile_size, tile_size))
}

/// A single grid cell of level geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    /// Grid coordinates as authored (1-based)
    pub grid: Vec2,
    /// Position inside the level, in pixels
    pub local: Vec2,
    /// World position (local shifted by the level offset)
    pub pos: Vec2,
    pub sprite_index: i32,
    pub tile_type: String,
    pub collider: Option<Collider>,
    /// Horizontal velocity handed to anything pushed by this tile
    pub carry_velocity_x: f32,
}

impl Tile {
    pub fn new(grid: Vec2, sprite_index: i32, tile_type: impl Into<String>, tile_size: f32) -> Self {
        let tile_type = tile_type.into();
        let local = (grid - Vec2::ONE) * tile_size;
        let collider = collider_for(&tile_type, local, tile_size);
        Self {
            grid,
            local,
            pos: local,
            sprite_index,
            tile_type,
            collider,
            carry_velocity_x: 0.0,
        }
    }

    /// Move to the world position for a level at `x_offset`
    pub fn place(&mut self, x_offset: f32) {
        self.pos = Vec2::new(self.local.x + x_offset, self.local.y);
        if let Some(collider) = &mut self.collider {
            collider.update_bounds(self.pos.x, self.pos.y);
        }
    }

    /// The box this tile blocks with in landing and wall resolution
    pub fn solid_box(&self) -> Option<&Rect> {
        self.collider.as_ref().and_then(Collider::as_box)
    }

    pub fn draw_debug(&self, canvas: &mut impl DebugCanvas) {
        if let Some(collider) = &self.collider {
            collider.draw(canvas);
        }
    }
}
