//! Level chunks: immutable templates and their live copies

use serde::Serialize;

use super::collider::DebugCanvas;
use super::object::GameObject;
use super::tile::Tile;

/// A parsed level as authored, positioned at offset 0
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelTemplate {
    /// Quoted parameter string from the header line (`spawn_p2`, ...)
    pub params: String,
    pub tiles: Vec<Tile>,
    pub objects: Vec<GameObject>,
}

impl LevelTemplate {
    pub fn new(params: impl Into<String>) -> Self {
        Self {
            params: params.into(),
            tiles: Vec::new(),
            objects: Vec::new(),
        }
    }

    pub fn is_spawn(&self) -> bool {
        self.params.starts_with("spawn")
    }
}

/// A live level chunk scrolling through the world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    pub params: String,
    pub tiles: Vec<Tile>,
    pub objects: Vec<GameObject>,
    /// Horizontal world position of the level's left edge
    pub x_offset: f32,
    /// Offset change applied on the last advance
    pub x_offset_velocity: f32,
}

impl Level {
    /// Deep-copy `template` into a live level with its left edge at `x_offset`
    pub fn instantiate(template: &LevelTemplate, x_offset: f32) -> Self {
        let mut level = Self {
            params: template.params.clone(),
            tiles: template.tiles.clone(),
            objects: template.objects.clone(),
            x_offset,
            x_offset_velocity: 0.0,
        };
        level.place_contents();
        level
    }

    pub fn is_spawn(&self) -> bool {
        self.params.starts_with("spawn")
    }

    /// Scroll by `velocity` for one tick, carrying tiles and objects along
    pub fn advance(&mut self, velocity: f32) {
        self.x_offset_velocity = velocity;
        self.x_offset += velocity;
        for object in &mut self.objects {
            object.update();
        }
        self.place_contents();
    }

    fn place_contents(&mut self) {
        for tile in &mut self.tiles {
            tile.carry_velocity_x = self.x_offset_velocity;
            tile.place(self.x_offset);
        }
        for object in &mut self.objects {
            object.place(self.x_offset);
        }
    }

    /// World x of the level's right edge
    pub fn right_edge(&self, level_width: f32) -> f32 {
        self.x_offset + level_width
    }

    pub fn draw_debug(&self, canvas: &mut impl DebugCanvas) {
        for tile in &self.tiles {
            tile.draw_debug(canvas);
        }
        for object in &self.objects {
            object.draw_debug(canvas);
        }
    }
}
