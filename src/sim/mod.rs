//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (level picks)
//! - Stable iteration order (levels in offset order, players by slot)
//! - No rendering, audio or input-device dependencies

pub mod body;
pub mod collider;
pub mod collision;
pub mod level;
pub mod loader;
pub mod object;
pub mod player;
pub mod state;
pub mod streaming;
pub mod tick;
pub mod tile;

pub use body::{GravityDirection, KinematicBody};
pub use collider::{Collider, DebugCanvas, Polygon, Rect};
pub use collision::resolve;
pub use level::{Level, LevelTemplate};
pub use loader::{LevelCatalog, LevelLoadError};
pub use object::{GameObject, HazardKind, ObjectKind, ObjectRegistry, PickupKind, SawPath};
pub use player::{DEFAULT_GRAVITY_KEYS, Player};
pub use state::{DeathCause, GameEvent, GamePhase, GameState};
pub use streaming::WorldStreamer;
pub use tick::{TickInput, tick};
pub use tile::Tile;
