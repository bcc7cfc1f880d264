//! Collision shapes for tiles and players
//!
//! A collider is either an axis-aligned box or a fixed polygon. Both are
//! positioned through `update_bounds`, which moves the shape without
//! changing its size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Strict overlap test; touching edges do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    /// Same size, shifted by (dx, dy)
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Shrink by `fraction` of the height at the top and at the bottom
    pub fn inset_vertical(&self, fraction: f32) -> Rect {
        Rect::new(
            self.x,
            self.y + self.h * fraction,
            self.w,
            self.h * (1.0 - 2.0 * fraction),
        )
    }

    /// Shrink by `fraction` of the width at the left and at the right
    pub fn inset_horizontal(&self, fraction: f32) -> Rect {
        Rect::new(
            self.x + self.w * fraction,
            self.y,
            self.w * (1.0 - 2.0 * fraction),
            self.h,
        )
    }

    /// Whether the ellipse inscribed in `self` overlaps `other`
    ///
    /// Scales space so the ellipse becomes the unit circle, then tests the
    /// closest point of the (scaled) rectangle against it.
    pub fn ellipse_intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let radii = Vec2::new(self.w, self.h) * 0.5;
        let center = Vec2::new(self.x, self.y) + radii;
        let closest = Vec2::new(
            center.x.clamp(other.x, other.max_x()),
            center.y.clamp(other.y, other.max_y()),
        );
        ((closest - center) / radii).length_squared() < 1.0
    }
}

/// Convex or concave outline stored relative to its origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    origin: Vec2,
    points: Vec<Vec2>,
}

impl Polygon {
    /// `points` are relative to `origin`
    pub fn new(origin: Vec2, points: Vec<Vec2>) -> Self {
        Self { origin, points }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Vertices in world space
    pub fn world_points(&self) -> Vec<Vec2> {
        self.points.iter().map(|p| *p + self.origin).collect()
    }

    /// Axis-aligned bounds in world space
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::new(self.origin.x, self.origin.y, 0.0, 0.0);
        };
        let (min, max) = self
            .points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Rect::new(
            self.origin.x + min.x,
            self.origin.y + min.y,
            max.x - min.x,
            max.y - min.y,
        )
    }
}

/// Receiver for collider debug outlines, implemented by the renderer
pub trait DebugCanvas {
    fn fill_rect(&mut self, rect: &Rect);
    fn fill_polygon(&mut self, points: &[Vec2]);
    fn fill_ellipse(&mut self, bounds: &Rect) {
        self.fill_rect(bounds);
    }
}

/// Collision shape owned by a tile or a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Box(Rect),
    Polygon(Polygon),
}

impl Collider {
    pub fn new_box(x: f32, y: f32, w: f32, h: f32) -> Self {
        debug_assert!(w >= 0.0 && h >= 0.0, "negative collider size");
        Collider::Box(Rect::new(x, y, w, h))
    }

    pub fn new_polygon(origin: Vec2, points: Vec<Vec2>) -> Self {
        Collider::Polygon(Polygon::new(origin, points))
    }

    /// Move the shape to (x, y), keeping its size and outline
    pub fn update_bounds(&mut self, x: f32, y: f32) {
        debug_assert!(x.is_finite() && y.is_finite(), "non-finite collider position");
        match self {
            Collider::Box(rect) => {
                rect.x = x;
                rect.y = y;
            }
            Collider::Polygon(polygon) => polygon.origin = Vec2::new(x, y),
        }
    }

    /// Anchor of the shape (box corner or polygon origin)
    pub fn position(&self) -> Vec2 {
        match self {
            Collider::Box(rect) => Vec2::new(rect.x, rect.y),
            Collider::Polygon(polygon) => polygon.origin,
        }
    }

    /// Axis-aligned bounds
    pub fn bounds(&self) -> Rect {
        match self {
            Collider::Box(rect) => *rect,
            Collider::Polygon(polygon) => polygon.bounds(),
        }
    }

    /// The box, for shapes that take part in solid collision
    pub fn as_box(&self) -> Option<&Rect> {
        match self {
            Collider::Box(rect) => Some(rect),
            Collider::Polygon(_) => None,
        }
    }

    pub fn draw(&self, canvas: &mut impl DebugCanvas) {
        match self {
            Collider::Box(rect) => canvas.fill_rect(rect),
            Collider::Polygon(polygon) => canvas.fill_polygon(&polygon.world_points()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Records what a collider asked to draw
    #[derive(Default)]
    pub(crate) struct RecordingCanvas {
        pub rects: Vec<Rect>,
        pub polygons: Vec<Vec<Vec2>>,
        pub ellipses: Vec<Rect>,
    }

    impl DebugCanvas for RecordingCanvas {
        fn fill_rect(&mut self, rect: &Rect) {
            self.rects.push(*rect);
        }

        fn fill_polygon(&mut self, points: &[Vec2]) {
            self.polygons.push(points.to_vec());
        }

        fn fill_ellipse(&mut self, bounds: &Rect) {
            self.ellipses.push(*bounds);
        }
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&b.offset(-0.5, 0.0)));
    }

    #[test]
    fn test_empty_rect_never_intersects() {
        let a = Rect::new(0.0, 0.0, 0.0, 10.0);
        let b = Rect::new(-5.0, -5.0, 20.0, 20.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn test_inset_vertical() {
        let r = Rect::new(0.0, 0.0, 10.0, 100.0).inset_vertical(0.1);
        assert!((r.y - 10.0).abs() < 1e-4);
        assert!((r.h - 80.0).abs() < 1e-4);
        assert_eq!(r.w, 10.0);
    }

    #[test]
    fn test_ellipse_corner_miss() {
        // Circle of radius 5 centred at (5, 5); a box just off its corner
        let circle = Rect::new(0.0, 0.0, 10.0, 10.0);
        let corner = Rect::new(9.0, 9.0, 5.0, 5.0);
        assert!(circle.intersects(&corner));
        assert!(!circle.ellipse_intersects(&corner));

        let side = Rect::new(9.0, 4.0, 5.0, 2.0);
        assert!(circle.ellipse_intersects(&side));
    }

    #[test]
    fn test_polygon_update_bounds_translates() {
        let mut collider = Collider::new_polygon(
            Vec2::new(0.0, 0.0),
            vec![Vec2::new(32.0, 32.0), Vec2::new(32.0, 0.0), Vec2::new(0.0, 32.0)],
        );
        collider.update_bounds(100.0, 50.0);
        assert_eq!(collider.position(), Vec2::new(100.0, 50.0));
        assert_eq!(collider.bounds(), Rect::new(100.0, 50.0, 32.0, 32.0));

        // Repeated updates are absolute, not cumulative
        collider.update_bounds(100.0, 50.0);
        assert_eq!(collider.bounds(), Rect::new(100.0, 50.0, 32.0, 32.0));
        assert!(collider.as_box().is_none());
    }

    #[test]
    fn test_draw_dispatch() {
        let mut canvas = RecordingCanvas::default();
        Collider::new_box(1.0, 2.0, 3.0, 4.0).draw(&mut canvas);
        Collider::new_polygon(Vec2::new(10.0, 0.0), vec![Vec2::ZERO, Vec2::X, Vec2::Y])
            .draw(&mut canvas);
        assert_eq!(canvas.rects, vec![Rect::new(1.0, 2.0, 3.0, 4.0)]);
        assert_eq!(
            canvas.polygons,
            vec![vec![Vec2::new(10.0, 0.0), Vec2::new(11.0, 0.0), Vec2::new(10.0, 1.0)]]
        );
    }

    proptest! {
        #[test]
        fn prop_box_update_bounds_keeps_size(
            w in 0.1f32..500.0,
            h in 0.1f32..500.0,
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
        ) {
            let mut collider = Collider::new_box(0.0, 0.0, w, h);
            collider.update_bounds(x, y);
            let bounds = collider.bounds();
            prop_assert_eq!(collider.position(), Vec2::new(x, y));
            prop_assert_eq!(bounds.w, w);
            prop_assert_eq!(bounds.h, h);
        }
    }
}
