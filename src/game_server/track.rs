//! Track - Oval geometry, confinement and the finish gate
//!
//! The drivable region is the annulus between two axis-aligned ellipses.
//! Geometry is fixed for the lifetime of a race.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::game_server::vehicle::VehicleState;

/// Track plane size
pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;

/// Axis-aligned rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x * 0.5, center.y - size.y * 0.5, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Inclusive on every edge
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

/// Ellipse inscribed in its bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub bounds: Rect,
}

impl Ellipse {
    pub const fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let radii = Vec2::new(self.bounds.width, self.bounds.height) * 0.5;
        let offset = (point - self.bounds.center()) / radii;
        offset.length_squared() <= 1.0
    }
}

/// Static track data handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackGeometry {
    pub outer: Rect,
    pub inner: Rect,
    pub finish_gate: Rect,
}

/// The oval track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub outer: Ellipse,
    pub inner: Ellipse,
    pub finish_gate: Rect,
}

impl Default for Track {
    fn default() -> Self {
        Self::oval()
    }
}

impl Track {
    /// The standard 800x600 oval with its gate on the bottom straight
    pub fn oval() -> Self {
        Self {
            outer: Ellipse::new(Rect::new(100.0, 100.0, 600.0, 400.0)),
            inner: Ellipse::new(Rect::new(150.0, 150.0, 500.0, 300.0)),
            finish_gate: Rect::new(380.0, 450.0, 40.0, 50.0),
        }
    }

    /// Inside the outer boundary. The infield is not excluded.
    pub fn is_inside_drivable_area(&self, point: Vec2) -> bool {
        self.outer.contains(point)
    }

    pub fn is_in_infield(&self, point: Vec2) -> bool {
        self.inner.contains(point)
    }

    pub fn is_in_finish_gate(&self, point: Vec2) -> bool {
        self.finish_gate.contains(point)
    }

    /// Clamp a vehicle whose center left the outer bounding rectangle back
    /// inside it, inset by the vehicle's half extents. Axes clamp
    /// independently and heading is never touched.
    pub fn confine(&self, vehicle: &mut VehicleState) {
        let bounds = self.outer.bounds;
        if bounds.contains(vehicle.position) {
            return;
        }

        let half = vehicle.half_extents();
        let min = Vec2::new(bounds.left() + half.x, bounds.top() + half.y);
        let max = Vec2::new(bounds.right() - half.x, bounds.bottom() - half.y);
        let clamped = vehicle.position.max(min).min(max);

        log::trace!(
            "Confined {} from ({:.1}, {:.1}) to ({:.1}, {:.1})",
            vehicle.identity.skin,
            vehicle.position.x,
            vehicle.position.y,
            clamped.x,
            clamped.y
        );
        vehicle.set_position(clamped);
    }

    pub fn geometry(&self) -> TrackGeometry {
        TrackGeometry {
            outer: self.outer.bounds,
            inner: self.inner.bounds,
            finish_gate: self.finish_gate,
        }
    }
}
