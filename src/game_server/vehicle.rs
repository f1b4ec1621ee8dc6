//! Vehicle - Individual kart state and motion
//!
//! Each vehicle has a position, heading and constant speed. The race
//! updates every vehicle once per tick, either from held controls or from
//! the AI policy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::game_server::input::{ControlScheme, ControlState};
use crate::game_server::skins::{Controller, Rgb, VehicleIdentity};
use crate::game_server::track::Rect;

/// Kart body size in track units (width, height)
pub const CAR_SIZE: Vec2 = Vec2::new(50.0, 100.0);

/// Wrap a heading in degrees to [0, 360)
pub fn normalize_heading(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Unit step along a heading, screen convention (y grows downward)
pub fn heading_vector(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), -radians.sin())
}

/// Complete state for a single vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleState {
    /// Center position on the track plane
    pub position: Vec2,
    /// Heading in degrees, always in [0, 360)
    pub heading: f32,
    /// Distance covered per tick
    pub speed: f32,
    /// Body size used for confinement and drawing
    pub size: Vec2,
    /// Body rectangle centered on `position`
    pub bounds: Rect,
    /// Completed laps
    pub laps: u32,
    /// Whether the center was inside the finish gate last tick
    pub in_finish_gate: bool,
    pub identity: VehicleIdentity,
}

impl VehicleState {
    pub fn new(identity: VehicleIdentity, position: Vec2, heading: f32, speed: f32) -> Self {
        Self {
            position,
            heading: normalize_heading(heading),
            speed,
            size: CAR_SIZE,
            bounds: Rect::from_center(position, CAR_SIZE),
            laps: 0,
            in_finish_gate: false,
            identity,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Move the center and keep the bounding box in sync
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.bounds = Rect::from_center(position, self.size);
    }

    pub fn is_human(&self) -> bool {
        self.identity.controller.is_human()
    }
}

/// Vehicle motion logic
pub struct Vehicle;

impl Vehicle {
    /// Heading change per tick while a turn control is held
    pub const TURN_STEP: f32 = 5.0;

    /// Rotate by `delta` degrees, keeping the heading normalized
    pub fn turn(state: &mut VehicleState, delta: f32) {
        state.heading = normalize_heading(state.heading + delta);
    }

    /// Advance `direction` speed-lengths along the current heading
    pub fn advance(state: &mut VehicleState, direction: f32) {
        let step = heading_vector(state.heading) * state.speed * direction;
        state.set_position(state.position + step);
    }

    /// Apply one tick of held controls. Turns are applied before movement.
    pub fn apply_control(state: &mut VehicleState, controls: ControlState) {
        if controls.turn_left {
            Self::turn(state, -Self::TURN_STEP);
        }
        if controls.turn_right {
            Self::turn(state, Self::TURN_STEP);
        }
        if controls.forward {
            Self::advance(state, 1.0);
        }
        if controls.backward {
            Self::advance(state, -1.0);
        }
    }
}

/// Per-vehicle render data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub controller: Controller,
    /// Keys a frontend should show for human vehicles
    pub control_scheme: Option<ControlScheme>,
    pub position: Vec2,
    pub heading: f32,
    pub size: Vec2,
    pub skin: String,
    pub color: Rgb,
    pub laps: u32,
}

impl From<&VehicleState> for VehicleSnapshot {
    fn from(state: &VehicleState) -> Self {
        Self {
            controller: state.identity.controller,
            control_scheme: match state.identity.controller {
                Controller::Human(slot) => Some(ControlScheme::for_slot(slot)),
                Controller::Ai(_) => None,
            },
            position: state.position,
            heading: state.heading,
            size: state.size,
            skin: state.identity.skin.clone(),
            color: state.identity.color,
            laps: state.laps,
        }
    }
}
