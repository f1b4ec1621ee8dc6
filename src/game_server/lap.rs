//! Lap - Finish-gate crossing detection
//!
//! A lap counts on the tick a vehicle's center enters the gate. Staying in
//! the gate does nothing until the vehicle has left it again.

use serde::{Deserialize, Serialize};

use crate::game_server::skins::Controller;
use crate::game_server::track::Track;
use crate::game_server::vehicle::VehicleState;

/// Which vehicles have their laps counted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LapScope {
    /// Only the first human
    Primary,
    /// Every human-driven vehicle
    #[default]
    Humans,
    /// Every vehicle, AI included
    All,
}

impl LapScope {
    pub fn tracks(self, controller: Controller) -> bool {
        match self {
            Self::Primary => controller == Controller::Human(0),
            Self::Humans => controller.is_human(),
            Self::All => true,
        }
    }
}

pub struct LapCounter;

impl LapCounter {
    /// Update the gate flag and lap count. Returns true on a new lap.
    pub fn check_finish(track: &Track, vehicle: &mut VehicleState) -> bool {
        if !track.is_in_finish_gate(vehicle.position) {
            vehicle.in_finish_gate = false;
            return false;
        }

        if vehicle.in_finish_gate {
            return false;
        }

        vehicle.in_finish_gate = true;
        vehicle.laps += 1;
        true
    }

    pub fn has_won(vehicle: &VehicleState, lap_target: u32) -> bool {
        vehicle.laps >= lap_target
    }
}
