//! AI - Opponent motion policy
//!
//! Opponents turn left by a fixed step every tick and drive forward, which
//! traces a circle. There is no track following.

use crate::game_server::vehicle::{Vehicle, VehicleState};

pub struct AiPolicy;

impl AiPolicy {
    /// Default heading decrement per tick, in degrees
    pub const TURN_STEP: f32 = 1.0;

    pub fn step(vehicle: &mut VehicleState, turn_step: f32) {
        Vehicle::turn(vehicle, -turn_step);
        Vehicle::advance(vehicle, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_server::skins::{Controller, Rgb, VehicleIdentity};
    use crate::game_server::vehicle::heading_vector;
    use glam::Vec2;

    fn ai_kart(heading: f32) -> VehicleState {
        let identity = VehicleIdentity {
            controller: Controller::Ai(0),
            skin: "Bowser".into(),
            color: Rgb(10, 20, 30),
        };
        VehicleState::new(identity, Vec2::new(400.0, 300.0), heading, 5.0)
    }

    #[test]
    fn test_72_ticks_rotate_minus_72() {
        for start in [0.0_f32, 10.0, 180.0, 300.0] {
            let mut kart = ai_kart(start);
            for _ in 0..72 {
                AiPolicy::step(&mut kart, AiPolicy::TURN_STEP);
            }
            assert_eq!(kart.heading, (start - 72.0).rem_euclid(360.0));
        }
    }

    #[test]
    fn test_moves_along_new_heading() {
        let mut kart = ai_kart(180.0);
        AiPolicy::step(&mut kart, AiPolicy::TURN_STEP);
        let expected = Vec2::new(400.0, 300.0) + heading_vector(179.0) * 5.0;
        assert!(kart.position.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn test_full_circle_returns_near_start() {
        let mut kart = ai_kart(90.0);
        for _ in 0..360 {
            AiPolicy::step(&mut kart, AiPolicy::TURN_STEP);
        }
        assert_eq!(kart.heading, 90.0);
        assert!(kart.position.abs_diff_eq(Vec2::new(400.0, 300.0), 0.05));
    }
}
