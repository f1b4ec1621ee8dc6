//! Race - Race configuration and per-tick session state
//!
//! Handles vehicle setup, per-tick motion, lap counting and win detection.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::game_server::ai::AiPolicy;
use crate::game_server::input::InputFrame;
use crate::game_server::lap::{LapCounter, LapScope};
use crate::game_server::skins::{assign_ai_identities, Controller, Customization, SkinRegistry};
use crate::game_server::track::{Track, TrackGeometry, HEIGHT, WIDTH};
use crate::game_server::vehicle::{Vehicle, VehicleSnapshot, VehicleState, CAR_SIZE};

/// Race configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Laps needed to win
    pub lap_target: u32,
    /// Seconds the win message stays up before the session ends
    pub win_dwell_secs: f32,
    /// Opponents in player-vs-AI mode, capped by free skins
    pub ai_opponents: usize,
    /// Distance every vehicle covers per tick
    pub vehicle_speed: f32,
    /// AI heading decrement per tick, in degrees
    pub ai_turn_step: f32,
    /// Which vehicles have laps counted
    pub lap_scope: LapScope,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            lap_target: 3,
            win_dwell_secs: 3.0,
            ai_opponents: 3,
            vehicle_speed: 5.0,
            ai_turn_step: AiPolicy::TURN_STEP,
            lap_scope: LapScope::default(),
        }
    }
}

/// Optional behaviours. `full` is the lap race, `basic` the free drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Offer the mode-select screen; otherwise always player-vs-AI
    pub mode_select: bool,
    /// Opponents drive; otherwise they stay parked
    pub ai_motion: bool,
    /// Count laps and end the race on a win
    pub lap_counting: bool,
}

impl FeatureSet {
    pub const FULL: Self = Self {
        mode_select: true,
        ai_motion: true,
        lap_counting: true,
    };

    pub const BASIC: Self = Self {
        mode_select: false,
        ai_motion: false,
        lap_counting: false,
    };
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::FULL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    TwoPlayer,
    PlayerVsAi,
}

impl GameMode {
    pub fn human_count(self) -> usize {
        match self {
            Self::TwoPlayer => 2,
            Self::PlayerVsAi => 1,
        }
    }
}

/// Race status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceStatus {
    Racing,
    Finished,
}

/// Overlay text drawn above the race
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub laps: Vec<String>,
    pub win_message: Option<String>,
}

/// Complete race state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    /// Race configuration
    pub config: RaceConfig,
    pub features: FeatureSet,
    pub mode: GameMode,
    pub track: Track,
    /// Humans first, then AI
    pub vehicles: Vec<VehicleState>,
    pub status: RaceStatus,
    /// Index into `vehicles` of the winner
    pub winner: Option<usize>,
    /// Ticks simulated so far
    pub ticks: u64,
    /// Ticks of win display left once finished
    pub dwell_remaining: u32,
}

impl Race {
    /// Build a fresh race. Fails if any human identity is incomplete.
    pub fn new<R: Rng + ?Sized>(
        config: RaceConfig,
        features: FeatureSet,
        mode: GameMode,
        customization: &Customization,
        registry: &dyn SkinRegistry,
        tick_rate: u32,
        rng: &mut R,
    ) -> Result<Self> {
        let humans = customization.resolve(mode.human_count(), registry)?;
        let opponents = match mode {
            GameMode::PlayerVsAi => assign_ai_identities(config.ai_opponents, &humans, registry, rng),
            GameMode::TwoPlayer => Vec::new(),
        };

        let speed = config.vehicle_speed;
        let mut vehicles = Vec::with_capacity(humans.len() + opponents.len());
        for (slot, identity) in humans.into_iter().enumerate() {
            let start = Vec2::new(WIDTH / 4.0, HEIGHT / 2.0 + slot as f32 * 80.0);
            vehicles.push(VehicleState::new(identity, start, 0.0, speed));
        }
        for (slot, identity) in opponents.into_iter().enumerate() {
            // facing the player
            let start = Vec2::new(WIDTH / 2.0 + slot as f32 * CAR_SIZE.x * 2.0, HEIGHT / 2.0);
            vehicles.push(VehicleState::new(identity, start, 180.0, speed));
        }

        let dwell_remaining = (config.win_dwell_secs * tick_rate as f32).round() as u32;

        Ok(Self {
            config,
            features,
            mode,
            track: Track::oval(),
            vehicles,
            status: RaceStatus::Racing,
            winner: None,
            ticks: 0,
            dwell_remaining,
        })
    }

    /// Advance one tick. Returns true once the win dwell has elapsed.
    pub fn update(&mut self, input: &InputFrame) -> bool {
        match self.status {
            RaceStatus::Racing => {
                self.ticks += 1;
                self.drive(input);
                if self.features.lap_counting {
                    self.detect_finishes();
                }
                false
            }

            RaceStatus::Finished => {
                self.dwell_remaining = self.dwell_remaining.saturating_sub(1);
                self.dwell_remaining == 0
            }
        }
    }

    fn drive(&mut self, input: &InputFrame) {
        let ai_motion = self.features.ai_motion;
        let ai_turn_step = self.config.ai_turn_step;

        for vehicle in &mut self.vehicles {
            match vehicle.identity.controller {
                Controller::Human(slot) => Vehicle::apply_control(vehicle, input.control(slot)),
                Controller::Ai(_) if ai_motion => AiPolicy::step(vehicle, ai_turn_step),
                Controller::Ai(_) => {}
            }
            self.track.confine(vehicle);
        }
    }

    fn detect_finishes(&mut self) {
        let scope = self.config.lap_scope;
        let target = self.config.lap_target;

        for (index, vehicle) in self.vehicles.iter_mut().enumerate() {
            if !scope.tracks(vehicle.identity.controller) {
                continue;
            }
            if !LapCounter::check_finish(&self.track, vehicle) {
                continue;
            }

            log::info!(
                "{} ({:?}) completed lap {}/{}",
                vehicle.identity.skin,
                vehicle.identity.controller,
                vehicle.laps,
                target
            );

            if self.winner.is_none() && LapCounter::has_won(vehicle, target) {
                log::info!("{} wins after {} ticks", vehicle.identity.skin, self.ticks);
                self.winner = Some(index);
                self.status = RaceStatus::Finished;
            }
        }
    }

    fn overlay(&self) -> Overlay {
        if !self.features.lap_counting {
            return Overlay::default();
        }

        let laps = self
            .vehicles
            .iter()
            .filter_map(|v| match v.identity.controller {
                Controller::Human(slot) if self.config.lap_scope.tracks(v.identity.controller) => {
                    Some(format!("P{} Lap {}/{}", slot + 1, v.laps, self.config.lap_target))
                }
                _ => None,
            })
            .collect();

        let win_message = self.get_winner().map(|v| match (self.mode, v.identity.controller) {
            (GameMode::PlayerVsAi, Controller::Human(_)) => "You Win!".to_string(),
            (_, Controller::Human(slot)) => format!("Player {} Wins!", slot + 1),
            (_, Controller::Ai(_)) => format!("{} Wins!", v.identity.skin),
        });

        Overlay { laps, win_message }
    }

    /// Get render snapshot
    pub fn get_snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            status: self.status,
            mode: self.mode,
            ticks: self.ticks,
            track: self.track.geometry(),
            vehicles: self.vehicles.iter().map(VehicleSnapshot::from).collect(),
            overlay: self.overlay(),
        }
    }

    pub fn get_winner(&self) -> Option<&VehicleState> {
        self.winner.and_then(|i| self.vehicles.get(i))
    }

    /// The primary human, always first
    pub fn player(&self) -> Option<&VehicleState> {
        self.vehicles.first()
    }
}

/// Race render state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub status: RaceStatus,
    pub mode: GameMode,
    pub ticks: u64,
    pub track: TrackGeometry,
    pub vehicles: Vec<VehicleSnapshot>,
    pub overlay: Overlay,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_server::input::ControlState;
    use crate::game_server::skins::CharacterRoster;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn race(mode: GameMode, features: FeatureSet) -> Race {
        let mut rng = StdRng::seed_from_u64(42);
        Race::new(
            RaceConfig::default(),
            features,
            mode,
            &Customization::default(),
            &CharacterRoster,
            60,
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn test_player_vs_ai_layout() {
        let race = race(GameMode::PlayerVsAi, FeatureSet::FULL);
        assert_eq!(race.vehicles.len(), 4);

        let player = race.player().unwrap();
        assert_eq!(player.position, Vec2::new(200.0, 300.0));
        assert_eq!(player.identity.controller, Controller::Human(0));

        for (i, ai) in race.vehicles[1..].iter().enumerate() {
            assert_eq!(ai.identity.controller, Controller::Ai(i));
            assert_eq!(ai.heading, 180.0);
            assert_eq!(ai.position, Vec2::new(400.0 + i as f32 * 100.0, 300.0));
            assert_ne!(ai.identity.skin, "Mario");
        }
        assert_eq!(race.dwell_remaining, 180);
    }

    #[test]
    fn test_two_player_has_no_ai() {
        let race = race(GameMode::TwoPlayer, FeatureSet::FULL);
        assert_eq!(race.vehicles.len(), 2);
        assert!(race.vehicles.iter().all(VehicleState::is_human));
        assert_eq!(race.vehicles[1].identity.skin, "Luigi");
    }

    #[test]
    fn test_controls_route_by_slot() {
        let mut race = race(GameMode::TwoPlayer, FeatureSet::FULL);
        let input = InputFrame::driving(vec![ControlState::IDLE, ControlState::forward()]);
        race.update(&input);

        assert_eq!(race.vehicles[0].position, Vec2::new(200.0, 300.0));
        assert!(race.vehicles[1].position.abs_diff_eq(Vec2::new(205.0, 380.0), 1e-4));
    }

    #[test]
    fn test_basic_features_park_ai_and_skip_laps() {
        let mut race = race(GameMode::PlayerVsAi, FeatureSet::BASIC);
        let parked: Vec<Vec2> = race.vehicles[1..].iter().map(|v| v.position).collect();

        race.vehicles[0].set_position(race.track.finish_gate.center());
        race.update(&InputFrame::default());

        let after: Vec<Vec2> = race.vehicles[1..].iter().map(|v| v.position).collect();
        assert_eq!(parked, after);
        assert_eq!(race.vehicles[0].laps, 0);
        assert!(race.get_snapshot().overlay.laps.is_empty());
    }

    #[test]
    fn test_dwell_counts_down_after_win() {
        let mut race = race(GameMode::PlayerVsAi, FeatureSet::FULL);
        race.config.lap_target = 1;
        race.dwell_remaining = 2;
        race.vehicles[0].set_position(race.track.finish_gate.center());

        assert!(!race.update(&InputFrame::default()));
        assert_eq!(race.status, RaceStatus::Finished);
        assert_eq!(race.get_snapshot().overlay.win_message.as_deref(), Some("You Win!"));

        assert!(!race.update(&InputFrame::default()));
        assert!(race.update(&InputFrame::default()));
    }
}
