//! Simulation - Game server state machine and main loop
//!
//! Owns the current race, routes menu and control input by state, and
//! drives the fixed-rate loop against the frontend collaborators.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::game_server::frontend::{Clock, Frame, InputSource, RenderSink};
use crate::game_server::input::{InputFrame, MenuEvent};
use crate::game_server::race::{FeatureSet, GameMode, Race, RaceConfig, RaceStatus};
use crate::game_server::skins::{CharacterRoster, Customization, SkinRegistry};

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Customizing,
    ModeSelect,
    Racing,
    Finished,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Server statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStats {
    pub tick_rate: u32,
    pub avg_tick_time_ms: f32,
    pub vehicle_count: u32,
    pub game_state: GameState,
    pub races_completed: u32,
}

/// Main game server
pub struct GameServer {
    /// Current game state
    state: GameState,
    /// Menu choices for the next race
    customization: Customization,
    /// Active race (if any)
    race: Option<Race>,
    config: RaceConfig,
    features: FeatureSet,
    registry: Box<dyn SkinRegistry>,
    rng: StdRng,
    /// Target tick rate (ticks per second)
    tick_rate: u32,
    /// Recent tick processing times for averaging
    tick_times: Vec<f32>,
    races_completed: u32,
}

impl GameServer {
    /// Create a new game server with the built-in roster
    pub fn new(config: RaceConfig, features: FeatureSet, tick_rate: u32) -> Self {
        Self::with_parts(
            config,
            features,
            tick_rate,
            Box::new(CharacterRoster),
            StdRng::from_entropy(),
        )
    }

    pub fn with_parts(
        config: RaceConfig,
        features: FeatureSet,
        tick_rate: u32,
        registry: Box<dyn SkinRegistry>,
        rng: StdRng,
    ) -> Self {
        Self {
            state: GameState::Customizing,
            customization: Customization::default(),
            race: None,
            config,
            features,
            registry,
            rng,
            tick_rate,
            tick_times: Vec::with_capacity(60),
            races_completed: 0,
        }
    }

    /// Run until quit is requested
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        renderer: &mut dyn RenderSink,
        clock: &mut dyn Clock,
    ) {
        log::info!(
            "Race loop running at {} Hz ({:?})",
            self.tick_rate,
            self.features
        );

        loop {
            let frame = input.poll();
            if self.tick(&frame) == Flow::Quit {
                break;
            }
            renderer.present(&self.frame());
            clock.wait_for_next_tick(self.tick_rate);
        }

        log::info!(
            "Race loop stopped after {} completed race(s)",
            self.races_completed
        );
    }

    /// Perform a single tick
    pub fn tick(&mut self, input: &InputFrame) -> Flow {
        if input.quit {
            log::info!("Quit requested while {:?}", self.state);
            self.race = None;
            return Flow::Quit;
        }

        let tick_start = Instant::now();

        match self.state {
            GameState::Customizing => self.handle_customizing(&input.menu),
            GameState::ModeSelect => self.handle_mode_select(&input.menu),
            GameState::Racing | GameState::Finished => self.update_race(input),
        }

        // Record tick time
        let tick_time = tick_start.elapsed().as_secs_f32() * 1000.0;
        self.tick_times.push(tick_time);
        if self.tick_times.len() > 60 {
            self.tick_times.remove(0);
        }

        Flow::Continue
    }

    fn handle_customizing(&mut self, events: &[MenuEvent]) {
        for event in events {
            match event {
                MenuEvent::SelectColor { slot, color } => {
                    self.customization.select_color(*slot, *color);
                }
                MenuEvent::SelectCharacter { slot, name } => {
                    self.customization.select_character(*slot, name.clone());
                }
                MenuEvent::Start => {
                    if self.features.mode_select {
                        // validate the primary player before offering modes
                        match self.customization.resolve(1, &*self.registry) {
                            Ok(_) => self.set_state(GameState::ModeSelect),
                            Err(e) => log::warn!("Cannot start race: {}", e),
                        }
                    } else if let Err(e) = self.start_race(GameMode::PlayerVsAi) {
                        log::warn!("Cannot start race: {}", e);
                    }
                    return;
                }
                MenuEvent::ChooseMode(_) => {}
            }
        }
    }

    fn handle_mode_select(&mut self, events: &[MenuEvent]) {
        for event in events {
            if let MenuEvent::ChooseMode(mode) = event {
                if let Err(e) = self.start_race(*mode) {
                    log::warn!("Cannot start {:?} race: {}", mode, e);
                    self.set_state(GameState::Customizing);
                }
                return;
            }
        }
    }

    /// Build a fresh race from the current customization
    pub fn start_race(&mut self, mode: GameMode) -> Result<()> {
        let race = Race::new(
            self.config.clone(),
            self.features,
            mode,
            &self.customization,
            &*self.registry,
            self.tick_rate,
            &mut self.rng,
        )?;

        log::info!(
            "Race initialized: {:?} with {} vehicles, {} laps to win",
            mode,
            race.vehicles.len(),
            self.config.lap_target
        );
        self.race = Some(race);
        self.set_state(GameState::Racing);
        Ok(())
    }

    fn update_race(&mut self, input: &InputFrame) {
        let Some(race) = &mut self.race else {
            self.set_state(GameState::Customizing);
            return;
        };

        let dwell_elapsed = race.update(input);
        let status = race.status;

        if dwell_elapsed {
            self.races_completed += 1;
            self.reset();
        } else if status == RaceStatus::Finished && self.state == GameState::Racing {
            self.set_state(GameState::Finished);
        }
    }

    fn set_state(&mut self, state: GameState) {
        if self.state != state {
            log::debug!("{:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Drop the race and start a fresh customization pass
    pub fn reset(&mut self) {
        self.race = None;
        self.customization = Customization::default();
        self.set_state(GameState::Customizing);
    }

    /// Render state for the current tick
    pub fn frame(&self) -> Frame {
        match (&self.state, &self.race) {
            (GameState::Racing | GameState::Finished, Some(race)) => Frame::Race(race.get_snapshot()),
            (GameState::ModeSelect, _) => Frame::ModeSelect,
            _ => Frame::Customizing {
                customization: self.customization.clone(),
                characters: self.registry.keys(),
            },
        }
    }

    /// Get server statistics
    pub fn get_stats(&self) -> ServerStats {
        let avg_tick_time = if self.tick_times.is_empty() {
            0.0
        } else {
            self.tick_times.iter().sum::<f32>() / self.tick_times.len() as f32
        };

        ServerStats {
            tick_rate: self.tick_rate,
            avg_tick_time_ms: avg_tick_time,
            vehicle_count: self.race.as_ref().map(|r| r.vehicles.len() as u32).unwrap_or(0),
            game_state: self.state,
            races_completed: self.races_completed,
        }
    }

    /// Get current game state
    pub fn get_state(&self) -> GameState {
        self.state
    }

    pub fn race(&self) -> Option<&Race> {
        self.race.as_ref()
    }

    pub fn race_mut(&mut self) -> Option<&mut Race> {
        self.race.as_mut()
    }

    pub fn customization(&self) -> &Customization {
        &self.customization
    }
}

impl Default for GameServer {
    fn default() -> Self {
        Self::new(RaceConfig::default(), FeatureSet::default(), 60)
    }
}
