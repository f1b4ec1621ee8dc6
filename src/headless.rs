//! Headless - Scripted input and log-backed rendering
//!
//! Lets the race loop run without a window: input comes from a fixed
//! script and frames are reported through `log`.

use std::collections::VecDeque;

use crate::game_server::frontend::{Frame, InputSource, RenderSink};
use crate::game_server::input::{ControlState, InputFrame, MenuEvent};
use crate::game_server::race::{GameMode, Overlay};
use crate::game_server::skins::Rgb;

/// Ticks to turn 90 degrees at 5 degrees per tick
const QUARTER_TURN: u64 = 18;

/// Replays a list of input frames, each held for a number of ticks, then
/// requests quit.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    steps: VecDeque<(InputFrame, u64)>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, frame: InputFrame, ticks: u64) -> Self {
        if ticks > 0 {
            self.steps.push_back((frame, ticks));
        }
        self
    }

    pub fn menu(self, event: MenuEvent) -> Self {
        self.then(InputFrame::menu(event), 1)
    }

    pub fn hold(self, controls: ControlState, ticks: u64) -> Self {
        self.then(InputFrame::driving(vec![controls]), ticks)
    }

    /// Customize, pick player-vs-AI and drive a rectangular loop around the
    /// infield through the finish gate for `drive_ticks` ticks.
    pub fn demo(drive_ticks: u64) -> Self {
        let turn_right = ControlState::IDLE.with_right();
        let forward = ControlState::forward();

        let mut script = Self::new()
            .menu(MenuEvent::SelectColor {
                slot: 0,
                color: Rgb::BLUE,
            })
            .menu(MenuEvent::SelectCharacter {
                slot: 0,
                name: "Luigi".into(),
            })
            .menu(MenuEvent::Start)
            .menu(MenuEvent::ChooseMode(GameMode::PlayerVsAi));

        // from the start line, face down the screen and reach the bottom straight
        let lead_in = [(ControlState::IDLE.with_left(), QUARTER_TURN), (forward, 35)];
        let lap = [
            (turn_right, QUARTER_TURN),
            (forward, 80),
            (turn_right, QUARTER_TURN),
            (forward, 70),
            (turn_right, QUARTER_TURN),
            (forward, 80),
            (turn_right, QUARTER_TURN),
            (forward, 70),
        ];

        let mut remaining = drive_ticks;
        for (controls, ticks) in lead_in.into_iter().chain(lap.into_iter().cycle()) {
            if remaining == 0 {
                break;
            }
            let ticks = ticks.min(remaining);
            script = script.hold(controls, ticks);
            remaining -= ticks;
        }
        script
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        let Some((frame, ticks)) = self.steps.front_mut() else {
            return InputFrame::quit();
        };

        let frame = frame.clone();
        *ticks -= 1;
        if *ticks == 0 {
            self.steps.pop_front();
        }
        frame
    }
}

/// Reports frames through `log`: overlay changes at info, a position
/// summary every `summary_every` race ticks at debug, full frames at trace.
#[derive(Debug)]
pub struct LogRenderer {
    summary_every: u64,
    last_overlay: Overlay,
    last_screen: &'static str,
    frames: u64,
}

impl LogRenderer {
    pub fn new(summary_every: u64) -> Self {
        Self {
            summary_every: summary_every.max(1),
            last_overlay: Overlay::default(),
            last_screen: "",
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSink for LogRenderer {
    fn present(&mut self, frame: &Frame) {
        self.frames += 1;

        if log::log_enabled!(log::Level::Trace) {
            match serde_json::to_string(frame) {
                Ok(json) => log::trace!("{}", json),
                Err(e) => log::warn!("Failed to serialize frame: {}", e),
            }
        }

        let screen = match frame {
            Frame::Customizing { .. } => "customize",
            Frame::ModeSelect => "mode select",
            Frame::Race(_) => "race",
        };
        if screen != self.last_screen {
            log::info!("Showing {} screen", screen);
            self.last_screen = screen;
        }

        let Frame::Race(snapshot) = frame else {
            return;
        };

        if snapshot.overlay != self.last_overlay {
            for line in snapshot.overlay.laps.iter().chain(&snapshot.overlay.win_message) {
                log::info!("{}", line);
            }
            self.last_overlay = snapshot.overlay.clone();
        }

        if snapshot.ticks % self.summary_every == 0 {
            for vehicle in &snapshot.vehicles {
                log::debug!(
                    "tick {} {:>6} at ({:6.1}, {:6.1}) heading {:5.1}",
                    snapshot.ticks,
                    vehicle.skin,
                    vehicle.position.x,
                    vehicle.position.y,
                    vehicle.heading
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_server::race::{FeatureSet, RaceConfig};
    use crate::game_server::simulation::{GameServer, GameState};
    use crate::game_server::skins::CharacterRoster;
    use crate::game_server::Clock;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct NoWait;

    impl Clock for NoWait {
        fn wait_for_next_tick(&mut self, _tick_rate: u32) {}
    }

    #[test]
    fn test_script_holds_then_quits() {
        let mut input = ScriptedInput::new().hold(ControlState::forward(), 2);
        assert_eq!(input.poll().control(0), ControlState::forward());
        assert_eq!(input.poll().control(0), ControlState::forward());
        assert!(input.is_finished());
        assert!(input.poll().quit);
    }

    #[test]
    fn test_demo_length() {
        let mut input = ScriptedInput::demo(100);
        let mut polled = 0;
        while !input.poll().quit {
            polled += 1;
        }
        // four menu clicks plus the driving ticks
        assert_eq!(polled, 104);
    }

    #[test]
    fn test_demo_route_wins_race() {
        let mut server = GameServer::with_parts(
            RaceConfig::default(),
            FeatureSet::FULL,
            60,
            Box::new(CharacterRoster),
            StdRng::seed_from_u64(9),
        );
        let mut input = ScriptedInput::demo(1200);
        let mut renderer = LogRenderer::new(60);

        let mut finished = false;
        loop {
            let frame = input.poll();
            if frame.quit {
                break;
            }
            server.tick(&frame);
            renderer.present(&server.frame());
            finished |= server.get_state() == GameState::Finished;
        }

        assert!(finished);
        assert!(renderer.frames() > 1000);
    }

    #[test]
    fn test_demo_runs_through_loop() {
        let mut server = GameServer::default();
        let mut input = ScriptedInput::demo(10);
        let mut renderer = LogRenderer::new(5);
        server.run(&mut input, &mut renderer, &mut NoWait);
        assert_eq!(renderer.frames(), 14);
    }
}
