//! Frontend - Collaborator interfaces consumed by the race loop
//!
//! Windowing, drawing and key mapping live behind these traits so the
//! simulation runs the same with a real display, a script or a test.

use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::game_server::input::InputFrame;
use crate::game_server::race::RaceSnapshot;
use crate::game_server::skins::Customization;

/// Supplies input once per tick
pub trait InputSource {
    fn poll(&mut self) -> InputFrame;
}

/// Receives the render state once per tick
pub trait RenderSink {
    fn present(&mut self, frame: &Frame);
}

/// Paces the loop to the target tick rate
pub trait Clock {
    fn wait_for_next_tick(&mut self, tick_rate: u32);
}

/// What should be on screen this tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Frame {
    Customizing {
        customization: Customization,
        characters: Vec<String>,
    },
    ModeSelect,
    Race(RaceSnapshot),
}

/// Sleeps until the next tick deadline. Deadlines advance from the previous
/// one so short ticks don't drift, and reset if the loop falls behind.
#[derive(Debug)]
pub struct FramePacer {
    next_deadline: Option<Instant>,
}

impl FramePacer {
    pub fn new() -> Self {
        Self { next_deadline: None }
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FramePacer {
    fn wait_for_next_tick(&mut self, tick_rate: u32) {
        let period = Duration::from_secs_f64(1.0 / f64::from(tick_rate.max(1)));
        let now = Instant::now();
        let deadline = self.next_deadline.map_or(now + period, |d| d + period);

        if deadline > now {
            thread::sleep(deadline - now);
            self.next_deadline = Some(deadline);
        } else {
            self.next_deadline = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacer_waits_roughly_one_period() {
        let mut pacer = FramePacer::new();
        let start = Instant::now();
        for _ in 0..3 {
            pacer.wait_for_next_tick(100);
        }
        assert!(start.elapsed() >= Duration::from_millis(25));
    }
}
