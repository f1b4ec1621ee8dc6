//! Input - Per-tick control and menu state
//!
//! The frontend owns key mapping. The core only sees which controls are
//! held for each human slot, the menu events raised since the last tick,
//! and whether quit was requested.

use serde::{Deserialize, Serialize};

use crate::game_server::race::GameMode;
use crate::game_server::skins::Rgb;

/// Held controls for one human-driven vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl ControlState {
    pub const IDLE: Self = Self {
        forward: false,
        backward: false,
        turn_left: false,
        turn_right: false,
    };

    pub const fn forward() -> Self {
        Self {
            forward: true,
            ..Self::IDLE
        }
    }

    pub fn with_left(mut self) -> Self {
        self.turn_left = true;
        self
    }

    pub fn with_right(mut self) -> Self {
        self.turn_right = true;
        self
    }
}

/// Keyboard layout a frontend should map onto a human slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlScheme {
    /// W/S drive, A/D turn
    Wasd,
    /// Up/Down drive, Left/Right turn
    Arrows,
}

impl ControlScheme {
    pub fn for_slot(slot: usize) -> Self {
        if slot == 0 {
            Self::Wasd
        } else {
            Self::Arrows
        }
    }
}

/// Discrete menu interactions, one per button click
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MenuEvent {
    SelectColor { slot: usize, color: Rgb },
    SelectCharacter { slot: usize, name: String },
    Start,
    ChooseMode(GameMode),
}

/// Everything the input source reports for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    pub quit: bool,
    pub menu: Vec<MenuEvent>,
    /// Indexed by human slot; missing slots read as idle
    pub controls: Vec<ControlState>,
}

impl InputFrame {
    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Default::default()
        }
    }

    pub fn menu(event: MenuEvent) -> Self {
        Self {
            menu: vec![event],
            ..Default::default()
        }
    }

    pub fn driving(controls: Vec<ControlState>) -> Self {
        Self {
            controls,
            ..Default::default()
        }
    }

    pub fn control(&self, slot: usize) -> ControlState {
        self.controls.get(slot).copied().unwrap_or_default()
    }
}
