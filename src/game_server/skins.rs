//! Skins - Character roster, paint colors and vehicle identities
//!
//! The core only ever handles skin keys. Resolving a key to pixels is the
//! renderer's job.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Character roster shipped with the game
pub const CHARACTERS: &[&str] = &["Mario", "Luigi", "Peach", "Bowser", "Toad"];

/// Paint color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Self = Self(255, 0, 0);
    pub const GREEN: Self = Self(0, 255, 0);
    pub const BLUE: Self = Self(0, 0, 255);

    /// Colors offered on the customization screen
    pub const SELECTABLE: [(&'static str, Self); 3] =
        [("Red", Self::RED), ("Green", Self::GREEN), ("Blue", Self::BLUE)];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::SELECTABLE
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen(), rng.gen(), rng.gen())
    }
}

/// Lookup of character keys the renderer can draw
pub trait SkinRegistry {
    fn contains(&self, key: &str) -> bool;

    /// All keys, in roster order
    fn keys(&self) -> Vec<String>;
}

/// The built-in five character roster
#[derive(Debug, Clone, Default)]
pub struct CharacterRoster;

impl SkinRegistry for CharacterRoster {
    fn contains(&self, key: &str) -> bool {
        CHARACTERS.contains(&key)
    }

    fn keys(&self) -> Vec<String> {
        CHARACTERS.iter().map(|c| (*c).to_string()).collect()
    }
}

/// Who drives a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    Human(usize),
    Ai(usize),
}

impl Controller {
    pub fn is_human(self) -> bool {
        matches!(self, Self::Human(_))
    }
}

/// Fully resolved vehicle identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleIdentity {
    pub controller: Controller,
    pub skin: String,
    pub color: Rgb,
}

/// Unvalidated customization for one human slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerChoice {
    pub color: Option<Rgb>,
    pub character: Option<String>,
}

impl PlayerChoice {
    pub fn new(color: Rgb, character: &str) -> Self {
        Self {
            color: Some(color),
            character: Some(character.to_string()),
        }
    }

    /// Resolve against the registry, failing on anything unset or unknown
    pub fn resolve(&self, slot: usize, registry: &dyn SkinRegistry) -> Result<VehicleIdentity> {
        let skin = self
            .character
            .clone()
            .ok_or(Error::MissingSkin { slot })?;
        if !registry.contains(&skin) {
            return Err(Error::UnknownSkin(skin));
        }
        let color = self.color.ok_or(Error::MissingColor { slot })?;

        Ok(VehicleIdentity {
            controller: Controller::Human(slot),
            skin,
            color,
        })
    }
}

/// Customization for both human slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    pub players: [PlayerChoice; 2],
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            players: [
                PlayerChoice::new(Rgb::RED, "Mario"),
                PlayerChoice::new(Rgb::BLUE, "Luigi"),
            ],
        }
    }
}

impl Customization {
    pub fn select_color(&mut self, slot: usize, color: Rgb) {
        if let Some(choice) = self.players.get_mut(slot) {
            choice.color = Some(color);
        }
    }

    pub fn select_character(&mut self, slot: usize, name: String) {
        if let Some(choice) = self.players.get_mut(slot) {
            choice.character = Some(name);
        }
    }

    /// Resolve the first `humans` slots
    pub fn resolve(&self, humans: usize, registry: &dyn SkinRegistry) -> Result<Vec<VehicleIdentity>> {
        self.players
            .iter()
            .take(humans)
            .enumerate()
            .map(|(slot, choice)| choice.resolve(slot, registry))
            .collect()
    }
}

/// Pick AI identities from the skins no human is using, without replacement.
/// Yields `min(wanted, remaining)` opponents with random paint.
pub fn assign_ai_identities<R: Rng + ?Sized>(
    wanted: usize,
    taken: &[VehicleIdentity],
    registry: &dyn SkinRegistry,
    rng: &mut R,
) -> Vec<VehicleIdentity> {
    let available: Vec<String> = registry
        .keys()
        .into_iter()
        .filter(|key| !taken.iter().any(|t| &t.skin == key))
        .collect();

    let count = wanted.min(available.len());
    let picked: Vec<String> = available.choose_multiple(rng, count).cloned().collect();

    picked
        .into_iter()
        .enumerate()
        .map(|(slot, skin)| VehicleIdentity {
            controller: Controller::Ai(slot),
            skin,
            color: Rgb::random(rng),
        })
        .collect()
}
