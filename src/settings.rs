use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::game_server::race::{FeatureSet, RaceConfig};

/// Config file looked up when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "kart.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Free drive: no mode select, parked opponents, no laps
    Basic,
    /// Mode select, moving opponents, lap race
    Full,
}

impl Variant {
    pub fn features(self) -> FeatureSet {
        match self {
            Self::Basic => FeatureSet::BASIC,
            Self::Full => FeatureSet::FULL,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub tick_rate: u32,
    pub log_level: String,
    pub variant: Variant,
    /// Ticks the headless demo runs before quitting
    pub demo_ticks: u64,
    #[serde(default)]
    pub race: RaceConfig,
}

impl Settings {
    /// Defaults, then the YAML file if present, then `KART__*` variables
    pub fn load(path: Option<&str>) -> Result<Settings> {
        let config = Config::builder()
            .set_default("tick_rate", 60)?
            .set_default("log_level", "info")?
            .set_default("variant", "full")?
            .set_default("demo_ticks", 1800)?
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG_FILE)).required(false))
            .add_source(Environment::with_prefix("KART").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
