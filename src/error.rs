//! Error - Crate error type
//!
//! Only race setup and process bootstrap can fail. Once a race exists,
//! every tick is total.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown character skin '{0}'")]
    UnknownSkin(String),

    #[error("player {slot} has no character selected")]
    MissingSkin { slot: usize },

    #[error("player {slot} has no color selected")]
    MissingColor { slot: usize },

    #[error("failed to load settings: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}
