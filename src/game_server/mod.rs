//! Game Server Module
//!
//! Fixed-rate kart race simulation: vehicle motion, track confinement, lap
//! counting and AI opponents, driven through frontend-agnostic interfaces.

pub mod ai;
pub mod frontend;
pub mod input;
pub mod lap;
pub mod race;
pub mod simulation;
pub mod skins;
pub mod track;
pub mod vehicle;


pub use frontend::{Clock, Frame, FramePacer, InputSource, RenderSink};
pub use input::{ControlState, InputFrame, MenuEvent};
pub use race::{FeatureSet, GameMode, Race, RaceConfig, RaceSnapshot, RaceStatus};
pub use simulation::{Flow, GameServer, GameState, ServerStats};
pub use vehicle::{Vehicle, VehicleState};
