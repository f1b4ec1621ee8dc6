//! Oval Kart - Race simulation core
//!
//! Top-down kart racing around an oval: customization, mode select, vehicle
//! motion, confinement, lap counting and AI opponents, stepped at a fixed
//! tick rate. Rendering and input are supplied by the caller.

pub mod error;
pub mod game_server;
pub mod headless;
pub mod settings;

pub use error::{Error, Result};

use game_server::{FramePacer, GameServer};
use headless::{LogRenderer, ScriptedInput};
use settings::Settings;

/// Install the stdout logger at the given level
pub fn init_logging(level: log::LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

/// Load settings, then run the headless demo race until its script ends
pub fn run(config_path: Option<&str>) -> Result<()> {
    let settings = Settings::load(config_path)?;
    init_logging(settings.level_filter())?;
    log::info!(
        "Oval Kart initialized: {:?} variant, {} laps to win",
        settings.variant,
        settings.race.lap_target
    );

    let mut server = GameServer::new(
        settings.race.clone(),
        settings.variant.features(),
        settings.tick_rate,
    );
    let mut input = ScriptedInput::demo(settings.demo_ticks);
    let mut renderer = LogRenderer::new(u64::from(settings.tick_rate));
    let mut clock = FramePacer::new();

    server.run(&mut input, &mut renderer, &mut clock);

    let stats = server.get_stats();
    log::info!(
        "Finished: {} race(s) completed, {} frames, avg tick {:.3} ms",
        stats.races_completed,
        renderer.frames(),
        stats.avg_tick_time_ms
    );
    Ok(())
}
