mod config;
mod error;
mod host;
mod script;
mod worker;

use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

use crate::config::{Cli, Config, Input};
use crate::error::AppError;
use crate::host::Host;
use crate::script::Step;
use crate::worker::render::RenderSettings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level()).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "barebon failed");
            ExitCode::FAILURE
        }
    }
}

fn load_steps(config: &Config) -> Result<Vec<Step>, AppError> {
    match &config.input {
        Input::Script(path) => script::parse(&std::fs::read_to_string(path)?),
        Input::Demo { gestures, seed } => {
            let seed = seed.unwrap_or_else(|| rand::rng().random());
            info!(gestures, seed, "demo session");
            Ok(script::demo(*gestures, config.viewport, &mut StdRng::seed_from_u64(seed)))
        }
        Input::Scenario => Ok(script::scenario()),
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::try_from(cli)?;
    let steps = load_steps(&config)?;
    info!(steps = steps.len(), mode = %config.mode, fps = config.fps, "starting");

    let mut host = Host::new(config.viewport, config.frame_period()).with_origin(config.origin);
    host.attach(RenderSettings { mode: config.mode, fps: config.fps })?;
    host.play(&steps).await?;
    // One more frame so the last input is on screen.
    let report = host.wait_frames(1).await?;
    info!(
        frames = report.frames,
        shapes = report.state.scene.len(),
        hovered = ?report.state.hovered,
        idle = report.state.interaction.is_idle(),
        "session finished"
    );

    let element = host.shutdown().await?;
    if let Some(path) = &config.snapshot {
        std::fs::write(path, element.frame().to_ppm())?;
        info!(path = %path.display(), "snapshot written");
    }
    Ok(())
}
