//! Command-line and environment configuration.
//!
//! Every knob has a flag and a `BAREBON_*` environment fallback. [`Cli`] is
//! the raw parse; [`Config`] is the validated form the rest of the binary
//! uses.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

use canvas::consts::MAX_DEVICE_SIDE;
use canvas::engine::Mode;
use canvas::geom::{Point, Viewport};
use clap::Parser;
use tracing::Level;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("surface size must be positive, got {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("surface origin must be finite, got ({left}, {top})")]
    InvalidOrigin { left: f64, top: f64 },
    #[error("pixel ratio must be positive, got {0}")]
    InvalidPixelRatio(f64),
    #[error("fps must be between 1 and 1000, got {0}")]
    InvalidFps(u32),
    #[error("device surface {width}x{height} exceeds {max} pixels per side")]
    SurfaceTooLarge { width: u32, height: u32, max: u32 },
    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
    #[error("--script and --demo are mutually exclusive")]
    ConflictingInput,
}

#[derive(Parser, Debug)]
#[command(name = "barebon", about = "Rectangle canvas with separate simulation and render workers")]
pub struct Cli {
    /// Logical surface width.
    #[arg(long, env = "BAREBON_WIDTH", default_value_t = 320.0)]
    pub width: f64,

    /// Logical surface height.
    #[arg(long, env = "BAREBON_HEIGHT", default_value_t = 240.0)]
    pub height: f64,

    /// Device pixels per logical pixel.
    #[arg(long, env = "BAREBON_PIXEL_RATIO", default_value_t = 1.0)]
    pub pixel_ratio: f64,

    /// Client-space x of the surface's left edge; script moves are translated by it.
    #[arg(long, env = "BAREBON_LEFT", default_value_t = 0.0)]
    pub left: f64,

    /// Client-space y of the surface's top edge.
    #[arg(long, env = "BAREBON_TOP", default_value_t = 0.0)]
    pub top: f64,

    /// Animation frames per second in each worker.
    #[arg(long, env = "BAREBON_FPS", default_value_t = 60)]
    pub fps: u32,

    /// `split` runs the simulation in its own worker; `fused` runs it in the render worker.
    #[arg(long, env = "BAREBON_MODE", value_enum, default_value_t = Mode::Split)]
    pub mode: Mode,

    #[arg(long, env = "BAREBON_LOG", default_value = "info")]
    pub log: String,

    /// JSON-lines input script.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Generate a random session of this many gestures.
    #[arg(long)]
    pub demo: Option<usize>,

    /// Seed for `--demo`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the last presented frame here as a binary PPM.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

impl Cli {
    /// Log level for the subscriber, falling back to `INFO` when unparseable.
    /// Validation reports the bad value once logging is up.
    #[must_use]
    pub fn log_level(&self) -> Level {
        self.log.parse().unwrap_or(Level::INFO)
    }
}

/// Where the session's input comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Script(PathBuf),
    Demo { gestures: usize, seed: Option<u64> },
    /// Built-in create/drag/release walkthrough.
    Scenario,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub viewport: Viewport,
    /// Client-space position of the surface's top-left corner.
    pub origin: Point,
    pub fps: u32,
    pub mode: Mode,
    pub log_level: Level,
    pub input: Input,
    pub snapshot: Option<PathBuf>,
}

impl Config {
    /// Time between animation frames.
    #[must_use]
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

impl TryFrom<Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let valid_len = |v: f64| v.is_finite() && v > 0.0;
        if !valid_len(cli.width) || !valid_len(cli.height) {
            return Err(ConfigError::InvalidSize { width: cli.width, height: cli.height });
        }
        if !valid_len(cli.pixel_ratio) {
            return Err(ConfigError::InvalidPixelRatio(cli.pixel_ratio));
        }
        let viewport = Viewport::new(cli.width, cli.height, cli.pixel_ratio);
        if !viewport.is_valid() {
            let (width, height) = viewport.device_size();
            return Err(ConfigError::SurfaceTooLarge { width, height, max: MAX_DEVICE_SIDE });
        }
        if !cli.left.is_finite() || !cli.top.is_finite() {
            return Err(ConfigError::InvalidOrigin { left: cli.left, top: cli.top });
        }
        if !(1..=1000).contains(&cli.fps) {
            return Err(ConfigError::InvalidFps(cli.fps));
        }
        let log_level: Level = cli.log.parse().map_err(|_| ConfigError::InvalidLogLevel(cli.log.clone()))?;

        let input = match (cli.script, cli.demo) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingInput),
            (Some(path), None) => Input::Script(path),
            (None, Some(gestures)) => Input::Demo { gestures, seed: cli.seed },
            (None, None) => Input::Scenario,
        };

        Ok(Self {
            viewport,
            origin: Point::new(cli.left, cli.top),
            fps: cli.fps,
            mode: cli.mode,
            log_level,
            input,
            snapshot: cli.snapshot,
        })
    }
}
