use super::*;

fn parse(args: &[&str]) -> Result<Config, ConfigError> {
    let mut argv = vec!["barebon"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    Config::try_from(cli)
}

#[test]
fn defaults() {
    let config = parse(&[]).unwrap();
    assert_eq!(config.viewport, Viewport::new(320.0, 240.0, 1.0));
    assert_eq!(config.origin, Point::default());
    assert_eq!(config.fps, 60);
    assert_eq!(config.mode, Mode::Split);
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.input, Input::Scenario);
    assert_eq!(config.snapshot, None);
}

#[test]
fn flags_override_defaults() {
    let config = parse(&[
        "--width", "640", "--height", "480", "--pixel-ratio", "2", "--fps", "30", "--mode", "fused", "--log", "debug",
    ])
    .unwrap();
    assert_eq!(config.viewport, Viewport::new(640.0, 480.0, 2.0));
    assert_eq!(config.fps, 30);
    assert_eq!(config.mode, Mode::Fused);
    assert_eq!(config.log_level, Level::DEBUG);
}

#[test]
fn non_positive_size_is_rejected() {
    assert_eq!(parse(&["--width", "0"]), Err(ConfigError::InvalidSize { width: 0.0, height: 240.0 }));
    assert!(matches!(parse(&["--height=-5"]), Err(ConfigError::InvalidSize { .. })));
}

#[test]
fn non_positive_ratio_is_rejected() {
    assert_eq!(parse(&["--pixel-ratio", "0"]), Err(ConfigError::InvalidPixelRatio(0.0)));
}

#[test]
fn surface_origin_is_read() {
    let config = parse(&["--left", "12.5", "--top", "30"]).unwrap();
    assert_eq!(config.origin, Point::new(12.5, 30.0));
    assert!(matches!(parse(&["--left", "inf"]), Err(ConfigError::InvalidOrigin { .. })));
}

#[test]
fn fps_out_of_range_is_rejected() {
    assert_eq!(parse(&["--fps", "0"]), Err(ConfigError::InvalidFps(0)));
    assert_eq!(parse(&["--fps", "5000"]), Err(ConfigError::InvalidFps(5000)));
}

#[test]
fn unknown_mode_is_a_usage_error() {
    let err = Cli::try_parse_from(["barebon", "--mode", "both"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
}

#[test]
fn oversize_surface_is_rejected() {
    assert_eq!(
        parse(&["--width", "100000", "--height", "100000"]),
        Err(ConfigError::SurfaceTooLarge { width: 100_000, height: 100_000, max: MAX_DEVICE_SIDE })
    );
    assert!(matches!(parse(&["--width", "5000", "--pixel-ratio", "2"]), Err(ConfigError::SurfaceTooLarge { .. })));
    assert!(parse(&["--width", "4096", "--height", "4096", "--pixel-ratio", "2"]).is_ok());
}

#[test]
fn unknown_log_level_is_rejected_but_subscriber_still_gets_a_level() {
    let cli = Cli::try_parse_from(["barebon", "--log", "loud"]).unwrap();
    assert_eq!(cli.log_level(), Level::INFO);
    assert_eq!(Config::try_from(cli), Err(ConfigError::InvalidLogLevel("loud".into())));
}

#[test]
fn input_selection() {
    assert_eq!(parse(&["--script", "steps.jsonl"]).unwrap().input, Input::Script("steps.jsonl".into()));
    assert_eq!(
        parse(&["--demo", "5", "--seed", "7"]).unwrap().input,
        Input::Demo { gestures: 5, seed: Some(7) }
    );
    assert_eq!(parse(&["--script", "a", "--demo", "1"]), Err(ConfigError::ConflictingInput));
}

#[test]
fn frame_period_follows_fps() {
    let config = parse(&["--fps", "50"]).unwrap();
    assert_eq!(config.frame_period(), Duration::from_millis(20));
}
