//! `trailrec` - CLI for trailrecorder
//!
//! Replays recorded event streams through the trail recorder and inspects
//! configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;

use trailrecorder::cli::{Cli, Command, ConfigCommand, OutputFormat, ReplayCommand};
use trailrecorder::events::pump;
use trailrecorder::replay::ReplaySource;
use trailrecorder::{init_logging, Config, RenderingSurface, TrailRecorder, TrailSummary};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Replay(replay_cmd) => handle_replay(&config, &replay_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_replay(config: &Config, cmd: &ReplayCommand) -> anyhow::Result<()> {
    let speed = cmd.speed.unwrap_or(config.replay.speed);
    if !speed.is_finite() || speed < 0.0 {
        bail!("--speed must be a non-negative number, got {speed}");
    }

    let source = ReplaySource::from_path(&cmd.file)
        .with_context(|| format!("failed to load {}", cmd.file.display()))?
        .with_speed(speed);

    let mut map = config.headless_map();
    if let Some(zoom) = cmd.zoom {
        if !(0.0..=24.0).contains(&zoom) {
            bail!("--zoom must be between 0 and 24, got {zoom}");
        }
        let mut view = map.view();
        view.zoom = zoom;
        map.set_view(view);
    }

    let mut recorder = TrailRecorder::new(config.trail_settings());
    recorder.attach(map);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;
    let (sent, report) = runtime.block_on(pump(
        source,
        &mut recorder,
        config.replay.channel_capacity,
    ))?;

    let summary = TrailSummary::from_buffer(recorder.buffer());
    let stats = recorder.stats();
    let state = recorder.state();
    let (zoom, opacity) = match (recorder.surface(), recorder.polyline()) {
        (Some(map), Some(id)) => (
            map.view().zoom,
            map.polyline(id).map_or(0.0, |line| line.opacity),
        ),
        _ => (0.0, 0.0),
    };

    match cmd.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "file": cmd.file,
                "events": sent,
                "drained": report,
                "stats": stats,
                "state": state,
                "summary": summary,
                "zoom": zoom,
                "opacity": opacity,
                "trail": recorder.buffer().iter().collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Replay of {}", cmd.file.display());
            println!("----------{}", "-".repeat(cmd.file.display().to_string().len()));
            println!("Events:        {sent}");
            println!("Moves:         {}", report.moves);
            println!("Accepted:      {}", stats.accepted);
            println!("Evicted:       {}", stats.evicted);
            println!("Jitter:        {}", stats.jitter);
            println!("Inactive:      {}", stats.inactive);
            println!("Transforming:  {}", stats.transforming);
            println!("Malformed:     {}", stats.malformed);
            println!();
            println!("Trail:         {summary}");
            println!("Zoom:          {zoom}");
            println!("Opacity:       {opacity}");
            println!("State:         {:?} / {:?}", state.presence, state.phase);
        }
    }

    recorder.detach();
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Trail]");
                println!("  Capacity:           {}", config.trail.capacity);
                println!("  Min distance (px):  {}", config.trail.min_distance_px);
                println!();
                println!("[Style]");
                println!("  Color:              {}", config.style.color);
                println!("  Weight:             {}", config.style.weight);
                println!("  Opacity:            {}", config.style.opacity);
                println!("  Smooth factor:      {}", config.style.smooth_factor);
                println!();
                println!("[Map]");
                println!(
                    "  Viewport:           {}x{}",
                    config.map.width, config.map.height
                );
                println!("  Zoom:               {}", config.map.zoom);
                println!("  Center:             {}", config.initial_view().center);
                println!();
                println!("[Replay]");
                println!("  Speed:              {}", config.replay.speed);
                println!("  Channel capacity:   {}", config.replay.channel_capacity);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path)).context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
