//! Train pet headless host.
//!
//! Drives the pet engine the way a desktop window would: a fixed-interval
//! tick followed by a paint per frame. Frames are painted into a software
//! canvas the size of the pet window and written out as PNG files, which
//! makes the motion and transform pipeline easy to inspect without a
//! windowing toolkit.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --sheet images/train_all.png --ticks 600 --every 60 --out frames
//! ```

use clap::Parser;
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use trainpet::engine::PetEngine;
use trainpet::render::canvas::Canvas;
use trainpet::resources::imagestore::TrainAssets;
use trainpet::resources::motionstate::MotionState;
use trainpet::resources::petconfig::{MotionMode, PetConfig};
use trainpet::resources::petwindow::PetWindow;
use trainpet::resources::screensize::ScreenSize;

/// Train pet
#[derive(Parser)]
#[command(version, about = "A train that drives around the edges of your screen.")]
struct Cli {
    /// Sprite sheet holding the head, body and tail artwork.
    #[arg(long, value_name = "PATH")]
    sheet: PathBuf,

    /// INI configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long, requires = "config")]
    save_config: bool,

    /// Override the motion mode (border or sweep).
    #[arg(long)]
    mode: Option<MotionMode>,

    /// Screen size as WIDTHxHEIGHT.
    #[arg(long, default_value = "1920x1080", value_parser = parse_screen)]
    screen: ScreenSize,

    /// Carriages between head and tail; the configured default when omitted.
    #[arg(long, conflicts_with = "head_only")]
    carriages: Option<usize>,

    /// Draw the locomotive head without carriages or tail.
    #[arg(long)]
    head_only: bool,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Paint and save a frame every N ticks (0 saves only the last frame).
    #[arg(long, default_value_t = 0)]
    every: u64,

    /// Directory for PNG frames.
    #[arg(long, value_name = "DIR", default_value = "frames")]
    out: PathBuf,

    /// Draw part outlines and the rotation center.
    #[arg(long)]
    debug: bool,

    /// Print one JSON line per tick with the motion state and window.
    #[arg(long)]
    trace: bool,

    /// Sleep the configured tick period between ticks.
    #[arg(long)]
    realtime: bool,
}

fn parse_screen(value: &str) -> Result<ScreenSize, String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let w: i32 = w.trim().parse().map_err(|e| format!("bad width: {}", e))?;
    let h: i32 = h.trim().parse().map_err(|e| format!("bad height: {}", e))?;
    if w <= 0 || h <= 0 {
        return Err(format!("screen size must be positive, got {}x{}", w, h));
    }
    Ok(ScreenSize::new(w, h))
}

#[derive(Serialize)]
struct TraceLine {
    tick: u64,
    state: MotionState,
    window: PetWindow,
    rotation: f32,
    mirrored: bool,
}

fn paint_frame(engine: &mut PetEngine, path: &Path) {
    let mut canvas = Canvas::new(engine.window().size);
    engine.on_paint(&mut canvas);
    match canvas.save_png(path) {
        Ok(()) => info!("Wrote {}", path.display()),
        Err(e) => warn!("Failed to write {}: {}", path.display(), e),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PetConfig::with_path(path),
        None => PetConfig::new(),
    };
    if let Some(path) = &cli.config
        && !cli.save_config
        && let Err(e) = config.load_from_file()
    {
        warn!("Config file not found or invalid, using defaults: {}", e);
        config = PetConfig::with_path(path);
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }

    if cli.save_config {
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return;
    }

    // A pet that cannot load its artwork never appears.
    let assets = match TrainAssets::load(&cli.sheet, &config.crops) {
        Ok(assets) => assets,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(&cli.out) {
        eprintln!("Error creating {}: {e}", cli.out.display());
        std::process::exit(1);
    }

    let tick_period = Duration::from_millis(config.tick_ms);
    let mut engine = if cli.head_only {
        PetEngine::head_only(config, cli.screen, &assets)
    } else {
        PetEngine::from_assets(config, cli.screen, &assets, cli.carriages)
    };
    engine.set_debug(cli.debug);

    for tick in 1..=cli.ticks {
        engine.on_tick();

        if engine.take_refresh() {
            let window = engine.window();
            info!(
                "Layout refresh: window {}x{} at ({}, {})",
                window.size.w, window.size.h, window.pos.x, window.pos.y
            );
        }

        if cli.trace {
            let line = TraceLine {
                tick,
                state: engine.motion(),
                window: engine.window(),
                rotation: engine.rotation_angle(),
                mirrored: engine.mirrored(),
            };
            match serde_json::to_string(&line) {
                Ok(json) => println!("{json}"),
                Err(e) => warn!("Failed to serialize trace line: {}", e),
            }
        }

        if cli.every > 0 && tick % cli.every == 0 {
            paint_frame(&mut engine, &cli.out.join(format!("frame_{tick:06}.png")));
        }

        if cli.realtime {
            std::thread::sleep(tick_period);
        }
    }

    if cli.every == 0 {
        paint_frame(&mut engine, &cli.out.join("frame_last.png"));
    }

    let cache = engine.cache();
    info!(
        "Done after {} ticks: {} corner arrivals, transform cache {} entries ({} hits, {} pipeline runs)",
        cli.ticks,
        engine.refresh_count(),
        cache.len(),
        cache.hits(),
        cache.pipeline_runs()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_screen_accepts_both_separators() {
        assert_eq!(parse_screen("1000x800").unwrap(), ScreenSize::new(1000, 800));
        assert_eq!(parse_screen("640X480").unwrap(), ScreenSize::new(640, 480));
    }

    #[test]
    fn parse_screen_rejects_garbage() {
        assert!(parse_screen("1000").is_err());
        assert!(parse_screen("0x10").is_err());
        assert!(parse_screen("ax10").is_err());
    }

    #[test]
    fn cli_parses_minimal_arguments() {
        let cli = Cli::try_parse_from(["trainpet", "--sheet", "train.png", "--mode", "sweep"]).unwrap();
        assert_eq!(cli.mode, Some(MotionMode::Sweep));
        assert_eq!(cli.screen, ScreenSize::new(1920, 1080));
        assert_eq!(cli.ticks, 600);
        assert_eq!(cli.carriages, None);
        assert!(!cli.head_only);
    }

    #[test]
    fn head_only_conflicts_with_carriages() {
        let parsed = Cli::try_parse_from([
            "trainpet",
            "--sheet",
            "train.png",
            "--head-only",
            "--carriages",
            "2",
        ]);
        assert!(parsed.is_err());
    }
}
