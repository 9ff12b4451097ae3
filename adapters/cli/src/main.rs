#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Hopscroll experience.

mod autopilot;
mod config;
mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hopscroll_core::{Event, GameState};
use hopscroll_rendering::{Color, Presentation, RenderingBackend, Scene, Viewport};
use hopscroll_rendering_macroquad::MacroquadBackend;
use hopscroll_system_session::{Config, Session};
use tracing::info;

/// Command-line arguments for launching Hopscroll.
#[derive(Debug, Parser)]
#[command(name = "hopscroll", about = "Endless vertical platformer", version)]
struct CliArgs {
    /// Seed for platform generation; a random seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding the default tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Runs the autopilot for the given number of frames without a window.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,
    /// Integer scale factor applied to the 256x240 playfield.
    #[arg(long, default_value_t = Viewport::DEFAULT_SCALE)]
    scale: u32,
    /// Disables vertical sync.
    #[arg(long)]
    no_vsync: bool,
    /// Logs the frames-per-second counter once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Hopscroll command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();
    let tuning = config::load_tuning(args.config.as_deref()).context("failed to load tuning")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "starting hopscroll");

    let session = Session::new(Config::new(tuning, seed));
    match args.headless {
        Some(frames) => {
            let summary = run_headless(session, frames);
            println!("{summary}");
            Ok(())
        }
        None => run_windowed(session, &args),
    }
}

fn run_windowed(mut session: Session, args: &CliArgs) -> Result<()> {
    let viewport = Viewport::new(args.scale).context("invalid --scale")?;
    let mut initial = Scene::default();
    scene::capture(session.world(), &mut initial);
    let presentation = Presentation::new(
        "Hopscroll",
        Color::from_rgb_u8(0x00, 0x58, 0xf8),
        viewport,
        initial,
    );

    MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |input, frame| {
            let _ = session.step(input.controls());
            scene::capture(session.world(), frame);
        })
}

/// Totals gathered while the autopilot plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct HeadlessSummary {
    frames: u64,
    runs: u32,
    best_score: u32,
    items: u32,
}

impl std::fmt::Display for HeadlessSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frames: {}\nruns: {}\nbest score: {}\nitems: {}",
            self.frames, self.runs, self.best_score, self.items
        )
    }
}

fn run_headless(mut session: Session, frames: u64) -> HeadlessSummary {
    let mut summary = HeadlessSummary {
        runs: 1,
        ..HeadlessSummary::default()
    };

    for _ in 0..frames {
        let report = session.step(autopilot::controls(session.world()));
        summary.frames += 1;
        for event in &report.events {
            match event {
                Event::RunReset { .. } => summary.runs += 1,
                Event::ScoreAccrued { total, .. } => {
                    summary.best_score = summary.best_score.max(*total);
                }
                Event::ItemCollected { .. } => summary.items += 1,
                _ => {}
            }
        }
        if report.state == GameState::GameOver {
            info!(score = summary.best_score, "run over");
        }
    }

    summary
}
