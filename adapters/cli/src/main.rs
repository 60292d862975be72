#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the snake game.

mod config;
mod headless;
mod high_score;
mod pacing;
mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use snake_core::{AppleCount, MapSize, Speed};
use snake_rendering::{Color, Presentation, RenderingBackend};
use snake_rendering_macroquad::MacroquadBackend;
use snake_system_controller::Game;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    headless::{Pace, Step},
    high_score::FileHighScore,
};

const DEFAULT_HIGH_SCORE_FILE: &str = "snake-high-score.txt";

/// Arcade snake with smooth, interpolated motion.
#[derive(Debug, Parser)]
#[command(name = "snake", version, about)]
struct Cli {
    /// Configuration file; missing files fall back to the defaults.
    #[arg(long, default_value = "snake.toml")]
    config: PathBuf,

    /// Board density: small, normal or large.
    #[arg(long)]
    map_size: Option<MapSize>,

    /// Step pace: slow, normal or fast.
    #[arg(long)]
    speed: Option<Speed>,

    /// Apples in play: one, three or five.
    #[arg(long)]
    apples: Option<AppleCount>,

    /// Seed for apple relocation.
    #[arg(long)]
    seed: Option<u64>,

    /// File the best score is kept in.
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Runs without a window and prints the final board.
    #[arg(long)]
    headless: bool,

    /// Moves to play in headless mode after the script ran out.
    #[arg(long, default_value_t = 0)]
    ticks: usize,

    /// Headless input, one character per move: L, U, R, D or `.` to wait.
    #[arg(long, default_value = "")]
    script: String,

    /// Paces headless frames in real time instead of firing them at once.
    #[arg(long)]
    realtime: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(map_size) = self.map_size {
            config.options.map_size = map_size;
        }
        if let Some(speed) = self.speed {
            config.options.speed = speed;
        }
        if let Some(apples) = self.apples {
            config.options.apples = apples;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }

    fn high_score_path(&self, config: &Config) -> PathBuf {
        self.high_score_file
            .clone()
            .or_else(|| config.high_score_file.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HIGH_SCORE_FILE))
    }
}

/// Entry point for the snake command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    cli.apply_overrides(&mut config);

    let seed = config.seed.unwrap_or_else(rand::random);
    let store = FileHighScore::open_or_default(cli.high_score_path(&config));
    let game = Game::new(config.options, config.window.viewport(), seed, store, ())
        .with_palette(config.palette);
    info!(seed, options = ?config.options, "configured");

    if cli.headless {
        let steps: Vec<Step> = headless::parse_script(&cli.script)?;
        let pace = if cli.realtime {
            Pace::RealTime
        } else {
            Pace::Immediate
        };
        let mut game = game;
        let report = headless::run(&mut game, &steps, cli.ticks, pace);
        print!("{}", report.board);
        println!("{}", report.summary());
        return Ok(());
    }

    run_window(game, &config)
}

fn run_window(mut game: Game<FileHighScore>, config: &Config) -> Result<()> {
    let scene = scene::scene_for(&game.render_snapshot(game.fraction()))?;
    let presentation = Presentation::new("Snake", Color::from_rgb_u8(20, 12, 28), scene);
    let backend = MacroquadBackend::new()
        .with_vsync(config.window.vsync)
        .with_show_fps(config.window.show_fps);

    backend
        .run(presentation, move |dt, input, scene| {
            if input.restart {
                game.restart();
            }
            if input.pause_toggle {
                if game.is_paused() {
                    game.resume();
                } else {
                    game.pause();
                }
            }
            if let Some(direction) = input.direction {
                let _ = game.on_direction_input(direction);
            }
            let _ = game.advance(dt);
            scene::populate(scene, &game.render_snapshot(game.fraction()), game.is_paused());
        })
        .context("rendering backend failed")
}
