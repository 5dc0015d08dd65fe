#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Alien Onslaught session.

mod collaborators;
mod pilots;

use std::{fs, path::PathBuf, thread, time::Duration};

use alien_onslaught_core::{Clock, GameMode, ManualClock, PlayerId, SpeedupScale, SystemClock};
use alien_onslaught_session::{Collaborators, FrameStatus, Session, SessionConfig};
use alien_onslaught_world::query;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    collaborators::{SharedHighScores, TracingScoreboard, TracingSound},
    pilots::Autopilot,
};

/// Headless Alien Onslaught session flown by scripted pilots.
#[derive(Debug, Parser)]
#[command(name = "alien-onslaught", version, about)]
struct CliArgs {
    /// TOML file with session parameters and settings overrides.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Game mode key, for example `boss_rush` or `cosmic_conflict`.
    #[arg(long)]
    mode: Option<String>,
    /// Difficulty tier: easy, medium or hard.
    #[arg(long)]
    difficulty: Option<String>,
    /// Number of ships taking part.
    #[arg(long)]
    players: Option<u8>,
    /// Seed of the spawning random stream.
    #[arg(long)]
    seed: Option<u64>,
    /// Frames to run before giving up on the session.
    #[arg(long, default_value_t = 36_000)]
    frames: u64,
    /// Pace frames against the wall clock instead of stepping time manually.
    #[arg(long)]
    realtime: bool,
    /// TOML high score table, read at start and written after a finished session.
    #[arg(long, value_name = "PATH")]
    high_scores: Option<PathBuf>,
}

impl CliArgs {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => SessionConfig::default(),
        };
        if let Some(mode) = &self.mode {
            config.mode = GameMode::from_key(mode);
        }
        if let Some(difficulty) = &self.difficulty {
            config.difficulty = SpeedupScale::from_key(difficulty);
        }
        if let Some(players) = self.players {
            config.players = players;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if config.mode.is_pvp() && self.players.is_none() {
            config.players = 2;
        }
        config.validate().context("invalid session configuration")?;
        Ok(config)
    }
}

/// Entry point for the Alien Onslaught command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();
    let config = args.session_config()?;
    let high_scores = match &args.high_scores {
        Some(path) => SharedHighScores::load(path)?,
        None => SharedHighScores::default(),
    };
    let collaborators = Collaborators {
        scoreboard: Box::new(TracingScoreboard),
        sound: Box::new(TracingSound),
        high_scores: Box::new(high_scores.clone()),
    };
    let step = Duration::from_millis(config.frame_duration_ms);

    let status = if args.realtime {
        let session = Session::new(&config, SystemClock::start(), collaborators)?;
        run(session, args.frames, || thread::sleep(step))
    } else {
        let clock = ManualClock::new();
        let session = Session::new(&config, clock.clone(), collaborators)?;
        run(session, args.frames, move || clock.advance(step))
    };

    if let (FrameStatus::Finished(_), Some(path)) = (status, &args.high_scores) {
        high_scores.save(path)?;
    }
    Ok(())
}

fn run<C: Clock>(mut session: Session<C>, frames: u64, mut wait: impl FnMut()) -> FrameStatus {
    let mut pilot = Autopilot::default();
    let mut status = FrameStatus::Running;
    for _ in 0..frames {
        wait();
        let inputs = pilot.inputs(session.world());
        status = session.frame(&inputs);
        if matches!(status, FrameStatus::Finished(_)) {
            break;
        }
    }

    let world = session.world();
    let stats = query::stats(world);
    info!(?status, level = stats.level, "session stopped");
    println!("Mode:        {}", session.mode().key());
    println!("Level:       {}", stats.level);
    match status {
        FrameStatus::Finished(outcome) => println!("Outcome:     {outcome:?}"),
        _ => println!("Outcome:     unfinished after {frames} frames"),
    }
    for player in PlayerId::ALL {
        if query::ship(world, player).active {
            println!("{:<12} {}", format!("{}:", player.name()), stats.scores[player]);
        }
    }
    println!("High score:  {}", stats.high_score);
    status
}
