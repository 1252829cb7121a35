use std::path::PathBuf;

use clap::Parser;
use engine::entities::airspace::AirspaceCode;
use thiserror::Error;

use crate::config::{AirspaceConfig, Config, ConfigError};

pub mod config;
pub mod controller;
pub mod runner;

#[derive(Error, Debug)]
pub enum Error {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("failed to serialise snapshot: {0}")]
  Snapshot(#[from] serde_json::Error),
  #[error("failed to write snapshot to {path}: {source}")]
  Write {
    path: PathBuf,
    source: std::io::Error,
  },
}

#[derive(Parser, Debug)]
#[command(version, about = "Approach control simulator")]
pub struct Cli {
  /// The path to the config file.
  #[arg(short, long, default_value = None)]
  pub config_path: Option<PathBuf>,

  /// The seed to use for the random number generator.
  #[arg(short, long)]
  pub seed: Option<u64>,

  /// A built-in airspace to load instead of the configured one.
  #[arg(short, long)]
  pub airspace: Option<AirspaceCode>,

  /// Simulated seconds per real second. Zero pauses.
  #[arg(short, long)]
  pub game_speed: Option<u32>,

  /// Ticks per second.
  #[arg(long)]
  pub frame_rate: Option<u32>,

  /// Stop after this many ticks.
  #[arg(short, long)]
  pub ticks: Option<u64>,

  /// Pace ticks to the wall clock.
  #[arg(long)]
  pub realtime: bool,

  /// Leave aircraft alone instead of running the autopilot.
  #[arg(long)]
  pub manual: bool,

  /// Keep running after separation is lost or an aircraft is lost.
  #[arg(long)]
  pub keep_going: bool,

  /// Where to write a JSON snapshot of the final state.
  #[arg(long, default_value = None)]
  pub snapshot: Option<PathBuf>,
}

impl Cli {
  /// Flags take precedence over the config file.
  pub fn apply(&self, config: &mut Config) {
    let simulation = &mut config.simulation;

    if let Some(seed) = self.seed {
      simulation.seed = Some(seed);
    }
    if let Some(game_speed) = self.game_speed {
      simulation.game_speed = game_speed;
    }
    if let Some(frame_rate) = self.frame_rate {
      simulation.frame_rate = frame_rate;
    }
    if let Some(ticks) = self.ticks {
      simulation.ticks = Some(ticks);
    }
    if self.realtime {
      simulation.realtime = true;
    }
    if self.manual {
      simulation.autopilot = false;
    }
    if self.keep_going {
      simulation.stop_on_incident = false;
    }

    if let Some(code) = self.airspace {
      config.airspace = AirspaceConfig::Code { code };
    }
  }
}
