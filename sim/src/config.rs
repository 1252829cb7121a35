use std::path::{Path, PathBuf};

use engine::{
  ALT_INTERVAL, FRAME_RATE,
  entities::{
    airspace::{Airspace, AirspaceCode, AirspaceError, SeparationMinima},
    waypoint::{Waypoint, WaypointError},
  },
  geometry::round_to_interval,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use turborand::rng::Rng;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Read {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("failed to parse config file: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("invalid airspace: {0}")]
  Airspace(#[from] AirspaceError),
}

impl From<WaypointError> for ConfigError {
  fn from(value: WaypointError) -> Self {
    Self::Airspace(value.into())
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  pub simulation: SimulationConfig,
  pub airspace: AirspaceConfig,
}

impl Config {
  pub fn from_path<T>(path: T) -> Result<Self, ConfigError>
  where
    T: AsRef<Path>,
  {
    let path = path.as_ref();
    let config =
      std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
      })?;

    config.parse()
  }

  /// `<config dir>/approach-control/config.toml` on this platform.
  pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "approach-control")
      .map(|dirs| dirs.config_dir().join("config.toml"))
  }
}

impl std::str::FromStr for Config {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(toml::from_str(s)?)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
  pub seed: Option<u64>,
  pub game_speed: u32,
  pub frame_rate: u32,
  /// Stop after this many ticks. Runs until interrupted when unset.
  pub ticks: Option<u64>,
  pub stop_on_incident: bool,
  pub autopilot: bool,
  /// Pace ticks to the wall clock instead of running flat out.
  pub realtime: bool,
}

impl Default for SimulationConfig {
  fn default() -> Self {
    Self {
      seed: None,
      game_speed: 1,
      frame_rate: FRAME_RATE,
      ticks: None,
      stop_on_incident: true,
      autopilot: true,
      realtime: false,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AirspaceConfig {
  Code { code: AirspaceCode },
  Custom(CustomAirspace),
}

impl Default for AirspaceConfig {
  fn default() -> Self {
    Self::Code {
      code: AirspaceCode::default(),
    }
  }
}

impl AirspaceConfig {
  pub fn build(&self, rng: &mut Rng) -> Result<Airspace, ConfigError> {
    match self {
      Self::Code { code } => Ok(Airspace::from_code(*code, rng)?),
      Self::Custom(custom) => {
        let inbound = custom
          .inbound
          .iter()
          .map(|w| w.build(rng))
          .collect::<Result<Vec<_>, _>>()?;
        let outbound = custom
          .outbound
          .iter()
          .map(|w| w.build(rng))
          .collect::<Result<Vec<_>, _>>()?;

        Ok(Airspace::new(
          &custom.id,
          custom.aircraft_per_minute,
          custom.radar_range,
          custom.separation,
          inbound,
          outbound,
        )?)
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAirspace {
  pub id: String,
  pub aircraft_per_minute: f32,
  pub radar_range: f32,
  #[serde(default)]
  pub separation: SeparationMinima,
  pub inbound: Vec<WaypointConfig>,
  pub outbound: Vec<WaypointConfig>,
}

/// Positions are `[x, y]` in nautical miles from the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum WaypointConfig {
  Runway {
    id: String,
    pos: Vec2,
    /// In feet.
    length: f32,
    /// Taken from the identifier when omitted.
    heading: Option<f32>,
  },
  Airway {
    id: String,
    pos: Vec2,
    exit_heading: f32,
    /// Drawn at random when omitted.
    clearance_offset: Option<f32>,
  },
}

impl WaypointConfig {
  pub fn build(&self, rng: &mut Rng) -> Result<Waypoint, WaypointError> {
    match self {
      Self::Runway {
        id,
        pos,
        length,
        heading: Some(heading),
      } => Ok(Waypoint::runway_with_heading(id, *pos, *length, *heading)),
      Self::Runway {
        id,
        pos,
        length,
        heading: None,
      } => Waypoint::runway(id, *pos, *length),
      Self::Airway {
        id,
        pos,
        exit_heading,
        clearance_offset: Some(offset),
      } => Ok(Waypoint::airway_with_offset(
        id,
        *pos,
        *exit_heading,
        round_to_interval(*offset, ALT_INTERVAL),
      )),
      Self::Airway {
        id,
        pos,
        exit_heading,
        clearance_offset: None,
      } => Ok(Waypoint::airway(id, *pos, *exit_heading, rng)),
    }
  }
}
