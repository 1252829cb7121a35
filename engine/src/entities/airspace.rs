use std::{fmt, str::FromStr};

use glam::Vec2;
use internment::Intern;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use turborand::{TurboRand, rng::Rng};

use super::waypoint::{Waypoint, WaypointError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AirspaceError {
  #[error("unknown airspace code: {0}")]
  UnknownCode(String),
  #[error("aircraft per minute must be positive for {id}, got {rate}")]
  SpawnRate { id: String, rate: f32 },
  #[error("radar range must be positive for {id}, got {range}")]
  RadarRange { id: String, range: f32 },
  #[error("separation minima for {0} must be positive")]
  Separation(String),
  #[error("{0} has no inbound waypoints")]
  NoInbound(String),
  #[error("{0} has no outbound waypoints")]
  NoOutbound(String),
  #[error(transparent)]
  Waypoint(#[from] WaypointError),
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum AirspaceCode {
  #[default]
  KJFK,
}

impl FromStr for AirspaceCode {
  type Err = AirspaceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_uppercase().as_str() {
      "KJFK" => Ok(Self::KJFK),
      _ => Err(AirspaceError::UnknownCode(s.to_owned())),
    }
  }
}

impl fmt::Display for AirspaceCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::KJFK => write!(f, "KJFK"),
    }
  }
}

/// Two aircraft are in conflict when they are closer than both `horizontal`
/// (nm) and `vertical` (ft). Pairs inside `vertical` and `warning` (nm) are
/// reported as proximity warnings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparationMinima {
  pub horizontal: f32,
  pub vertical: f32,
  pub warning: f32,
}

impl Default for SeparationMinima {
  fn default() -> Self {
    Self {
      horizontal: 3.0,
      vertical: 1000.0,
      warning: 5.0,
    }
  }
}

/// The controlled region: a square of `radar_range` nautical miles with the
/// origin at the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Airspace {
  pub id: Intern<String>,
  pub aircraft_per_minute: f32,
  pub radar_range: f32,
  pub separation: SeparationMinima,

  /// Arrival destinations (and departure origins).
  pub inbound: Vec<Waypoint>,
  /// Departure destinations (and arrival origins).
  pub outbound: Vec<Waypoint>,
}

impl Airspace {
  pub fn new(
    id: &str,
    aircraft_per_minute: f32,
    radar_range: f32,
    separation: SeparationMinima,
    inbound: Vec<Waypoint>,
    outbound: Vec<Waypoint>,
  ) -> Result<Self, AirspaceError> {
    if !(aircraft_per_minute > 0.0) {
      return Err(AirspaceError::SpawnRate {
        id: id.to_owned(),
        rate: aircraft_per_minute,
      });
    }
    if !(radar_range > 0.0) {
      return Err(AirspaceError::RadarRange {
        id: id.to_owned(),
        range: radar_range,
      });
    }
    if !(separation.horizontal > 0.0
      && separation.vertical > 0.0
      && separation.warning > 0.0)
    {
      return Err(AirspaceError::Separation(id.to_owned()));
    }
    if inbound.is_empty() {
      return Err(AirspaceError::NoInbound(id.to_owned()));
    }
    if outbound.is_empty() {
      return Err(AirspaceError::NoOutbound(id.to_owned()));
    }

    Ok(Self {
      id: Intern::from_ref(id),
      aircraft_per_minute,
      radar_range,
      separation,
      inbound,
      outbound,
    })
  }

  /// Builds one of the built-in layouts. Airway clearance offsets are drawn
  /// from `rng`.
  pub fn from_code(
    code: AirspaceCode,
    rng: &mut Rng,
  ) -> Result<Self, AirspaceError> {
    match code {
      AirspaceCode::KJFK => {
        let range = 40.0;
        let center = range / 2.0;

        let inbound = vec![
          Waypoint::runway(
            "13L",
            Vec2::new(center + 1.23, center - 0.58),
            10000.0,
          )?,
          Waypoint::runway("13R", Vec2::new(center, center), 14511.0)?,
        ];
        let outbound =
          vec![Waypoint::airway("BIG", Vec2::new(1.0, center), 90.0, rng)];

        Self::new(
          &code.to_string(),
          0.7,
          range,
          SeparationMinima::default(),
          inbound,
          outbound,
        )
      }
    }
  }

  pub fn seconds_per_aircraft(&self) -> f32 {
    60.0 / self.aircraft_per_minute
  }

  /// Outbound waypoints first, then inbound.
  pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
    self.outbound.iter().chain(self.inbound.iter())
  }

  pub fn waypoint_count(&self) -> usize {
    self.outbound.len() + self.inbound.len()
  }

  /// Three roster slots per waypoint.
  pub fn capacity(&self) -> usize {
    self.waypoint_count() * 3
  }

  pub fn find_waypoint(&self, id: &str) -> Option<&Waypoint> {
    self.waypoints().find(|w| w.id.as_str() == id)
  }

  pub fn random_origin(&self, rng: &mut Rng) -> Option<&Waypoint> {
    rng.sample_iter(self.waypoints())
  }

  pub fn random_inbound(&self, rng: &mut Rng) -> Option<&Waypoint> {
    rng.sample(&self.inbound)
  }

  pub fn random_outbound(&self, rng: &mut Rng) -> Option<&Waypoint> {
    rng.sample(&self.outbound)
  }

  pub fn contains_point(&self, point: Vec2) -> bool {
    (0.0..=self.radar_range).contains(&point.x)
      && (0.0..=self.radar_range).contains(&point.y)
  }

  /// Display scale for a `width` by `height` pixel viewport. Never below 1.
  pub fn px_per_nm(&self, width: u32, height: u32) -> f32 {
    (width.min(height) as f32 / self.radar_range).floor().max(1.0)
  }
}
