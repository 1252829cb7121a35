use glam::Vec2;
use internment::Intern;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use turborand::{TurboRand, rng::Rng};

use crate::{
  ALT_INTERVAL, AIRWAY_CLEARANCE_OFFSET_MAX, APPROACH_CORRIDOR_SCALE,
  ARRIVAL_TOLERANCE, FEET_PER_NAUTICAL_MILE, HDG_INTERVAL,
  RUNWAY_CLEARANCE_ALTITUDE,
  geometry::{heading_to_radians, normalize_heading, round_to_interval},
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaypointError {
  #[error("invalid runway identifier: {0}")]
  RunwayIdentifier(String),
}

/// Exit heading encoded in a runway identifier, e.g. `13L` is 130 and `36`
/// or `00` is 360.
pub fn runway_heading(identifier: &str) -> Result<f32, WaypointError> {
  let digits: String =
    identifier.chars().filter(|c| c.is_ascii_digit()).collect();
  let number: u32 = digits
    .parse()
    .map_err(|_| WaypointError::RunwayIdentifier(identifier.to_owned()))?;

  let mut heading = normalize_heading(number as f32 * 10.0).trunc();
  if heading == 0.0 {
    heading = 360.0;
  }

  Ok(round_to_interval(heading, HDG_INTERVAL))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum WaypointKind {
  /// A landing destination (or departure origin).
  Runway {
    /// In nautical miles.
    length: f32,
  },
  /// An entry or exit fix on the edge of the airspace.
  Airway {
    /// Aircraft must sit exactly this far below their ceiling to be cleared
    /// direct to this fix.
    clearance_offset: f32,
  },
}

/// A named node of the airspace. Positions are in nautical miles with `y`
/// growing downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
  pub id: Intern<String>,
  pub pos: Vec2,
  /// The heading an aircraft adopts when it spawns here.
  pub exit_heading: f32,
  pub kind: WaypointKind,
}

impl Waypoint {
  /// `length` is given in feet.
  pub fn runway(
    id: &str,
    pos: Vec2,
    length: f32,
  ) -> Result<Self, WaypointError> {
    let heading = runway_heading(id)?;
    Ok(Self::runway_with_heading(id, pos, length, heading))
  }

  pub fn runway_with_heading(
    id: &str,
    pos: Vec2,
    length: f32,
    exit_heading: f32,
  ) -> Self {
    Self {
      id: Intern::from_ref(id),
      pos,
      exit_heading,
      kind: WaypointKind::Runway {
        length: length / FEET_PER_NAUTICAL_MILE,
      },
    }
  }

  /// Picks a clearance offset in `[0, 4000]` ft rounded to 1000 ft.
  pub fn airway(id: &str, pos: Vec2, exit_heading: f32, rng: &mut Rng) -> Self {
    let offset = rng.i32(0..=AIRWAY_CLEARANCE_OFFSET_MAX) as f32;
    Self::airway_with_offset(
      id,
      pos,
      exit_heading,
      round_to_interval(offset, ALT_INTERVAL),
    )
  }

  pub fn airway_with_offset(
    id: &str,
    pos: Vec2,
    exit_heading: f32,
    clearance_offset: f32,
  ) -> Self {
    Self {
      id: Intern::from_ref(id),
      pos,
      exit_heading,
      kind: WaypointKind::Airway { clearance_offset },
    }
  }

  pub fn is_runway(&self) -> bool {
    matches!(self.kind, WaypointKind::Runway { .. })
  }

  /// For a runway, the altitude at or below which an aircraft may be cleared
  /// to land. For an airway, the distance below the aircraft's ceiling it
  /// must hold to be cleared direct.
  pub fn clearance_altitude_offset(&self) -> f32 {
    match self.kind {
      WaypointKind::Runway { .. } => RUNWAY_CLEARANCE_ALTITUDE,
      WaypointKind::Airway { clearance_offset } => clearance_offset,
    }
  }

  /// The point cleared aircraft are vectored to. For runways this is the
  /// approach-corridor entry on the extended centreline.
  pub fn target_point(&self) -> Vec2 {
    match self.kind {
      WaypointKind::Runway { length } => {
        let radians = heading_to_radians(self.exit_heading);
        let offset = Vec2::new(radians.cos(), -radians.sin())
          * length
          * APPROACH_CORRIDOR_SCALE;

        self.pos - offset
      }
      WaypointKind::Airway { .. } => self.pos,
    }
  }

  pub fn at_altitude(&self, altitude: f32, max_altitude: f32) -> bool {
    match self.kind {
      WaypointKind::Runway { .. } => altitude <= RUNWAY_CLEARANCE_ALTITUDE,
      WaypointKind::Airway { clearance_offset } => {
        altitude == max_altitude - clearance_offset
      }
    }
  }

  pub fn in_range(&self, point: Vec2) -> bool {
    within_tolerance(self.pos, point)
  }

  pub fn in_target_range(&self, point: Vec2) -> bool {
    within_tolerance(self.target_point(), point)
  }
}

fn within_tolerance(a: Vec2, b: Vec2) -> bool {
  (a.x - b.x).abs() <= ARRIVAL_TOLERANCE
    && (a.y - b.y).abs() <= ARRIVAL_TOLERANCE
}
