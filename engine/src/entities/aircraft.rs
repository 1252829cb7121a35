pub mod actions;
pub mod effects;

use glam::Vec2;
use internment::Intern;
use serde::Serialize;
use turborand::{TurboRand, rng::Rng};

use crate::{ALT_INTERVAL, SPD_INTERVAL, geometry::round_to_interval};

use super::{
  performance::{
    Category, PerformanceEnvelope, random_callsign, random_envelope,
  },
  waypoint::Waypoint,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AircraftTargets {
  pub heading: f32,
  pub speed: f32,
  pub altitude: f32,
}

/// Who holds heading authority over an aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Control {
  #[default]
  Operator,
  /// Established on final: the aircraft steers itself onto the runway and
  /// no longer accepts operator commands.
  Tower,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aircraft {
  callsign: Intern<String>,
  category: Category,
  envelope: PerformanceEnvelope,
  destination: Waypoint,

  cleared: bool,
  control: Control,

  /// In nautical miles.
  pos: Vec2,
  /// In degrees.
  heading: f32,
  /// In knots.
  speed: f32,
  /// In feet.
  altitude: f32,

  target: AircraftTargets,
}

impl Aircraft {
  /// Creates an aircraft holding its current altitude and speed. Position and
  /// heading are left for the caller to place.
  pub fn new(
    callsign: impl AsRef<str>,
    category: Category,
    envelope: PerformanceEnvelope,
    destination: Waypoint,
    altitude: f32,
    speed: f32,
  ) -> Self {
    Self {
      callsign: Intern::from_ref(callsign.as_ref()),
      category,
      envelope,
      destination,

      cleared: false,
      control: Control::Operator,

      pos: Vec2::ZERO,
      heading: 0.0,
      speed,
      altitude,

      target: AircraftTargets {
        heading: 0.0,
        speed,
        altitude,
      },
    }
  }

  /// Picks a type and callsign for `category` and an initial altitude and
  /// speed band based on whether `destination` is a runway.
  pub fn random(
    destination: Waypoint,
    category: Category,
    rng: &mut Rng,
  ) -> Self {
    let envelope = random_envelope(category, rng);
    let callsign = random_callsign(category, rng);
    let landing = destination.is_runway();

    let max_alt = envelope.max_altitude;
    let min_alt = envelope.min_altitude;
    let max_spd = envelope.max_speed;
    let min_spd = envelope.min_speed;

    let (altitude, target_altitude, speed) = if landing {
      let low = max_alt / 2;
      let altitude = round_to_interval(
        rng.i32(low..=max_alt.max(low)) as f32,
        ALT_INTERVAL,
      );

      let low = (max_spd / 2).max(min_spd);
      let speed = rng.i32(low..=max_spd.max(low));

      (altitude, altitude, speed)
    } else {
      let high = (max_alt / 3).max(min_alt);
      let target_altitude =
        round_to_interval(rng.i32(min_alt..=high) as f32, ALT_INTERVAL);

      let high = (max_spd / 2).max(min_spd);
      let speed = rng.i32(min_spd..=high);

      (round_to_interval(0.0, ALT_INTERVAL), target_altitude, speed)
    };

    let speed = round_to_interval(speed as f32, SPD_INTERVAL);
    let mut aircraft =
      Self::new(callsign, category, envelope, destination, altitude, speed);
    aircraft.target.altitude = target_altitude;

    aircraft
  }

  pub fn with_position(mut self, pos: Vec2, heading: f32) -> Self {
    self.set_location(pos);
    self.set_current_heading(heading);
    self
  }
}

// Accessors
impl Aircraft {
  pub fn callsign(&self) -> Intern<String> {
    self.callsign
  }

  pub fn category(&self) -> Category {
    self.category
  }

  pub fn envelope(&self) -> &PerformanceEnvelope {
    &self.envelope
  }

  pub fn destination(&self) -> &Waypoint {
    &self.destination
  }

  pub fn is_landing(&self) -> bool {
    self.destination.is_runway()
  }

  pub fn is_cleared(&self) -> bool {
    self.cleared
  }

  pub fn control(&self) -> Control {
    self.control
  }

  pub fn is_operator_controlled(&self) -> bool {
    self.control == Control::Operator
  }

  pub fn pos(&self) -> Vec2 {
    self.pos
  }

  /// Position scaled for a display drawing `px_per_nm` pixels per mile.
  pub fn px_pos(&self, px_per_nm: f32) -> Vec2 {
    self.pos * px_per_nm
  }

  pub fn heading(&self) -> f32 {
    self.heading
  }

  pub fn speed(&self) -> f32 {
    self.speed
  }

  pub fn altitude(&self) -> f32 {
    self.altitude
  }

  pub fn target(&self) -> &AircraftTargets {
    &self.target
  }

  /// Radius of the separation ring drawn around this aircraft, in nautical
  /// miles.
  pub fn separation_ring_radius(&self) -> f32 {
    match self.category {
      Category::Commercial => 3.0,
      Category::GeneralAviation => 1.0,
    }
  }

  /// Whether the current altitude satisfies the destination's clearance
  /// rule.
  pub fn can_be_cleared(&self) -> bool {
    self
      .destination
      .at_altitude(self.altitude, self.envelope.max_altitude as f32)
  }

  /// Cleared, over the destination and at its clearance altitude.
  pub fn at_destination(&self) -> bool {
    self.cleared && self.destination.in_range(self.pos) && self.can_be_cleared()
  }

  pub fn short_label(&self) -> String {
    format!(
      "{}\n{} {}",
      self.callsign,
      round_to_interval(self.altitude, 25.0),
      self.speed as i32
    )
  }

  pub fn long_label(&self) -> String {
    format!(
      "{} {}\n{} {}\n{} {}",
      self.callsign,
      self.envelope.id,
      self.destination.id,
      round_to_interval(self.target.altitude, 25.0),
      round_to_interval(self.altitude, 25.0),
      self.speed as i32
    )
  }
}
