use glam::Vec2;

use crate::{
  ALT_INTERVAL, HDG_INTERVAL, SPD_INTERVAL,
  geometry::{normalize_heading, round_to_interval},
};

use super::{Aircraft, Control};

// Placement, done by the simulator when the aircraft spawns.
impl Aircraft {
  pub fn set_location(&mut self, pos: Vec2) {
    self.pos = pos;
  }

  /// Sets the current heading and holds it.
  pub fn set_current_heading(&mut self, heading: f32) {
    self.heading = normalize_heading(heading);
    self.target.heading = self.heading;
  }
}

// Operator commands. Targets are rounded and clamped, never rejected.
impl Aircraft {
  pub fn set_target_altitude(&mut self, altitude: f32) {
    let altitude = round_to_interval(altitude, ALT_INTERVAL)
      .min(self.envelope.max_altitude as f32)
      .max(self.envelope.min_altitude as f32);

    self.target.altitude = altitude;
  }

  pub fn set_target_speed(&mut self, speed: f32) {
    let speed = round_to_interval(speed, SPD_INTERVAL)
      .min(self.envelope.max_speed as f32)
      .max(self.envelope.min_speed as f32);

    self.target.speed = speed;
  }

  pub fn set_target_heading(&mut self, heading: f32) {
    let heading = round_to_interval(heading, HDG_INTERVAL);
    self.target.heading = normalize_heading(heading);
  }

  /// Revokes clearance if held, otherwise grants it when the aircraft is at
  /// its clearance altitude.
  pub fn toggle_clearance(&mut self) {
    if self.cleared {
      self.cleared = false;
    } else if self.can_be_cleared() {
      self.cleared = true;
    }
  }

  pub fn cancel_clearance(&mut self) {
    self.cleared = false;
  }

  /// Passes heading authority to tower once a cleared arrival reaches the
  /// approach corridor at its clearance altitude. Returns `true` only on the
  /// call that makes the transition.
  pub fn try_hand_off(&mut self) -> bool {
    if self.control == Control::Tower
      || !self.is_landing()
      || !self.cleared
      || !self.destination.in_target_range(self.pos)
      || !self.can_be_cleared()
    {
      return false;
    }

    self.control = Control::Tower;
    self.target.altitude = 0.0;

    true
  }
}
