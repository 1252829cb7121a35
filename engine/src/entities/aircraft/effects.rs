use turborand::{TurboRand, rng::Rng};

use crate::{
  CLIMB_RATE, SECONDS_PER_HOUR, SPEED_CHANGE_RATE, STANDARD_TURN_RATE,
  engine::TickContext,
  geometry::{
    approach_heading, approach_value, heading_to_target, move_point,
  },
};

use super::{Aircraft, Control};

pub trait AircraftEffect {
  fn run(aircraft: &mut Aircraft, ctx: &TickContext, rng: &mut Rng);
}

pub struct AircraftUpdatePositionEffect;
impl AircraftEffect for AircraftUpdatePositionEffect {
  fn run(aircraft: &mut Aircraft, ctx: &TickContext, _: &mut Rng) {
    // Knots to nautical miles covered this tick.
    let distance = aircraft.speed * ctx.dt() / SECONDS_PER_HOUR;
    aircraft.pos = move_point(aircraft.pos, aircraft.heading, distance);
  }
}

/// Points a cleared aircraft at its destination. Operator-controlled
/// arrivals fly to the approach corridor, tower-controlled ones line up on
/// the runway itself.
pub struct AircraftUpdateClearedHeadingEffect;
impl AircraftEffect for AircraftUpdateClearedHeadingEffect {
  fn run(aircraft: &mut Aircraft, _: &TickContext, _: &mut Rng) {
    if !aircraft.cleared {
      return;
    }

    let target = match aircraft.control {
      Control::Operator => aircraft.destination.target_point(),
      Control::Tower => aircraft.destination.pos,
    };

    aircraft.target.heading = heading_to_target(aircraft.pos, target);
  }
}

pub struct AircraftUpdateFromTargetsEffect;
impl AircraftEffect for AircraftUpdateFromTargetsEffect {
  fn run(aircraft: &mut Aircraft, ctx: &TickContext, rng: &mut Rng) {
    let dt = ctx.dt();

    // Sampled every tick.
    let climb_rate =
      CLIMB_RATE.start + rng.f32() * (CLIMB_RATE.end - CLIMB_RATE.start);

    aircraft.speed = approach_value(
      aircraft.speed,
      aircraft.target.speed,
      SPEED_CHANGE_RATE * dt,
    );
    aircraft.altitude = approach_value(
      aircraft.altitude,
      aircraft.target.altitude,
      climb_rate * dt,
    );
    aircraft.heading = approach_heading(
      aircraft.heading,
      aircraft.target.heading,
      STANDARD_TURN_RATE * dt,
    );
  }
}

pub struct AircraftRevokeClearanceEffect;
impl AircraftEffect for AircraftRevokeClearanceEffect {
  fn run(aircraft: &mut Aircraft, _: &TickContext, _: &mut Rng) {
    if aircraft.cleared && !aircraft.can_be_cleared() {
      tracing::debug!("{} lost clearance", aircraft.callsign);
      aircraft.cleared = false;
    }
  }
}

impl Aircraft {
  /// Advances the aircraft by one tick. Does nothing while paused.
  pub fn update(&mut self, ctx: &TickContext, rng: &mut Rng) {
    if ctx.is_paused() {
      return;
    }

    AircraftUpdatePositionEffect::run(self, ctx, rng);
    AircraftUpdateClearedHeadingEffect::run(self, ctx, rng);
    AircraftUpdateFromTargetsEffect::run(self, ctx, rng);
    AircraftRevokeClearanceEffect::run(self, ctx, rng);
  }
}
