use engine::{
  HDG_INTERVAL, RUNWAY_CLEARANCE_ALTITUDE,
  command::{Command, Task},
  engine::Engine,
  entities::aircraft::Aircraft,
  geometry::{heading_difference, heading_to_target},
};

/// Scripted stand-in for a human controller. Vectors every uncleared
/// aircraft toward its destination, brings it to the clearance altitude and
/// clears it as soon as it is eligible.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl Autopilot {
  pub fn commands(&self, engine: &Engine) -> Vec<Command> {
    engine
      .aircraft()
      .filter(|a| a.is_operator_controlled() && !a.is_cleared())
      .flat_map(|a| self.plan(a))
      .collect()
  }

  fn plan(&self, aircraft: &Aircraft) -> Vec<Command> {
    let id = aircraft.callsign();
    let mut commands = Vec::new();

    if aircraft.can_be_cleared() {
      commands.push(Command {
        id,
        task: Task::ToggleClearance,
      });
      return commands;
    }

    let altitude = clearance_altitude(aircraft);
    if aircraft.target().altitude != altitude {
      commands.push(Command {
        id,
        task: Task::Altitude(altitude),
      });
    }

    let heading = heading_to_target(
      aircraft.pos(),
      aircraft.destination().target_point(),
    );
    let off_course = heading_difference(aircraft.target().heading, heading)
      .min(heading_difference(heading, aircraft.target().heading));
    if off_course >= HDG_INTERVAL {
      commands.push(Command {
        id,
        task: Task::Heading(heading),
      });
    }

    commands
  }
}

/// The altitude at which `aircraft` becomes eligible for clearance.
pub fn clearance_altitude(aircraft: &Aircraft) -> f32 {
  if aircraft.is_landing() {
    RUNWAY_CLEARANCE_ALTITUDE
  } else {
    aircraft.envelope().max_altitude as f32
      - aircraft.destination().clearance_altitude_offset()
  }
}
