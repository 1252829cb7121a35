use glam::Vec2;
use internment::Intern;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace, warn};
use turborand::{TurboRand, rng::Rng};

use crate::{
  FRAME_RATE,
  command::{Command, Task},
  entities::{
    aircraft::Aircraft, airspace::Airspace, performance::Category,
  },
  geometry::separation,
};

/// Injected into every tick by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickContext {
  /// Ticks per second of real time.
  pub frame_rate: u32,
  /// Simulated seconds per real second. Zero pauses the simulation.
  pub game_speed: u32,
}

impl Default for TickContext {
  fn default() -> Self {
    Self {
      frame_rate: FRAME_RATE,
      game_speed: 1,
    }
  }
}

impl TickContext {
  pub fn new(frame_rate: u32, game_speed: u32) -> Self {
    Self {
      frame_rate: frame_rate.max(1),
      game_speed,
    }
  }

  /// Simulated seconds covered by one tick.
  pub fn dt(&self) -> f32 {
    self.game_speed as f32 / self.frame_rate as f32
  }

  pub fn is_paused(&self) -> bool {
    self.game_speed == 0
  }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpawnError {
  #[error("all {0} roster slots are taken")]
  Full(usize),
  #[error("{0} would conflict with {1}")]
  Conflict(Intern<String>, Intern<String>),
  #[error("{0} is already in the airspace")]
  DuplicateCallsign(Intern<String>),
  #[error("no route available")]
  NoRoute,
}

/// The first event that ends a clean session. Never cleared once raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[serde(tag = "type", content = "value")]
pub enum Incident {
  /// Two aircraft inside both separation minima.
  Conflict(Intern<String>, Intern<String>),
  /// An uncleared aircraft left the radar picture.
  Lost(Intern<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeparationKind {
  Warning,
  Conflict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Separation {
  pub aircraft: (Intern<String>, Intern<String>),
  /// In nautical miles.
  pub horizontal: f32,
  /// In feet.
  pub vertical: f32,
  pub kind: SeparationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[serde(tag = "type", content = "value")]
pub enum Event {
  Spawned(Intern<String>),
  HandedOff(Intern<String>),
  Arrived { id: Intern<String>, altitude: f32 },
  Lost(Intern<String>),
  Incident(Incident),
}

/// Serialisable view of the simulation between ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
  pub airspace: Intern<String>,
  pub ticks: u64,
  pub aircraft: Vec<Aircraft>,
  pub separations: Vec<Separation>,
  pub completed: usize,
  pub lost: usize,
  pub incident: Option<Incident>,
}

#[derive(Debug)]
pub struct Engine {
  pub airspace: Airspace,
  pub commands: Vec<Command>,

  roster: Vec<Option<Aircraft>>,
  separations: Vec<Separation>,
  incident: Option<Incident>,

  completed: usize,
  lost: usize,
  ticks: u64,

  rng: Rng,
}

impl Engine {
  pub fn new(airspace: Airspace, rng: Rng) -> Self {
    let roster = vec![None; airspace.capacity()];

    Self {
      airspace,
      commands: Vec::new(),

      roster,
      separations: Vec::new(),
      incident: None,

      completed: 0,
      lost: 0,
      ticks: 0,

      rng,
    }
  }

  /// Seeds the airspace with a random number of aircraft, between one and
  /// the number of waypoints. Attempts that would conflict are dropped.
  pub fn populate(&mut self) -> Vec<Event> {
    let max = self.airspace.waypoint_count().max(1);
    let count = self.rng.usize(1..=max);

    let events: Vec<Event> = (0..count)
      .filter_map(|_| self.spawn_random().ok())
      .map(Event::Spawned)
      .collect();

    info!(
      "populated {} with {} of {} aircraft",
      self.airspace.id,
      events.len(),
      count
    );

    events
  }

  /// Spawns a commercial aircraft at a random waypoint. Runway origins get an
  /// outbound destination, airway origins an inbound one.
  pub fn spawn_random(&mut self) -> Result<Intern<String>, SpawnError> {
    let origin = self
      .airspace
      .random_origin(&mut self.rng)
      .cloned()
      .ok_or(SpawnError::NoRoute)?;

    let destination = if origin.is_runway() {
      self.airspace.random_outbound(&mut self.rng)
    } else {
      self.airspace.random_inbound(&mut self.rng)
    }
    .cloned()
    .ok_or(SpawnError::NoRoute)?;

    let aircraft =
      Aircraft::random(destination, Category::Commercial, &mut self.rng)
        .with_position(origin.pos, origin.exit_heading);

    self.spawn(aircraft)
  }

  /// Inserts an already-placed aircraft into the first free slot, unless it
  /// would start in conflict with a live aircraft.
  pub fn spawn(
    &mut self,
    aircraft: Aircraft,
  ) -> Result<Intern<String>, SpawnError> {
    let callsign = aircraft.callsign();
    let result = self.check_spawn(&aircraft);

    match result {
      Ok(slot) => {
        info!(
          "spawned {} ({}) at {} bound for {}",
          callsign,
          aircraft.envelope().id,
          aircraft.pos(),
          aircraft.destination().id
        );
        self.roster[slot] = Some(aircraft);
        Ok(callsign)
      }
      Err(e) => {
        debug!("rejected spawn of {}: {}", callsign, e);
        Err(e)
      }
    }
  }

  fn check_spawn(&self, aircraft: &Aircraft) -> Result<usize, SpawnError> {
    let slot = self
      .roster
      .iter()
      .position(Option::is_none)
      .ok_or(SpawnError::Full(self.roster.len()))?;

    if self.find(&aircraft.callsign()).is_some() {
      return Err(SpawnError::DuplicateCallsign(aircraft.callsign()));
    }

    if let Some(other) = self.aircraft().find(|other| {
      let (horizontal, vertical) = separation(
        aircraft.pos(),
        aircraft.altitude(),
        other.pos(),
        other.altitude(),
      );
      self.is_conflict(horizontal, vertical)
    }) {
      return Err(SpawnError::Conflict(
        aircraft.callsign(),
        other.callsign(),
      ));
    }

    Ok(slot)
  }

  fn is_conflict(&self, horizontal: f32, vertical: f32) -> bool {
    let minima = &self.airspace.separation;
    vertical < minima.vertical && horizontal < minima.horizontal
  }

  /// Queues a command for the start of the next tick.
  pub fn queue(&mut self, command: Command) {
    self.commands.push(command);
  }

  /// Applies a command now. Returns `false` if the callsign is unknown or the
  /// aircraft no longer takes operator commands.
  pub fn execute(&mut self, command: &Command) -> bool {
    let Some(aircraft) = self.find_mut(&command.id) else {
      debug!("ignored {}: no such aircraft", command);
      return false;
    };

    if !aircraft.is_operator_controlled() {
      debug!("ignored {}: under tower control", command);
      return false;
    }

    match command.task {
      Task::Altitude(x) => aircraft.set_target_altitude(x),
      Task::Speed(x) => aircraft.set_target_speed(x),
      Task::Heading(x) => {
        aircraft.cancel_clearance();
        aircraft.set_target_heading(x);
      }
      Task::ToggleClearance => aircraft.toggle_clearance(),
      Task::CancelClearance => aircraft.cancel_clearance(),
    }

    debug!("executed {}", command);
    true
  }

  /// Runs one simulation step and returns what happened during it.
  pub fn tick(&mut self, ctx: &TickContext) -> Vec<Event> {
    let mut events = Vec::new();

    for command in core::mem::take(&mut self.commands) {
      self.execute(&command);
    }

    self.update(ctx);
    self.cleanup(&mut events);
    self.check_separation(&mut events);

    if self.roll_spawn(ctx) {
      match self.spawn_random() {
        Ok(id) => events.push(Event::Spawned(id)),
        Err(e) => debug!("no spawn this tick: {}", e),
      }
    }

    self.ticks += 1;
    trace!(
      "tick {} with {} aircraft and {} events",
      self.ticks,
      self.aircraft().count(),
      events.len()
    );

    events
  }

  fn update(&mut self, ctx: &TickContext) {
    for aircraft in self.roster.iter_mut().flatten() {
      aircraft.update(ctx, &mut self.rng);
    }
  }

  fn cleanup(&mut self, events: &mut Vec<Event>) {
    let mut incidents = Vec::new();

    for slot in self.roster.iter_mut() {
      let Some(aircraft) = slot else {
        continue;
      };
      let id = aircraft.callsign();

      if aircraft.at_destination() {
        info!(
          "{} arrived at {} at {} ft",
          id,
          aircraft.destination().id,
          aircraft.altitude()
        );
        events.push(Event::Arrived {
          id,
          altitude: aircraft.altitude(),
        });
        self.completed += 1;
        *slot = None;
      } else if aircraft.try_hand_off() {
        info!("{} handed off to tower", id);
        events.push(Event::HandedOff(id));
      } else if !aircraft.is_cleared()
        && !self.airspace.contains_point(aircraft.pos())
      {
        warn!("{} left the airspace without clearance", id);
        events.push(Event::Lost(id));
        incidents.push(Incident::Lost(id));
        self.lost += 1;
        *slot = None;
      }
    }

    for incident in incidents {
      self.raise_incident(incident, events);
    }
  }

  fn check_separation(&mut self, events: &mut Vec<Event>) {
    let minima = self.airspace.separation;
    let warning_radius = minima.warning.max(minima.horizontal);

    let separations: Vec<Separation> = self
      .aircraft()
      .tuple_combinations()
      .filter_map(|(a, b)| {
        let (horizontal, vertical) =
          separation(a.pos(), a.altitude(), b.pos(), b.altitude());
        if vertical >= minima.vertical || horizontal >= warning_radius {
          return None;
        }

        let kind = if self.is_conflict(horizontal, vertical) {
          SeparationKind::Conflict
        } else {
          SeparationKind::Warning
        };

        Some(Separation {
          aircraft: (a.callsign(), b.callsign()),
          horizontal,
          vertical,
          kind,
        })
      })
      .collect();

    let conflict = separations
      .iter()
      .find(|s| s.kind == SeparationKind::Conflict)
      .map(|s| Incident::Conflict(s.aircraft.0, s.aircraft.1));

    self.separations = separations;
    if let Some(incident) = conflict {
      self.raise_incident(incident, events);
    }
  }

  fn raise_incident(&mut self, incident: Incident, events: &mut Vec<Event>) {
    if self.incident.is_some() {
      return;
    }

    warn!("incident: {:?}", incident);
    events.push(Event::Incident(incident.clone()));
    self.incident = Some(incident);
  }

  /// One in `frame_rate * seconds_per_aircraft / game_speed` ticks spawns.
  fn roll_spawn(&mut self, ctx: &TickContext) -> bool {
    if ctx.is_paused() {
      return false;
    }

    let ticks_per_aircraft = ctx.frame_rate as f64
      * self.airspace.seconds_per_aircraft() as f64
      / ctx.game_speed as f64;

    self.rng.f64() * ticks_per_aircraft < 1.0
  }

  /// The aircraft whose hit box contains the pixel `point`, with the last
  /// match winning when boxes overlap.
  pub fn select_at(
    &self,
    point: Vec2,
    px_per_nm: f32,
  ) -> Option<Intern<String>> {
    let size = px_per_nm / 2.0;

    self
      .aircraft()
      .filter(|aircraft| {
        let pos = aircraft.px_pos(px_per_nm);
        point.x > pos.x - size
          && point.x < pos.x + size * 2.0
          && point.y > pos.y - size
          && point.y < pos.y + size * 2.0
      })
      .last()
      .map(Aircraft::callsign)
  }
}

// Accessors
impl Engine {
  pub fn aircraft(&self) -> impl Iterator<Item = &Aircraft> + Clone {
    self.roster.iter().flatten()
  }

  pub fn find(&self, callsign: &str) -> Option<&Aircraft> {
    self.aircraft().find(|a| a.callsign().as_str() == callsign)
  }

  pub fn find_mut(&mut self, callsign: &str) -> Option<&mut Aircraft> {
    self
      .roster
      .iter_mut()
      .flatten()
      .find(|a| a.callsign().as_str() == callsign)
  }

  pub fn capacity(&self) -> usize {
    self.roster.len()
  }

  pub fn separations(&self) -> &[Separation] {
    &self.separations
  }

  pub fn incident(&self) -> Option<&Incident> {
    self.incident.as_ref()
  }

  pub fn completed(&self) -> usize {
    self.completed
  }

  pub fn lost(&self) -> usize {
    self.lost
  }

  pub fn ticks(&self) -> u64 {
    self.ticks
  }

  pub fn snapshot(&self) -> Snapshot {
    Snapshot {
      airspace: self.airspace.id,
      ticks: self.ticks,
      aircraft: self.aircraft().cloned().collect(),
      separations: self.separations.clone(),
      completed: self.completed,
      lost: self.lost,
      incident: self.incident.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use turborand::SeededCore;

  use crate::entities::{
    aircraft::Control,
    airspace::{AirspaceCode, SeparationMinima},
    performance::PerformanceEnvelope,
    waypoint::Waypoint,
  };

  use super::*;

  fn b738() -> PerformanceEnvelope {
    // 1000..=10000 ft, 150..=230 kt
    PerformanceEnvelope::new("B738", 41000, 150, 453).unwrap()
  }

  fn c172() -> PerformanceEnvelope {
    // 1000..=3000 ft, 50..=80 kt
    PerformanceEnvelope::new("C172", 13000, 47, 163).unwrap()
  }

  /// One long east-facing runway in the middle and one airway in the corner.
  /// The spawn rate is low enough that nothing spawns on its own.
  fn quiet_airspace() -> Airspace {
    let runway = Waypoint::runway_with_heading(
      "09",
      Vec2::new(20.0, 20.0),
      40000.0,
      90.0,
    );
    let airway =
      Waypoint::airway_with_offset("FIX", Vec2::new(1.0, 1.0), 135.0, 3000.0);

    Airspace::new(
      "TEST",
      1e-9,
      40.0,
      SeparationMinima::default(),
      vec![runway],
      vec![airway],
    )
    .unwrap()
  }

  fn engine() -> Engine {
    Engine::new(quiet_airspace(), Rng::with_seed(1))
  }

  fn departure(callsign: &str, pos: Vec2, altitude: f32) -> Aircraft {
    let airway =
      Waypoint::airway_with_offset("FIX", Vec2::new(1.0, 1.0), 135.0, 3000.0);
    Aircraft::new(
      callsign,
      Category::Commercial,
      b738(),
      airway,
      altitude,
      200.0,
    )
    .with_position(pos, 90.0)
  }

  mod context {
    use super::*;

    #[test]
    fn test_dt() {
      assert_eq!(TickContext::new(30, 3).dt(), 0.1);
      assert_eq!(TickContext::new(30, 0).dt(), 0.0);
      assert!(TickContext::new(30, 0).is_paused());
      assert_eq!(TickContext::default().frame_rate, 30);
    }
  }

  mod spawning {
    use super::*;

    #[test]
    fn test_spawn_conflict_gate() {
      let mut engine = engine();

      engine
        .spawn(departure("AAL1", Vec2::new(10.0, 10.0), 5000.0))
        .unwrap();
      engine
        .spawn(departure("AAL2", Vec2::new(10.0, 15.0), 5000.0))
        .unwrap();
      assert_eq!(engine.aircraft().count(), 2);

      let result =
        engine.spawn(departure("AAL3", Vec2::new(10.0, 10.0), 5000.0));
      assert_eq!(
        result,
        Err(SpawnError::Conflict(
          Intern::from_ref("AAL3"),
          Intern::from_ref("AAL1")
        ))
      );
      assert_eq!(engine.aircraft().count(), 2);
    }

    #[test]
    fn test_spawn_allowed_with_vertical_separation() {
      let mut engine = engine();

      engine
        .spawn(departure("AAL1", Vec2::new(10.0, 10.0), 5000.0))
        .unwrap();
      assert!(
        engine
          .spawn(departure("AAL2", Vec2::new(10.0, 10.0), 6000.0))
          .is_ok()
      );
    }

    #[test]
    fn test_spawn_rejects_duplicate_callsign() {
      let mut engine = engine();

      engine
        .spawn(departure("AAL1", Vec2::new(5.0, 5.0), 5000.0))
        .unwrap();
      assert!(matches!(
        engine.spawn(departure("AAL1", Vec2::new(30.0, 30.0), 5000.0)),
        Err(SpawnError::DuplicateCallsign(_))
      ));
    }

    #[test]
    fn test_spawn_respects_capacity() {
      let mut engine = engine();
      assert_eq!(engine.capacity(), 6);

      for i in 0..6 {
        let pos = Vec2::new(5.0 * i as f32 + 2.0, 30.0);
        engine.spawn(departure(&format!("N{i}"), pos, 5000.0)).unwrap();
      }

      assert_eq!(
        engine.spawn(departure("N9", Vec2::new(35.0, 5.0), 5000.0)),
        Err(SpawnError::Full(6))
      );
    }

    #[test]
    fn test_spawn_random_routes() {
      let mut rng = Rng::with_seed(11);
      let airspace = Airspace::from_code(AirspaceCode::KJFK, &mut rng).unwrap();
      let mut engine = Engine::new(airspace, rng);

      for _ in 0..50 {
        let Ok(id) = engine.spawn_random() else {
          continue;
        };
        let aircraft = engine.find(&id).unwrap();
        let origin_is_airway = aircraft.pos() == Vec2::new(1.0, 20.0);

        // Airway origins fly to runways, runway origins to airways.
        assert_eq!(aircraft.is_landing(), origin_is_airway);
        if origin_is_airway {
          assert_eq!(aircraft.heading(), 90.0);
        } else {
          assert_eq!(aircraft.heading(), 130.0);
          assert_eq!(aircraft.altitude(), 0.0);
        }
      }
    }

    #[test]
    fn test_populate() {
      let mut rng = Rng::with_seed(3);
      let airspace = Airspace::from_code(AirspaceCode::KJFK, &mut rng).unwrap();
      let mut engine = Engine::new(airspace, rng);

      let events = engine.populate();
      let count = engine.aircraft().count();

      assert!((1..=3).contains(&count));
      assert_eq!(events.len(), count);
    }

    #[test]
    fn test_spawn_probability() {
      let airspace = Airspace {
        aircraft_per_minute: 60.0,
        ..quiet_airspace()
      };
      let mut engine = Engine::new(airspace, Rng::with_seed(5));

      // One aircraft per second at 30 ticks per second.
      let ctx = TickContext::new(30, 1);
      let hits = (0..30_000).filter(|_| engine.roll_spawn(&ctx)).count();
      assert!((800..1200).contains(&hits), "{hits}");

      // Game speed shortens the interval in ticks.
      let ctx = TickContext::new(30, 30);
      assert!((0..100).all(|_| engine.roll_spawn(&ctx)));

      let ctx = TickContext::new(30, 0);
      assert!((0..100).all(|_| !engine.roll_spawn(&ctx)));
    }
  }

  mod commands {
    use super::*;

    #[test]
    fn test_queued_commands_apply_on_tick() {
      let mut engine = engine();
      engine
        .spawn(departure("AAL1", Vec2::new(10.0, 10.0), 7000.0))
        .unwrap();

      engine.queue(Command::new("AAL1", Task::Altitude(4000.0)));
      engine.queue(Command::new("AAL1", Task::Speed(220.0)));
      assert_eq!(engine.find("AAL1").unwrap().target().altitude, 7000.0);

      engine.tick(&TickContext::new(30, 0));

      let aircraft = engine.find("AAL1").unwrap();
      assert_eq!(aircraft.target().altitude, 4000.0);
      assert_eq!(aircraft.target().speed, 220.0);
      assert!(engine.commands.is_empty());
    }

    #[test]
    fn test_heading_cancels_clearance() {
      let mut engine = engine();
      engine
        .spawn(departure("AAL1", Vec2::new(10.0, 10.0), 7000.0))
        .unwrap();

      assert!(engine.execute(&Command::new("AAL1", Task::ToggleClearance)));
      assert!(engine.find("AAL1").unwrap().is_cleared());

      assert!(engine.execute(&Command::new("AAL1", Task::Heading(184.0))));
      let aircraft = engine.find("AAL1").unwrap();
      assert!(!aircraft.is_cleared());
      assert_eq!(aircraft.target().heading, 180.0);
    }

    #[test]
    fn test_unknown_callsign_is_ignored() {
      let mut engine = engine();
      assert!(!engine.execute(&Command::new("NOPE", Task::CancelClearance)));
    }

    #[test]
    fn test_tower_ignores_commands() {
      let mut engine = engine();
      // Sits on the approach corridor of runway 09.
      let aircraft = Aircraft::new(
        "N172SP",
        Category::GeneralAviation,
        c172(),
        engine.airspace.inbound[0].clone(),
        2000.0,
        80.0,
      )
      .with_position(Vec2::new(10.125, 20.0), 90.0);
      engine.spawn(aircraft).unwrap();

      engine.execute(&Command::new("N172SP", Task::ToggleClearance));
      let events = engine.tick(&TickContext::new(30, 0));
      assert!(events.contains(&Event::HandedOff(Intern::from_ref("N172SP"))));

      assert!(!engine.execute(&Command::new("N172SP", Task::CancelClearance)));
      let aircraft = engine.find("N172SP").unwrap();
      assert!(aircraft.is_cleared());
      assert_eq!(aircraft.control(), Control::Tower);
    }
  }

  mod separation {
    use super::*;

    #[test]
    fn test_warning_then_conflict() {
      let mut engine = engine();
      engine
        .spawn(departure("AAL1", Vec2::new(10.0, 10.0), 5000.0))
        .unwrap();
      engine
        .spawn(departure("AAL2", Vec2::new(14.0, 10.0), 5500.0))
        .unwrap();

      let paused = TickContext::new(30, 0);
      engine.tick(&paused);

      assert_eq!(engine.separations().len(), 1);
      assert_eq!(engine.separations()[0].kind, SeparationKind::Warning);
      assert!((engine.separations()[0].horizontal - 4.0).abs() < 1e-4);
      assert_eq!(engine.incident(), None);

      engine
        .find_mut("AAL2")
        .unwrap()
        .set_location(Vec2::new(12.0, 10.0));
      let events = engine.tick(&paused);

      let incident = Incident::Conflict(
        Intern::from_ref("AAL1"),
        Intern::from_ref("AAL2"),
      );
      assert_eq!(engine.separations()[0].kind, SeparationKind::Conflict);
      assert_eq!(engine.incident(), Some(&incident));
      assert_eq!(events, vec![Event::Incident(incident.clone())]);

      // The flag persists after the aircraft separate again.
      engine
        .find_mut("AAL2")
        .unwrap()
        .set_location(Vec2::new(30.0, 30.0));
      let events = engine.tick(&paused);
      assert!(engine.separations().is_empty());
      assert_eq!(engine.incident(), Some(&incident));
      assert!(events.is_empty());
    }

    #[test]
    fn test_vertical_separation_clears_pair() {
      let mut engine = engine();
      engine
        .spawn(departure("AAL1", Vec2::new(10.0, 10.0), 5000.0))
        .unwrap();
      engine
        .spawn(departure("AAL2", Vec2::new(10.0, 10.0), 6000.0))
        .unwrap();

      engine.tick(&TickContext::new(30, 0));
      assert!(engine.separations().is_empty());
      assert_eq!(engine.incident(), None);
    }
  }

  mod lifecycle {
    use super::*;

    #[test]
    fn test_lost_aircraft() {
      let mut engine = engine();
      engine
        .spawn(departure("AAL1", Vec2::new(39.95, 20.0), 5000.0))
        .unwrap();

      let ctx = TickContext::new(30, 10);
      let mut events = Vec::new();
      for _ in 0..100 {
        events.extend(engine.tick(&ctx));
        if engine.aircraft().count() == 0 {
          break;
        }
      }

      let id = Intern::from_ref("AAL1");
      assert!(events.contains(&Event::Lost(id)));
      assert!(events.contains(&Event::Incident(Incident::Lost(id))));
      assert_eq!(engine.lost(), 1);
      assert_eq!(engine.incident(), Some(&Incident::Lost(id)));
    }

    #[test]
    fn test_departure_arrives_at_airway() {
      let mut engine = engine();
      // Ceiling 10000 ft and offset 3000 ft, so 7000 ft is clearable.
      let aircraft = departure("AAL1", Vec2::new(4.0, 4.0), 7000.0);
      engine.spawn(aircraft).unwrap();
      engine.execute(&Command::new("AAL1", Task::ToggleClearance));

      let ctx = TickContext::new(30, 10);
      let mut arrived = false;
      for _ in 0..2000 {
        let events = engine.tick(&ctx);
        if events.iter().any(|e| matches!(e, Event::Arrived { .. })) {
          arrived = true;
          break;
        }
      }

      assert!(arrived);
      assert_eq!(engine.completed(), 1);
      assert_eq!(engine.aircraft().count(), 0);
      assert_eq!(engine.incident(), None);
    }

    #[test]
    fn test_arrival_hands_off_then_lands() {
      let mut engine = engine();
      // The corridor of runway 09 starts 1.5 runway lengths west, at
      // x = 20 - 1.5 * 40000 / 6076, roughly 10.125. That is long enough to
      // reach the ground before arriving over the threshold.
      let aircraft = Aircraft::new(
        "N172SP",
        Category::GeneralAviation,
        c172(),
        engine.airspace.inbound[0].clone(),
        2000.0,
        80.0,
      )
      .with_position(Vec2::new(7.0, 20.0), 90.0);
      engine.spawn(aircraft).unwrap();
      assert!(engine.execute(&Command::new("N172SP", Task::ToggleClearance)));

      let ctx = TickContext::new(30, 10);
      let mut handed_off = false;
      let mut arrival = None;
      for _ in 0..5000 {
        for event in engine.tick(&ctx) {
          match event {
            Event::HandedOff(_) => {
              handed_off = true;
              let aircraft = engine.find("N172SP").unwrap();
              assert!(!aircraft.is_operator_controlled());
              assert_eq!(aircraft.target().altitude, 0.0);
            }
            Event::Arrived { altitude, .. } => arrival = Some(altitude),
            _ => {}
          }
        }
        if arrival.is_some() {
          break;
        }
      }

      assert!(handed_off, "never handed off");
      assert_eq!(arrival, Some(0.0));
      assert_eq!(engine.completed(), 1);
      assert_eq!(engine.incident(), None);
    }

    #[test]
    fn test_catalog_runway_arrives_before_touchdown() {
      // Arrival only needs the aircraft over the runway below the clearance
      // altitude, so a 10000 ft runway is reached well above the ground.
      let mut rng = Rng::with_seed(1);
      let mut airspace =
        Airspace::from_code(AirspaceCode::KJFK, &mut rng).unwrap();
      airspace.aircraft_per_minute = 1e-9;
      let runway = airspace.inbound[0].clone();
      assert_eq!(runway.id.as_str(), "13L");

      let mut engine = Engine::new(airspace, rng);
      let start = crate::geometry::move_point(
        runway.target_point(),
        runway.exit_heading + 180.0,
        0.2,
      );
      let aircraft = Aircraft::new(
        "AAL1",
        Category::Commercial,
        b738(),
        runway.clone(),
        2000.0,
        200.0,
      )
      .with_position(start, runway.exit_heading);
      engine.spawn(aircraft).unwrap();
      assert!(engine.execute(&Command::new("AAL1", Task::ToggleClearance)));

      let ctx = TickContext::new(30, 10);
      let mut handed_off = false;
      let mut arrival = None;
      for _ in 0..2000 {
        for event in engine.tick(&ctx) {
          match event {
            Event::HandedOff(_) => handed_off = true,
            Event::Arrived { altitude, .. } => arrival = Some(altitude),
            _ => {}
          }
        }
        if arrival.is_some() {
          break;
        }
      }

      assert!(handed_off, "never handed off");
      let altitude = arrival.expect("never arrived");
      assert!(altitude >= 1000.0 && altitude < 2000.0, "{altitude}");
      assert_eq!(engine.completed(), 1);
    }
  }

  mod display {
    use super::*;

    #[test]
    fn test_select_at() {
      let mut engine = engine();
      engine
        .spawn(departure("AAL1", Vec2::new(10.0, 10.0), 5000.0))
        .unwrap();
      engine
        .spawn(departure("AAL2", Vec2::new(20.0, 10.0), 5000.0))
        .unwrap();

      // 10 px per nm puts AAL1 at (100, 100) with a 5 px box margin.
      let selected = engine.select_at(Vec2::new(102.0, 98.0), 10.0);
      assert_eq!(selected, Some(Intern::from_ref("AAL1")));

      assert_eq!(engine.select_at(Vec2::new(150.0, 100.0), 10.0), None);
    }

    #[test]
    fn test_snapshot() {
      let mut engine = engine();
      engine
        .spawn(departure("AAL1", Vec2::new(10.0, 10.0), 5000.0))
        .unwrap();
      engine.tick(&TickContext::new(30, 1));

      let snapshot = engine.snapshot();
      assert_eq!(snapshot.ticks, 1);
      assert_eq!(snapshot.aircraft.len(), 1);

      let json = serde_json::to_value(&snapshot).unwrap();
      assert_eq!(json["airspace"], "TEST");
      assert_eq!(json["aircraft"][0]["callsign"], "AAL1");
      assert_eq!(json["aircraft"][0]["control"], "operator");
      assert!(json["incident"].is_null());
    }
  }
}
