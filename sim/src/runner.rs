use std::{
  fmt, thread,
  time::{Duration, Instant},
};

use engine::engine::{Engine, Event, Incident, TickContext};
use internment::Intern;
use serde::Serialize;

use crate::{config::SimulationConfig, controller::Autopilot};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
  pub airspace: Intern<String>,
  pub ticks: u64,
  pub completed: usize,
  pub lost: usize,
  pub incident: Option<Incident>,
}

impl fmt::Display for Summary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} after {} ticks: {} completed, {} lost",
      self.airspace, self.ticks, self.completed, self.lost
    )?;
    match &self.incident {
      Some(Incident::Conflict(a, b)) => {
        write!(f, ", separation lost between {a} and {b}")
      }
      Some(Incident::Lost(id)) => write!(f, ", {id} lost"),
      None => Ok(()),
    }
  }
}

/// Drives the engine at a fixed rate, standing in for the display loop.
#[derive(Debug)]
pub struct Runner {
  pub engine: Engine,
  pub ctx: TickContext,
  pub autopilot: Option<Autopilot>,

  pub max_ticks: Option<u64>,
  pub stop_on_incident: bool,

  realtime: bool,
  last_tick: Instant,
}

impl Runner {
  pub fn new(engine: Engine, options: &SimulationConfig) -> Self {
    Self {
      engine,
      ctx: TickContext::new(options.frame_rate, options.game_speed),
      autopilot: options.autopilot.then_some(Autopilot),

      max_ticks: options.ticks,
      stop_on_incident: options.stop_on_incident,

      realtime: options.realtime,
      last_tick: Instant::now(),
    }
  }

  pub fn tick(&mut self) -> Vec<Event> {
    self.last_tick = Instant::now();

    if let Some(autopilot) = &self.autopilot {
      for command in autopilot.commands(&self.engine) {
        self.engine.queue(command);
      }
    }

    let events = self.engine.tick(&self.ctx);
    if !events.is_empty() {
      tracing::debug!("tick {}: {:?}", self.engine.ticks(), events);
    }

    events
  }

  pub fn is_done(&self) -> bool {
    let out_of_ticks = self
      .max_ticks
      .is_some_and(|max| self.engine.ticks() >= max);
    let stopped = self.stop_on_incident && self.engine.incident().is_some();

    out_of_ticks || stopped
  }

  pub fn run(&mut self) -> Summary {
    let rate = Duration::from_secs_f32(1.0 / self.ctx.frame_rate as f32);

    while !self.is_done() {
      if self.realtime {
        let elapsed = self.last_tick.elapsed();
        if elapsed < rate {
          thread::sleep(rate - elapsed);
        }
      }

      self.tick();
    }

    self.summary()
  }

  pub fn summary(&self) -> Summary {
    Summary {
      airspace: self.engine.airspace.id,
      ticks: self.engine.ticks(),
      completed: self.engine.completed(),
      lost: self.engine.lost(),
      incident: self.engine.incident().cloned(),
    }
  }
}
