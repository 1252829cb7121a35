use core::fmt;

use internment::Intern;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[serde(tag = "type", content = "value")]
pub enum Task {
  Altitude(f32),
  Speed(f32),
  /// Cancels any clearance before turning.
  Heading(f32),
  ToggleClearance,
  CancelClearance,
}

impl fmt::Display for Task {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Altitude(x) => write!(f, "altitude {x}"),
      Self::Speed(x) => write!(f, "speed {x}"),
      Self::Heading(x) => write!(f, "heading {x}"),
      Self::ToggleClearance => write!(f, "toggle clearance"),
      Self::CancelClearance => write!(f, "cancel clearance"),
    }
  }
}

/// A task addressed to one aircraft by callsign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
  pub id: Intern<String>,
  pub task: Task,
}

impl Command {
  pub fn new(id: impl AsRef<str>, task: Task) -> Self {
    Self {
      id: Intern::from_ref(id.as_ref()),
      task,
    }
  }
}

impl fmt::Display for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.id, self.task)
  }
}
