use std::sync::LazyLock;

use internment::Intern;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use turborand::{TurboRand, rng::Rng};

use crate::{
  ALT_INTERVAL, MIN_ALTITUDE, SPD_INTERVAL, geometry::round_to_interval,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
  #[error("max altitude {0} ft for {1} is below 1000 ft")]
  MaxAltitude(i32, String),
  #[error("min speed {0} kt for {1} is negative")]
  MinSpeed(i32, String),
  #[error("max speed {max} kt for {id} is below min speed {min} kt")]
  MaxSpeed { id: String, min: i32, max: i32 },
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
  #[default]
  Commercial,
  GeneralAviation,
}

/// Altitude and speed limits of one aircraft type, already scaled down to
/// the ranges the simulation works in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEnvelope {
  pub id: Intern<String>,
  /// In feet.
  pub min_altitude: i32,
  /// In feet.
  pub max_altitude: i32,
  /// In knots.
  pub min_speed: i32,
  /// In knots.
  pub max_speed: i32,
}

impl PerformanceEnvelope {
  /// Builds an envelope from published type figures (service ceiling in
  /// feet, stall and cruise speeds in knots).
  pub fn new(
    id: impl AsRef<str>,
    max_altitude: i32,
    min_speed: i32,
    max_speed: i32,
  ) -> Result<Self, EnvelopeError> {
    let id = id.as_ref();
    if max_altitude < MIN_ALTITUDE {
      return Err(EnvelopeError::MaxAltitude(max_altitude, id.to_owned()));
    }
    if min_speed < 0 {
      return Err(EnvelopeError::MinSpeed(min_speed, id.to_owned()));
    }
    if max_speed < min_speed {
      return Err(EnvelopeError::MaxSpeed {
        id: id.to_owned(),
        min: min_speed,
        max: max_speed,
      });
    }

    let scaled_altitude =
      round_to_interval((max_altitude / 4) as f32, ALT_INTERVAL) as i32;
    let min_speed = round_to_interval(min_speed as f32, SPD_INTERVAL) as i32;
    let max_speed =
      round_to_interval((max_speed / 2) as f32, SPD_INTERVAL) as i32;

    if max_speed < min_speed {
      return Err(EnvelopeError::MaxSpeed {
        id: id.to_owned(),
        min: min_speed,
        max: max_speed,
      });
    }

    Ok(Self {
      id: Intern::from_ref(id),
      min_altitude: MIN_ALTITUDE,
      max_altitude: scaled_altitude.max(MIN_ALTITUDE),
      min_speed,
      max_speed,
    })
  }
}

// Service ceiling (ft), minimum speed (kt), maximum speed (kt).
const COMMERCIAL_TYPES: [(&str, i32, i32, i32); 47] = [
  ("B721", 42000, 127, 518),
  ("B722", 42000, 127, 515),
  ("B731", 37000, 150, 473),
  ("B732", 37000, 150, 473),
  ("B732", 37000, 150, 473),
  ("B733", 37000, 150, 473),
  ("B734", 37000, 150, 473),
  ("B735", 37000, 150, 473),
  ("B736", 41000, 150, 453),
  ("B737", 41000, 150, 453),
  ("B738", 41000, 150, 453),
  ("B739", 41000, 150, 453),
  ("B752", 42000, 135, 496),
  ("B753", 42000, 135, 496),
  ("B762", 43100, 150, 486),
  ("B763", 43100, 150, 486),
  ("B764", 43100, 150, 486),
  ("B772", 43100, 135, 511),
  ("B773", 43100, 135, 511),
  ("B788", 43100, 140, 516),
  ("B789", 43100, 153, 516),
  ("A318", 41000, 135, 470),
  ("A319", 41000, 125, 470),
  ("A320", 41000, 135, 470),
  ("A321", 41000, 138, 470),
  ("A332", 41000, 140, 470),
  ("A333", 41000, 146, 470),
  ("A342", 41100, 148, 493),
  ("A343", 41450, 148, 493),
  ("A345", 41450, 148, 493),
  ("A345", 41450, 148, 493),
  ("A359", 43100, 140, 488),
  ("A35K", 41450, 150, 488),
  ("E170", 41000, 130, 430),
  ("E175", 41000, 130, 430),
  ("E190", 41000, 130, 447),
  ("E195", 41000, 130, 447),
  ("E110", 21490, 100, 248),
  ("E120", 29800, 87, 328),
  ("E135", 37000, 110, 450),
  ("E140", 37000, 120, 450),
  ("E145", 37000, 122, 461),
  ("CRJ1", 41000, 120, 444),
  ("CRJ2", 41000, 120, 444),
  ("CRJ7", 41000, 130, 460),
  ("CRJ9", 41000, 130, 460),
  ("CRJX", 41000, 130, 460),
];

const GENERAL_AVIATION_TYPES: [(&str, i32, i32, i32); 1] =
  [("C172", 13000, 47, 163)];

const AIRLINES: [&str; 20] = [
  "DAL", "AAL", "UAL", "DLH", "AFR", "KLM", "SWA", "CSN", "THY", "CES", "RYR",
  "UAE", "AFL", "CCA", "QTR", "BAW", "QFA", "COA", "ASA", "EZY",
];

const TAIL_SYMBOLS: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn build_catalog(
  types: &[(&str, i32, i32, i32)],
) -> Result<Vec<PerformanceEnvelope>, EnvelopeError> {
  types
    .iter()
    .map(|(id, max_alt, min_spd, max_spd)| {
      PerformanceEnvelope::new(id, *max_alt, *min_spd, *max_spd)
    })
    .collect()
}

static COMMERCIAL_CATALOG: LazyLock<Vec<PerformanceEnvelope>> =
  LazyLock::new(|| {
    build_catalog(&COMMERCIAL_TYPES)
      .unwrap_or_else(|e| panic!("invalid commercial type catalog: {e}"))
  });

static GENERAL_AVIATION_CATALOG: LazyLock<Vec<PerformanceEnvelope>> =
  LazyLock::new(|| {
    build_catalog(&GENERAL_AVIATION_TYPES)
      .unwrap_or_else(|e| panic!("invalid general aviation catalog: {e}"))
  });

/// Every envelope available to a category.
pub fn catalog(category: Category) -> &'static [PerformanceEnvelope] {
  match category {
    Category::Commercial => COMMERCIAL_CATALOG.as_slice(),
    Category::GeneralAviation => GENERAL_AVIATION_CATALOG.as_slice(),
  }
}

pub fn random_envelope(
  category: Category,
  rng: &mut Rng,
) -> PerformanceEnvelope {
  let catalog = catalog(category);
  catalog[rng.usize(0..catalog.len())]
}

pub fn flight_number(length: usize, rng: &mut Rng) -> String {
  (0..length)
    .map(|_| char::from(b'0' + rng.u8(0..10)))
    .collect()
}

pub fn tail_number(length: usize, rng: &mut Rng) -> String {
  (0..length)
    .map(|_| char::from(TAIL_SYMBOLS[rng.usize(0..TAIL_SYMBOLS.len())]))
    .collect()
}

pub fn random_callsign(category: Category, rng: &mut Rng) -> String {
  match category {
    Category::Commercial => {
      let airline = AIRLINES[rng.usize(0..AIRLINES.len())];
      format!("{airline}{}", flight_number(3, rng))
    }
    Category::GeneralAviation => format!("N{}", tail_number(5, rng)),
  }
}
