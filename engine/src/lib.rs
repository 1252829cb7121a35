use core::ops::Range;

pub mod command;
pub mod engine;
pub mod entities;
pub mod geometry;

/// Ticks per second of real time.
pub const FRAME_RATE: u32 = 30;

pub const ALT_INTERVAL: f32 = 1000.0;
pub const SPD_INTERVAL: f32 = 10.0;
pub const HDG_INTERVAL: f32 = 10.0;

pub const MIN_ALTITUDE: i32 = 1000;

pub const FEET_PER_NAUTICAL_MILE: f32 = 6076.0;
pub const SECONDS_PER_HOUR: f32 = 3600.0;

/// Per-axis distance, in nautical miles, at which an aircraft counts as over
/// a waypoint.
pub const ARRIVAL_TOLERANCE: f32 = 0.5;

/// Degrees per second.
pub const STANDARD_TURN_RATE: f32 = 3.0;
/// Feet per second, resampled every tick (900 to 1080 ft/min).
pub const CLIMB_RATE: Range<f32> = 15.0..18.0;
/// Knots per second.
pub const SPEED_CHANGE_RATE: f32 = 1.0;

pub const RUNWAY_CLEARANCE_ALTITUDE: f32 = 2000.0;
pub const AIRWAY_CLEARANCE_OFFSET_MAX: i32 = 4000;
/// Distance of the approach corridor from the threshold, in runway lengths.
pub const APPROACH_CORRIDOR_SCALE: f32 = 1.5;
