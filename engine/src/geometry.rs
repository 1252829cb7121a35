use std::f32::consts::PI;

use glam::Vec2;

/// Wraps a heading into `[0, 360)`.
pub fn normalize_heading(heading: f32) -> f32 {
  if !heading.is_finite() {
    return 0.0;
  }

  // `rem_euclid` returns exactly 360.0 for tiny negative inputs.
  let mut heading = heading.rem_euclid(360.0);
  let mut offset = if heading < 0.0 { 360.0 } else { -360.0 };
  while !(0.0..360.0).contains(&heading) {
    heading += offset;
    offset = if heading < 0.0 { 360.0 } else { -360.0 };
  }

  heading
}

/// Converts a compass heading (0 is north, clockwise) into a standard-math
/// angle in radians (0 is east, counter-clockwise).
pub fn heading_to_radians(heading: f32) -> f32 {
  let degrees = (450.0 - heading) % 360.0;
  degrees * (PI / 180.0)
}

pub fn radians_to_heading(radians: f32) -> f32 {
  normalize_heading(90.0 - radians * (180.0 / PI))
}

/// Clockwise distance from `a` to `b`, in `[0, 360)` for normalised inputs.
pub fn heading_difference(a: f32, b: f32) -> f32 {
  if b >= a { b - a } else { (360.0 - a) + b }
}

/// Rounds `value` to the nearer multiple of `interval`.
///
/// The lower multiple is found with truncating integer division and an exact
/// midpoint resolves to it, so negative values can land on the multiple
/// nearer zero instead of the nearest one.
pub fn round_to_interval(value: f32, interval: f32) -> f32 {
  let step = interval as i32;
  let floor = ((value as i32) / step) * step;
  let ceil = (floor as f32 + interval) as i32;

  if value - floor as f32 > ceil as f32 - value {
    ceil as f32
  } else {
    floor as f32
  }
}

/// Bearing from `current` to `target` where `y` grows downward, so north is
/// toward smaller `y`. Returns 0 when both points coincide.
pub fn heading_to_target(current: Vec2, target: Vec2) -> f32 {
  let dx = target.x - current.x;
  let dy = current.y - target.y;
  let distance = (dx * dx + dy * dy).sqrt();
  if distance == 0.0 {
    return 0.0;
  }

  let mut radians = (dy / distance).asin();
  // asin only covers the right half-plane.
  if dx < 0.0 {
    radians = PI - radians;
  }

  radians_to_heading(radians)
}

/// Turns `current` toward `target` by at most `max_step` degrees, taking the
/// shorter way around. Snaps onto `target` once it is within one step.
pub fn approach_heading(current: f32, target: f32, max_step: f32) -> f32 {
  let ceil = current + max_step;
  let floor = current - max_step;
  if ceil > target && floor < target {
    return target;
  }

  if heading_difference(current, target) < 180.0 {
    normalize_heading(current + max_step)
  } else {
    normalize_heading(current - max_step)
  }
}

/// Moves `current` toward `target` by at most `max_step`, snapping onto
/// `target` once it is within one step.
pub fn approach_value(current: f32, target: f32, max_step: f32) -> f32 {
  let ceil = current + max_step;
  let floor = current - max_step;
  if ceil > target && floor < target {
    return target;
  }

  if current > target { floor } else { ceil }
}

/// Moves `point` along `heading` by `distance`, with `y` growing downward.
pub fn move_point(point: Vec2, heading: f32, distance: f32) -> Vec2 {
  let radians = (90.0 - heading).to_radians();
  let x = distance * radians.cos();
  let y = distance * radians.sin();

  Vec2::new(point.x + x, point.y - y)
}

/// Straight-line distance and absolute altitude difference between two
/// aircraft-like positions.
pub fn separation(
  lhs_pos: Vec2,
  lhs_altitude: f32,
  rhs_pos: Vec2,
  rhs_altitude: f32,
) -> (f32, f32) {
  let dx = lhs_pos.x - rhs_pos.x;
  let dy = lhs_pos.y - rhs_pos.y;
  let horizontal = (dx * dx + dy * dy).sqrt();
  let vertical = (lhs_altitude - rhs_altitude).abs();

  (horizontal, vertical)
}
