pub mod aircraft;
pub mod airspace;
pub mod performance;
pub mod waypoint;
