//! # Flight library.
//!
//! This library allows other crates in the workspace, along with the benchmarks, to access items
//! defined inside the flight crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Planner - converts waypoints into a flight plan of legs
pub mod plan;

/// Sequencer - flies a flight plan by emitting hover setpoints
pub mod seq;

/// Waypoint loader - reads waypoint files
pub mod wp_loader;

/// Flight controller client - sends setpoints to the vehicle
pub mod fc_client;

/// Dry run and archiving sinks
pub mod dry_run;

/// Parameters for the flight executable
pub mod params;
