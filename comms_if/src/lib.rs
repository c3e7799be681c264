//! # Communications interface crate.
//!
//! Provides all common communications interfaces between the flight executable and the flight
//! controller (real or simulated).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Demand and response definitions for equipment (the flight controller)
pub mod eqpt;

/// Network module
pub mod net;
