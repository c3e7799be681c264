//! Parameters structure for the Sequencer

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for flight sequencing.
#[derive(Debug, Clone, Deserialize)]
pub struct SeqParams {

    // ---- TIMING ----

    /// Period between setpoints.
    ///
    /// Units: seconds
    pub tick_period_s: f64,

    /// Time taken for every rotation, whatever the angle.
    ///
    /// Units: seconds
    pub rotate_time_s: f64,

    // ---- HOVERS ----

    /// Altitude of the take off hover.
    ///
    /// Units: meters
    pub std_hover_height_m: f64,

    /// Duration of the take off hover and of the settle hover after each rotation.
    ///
    /// Units: seconds
    pub std_hover_time_s: f64,

    /// Altitude of the landing hover, just before the motors are stopped.
    ///
    /// Units: meters
    pub land_height_m: f64,

    /// Duration of the landing hover.
    ///
    /// Units: seconds
    pub land_time_s: f64,

    // ---- ALTITUDE ----

    /// Added to every waypoint's Z to give the commanded altitude.
    ///
    /// Units: meters
    #[serde(default)]
    pub altitude_offset_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SeqParams {
    fn default() -> Self {
        Self {
            tick_period_s: 0.1,
            rotate_time_s: 2.0,
            std_hover_height_m: 0.5,
            std_hover_time_s: 0.2,
            land_height_m: 0.1,
            land_time_s: 1.0,
            altitude_offset_m: 0.0,
        }
    }
}

impl SeqParams {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), super::SeqError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.tick_period_s) {
            return Err(super::SeqError::InvalidParams("tick_period_s must be positive"));
        }
        if !positive(self.rotate_time_s) {
            return Err(super::SeqError::InvalidParams("rotate_time_s must be positive"));
        }
        if !positive(self.std_hover_time_s) {
            return Err(super::SeqError::InvalidParams("std_hover_time_s must be positive"));
        }
        if !positive(self.land_time_s) {
            return Err(super::SeqError::InvalidParams("land_time_s must be positive"));
        }
        if !self.std_hover_height_m.is_finite()
            || !self.land_height_m.is_finite()
            || !self.altitude_offset_m.is_finite()
        {
            return Err(super::SeqError::InvalidParams("heights must be finite"));
        }

        Ok(())
    }

    /// Commanded altitude for a waypoint height.
    pub fn alt_of(&self, z_m: f64) -> f64 {
        z_m + self.altitude_offset_m
    }
}
