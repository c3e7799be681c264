//! Parameters structure for the Planner

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for flight planning.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanParams {
    /// The nominal forward speed used to choose each leg's travel time. The actual forward
    /// velocity of a leg is adjusted so the leg takes a whole number of seconds.
    ///
    /// Units: meters/second
    pub nominal_fwd_speed_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            nominal_fwd_speed_ms: 0.5
        }
    }
}

impl PlanParams {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), super::PlanError> {
        if !self.nominal_fwd_speed_ms.is_finite() || self.nominal_fwd_speed_ms <= 0.0 {
            return Err(super::PlanError::InvalidNominalSpeed(self.nominal_fwd_speed_ms));
        }

        Ok(())
    }
}
