//! # Flight Executable Parameters
//!
//! This module provides parameters for the flight executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlyExecParams {

    /// Network endpoint of the flight controller's demands socket
    pub fc_endpoint: String,

    /// Time to wait for the flight controller link to come up.
    ///
    /// Units: milliseconds
    pub connect_timeout_ms: i32,

    /// Time to wait for the flight controller to acknowledge a demand.
    ///
    /// Units: milliseconds
    pub recv_timeout_ms: i32,

    /// Units: milliseconds
    pub send_timeout_ms: i32,

    /// Time the estimator reset flag is held high.
    ///
    /// Units: seconds
    pub estimator_reset_pulse_s: f64,

    /// Time given to the estimator to converge after a reset.
    ///
    /// Units: seconds
    pub estimator_settle_s: f64,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{plan::PlanParams, seq::SeqParams};

    fn params_path(file: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../params").join(file)
    }

    #[test]
    fn test_shipped_params_load() {
        let exec: FlyExecParams = util::params::load_from(params_path("fly_exec.toml")).unwrap();
        assert!(exec.connect_timeout_ms > 0);

        let plan: PlanParams = util::params::load_from(params_path("plan.toml")).unwrap();
        plan.validate().unwrap();

        let seq: SeqParams = util::params::load_from(params_path("seq.toml")).unwrap();
        seq.validate().unwrap();
    }
}
