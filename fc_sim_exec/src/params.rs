//! # Simulated Flight Controller Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FcSimExecParams {

    /// Endpoint for the demands socket
    pub demands_endpoint: String,

    /// Time to wait for a demand before entering safe mode.
    ///
    /// Units: milliseconds
    pub recv_timeout_ms: i32,

    /// Time each hover setpoint is integrated over.
    ///
    /// Units: seconds
    pub setpoint_period_s: f64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shipped_params_load() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../params/fc_sim_exec.toml");
        let params: FcSimExecParams = util::params::load_from(path).unwrap();

        assert!(params.setpoint_period_s > 0.0);
        assert_eq!(params.demands_endpoint, "tcp://*:5030");
    }
}
