//! # Flight Controller Equipment Demands
//!
//! Demands sent from the flight executable to the vehicle's flight controller, and the responses
//! it sends back. All items are serialized as JSON on the wire.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An instantaneous hover-mode setpoint.
///
/// Velocities are in the vehicle body frame, the altitude is absolute. Positive yaw rate is
/// anti-clockwise when viewed from above.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct HoverSetpoint {
    /// Forward (body +Y) velocity.
    ///
    /// Units: meters/second
    pub fwd_vel_ms: f64,

    /// Lateral (body +X) velocity. Always zero for waypoint flight.
    ///
    /// Units: meters/second
    pub side_vel_ms: f64,

    /// Yaw rate, positive anti-clockwise.
    ///
    /// Units: degrees/second
    pub yaw_rate_degs: f64,

    /// Target altitude.
    ///
    /// Units: meters
    pub alt_m: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Demands that are sent from the FcClient to the flight controller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum FcDems {
    /// Hold the given setpoint until the next demand.
    Hover(HoverSetpoint),

    /// Cut the motors. The vehicle must already be on (or just above) the ground.
    Stop,

    /// Set a named flight controller parameter.
    SetParam {
        name: String,
        value: String
    },
}

/// Response from the flight controller based on the demands sent by the client.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FcDemsResponse {
    /// Demands were valid and will be executed
    DemsOk,

    /// Demands were invalid and have been rejected
    DemsInvalid,

    /// Equipment is invalid so demands cannot be actuated
    EqptInvalid
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl HoverSetpoint {
    /// A setpoint holding position at the given altitude.
    pub fn hold(alt_m: f64) -> Self {
        Self {
            alt_m,
            ..Default::default()
        }
    }

    /// True if all fields are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.fwd_vel_ms.is_finite()
            && self.side_vel_ms.is_finite()
            && self.yaw_rate_degs.is_finite()
            && self.alt_m.is_finite()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dems_wire_format() {
        let dems = FcDems::Hover(HoverSetpoint::hold(0.5));
        let json = serde_json::to_string(&dems).unwrap();
        assert_eq!(
            json,
            r#"{"Hover":{"fwd_vel_ms":0.0,"side_vel_ms":0.0,"yaw_rate_degs":0.0,"alt_m":0.5}}"#
        );

        let stop: FcDems = serde_json::from_str(r#""Stop""#).unwrap();
        assert_eq!(stop, FcDems::Stop);
    }

    #[test]
    fn test_setpoint_finite() {
        assert!(HoverSetpoint::hold(1.0).is_finite());

        let sp = HoverSetpoint {
            fwd_vel_ms: std::f64::NAN,
            ..Default::default()
        };
        assert!(!sp.is_finite());
    }
}
