//! # Simulated vehicle
//!
//! A kinematic model of the vehicle driven directly by hover setpoints. Each setpoint is held for
//! one setpoint period. The yaw integrated from the yaw rate is used as the vehicle's heading,
//! 0° facing +Y and 90° facing +X, and the forward velocity moves the vehicle along that heading.
//! Altitude jumps straight to the demanded target.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::fc::{FcDems, FcDemsResponse, HoverSetpoint};
use log::{debug, info, warn};
use util::maths::wrap_deg_360;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const ESTIMATOR_RESET_PARAM: &str = "kalman.resetEstimation";

/// Period between pose log messages.
///
/// Units: seconds
const POSE_LOG_PERIOD_S: f64 = 1.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub x_m: f64,
    pub y_m: f64,
    pub alt_m: f64,

    /// Units: degrees, [0, 360)
    pub yaw_deg: f64,
}

#[derive(Debug)]
pub struct SimVehicle {
    pose: Pose,

    fwd_vel_ms: f64,

    motors_on: bool,

    setpoint_period_s: f64,

    /// Units: seconds
    sim_time_s: f64,

    next_log_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimVehicle {
    pub fn new(setpoint_period_s: f64) -> Self {
        Self {
            pose: Pose::default(),
            fwd_vel_ms: 0.0,
            motors_on: false,
            setpoint_period_s,
            sim_time_s: 0.0,
            next_log_s: POSE_LOG_PERIOD_S,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn motors_on(&self) -> bool {
        self.motors_on
    }

    pub fn sim_time_s(&self) -> f64 {
        self.sim_time_s
    }

    /// Act on a demand, returning the response to send to the client.
    pub fn apply(&mut self, dems: &FcDems) -> FcDemsResponse {
        match dems {
            FcDems::Hover(sp) => {
                if !sp.is_finite() {
                    warn!("Rejecting non-finite setpoint {:?}", sp);
                    return FcDemsResponse::DemsInvalid;
                }
                self.step(sp);
            },
            FcDems::Stop => self.stop(),
            FcDems::SetParam { name, value } => self.set_param(name, value),
        }

        FcDemsResponse::DemsOk
    }

    /// Hold the setpoint for one period.
    fn step(&mut self, sp: &HoverSetpoint) {
        if !self.motors_on {
            info!("Motors on");
            self.motors_on = true;
        }

        let dt = self.setpoint_period_s;

        self.pose.yaw_deg = wrap_deg_360(self.pose.yaw_deg + sp.yaw_rate_degs * dt);

        let heading_rad = self.pose.yaw_deg.to_radians();
        self.pose.x_m += (sp.fwd_vel_ms * heading_rad.sin() + sp.side_vel_ms * heading_rad.cos())
            * dt;
        self.pose.y_m += (sp.fwd_vel_ms * heading_rad.cos() - sp.side_vel_ms * heading_rad.sin())
            * dt;
        self.pose.alt_m = sp.alt_m;
        self.fwd_vel_ms = sp.fwd_vel_ms;

        self.sim_time_s += dt;

        if self.sim_time_s + 1e-9 >= self.next_log_s {
            info!(
                "t = {:6.1} s: x = {:.3} m, y = {:.3} m, alt = {:.3} m, yaw = {:.1} deg, \
                v = {:.3} m/s",
                self.sim_time_s,
                self.pose.x_m,
                self.pose.y_m,
                self.pose.alt_m,
                self.pose.yaw_deg,
                self.fwd_vel_ms
            );
            self.next_log_s += POSE_LOG_PERIOD_S;
        }
    }

    fn stop(&mut self) {
        info!("Stop, motors off at {:?}", self.pose);
        self.fwd_vel_ms = 0.0;
        self.pose.alt_m = 0.0;
        self.motors_on = false;
    }

    fn set_param(&mut self, name: &str, value: &str) {
        debug!("Set {} = {}", name, value);

        if name == ESTIMATOR_RESET_PARAM && value == "1" {
            info!("Estimator reset, pose zeroed");
            self.pose = Pose::default();
        }
    }
}
