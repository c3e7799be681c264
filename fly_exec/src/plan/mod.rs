//! # Planner module
//!
//! Converts an ordered sequence of waypoints into a [`FlightPlan`]: one [`Leg`] per consecutive
//! pair of waypoints, along with the heading sequence the vehicle will follow.
//!
//! Planning is a pure function of the waypoints and parameters, no I/O or timing is performed.
//! The plan is computed once before any motion begins and is read only afterwards.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc;
mod display;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub use calc::*;
pub use params::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Heading of the vehicle before the first leg.
pub const START_HEADING_DEG: u16 = 0;

/// Heading the vehicle returns to after the last leg.
pub const END_HEADING_DEG: u16 = 0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A commanded position plus a dwell time.
///
/// Axes follow standard 3D coordinate geometry: +Y is front, +X is right, +Z is up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Units: meters
    pub x_m: f64,

    /// Units: meters
    pub y_m: f64,

    /// Units: meters
    pub z_m: f64,

    /// Time to hover at this waypoint before leaving it.
    ///
    /// Units: seconds
    pub hover_s: f64,
}

/// The motion segment between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    /// Index of the leg, which is also the index of its origin waypoint.
    pub index: usize,

    /// Planar distance between the waypoints.
    ///
    /// Units: meters
    pub distance_m: f64,

    /// Change in height, destination minus origin.
    ///
    /// Units: meters
    pub height_delta_m: f64,

    /// Heading the vehicle must face to fly this leg.
    ///
    /// Units: degrees, [0, 360)
    pub heading_deg: u16,

    /// Rotation from the previous heading to this leg's heading, or `None` if no rotation is
    /// required.
    ///
    /// Units: degrees, (-180, 180], positive anti-clockwise
    pub rotation_deg: Option<f64>,

    /// The forward translation, or `None` if the leg is too short to translate.
    pub translation: Option<Translation>,

    /// Hover at the origin waypoint before starting the leg, or `None` for no hover.
    ///
    /// Units: seconds
    pub hover_s: Option<f64>,

    /// Height of the origin waypoint.
    ///
    /// Units: meters
    pub origin_z_m: f64,

    /// Height of the destination waypoint.
    ///
    /// Units: meters
    pub dest_z_m: f64,
}

/// Forward translation part of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Translation {
    /// Units: seconds, always greater than zero
    pub travel_time_s: u32,

    /// Units: meters/second
    pub fwd_velocity_ms: f64,
}

/// A complete flight plan.
///
/// Only [`plan`] can build one, which guarantees `legs().len() == waypoints().len() - 1` and
/// `headings_deg().len() == waypoints().len()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPlan {
    waypoints: Vec<Waypoint>,

    legs: Vec<Leg>,

    headings_deg: Vec<u16>,

    return_rotation_deg: Option<f64>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors that can occur while planning.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PlanError {
    #[error("Cannot plan a flight with no waypoints")]
    NoWaypoints,

    #[error("Waypoint {index} contains a non-finite value")]
    NonFiniteWaypoint { index: usize },

    #[error("Waypoint {index} has a negative hover time ({hover_s} s)")]
    NegativeHoverTime { index: usize, hover_s: f64 },

    #[error("The nominal forward speed must be finite and positive, found {0}")]
    InvalidNominalSpeed(f64),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Plan a flight through the given waypoints.
///
/// Legs whose travel time rounds to zero are planned without a translation, and a stationary leg
/// (identical horizontal positions) keeps the previous heading so requires no rotation.
pub fn plan(waypoints: Vec<Waypoint>, params: &PlanParams) -> Result<FlightPlan, PlanError> {
    params.validate()?;

    if waypoints.is_empty() {
        return Err(PlanError::NoWaypoints);
    }

    for (index, wp) in waypoints.iter().enumerate() {
        wp.validate(index)?;
    }

    let mut headings_deg = Vec::with_capacity(waypoints.len());
    headings_deg.push(START_HEADING_DEG);

    let mut legs = Vec::with_capacity(waypoints.len() - 1);

    for (index, pair) in waypoints.windows(2).enumerate() {
        let (origin, dest) = (&pair[0], &pair[1]);

        let dx_m = dest.x_m - origin.x_m;
        let dy_m = dest.y_m - origin.y_m;

        let distance_m = hypotenuse(dx_m, dy_m);

        // headings_deg always holds index + 1 items here
        let prev_heading_deg = headings_deg[index];

        let heading_deg = match calc::heading_deg(dx_m, dy_m) {
            Some(h) => h,
            None => {
                debug!("Leg {} is stationary, keeping heading {}", index, prev_heading_deg);
                prev_heading_deg
            }
        };

        let rotation_deg = rotation_angle_deg(prev_heading_deg as f64, heading_deg as f64);

        let travel_time_s = calc::travel_time_s(distance_m, params.nominal_fwd_speed_ms);
        let translation = calc::fwd_velocity_ms(distance_m, travel_time_s)
            .map(|fwd_velocity_ms| Translation {
                travel_time_s,
                fwd_velocity_ms
            });

        if translation.is_none() {
            warn!(
                "Leg {} is too short to translate ({:.3} m), only hover and rotation will be \
                performed",
                index,
                distance_m
            );
        }

        legs.push(Leg {
            index,
            distance_m,
            height_delta_m: dest.z_m - origin.z_m,
            heading_deg,
            rotation_deg: non_zero(rotation_deg),
            translation,
            hover_s: non_zero(origin.hover_s),
            origin_z_m: origin.z_m,
            dest_z_m: dest.z_m,
        });

        headings_deg.push(heading_deg);
    }

    let final_heading_deg = headings_deg[headings_deg.len() - 1];
    let return_rotation_deg = non_zero(
        rotation_angle_deg(final_heading_deg as f64, END_HEADING_DEG as f64)
    );

    debug!("Planned {} legs through {} waypoints", legs.len(), waypoints.len());

    Ok(FlightPlan {
        waypoints,
        legs,
        headings_deg,
        return_rotation_deg,
    })
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Waypoint {
    pub fn new(x_m: f64, y_m: f64, z_m: f64, hover_s: f64) -> Self {
        Self { x_m, y_m, z_m, hover_s }
    }

    fn validate(&self, index: usize) -> Result<(), PlanError> {
        let all_finite = [self.x_m, self.y_m, self.z_m, self.hover_s]
            .iter()
            .all(|v| v.is_finite());

        if !all_finite {
            return Err(PlanError::NonFiniteWaypoint { index });
        }

        if self.hover_s < 0.0 {
            return Err(PlanError::NegativeHoverTime { index, hover_s: self.hover_s });
        }

        Ok(())
    }
}

impl Leg {
    /// Travel time, or zero if the leg has no translation.
    pub fn travel_time_s(&self) -> u32 {
        self.translation.map(|t| t.travel_time_s).unwrap_or(0)
    }

    /// Forward velocity, or zero if the leg has no translation.
    pub fn fwd_velocity_ms(&self) -> f64 {
        self.translation.map(|t| t.fwd_velocity_ms).unwrap_or(0.0)
    }

    /// Rotation angle, or zero if the leg has no rotation.
    pub fn rotation_angle_deg(&self) -> f64 {
        self.rotation_deg.unwrap_or(0.0)
    }
}

impl FlightPlan {
    /// The waypoints, in flight order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// The legs, in flight order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// The heading sequence, starting with the start heading followed by each leg's heading.
    pub fn headings_deg(&self) -> &[u16] {
        &self.headings_deg
    }

    /// The rotation angle of each leg, with zero for legs which don't rotate.
    pub fn rotation_angles_deg(&self) -> Vec<f64> {
        self.legs.iter().map(Leg::rotation_angle_deg).collect()
    }

    /// The rotation from the final leg's heading back to the end heading.
    pub fn return_rotation_deg(&self) -> Option<f64> {
        self.return_rotation_deg
    }

    /// Hover at the final waypoint before returning to the end heading.
    pub fn final_hover_s(&self) -> Option<f64> {
        self.waypoints.last().and_then(|wp| non_zero(wp.hover_s))
    }

    /// Height of the final waypoint.
    pub fn final_z_m(&self) -> f64 {
        self.waypoints.last().map(|wp| wp.z_m).unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Zero means skip, so map it to `None`.
fn non_zero(value: f64) -> Option<f64> {
    if value == 0.0 {
        None
    }
    else {
        Some(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn wp(x: f64, y: f64, z: f64, hover: f64) -> Waypoint {
        Waypoint::new(x, y, z, hover)
    }

    #[test]
    fn test_three_point_plan() {
        let plan = plan(
            vec![
                wp(0.0, 0.0, 0.0, 0.0),
                wp(0.0, 10.0, 0.0, 0.0),
                wp(10.0, 10.0, 1.0, 5.0),
            ],
            &PlanParams::default()
        ).unwrap();

        assert_eq!(plan.legs().len(), 2);
        assert_eq!(plan.headings_deg(), &[0, 0, 90]);
        assert_eq!(plan.rotation_angles_deg(), vec![0.0, 90.0]);

        let leg_0 = &plan.legs()[0];
        assert_eq!(leg_0.distance_m, 10.0);
        assert_eq!(leg_0.rotation_deg, None);
        assert_eq!(leg_0.hover_s, None);
        assert_eq!(
            leg_0.translation,
            Some(Translation { travel_time_s: 20, fwd_velocity_ms: 0.5 })
        );

        let leg_1 = &plan.legs()[1];
        assert_eq!(leg_1.distance_m, 10.0);
        assert_eq!(leg_1.height_delta_m, 1.0);
        assert_eq!(leg_1.heading_deg, 90);
        assert_eq!(leg_1.rotation_deg, Some(90.0));

        // Turn back from 90 to the end heading
        assert_eq!(plan.return_rotation_deg(), Some(-90.0));
        assert_eq!(plan.final_hover_s(), Some(5.0));
        assert_eq!(plan.final_z_m(), 1.0);
    }

    #[test]
    fn test_single_waypoint() {
        let plan = plan(vec![wp(1.0, 2.0, 0.5, 3.0)], &PlanParams::default()).unwrap();

        assert!(plan.legs().is_empty());
        assert_eq!(plan.headings_deg(), &[START_HEADING_DEG]);
        assert_eq!(plan.return_rotation_deg(), None);
        assert_eq!(plan.final_hover_s(), Some(3.0));
    }

    #[test]
    fn test_zero_distance_leg() {
        let plan = plan(
            vec![
                wp(0.0, 0.0, 0.5, 0.0),
                wp(5.0, 0.0, 0.5, 1.0),
                wp(5.0, 0.0, 1.5, 2.0),
            ],
            &PlanParams::default()
        ).unwrap();

        let leg = &plan.legs()[1];
        assert_eq!(leg.distance_m, 0.0);
        assert_eq!(leg.translation, None);
        assert_eq!(leg.travel_time_s(), 0);
        assert_eq!(leg.fwd_velocity_ms(), 0.0);
        assert!(leg.fwd_velocity_ms().is_finite());

        // Stationary legs keep the previous heading and so don't rotate
        assert_eq!(leg.heading_deg, 90);
        assert_eq!(leg.rotation_deg, None);
        assert_eq!(leg.hover_s, Some(1.0));
        assert_eq!(leg.height_delta_m, 1.0);
    }

    #[test]
    fn test_short_leg_has_no_translation() {
        let plan = plan(
            vec![wp(0.0, 0.0, 0.5, 0.0), wp(0.0, 0.2, 0.5, 0.0)],
            &PlanParams::default()
        ).unwrap();

        let leg = &plan.legs()[0];
        assert!((leg.distance_m - 0.2).abs() < 1e-12);
        assert_eq!(leg.translation, None);
    }

    #[test]
    fn test_invalid_inputs() {
        let params = PlanParams::default();

        assert_eq!(plan(vec![], &params), Err(PlanError::NoWaypoints));

        assert_eq!(
            plan(vec![wp(0.0, 0.0, 0.0, 0.0), wp(std::f64::NAN, 0.0, 0.0, 0.0)], &params),
            Err(PlanError::NonFiniteWaypoint { index: 1 })
        );

        assert_eq!(
            plan(vec![wp(0.0, 0.0, 0.0, -1.0)], &params),
            Err(PlanError::NegativeHoverTime { index: 0, hover_s: -1.0 })
        );

        assert_eq!(
            plan(vec![wp(0.0, 0.0, 0.0, 0.0)], &PlanParams { nominal_fwd_speed_ms: 0.0 }),
            Err(PlanError::InvalidNominalSpeed(0.0))
        );
    }

    #[test]
    fn test_square_returns_to_start_heading() {
        let plan = plan(
            vec![
                wp(0.0, 0.0, 1.0, 0.0),
                wp(0.0, 2.0, 1.0, 0.0),
                wp(2.0, 2.0, 1.0, 0.0),
                wp(2.0, 0.0, 1.0, 0.0),
                wp(0.0, 0.0, 1.0, 0.0),
            ],
            &PlanParams::default()
        ).unwrap();

        assert_eq!(plan.headings_deg(), &[0, 0, 90, 180, 270]);
        assert_eq!(plan.rotation_angles_deg(), vec![0.0, 90.0, 90.0, 90.0]);
        assert_eq!(plan.return_rotation_deg(), Some(90.0));
    }

    fn waypoint_strategy() -> impl Strategy<Value = Waypoint> {
        (-50.0f64..50.0, -50.0f64..50.0, 0.0f64..3.0, 0.0f64..5.0)
            .prop_map(|(x, y, z, h)| Waypoint::new(x, y, z, h))
    }

    proptest! {
        #[test]
        fn plan_is_deterministic(wps in prop::collection::vec(waypoint_strategy(), 1..20)) {
            let params = PlanParams::default();

            let a = plan(wps.clone(), &params).unwrap();
            let b = plan(wps, &params).unwrap();

            prop_assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
            prop_assert_eq!(a, b);
        }

        #[test]
        fn plan_invariants_hold(wps in prop::collection::vec(waypoint_strategy(), 1..20)) {
            let n = wps.len();
            let plan = plan(wps, &PlanParams::default()).unwrap();

            prop_assert_eq!(plan.legs().len(), n - 1);
            prop_assert_eq!(plan.headings_deg().len(), n);
            prop_assert_eq!(plan.rotation_angles_deg().len(), n - 1);

            for h in plan.headings_deg() {
                prop_assert!(*h < 360);
            }

            for leg in plan.legs() {
                prop_assert!(leg.distance_m >= 0.0);
                prop_assert!(leg.fwd_velocity_ms().is_finite());

                if let Some(r) = leg.rotation_deg {
                    prop_assert!(r > -180.0 && r <= 180.0);
                }
                if let Some(t) = leg.translation {
                    prop_assert!(t.travel_time_s > 0);
                }
            }
        }
    }
}
