//! Leg geometry calculations
//!
//! Pure functions computing the flight parameters of a single leg from the displacement between
//! two waypoints. Headings are compass style bearings: 0° faces +Y (front), 90° faces +X (right).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::wrap_deg_180;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Planar distance of a displacement. Vertical displacement is never included.
pub fn hypotenuse(dx_m: f64, dy_m: f64) -> f64 {
    (dx_m * dx_m + dy_m * dy_m).sqrt()
}

/// Calculate the heading of a horizontal displacement in whole degrees, in the range [0, 360).
///
/// Displacements along an axis are special cased so no division by zero can occur. Off axis the
/// arctangent of the displacement ratio is truncated to a whole number of degrees before being
/// placed into its quadrant.
///
/// Returns `None` for a zero displacement, which has no heading.
pub fn heading_deg(dx_m: f64, dy_m: f64) -> Option<u16> {
    // Note that -0.0 == 0.0, so negative zero takes the axis branches too
    if dx_m == 0.0 && dy_m == 0.0 {
        return None;
    }

    if dx_m == 0.0 {
        return Some(if dy_m > 0.0 { 0 } else { 180 });
    }

    if dy_m == 0.0 {
        return Some(if dx_m > 0.0 { 90 } else { 270 });
    }

    let front_left = dx_m < 0.0 && dy_m > 0.0;

    let ratio = if front_left { dx_m / dy_m } else { dy_m / dx_m };
    let angle = ratio.atan().to_degrees().abs().trunc() as i32;

    let heading = match (dx_m > 0.0, dy_m > 0.0) {
        (true, true) => angle,
        (true, false) => 90 + angle,
        (false, false) => 270 - angle,
        (false, true) => 360 - angle,
    };

    // A truncated angle of zero in the front left quadrant would give 360
    Some(heading.rem_euclid(360) as u16)
}

/// Signed rotation from one heading to another, in the range (-180, 180].
///
/// Positive rotations are anti-clockwise.
pub fn rotation_angle_deg(from_deg: f64, to_deg: f64) -> f64 {
    wrap_deg_180(to_deg - from_deg)
}

/// Time to travel `distance_m` at the nominal speed, rounded to whole seconds.
///
/// Ties round to even. Short legs may round to zero seconds, in which case the leg cannot be
/// translated.
pub fn travel_time_s(distance_m: f64, nominal_fwd_speed_ms: f64) -> u32 {
    (distance_m / nominal_fwd_speed_ms).round_ties_even() as u32
}

/// The forward velocity required to cover `distance_m` in exactly `travel_time_s`.
///
/// Returns `None` if the travel time is zero.
pub fn fwd_velocity_ms(distance_m: f64, travel_time_s: u32) -> Option<f64> {
    if travel_time_s == 0 {
        None
    }
    else {
        Some(distance_m / travel_time_s as f64)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_heading_axes() {
        assert_eq!(heading_deg(0.0, 5.0), Some(0));
        assert_eq!(heading_deg(0.0, -5.0), Some(180));
        assert_eq!(heading_deg(5.0, 0.0), Some(90));
        assert_eq!(heading_deg(-5.0, 0.0), Some(270));
        assert_eq!(heading_deg(-0.0, 5.0), Some(0));
        assert_eq!(heading_deg(5.0, -0.0), Some(90));
        assert_eq!(heading_deg(0.0, 0.0), None);
        assert_eq!(heading_deg(-0.0, 0.0), None);
    }

    #[test]
    fn test_heading_quadrants() {
        assert_eq!(heading_deg(10.0, 10.0), Some(45));
        assert_eq!(heading_deg(1.0, -1.0), Some(135));
        assert_eq!(heading_deg(-1.0, -1.0), Some(225));
        assert_eq!(heading_deg(-1.0, 1.0), Some(315));

        // atan(2) = 63.43 degrees, truncated to 63
        assert_eq!(heading_deg(-1.0, -2.0), Some(207));
        // atan(0.5) = 26.57 degrees, truncated to 26
        assert_eq!(heading_deg(-1.0, 2.0), Some(334));
    }

    #[test]
    fn test_heading_front_left_wraps() {
        // Angle truncates to zero, which must not give 360
        assert_eq!(heading_deg(-1e-6, 1.0), Some(0));
    }

    #[test]
    fn test_rotation_angle() {
        assert_eq!(rotation_angle_deg(350.0, 10.0), 20.0);
        assert_eq!(rotation_angle_deg(10.0, 350.0), -20.0);
        assert_eq!(rotation_angle_deg(0.0, 90.0), 90.0);
        assert_eq!(rotation_angle_deg(90.0, 0.0), -90.0);
        assert_eq!(rotation_angle_deg(0.0, 180.0), 180.0);
        assert_eq!(rotation_angle_deg(270.0, 90.0), 180.0);
        assert_eq!(rotation_angle_deg(45.0, 45.0), 0.0);
    }

    #[test]
    fn test_travel_time() {
        assert_eq!(travel_time_s(10.0, 0.5), 20);
        assert_eq!(travel_time_s(0.2, 0.5), 0);
        assert_eq!(travel_time_s(0.0, 0.5), 0);
        // 2.5 rounds to even
        assert_eq!(travel_time_s(1.25, 0.5), 2);
        // 3.5 rounds to even
        assert_eq!(travel_time_s(1.75, 0.5), 4);
    }

    #[test]
    fn test_fwd_velocity() {
        assert_eq!(fwd_velocity_ms(10.0, 20), Some(0.5));
        assert_eq!(fwd_velocity_ms(1.3, 3), Some(1.3 / 3.0));
        assert_eq!(fwd_velocity_ms(0.2, 0), None);
    }

    proptest! {
        #[test]
        fn heading_always_in_range(dx in -1000.0f64..1000.0, dy in -1000.0f64..1000.0) {
            prop_assume!(dx != 0.0 || dy != 0.0);
            let h = heading_deg(dx, dy);
            prop_assert!(h.is_some());
            prop_assert!(h.unwrap() < 360, "heading {:?} for ({}, {})", h, dx, dy);
        }

        #[test]
        fn rotation_always_in_range(from in 0u16..360, to in 0u16..360) {
            let r = rotation_angle_deg(from as f64, to as f64);
            prop_assert!(r > -180.0 && r <= 180.0, "rotation {} from {} to {}", r, from, to);
        }

        #[test]
        fn rotation_reaches_target(from in 0u16..360, to in 0u16..360) {
            let r = rotation_angle_deg(from as f64, to as f64);
            let reached = util::maths::wrap_deg_360(from as f64 + r);
            prop_assert_eq!(reached, to as f64);
        }
    }
}
