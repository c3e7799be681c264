//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Wrap an angle in degrees into the range (-180, 180].
///
/// The wrap is a single correction of one full turn, matching the output of a difference between
/// two angles which are already in [0, 360). Exactly -180 is mapped to +180.
pub fn wrap_deg_180<T>(angle: T) -> T
where
    T: Float
{
    let half_turn = T::from(180.0).unwrap();
    let full_turn = T::from(360.0).unwrap();

    let mut wrapped = angle;

    if wrapped > half_turn {
        wrapped = wrapped - full_turn;
    }
    else if wrapped < -half_turn {
        wrapped = wrapped + full_turn;
    }

    if wrapped == -half_turn {
        half_turn
    }
    else {
        wrapped
    }
}

/// Wrap an angle in degrees into the range [0, 360).
pub fn wrap_deg_360<T>(angle: T) -> T
where
    T: Float
{
    let full_turn = T::from(360.0).unwrap();

    let r = rem_euclid(angle, full_turn);

    // rem_euclid can return exactly rhs due to round-off
    if r >= full_turn { T::zero() } else { r }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_deg_180() {
        assert_eq!(wrap_deg_180(20f64), 20f64);
        assert_eq!(wrap_deg_180(-340f64), 20f64);
        assert_eq!(wrap_deg_180(340f64), -20f64);
        assert_eq!(wrap_deg_180(180f64), 180f64);
        assert_eq!(wrap_deg_180(-180f64), 180f64);
        assert_eq!(wrap_deg_180(-90f64), -90f64);
    }

    #[test]
    fn test_wrap_deg_360() {
        assert_eq!(wrap_deg_360(0f64), 0f64);
        assert_eq!(wrap_deg_360(360f64), 0f64);
        assert_eq!(wrap_deg_360(-90f64), 270f64);
        assert_eq!(wrap_deg_360(450f64), 90f64);
    }

    proptest! {
        #[test]
        fn wrap_deg_180_in_range(a in 0.0f64..360.0, b in 0.0f64..360.0) {
            let w = wrap_deg_180(b - a);
            prop_assert!(w > -180.0 && w <= 180.0, "{} out of range", w);
        }

        #[test]
        fn wrap_deg_360_in_range(a in -10_000.0f64..10_000.0) {
            let w = wrap_deg_360(a);
            prop_assert!(w >= 0.0 && w < 360.0, "{} out of range", w);
        }
    }
}
