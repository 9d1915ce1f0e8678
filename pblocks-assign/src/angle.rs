//! Circular (periodic) arithmetic on dihedral angles in degrees.

/// Bring an angle into the range (-180, 180] by adding or removing full turns.
///
/// Angles already in range are returned unchanged, so the function is
/// idempotent. Non-finite input yields NaN.
///
/// ```
/// use pblocks_assign::angle::angle_modulo_360;
///
/// assert_eq!(angle_modulo_360(190.0), -170.0);
/// assert_eq!(angle_modulo_360(-190.0), 170.0);
/// assert_eq!(angle_modulo_360(-45.0), -45.0);
/// assert_eq!(angle_modulo_360(-180.0), 180.0);
/// ```
#[inline]
pub fn angle_modulo_360(angle: f64) -> f64 {
    let reduced = angle % 360.0;
    if reduced > 180.0 {
        reduced - 360.0
    } else if reduced <= -180.0 {
        reduced + 360.0
    } else {
        reduced
    }
}

/// Signed circular difference `a - b`, in (-180, 180].
#[inline]
pub fn circular_difference(a: f64, b: f64) -> f64 {
    angle_modulo_360(a - b)
}

/// Apply [`angle_modulo_360`] to every element.
pub fn normalize_in_place(angles: &mut [f64]) {
    for a in angles.iter_mut() {
        *a = angle_modulo_360(*a);
    }
}

/// Element-wise circular differences `reference - observed`.
pub fn circular_differences<const N: usize>(reference: &[f64; N], observed: &[f64; N]) -> [f64; N] {
    let mut diff = [0.0; N];
    for (d, (r, o)) in diff.iter_mut().zip(reference.iter().zip(observed.iter())) {
        *d = circular_difference(*r, *o);
    }
    diff
}

/// Sum of squared circular deviations between two angle vectors.
///
/// This is the ranking score used to match a dihedral window against a
/// Protein Block prototype: no square root and no averaging.
pub fn squared_circular_deviation<const N: usize>(reference: &[f64; N], observed: &[f64; N]) -> f64 {
    circular_differences(reference, observed)
        .iter()
        .map(|d| d * d)
        .sum()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn result_in_half_open_range(angle in -1.0e6f64..1.0e6) {
            let n = angle_modulo_360(angle);
            prop_assert!(n > -180.0 && n <= 180.0, "{} -> {}", angle, n);
        }

        #[test]
        fn result_congruent_mod_360(angle in -1.0e6f64..1.0e6) {
            let turns = (angle - angle_modulo_360(angle)) / 360.0;
            prop_assert!((turns - turns.round()).abs() < 1e-6, "{} turns", turns);
        }

        #[test]
        fn idempotent(angle in -1.0e6f64..1.0e6) {
            let once = angle_modulo_360(angle);
            prop_assert_eq!(angle_modulo_360(once), once);
        }

        #[test]
        fn difference_is_antisymmetric_off_the_seam(a in -180.0f64..180.0, b in -180.0f64..180.0) {
            let d = circular_difference(a, b);
            prop_assume!(d.abs() < 179.999);
            prop_assert!((d + circular_difference(b, a)).abs() < 1e-9);
        }
    }
}
