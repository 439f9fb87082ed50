//! Test support for the lizard crates.
//!
//! Two kinds of fixtures are used across the workspace:
//!
//! - Reference data that is too large for the repository: GPM L1C granules
//!   below `sat/gpm_l1c/` and the `flight-phase-separation` segment
//!   catalog. [`find_test_file`] locates them and [`require_test_file!`]
//!   skips a test when they are absent.
//! - Synthetic swaths, profiles and identifiers ([`generators`],
//!   [`fixtures`]) that reader tests write to NetCDF in a scratch
//!   directory.
//!
//! Float comparisons go through [`assert_approx_eq!`] and, for whole
//! coordinate or variable vectors, [`assert_values_approx_eq!`].

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Path of a reference fixture, or an early return from the test when the
/// reference archive is not available.
///
/// ```ignore
/// let dir = require_test_file!("sat/gpm_l1c");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: reference data '{}' not found, point TEST_DATA_DIR at the lizard reference archive",
                    $name
                );
                return;
            }
        }
    }};
}

/// `|left - right| <= epsilon` for two numbers.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: {} ≈ {} (off by {}, allowed {})",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Element-wise [`assert_approx_eq!`] for value vectors such as
/// `Dataset::values`. NaN only matches NaN.
#[macro_export]
macro_rules! assert_values_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: &[f64] = &$left;
        let right: &[f64] = &$right;
        assert_eq!(left.len(), right.len(), "value count differs");
        for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            if l.is_nan() || r.is_nan() {
                assert!(
                    l.is_nan() && r.is_nan(),
                    "value {} differs: `{:?}` vs `{:?}`",
                    i,
                    l,
                    r
                );
            } else {
                $crate::assert_approx_eq!(*l, *r, $epsilon);
            }
        }
    }};
}

/// [`assert_approx_eq!`] on both parts of a `(lon, lat)` or `(x, y)` pair.
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_approx_eq_within_epsilon() {
        assert_approx_eq!(273.1501, 273.15, 0.001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_approx_eq_outside_epsilon() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_values_approx_eq_matches_nan() {
        assert_values_approx_eq!(vec![1.0, f64::NAN, 3.0], vec![1.0, f64::NAN, 3.0000001], 1e-6);
    }

    #[test]
    #[should_panic(expected = "differs")]
    fn test_values_approx_eq_rejects_nan_mismatch() {
        assert_values_approx_eq!(vec![f64::NAN], vec![0.0], 1e-6);
    }

    #[test]
    fn test_coords_approx_eq() {
        assert_coords_approx_eq!((15.0001, 78.9), (15.0, 78.9), 0.001);
    }
}
