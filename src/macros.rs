//! Assertion macros for approximate geometry

/// Assert that two values are equal within an explicit tolerance.
///
/// Works for anything implementing [`AlmostEq`](crate::AlmostEq): numbers,
/// locations, arrows, paths, contours and slices of them.
///
/// ```
/// use copperline::{assert_almost_eq, Location, Tolerance};
///
/// assert_almost_eq!(Location::new(0.1 + 0.2, 0.0), Location::new(0.3, 0.0), Tolerance::DEFAULT);
/// ```
#[macro_export]
macro_rules! assert_almost_eq {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        $crate::AlmostEq::assert_almost_eq(&$left, &$right, $tolerance)
    };
}
