use crate::matrix::element::Scalar;
use crate::tolerance::Tolerance;
use std::iter::zip;

/// Sum of products of two equal-length slices, snapped to zero when the
/// result is negligible.
///
/// With `snap_running_dot`, the accumulator is also snapped after every term.
pub fn snapped_dot<T: Scalar>(lhs: &[T], rhs: &[T], tol: &Tolerance) -> T {
    debug_assert_eq!(lhs.len(), rhs.len());
    let sum = zip(lhs, rhs).fold(T::zero(), |acc, (a, b)| {
        let acc = acc + *a * *b;
        if tol.snap_running_dot {
            tol.snap(acc)
        } else {
            acc
        }
    });
    tol.snap(sum)
}

/// Elementwise comparison of two sequences of floats with an absolute tolerance.
#[macro_export]
macro_rules! assert_all_close {
    (abs=$tol:expr, $left:expr, $right:expr $(,)?) => {{
        let left: Vec<f64> = $left.into_iter().map(f64::from).collect();
        let right: Vec<f64> = $right.into_iter().map(f64::from).collect();
        assert_eq!(left.len(), right.len(), "lengths differ");
        for (i, (a, b)) in left.iter().zip(right.iter()).enumerate() {
            if !((a - b).abs() <= $tol) {
                panic!(
                    "not nearly equal at index {} (abs={})\n left: {:?}\nright: {:?}",
                    i, $tol, left, right
                );
            }
        }
    }};
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_all_close!(abs = 1e-8, $left, $right)
    };
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
