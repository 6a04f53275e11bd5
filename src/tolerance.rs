use crate::error::{LinalgError, LinalgResult};
use crate::matrix::element::Scalar;

/// Values whose magnitude is below this are treated as exactly zero.
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// Lower bound on the effective epsilon, in machine epsilons of the element type.
const ROUNDING_FLOOR: f64 = 64.0;

/// Zero threshold shared by pivot selection, snapping, division checks and
/// the consistency test.
///
/// The threshold applied to an element type `T` never drops below
/// `64 * T::epsilon()`, so `f32` rounding noise is still treated as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub epsilon: f64,
    /// Snap the dot product accumulator after every term instead of only
    /// the final sum.
    pub snap_running_dot: bool,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            epsilon: DEFAULT_EPSILON,
            snap_running_dot: false,
        }
    }
}

impl Tolerance {
    pub fn new(epsilon: f64) -> LinalgResult<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(LinalgError::InvalidTolerance { epsilon });
        }
        Ok(Tolerance {
            epsilon,
            ..Tolerance::default()
        })
    }

    pub fn with_running_dot_snap(mut self, enabled: bool) -> Self {
        self.snap_running_dot = enabled;
        self
    }

    #[inline(always)]
    pub fn epsilon_as<T: Scalar>(&self) -> T {
        let requested = T::from(self.epsilon).unwrap_or_else(T::epsilon);
        let floor = T::epsilon() * T::from(ROUNDING_FLOOR).unwrap_or_else(T::one);
        requested.max(floor)
    }

    #[inline(always)]
    pub fn is_negligible<T: Scalar>(&self, x: T) -> bool {
        x.abs() < self.epsilon_as()
    }

    #[inline(always)]
    pub fn snap<T: Scalar>(&self, x: T) -> T {
        if self.is_negligible(x) {
            T::zero()
        } else {
            x
        }
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
