use num_traits::Float;
use std::fmt;

pub trait Scalar:  // Avoid repeating all the traits
    Float
    + Send
    + Sync
    + std::iter::Sum<Self>
    + fmt::Display
    + fmt::Debug
{
}

impl<T> Scalar for T where
    T: Float + Send + Sync + std::iter::Sum<T> + fmt::Display + fmt::Debug
{
}

/// Lossy conversion used when a value has to be reported in an error.
#[inline(always)]
pub fn as_f64<T: Scalar>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
