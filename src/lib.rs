#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod error;
pub mod matrix {
    pub mod dense;
    pub mod element;
    pub mod matrix;
    pub mod vector;
}
pub mod solver {
    pub mod linalg;
    pub mod linear_system;
}
pub mod tolerance;

pub mod utils;

#[cfg(feature = "python")]
pub mod python;

pub use error::{LinalgError, LinalgResult};
pub use matrix::dense::DenseMatrix;
pub use matrix::element::Scalar;
pub use matrix::matrix::{scale, Matrix, Scale};
pub use matrix::vector::Vector;
pub use solver::linalg::{inv, solve, Inverse, Linalg, Solution};
pub use solver::linear_system::{LinearSystem, Solvability};
pub use tolerance::{Tolerance, DEFAULT_EPSILON};

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn rust_linalg(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyMatrix>()?;
    m.add_function(wrap_pyfunction!(python::inv, m)?)?;
    Ok(())
}
