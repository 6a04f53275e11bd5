use crate::error::LinalgError;
use crate::matrix::dense::DenseMatrix;
use crate::matrix::matrix::{Matrix, Scale};
use crate::matrix::vector::Vector;
use crate::solver::linalg::{Linalg, Solution};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyType;

fn value_error(error: LinalgError) -> PyErr {
    PyValueError::new_err(error.to_string())
}

#[derive(Debug, Clone)]
#[pyclass(frozen, name = "Matrix")]
pub struct PyMatrix {
    inner: DenseMatrix<f64>,
}

impl From<DenseMatrix<f64>> for PyMatrix {
    fn from(inner: DenseMatrix<f64>) -> Self {
        PyMatrix { inner }
    }
}

#[pymethods]
impl PyMatrix {
    #[classmethod]
    pub fn from_list(_cls: &Bound<PyType>, lines: Vec<Vec<f64>>) -> PyResult<Self> {
        DenseMatrix::from_list(lines)
            .map(PyMatrix::from)
            .map_err(value_error)
    }

    #[classmethod]
    pub fn identity(_cls: &Bound<PyType>, n: usize) -> PyResult<Self> {
        DenseMatrix::identity(n)
            .map(PyMatrix::from)
            .map_err(value_error)
    }

    pub fn to_list(&self) -> Vec<Vec<f64>> {
        self.inner.to_list()
    }

    pub fn __repr__(&self) -> String {
        self.inner.to_string()
    }

    pub fn __add__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        match self.inner.add(&rhs.inner) {
            Ok(result) => Ok(result.into()),
            Err(error) => Err(value_error(error)),
        }
    }

    pub fn __sub__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        match self.inner.sub(&rhs.inner) {
            Ok(result) => Ok(result.into()),
            Err(error) => Err(value_error(error)),
        }
    }

    pub fn __mul__(&self, rhs: &PyMatrix) -> PyResult<PyMatrix> {
        match self.inner.matmul(&rhs.inner) {
            Ok(result) => Ok(result.into()),
            Err(error) => Err(value_error(error)),
        }
    }

    pub fn __neg__(&self) -> PyMatrix {
        self.inner.negate().into()
    }

    pub fn scale(&self, k: f64) -> PyMatrix {
        self.inner.scale(k).into()
    }

    #[getter(T)]
    pub fn transposed(&self) -> PyMatrix {
        self.inner.transpose().into()
    }

    #[getter]
    pub fn rows(&self) -> usize {
        self.inner.row_num()
    }

    #[getter]
    pub fn cols(&self) -> usize {
        self.inner.col_num()
    }

    /// Particular solution of `self * x = target`, or `None` when the system
    /// has no solution.
    pub fn solve_right(&self, target: Vec<f64>) -> PyResult<Option<Vec<f64>>> {
        let target = Vector::new(target).map_err(value_error)?;
        match Linalg::default().solve(&self.inner, &target) {
            Ok(Solution::Unique(x)) => Ok(Some(x.into_vec())),
            Ok(Solution::Infinite { particular, .. }) => Ok(Some(particular.into_vec())),
            Ok(Solution::Inconsistent) => Ok(None),
            Err(error) => Err(value_error(error)),
        }
    }

    pub fn inverse(&self) -> PyResult<Option<PyMatrix>> {
        match Linalg::default().inv(&self.inner) {
            Ok(result) => Ok(result.into_option().map(PyMatrix::from)),
            Err(error) => Err(value_error(error)),
        }
    }
}

/// `(inverse, invertible)`; the first element is the identity when the
/// matrix is singular.
#[pyfunction]
pub fn inv(matrix: &PyMatrix) -> PyResult<(PyMatrix, bool)> {
    let result = Linalg::default()
        .inv(&matrix.inner)
        .map_err(value_error)?;
    Ok((result.matrix.into(), result.invertible))
}
