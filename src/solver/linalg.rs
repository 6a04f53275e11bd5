use crate::error::{LinalgError, LinalgResult};
use crate::matrix::dense::DenseMatrix;
use crate::matrix::element::Scalar;
use crate::matrix::matrix::Matrix;
use crate::matrix::vector::Vector;
use crate::solver::linear_system::{LinearSystem, Solvability};
use crate::tolerance::Tolerance;
use log::debug;
use rayon::prelude::*;

/// Result of an inversion.
///
/// When `invertible` is false, `matrix` is the identity and must not be used
/// as an inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct Inverse<T> {
    pub matrix: DenseMatrix<T>,
    pub invertible: bool,
    /// Number of pivots found while reducing `[A|I]`.
    pub rank: usize,
}

impl<T> Inverse<T> {
    pub fn into_option(self) -> Option<DenseMatrix<T>> {
        if self.invertible {
            Some(self.matrix)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Solution<T> {
    Unique(Vector<T>),
    /// `particular` has every free variable set to zero, the columns of
    /// `kernel` span the solutions of the homogeneous system.
    Infinite {
        particular: Vector<T>,
        kernel: DenseMatrix<T>,
    },
    Inconsistent,
}

/// Entry point for solving and inverting with a shared tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Linalg {
    tol: Tolerance,
}

impl Linalg {
    pub fn new(tol: Tolerance) -> Self {
        Linalg { tol }
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tol
    }

    /// Inverse of a square matrix, computed by solving `A·X = I`.
    pub fn inv<T: Scalar>(&self, a: &DenseMatrix<T>) -> LinalgResult<Inverse<T>> {
        let (rows, cols) = a.shape();
        if rows != cols {
            return Err(LinalgError::NotSquare { rows, cols });
        }

        let identity = DenseMatrix::identity(rows)?;
        let mut ls = LinearSystem::with_matrix_rhs(a, &identity)?.with_tolerance(self.tol);
        let verdict = ls.gauss_jordan_elimination();
        let rank = ls.rank();

        if verdict == Solvability::Inconsistent || rank < rows {
            debug!("matrix is not invertible (rank {} of {})", rank, rows);
            return Ok(Inverse {
                matrix: identity,
                invertible: false,
                rank,
            });
        }

        Ok(Inverse {
            matrix: ls.augmented().take_cols(cols, 2 * cols)?,
            invertible: true,
            rank,
        })
    }

    /// Inverts independent matrices in parallel.
    pub fn inv_many<T: Scalar>(&self, mats: &[DenseMatrix<T>]) -> Vec<LinalgResult<Inverse<T>>> {
        mats.par_iter().map(|a| self.inv(a)).collect()
    }

    pub fn solve<T: Scalar>(&self, a: &DenseMatrix<T>, b: &Vector<T>) -> LinalgResult<Solution<T>> {
        let mut ls = LinearSystem::new(a, b)?.with_tolerance(self.tol);
        if ls.gauss_jordan_elimination() == Solvability::Inconsistent {
            return Ok(Solution::Inconsistent);
        }

        Ok(match (ls.solution(), ls.kernel()) {
            (Some(x), None) => Solution::Unique(x),
            (Some(particular), Some(kernel)) => Solution::Infinite { particular, kernel },
            // `solution` is only `None` for an inconsistent verdict, which
            // returned above.
            (None, _) => Solution::Inconsistent,
        })
    }

    /// Solves `A·X = B` column by column; `None` when any column is inconsistent.
    pub fn solve_many<T: Scalar>(
        &self,
        a: &DenseMatrix<T>,
        b: &DenseMatrix<T>,
    ) -> LinalgResult<Option<DenseMatrix<T>>> {
        let mut ls = LinearSystem::with_matrix_rhs(a, b)?.with_tolerance(self.tol);
        ls.gauss_jordan_elimination();
        Ok(ls.matrix_solution())
    }
}

/// [`Linalg::inv`] with the default tolerance.
pub fn inv<T: Scalar>(a: &DenseMatrix<T>) -> LinalgResult<Inverse<T>> {
    Linalg::default().inv(a)
}

/// [`Linalg::solve`] with the default tolerance.
pub fn solve<T: Scalar>(a: &DenseMatrix<T>, b: &Vector<T>) -> LinalgResult<Solution<T>> {
    Linalg::default().solve(a, b)
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
