use crate::error::{LinalgError, LinalgResult};
use crate::matrix::element::{as_f64, Scalar};
use crate::matrix::matrix::{Matrix, Scale};
use crate::matrix::vector::Vector;
use crate::tolerance::Tolerance;
use crate::utils::snapped_dot;
use itertools::Itertools;
use rayon::prelude::*;
use std::fmt;
use std::ops;

/// Row-major dense matrix with at least one row and one column.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T> {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) cells: Vec<T>,
}

impl<T: Scalar> Matrix<T> for DenseMatrix<T> {
    fn from_list(lines: Vec<Vec<T>>) -> LinalgResult<Self> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(LinalgError::InvalidShape {
                reason: "matrix must have at least one row and one column".into(),
            });
        }
        if let Some((i, line)) = lines.iter().find_position(|l| l.len() != cols) {
            return Err(LinalgError::InvalidShape {
                reason: format!("row {} has {} elements, expected {}", i, line.len(), cols),
            });
        }

        Ok(DenseMatrix {
            rows,
            cols,
            cells: lines.into_iter().flatten().collect(),
        })
    }

    fn to_list(&self) -> Vec<Vec<T>> {
        self.cells
            .chunks(self.cols)
            .map(|line| line.into())
            .collect()
    }

    fn zero(rows: usize, cols: usize) -> LinalgResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(LinalgError::InvalidShape {
                reason: format!("cannot build a {}x{} matrix", rows, cols),
            });
        }
        Ok(DenseMatrix {
            rows,
            cols,
            cells: vec![T::zero(); rows * cols],
        })
    }

    fn identity(n: usize) -> LinalgResult<Self> {
        let mut mat = DenseMatrix::zero(n, n)?;
        for i in 0..n {
            mat.cells[i * n + i] = T::one();
        }
        Ok(mat)
    }

    fn transpose(&self) -> DenseMatrix<T> {
        DenseMatrix {
            rows: self.cols,
            cols: self.rows,
            cells: (0..self.cols)
                .flat_map(|c| (0..self.rows).map(move |r| self.cell(r, c)))
                .collect(),
        }
    }

    fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn at(&self, row: usize, col: usize) -> LinalgResult<T> {
        self.check_index(row, col)?;
        Ok(self.cell(row, col))
    }

    fn set(&mut self, row: usize, col: usize, value: T) -> LinalgResult<()> {
        self.check_index(row, col)?;
        self.cells[row * self.cols + col] = value;
        Ok(())
    }
}

impl<T: Scalar> DenseMatrix<T> {
    /// Stacks vectors as rows.
    pub fn from_rows(rows: &[Vector<T>]) -> LinalgResult<Self> {
        DenseMatrix::from_list(rows.iter().map(|r| r.as_slice().to_vec()).collect())
    }

    fn check_index(&self, row: usize, col: usize) -> LinalgResult<()> {
        if row >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                index: row,
                len: self.rows,
            });
        }
        if col >= self.cols {
            return Err(LinalgError::IndexOutOfRange {
                index: col,
                len: self.cols,
            });
        }
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn cell(&self, row: usize, col: usize) -> T {
        self.cells[row * self.cols + col]
    }

    #[inline(always)]
    pub(crate) fn row_slice(&self, row: usize) -> &[T] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for k in 0..self.cols {
            self.cells.swap(a * self.cols + k, b * self.cols + k);
        }
    }

    pub fn row_vector(&self, row: usize) -> LinalgResult<Vector<T>> {
        self.check_index(row, 0)?;
        Vector::new(self.row_slice(row).to_vec())
    }

    pub fn col_vector(&self, col: usize) -> LinalgResult<Vector<T>> {
        self.check_index(0, col)?;
        Vector::new((0..self.rows).map(|r| self.cell(r, col)).collect())
    }

    fn check_same_shape(&self, rhs: &DenseMatrix<T>) -> LinalgResult<()> {
        if self.shape() != rhs.shape() {
            return Err(LinalgError::ShapeMismatch {
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }
        Ok(())
    }

    pub fn add(&self, rhs: &DenseMatrix<T>) -> LinalgResult<DenseMatrix<T>> {
        self.check_same_shape(rhs)?;
        Ok(self.map_cells(rhs, |a, b| a + b))
    }

    pub fn sub(&self, rhs: &DenseMatrix<T>) -> LinalgResult<DenseMatrix<T>> {
        self.check_same_shape(rhs)?;
        Ok(self.map_cells(rhs, |a, b| a - b))
    }

    fn map_cells(&self, rhs: &DenseMatrix<T>, op: impl Fn(T, T) -> T) -> DenseMatrix<T> {
        DenseMatrix {
            rows: self.rows,
            cols: self.cols,
            cells: self
                .cells
                .iter()
                .zip(rhs.cells.iter())
                .map(|(a, b)| op(*a, *b))
                .collect(),
        }
    }

    pub fn negate(&self) -> DenseMatrix<T> {
        self.scale(-T::one())
    }

    pub fn divide(&self, k: T) -> LinalgResult<DenseMatrix<T>> {
        self.divide_with(k, &Tolerance::default())
    }

    pub fn divide_with(&self, k: T, tol: &Tolerance) -> LinalgResult<DenseMatrix<T>> {
        if !(k.abs() > tol.epsilon_as()) {
            return Err(LinalgError::DivisionByZero {
                divisor: as_f64(k),
                epsilon: tol.epsilon,
            });
        }
        Ok(self.scale(T::one() / k))
    }

    pub fn matmul(&self, rhs: &DenseMatrix<T>) -> LinalgResult<DenseMatrix<T>> {
        self.matmul_with(rhs, &Tolerance::default())
    }

    /// Matrix product. Every cell is the snapped dot product of a row of
    /// `self` with a column of `rhs`.
    pub fn matmul_with(
        &self,
        rhs: &DenseMatrix<T>,
        tol: &Tolerance,
    ) -> LinalgResult<DenseMatrix<T>> {
        if self.cols != rhs.rows {
            return Err(LinalgError::ShapeMismatch {
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }

        let rot = rhs.transpose();
        let mut result = DenseMatrix {
            rows: self.rows,
            cols: rhs.cols,
            cells: vec![T::zero(); self.rows * rhs.cols],
        };

        result
            .cells
            .par_chunks_mut(rhs.cols)
            .enumerate()
            .for_each(|(r, row)| {
                let lhs_row = self.row_slice(r);
                for (c, cell) in row.iter_mut().enumerate() {
                    *cell = snapped_dot(lhs_row, rot.row_slice(c), tol);
                }
            });

        Ok(result)
    }

    pub fn mul_vector(&self, x: &Vector<T>) -> LinalgResult<Vector<T>> {
        self.mul_vector_with(x, &Tolerance::default())
    }

    /// `self * x` for a column vector `x`.
    pub fn mul_vector_with(&self, x: &Vector<T>, tol: &Tolerance) -> LinalgResult<Vector<T>> {
        if self.cols != x.len() {
            return Err(LinalgError::ShapeMismatch {
                lhs: self.shape(),
                rhs: (x.len(), 1),
            });
        }
        Vector::new(
            (0..self.rows)
                .map(|r| snapped_dot(self.row_slice(r), x.as_slice(), tol))
                .collect(),
        )
    }

    /// Column-wise concatenation `[self | rhs]`.
    pub fn hconcat(&self, rhs: &DenseMatrix<T>) -> LinalgResult<DenseMatrix<T>> {
        if self.rows != rhs.rows {
            return Err(LinalgError::ShapeMismatch {
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }
        Ok(DenseMatrix {
            rows: self.rows,
            cols: self.cols + rhs.cols,
            cells: (0..self.rows)
                .flat_map(|r| self.row_slice(r).iter().chain(rhs.row_slice(r)).copied())
                .collect(),
        })
    }

    /// Columns `start..end` as a new matrix.
    pub fn take_cols(&self, start: usize, end: usize) -> LinalgResult<DenseMatrix<T>> {
        if start >= end || end > self.cols {
            return Err(LinalgError::InvalidShape {
                reason: format!("column range {}..{} of a {}-column matrix", start, end, self.cols),
            });
        }
        Ok(DenseMatrix {
            rows: self.rows,
            cols: end - start,
            cells: (0..self.rows)
                .flat_map(|r| self.row_slice(r)[start..end].iter().copied())
                .collect(),
        })
    }

    /// Whether the matrix is in reduced row-echelon form, treating
    /// negligible entries as zero.
    pub fn is_rref(&self, tol: &Tolerance) -> bool {
        let mut lead = None;
        let mut seen_zero_row = false;

        for i in 0..self.rows {
            let row = self.row_slice(i);
            match row.iter().position(|x| !tol.is_negligible(*x)) {
                None => seen_zero_row = true,
                Some(pivot_col) => {
                    if seen_zero_row {
                        return false;
                    }
                    if let Some(prev_lead) = lead {
                        if pivot_col <= prev_lead {
                            return false;
                        }
                    }
                    lead = Some(pivot_col);

                    if !tol.is_negligible(row[pivot_col] - T::one()) {
                        return false;
                    }
                    if (0..self.rows).any(|r| r != i && !tol.is_negligible(self.cell(r, pivot_col)))
                    {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl<T: Scalar> Scale<T> for DenseMatrix<T> {
    fn scale(&self, k: T) -> DenseMatrix<T> {
        DenseMatrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|x| *x * k).collect(),
        }
    }
}

impl<T: Scalar> fmt::Display for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix(")?;
        for line in self.cells.chunks(self.cols) {
            writeln!(f, "[{}]", line.iter().join(","))?;
        }
        write!(f, ")")
    }
}

impl<T: Scalar> ops::Add<&DenseMatrix<T>> for &DenseMatrix<T> {
    type Output = LinalgResult<DenseMatrix<T>>;

    fn add(self, rhs: &DenseMatrix<T>) -> LinalgResult<DenseMatrix<T>> {
        DenseMatrix::add(self, rhs)
    }
}

impl<T: Scalar> ops::Sub<&DenseMatrix<T>> for &DenseMatrix<T> {
    type Output = LinalgResult<DenseMatrix<T>>;

    fn sub(self, rhs: &DenseMatrix<T>) -> LinalgResult<DenseMatrix<T>> {
        DenseMatrix::sub(self, rhs)
    }
}

impl<T: Scalar> ops::Mul<&DenseMatrix<T>> for &DenseMatrix<T> {
    type Output = LinalgResult<DenseMatrix<T>>;

    fn mul(self, rhs: &DenseMatrix<T>) -> LinalgResult<DenseMatrix<T>> {
        self.matmul(rhs)
    }
}

impl<T: Scalar> ops::Neg for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn neg(self) -> DenseMatrix<T> {
        self.negate()
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
