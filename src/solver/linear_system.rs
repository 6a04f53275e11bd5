use crate::error::{LinalgError, LinalgResult};
use crate::matrix::dense::DenseMatrix;
use crate::matrix::element::Scalar;
use crate::matrix::matrix::Matrix;
use crate::matrix::vector::Vector;
use crate::tolerance::Tolerance;
use itertools::Itertools;
use log::{debug, trace};
use std::fmt;

/// Outcome of the consistency check after Gauss-Jordan elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solvability {
    Consistent,
    /// Some row with no pivot has a non-zero right-hand side.
    Inconsistent,
}

/// A system `A·X = B` held as one augmented buffer `[A|B]`.
///
/// The buffer is a private copy, so elimination never touches the caller's
/// matrices. `forward` reduces it to row-echelon form and records the pivot
/// columns, `backward` clears the entries above every pivot.
#[derive(Debug, Clone)]
pub struct LinearSystem<T> {
    row: usize,
    col: usize,
    extra: usize,
    ab: DenseMatrix<T>,
    pivots: Vec<usize>,
    tol: Tolerance,
    verdict: Option<Solvability>,
}

impl<T: Scalar> LinearSystem<T> {
    pub fn new(a: &DenseMatrix<T>, b: &Vector<T>) -> LinalgResult<Self> {
        if a.row_num() != b.len() {
            return Err(LinalgError::DimensionMismatch {
                rows: a.row_num(),
                rhs_rows: b.len(),
            });
        }
        let rhs = DenseMatrix {
            rows: b.len(),
            cols: 1,
            cells: b.as_slice().to_vec(),
        };
        LinearSystem::build(a, &rhs)
    }

    /// System with several right-hand sides, one per column of `rhs`.
    pub fn with_matrix_rhs(a: &DenseMatrix<T>, rhs: &DenseMatrix<T>) -> LinalgResult<Self> {
        if a.row_num() != rhs.row_num() {
            return Err(LinalgError::DimensionMismatch {
                rows: a.row_num(),
                rhs_rows: rhs.row_num(),
            });
        }
        LinearSystem::build(a, rhs)
    }

    fn build(a: &DenseMatrix<T>, rhs: &DenseMatrix<T>) -> LinalgResult<Self> {
        let ab = a.hconcat(rhs)?;
        debug!(
            "linear system: {}x{} coefficients, {} right-hand side(s)",
            a.row_num(),
            a.col_num(),
            rhs.col_num()
        );
        Ok(LinearSystem {
            row: a.row_num(),
            col: a.col_num(),
            extra: rhs.col_num(),
            ab,
            pivots: vec![],
            tol: Tolerance::default(),
            verdict: None,
        })
    }

    pub fn with_tolerance(mut self, tol: Tolerance) -> Self {
        self.tol = tol;
        self
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tol
    }

    /// Current state of the augmented buffer.
    pub fn augmented(&self) -> &DenseMatrix<T> {
        &self.ab
    }

    /// Pivot columns, one per eliminated row, strictly increasing.
    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    pub fn rank(&self) -> usize {
        self.pivots.len()
    }

    /// Verdict of the last [`gauss_jordan_elimination`](Self::gauss_jordan_elimination),
    /// `None` if it has not run since the last `forward`.
    pub fn solvability(&self) -> Option<Solvability> {
        self.verdict
    }

    /// Whether the coefficient part of the buffer is in reduced row-echelon form.
    pub fn is_reduced(&self) -> bool {
        self.ab
            .take_cols(0, self.col)
            .map(|coefficients| coefficients.is_rref(&self.tol))
            .unwrap_or(false)
    }

    fn find_max_row(&self, r: usize, k: usize) -> usize {
        let mut best = self.ab.cell(r, k).abs();
        let mut max_row = r;
        for i in (r + 1)..self.row {
            let value = self.ab.cell(i, k).abs();
            if value > best {
                best = value;
                max_row = i;
            }
        }
        max_row
    }

    /// `row[target] -= times * row[source]`, snapping negligible results.
    fn subtract_row_multiple(&mut self, target: usize, source: usize, times: T) {
        let width = self.ab.cols;
        for n in 0..width {
            let value = self.ab.cells[target * width + n] - times * self.ab.cells[source * width + n];
            self.ab.cells[target * width + n] = self.tol.snap(value);
        }
    }

    /// Row-echelon reduction with partial pivoting.
    pub fn forward(&mut self) {
        self.pivots.clear();
        self.verdict = None;

        let width = self.ab.cols;
        let (mut i, mut k) = (0, 0);
        while i < self.row && k < self.col {
            let max_row = self.find_max_row(i, k);
            self.ab.swap_rows(i, max_row);

            let pivot = self.ab.cell(i, k);
            if self.tol.is_negligible(pivot) {
                trace!("no pivot in column {} at or below row {}", k, i);
                k += 1;
                continue;
            }
            trace!("pivot {} at ({}, {})", pivot, i, k);

            for cell in &mut self.ab.cells[i * width..(i + 1) * width] {
                *cell = self.tol.snap(*cell / pivot);
            }

            for m in (i + 1)..self.row {
                let times = self.ab.cell(m, k);
                self.subtract_row_multiple(m, i, times);
            }

            self.pivots.push(k);
            i += 1;
            k += 1;
        }
    }

    /// Clears every entry above a pivot, leaving reduced row-echelon form.
    pub fn backward(&mut self) {
        for idx in (1..self.pivots.len()).rev() {
            let m = self.pivots[idx];
            trace!("clearing column {} above row {}", m, idx);
            for j in (0..idx).rev() {
                let times = self.ab.cell(j, m);
                self.subtract_row_multiple(j, idx, times);
            }
        }
    }

    /// Runs both elimination passes and checks that every row without a
    /// pivot has a zero right-hand side.
    pub fn gauss_jordan_elimination(&mut self) -> Solvability {
        self.forward();
        self.backward();

        let rank = self.rank();
        let eps: T = self.tol.epsilon_as();
        let inconsistent = (rank..self.row)
            .any(|r| self.ab.row_slice(r)[self.col..].iter().any(|x| x.abs() > eps));

        let verdict = if inconsistent {
            Solvability::Inconsistent
        } else {
            Solvability::Consistent
        };
        debug!(
            "gauss-jordan elimination: rank {} of {}x{}, {:?}",
            rank, self.row, self.col, verdict
        );
        self.verdict = Some(verdict);
        verdict
    }

    /// Solution matrix `X` (`col` rows, one column per right-hand side).
    ///
    /// Row `pivots[r]` takes the right-hand side of buffer row `r`, variables
    /// without a pivot are zero. `None` unless the last elimination found the
    /// system consistent.
    pub fn matrix_solution(&self) -> Option<DenseMatrix<T>> {
        if self.verdict != Some(Solvability::Consistent) {
            return None;
        }
        let extra = self.extra;
        let mut x = DenseMatrix {
            rows: self.col,
            cols: extra,
            cells: vec![T::zero(); self.col * extra],
        };
        for (r, &c) in self.pivots.iter().enumerate() {
            x.cells[c * extra..(c + 1) * extra].copy_from_slice(&self.ab.row_slice(r)[self.col..]);
        }
        Some(x)
    }

    /// Solution for the first right-hand side.
    pub fn solution(&self) -> Option<Vector<T>> {
        let x = self.matrix_solution()?;
        Vector::new((0..self.col).map(|r| x.cell(r, 0)).collect()).ok()
    }

    /// Basis of the right kernel of the coefficient matrix, one column per
    /// free variable. `None` before elimination or when every column has a pivot.
    pub fn kernel(&self) -> Option<DenseMatrix<T>> {
        self.verdict?;

        let free_cols: Vec<usize> = (0..self.col)
            .filter(|c| !self.pivots.contains(c))
            .collect();
        if free_cols.is_empty() {
            return None;
        }

        let mut basis = DenseMatrix {
            rows: self.col,
            cols: free_cols.len(),
            cells: vec![T::zero(); self.col * free_cols.len()],
        };
        for (idx, &free_col) in free_cols.iter().enumerate() {
            basis.cells[free_col * basis.cols + idx] = T::one();
            for (r, &pivot_col) in self.pivots.iter().enumerate() {
                basis.cells[pivot_col * basis.cols + idx] = -self.ab.cell(r, free_col);
            }
        }
        Some(basis)
    }
}

impl<T: Scalar> fmt::Display for LinearSystem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "linear system:")?;
        let lines = (0..self.row).map(|r| {
            let line = self.ab.row_slice(r);
            format!(
                "{}|{}",
                line[..self.col].iter().join(","),
                line[self.col..].iter().join(",")
            )
        });
        write!(f, "{}", lines.format("\n"))
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn m(lines: &[&[f64]]) -> DenseMatrix<f64> {
        DenseMatrix::from_list(lines.iter().map(|l| l.to_vec()).collect()).unwrap()
    }

    fn v(values: &[f64]) -> Vector<f64> {
        Vector::new(values.to_vec()).unwrap()
    }

    #[test]
    fn test_unique_solution() {
        let a = m(&[&[1.0, 2.0, 4.0], &[3.0, 7.0, 2.0], &[2.0, 3.0, 3.0]]);
        let b = v(&[7.0, -11.0, 1.0]);
        let original = a.clone();

        let mut ls = LinearSystem::new(&a, &b).unwrap();
        assert_eq!(ls.solution(), None);
        assert_eq!(ls.gauss_jordan_elimination(), Solvability::Consistent);
        assert_eq!(ls.solvability(), Some(Solvability::Consistent));
        assert_eq!(ls.pivots(), &[0, 1, 2]);
        assert!(ls.is_reduced());
        assert_eq!(ls.kernel(), None);

        let x = ls.solution().unwrap();
        crate::assert_all_close!(x.clone().into_vec(), vec![-1.0, -2.0, 3.0]);
        crate::assert_all_close!(a.mul_vector(&x).unwrap().into_vec(), b.into_vec());
        assert_eq!(a, original);
    }

    #[test]
    fn test_overdetermined_without_solution() {
        let a = m(&[&[2.0, 2.0], &[2.0, 1.0], &[1.0, 2.0]]);
        let b = v(&[3.0, 2.5, 7.0]);

        let mut ls = LinearSystem::new(&a, &b).unwrap();
        assert_eq!(ls.gauss_jordan_elimination(), Solvability::Inconsistent);
        assert_eq!(ls.rank(), 2);
        assert_eq!(ls.solution(), None);
        assert_eq!(ls.matrix_solution(), None);
    }

    #[test]
    fn test_overdetermined_consistent() {
        let a = m(&[&[2.0, 2.0], &[2.0, 1.0], &[1.0, 2.0]]);
        let b = v(&[6.0, 4.0, 5.0]);

        let mut ls = LinearSystem::new(&a, &b).unwrap();
        assert_eq!(ls.gauss_jordan_elimination(), Solvability::Consistent);
        crate::assert_all_close!(ls.solution().unwrap().into_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_underdetermined() {
        let a = m(&[&[1.0, 2.0, 3.0], &[2.0, 4.0, 7.0]]);
        let b = v(&[1.0, 3.0]);

        let mut ls = LinearSystem::new(&a, &b).unwrap();
        assert_eq!(ls.gauss_jordan_elimination(), Solvability::Consistent);
        assert_eq!(ls.pivots(), &[0, 2]);

        let x = ls.solution().unwrap();
        crate::assert_all_close!(x.clone().into_vec(), vec![-2.0, 0.0, 1.0]);
        crate::assert_all_close!(a.mul_vector(&x).unwrap().into_vec(), b.into_vec());

        let kernel = ls.kernel().unwrap();
        assert_eq!(kernel.shape(), (3, 1));
        crate::assert_all_close!(kernel.to_list().concat(), vec![-2.0, 1.0, 0.0]);
        crate::assert_all_close!((&a * &kernel).unwrap().to_list().concat(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_one_by_one() {
        let mut ls = LinearSystem::new(&m(&[&[2.0]]), &v(&[3.0])).unwrap();
        assert_eq!(ls.gauss_jordan_elimination(), Solvability::Consistent);
        assert_eq!(ls.solution().unwrap().into_vec(), vec![1.5]);

        let mut ls = LinearSystem::new(&m(&[&[1e-9]]), &v(&[1.0])).unwrap();
        assert_eq!(ls.gauss_jordan_elimination(), Solvability::Inconsistent);
        assert_eq!(ls.rank(), 0);

        let mut ls = LinearSystem::new(&m(&[&[0.0]]), &v(&[0.0])).unwrap();
        assert_eq!(ls.gauss_jordan_elimination(), Solvability::Consistent);
        assert_eq!(ls.solution().unwrap().into_vec(), vec![0.0]);
        assert_eq!(ls.kernel().unwrap().to_list(), vec![vec![1.0]]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(
            LinearSystem::new(&a, &v(&[1.0, 2.0, 3.0])).unwrap_err(),
            LinalgError::DimensionMismatch {
                rows: 2,
                rhs_rows: 3
            }
        );
        assert!(LinearSystem::with_matrix_rhs(&a, &m(&[&[1.0]])).is_err());
    }

    #[test]
    fn test_partial_pivoting() {
        // A zero in the leading position forces a row swap.
        let a = m(&[&[0.0, 1.0], &[1.0, 1.0]]);
        let mut ls = LinearSystem::new(&a, &v(&[2.0, 3.0])).unwrap();
        ls.forward();
        assert_eq!(ls.pivots(), &[0, 1]);
        assert_eq!(ls.augmented().row_slice(0), &[1.0, 1.0, 3.0]);

        // The largest magnitude wins, not the first non-zero.
        let a = m(&[&[1.0, 0.0], &[-4.0, 1.0], &[2.0, 1.0]]);
        let mut ls = LinearSystem::new(&a, &v(&[0.0, 0.0, 0.0])).unwrap();
        ls.forward();
        assert_eq!(ls.augmented().row_slice(0), &[1.0, -0.25, 0.0]);
    }

    #[test]
    fn test_pivot_tie_keeps_lowest_row() {
        let a = m(&[&[1.0, 0.0], &[-1.0, 1.0]]);
        let mut ls = LinearSystem::new(&a, &v(&[0.0, 0.0])).unwrap();
        ls.forward();
        assert_eq!(ls.pivots(), &[0, 1]);
        assert_eq!(ls.augmented().row_slice(0), &[1.0, 0.0, 0.0]);
        assert_eq!(ls.augmented().row_slice(1), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_zero_pivot_at_smallest_tolerance() {
        let a = m(&[&[1.0, 1.0], &[2.0, 2.0]]);
        let tol = Tolerance::new(f64::MIN_POSITIVE).unwrap();
        let mut ls = LinearSystem::new(&a, &v(&[1.0, 3.0])).unwrap().with_tolerance(tol);
        assert_eq!(ls.gauss_jordan_elimination(), Solvability::Inconsistent);
        assert_eq!(ls.pivots(), &[0]);
        assert!(ls.augmented().cells.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_rank_deficient_column_is_skipped() {
        let a = m(&[&[1.0, 2.0, 1.0], &[2.0, 4.0, 3.0], &[3.0, 6.0, 4.0]]);
        let mut ls = LinearSystem::new(&a, &v(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(ls.gauss_jordan_elimination(), Solvability::Consistent);
        assert_eq!(ls.pivots(), &[0, 2]);
        assert!(ls.is_reduced());
    }

    #[test]
    fn test_reduced_form_is_fixed_point() {
        let a = m(&[&[1.0, 2.0, 4.0], &[3.0, 7.0, 2.0], &[2.0, 3.0, 3.0]]);
        let mut ls = LinearSystem::new(&a, &v(&[7.0, -11.0, 1.0])).unwrap();
        ls.gauss_jordan_elimination();
        let reduced = ls.augmented().clone();
        let pivots = ls.pivots().to_vec();

        for _ in 0..2 {
            ls.forward();
            ls.backward();
            assert_eq!(ls.augmented(), &reduced);
            assert_eq!(ls.pivots(), &pivots[..]);
        }
    }

    #[test]
    fn test_multiple_right_hand_sides() {
        let a = m(&[&[2.0, 1.0], &[1.0, 3.0]]);
        let rhs = m(&[&[3.0, 1.0], &[4.0, 2.0]]);

        let mut ls = LinearSystem::with_matrix_rhs(&a, &rhs).unwrap();
        assert_eq!(ls.gauss_jordan_elimination(), Solvability::Consistent);

        let x = ls.matrix_solution().unwrap();
        assert_eq!(x.shape(), (2, 2));
        crate::assert_all_close!((&a * &x).unwrap().to_list().concat(), rhs.to_list().concat());
        crate::assert_all_close!(ls.solution().unwrap().into_vec(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_custom_tolerance() {
        // 1e-9 is a usable pivot once epsilon is lowered.
        let a = m(&[&[1e-9]]);
        let tol = Tolerance::new(1e-12).unwrap();
        let mut ls = LinearSystem::new(&a, &v(&[1e-9])).unwrap().with_tolerance(tol);
        assert_eq!(ls.tolerance(), &tol);
        assert_eq!(ls.gauss_jordan_elimination(), Solvability::Consistent);
        crate::assert_all_close!(ls.solution().unwrap().into_vec(), vec![1.0]);
    }

    #[test]
    fn test_random_systems() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let n: usize = rng.gen_range(1..8);
            let a: DenseMatrix<f64> = DenseMatrix::from_list(
                (0..n)
                    .map(|_| (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect())
                    .collect(),
            )
            .unwrap();
            let b: Vector<f64> =
                Vector::new((0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()).unwrap();

            let mut ls = LinearSystem::new(&a, &b).unwrap();
            if ls.gauss_jordan_elimination() == Solvability::Inconsistent {
                // singular random uniform? now that's what I call bad luck
                continue;
            }
            let x = ls.solution().unwrap();
            crate::assert_all_close!(
                abs = 1e-6,
                a.mul_vector(&x).unwrap().into_vec(),
                b.into_vec()
            );
            assert!(ls.is_reduced());
        }
    }

    #[test]
    fn test_display() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let ls = LinearSystem::new(&a, &v(&[5.0, 6.0])).unwrap();
        assert_eq!(ls.to_string(), "linear system:\n1,2|5\n3,4|6");

        let ls = LinearSystem::with_matrix_rhs(&a, &DenseMatrix::identity(2).unwrap()).unwrap();
        assert_eq!(ls.to_string(), "linear system:\n1,2|1,0\n3,4|0,1");
    }
}
