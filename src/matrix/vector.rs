use crate::error::{LinalgError, LinalgResult};
use crate::matrix::element::{as_f64, Scalar};
use crate::matrix::matrix::Scale;
use crate::tolerance::Tolerance;
use crate::utils::snapped_dot;
use itertools::Itertools;
use std::fmt;
use std::iter::zip;
use std::ops;

/// Fixed-length, non-empty sequence of scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    values: Vec<T>,
}

impl<T: Scalar> Vector<T> {
    pub fn new(values: Vec<T>) -> LinalgResult<Self> {
        if values.is_empty() {
            return Err(LinalgError::InvalidShape {
                reason: "vector must have at least one element".into(),
            });
        }
        Ok(Vector { values })
    }

    pub fn zero(dim: usize) -> LinalgResult<Self> {
        Vector::new(vec![T::zero(); dim])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    // Construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn at(&self, index: usize) -> LinalgResult<T> {
        self.values
            .get(index)
            .copied()
            .ok_or(LinalgError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    pub fn set(&mut self, index: usize, value: T) -> LinalgResult<()> {
        let len = self.len();
        let cell = self
            .values
            .get_mut(index)
            .ok_or(LinalgError::IndexOutOfRange { index, len })?;
        *cell = value;
        Ok(())
    }

    fn check_same_len(&self, rhs: &Vector<T>) -> LinalgResult<()> {
        if self.len() != rhs.len() {
            return Err(LinalgError::ShapeMismatch {
                lhs: (self.len(), 1),
                rhs: (rhs.len(), 1),
            });
        }
        Ok(())
    }

    fn zip_with(&self, rhs: &Vector<T>, op: impl Fn(T, T) -> T) -> LinalgResult<Vector<T>> {
        self.check_same_len(rhs)?;
        Ok(Vector {
            values: zip(&self.values, &rhs.values)
                .map(|(a, b)| op(*a, *b))
                .collect(),
        })
    }

    pub fn add(&self, rhs: &Vector<T>) -> LinalgResult<Vector<T>> {
        self.zip_with(rhs, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Vector<T>) -> LinalgResult<Vector<T>> {
        self.zip_with(rhs, |a, b| a - b)
    }

    pub fn negate(&self) -> Vector<T> {
        Vector {
            values: self.values.iter().map(|x| -*x).collect(),
        }
    }

    pub fn divide(&self, k: T) -> LinalgResult<Vector<T>> {
        self.divide_with(k, &Tolerance::default())
    }

    pub fn divide_with(&self, k: T, tol: &Tolerance) -> LinalgResult<Vector<T>> {
        if !(k.abs() > tol.epsilon_as()) {
            return Err(LinalgError::DivisionByZero {
                divisor: as_f64(k),
                epsilon: tol.epsilon,
            });
        }
        Ok(self.scale(T::one() / k))
    }

    pub fn dot(&self, rhs: &Vector<T>) -> LinalgResult<T> {
        self.dot_with(rhs, &Tolerance::default())
    }

    pub fn dot_with(&self, rhs: &Vector<T>, tol: &Tolerance) -> LinalgResult<T> {
        self.check_same_len(rhs)?;
        Ok(snapped_dot(&self.values, &rhs.values, tol))
    }

    /// Euclidean norm.
    pub fn norm(&self) -> T {
        self.values.iter().map(|x| *x * *x).sum::<T>().sqrt()
    }

    pub fn normalize(&self) -> LinalgResult<Vector<T>> {
        self.normalize_with(&Tolerance::default())
    }

    /// Unit vector in the same direction.
    pub fn normalize_with(&self, tol: &Tolerance) -> LinalgResult<Vector<T>> {
        let norm = self.norm();
        if norm < tol.epsilon_as() {
            return Err(LinalgError::ZeroNorm {
                norm: as_f64(norm),
                epsilon: tol.epsilon,
            });
        }
        Ok(self.scale(T::one() / norm))
    }
}

impl<T: Scalar> Scale<T> for Vector<T> {
    fn scale(&self, k: T) -> Vector<T> {
        Vector {
            values: self.values.iter().map(|x| *x * k).collect(),
        }
    }
}

impl<T: Scalar> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.values.iter().join(","))
    }
}

impl<T: Scalar> ops::Add<&Vector<T>> for &Vector<T> {
    type Output = LinalgResult<Vector<T>>;

    fn add(self, rhs: &Vector<T>) -> LinalgResult<Vector<T>> {
        Vector::add(self, rhs)
    }
}

impl<T: Scalar> ops::Sub<&Vector<T>> for &Vector<T> {
    type Output = LinalgResult<Vector<T>>;

    fn sub(self, rhs: &Vector<T>) -> LinalgResult<Vector<T>> {
        Vector::sub(self, rhs)
    }
}

impl<T: Scalar> ops::Mul<T> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, k: T) -> Vector<T> {
        self.scale(k)
    }
}

impl<T: Scalar> ops::Neg for &Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        self.negate()
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::matrix::scale;

    fn v(values: &[f64]) -> Vector<f64> {
        Vector::new(values.to_vec()).unwrap()
    }

    #[test]
    fn test_vector_construction() {
        assert!(matches!(
            Vector::<f64>::new(vec![]),
            Err(LinalgError::InvalidShape { .. })
        ));
        assert_eq!(Vector::<f64>::zero(3).unwrap().into_vec(), vec![0.0; 3]);
        assert!(Vector::<f64>::zero(0).is_err());

        let mut a = v(&[5.0, 2.0]);
        assert_eq!(a.len(), 2);
        assert_eq!(a.at(1), Ok(2.0));
        assert_eq!(
            a.at(2),
            Err(LinalgError::IndexOutOfRange { index: 2, len: 2 })
        );
        a.set(0, -1.0).unwrap();
        assert_eq!(a.as_slice(), &[-1.0, 2.0]);
        assert!(a.set(7, 0.0).is_err());
    }

    #[test]
    fn test_vector_arithmetic() {
        let a = v(&[5.0, 2.0]);
        let b = v(&[2.0, 1.0]);

        assert_eq!((&a + &b).unwrap(), v(&[7.0, 3.0]));
        assert_eq!((&a - &b).unwrap(), v(&[3.0, 1.0]));
        assert_eq!(&a * 3.0, v(&[15.0, 6.0]));
        assert_eq!(scale(3.0, &a), a.scale(3.0));
        assert_eq!(-&a, v(&[-5.0, -2.0]));
        assert_eq!(a.divide(2.0).unwrap(), v(&[2.5, 1.0]));
        assert_eq!(a.dot(&b), Ok(12.0));

        let c = v(&[1.0, 2.0, 3.0]);
        assert_eq!(
            a.add(&c),
            Err(LinalgError::ShapeMismatch {
                lhs: (2, 1),
                rhs: (3, 1)
            })
        );
        assert!(a.dot(&c).is_err());
    }

    #[test]
    fn test_vector_division_by_zero() {
        let a = v(&[1.0, 1.0]);
        assert!(matches!(
            a.divide(1e-9),
            Err(LinalgError::DivisionByZero { .. })
        ));
        assert!(a.divide(0.0).is_err());

        let loose = Tolerance::new(1e-12).unwrap();
        crate::assert_all_close!(
            abs = 1e-3,
            a.divide_with(1e-9, &loose).unwrap().into_vec(),
            vec![1e9, 1e9]
        );
    }

    #[test]
    fn test_vector_norm() {
        let a = v(&[3.0, 4.0]);
        assert_eq!(a.norm(), 5.0);
        crate::assert_all_close!(a.normalize().unwrap().into_vec(), vec![0.6, 0.8]);
        assert_eq!(Vector::<f64>::zero(4).unwrap().norm(), 0.0);

        assert!(matches!(
            Vector::<f64>::zero(2).unwrap().normalize(),
            Err(LinalgError::ZeroNorm { .. })
        ));
    }

    #[test]
    fn test_vector_display() {
        assert_eq!(v(&[1.0, -2.5, 3.0]).to_string(), "(1,-2.5,3)");
        assert_eq!(v(&[4.0]).to_string(), "(4)");
    }
}
