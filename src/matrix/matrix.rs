use crate::error::LinalgResult;

/// Shape and element access shared by the dense containers.
pub trait Matrix<T>
where
    Self: Sized,
{
    fn from_list(lines: Vec<Vec<T>>) -> LinalgResult<Self>;
    fn to_list(&self) -> Vec<Vec<T>>;

    fn zero(rows: usize, cols: usize) -> LinalgResult<Self>;
    fn identity(n: usize) -> LinalgResult<Self>;
    fn transpose(&self) -> Self;

    /// `(rows, cols)`
    fn shape(&self) -> (usize, usize);
    fn at(&self, row: usize, col: usize) -> LinalgResult<T>;
    fn set(&mut self, row: usize, col: usize, value: T) -> LinalgResult<()>;

    fn row_num(&self) -> usize {
        self.shape().0
    }

    fn col_num(&self) -> usize {
        self.shape().1
    }

    fn size(&self) -> usize {
        let (rows, cols) = self.shape();
        rows * cols
    }

    fn is_square(&self) -> bool {
        let (rows, cols) = self.shape();
        rows == cols
    }
}

/// Multiplication of every element by a scalar.
pub trait Scale<T> {
    fn scale(&self, k: T) -> Self;
}

/// `k * buffer`, the scalar-on-the-left spelling of [`Scale::scale`].
pub fn scale<T, B: Scale<T>>(k: T, buffer: &B) -> B {
    buffer.scale(k)
}
