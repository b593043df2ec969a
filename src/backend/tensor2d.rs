use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use crate::preprocessing::PreprocessingError;
use std::marker::PhantomData;

/// Backend-typed row-major matrix.
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> std::fmt::Debug for Tensor2D<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor2D")
            .field("shape", &self.shape())
            .field("data", &self.to_vec())
            .finish()
    }
}

impl<B: Backend> Tensor2D<B> {
    /// Builds a `rows × cols` matrix from row-major data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        Self {
            data: B::from_vec_2d(data, rows, cols),
            backend: PhantomData,
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: B::zeros_2d(rows, cols),
            backend: PhantomData,
        }
    }

    /// Builds a single-column matrix.
    pub fn from_column(values: Vec<f64>) -> Self {
        let rows = values.len();
        Self::new(values, rows, 1)
    }

    /// Matrix-vector product `self · other`.
    pub fn dot(&self, other: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D {
            data: B::matvec(&self.data, &other.data),
            backend: PhantomData,
        }
    }

    /// Transposed matrix-vector product `selfᵀ · other`.
    pub fn tdot(&self, other: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D {
            data: B::matvec_transposed(&self.data, &other.data),
            backend: PhantomData,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    pub fn rows(&self) -> usize {
        self.shape().0
    }

    pub fn cols(&self) -> usize {
        self.shape().1
    }

    /// Row-major copy of the matrix.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_2d(&self.data)
    }

    /// Copies the matrix out as one `Vec` per row.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        let (rows, cols) = self.shape();
        if cols == 0 {
            return vec![Vec::new(); rows];
        }
        self.to_vec().chunks(cols).map(|r| r.to_vec()).collect()
    }

    pub fn col_mean(&self) -> Tensor1D<B> {
        Tensor1D {
            data: B::col_mean_2d(&self.data),
            backend: PhantomData,
        }
    }

    pub fn col_std(&self, ddof: usize) -> Tensor1D<B> {
        Tensor1D {
            data: B::col_std_2d(&self.data, ddof),
            backend: PhantomData,
        }
    }

    /// Subtracts `v` from every row.
    pub fn sub_row(&self, v: &Tensor1D<B>) -> Self {
        Self {
            data: B::broadcast_sub_1d_to_2d_rows(&self.data, &v.data),
            backend: PhantomData,
        }
    }

    /// Divides every row element-wise by `v`.
    pub fn div_row(&self, v: &Tensor1D<B>) -> Self {
        Self {
            data: B::broadcast_div_1d_to_2d_rows(&self.data, &v.data),
            backend: PhantomData,
        }
    }

    /// Stacks matrices side by side.
    pub fn hcat(blocks: &[Self]) -> Result<Self, PreprocessingError> {
        let raw: Vec<B::Tensor2D> = blocks.iter().map(|b| b.data.clone()).collect();
        Ok(Self {
            data: B::hcat_2d(&raw)?,
            backend: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_tensor2d_dot_and_tdot() {
        let m = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let v = Tensor1D::<CpuBackend>::new(vec![1.0, 1.0]);
        assert_eq!(m.dot(&v).to_vec(), vec![3.0, 7.0]);
        assert_eq!(m.tdot(&v).to_vec(), vec![4.0, 6.0]);
    }

    #[test]
    fn test_tensor2d_to_rows() {
        let m = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        assert_eq!(
            m.to_rows(),
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]
        );
        assert_eq!(Tensor2D::<CpuBackend>::zeros(2, 0).to_rows().len(), 2);
    }

    #[test]
    fn test_tensor2d_hcat() {
        let a = Tensor2D::<CpuBackend>::from_column(vec![1.0, 2.0]);
        let b = Tensor2D::<CpuBackend>::new(vec![3.0, 4.0, 5.0, 6.0], 2, 2);
        let c = Tensor2D::hcat(&[a, b]).unwrap();
        assert_eq!(c.shape(), (2, 3));
        assert_eq!(c.to_vec(), vec![1.0, 3.0, 4.0, 2.0, 5.0, 6.0]);
    }

    #[test]
    fn test_tensor2d_standardize_rows() {
        let m = Tensor2D::<CpuBackend>::new(vec![1.0, 4.0, 3.0, 8.0], 2, 2);
        let mean = m.col_mean();
        let std = m.col_std(0);
        let z = m.sub_row(&mean).div_row(&std);
        assert_eq!(z.to_vec(), vec![-1.0, -1.0, 1.0, 1.0]);
    }
}
