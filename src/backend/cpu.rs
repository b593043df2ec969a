use super::Backend;
use crate::preprocessing::PreprocessingError;

#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major matrix: (data, rows, cols).
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }
}

impl From<&[Vec<f64>]> for CpuTensor2D {
    fn from(x: &[Vec<f64>]) -> Self {
        if x.is_empty() {
            return CpuTensor2D::new(Vec::new(), 0, 0);
        }
        let rows = x.len();
        let cols = x[0].len();
        assert!(
            x.iter().all(|row| row.len() == cols),
            "All rows must have same length"
        );
        let data: Vec<f64> = x.iter().flat_map(|row| row.iter()).copied().collect();
        CpuTensor2D::new(data, rows, cols)
    }
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    // --- Constructors ---
    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(vec![0.; rows * cols], rows, cols)
    }
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data, rows, cols)
    }

    // --- Element-wise ops ---
    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a + b).collect()
    }
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a - b).collect()
    }
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a * b).collect()
    }
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x * s).collect()
    }
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x + s).collect()
    }

    // --- Reductions ---
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>() / t.len() as f64
    }
    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>()
    }
    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    // --- Access ---
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.clone()
    }
    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }
    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }

    fn matvec(a: &CpuTensor2D, x: &Vec<f64>) -> Vec<f64> {
        let CpuTensor2D(data, rows, cols) = a;
        assert_eq!(*cols, x.len(), "matvec: A.cols() != x.len()");
        let mut result = Vec::with_capacity(*rows);
        for i in 0..*rows {
            let row = &data[i * cols..(i + 1) * cols];
            result.push(row.iter().zip(x).map(|(a, b)| a * b).sum());
        }
        result
    }

    fn matvec_transposed(a: &CpuTensor2D, x: &Vec<f64>) -> Vec<f64> {
        let CpuTensor2D(data, rows, cols) = a;
        assert_eq!(*rows, x.len(), "matvec_transposed: A.rows() != x.len()");
        let mut result = vec![0.0; *cols];
        for (i, xi) in x.iter().enumerate() {
            let row = &data[i * cols..(i + 1) * cols];
            for (acc, v) in result.iter_mut().zip(row) {
                *acc += v * xi;
            }
        }
        result
    }

    // --- Column-wise ---
    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        let CpuTensor2D(data, rows, cols) = t;
        if *rows == 0 || *cols == 0 {
            return vec![0.0; *cols];
        }
        let mut sums = vec![0.0; *cols];
        for row in data.chunks(*cols) {
            for (s, v) in sums.iter_mut().zip(row) {
                *s += v;
            }
        }
        sums.into_iter().map(|s| s / *rows as f64).collect()
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        let CpuTensor2D(data, rows, cols) = t;
        if *rows <= ddof || *cols == 0 {
            return vec![0.0; *cols];
        }
        let means = Self::col_mean_2d(t);
        let mut var_sums = vec![0.0; *cols];
        for row in data.chunks(*cols) {
            for ((acc, v), m) in var_sums.iter_mut().zip(row).zip(&means) {
                let diff = v - m;
                *acc += diff * diff;
            }
        }
        let divisor = (*rows - ddof) as f64;
        var_sums.into_iter().map(|s| (s / divisor).sqrt()).collect()
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        assert_eq!(t.2, v.len(), "broadcast: cols != v.len()");
        let data = t
            .0
            .chunks(t.2.max(1))
            .flat_map(|row| row.iter().zip(v).map(|(a, b)| a - b))
            .collect();
        CpuTensor2D::new(data, t.1, t.2)
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        assert_eq!(t.2, v.len(), "broadcast: cols != v.len()");
        let data = t
            .0
            .chunks(t.2.max(1))
            .flat_map(|row| row.iter().zip(v).map(|(a, b)| a / b))
            .collect();
        CpuTensor2D::new(data, t.1, t.2)
    }

    fn hcat_2d(tensors: &[Self::Tensor2D]) -> Result<Self::Tensor2D, PreprocessingError> {
        let first = tensors.first().ok_or_else(|| {
            PreprocessingError::InvalidParameter(
                "Cannot horizontally concatenate empty slice of tensors".to_string(),
            )
        })?;
        let rows = first.1;
        if let Some(bad) = tensors.iter().find(|t| t.1 != rows) {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("({}, ?)", rows),
                got: format!("({}, ?)", bad.1),
            });
        }

        let total_cols: usize = tensors.iter().map(|t| t.2).sum();
        let mut data = Vec::with_capacity(rows * total_cols);
        for r in 0..rows {
            for t in tensors {
                data.extend_from_slice(&t.0[r * t.2..(r + 1) * t.2]);
            }
        }
        Ok(CpuTensor2D::new(data, rows, total_cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor2d_from(data: &[Vec<f64>]) -> CpuTensor2D {
        CpuTensor2D::from(data)
    }

    #[test]
    fn test_matvec() {
        let a = tensor2d_from(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(CpuBackend::matvec(&a, &vec![1.0, 1.0]), vec![3.0, 7.0]);
    }

    #[test]
    fn test_matvec_transposed() {
        let a = tensor2d_from(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let r = CpuBackend::matvec_transposed(&a, &vec![1.0, 0.0, 1.0]);
        assert_eq!(r, vec![6.0, 8.0]);
    }

    #[test]
    fn test_col_mean_and_std() {
        let t = tensor2d_from(&[vec![1.0, 10.0], vec![3.0, 10.0]]);
        assert_eq!(CpuBackend::col_mean_2d(&t), vec![2.0, 10.0]);
        assert_eq!(CpuBackend::col_std_2d(&t, 0), vec![1.0, 0.0]);
    }

    #[test]
    fn test_col_std_single_row_with_ddof() {
        let t = tensor2d_from(&[vec![4.0]]);
        assert_eq!(CpuBackend::col_std_2d(&t, 1), vec![0.0]);
    }

    #[test]
    fn test_broadcast_sub_div() {
        let t = tensor2d_from(&[vec![2.0, 4.0], vec![6.0, 8.0]]);
        let sub = CpuBackend::broadcast_sub_1d_to_2d_rows(&t, &vec![2.0, 4.0]);
        assert_eq!(sub.0, vec![0.0, 0.0, 4.0, 4.0]);
        let div = CpuBackend::broadcast_div_1d_to_2d_rows(&t, &vec![2.0, 4.0]);
        assert_eq!(div.0, vec![1.0, 1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_hcat_2d_basic() {
        let a = tensor2d_from(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = tensor2d_from(&[vec![5.0], vec![6.0]]);
        let c = CpuBackend::hcat_2d(&[a, b]).unwrap();
        assert_eq!(CpuBackend::shape(&c), (2, 3));
        assert_eq!(c.0, vec![1.0, 2.0, 5.0, 3.0, 4.0, 6.0]);
    }

    #[test]
    fn test_hcat_2d_empty() {
        assert!(CpuBackend::hcat_2d(&[]).is_err());
    }

    #[test]
    fn test_hcat_2d_row_mismatch() {
        let a = tensor2d_from(&[vec![1.0], vec![2.0]]);
        let b = tensor2d_from(&[vec![3.0]]);
        let err = CpuBackend::hcat_2d(&[a, b]).unwrap_err();
        assert!(matches!(err, PreprocessingError::InvalidShape { .. }));
    }

    #[test]
    #[should_panic(expected = "Inconsistent shape")]
    fn test_new_inconsistent_shape() {
        CpuTensor2D::new(vec![1.0, 2.0, 3.0], 2, 2);
    }
}
