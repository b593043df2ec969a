use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::{Dataset, DatasetError};
use std::ops::Range;

/// Row-oriented dataset held entirely in memory.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    x: Vec<Vec<f64>>,
    y: Vec<f64>,
    n_features: usize,
}

impl InMemoryDataset {
    pub fn new(x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self, DatasetError> {
        if x.len() != y.len() {
            return Err(DatasetError::LengthMismatch {
                x_rows: x.len(),
                y_len: y.len(),
            });
        }
        let n_features = x.first().ok_or(DatasetError::Empty)?.len();
        if let Some((row, r)) = x.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(DatasetError::RaggedRow {
                row,
                expected: n_features,
                got: r.len(),
            });
        }
        Ok(Self { x, y, n_features })
    }

    /// Builds a dataset from an assembled feature matrix and its targets.
    pub fn from_tensors<B: Backend>(x: &Tensor2D<B>, y: &[f64]) -> Result<Self, DatasetError> {
        Self::new(x.to_rows(), y.to_vec())
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

impl Dataset for InMemoryDataset {
    type Error = DatasetError;

    fn len(&self) -> Option<usize> {
        Some(self.x.len())
    }

    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        if range.end > self.x.len() || range.start > range.end {
            return Err(DatasetError::OutOfBounds {
                start: range.start,
                end: range.end,
                len: self.x.len(),
            });
        }
        let batch_x = &self.x[range.clone()];
        let data = batch_x.iter().flat_map(|row| row.iter()).copied().collect();
        let x_tensor = Tensor2D::<B>::new(data, batch_x.len(), self.n_features);
        let y_tensor = Tensor1D::<B>::new(self.y[range].to_vec());
        Ok((x_tensor, y_tensor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(
            InMemoryDataset::new(vec![], vec![]).unwrap_err(),
            DatasetError::Empty
        );
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = InMemoryDataset::new(vec![vec![1.0]], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, DatasetError::LengthMismatch { x_rows: 1, y_len: 2 });
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let err = InMemoryDataset::new(vec![vec![1.0, 2.0], vec![3.0]], vec![0.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, DatasetError::RaggedRow { row: 1, .. }));
    }

    #[test]
    fn test_get_batch_and_out_of_bounds() {
        let ds = InMemoryDataset::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]], vec![5.0, 6.0])
            .unwrap();
        let (x, y) = ds.get_batch::<CpuBackend>(1..2).unwrap();
        assert_eq!(x.to_vec(), vec![3.0, 4.0]);
        assert_eq!(y.to_vec(), vec![6.0]);
        assert!(ds.get_batch::<CpuBackend>(1..3).is_err());
    }

    #[test]
    fn test_from_tensors() {
        let x = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let ds = InMemoryDataset::from_tensors(&x, &[0.5, 1.5]).unwrap();
        assert_eq!(ds.len(), Some(2));
        assert_eq!(ds.n_features(), 2);
    }
}
