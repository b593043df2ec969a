//! Dataset abstractions for mini-batch training.
//!
//! A [`Dataset`] is a source of `(X, y)` pairs where `X` is a feature matrix
//! of shape `(n_samples, n_features)` and `y` is a target vector of shape
//! `(n_samples,)`. [`DatasetBatchIter`] walks it in contiguous batches.
//!
//! ```rust
//! use taxifare::backend::CpuBackend;
//! use taxifare::dataset::{Dataset, InMemoryDataset};
//!
//! let x = vec![vec![1.0], vec![2.0], vec![3.0]];
//! let y = vec![2.0, 4.0, 6.0];
//! let dataset = InMemoryDataset::new(x, y).unwrap();
//!
//! let sizes: Vec<usize> = dataset
//!     .batches::<CpuBackend>(2)
//!     .map(|b| b.unwrap().0.rows())
//!     .collect();
//! assert_eq!(sizes, vec![2, 1]);
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use std::{fmt::Debug, marker::PhantomData, ops::Range};
use thiserror::Error;

pub mod memory;
pub use self::memory::InMemoryDataset;

/// Errors raised while building or reading a dataset.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("dataset is empty")]
    Empty,
    #[error("x has {x_rows} rows but y has {y_len} values")]
    LengthMismatch { x_rows: usize, y_len: usize },
    #[error("row {row} has {got} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("batch range {start}..{end} out of bounds for {len} samples")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Total number of samples, `None` when unknown.
    fn len(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Iterator over consecutive batches of `batch_size` samples (the last
    /// batch may be smaller).
    fn batches<B: Backend>(&self, batch_size: usize) -> DatasetBatchIter<'_, B, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size,
            current: 0,
            _backend: PhantomData,
        }
    }

    /// Materialises the samples in `range` as backend tensors.
    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error>;
}

/// Iterator over dataset batches, created by [`Dataset::batches`].
pub struct DatasetBatchIter<'a, B: Backend, D> {
    dataset: &'a D,
    batch_size: usize,
    current: usize,
    _backend: PhantomData<B>,
}

impl<'a, B: Backend, D: Dataset> Iterator for DatasetBatchIter<'a, B, D> {
    type Item = Result<(Tensor2D<B>, Tensor1D<B>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len()?;
        if self.current >= total || self.batch_size == 0 {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch::<B>(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    struct MockDataset {
        len: usize,
    }

    impl Dataset for MockDataset {
        type Error = DatasetError;

        fn len(&self) -> Option<usize> {
            Some(self.len)
        }

        fn get_batch<B: Backend>(
            &self,
            range: Range<usize>,
        ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
            if range.end > self.len {
                return Err(DatasetError::OutOfBounds {
                    start: range.start,
                    end: range.end,
                    len: self.len,
                });
            }
            let n = range.len();
            let x_data: Vec<f64> = (0..n * 2).map(|i| (range.start * 2 + i) as f64).collect();
            let y_data: Vec<f64> = range.map(|i| i as f64).collect();
            Ok((Tensor2D::new(x_data, n, 2), Tensor1D::new(y_data)))
        }
    }

    #[test]
    fn test_dataset_is_empty() {
        assert!(MockDataset { len: 0 }.is_empty());
        assert!(!MockDataset { len: 1 }.is_empty());
    }

    #[test]
    fn test_batches_full() {
        let dataset = MockDataset { len: 6 };
        let mut iter = dataset.batches::<CpuBackend>(2);
        for i in 0..3 {
            let (x, y) = iter.next().unwrap().unwrap();
            assert_eq!(x.shape(), (2, 2));
            assert_eq!(y.to_vec(), vec![i as f64 * 2.0, i as f64 * 2.0 + 1.0]);
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_batches_partial_last() {
        let dataset = MockDataset { len: 5 };
        let shapes: Vec<_> = dataset
            .batches::<CpuBackend>(2)
            .map(|b| b.unwrap().0.shape())
            .collect();
        assert_eq!(shapes, vec![(2, 2), (2, 2), (1, 2)]);
    }

    #[test]
    fn test_batches_zero_batch_size_yields_nothing() {
        let dataset = MockDataset { len: 3 };
        assert!(dataset.batches::<CpuBackend>(0).next().is_none());
    }
}
