//! Categorical feature encoding.
//!
//! ## OneHotEncoder
//! Converts integer-coded categories to one-hot (dummy) columns.
//!
//! ```ignore
//! // Input: [[0], [1], [2]]  (3 samples, 1 categorical feature)
//! // Output: [[1,0,0], [0,1,0], [0,0,1]]
//! ```
//!
//! Categories arrive already mapped to non-negative integers stored as
//! `f64`; the time features (hour, day of week, month, year) are of this
//! form.

mod one_hot;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HandleUnknown {
    /// Fail with [`PreprocessingError::UnknownCategory`](crate::preprocessing::PreprocessingError::UnknownCategory).
    #[default]
    Error,
    /// Encode an unseen category as all zeros in its block.
    Ignore,
}
