//! Data preprocessing transformers.
//!
//! Transformers follow the same two-phase pattern as models: an unfitted
//! value holds hyperparameters, `fit` returns a separate fitted value, and
//! the fitted value's `transform` is pure.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//! - [`FeatureDeriver`]: Stateless row-wise derivation, no fit step
//!
//! # Available Transformers
//!
//! - [`StandardScaler`]: Z-score normalization
//! - [`OneHotEncoder`]: indicator columns for integer categories
//! - [`ColumnTransformer`]: named deriver → transformer branches over trip rows
//!
//! # Example
//!
//! ```ignore
//! use taxifare::preprocessing::{
//!     ColumnTransformer, FittedColumnTransformer, FittedTransformer, Transformer,
//! };
//! use taxifare::backend::CpuBackend;
//!
//! let fitted = ColumnTransformer::<CpuBackend>::fare_default(0).fit(&train_trips)?;
//! let x_train = fitted.transform(&train_trips)?;
//! fitted.save_to_file("assembler.bin")?;
//!
//! let loaded = FittedColumnTransformer::<CpuBackend>::load_from_file("assembler.bin")?;
//! let x_test = loaded.transform(&test_trips)?;
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod error;
pub mod scaling;
pub mod traits;

pub use column_transformer::{
    BranchParams, ColumnTransformer, ColumnTransformerParams, ColumnTransformerStep, Deriver,
    FittedColumnTransformer, FittedColumnTransformerStep, StepParams,
};
pub use encoding::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderParams};
pub use error::PreprocessingError;
pub use scaling::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
pub use traits::{FeatureDeriver, FittedTransformer, Transformer};
