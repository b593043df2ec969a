//! Scaling transformers for feature normalization.
//!
//! | Transformer | Description |
//! |-------------|-------------|
//! | [`StandardScaler`] | Z-score normalization (mean=0, std=1) |
//!
//! ```ignore
//! use taxifare::preprocessing::scaling::StandardScaler;
//! use taxifare::preprocessing::Transformer;
//! use taxifare::backend::CpuBackend;
//!
//! let fitted = StandardScaler::<CpuBackend>::new().fit(&train_distances)?;
//! let scaled = fitted.transform(&test_distances)?;
//! ```

pub mod standard;

pub use standard::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
