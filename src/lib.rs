//! # taxifare
//!
//! Trains a taxi fare regression model from historical trip records.
//!
//! ## Pipeline
//!
//! raw CSV → [`data::load_trips`] → [`data::clean_trips`] →
//! [`data::split_target`] → [`trainer::FareTrainer`], which splits the rows
//! 85/15, fits the feature assembler and a linear model on the training
//! split, persists the [`pipeline::FarePipeline`] and reports the held-out
//! RMSE.
//!
//! ## Core Design Principles
//!
//! - **Two-phase transformers**: `fit` returns a separate, immutable fitted
//!   value; `transform` never changes learned statistics. Nothing fit on the
//!   training split can be refit by transforming the test split.
//! - **Stateful Type Safety**: models carry their training state in the type
//!   system (`Unfitted` vs `Fitted`).
//! - **Backend Agnosticism**: numeric code is generic over [`backend::Backend`]
//!   (`CpuBackend`, or `NdarrayBackend` with the `ndarray` feature).
//!
//! ## Quick Start
//!
//! ```no_run
//! use taxifare::config::Config;
//! use taxifare::trainer::fare::train_from_config;
//!
//! let config = Config::from_file_or_default("taxifare.toml")?;
//! let report = train_from_config(&config)?;
//! println!("rmse: {}", report.rmse);
//! # Ok::<(), taxifare::error::TaxiFareError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: Tensor abstractions and computation primitives
//! - `data`: CSV loading, cleaning, target separation, train/test split
//! - `features`: Haversine distance and calendar feature derivers
//! - `preprocessing`: Scaler, one-hot encoder, column transformer
//! - `model`: Linear regression with stateful type parameters
//! - `loss`, `optimizer`, `dataset`, `trainer`: SGD training
//! - `pipeline`: The persisted fare pipeline
//! - `metrics`: RMSE
//! - `config`, `error`: Run configuration and error taxonomy

pub mod backend;
pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod features;
pub mod loss;
pub mod metrics;
pub mod model;
pub mod optimizer;
pub mod pipeline;
pub mod preprocessing;
pub mod serialization;
pub mod trainer;

pub use config::Config;
pub use error::{Result, TaxiFareError};
pub use pipeline::FarePipeline;
pub use trainer::{FareTrainer, TrainingReport};
