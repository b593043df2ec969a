//! End-to-end fare training: split, fit, persist, evaluate.

use crate::backend::{Backend, DefaultBackend};
use crate::config::{Config, TrainingConfig};
use crate::data::{clean_trips, load_trips, split_target, train_test_split, Trip};
use crate::dataset::InMemoryDataset;
use crate::error::{Result, TaxiFareError};
use crate::loss::MSELoss;
use crate::metrics::rmse;
use crate::model::{LinearParams, LinearRegression};
use crate::optimizer::SGD;
use crate::pipeline::FarePipeline;
use crate::preprocessing::{ColumnTransformer, FittedTransformer, Transformer};
use crate::trainer::Trainer;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing::info;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// RMSE on the held-out split.
    pub rmse: f64,
    pub n_train: usize,
    pub n_test: usize,
    /// Where the fitted pipeline was written.
    pub model_path: PathBuf,
}

/// Trains a [`FarePipeline`] and reports its held-out RMSE.
///
/// The feature assembler is fit on the training split only and then applied
/// unchanged to the test split. The artifact is written to a temporary file
/// first and only renamed over `model_path` after evaluation succeeds; any
/// earlier failure leaves `model_path` as it was.
#[derive(Debug, Clone)]
pub struct FareTrainer<B: Backend = DefaultBackend> {
    training: TrainingConfig,
    utc_offset_hours: i32,
    model_path: PathBuf,
    _backend: PhantomData<B>,
}

fn select<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| items[i].clone()).collect()
}

impl<B: Backend> FareTrainer<B> {
    pub fn new(config: &Config) -> Self {
        Self {
            training: config.training.clone(),
            utc_offset_hours: config.features.utc_offset_hours,
            model_path: config.output.model_path.clone(),
            _backend: PhantomData,
        }
    }

    pub fn model_path(&self) -> &PathBuf {
        &self.model_path
    }

    /// Fits assembler and linear model on all given rows.
    pub fn fit(&self, trips: &[Trip], fares: &[f64]) -> Result<FarePipeline<B>> {
        let assembler = ColumnTransformer::<B>::fare_default(self.utc_offset_hours).fit(trips)?;
        let x = assembler.transform(trips)?;
        info!(
            rows = x.rows(),
            features = x.cols(),
            "assembled training features"
        );

        let dataset = InMemoryDataset::from_tensors(&x, fares)?;
        let trainer = Trainer::<B, MSELoss, SGD<B>, LinearRegression<B>, LinearParams<B>>::builder(
            MSELoss,
            SGD::new(self.training.learning_rate),
        )
        .batch_size(self.training.batch_size)
        .max_epochs(self.training.epochs)
        .build();
        let model = trainer.fit(LinearRegression::new(x.cols()), &dataset)?;

        FarePipeline::new(assembler, model)
    }

    /// Runs the full workflow on cleaned feature rows and their fares.
    ///
    /// # Errors
    /// - [`TaxiFareError::Data`]: no rows, length mismatch, non-finite fare
    /// - [`TaxiFareError::Fit`]: fewer than 2 rows, or an empty split side
    /// - [`TaxiFareError::Feature`]: invalid coordinates or timestamps
    /// - [`TaxiFareError::Persistence`]: the artifact could not be written
    /// - [`TaxiFareError::Evaluation`]: RMSE could not be computed
    pub fn run(&self, trips: &[Trip], fares: &[f64]) -> Result<TrainingReport> {
        if trips.len() != fares.len() {
            return Err(TaxiFareError::Data(format!(
                "{} feature rows but {} fares",
                trips.len(),
                fares.len()
            )));
        }
        if trips.is_empty() {
            return Err(TaxiFareError::Data("dataset is empty".to_string()));
        }
        if trips.len() < 2 {
            return Err(TaxiFareError::Fit(format!(
                "need at least 2 rows to split, got {}",
                trips.len()
            )));
        }
        if let Some(i) = fares.iter().position(|f| !f.is_finite()) {
            return Err(TaxiFareError::Data(format!(
                "row {}: fare {} is not a finite number",
                i, fares[i]
            )));
        }

        let (train_idx, test_idx) =
            train_test_split(trips.len(), self.training.test_size, self.training.seed);
        if train_idx.is_empty() || test_idx.is_empty() {
            return Err(TaxiFareError::Fit(format!(
                "split of {} rows left {} for training and {} for testing",
                trips.len(),
                train_idx.len(),
                test_idx.len()
            )));
        }
        info!(
            train = train_idx.len(),
            test = test_idx.len(),
            seed = ?self.training.seed,
            "split dataset"
        );

        let pipeline = self.fit(&select(trips, &train_idx), &select(fares, &train_idx))?;

        let staged = pipeline.stage(&self.model_path)?;
        let preds = pipeline.predict(&select(trips, &test_idx))?;
        let score = rmse(&preds, &select(fares, &test_idx))?;
        let model_path = staged.commit()?;

        info!(rmse = score, path = %model_path.display(), "model saved");
        Ok(TrainingReport {
            rmse: score,
            n_train: train_idx.len(),
            n_test: test_idx.len(),
            model_path,
        })
    }
}

/// Load, clean and train as configured.
pub fn train_from_config(config: &Config) -> Result<TrainingReport> {
    config.validate()?;
    let records = load_trips(&config.data.path, config.data.nrows)?;
    let cleaned = clean_trips(records, &config.cleaning);
    let (trips, fares) = split_target(cleaned)?;
    FareTrainer::<DefaultBackend>::new(config).run(&trips, &fares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::data::fixtures::trip;

    fn config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.training.seed = Some(3);
        config.training.epochs = 50;
        config.output.model_path = dir.join("model.bin");
        config
    }

    fn rows(n: usize) -> (Vec<Trip>, Vec<f64>) {
        let trips: Vec<Trip> = (0..n)
            .map(|i| {
                let mut t = trip(&format!("2015-01-{:02} 10:00:00 UTC", i % 28 + 1));
                t.dropoff_latitude = 40.75 + 0.01 * i as f64;
                t
            })
            .collect();
        let fares = (0..n).map(|i| 5.0 + i as f64 * 0.5).collect();
        (trips, fares)
    }

    #[test]
    fn test_single_row_is_fit_error() {
        let dir = tempfile::tempdir().unwrap();
        let (trips, fares) = rows(1);
        let err = FareTrainer::<CpuBackend>::new(&config(dir.path()))
            .run(&trips, &fares)
            .unwrap_err();
        assert!(matches!(err, TaxiFareError::Fit(_)));
        assert!(!dir.path().join("model.bin").exists());
    }

    #[test]
    fn test_empty_and_mismatched_inputs_are_data_errors() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = FareTrainer::<CpuBackend>::new(&config(dir.path()));
        assert!(matches!(trainer.run(&[], &[]), Err(TaxiFareError::Data(_))));

        let (trips, _) = rows(4);
        assert!(matches!(
            trainer.run(&trips, &[1.0, 2.0]),
            Err(TaxiFareError::Data(_))
        ));
        assert!(matches!(
            trainer.run(&trips, &[1.0, f64::NAN, 2.0, 3.0]),
            Err(TaxiFareError::Data(_))
        ));
    }

    #[test]
    fn test_run_writes_artifact_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let (trips, fares) = rows(20);
        let report = FareTrainer::<CpuBackend>::new(&config(dir.path()))
            .run(&trips, &fares)
            .unwrap();

        assert_eq!(report.n_test, 3);
        assert_eq!(report.n_train, 17);
        assert!(report.rmse.is_finite() && report.rmse >= 0.0);
        assert!(report.model_path.exists());
        // no temporary files left beside the artifact
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_zero_epochs_is_fit_error_and_keeps_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.training.epochs = 0;
        std::fs::write(&config.output.model_path, b"previous").unwrap();

        let (trips, fares) = rows(20);
        let err = FareTrainer::<CpuBackend>::new(&config)
            .run(&trips, &fares)
            .unwrap_err();
        assert!(matches!(err, TaxiFareError::Fit(_)));
        assert_eq!(std::fs::read(&config.output.model_path).unwrap(), b"previous");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_feature_failure_leaves_no_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let (mut trips, fares) = rows(10);
        for t in &mut trips {
            t.pickup_datetime = "not a timestamp".to_string();
        }
        let err = FareTrainer::<CpuBackend>::new(&config(dir.path()))
            .run(&trips, &fares)
            .unwrap_err();
        assert!(matches!(err, TaxiFareError::Feature(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_same_seed_same_report() {
        let (trips, fares) = rows(30);
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let ra = FareTrainer::<CpuBackend>::new(&config(a.path()))
            .run(&trips, &fares)
            .unwrap();
        let rb = FareTrainer::<CpuBackend>::new(&config(b.path()))
            .run(&trips, &fares)
            .unwrap();
        assert_eq!(ra.rmse, rb.rmse);
    }
}
