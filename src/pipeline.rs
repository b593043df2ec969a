//! The fitted fare pipeline: feature assembler plus linear model.
//!
//! A [`FarePipeline`] is what a training run produces and persists. It is
//! self-contained: a separate process can load it and predict fares for raw
//! [`Trip`] rows without re-running training.

use crate::backend::{Backend, DefaultBackend};
use crate::data::Trip;
use crate::error::{Result, TaxiFareError};
use crate::model::{Fitted, InferenceModel, LinearModel, SerializableLinearParams};
use crate::preprocessing::{ColumnTransformerParams, FittedColumnTransformer, FittedTransformer};
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Version tag written into every artifact. Bumped when the layout of
/// [`FarePipelineParams`] changes.
pub const FORMAT_VERSION: u32 = 1;

/// On-disk form of a [`FarePipeline`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FarePipelineParams {
    pub format_version: u32,
    pub assembler: ColumnTransformerParams,
    pub model: SerializableLinearParams,
}

#[derive(Clone, Debug)]
pub struct FarePipeline<B: Backend = DefaultBackend> {
    assembler: FittedColumnTransformer<B>,
    model: LinearModel<B, Fitted>,
}

impl<B: Backend> FarePipeline<B> {
    /// # Errors
    /// [`TaxiFareError::Fit`] if the model's weight count differs from the
    /// number of assembled features.
    pub fn new(
        assembler: FittedColumnTransformer<B>,
        model: LinearModel<B, Fitted>,
    ) -> Result<Self> {
        if model.n_features() != assembler.n_features_out() {
            return Err(TaxiFareError::Fit(format!(
                "model expects {} features, assembler produces {}",
                model.n_features(),
                assembler.n_features_out()
            )));
        }
        Ok(Self { assembler, model })
    }

    pub fn assembler(&self) -> &FittedColumnTransformer<B> {
        &self.assembler
    }

    pub fn model(&self) -> &LinearModel<B, Fitted> {
        &self.model
    }

    /// Predicted fare for each trip.
    pub fn predict(&self, trips: &[Trip]) -> Result<Vec<f64>> {
        let x = self.assembler.transform(trips)?;
        Ok(self.model.predict_batch(&x).to_vec())
    }

    pub fn params(&self) -> FarePipelineParams {
        FarePipelineParams {
            format_version: FORMAT_VERSION,
            assembler: self.assembler.extract_params(),
            model: self.model.extract_params(),
        }
    }

    pub fn from_params(params: FarePipelineParams) -> Result<Self> {
        if params.format_version != FORMAT_VERSION {
            return Err(TaxiFareError::Persistence(format!(
                "artifact format version {} is not supported (expected {})",
                params.format_version, FORMAT_VERSION
            )));
        }
        let assembler = FittedColumnTransformer::from_params(params.assembler)
            .map_err(|e| TaxiFareError::Persistence(e.to_string()))?;
        let model = LinearModel::<B, Fitted>::from_params(params.model)?;
        Self::new(assembler, model).map_err(|e| TaxiFareError::Persistence(e.to_string()))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.params().to_bytes()?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_params(FarePipelineParams::from_bytes(bytes)?)
    }

    /// Writes the pipeline to a temporary file next to `path` without
    /// touching `path` itself. See [`StagedArtifact`].
    pub fn stage<P: AsRef<Path>>(&self, path: P) -> Result<StagedArtifact> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| persistence(&dir, e))?;

        let bytes = self.to_bytes()?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| persistence(&dir, e))?;
        std::io::Write::write_all(&mut tmp, &bytes).map_err(|e| persistence(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| persistence(tmp.path(), e))?;
        Ok(StagedArtifact {
            tmp,
            target: path.to_path_buf(),
        })
    }

    /// Writes the pipeline to `path`, replacing any previous artifact.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.stage(path)?.commit().map(|_| ())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| persistence(path, e))?;
        Self::from_bytes(&bytes)
    }
}

fn persistence(path: &Path, err: std::io::Error) -> TaxiFareError {
    TaxiFareError::Persistence(format!("{}: {}", path.display(), err))
}

/// A fully written artifact that is not yet visible at its target path.
///
/// [`commit`](Self::commit) renames it over the target in one step.
/// Dropping it without committing deletes the temporary file, so the
/// target keeps whatever it held before.
#[derive(Debug)]
pub struct StagedArtifact {
    tmp: NamedTempFile,
    target: PathBuf,
}

impl StagedArtifact {
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn temp_path(&self) -> &Path {
        self.tmp.path()
    }

    /// Moves the artifact to its target path, overwriting any prior file.
    pub fn commit(self) -> Result<PathBuf> {
        self.tmp
            .persist(&self.target)
            .map_err(|e| persistence(&self.target, e.error))?;
        Ok(self.target)
    }
}
