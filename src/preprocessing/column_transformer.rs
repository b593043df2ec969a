//! ColumnTransformer over trip rows.
//!
//! Each branch derives columns from the raw [`Trip`] rows with a
//! [`Deriver`], passes them through one fitted step, and the branch outputs
//! are concatenated left to right. Columns no branch reads are dropped.

use crate::backend::{Backend, Tensor2D};
use crate::data::Trip;
use crate::features::{DistanceTransformer, TimeFeaturesEncoder};
use crate::preprocessing::encoding::{
    FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderParams,
};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
use crate::preprocessing::traits::{FeatureDeriver, FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Row-wise feature derivation at the head of a branch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Deriver {
    Distance(DistanceTransformer),
    Time(TimeFeaturesEncoder),
}

impl FeatureDeriver for Deriver {
    type Row = Trip;

    fn input_columns(&self) -> Vec<&str> {
        match self {
            Deriver::Distance(d) => d.input_columns(),
            Deriver::Time(d) => d.input_columns(),
        }
    }

    fn output_columns(&self) -> Vec<&'static str> {
        match self {
            Deriver::Distance(d) => d.output_columns(),
            Deriver::Time(d) => d.output_columns(),
        }
    }

    fn derive<B: Backend>(&self, rows: &[Trip]) -> Result<Tensor2D<B>, PreprocessingError> {
        match self {
            Deriver::Distance(d) => d.derive(rows),
            Deriver::Time(d) => d.derive(rows),
        }
    }
}

/// Enum of unfitted transformers that can close a branch.
#[derive(Clone, Debug)]
pub enum ColumnTransformerStep<B: Backend> {
    StandardScaler(StandardScaler<B>),
    OneHotEncoder(OneHotEncoder<B>),
}

/// Enum of fitted transformers for ColumnTransformer.
#[derive(Clone, Debug)]
pub enum FittedColumnTransformerStep<B: Backend> {
    StandardScaler(FittedStandardScaler<B>),
    OneHotEncoder(FittedOneHotEncoder<B>),
}

/// Learned parameters of one fitted step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StepParams {
    StandardScaler(StandardScalerParams),
    OneHotEncoder(OneHotEncoderParams),
}

impl<B: Backend> ColumnTransformerStep<B> {
    fn fit(
        &self,
        data: &Tensor2D<B>,
    ) -> Result<FittedColumnTransformerStep<B>, PreprocessingError> {
        match self {
            ColumnTransformerStep::StandardScaler(t) => {
                t.fit(data).map(FittedColumnTransformerStep::StandardScaler)
            }
            ColumnTransformerStep::OneHotEncoder(t) => {
                t.fit(data).map(FittedColumnTransformerStep::OneHotEncoder)
            }
        }
    }
}

impl<B: Backend> FittedColumnTransformerStep<B> {
    fn transform(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        match self {
            FittedColumnTransformerStep::StandardScaler(t) => t.transform(data),
            FittedColumnTransformerStep::OneHotEncoder(t) => t.transform(data),
        }
    }

    pub fn step_name(&self) -> &'static str {
        match self {
            FittedColumnTransformerStep::StandardScaler(_) => "StandardScaler",
            FittedColumnTransformerStep::OneHotEncoder(_) => "OneHotEncoder",
        }
    }

    fn n_features_out(&self) -> usize {
        match self {
            FittedColumnTransformerStep::StandardScaler(t) => t.n_features_out(),
            FittedColumnTransformerStep::OneHotEncoder(t) => t.n_features_out(),
        }
    }

    fn params(&self) -> StepParams {
        match self {
            FittedColumnTransformerStep::StandardScaler(t) => {
                StepParams::StandardScaler(t.extract_params())
            }
            FittedColumnTransformerStep::OneHotEncoder(t) => {
                StepParams::OneHotEncoder(t.extract_params())
            }
        }
    }

    fn from_params(params: StepParams) -> Result<Self, PreprocessingError> {
        match params {
            StepParams::StandardScaler(p) => FittedStandardScaler::from_params(p)
                .map(FittedColumnTransformerStep::StandardScaler),
            StepParams::OneHotEncoder(p) => {
                FittedOneHotEncoder::from_params(p).map(FittedColumnTransformerStep::OneHotEncoder)
            }
        }
    }

    /// Output column names, given the names the deriver produced.
    fn feature_names(&self, derived: &[&str]) -> Vec<String> {
        match self {
            FittedColumnTransformerStep::StandardScaler(_) => {
                derived.iter().map(|c| c.to_string()).collect()
            }
            FittedColumnTransformerStep::OneHotEncoder(t) => derived
                .iter()
                .zip(t.categories())
                .flat_map(|(c, cats)| cats.iter().map(move |v| format!("{}_{}", c, v)))
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
struct Branch<B: Backend> {
    name: String,
    deriver: Deriver,
    step: ColumnTransformerStep<B>,
}

/// Feature assembler: named branches of deriver → transformer.
///
/// ```ignore
/// use taxifare::preprocessing::{ColumnTransformer, Transformer, FittedTransformer};
/// use taxifare::backend::CpuBackend;
///
/// let fitted = ColumnTransformer::<CpuBackend>::fare_default(0).fit(&train_trips)?;
/// let x_test = fitted.transform(&test_trips)?;
/// ```
#[derive(Clone, Debug)]
pub struct ColumnTransformer<B: Backend> {
    branches: Vec<Branch<B>>,
}

impl<B: Backend> Default for ColumnTransformer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> ColumnTransformer<B> {
    /// Create a new empty ColumnTransformer.
    pub fn new() -> Self {
        Self {
            branches: Vec::new(),
        }
    }

    /// The fare layout:
    /// - `distance`: haversine distance, standard-scaled
    /// - `time`: hour/dow/month/year at `utc_offset_hours`, one-hot encoded
    ///   with unseen categories encoded as zeros
    pub fn fare_default(utc_offset_hours: i32) -> Self {
        Self::new()
            .add_standard_scaler(
                "distance",
                Deriver::Distance(DistanceTransformer::default()),
                StandardScaler::new(),
            )
            .add_one_hot_encoder(
                "time",
                Deriver::Time(
                    TimeFeaturesEncoder::default().with_utc_offset_hours(utc_offset_hours),
                ),
                OneHotEncoder::new().with_handle_unknown(HandleUnknown::Ignore),
            )
    }

    pub fn add_standard_scaler(
        self,
        name: &str,
        deriver: Deriver,
        scaler: StandardScaler<B>,
    ) -> Self {
        self.add(name, deriver, ColumnTransformerStep::StandardScaler(scaler))
    }

    pub fn add_one_hot_encoder(
        self,
        name: &str,
        deriver: Deriver,
        encoder: OneHotEncoder<B>,
    ) -> Self {
        self.add(name, deriver, ColumnTransformerStep::OneHotEncoder(encoder))
    }

    /// Add a generic branch.
    pub fn add(mut self, name: &str, deriver: Deriver, step: ColumnTransformerStep<B>) -> Self {
        self.branches.push(Branch {
            name: name.to_string(),
            deriver,
            step,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

/// Serializable parameters of one fitted branch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchParams {
    pub name: String,
    pub deriver: Deriver,
    pub step: StepParams,
}

/// Serializable parameters for a fitted ColumnTransformer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformerParams {
    pub branches: Vec<BranchParams>,
}

#[derive(Clone, Debug)]
struct FittedBranch<B: Backend> {
    name: String,
    deriver: Deriver,
    step: FittedColumnTransformerStep<B>,
}

/// Fitted ColumnTransformer ready for inference.
///
/// Holds every learned mean, standard deviation and category vocabulary.
/// It has no mutating methods: transforming any number of datasets leaves
/// those parameters exactly as fit produced them.
#[derive(Clone, Debug)]
pub struct FittedColumnTransformer<B: Backend> {
    branches: Vec<FittedBranch<B>>,
    n_features_in: usize,
    n_features_out: usize,
}

impl<B: Backend> FittedColumnTransformer<B> {
    /// `(branch name, step name)` pairs in output order.
    pub fn step_names(&self) -> Vec<(&str, &'static str)> {
        self.branches
            .iter()
            .map(|b| (b.name.as_str(), b.step.step_name()))
            .collect()
    }

    /// Names of the assembled columns, e.g. `distance`, `hour_13`.
    pub fn feature_names(&self) -> Vec<String> {
        self.branches
            .iter()
            .flat_map(|b| b.step.feature_names(&b.deriver.output_columns()))
            .collect()
    }

    /// Distinct raw columns read by any branch.
    pub fn input_columns(&self) -> BTreeSet<&str> {
        self.branches
            .iter()
            .flat_map(|b| b.deriver.input_columns())
            .collect()
    }
}

fn validate_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), PreprocessingError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "duplicate branch name `{}`",
                name
            )));
        }
    }
    if seen.is_empty() {
        return Err(PreprocessingError::InvalidParameter(
            "ColumnTransformer has no branches".to_string(),
        ));
    }
    Ok(())
}

fn build_fitted<B: Backend>(
    branches: Vec<FittedBranch<B>>,
) -> Result<FittedColumnTransformer<B>, PreprocessingError> {
    validate_names(branches.iter().map(|b| b.name.as_str()))?;
    for b in &branches {
        let derived = b.deriver.output_columns().len();
        let expected = match &b.step {
            FittedColumnTransformerStep::StandardScaler(t) => t.n_features_in(),
            FittedColumnTransformerStep::OneHotEncoder(t) => t.n_features_in(),
        };
        if derived != expected {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: expected,
                got_features: derived,
            });
        }
    }
    let n_features_in = branches
        .iter()
        .flat_map(|b| b.deriver.input_columns())
        .collect::<BTreeSet<_>>()
        .len();
    let n_features_out = branches.iter().map(|b| b.step.n_features_out()).sum();
    Ok(FittedColumnTransformer {
        branches,
        n_features_in,
        n_features_out,
    })
}

impl<B: Backend> Transformer<B> for ColumnTransformer<B> {
    type Input = [Trip];
    type Output = Tensor2D<B>;
    type Params = ColumnTransformerParams;
    type Fitted = FittedColumnTransformer<B>;

    fn fit(&self, data: &[Trip]) -> Result<Self::Fitted, PreprocessingError> {
        if data.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit ColumnTransformer on empty data".to_string(),
            ));
        }
        validate_names(self.branches.iter().map(|b| b.name.as_str()))?;

        let mut fitted = Vec::with_capacity(self.branches.len());
        for branch in &self.branches {
            let derived = branch.deriver.derive::<B>(data)?;
            fitted.push(FittedBranch {
                name: branch.name.clone(),
                deriver: branch.deriver.clone(),
                step: branch.step.fit(&derived)?,
            });
        }
        build_fitted(fitted)
    }
}

impl<B: Backend> FittedTransformer<B> for FittedColumnTransformer<B> {
    type Input = [Trip];
    type Output = Tensor2D<B>;
    type Params = ColumnTransformerParams;

    fn transform(&self, data: &[Trip]) -> Result<Self::Output, PreprocessingError> {
        if data.is_empty() {
            return Ok(Tensor2D::zeros(0, self.n_features_out));
        }
        let blocks = self
            .branches
            .iter()
            .map(|b| b.step.transform(&b.deriver.derive::<B>(data)?))
            .collect::<Result<Vec<_>, _>>()?;
        Tensor2D::hcat(&blocks)
    }

    fn extract_params(&self) -> Self::Params {
        ColumnTransformerParams {
            branches: self
                .branches
                .iter()
                .map(|b| BranchParams {
                    name: b.name.clone(),
                    deriver: b.deriver.clone(),
                    step: b.step.params(),
                })
                .collect(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let branches = params
            .branches
            .into_iter()
            .map(|b| {
                Ok(FittedBranch {
                    name: b.name,
                    deriver: b.deriver,
                    step: FittedColumnTransformerStep::from_params(b.step)?,
                })
            })
            .collect::<Result<Vec<_>, PreprocessingError>>()?;
        build_fitted(branches)
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}
