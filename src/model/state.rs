/// Marker for a model that is **not yet trained**.
///
/// Training methods (`Trainer::fit`) require an `Unfitted` model and
/// `predict` is not available on it.
pub struct Unfitted;

/// Marker for a **trained** model.
///
/// A `Fitted` model implements [`InferenceModel`](super::InferenceModel) and
/// holds only inference parameters: no optimizer state, loss function or
/// training hyperparameters.
pub struct Fitted;
