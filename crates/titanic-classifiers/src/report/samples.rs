use ndarray::{Array1, Array2};

use crate::config::SamplePassenger;
use crate::error::DataError;
use crate::models::ClassifierModel;
use crate::preprocessing::Scaler;

/// Predictions for hand-built passengers.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePredictions {
    pub names: Vec<String>,
    /// Unscaled feature vectors, one row per passenger.
    pub features: Array2<f64>,
    pub predictions: Array1<usize>,
    /// `[P(died), P(survived)]` per passenger.
    pub probabilities: Array2<f64>,
}

/// Scale the sample vectors with the already fitted scaler and run them
/// through the fitted model.
pub fn predict_samples<M: ClassifierModel + ?Sized>(
    samples: &[SamplePassenger],
    scaler: &Scaler,
    model: &M,
) -> Result<SamplePredictions, DataError> {
    let flat: Vec<f64> = samples.iter().flat_map(|s| s.features()).collect();
    let features = Array2::from_shape_vec((samples.len(), 4), flat).map_err(|_| {
        DataError::ShapeMismatch {
            expected: scaler.n_features(),
            found: 4,
        }
    })?;

    let scaled = scaler.transform(&features)?;
    let predictions = model.predict(&scaled);
    let probabilities = model.predict_proba(&scaled);

    for (idx, sample) in samples.iter().enumerate() {
        log::debug!(
            "{}: features {:?} -> P(survived) {:.4}",
            sample.name,
            sample.features(),
            probabilities[(idx, 1)]
        );
    }

    Ok(SamplePredictions {
        names: samples.iter().map(|s| s.name.clone()).collect(),
        features,
        predictions,
        probabilities,
    })
}
