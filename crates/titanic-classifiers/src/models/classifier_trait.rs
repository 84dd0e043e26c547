use ndarray::{Array1, Array2, Axis};

/// Contract for fitted binary classifiers over dense `f64` features.
///
/// Labels use the crate convention: 1 for survived, 0 for died.
pub trait ClassifierModel {
    /// Probability pairs `[P(died), P(survived)]`, one row per sample.
    fn predict_proba(&self, x: &Array2<f64>) -> Array2<f64>;

    /// Hard 0/1 decisions: survived only when P(survived) is above 0.5.
    fn predict(&self, x: &Array2<f64>) -> Array1<usize> {
        self.predict_proba(x)
            .index_axis(Axis(1), 1)
            .mapv(|p| usize::from(p > 0.5))
    }

    /// Fraction of correctly classified samples.
    fn score(&self, x: &Array2<f64>, y: &Array1<usize>) -> f64 {
        crate::stats::accuracy(&self.predict(x), y)
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
