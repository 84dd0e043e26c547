use anyhow::{anyhow, Result};
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2, Axis};

use crate::config::ModelConfig;
use crate::error::DataError;
use crate::models::classifier_trait::ClassifierModel;

/// L2-regularized binary logistic regression (unfitted).
pub struct LogisticClassifier {
    params: ModelConfig,
}

impl LogisticClassifier {
    pub fn new(params: ModelConfig) -> Self {
        LogisticClassifier { params }
    }

    /// Fit on scaled features and 0/1 labels. Both classes must be present.
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<usize>) -> Result<FittedClassifier> {
        if x.nrows() == 0 {
            return Err(DataError::EmptyData.into());
        }
        if x.nrows() != y.len() {
            return Err(DataError::ShapeMismatch {
                expected: x.nrows(),
                found: y.len(),
            }
            .into());
        }
        let positives = y.iter().filter(|&&v| v == 1).count();
        if positives == 0 || positives == y.len() {
            return Err(anyhow!(
                "Logistic regression needs both classes; training labels contain {} survivors out of {}",
                positives,
                y.len()
            ));
        }

        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let model = LogisticRegression::default()
            .alpha(self.params.alpha)
            .max_iterations(self.params.max_iterations)
            .gradient_tolerance(self.params.gradient_tolerance)
            .with_intercept(self.params.fit_intercept)
            .fit(&dataset)
            .map_err(|e| anyhow!("Logistic regression fit failed: {}", e))?;

        let survived_is_positive = model.labels().pos.class == 1;
        log::debug!(
            "Fitted logistic regression on {} samples (alpha {}, positive class {})",
            x.nrows(),
            self.params.alpha,
            model.labels().pos.class
        );

        Ok(FittedClassifier {
            model,
            survived_is_positive,
        })
    }
}

/// A fitted model. Immutable; used for scoring and prediction only.
#[derive(Debug)]
pub struct FittedClassifier {
    model: FittedLogisticRegression<f64, usize>,
    /// linfa picks its own positive class; probabilities and coefficients are
    /// flipped when that class is "died".
    survived_is_positive: bool,
}

impl FittedClassifier {
    /// Weights in feature order, oriented towards `Survived = 1`.
    pub fn coefficients(&self) -> Array1<f64> {
        if self.survived_is_positive {
            self.model.params().to_owned()
        } else {
            self.model.params().mapv(|w| -w)
        }
    }

    pub fn intercept(&self) -> f64 {
        if self.survived_is_positive {
            self.model.intercept()
        } else {
            -self.model.intercept()
        }
    }

    /// P(survived) for every row.
    pub fn survival_probability(&self, x: &Array2<f64>) -> Array1<f64> {
        let p = self.model.predict_probabilities(x);
        if self.survived_is_positive {
            p
        } else {
            p.mapv(|v| 1.0 - v)
        }
    }
}

impl ClassifierModel for FittedClassifier {
    fn predict_proba(&self, x: &Array2<f64>) -> Array2<f64> {
        let survived = self.survival_probability(x);
        let mut out = Array2::<f64>::zeros((x.nrows(), 2));
        out.index_axis_mut(Axis(1), 1).assign(&survived);
        out.index_axis_mut(Axis(1), 0)
            .assign(&survived.mapv(|p| 1.0 - p));
        out
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Array2<f64>, Array1<usize>) {
        let x = Array2::from_shape_vec(
            (8, 2),
            vec![
                -2.0, 0.1, -1.5, -0.2, -1.0, 0.3, -0.5, 0.0, 0.5, 0.2, 1.0, -0.1, 1.5, 0.0, 2.0,
                0.1,
            ],
        )
        .unwrap();
        let y = Array1::from_vec(vec![0, 0, 0, 0, 1, 1, 1, 1]);
        (x, y)
    }

    #[test]
    fn learns_direction_of_signal() {
        let (x, y) = separable();
        let model = LogisticClassifier::new(ModelConfig::default())
            .fit(&x, &y)
            .unwrap();
        let coef = model.coefficients();
        assert_eq!(coef.len(), 2);
        assert!(coef[0] > 0.0, "coefficients {:?}", coef);
        assert_eq!(model.predict(&x).to_vec(), y.to_vec());
        assert_eq!(model.score(&x, &y), 1.0);
    }

    #[test]
    fn probability_rows_sum_to_one() {
        let (x, y) = separable();
        let model = LogisticClassifier::new(ModelConfig::default())
            .fit(&x, &y)
            .unwrap();
        let proba = model.predict_proba(&x);
        assert_eq!(proba.shape(), &[8, 2]);
        for row in proba.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
            assert!(row.iter().all(|p| (0.0..=1.0).contains(p)));
        }
        // P(survived) grows with the informative feature
        assert!(proba[(7, 1)] > proba[(0, 1)]);
    }

    fn fit_imbalanced(survivors: usize) -> (FittedClassifier, Array2<f64>) {
        let x = Array2::from_shape_vec(
            (8, 1),
            vec![-2.0, -1.5, -1.0, -0.5, 0.5, 1.0, 1.5, 2.0],
        )
        .unwrap();
        let y = Array1::from_shape_fn(8, |i| usize::from(i >= 8 - survivors));
        let model = LogisticClassifier::new(ModelConfig::default())
            .fit(&x, &y)
            .unwrap();
        (model, x)
    }

    #[test]
    fn oriented_to_survival_when_survivors_are_majority() {
        let (model, x) = fit_imbalanced(6);
        assert!(model.coefficients()[0] > 0.0, "{:?}", model.coefficients());
        let proba = model.predict_proba(&x);
        assert!(proba[(7, 1)] > proba[(0, 1)]);
        assert!(proba[(7, 1)] > 0.5);
        assert_eq!(model.predict(&x)[7], 1);
    }

    #[test]
    fn oriented_to_survival_when_deaths_are_majority() {
        let (model, x) = fit_imbalanced(2);
        assert!(model.coefficients()[0] > 0.0, "{:?}", model.coefficients());
        let proba = model.predict_proba(&x);
        assert!(proba[(7, 1)] > proba[(0, 1)]);
        assert!(proba[(0, 0)] > 0.5);
        assert_eq!(model.predict(&x)[0], 0);
    }

    #[test]
    fn single_class_is_rejected() {
        let (x, _) = separable();
        let y = Array1::from_vec(vec![1; 8]);
        assert!(LogisticClassifier::new(ModelConfig::default())
            .fit(&x, &y)
            .is_err());
    }

    #[test]
    fn label_length_must_match() {
        let (x, _) = separable();
        let y = Array1::from_vec(vec![0, 1]);
        let err = LogisticClassifier::new(ModelConfig::default())
            .fit(&x, &y)
            .unwrap_err();
        assert!(err.to_string().contains("Expected 8"));
    }
}
