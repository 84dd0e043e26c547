//! Train/test partitioning and feature standardization.
//!
//! The split is an ordinary seeded shuffle (no stratification). The scaler is
//! fit once on the training rows and then applied read-only to the test rows
//! and to any hand-built sample passengers.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::DataError;

/// Row indices of the two partitions, in shuffled order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with a seeded generator and cut off the test rows.
///
/// `n_test = ceil(test_size * n_rows)`; the first `n_test` shuffled indices
/// form the test set and the remainder the training set.
pub fn train_test_split(
    n_rows: usize,
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit, DataError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DataError::InvalidTestSize(test_size));
    }
    let n_test = (test_size * n_rows as f64).ceil() as usize;
    if n_rows == 0 || n_test >= n_rows {
        return Err(DataError::EmptyData);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n_rows).collect();
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    log::debug!(
        "Split {} rows into {} train / {} test (seed {})",
        n_rows,
        train.len(),
        indices.len(),
        seed
    );
    Ok(TrainTestSplit {
        train,
        test: indices,
    })
}

/// Per-column standard scaler.
#[derive(Clone, Debug, PartialEq)]
pub struct Scaler {
    pub mean: Array1<f64>,
    /// Population standard deviation (ddof = 0) as measured on the training rows.
    pub std: Array1<f64>,
    /// Divisor used by `transform`: `std`, or 1 where `std` is 0.
    pub scale: Array1<f64>,
}

impl Scaler {
    /// Fit the scaler from a matrix where rows are samples and columns are
    /// features. Zero-variance columns are centred but not rescaled.
    pub fn fit(x: &Array2<f64>) -> Result<Scaler, DataError> {
        let mean = x.mean_axis(Axis(0)).ok_or(DataError::EmptyData)?;
        if x.ncols() == 0 {
            return Err(DataError::EmptyData);
        }
        let std = x.std_axis(Axis(0), 0.0);

        let scale = std.mapv(|s| if s == 0.0 { 1.0 } else { s });
        for (idx, s) in std.iter().enumerate() {
            if *s == 0.0 {
                log::warn!(
                    "Feature column {} has zero variance in the training split; centring only",
                    idx
                );
            }
        }

        Ok(Scaler { mean, std, scale })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Apply the fitted statistics. Never refits.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, DataError> {
        if x.ncols() != self.n_features() {
            return Err(DataError::ShapeMismatch {
                expected: self.n_features(),
                found: x.ncols(),
            });
        }
        let mut out = x.to_owned();
        out -= &self.mean;
        out /= &self.scale;
        Ok(out)
    }
}

/// Fit a scaler and return it together with the transformed matrix.
pub fn fit_transform(x: &Array2<f64>) -> Result<(Scaler, Array2<f64>), DataError> {
    let scaler = Scaler::fit(x)?;
    let transformed = scaler.transform(x)?;
    Ok((scaler, transformed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sizes_round_test_up() {
        let split = train_test_split(10, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        let split = train_test_split(11, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn split_is_a_partition() {
        let split = train_test_split(25, 0.2, 42).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn split_is_reproducible_for_a_seed() {
        let a = train_test_split(50, 0.2, 42).unwrap();
        let b = train_test_split(50, 0.2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn split_rejects_bad_sizes() {
        assert_eq!(
            train_test_split(10, 0.0, 42),
            Err(DataError::InvalidTestSize(0.0))
        );
        assert_eq!(
            train_test_split(10, 1.0, 42),
            Err(DataError::InvalidTestSize(1.0))
        );
        assert_eq!(train_test_split(1, 0.2, 42), Err(DataError::EmptyData));
    }

    #[test]
    fn scaler_uses_population_std() {
        let x = Array2::from_shape_vec((4, 2), vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0])
            .unwrap();
        let sc = Scaler::fit(&x).unwrap();
        assert!((sc.mean[0] - 2.5).abs() < 1e-12);
        assert!((sc.mean[1] - 25.0).abs() < 1e-12);
        assert!((sc.std[0] - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_column_is_centred_only() {
        let x = Array2::from_shape_vec((3, 2), vec![1.0, 5.0, 2.0, 5.0, 3.0, 5.0]).unwrap();
        let (sc, t) = fit_transform(&x).unwrap();
        assert_eq!(sc.std[1], 0.0);
        assert_eq!(sc.scale[1], 1.0);
        assert!(t.column(1).iter().all(|v| *v == 0.0));
        assert!(t.iter().all(|v| v.is_finite()));

        let other = Array2::from_shape_vec((1, 2), vec![2.0, 7.0]).unwrap();
        let t = sc.transform(&other).unwrap();
        assert_eq!(t[(0, 1)], 2.0);
    }

    #[test]
    fn transform_checks_width() {
        let x = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let sc = Scaler::fit(&x).unwrap();
        let narrow = Array2::from_shape_vec((1, 1), vec![1.0]).unwrap();
        assert_eq!(
            sc.transform(&narrow),
            Err(DataError::ShapeMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn fit_on_empty_matrix_fails() {
        let x = Array2::<f64>::zeros((0, 4));
        assert_eq!(Scaler::fit(&x), Err(DataError::EmptyData));
    }
}
