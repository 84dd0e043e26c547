//! Summary statistics used by evaluation and plotting.
use std::collections::BTreeMap;

use itertools_num::linspace;
use ndarray::Array1;
use serde::Serialize;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Fraction of positions where `predicted == actual`.
///
/// # Panics
/// If the inputs have different lengths.
pub fn accuracy(predicted: &Array1<usize>, actual: &Array1<usize>) -> f64 {
    assert_eq!(
        predicted.len(),
        actual.len(),
        "Predictions and labels must have equal lengths"
    );
    if actual.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| p == a)
        .count();
    correct as f64 / actual.len() as f64
}

/// Binary classification metrics with survived (1) as the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassificationMetrics {
    pub fn compute(predicted: &Array1<usize>, actual: &Array1<usize>) -> Self {
        assert_eq!(
            predicted.len(),
            actual.len(),
            "Predictions and labels must have equal lengths"
        );
        let (mut tp, mut tn, mut fp, mut fn_) = (0usize, 0usize, 0usize, 0usize);
        for (&p, &a) in predicted.iter().zip(actual.iter()) {
            match (p == 1, a == 1) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }

        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        ClassificationMetrics {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
            accuracy: ratio(tp + tn, predicted.len()),
            precision,
            recall,
            f1,
        }
    }
}

/// Pearson correlation over the rows where both values are present.
/// `NaN` when either side has zero variance or fewer than two pairs remain.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Symmetric correlation matrix for a set of columns.
pub fn correlation_matrix(columns: &[&[Option<f64>]]) -> Vec<Vec<f64>> {
    columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect()
}

/// Mean of a binary outcome within one group, with a 95% normal-approximation
/// half-width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupRate {
    pub key: f64,
    pub count: usize,
    pub rate: f64,
    pub ci95: f64,
}

/// Group `outcome` by `key` (rows where either is missing are skipped) and
/// return the per-group mean in ascending key order.
pub fn group_rates(key: &[Option<f64>], outcome: &[Option<f64>]) -> Vec<GroupRate> {
    let mut groups: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for (k, o) in key.iter().zip(outcome.iter()) {
        if let (Some(k), Some(o)) = (k, o) {
            groups.entry(k.round() as i64).or_default().push(*o);
        }
    }

    groups
        .into_iter()
        .map(|(k, values)| {
            let count = values.len();
            let rate = values.iter().sum::<f64>() / count as f64;
            let ci95 = if count > 1 {
                1.96 * (values.iter().std_dev() / (count as f64).sqrt())
            } else {
                0.0
            };
            GroupRate {
                key: k as f64,
                count,
                rate,
                ci95,
            }
        })
        .collect()
}

/// Gaussian kernel density estimate evaluated on an even grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    pub grid: Vec<f64>,
    pub density: Vec<f64>,
}

/// Estimate the density of `values` with Scott's bandwidth
/// (`n^(-1/5) * sample std`), on `points` grid positions spanning the data
/// range padded by three bandwidths. Returns `None` for fewer than two values
/// or zero spread.
pub fn gaussian_kde(values: &[f64], points: usize) -> Option<Density> {
    if values.len() < 2 || points < 2 {
        return None;
    }
    let std = values.iter().std_dev();
    if !(std > 0.0) {
        return None;
    }
    let n = values.len() as f64;
    let bandwidth = std * n.powf(-0.2);
    let kernel = Normal::new(0.0, 1.0).ok()?;

    let lo = Statistics::min(values.iter()) - 3.0 * bandwidth;
    let hi = Statistics::max(values.iter()) + 3.0 * bandwidth;
    let grid: Vec<f64> = linspace(lo, hi, points).collect();
    let density = grid
        .iter()
        .map(|&g| {
            values
                .iter()
                .map(|&v| kernel.pdf((g - v) / bandwidth))
                .sum::<f64>()
                / (n * bandwidth)
        })
        .collect();

    Some(Density { grid, density })
}

/// Median and the two quartiles, by linear interpolation between order statistics.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let at = |q: f64| {
        let pos = q * (sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    };
    Some((at(0.25), at(0.5), at(0.75)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_matches() {
        let p = Array1::from_vec(vec![1, 0, 1, 1]);
        let a = Array1::from_vec(vec![1, 0, 0, 1]);
        assert_eq!(accuracy(&p, &a), 0.75);
    }

    #[test]
    #[should_panic(expected = "equal lengths")]
    fn accuracy_mismatched_lengths_panics() {
        let p = Array1::from_vec(vec![1, 0]);
        let a = Array1::from_vec(vec![1]);
        accuracy(&p, &a);
    }

    #[test]
    fn metrics_from_confusion_counts() {
        let p = Array1::from_vec(vec![1, 1, 0, 0, 1]);
        let a = Array1::from_vec(vec![1, 0, 0, 1, 1]);
        let m = ClassificationMetrics::compute(&p, &a);
        assert_eq!(
            (m.true_positives, m.false_positives, m.true_negatives, m.false_negatives),
            (2, 1, 1, 1)
        );
        assert!((m.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.accuracy - 0.6).abs() < 1e-12);
    }

    #[test]
    fn pearson_perfect_and_degenerate() {
        let a = [Some(1.0), Some(2.0), Some(3.0)];
        let b = [Some(2.0), Some(4.0), Some(6.0)];
        let c = [Some(3.0), Some(2.0), Some(1.0)];
        let k = [Some(5.0), Some(5.0), Some(5.0)];
        assert!((pearson(&a, &b) - 1.0).abs() < 1e-12);
        assert!((pearson(&a, &c) + 1.0).abs() < 1e-12);
        assert!(pearson(&a, &k).is_nan());
    }

    #[test]
    fn pearson_skips_missing_pairs() {
        let a = [Some(1.0), None, Some(2.0), Some(3.0)];
        let b = [Some(1.0), Some(100.0), Some(2.0), Some(3.0)];
        assert!((pearson(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn group_rates_sorted_by_key() {
        let key = [Some(3.0), Some(1.0), Some(3.0), Some(1.0), None];
        let out = [Some(0.0), Some(1.0), Some(1.0), Some(1.0), Some(1.0)];
        let rates = group_rates(&key, &out);
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].key, 1.0);
        assert_eq!(rates[0].rate, 1.0);
        assert_eq!(rates[0].ci95, 0.0);
        assert_eq!(rates[1].key, 3.0);
        assert_eq!(rates[1].rate, 0.5);
        assert!(rates[1].ci95 > 0.0);
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let values = [20.0, 22.0, 25.0, 30.0, 35.0, 40.0, 60.0];
        let kde = gaussian_kde(&values, 512).unwrap();
        let step = kde.grid[1] - kde.grid[0];
        let area: f64 = kde.density.iter().sum::<f64>() * step;
        assert!((area - 1.0).abs() < 0.02, "area {}", area);
        assert!(gaussian_kde(&[5.0, 5.0], 16).is_none());
    }

    #[test]
    fn quartiles_interpolate() {
        let (q1, med, q3) = quartiles(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!((q1, med, q3), (2.0, 3.0, 4.0));
        assert!(quartiles(&[]).is_none());
    }
}
