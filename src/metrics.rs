//! Fit metrics for single-output regression
//!
//! Besides the usual MSE/MAE/R², predictions are scored with a
//! classification-style confusion matrix: a prediction within `threshold`
//! (relative to the target range, floored at 1) of its target is correct,
//! and which side of the target mid-range a value falls on makes it
//! "positive" or "negative".

use serde::Serialize;

/// Default tolerance for [`ConfusionMatrix::compute`].
pub const DEFAULT_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl ConfusionMatrix {
    /// Score `predictions` against `targets` (pairs beyond the shorter slice
    /// are ignored).
    pub fn compute(predictions: &[f64], targets: &[f64], threshold: f64) -> Self {
        let mut cm = Self::default();
        if targets.is_empty() {
            return cm;
        }
        let (min, max) = min_max(targets);
        let range = (max - min).max(1.0);
        let mid = (min + max) / 2.0;

        for (&pred, &target) in predictions.iter().zip(targets) {
            let correct = (pred - target).abs() / range <= threshold;
            let target_positive = target >= mid;
            let pred_positive = pred >= mid;

            // A wrong magnitude on the right side still counts as a hit.
            match (correct, target_positive, pred_positive) {
                (false, true, false) => cm.fn_ += 1,
                (false, false, true) => cm.fp += 1,
                (_, true, _) => cm.tp += 1,
                (_, false, _) => cm.tn += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }
}

/// Every metric at once, as shown in the metrics panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionMetrics {
    pub confusion_matrix: ConfusionMatrix,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub accuracy: f64,
    pub mse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn compute(predictions: &[f64], targets: &[f64], threshold: f64) -> Self {
        let cm = ConfusionMatrix::compute(predictions, targets, threshold);
        Self {
            confusion_matrix: cm,
            precision: cm.precision(),
            recall: cm.recall(),
            f1: cm.f1(),
            accuracy: cm.accuracy(),
            mse: mse(predictions, targets),
            mae: mae(predictions, targets),
            r2: r2(predictions, targets),
        }
    }
}

pub fn mse(predictions: &[f64], targets: &[f64]) -> f64 {
    mean_over(predictions, targets, |d| d * d)
}

pub fn mae(predictions: &[f64], targets: &[f64]) -> f64 {
    mean_over(predictions, targets, f64::abs)
}

/// Coefficient of determination; 1 when the targets are constant.
pub fn r2(predictions: &[f64], targets: &[f64]) -> f64 {
    if predictions.is_empty() || targets.is_empty() {
        return 0.0;
    }
    let mean = targets.iter().sum::<f64>() / targets.len() as f64;
    let (ss_res, ss_tot) = predictions
        .iter()
        .zip(targets)
        .fold((0.0, 0.0), |(res, tot), (&p, &t)| {
            (res + (t - p).powi(2), tot + (t - mean).powi(2))
        });
    if ss_tot == 0.0 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    }
}

/// Percentage fit used by the observation log:
/// `max(0, 1 - mean|err| / max(1, range)) * 100`.
pub fn fit_accuracy(predictions: &[f64], targets: &[f64]) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    let (min, max) = min_max(targets);
    let range = (max - min).max(1.0);
    let avg_error = mae(predictions, targets);
    ((1.0 - avg_error / range) * 100.0).max(0.0)
}

fn mean_over(predictions: &[f64], targets: &[f64], f: impl Fn(f64) -> f64) -> f64 {
    let n = predictions.len().min(targets.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = predictions.iter().zip(targets).map(|(&p, &t)| f(p - t)).sum();
    sum / n as f64
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
