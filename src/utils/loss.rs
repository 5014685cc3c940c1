//! Loss functions over an output vector
//!
//! Each loss is the mean of a per-component penalty over the output vector.
//! `gradient` returns d(loss)/d(prediction) for every component, so the
//! backward pass can start directly from it.

use crate::error::NetworkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Threshold between the quadratic and linear regions of the Huber loss.
pub const HUBER_DELTA: f64 = 1.0;

/// Loss used for training and history bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    Mse,
    Mae,
    Huber,
    LogCosh,
}

impl Loss {
    pub const ALL: [Loss; 4] = [Loss::Mse, Loss::Mae, Loss::Huber, Loss::LogCosh];

    pub fn name(self) -> &'static str {
        match self {
            Loss::Mse => "mse",
            Loss::Mae => "mae",
            Loss::Huber => "huber",
            Loss::LogCosh => "log_cosh",
        }
    }

    /// Mean loss over all output components.
    ///
    /// # Panics
    ///
    /// Panics if `prediction` and `target` have different lengths.
    pub fn compute(self, prediction: &[f64], target: &[f64]) -> f64 {
        assert_eq!(
            prediction.len(),
            target.len(),
            "prediction and target must have the same length"
        );
        if prediction.is_empty() {
            return 0.0;
        }
        let total: f64 = prediction
            .iter()
            .zip(target)
            .map(|(&p, &t)| self.penalty(p - t))
            .sum();
        total / prediction.len() as f64
    }

    /// Gradient of [`Loss::compute`] with respect to each prediction component.
    ///
    /// # Panics
    ///
    /// Panics if `prediction` and `target` have different lengths.
    pub fn gradient(self, prediction: &[f64], target: &[f64]) -> Vec<f64> {
        assert_eq!(
            prediction.len(),
            target.len(),
            "prediction and target must have the same length"
        );
        let n = prediction.len() as f64;
        prediction
            .iter()
            .zip(target)
            .map(|(&p, &t)| self.penalty_slope(p - t) / n)
            .collect()
    }

    fn penalty(self, diff: f64) -> f64 {
        match self {
            Loss::Mse => diff * diff,
            Loss::Mae => diff.abs(),
            Loss::Huber => {
                let abs = diff.abs();
                if abs <= HUBER_DELTA {
                    0.5 * diff * diff
                } else {
                    HUBER_DELTA * (abs - 0.5 * HUBER_DELTA)
                }
            }
            // log(cosh(d)) = |d| + log(1 + e^{-2|d|}) - log 2
            Loss::LogCosh => {
                let abs = diff.abs();
                abs + (-2.0 * abs).exp().ln_1p() - std::f64::consts::LN_2
            }
        }
    }

    fn penalty_slope(self, diff: f64) -> f64 {
        match self {
            Loss::Mse => 2.0 * diff,
            Loss::Mae => {
                if diff > 0.0 {
                    1.0
                } else if diff < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            Loss::Huber => diff.clamp(-HUBER_DELTA, HUBER_DELTA),
            Loss::LogCosh => diff.tanh(),
        }
    }
}

impl FromStr for Loss {
    type Err = NetworkError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let lowered = name.trim().to_lowercase();
        let key = match lowered.as_str() {
            "logcosh" | "log-cosh" => "log_cosh",
            other => other,
        };
        Loss::ALL
            .iter()
            .copied()
            .find(|l| l.name() == key)
            .ok_or_else(|| NetworkError::configuration(format!("unknown loss '{}'", name)))
    }
}

impl fmt::Display for Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_mse_value_and_gradient() {
        let pred = [1.0, 3.0];
        let target = [0.0, 1.0];
        // ((1)^2 + (2)^2) / 2
        assert!((Loss::Mse.compute(&pred, &target) - 2.5).abs() < EPSILON);
        assert_eq!(Loss::Mse.gradient(&pred, &target), vec![1.0, 2.0]);
    }

    #[test]
    fn test_mae_gradient_is_sign() {
        let grad = Loss::Mae.gradient(&[2.0, -2.0, 0.0], &[0.0, 0.0, 0.0]);
        let third = 1.0 / 3.0;
        assert_eq!(grad, vec![third, -third, 0.0]);
    }

    #[test]
    fn test_huber_regions() {
        assert!((Loss::Huber.compute(&[0.5], &[0.0]) - 0.125).abs() < EPSILON);
        assert!((Loss::Huber.compute(&[3.0], &[0.0]) - 2.5).abs() < EPSILON);
        assert_eq!(Loss::Huber.gradient(&[3.0], &[0.0]), vec![1.0]);
    }

    #[test]
    fn test_log_cosh_matches_direct_formula() {
        for &d in &[-3.0f64, -0.2, 0.0, 0.7, 5.0] {
            let direct = d.cosh().ln();
            assert!((Loss::LogCosh.compute(&[d], &[0.0]) - direct).abs() < 1e-12);
        }
        // Stays finite where cosh overflows
        assert!(Loss::LogCosh.compute(&[1000.0], &[0.0]).is_finite());
    }

    #[test]
    fn test_gradients_match_finite_differences() {
        let h = 1e-6;
        let target = [0.3, -1.2];
        let pred = [1.1, -0.4];
        for loss in Loss::ALL {
            let grad = loss.gradient(&pred, &target);
            for i in 0..pred.len() {
                let mut plus = pred;
                let mut minus = pred;
                plus[i] += h;
                minus[i] -= h;
                let numeric = (loss.compute(&plus, &target) - loss.compute(&minus, &target)) / (2.0 * h);
                assert!(
                    (numeric - grad[i]).abs() < 1e-6,
                    "{} gradient mismatch: analytic {}, numeric {}",
                    loss,
                    grad[i],
                    numeric
                );
            }
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("mse".parse::<Loss>().unwrap(), Loss::Mse);
        assert_eq!("log_cosh".parse::<Loss>().unwrap(), Loss::LogCosh);
        assert!(matches!(
            "cross_entropy".parse::<Loss>(),
            Err(NetworkError::Configuration(_))
        ));
    }
}
