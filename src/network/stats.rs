//! Summary statistics over all parameters

use crate::layers::{DenseLayer, LayerGradients};
use serde::Serialize;

/// Aggregate view of every weight and bias, refreshed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Mean |g| over the last epoch's accumulated gradient.
    pub mean_gradient: f64,
}

impl WeightStats {
    pub fn collect(layers: &[DenseLayer], gradients: &[LayerGradients]) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &p in layers.iter().flat_map(|layer| layer.params()) {
            count += 1;
            sum += p;
            min = min.min(p);
            max = max.max(p);
        }

        let mut grad_count = 0usize;
        let mut grad_sum = 0.0;
        for &g in gradients.iter().flat_map(|grad| grad.values()) {
            grad_count += 1;
            grad_sum += g.abs();
        }

        Self {
            count,
            min: if count > 0 { min } else { 0.0 },
            max: if count > 0 { max } else { 0.0 },
            mean: if count > 0 { sum / count as f64 } else { 0.0 },
            mean_gradient: if grad_count > 0 { grad_sum / grad_count as f64 } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect() {
        let layers = vec![DenseLayer::from_parts(vec![vec![1.0, -3.0]], vec![2.0])];
        let mut grads = vec![LayerGradients::zeros_like(&layers[0])];
        grads[0].weights[0][1] = -0.3;
        grads[0].biases[0] = 0.6;

        let stats = WeightStats::collect(&layers, &grads);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, -3.0);
        assert_eq!(stats.max, 2.0);
        assert!(stats.mean.abs() < 1e-12);
        assert!((stats.mean_gradient - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_nan_propagates_into_mean() {
        let layers = vec![DenseLayer::from_parts(vec![vec![f64::NAN]], vec![1.0])];
        let grads = vec![LayerGradients::zeros_like(&layers[0])];
        let stats = WeightStats::collect(&layers, &grads);
        assert!(stats.mean.is_nan());
        assert_eq!(stats.count, 2);
    }
}
