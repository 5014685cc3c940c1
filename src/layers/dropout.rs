//! Inverted dropout for hidden layers
//!
//! During a training-mode forward pass each hidden neuron is kept with
//! probability `1 - rate`. Kept units are scaled by `1 / (1 - rate)` so the
//! expected activation is unchanged, and dropped units output zero. The same
//! mask is reused by the backward pass, so no gradient flows through a
//! dropped unit. Inference passes never draw a mask.

use crate::error::{NetworkError, Result};
use crate::utils::SimpleRng;

/// Check that a dropout rate lies in `[0, 1)`.
pub fn validate_rate(rate: f64) -> Result<()> {
    if (0.0..1.0).contains(&rate) {
        Ok(())
    } else {
        Err(NetworkError::configuration(format!(
            "dropout rate must be in [0, 1), got {}",
            rate
        )))
    }
}

/// Keep/drop decision for every neuron of one hidden layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DropoutMask {
    keep: Vec<bool>,
    scale: f64,
}

impl DropoutMask {
    /// Draw a fresh mask of `size` Bernoulli(1 - rate) trials.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is outside `[0, 1)`; the network validates it when the
    /// rate is set.
    pub fn draw(size: usize, rate: f64, rng: &mut SimpleRng) -> Self {
        assert!(
            (0.0..1.0).contains(&rate),
            "dropout rate must be in range [0.0, 1.0)"
        );
        let keep_prob = 1.0 - rate;
        let keep = (0..size).map(|_| rng.gen_bool(keep_prob)).collect();
        Self {
            keep,
            scale: 1.0 / keep_prob,
        }
    }

    pub fn len(&self) -> usize {
        self.keep.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keep.is_empty()
    }

    pub fn is_kept(&self, index: usize) -> bool {
        self.keep[index]
    }

    /// Multiplier applied to unit `index`: `1/(1-rate)` if kept, else 0.
    pub fn factor(&self, index: usize) -> f64 {
        if self.keep[index] {
            self.scale
        } else {
            0.0
        }
    }

    /// Scale kept units and zero dropped ones in place.
    pub fn apply(&self, values: &mut [f64]) {
        for (i, v) in values.iter_mut().enumerate() {
            *v *= self.factor(i);
        }
    }

    pub fn dropped_count(&self) -> usize {
        self.keep.iter().filter(|&&k| !k).count()
    }
}
