//! Dense (fully connected) layer parameters
//!
//! A [`DenseLayer`] stores its weights as `[out][in]` rows so that each row
//! holds the incoming weights of one neuron, the same indexing the network
//! diagram uses. [`LayerGradients`] mirrors that shape exactly.

use crate::utils::{Initializer, SimpleRng};

/// Weights `[out][in]` and biases `[out]` of one layer.
///
/// # Example
///
/// ```
/// use nn_playground::layers::DenseLayer;
/// use nn_playground::utils::{Initializer, SimpleRng};
///
/// let mut rng = SimpleRng::new(42);
/// let layer = DenseLayer::new(3, 2, Initializer::Xavier, &mut rng);
/// assert_eq!(layer.input_size(), 3);
/// assert_eq!(layer.output_size(), 2);
/// assert_eq!(layer.parameter_count(), 8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    pub(crate) weights: Vec<Vec<f64>>,
    pub(crate) biases: Vec<f64>,
}

impl DenseLayer {
    /// Create a layer with weights drawn from `init` and zero biases.
    pub fn new(input_size: usize, output_size: usize, init: Initializer, rng: &mut SimpleRng) -> Self {
        let weights = (0..output_size)
            .map(|_| {
                (0..input_size)
                    .map(|_| init.sample(input_size, output_size, rng))
                    .collect()
            })
            .collect();

        Self {
            weights,
            biases: vec![0.0; output_size],
        }
    }

    /// Build a layer from explicit arrays. Callers validate shapes first.
    pub(crate) fn from_parts(weights: Vec<Vec<f64>>, biases: Vec<f64>) -> Self {
        Self { weights, biases }
    }

    pub fn input_size(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    pub fn output_size(&self) -> usize {
        self.biases.len()
    }

    pub fn parameter_count(&self) -> usize {
        self.output_size() * self.input_size() + self.output_size()
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// `W·x + b` for a single input vector.
    pub fn pre_activation(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, &bias)| bias + row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>())
            .collect()
    }

    /// `Wᵗ·delta`: gradient flowing back into this layer's input.
    pub fn transpose_mul(&self, delta: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.input_size()];
        for (row, &d) in self.weights.iter().zip(delta) {
            for (o, &w) in out.iter_mut().zip(row) {
                *o += w * d;
            }
        }
        out
    }

    /// Every parameter in canonical order: weights row by row, then biases.
    pub fn params(&self) -> impl Iterator<Item = &f64> {
        self.weights.iter().flatten().chain(self.biases.iter())
    }

    pub(crate) fn params_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.weights.iter_mut().flatten().chain(self.biases.iter_mut())
    }
}

/// Gradients for one layer, shaped exactly like its [`DenseLayer`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl LayerGradients {
    pub fn zeros_like(layer: &DenseLayer) -> Self {
        Self {
            weights: vec![vec![0.0; layer.input_size()]; layer.output_size()],
            biases: vec![0.0; layer.output_size()],
        }
    }

    /// Element-wise `self += other`.
    pub fn accumulate(&mut self, other: &LayerGradients) {
        for (row, other_row) in self.weights.iter_mut().zip(&other.weights) {
            for (g, o) in row.iter_mut().zip(other_row) {
                *g += o;
            }
        }
        for (g, o) in self.biases.iter_mut().zip(&other.biases) {
            *g += o;
        }
    }

    /// Same canonical order as [`DenseLayer::params`].
    pub fn values(&self) -> impl Iterator<Item = &f64> {
        self.weights.iter().flatten().chain(self.biases.iter())
    }
}
