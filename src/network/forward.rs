//! Forward propagation with a full per-layer cache
//!
//! For every layer `pre = W·x + b`. Hidden layers apply the activation (and,
//! in training mode, a dropout mask); the output layer is left linear so the
//! network can produce unbounded real values.

use crate::error::{NetworkError, Result};
use crate::layers::{DenseLayer, DropoutMask};
use crate::utils::{Activation, SimpleRng};

/// Everything one forward pass computed, kept for the backward pass and for
/// the forward-pass diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardCache {
    /// `pre_activations[l]` is `W_l·x + b_l` for weight layer `l`.
    pub(crate) pre_activations: Vec<Vec<f64>>,
    /// `layer_outputs[0]` is the input; `layer_outputs[l + 1]` is the
    /// post-activation (after dropout) of weight layer `l`.
    pub(crate) layer_outputs: Vec<Vec<f64>>,
    /// Dropout mask per weight layer; always `None` for the output layer and
    /// for inference passes.
    pub(crate) masks: Vec<Option<DropoutMask>>,
}

impl ForwardCache {
    pub fn input(&self) -> &[f64] {
        &self.layer_outputs[0]
    }

    /// Network output (last layer, no activation).
    pub fn output(&self) -> &[f64] {
        &self.layer_outputs[self.layer_outputs.len() - 1]
    }

    pub fn pre_activations(&self) -> &[Vec<f64>] {
        &self.pre_activations
    }

    /// Per-architecture-entry values: input first, output last.
    pub fn layer_outputs(&self) -> &[Vec<f64>] {
        &self.layer_outputs
    }

    pub fn mask(&self, layer: usize) -> Option<&DropoutMask> {
        self.masks.get(layer).and_then(Option::as_ref)
    }
}

/// Run one input through `layers`.
///
/// `dropout` is `Some((rate, rng))` for a training-mode pass; a mask is only
/// drawn when the rate is positive, so a zero rate behaves exactly like an
/// inference pass.
pub fn forward_pass(
    layers: &[DenseLayer],
    activation: Activation,
    input: &[f64],
    mut dropout: Option<(f64, &mut SimpleRng)>,
) -> Result<ForwardCache> {
    let expected = layers.first().map_or(0, DenseLayer::input_size);
    NetworkError::check_len("input", expected, input.len())?;

    let last = layers.len() - 1;
    let mut pre_activations = Vec::with_capacity(layers.len());
    let mut layer_outputs = Vec::with_capacity(layers.len() + 1);
    let mut masks = Vec::with_capacity(layers.len());
    layer_outputs.push(input.to_vec());

    for (l, layer) in layers.iter().enumerate() {
        let pre = layer.pre_activation(&layer_outputs[l]);
        let mut mask = None;
        let post = if l == last {
            pre.clone()
        } else {
            let mut post: Vec<f64> = pre.iter().map(|&z| activation.apply(z)).collect();
            if let Some((rate, rng)) = dropout.as_mut() {
                if *rate > 0.0 {
                    let m = DropoutMask::draw(post.len(), *rate, rng);
                    m.apply(&mut post);
                    mask = Some(m);
                }
            }
            post
        };
        pre_activations.push(pre);
        layer_outputs.push(post);
        masks.push(mask);
    }

    Ok(ForwardCache {
        pre_activations,
        layer_outputs,
        masks,
    })
}
