//! Reverse-mode gradient computation for one sample

use crate::error::{NetworkError, Result};
use crate::layers::{DenseLayer, LayerGradients};
use crate::network::forward::ForwardCache;
use crate::utils::{Activation, Loss};

/// Gradients of `loss(output, target)` for every weight and bias.
///
/// The output layer is linear, so its pre-activation gradient is the loss
/// gradient itself. Walking backward, each layer's gradient is pushed through
/// `Wᵗ`, then through the previous layer's dropout mask and activation
/// derivative (evaluated at that layer's own pre-activation).
pub fn backward_pass(
    layers: &[DenseLayer],
    activation: Activation,
    loss: Loss,
    cache: &ForwardCache,
    target: &[f64],
) -> Result<Vec<LayerGradients>> {
    check_cache(layers, cache)?;
    let output = cache.output();
    NetworkError::check_len("target", output.len(), target.len())?;

    let mut delta = loss.gradient(output, target);
    let mut grads = Vec::with_capacity(layers.len());

    for l in (0..layers.len()).rev() {
        let input = &cache.layer_outputs[l];
        let weights: Vec<Vec<f64>> = delta
            .iter()
            .map(|&d| input.iter().map(|&x| d * x).collect::<Vec<f64>>())
            .collect();
        grads.push(LayerGradients {
            weights,
            biases: delta.clone(),
        });

        if l > 0 {
            let mut propagated = layers[l].transpose_mul(&delta);
            let mask = cache.mask(l - 1);
            for (j, g) in propagated.iter_mut().enumerate() {
                if let Some(mask) = mask {
                    *g *= mask.factor(j);
                }
                *g *= activation.derivative(cache.pre_activations[l - 1][j]);
            }
            delta = propagated;
        }
    }

    grads.reverse();
    Ok(grads)
}

/// `Shape` error unless `cache` was produced by layers of these widths.
fn check_cache(layers: &[DenseLayer], cache: &ForwardCache) -> Result<()> {
    if cache.pre_activations.len() != layers.len()
        || cache.layer_outputs.len() != layers.len() + 1
        || cache.masks.len() != layers.len()
    {
        return Err(NetworkError::shape(format!(
            "forward cache has {} layers, network has {}",
            cache.pre_activations.len(),
            layers.len()
        )));
    }
    for (l, layer) in layers.iter().enumerate() {
        NetworkError::check_len(
            &format!("cached input of layer {}", l),
            layer.input_size(),
            cache.layer_outputs[l].len(),
        )?;
        NetworkError::check_len(
            &format!("cached pre-activation of layer {}", l),
            layer.output_size(),
            cache.pre_activations[l].len(),
        )?;
        NetworkError::check_len(
            &format!("cached output of layer {}", l),
            layer.output_size(),
            cache.layer_outputs[l + 1].len(),
        )?;
        if let Some(mask) = cache.mask(l) {
            NetworkError::check_len(&format!("dropout mask of layer {}", l), layer.output_size(), mask.len())?;
        }
    }
    Ok(())
}
