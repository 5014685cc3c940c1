//! Live parameters plus the independent "initial" baseline
//!
//! The baseline is a separate deep copy, never an alias of the live layers.
//! Editing it only changes what the visualizers compare against; restoring
//! from it (on reset) copies it back into the live layers.

use crate::architecture::Architecture;
use crate::error::{NetworkError, Result};
use crate::layers::DenseLayer;
use crate::utils::{Initializer, SimpleRng};

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    layers: Vec<DenseLayer>,
    initial: Vec<DenseLayer>,
}

impl ParameterStore {
    /// Draw weights for every layer of `architecture`; biases start at zero.
    pub fn build(architecture: &Architecture, init: Initializer, rng: &mut SimpleRng) -> Self {
        let layers: Vec<DenseLayer> = architecture
            .layer_shapes()
            .map(|(fan_in, fan_out)| DenseLayer::new(fan_in, fan_out, init, rng))
            .collect();
        Self::from_layers(layers)
    }

    /// Wrap existing layers, snapshotting them as the baseline.
    pub fn from_layers(layers: Vec<DenseLayer>) -> Self {
        let initial = layers.clone();
        Self { layers, initial }
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [DenseLayer] {
        &mut self.layers
    }

    pub fn initial_layers(&self) -> &[DenseLayer] {
        &self.initial
    }

    /// Copy the baseline back into the live layers.
    pub fn restore_initial(&mut self) {
        self.layers.clone_from(&self.initial);
    }

    pub fn weight(&self, layer: usize, out: usize, input: usize) -> Result<f64> {
        check_weight_index(&self.layers, layer, out, input)?;
        Ok(self.layers[layer].weights[out][input])
    }

    pub fn bias(&self, layer: usize, index: usize) -> Result<f64> {
        check_bias_index(&self.layers, layer, index)?;
        Ok(self.layers[layer].biases[index])
    }

    pub fn initial_weight(&self, layer: usize, out: usize, input: usize) -> Result<f64> {
        check_weight_index(&self.initial, layer, out, input)?;
        Ok(self.initial[layer].weights[out][input])
    }

    pub fn initial_bias(&self, layer: usize, index: usize) -> Result<f64> {
        check_bias_index(&self.initial, layer, index)?;
        Ok(self.initial[layer].biases[index])
    }

    /// Overwrite one baseline weight; the live weight is untouched.
    pub fn edit_initial_weight(&mut self, layer: usize, out: usize, input: usize, value: f64) -> Result<()> {
        check_weight_index(&self.initial, layer, out, input)?;
        self.initial[layer].weights[out][input] = value;
        Ok(())
    }

    /// Overwrite one baseline bias; the live bias is untouched.
    pub fn edit_initial_bias(&mut self, layer: usize, index: usize, value: f64) -> Result<()> {
        check_bias_index(&self.initial, layer, index)?;
        self.initial[layer].biases[index] = value;
        Ok(())
    }

    /// `current - initial` for one weight.
    pub fn weight_delta(&self, layer: usize, out: usize, input: usize) -> Result<f64> {
        Ok(self.weight(layer, out, input)? - self.initial_weight(layer, out, input)?)
    }

    /// `current - initial` for one bias.
    pub fn bias_delta(&self, layer: usize, index: usize) -> Result<f64> {
        Ok(self.bias(layer, index)? - self.initial_bias(layer, index)?)
    }
}

fn check_layer(layers: &[DenseLayer], layer: usize) -> Result<&DenseLayer> {
    layers.get(layer).ok_or_else(|| {
        NetworkError::index(format!(
            "layer {} does not exist (network has {} weight layers)",
            layer,
            layers.len()
        ))
    })
}

fn check_weight_index(layers: &[DenseLayer], layer: usize, out: usize, input: usize) -> Result<()> {
    let l = check_layer(layers, layer)?;
    if out >= l.output_size() || input >= l.input_size() {
        return Err(NetworkError::index(format!(
            "weight ({}, {}) outside layer {} of shape {}x{}",
            out,
            input,
            layer,
            l.output_size(),
            l.input_size()
        )));
    }
    Ok(())
}

fn check_bias_index(layers: &[DenseLayer], layer: usize, index: usize) -> Result<()> {
    let l = check_layer(layers, layer)?;
    if index >= l.output_size() {
        return Err(NetworkError::index(format!(
            "bias {} outside layer {} with {} neurons",
            index,
            layer,
            l.output_size()
        )));
    }
    Ok(())
}
