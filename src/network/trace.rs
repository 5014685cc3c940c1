//! Per-neuron breakdown of an inference pass
//!
//! The forward-pass diagram shows every `w·x` term feeding a neuron, and the
//! curve view splits the output into the weighted contribution of each
//! neuron in the last hidden layer. Both are computed here from the live
//! parameters without dropout.

use crate::error::{NetworkError, Result};
use crate::layers::DenseLayer;
use crate::utils::Activation;
use serde::Serialize;

/// One `weight * input` product feeding a neuron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeuronTerm {
    pub weight: f64,
    pub input: f64,
    pub product: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeuronTrace {
    pub terms: Vec<NeuronTerm>,
    pub weighted_sum: f64,
    pub bias: f64,
    pub pre_activation: f64,
    pub output: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerTrace {
    pub neurons: Vec<NeuronTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardTrace {
    pub input: Vec<f64>,
    pub activation: Activation,
    /// Input first, output last.
    pub layer_outputs: Vec<Vec<f64>>,
    pub layers: Vec<LayerTrace>,
}

impl ForwardTrace {
    pub fn output(&self) -> &[f64] {
        &self.layer_outputs[self.layer_outputs.len() - 1]
    }
}

/// Inference pass that records every term of every neuron.
pub fn trace_forward(layers: &[DenseLayer], activation: Activation, input: &[f64]) -> Result<ForwardTrace> {
    let expected = layers.first().map_or(0, DenseLayer::input_size);
    NetworkError::check_len("input", expected, input.len())?;

    let last = layers.len() - 1;
    let mut layer_outputs = vec![input.to_vec()];
    let mut traces = Vec::with_capacity(layers.len());

    for (l, layer) in layers.iter().enumerate() {
        let current = &layer_outputs[l];
        let neurons: Vec<NeuronTrace> = layer
            .weights()
            .iter()
            .zip(layer.biases())
            .map(|(row, &bias)| {
                let terms: Vec<NeuronTerm> = row
                    .iter()
                    .zip(current)
                    .map(|(&weight, &input)| NeuronTerm {
                        weight,
                        input,
                        product: weight * input,
                    })
                    .collect();
                let weighted_sum = terms.iter().map(|t| t.product).sum::<f64>();
                let pre_activation = weighted_sum + bias;
                let output = if l == last {
                    pre_activation
                } else {
                    activation.apply(pre_activation)
                };
                NeuronTrace {
                    terms,
                    weighted_sum,
                    bias,
                    pre_activation,
                    output,
                }
            })
            .collect();

        layer_outputs.push(neurons.iter().map(|n| n.output).collect());
        traces.push(LayerTrace { neurons });
    }

    Ok(ForwardTrace {
        input: input.to_vec(),
        activation,
        layer_outputs,
        layers: traces,
    })
}

/// Output of neuron 0 at one input point, split by last-hidden-layer neuron.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub x: f64,
    /// `activation[n] * w_out[0][n]` for each neuron `n` of the last hidden layer.
    pub weighted: Vec<f64>,
    /// Sum of `weighted` plus the output bias.
    pub result: f64,
}

/// Decompose the first output over scalar inputs `xs`.
///
/// Needs a single-input network with at least one hidden layer.
pub fn output_contributions(layers: &[DenseLayer], activation: Activation, xs: &[f64]) -> Result<Vec<Contribution>> {
    if layers.len() < 2 {
        return Err(NetworkError::configuration(
            "output decomposition needs at least one hidden layer",
        ));
    }
    let out_layer = &layers[layers.len() - 1];
    let out_weights = &out_layer.weights()[0];
    let out_bias = out_layer.biases()[0];

    xs.iter()
        .map(|&x| {
            let trace = trace_forward(layers, activation, &[x])?;
            let hidden = &trace.layer_outputs[trace.layer_outputs.len() - 2];
            let weighted: Vec<f64> = hidden.iter().zip(out_weights).map(|(a, w)| a * w).collect();
            let result = out_bias + weighted.iter().sum::<f64>();
            Ok(Contribution { x, weighted, result })
        })
        .collect()
}

/// Samples of the bare activation over z in [-3, 3], for drawing its shape.
pub fn activation_curve(activation: Activation, points: usize) -> Vec<(f64, f64)> {
    if points < 2 {
        return vec![(0.0, activation.apply(0.0))];
    }
    (0..points)
        .map(|i| {
            let z = -3.0 + 6.0 * i as f64 / (points - 1) as f64;
            (z, activation.apply(z))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layers() -> Vec<DenseLayer> {
        vec![
            DenseLayer::from_parts(vec![vec![1.0], vec![-1.0]], vec![0.5, 0.0]),
            DenseLayer::from_parts(vec![vec![2.0, 3.0]], vec![-1.0]),
        ]
    }

    #[test]
    fn test_trace_terms() {
        let trace = trace_forward(&layers(), Activation::Relu, &[2.0]).unwrap();

        let first = &trace.layers[0].neurons[0];
        assert_eq!(first.terms[0].product, 2.0);
        assert_eq!(first.pre_activation, 2.5);
        assert_eq!(first.output, 2.5);
        assert_eq!(trace.layers[0].neurons[1].output, 0.0);

        // 2 * 2.5 + 3 * 0 - 1, linear output
        assert_eq!(trace.output(), &[4.0]);
    }

    #[test]
    fn test_contributions_sum_to_output() {
        let contributions = output_contributions(&layers(), Activation::Tanh, &[-1.0, 0.0, 0.5]).unwrap();
        for c in &contributions {
            let trace = trace_forward(&layers(), Activation::Tanh, &[c.x]).unwrap();
            assert!((c.result - trace.output()[0]).abs() < 1e-12);
            assert_eq!(c.weighted.len(), 2);
        }
    }

    #[test]
    fn test_contributions_need_hidden_layer() {
        let single = vec![DenseLayer::from_parts(vec![vec![1.0]], vec![0.0])];
        assert!(matches!(
            output_contributions(&single, Activation::Tanh, &[0.0]),
            Err(NetworkError::Configuration(_))
        ));
    }

    #[test]
    fn test_activation_curve_range() {
        let curve = activation_curve(Activation::Sigmoid, 100);
        assert_eq!(curve.len(), 100);
        assert_eq!(curve[0].0, -3.0);
        assert_eq!(curve[99].0, 3.0);
    }
}
