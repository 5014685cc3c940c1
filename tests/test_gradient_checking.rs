// Tests for numerical gradient checking using finite differences.
// Every analytic gradient from the backward pass is compared with a centered
// difference of the loss, perturbing one parameter at a time through an
// exported model document.

use nn_playground::config::NetworkConfig;
use nn_playground::layers::DenseLayer;
use nn_playground::network::backward::backward_pass;
use nn_playground::network::forward::forward_pass;
use nn_playground::network::ModelDocument;
use nn_playground::utils::{Activation, Loss};
use nn_playground::Network;

const EPSILON: f64 = 1e-5;
const TOLERANCE: f64 = 1e-4;

// ============================================================================
// Helpers
// ============================================================================

fn build_doc(architecture: &[usize], activation: &str, seed: u64) -> ModelDocument {
    let config = NetworkConfig {
        architecture: architecture.to_vec(),
        activation: activation.to_string(),
        optimizer: "sgd".to_string(),
        learning_rate: 0.1,
        initializer: "xavier".to_string(),
        seed,
        ..NetworkConfig::default()
    };
    let mut doc = Network::from_config(&config).unwrap().export_model();
    // Non-zero biases so every term of the chain rule is exercised
    for (l, biases) in doc.biases.iter_mut().enumerate() {
        for (i, b) in biases.iter_mut().enumerate() {
            *b = 0.1 * (i as f64 + 1.0) - 0.05 * l as f64;
        }
    }
    doc
}

fn layers_of(doc: &ModelDocument) -> Vec<DenseLayer> {
    doc.to_layers().unwrap().1
}

fn loss_at(doc: &ModelDocument, activation: Activation, loss: Loss, input: &[f64], target: &[f64]) -> f64 {
    let layers = layers_of(doc);
    let cache = forward_pass(&layers, activation, input, None).unwrap();
    loss.compute(cache.output(), target)
}

/// Compare every weight and bias gradient against a centered difference.
fn check_gradients(
    architecture: &[usize],
    activation: Activation,
    loss: Loss,
    input: &[f64],
    target: &[f64],
) {
    let doc = build_doc(architecture, activation.name(), 7);
    let layers = layers_of(&doc);
    let cache = forward_pass(&layers, activation, input, None).unwrap();
    let grads = backward_pass(&layers, activation, loss, &cache, target).unwrap();

    for l in 0..layers.len() {
        for out in 0..layers[l].output_size() {
            for inp in 0..layers[l].input_size() {
                let mut plus = doc.clone();
                plus.weights[l][out][inp] += EPSILON;
                let mut minus = doc.clone();
                minus.weights[l][out][inp] -= EPSILON;
                let numerical = (loss_at(&plus, activation, loss, input, target)
                    - loss_at(&minus, activation, loss, input, target))
                    / (2.0 * EPSILON);
                let analytical = grads[l].weights[out][inp];
                assert!(
                    (numerical - analytical).abs() < TOLERANCE,
                    "{}/{} weight [{}][{}][{}]: numerical {} vs analytical {}",
                    activation,
                    loss,
                    l,
                    out,
                    inp,
                    numerical,
                    analytical
                );
            }

            let mut plus = doc.clone();
            plus.biases[l][out] += EPSILON;
            let mut minus = doc.clone();
            minus.biases[l][out] -= EPSILON;
            let numerical = (loss_at(&plus, activation, loss, input, target)
                - loss_at(&minus, activation, loss, input, target))
                / (2.0 * EPSILON);
            let analytical = grads[l].biases[out];
            assert!(
                (numerical - analytical).abs() < TOLERANCE,
                "{}/{} bias [{}][{}]: numerical {} vs analytical {}",
                activation,
                loss,
                l,
                out,
                numerical,
                analytical
            );
        }
    }
}

// ============================================================================
// Small networks
// ============================================================================

#[test]
fn test_gradient_check_1_3_1_tanh_mse() {
    check_gradients(&[1, 3, 1], Activation::Tanh, Loss::Mse, &[0.37], &[0.8]);
}

#[test]
fn test_gradient_check_1_3_1_sigmoid_mse() {
    check_gradients(&[1, 3, 1], Activation::Sigmoid, Loss::Mse, &[-0.6], &[0.25]);
}

#[test]
fn test_gradient_check_single_layer() {
    check_gradients(&[2, 1], Activation::Tanh, Loss::Mse, &[0.3, -0.9], &[1.5]);
}

// ============================================================================
// Deeper and wider networks
// ============================================================================

#[test]
fn test_gradient_check_two_hidden_layers() {
    check_gradients(&[2, 4, 3, 1], Activation::Gelu, Loss::Mse, &[0.5, -0.25], &[-0.4]);
}

#[test]
fn test_gradient_check_multiple_outputs() {
    check_gradients(&[2, 3, 2], Activation::Swish, Loss::Mse, &[0.9, 0.1], &[0.3, -0.7]);
}

// ============================================================================
// Every smooth activation
// ============================================================================

#[test]
fn test_gradient_check_smooth_activations() {
    let smooth = [
        Activation::Linear,
        Activation::Sigmoid,
        Activation::Tanh,
        Activation::Elu,
        Activation::Gelu,
        Activation::Swish,
        Activation::Mish,
        Activation::Softplus,
        Activation::Softsign,
        Activation::Celu,
    ];
    for activation in smooth {
        check_gradients(&[1, 4, 1], activation, Loss::Mse, &[0.45], &[-0.3]);
    }
}

// ============================================================================
// Every loss
// ============================================================================

#[test]
fn test_gradient_check_losses() {
    // Targets far from any output keep MAE and Huber away from their kinks
    for loss in [Loss::Mae, Loss::Huber, Loss::LogCosh] {
        check_gradients(&[1, 3, 2], Activation::Tanh, loss, &[0.2], &[4.0, -4.0]);
    }
    check_gradients(&[1, 3, 1], Activation::Tanh, Loss::Huber, &[0.2], &[0.1]);
    check_gradients(&[1, 3, 1], Activation::Tanh, Loss::LogCosh, &[0.2], &[0.1]);
}
