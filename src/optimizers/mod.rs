//! Optimizers that turn an accumulated gradient into a parameter update
//!
//! The optimizer is chosen by name ([`OptimizerKind`]) and carries only the
//! auxiliary buffers its update rule needs ([`OptimizerState`]). Buffers are
//! flat and follow the canonical parameter order: for every layer, weights
//! row by row, then biases.
//!
//! # Available Optimizers
//!
//! - `sgd`: vanilla gradient descent
//! - `momentum`: heavy-ball momentum (β = 0.9)
//! - `rmsprop`: moving average of squared gradients (β = 0.9)
//! - `adagrad`: accumulated squared gradients
//! - `adam`: bias-corrected first and second moments
//! - `nadam`: Adam with a Nesterov lookahead on the first moment
//!
//! # Example
//!
//! ```
//! use nn_playground::layers::{DenseLayer, LayerGradients};
//! use nn_playground::optimizers::{Optimizer, OptimizerKind};
//! use nn_playground::utils::{Initializer, SimpleRng};
//!
//! let mut rng = SimpleRng::new(1);
//! let mut layers = vec![DenseLayer::new(2, 1, Initializer::Ones, &mut rng)];
//! let mut grads = vec![LayerGradients::zeros_like(&layers[0])];
//! grads[0].weights[0][0] = 1.0;
//!
//! let mut optimizer = Optimizer::new(OptimizerKind::Sgd, 0.1, 3).unwrap();
//! optimizer.step(&mut layers, &grads);
//! assert!((layers[0].weights()[0][0] - 0.9).abs() < 1e-12);
//! ```

pub mod adam;
pub mod adaptive;
pub mod sgd;

use crate::error::{NetworkError, Result};
use crate::layers::{DenseLayer, LayerGradients};
use adam::Moments;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Optimizer selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    Sgd,
    Momentum,
    Rmsprop,
    Adagrad,
    Adam,
    Nadam,
}

impl OptimizerKind {
    pub const ALL: [OptimizerKind; 6] = [
        OptimizerKind::Sgd,
        OptimizerKind::Momentum,
        OptimizerKind::Rmsprop,
        OptimizerKind::Adagrad,
        OptimizerKind::Adam,
        OptimizerKind::Nadam,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OptimizerKind::Sgd => "sgd",
            OptimizerKind::Momentum => "momentum",
            OptimizerKind::Rmsprop => "rmsprop",
            OptimizerKind::Adagrad => "adagrad",
            OptimizerKind::Adam => "adam",
            OptimizerKind::Nadam => "nadam",
        }
    }
}

impl FromStr for OptimizerKind {
    type Err = NetworkError;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        let key = name.trim().to_lowercase();
        OptimizerKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == key)
            .ok_or_else(|| NetworkError::configuration(format!("unknown optimizer '{}'", name)))
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Auxiliary per-parameter state, one variant per optimizer family.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizerState {
    /// sgd
    Stateless,
    /// momentum
    Velocity(Vec<f64>),
    /// rmsprop
    SquareAverage(Vec<f64>),
    /// adagrad
    Accumulator(Vec<f64>),
    /// adam and nadam
    Moments(Moments),
}

impl OptimizerState {
    fn fresh(kind: OptimizerKind, parameter_count: usize) -> Self {
        match kind {
            OptimizerKind::Sgd => OptimizerState::Stateless,
            OptimizerKind::Momentum => OptimizerState::Velocity(vec![0.0; parameter_count]),
            OptimizerKind::Rmsprop => OptimizerState::SquareAverage(vec![0.0; parameter_count]),
            OptimizerKind::Adagrad => OptimizerState::Accumulator(vec![0.0; parameter_count]),
            OptimizerKind::Adam | OptimizerKind::Nadam => {
                OptimizerState::Moments(Moments::new(parameter_count))
            }
        }
    }
}

/// An optimizer kind, its learning rate and its state.
///
/// Changing the kind or learning rate means building a new `Optimizer`; no
/// state is carried over.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimizer {
    kind: OptimizerKind,
    learning_rate: f64,
    parameter_count: usize,
    steps: u64,
    state: OptimizerState,
}

impl Optimizer {
    /// Allocate zeroed state for `parameter_count` parameters.
    ///
    /// Fails with `Configuration` if the learning rate is not a positive
    /// finite number.
    pub fn new(kind: OptimizerKind, learning_rate: f64, parameter_count: usize) -> Result<Self> {
        validate_learning_rate(learning_rate)?;
        Ok(Self {
            kind,
            learning_rate,
            parameter_count,
            steps: 0,
            state: OptimizerState::fresh(kind, parameter_count),
        })
    }

    pub fn kind(&self) -> OptimizerKind {
        self.kind
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Number of steps applied since construction or the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn state(&self) -> &OptimizerState {
        &self.state
    }

    /// Discard all auxiliary state.
    pub fn reset(&mut self) {
        self.steps = 0;
        self.state = OptimizerState::fresh(self.kind, self.parameter_count);
    }

    /// Apply one update to every parameter using `grads`.
    ///
    /// # Panics
    ///
    /// Panics if `grads` is not shaped like `layers` or the total parameter
    /// count differs from the one this optimizer was built for.
    pub fn step(&mut self, layers: &mut [DenseLayer], grads: &[LayerGradients]) {
        assert_eq!(layers.len(), grads.len(), "one gradient per layer required");
        let total: usize = layers.iter().map(DenseLayer::parameter_count).sum();
        assert_eq!(
            total, self.parameter_count,
            "optimizer state sized for {} parameters, network has {}",
            self.parameter_count, total
        );

        let lr = self.learning_rate;
        let pairs = layers
            .iter_mut()
            .zip(grads)
            .flat_map(|(layer, grad)| layer.params_mut().zip(grad.values()));

        match &mut self.state {
            OptimizerState::Stateless => {
                for (p, &g) in pairs {
                    sgd::sgd_update(p, g, lr);
                }
            }
            OptimizerState::Velocity(velocity) => {
                for ((p, &g), v) in pairs.zip(velocity.iter_mut()) {
                    sgd::momentum_update(p, v, g, lr);
                }
            }
            OptimizerState::SquareAverage(square_avg) => {
                for ((p, &g), s) in pairs.zip(square_avg.iter_mut()) {
                    adaptive::rmsprop_update(p, s, g, lr);
                }
            }
            OptimizerState::Accumulator(accumulator) => {
                for ((p, &g), s) in pairs.zip(accumulator.iter_mut()) {
                    adaptive::adagrad_update(p, s, g, lr);
                }
            }
            OptimizerState::Moments(moments) => {
                let corrections = moments.begin_step();
                let nesterov = self.kind == OptimizerKind::Nadam;
                for (i, (p, &g)) in pairs.enumerate() {
                    if nesterov {
                        moments.nadam_update(i, p, g, lr, corrections);
                    } else {
                        moments.adam_update(i, p, g, lr, corrections);
                    }
                }
            }
        }
        self.steps += 1;
    }
}

/// Learning rates must be positive and finite.
pub fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if learning_rate.is_finite() && learning_rate > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::configuration(format!(
            "learning rate must be a positive finite number, got {}",
            learning_rate
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Initializer, SimpleRng};

    fn setup() -> (Vec<DenseLayer>, Vec<LayerGradients>) {
        let mut rng = SimpleRng::new(3);
        let layers = vec![
            DenseLayer::new(2, 3, Initializer::Ones, &mut rng),
            DenseLayer::new(3, 1, Initializer::Ones, &mut rng),
        ];
        let mut grads: Vec<LayerGradients> = layers.iter().map(LayerGradients::zeros_like).collect();
        grads[0].weights[1][0] = 0.5;
        grads[1].biases[0] = -2.0;
        (layers, grads)
    }

    #[test]
    fn test_parse_kind() {
        for kind in OptimizerKind::ALL {
            assert_eq!(kind.name().parse::<OptimizerKind>().unwrap(), kind);
        }
        assert!(matches!(
            "lbfgs".parse::<OptimizerKind>(),
            Err(NetworkError::Configuration(_))
        ));
    }

    #[test]
    fn test_state_matches_kind() {
        let opt = Optimizer::new(OptimizerKind::Sgd, 0.1, 13).unwrap();
        assert_eq!(opt.state(), &OptimizerState::Stateless);

        let opt = Optimizer::new(OptimizerKind::Momentum, 0.1, 13).unwrap();
        assert!(matches!(opt.state(), OptimizerState::Velocity(v) if v.len() == 13));

        let opt = Optimizer::new(OptimizerKind::Nadam, 0.1, 13).unwrap();
        assert!(matches!(opt.state(), OptimizerState::Moments(m) if m.m.len() == 13));
    }

    #[test]
    fn test_rejects_bad_learning_rate() {
        assert!(Optimizer::new(OptimizerKind::Adam, 0.0, 4).is_err());
        assert!(Optimizer::new(OptimizerKind::Adam, -0.1, 4).is_err());
        assert!(Optimizer::new(OptimizerKind::Adam, f64::NAN, 4).is_err());
    }

    #[test]
    fn test_sgd_step_touches_only_nonzero_gradients() {
        let (mut layers, grads) = setup();
        let mut opt = Optimizer::new(OptimizerKind::Sgd, 0.1, 13).unwrap();
        opt.step(&mut layers, &grads);

        assert!((layers[0].weights()[1][0] - 0.95).abs() < 1e-12);
        assert!((layers[1].biases()[0] - 0.2).abs() < 1e-12);
        assert_eq!(layers[0].weights()[0][0], 1.0);
        assert_eq!(opt.steps(), 1);
    }

    #[test]
    fn test_every_kind_descends_on_positive_gradient() {
        for kind in OptimizerKind::ALL {
            let (mut layers, grads) = setup();
            let mut opt = Optimizer::new(kind, 0.01, 13).unwrap();
            opt.step(&mut layers, &grads);
            assert!(layers[0].weights()[1][0] < 1.0, "{} did not descend", kind);
            assert!(layers[1].biases()[0] > 0.0, "{} did not ascend on negative gradient", kind);
        }
    }

    #[test]
    fn test_reset_clears_state() {
        let (mut layers, grads) = setup();
        let mut opt = Optimizer::new(OptimizerKind::Adam, 0.01, 13).unwrap();
        opt.step(&mut layers, &grads);
        opt.step(&mut layers, &grads);

        opt.reset();
        assert_eq!(opt.steps(), 0);
        assert_eq!(opt.state(), &OptimizerState::Moments(Moments::new(13)));
    }
}
