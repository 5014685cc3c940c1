//! Configuration structures for building a network
//!
//! This module provides the JSON-backed configuration used to construct a
//! [`Network`](crate::network::Network): architecture, registry names and the
//! training hyperparameters.

use crate::architecture::Architecture;
use crate::error::{NetworkError, Result};
use crate::layers::dropout::validate_rate;
use crate::optimizers::{validate_learning_rate, OptimizerKind};
use crate::utils::{Activation, Initializer, Loss};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a network, including registry names and hyperparameters
///
/// Names are kept as strings so a config file can be read before anything is
/// resolved; [`validate_config`] checks every one of them. Fields other than
/// the first four are optional:
///
/// - **loss**: defaults to `mse`
/// - **initializer**: defaults to `xavier`
/// - **dropout_rate**: defaults to `0.0` (no dropout)
/// - **seed**: defaults to `42`
///
/// # Example
///
/// ```json
/// {
///   "architecture": [1, 8, 8, 1],
///   "activation": "tanh",
///   "optimizer": "adam",
///   "learning_rate": 0.01,
///   "loss": "huber",
///   "dropout_rate": 0.1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Layer widths, input through output.
    pub architecture: Vec<usize>,

    /// Hidden-layer activation name, e.g. "sigmoid", "tanh", "relu".
    pub activation: String,

    /// Optimizer name: "sgd", "momentum", "rmsprop", "adagrad", "adam" or "nadam".
    pub optimizer: String,

    pub learning_rate: f64,

    /// Loss name: "mse", "mae", "huber" or "log_cosh".
    #[serde(default = "default_loss")]
    pub loss: String,

    /// Weight initializer name.
    #[serde(default = "default_initializer")]
    pub initializer: String,

    /// Probability of dropping a hidden unit during training, in [0, 1).
    #[serde(default)]
    pub dropout_rate: f64,

    /// Seed for weight initialization and dropout masks.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_loss() -> String {
    Loss::Mse.name().to_string()
}

fn default_initializer() -> String {
    Initializer::Xavier.name().to_string()
}

fn default_seed() -> u64 {
    42
}

impl Default for NetworkConfig {
    /// The application's start-up network: `[1, 8, 8, 1]`, sigmoid, adam at 0.01.
    fn default() -> Self {
        Self {
            architecture: vec![1, 8, 8, 1],
            activation: Activation::Sigmoid.name().to_string(),
            optimizer: OptimizerKind::Adam.name().to_string(),
            learning_rate: 0.01,
            loss: default_loss(),
            initializer: default_initializer(),
            dropout_rate: 0.0,
            seed: default_seed(),
        }
    }
}

/// Every name in a [`NetworkConfig`], resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub architecture: Architecture,
    pub activation: Activation,
    pub optimizer: OptimizerKind,
    pub learning_rate: f64,
    pub loss: Loss,
    pub initializer: Initializer,
    pub dropout_rate: f64,
    pub seed: u64,
}

/// Loads a network configuration from a JSON file.
///
/// Reads the file at `path`, deserializes it into a `NetworkConfig` and
/// validates it.
///
/// # Returns
///
/// `Ok(NetworkConfig)` on success, `Io` if the file cannot be read, `Json` if
/// it is not a valid config document and `Configuration` if a name or rate is
/// rejected.
///
/// # Examples
///
/// ```no_run
/// use nn_playground::config::load_config;
///
/// let cfg = load_config("config/sine_tanh_adam.json").unwrap();
/// assert_eq!(cfg.activation, "tanh");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<NetworkConfig> {
    let contents = fs::read_to_string(path)?;
    let config: NetworkConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Resolve every name and check every rate, failing on the first bad one.
pub fn validate_config(config: &NetworkConfig) -> Result<ResolvedConfig> {
    let architecture = Architecture::new(config.architecture.clone())?;
    let activation: Activation = config.activation.parse()?;
    let optimizer: OptimizerKind = config.optimizer.parse()?;
    let loss: Loss = config.loss.parse()?;
    let initializer: Initializer = config.initializer.parse()?;
    validate_learning_rate(config.learning_rate)?;
    validate_rate(config.dropout_rate)?;

    Ok(ResolvedConfig {
        architecture,
        activation,
        optimizer,
        learning_rate: config.learning_rate,
        loss,
        initializer,
        dropout_rate: config.dropout_rate,
        seed: config.seed,
    })
}

impl NetworkConfig {
    /// Shorthand for [`validate_config`].
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        validate_config(self)
    }
}

impl From<&ResolvedConfig> for NetworkConfig {
    fn from(resolved: &ResolvedConfig) -> Self {
        Self {
            architecture: resolved.architecture.sizes().to_vec(),
            activation: resolved.activation.name().to_string(),
            optimizer: resolved.optimizer.name().to_string(),
            learning_rate: resolved.learning_rate,
            loss: resolved.loss.name().to_string(),
            initializer: resolved.initializer.name().to_string(),
            dropout_rate: resolved.dropout_rate,
            seed: resolved.seed,
        }
    }
}
