//! Neural Network Playground Library
//!
//! This library provides an instrumented training engine for small dense
//! networks, built for interactive visualizations: every weight exposes its
//! current value, its initial baseline and its latest gradient.
//!
//! # Modules
//!
//! - `network`: The `Network` type, forward/backward passes, stats and export
//! - `layers`: Dense layer parameters and dropout masks
//! - `optimizers`: SGD, Momentum, RMSprop, Adagrad, Adam and Nadam
//! - `utils`: Activation, loss and initializer registries, plus the RNG
//! - `config`: JSON network configuration
//! - `architecture`: Layer-width validation and parameter counting
//! - `metrics`: Regression fit metrics
//! - `dataset`: Sample grids and target curves
//! - `error`: The crate error type

pub mod architecture;
pub mod config;
pub mod dataset;
pub mod error;
pub mod layers;
pub mod metrics;
pub mod network;
pub mod optimizers;
pub mod utils;

pub use error::{NetworkError, Result};
pub use network::{ModelDocument, Network, WeightStats};
