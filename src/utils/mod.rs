//! Shared building blocks for the training engine
//!
//! This module holds the name-keyed registries (activations, losses, weight
//! initializers) and the seeded random source used by initialization and
//! dropout.

pub mod activations;
pub mod init;
pub mod loss;
pub mod rng;

pub use activations::Activation;
pub use init::Initializer;
pub use loss::Loss;
pub use rng::SimpleRng;
