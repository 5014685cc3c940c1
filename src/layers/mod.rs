//! Layer building blocks
//!
//! Dense layers hold the trainable parameters; dropout masks are drawn per
//! training-mode forward pass for hidden layers only.

pub mod dense;
pub mod dropout;

pub use dense::{DenseLayer, LayerGradients};
pub use dropout::DropoutMask;
