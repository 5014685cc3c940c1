//! Network architecture description
//!
//! An [`Architecture`] is the ordered list of layer widths, input first and
//! output last. It is validated once on construction and never changes for
//! the lifetime of a network.

use crate::error::{NetworkError, Result};
use serde::{Deserialize, Serialize};

/// Validated list of layer widths (length ≥ 2, every width ≥ 1).
///
/// # Example
///
/// ```
/// use nn_playground::architecture::Architecture;
///
/// let arch = Architecture::new(vec![1, 8, 8, 1]).unwrap();
/// assert_eq!(arch.num_layers(), 3);
/// assert_eq!(arch.parameter_count(), 8 + 8 + 64 + 8 + 8 + 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Architecture {
    sizes: Vec<usize>,
}

impl Architecture {
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        validate_sizes(&sizes)?;
        Ok(Self { sizes })
    }

    /// All layer widths, input through output.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Number of weight layers (`sizes.len() - 1`).
    pub fn num_layers(&self) -> usize {
        self.sizes.len() - 1
    }

    /// Number of hidden layers (those that receive the activation function).
    pub fn num_hidden_layers(&self) -> usize {
        self.sizes.len() - 2
    }

    /// `(fan_in, fan_out)` for every weight layer.
    pub fn layer_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sizes.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Σ (in·out + out) over all layers.
    pub fn parameter_count(&self) -> usize {
        self.layer_shapes().map(|(i, o)| i * o + o).sum()
    }

    /// Hidden widths joined with commas, or `"none"` (observation log label).
    pub fn hidden_label(&self) -> String {
        let hidden = &self.sizes[1..self.sizes.len() - 1];
        if hidden.is_empty() {
            "none".to_string()
        } else {
            hidden
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

impl TryFrom<Vec<usize>> for Architecture {
    type Error = NetworkError;

    fn try_from(sizes: Vec<usize>) -> Result<Self> {
        Architecture::new(sizes)
    }
}

impl From<Architecture> for Vec<usize> {
    fn from(arch: Architecture) -> Self {
        arch.sizes
    }
}

fn validate_sizes(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(NetworkError::configuration(format!(
            "architecture needs at least an input and an output layer, got {} entries",
            sizes.len()
        )));
    }
    if let Some(pos) = sizes.iter().position(|&s| s == 0) {
        return Err(NetworkError::configuration(format!(
            "layer {} has width 0; every layer needs at least one neuron",
            pos
        )));
    }
    Ok(())
}
