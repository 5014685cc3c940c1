//! JSON model document for export/import
//!
//! The document carries everything needed to reproduce a trained network:
//! architecture, hyperparameters, current parameters and loss history. The
//! initial snapshot is deliberately not part of it; an import makes the
//! imported values the new baseline.
//!
//! JSON has no NaN or Infinity, so `serde_json` writes non-finite numbers as
//! `null`. A diverged model still round-trips: `null` is read back as NaN.

use crate::architecture::Architecture;
use crate::error::{NetworkError, Result};
use crate::layers::DenseLayer;
use serde::{Deserialize, Deserializer, Serialize};

/// `{architecture, activation, optimizer, learningRate, lossHistory, epoch,
/// weights, biases}` plus the optional `loss` and `dropoutRate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocument {
    pub architecture: Vec<usize>,
    pub activation: String,
    pub optimizer: String,
    pub learning_rate: f64,
    #[serde(deserialize_with = "nullable_vec")]
    pub loss_history: Vec<f64>,
    pub epoch: usize,
    /// `weights[layer][out][in]`
    #[serde(deserialize_with = "nullable_tensor")]
    pub weights: Vec<Vec<Vec<f64>>>,
    /// `biases[layer][out]`
    #[serde(deserialize_with = "nullable_matrix")]
    pub biases: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropout_rate: Option<f64>,
}

impl ModelDocument {
    /// Parse a document; missing fields or wrong JSON types are reported as
    /// `Validation` errors.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| NetworkError::validation(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the weight and bias arrays match the declared architecture
    /// and turn them into layers. Nothing is mutated on failure.
    pub fn to_layers(&self) -> Result<(Architecture, Vec<DenseLayer>)> {
        let architecture = Architecture::new(self.architecture.clone())
            .map_err(|e| NetworkError::validation(format!("bad architecture: {}", e)))?;

        let num_layers = architecture.num_layers();
        if self.weights.len() != num_layers {
            return Err(NetworkError::validation(format!(
                "architecture {:?} needs {} weight matrices, document has {}",
                self.architecture,
                num_layers,
                self.weights.len()
            )));
        }
        if self.biases.len() != num_layers {
            return Err(NetworkError::validation(format!(
                "architecture {:?} needs {} bias vectors, document has {}",
                self.architecture,
                num_layers,
                self.biases.len()
            )));
        }

        for (l, (fan_in, fan_out)) in architecture.layer_shapes().enumerate() {
            let w = &self.weights[l];
            if w.len() != fan_out || w.iter().any(|row| row.len() != fan_in) {
                return Err(NetworkError::validation(format!(
                    "weights of layer {} must be {}x{} for architecture {:?}",
                    l, fan_out, fan_in, self.architecture
                )));
            }
            if self.biases[l].len() != fan_out {
                return Err(NetworkError::validation(format!(
                    "biases of layer {} must have {} entries, document has {}",
                    l,
                    fan_out,
                    self.biases[l].len()
                )));
            }
        }

        let layers = self
            .weights
            .iter()
            .zip(&self.biases)
            .map(|(w, b)| DenseLayer::from_parts(w.clone(), b.clone()))
            .collect();
        Ok((architecture, layers))
    }
}

/// A JSON number, or `null` standing in for a non-finite value.
#[derive(Deserialize)]
struct NullableF64(Option<f64>);

impl From<NullableF64> for f64 {
    fn from(value: NullableF64) -> Self {
        value.0.unwrap_or(f64::NAN)
    }
}

fn nullable_vec<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<f64>, D::Error> {
    let raw: Vec<NullableF64> = Vec::deserialize(d)?;
    Ok(raw.into_iter().map(f64::from).collect())
}

fn nullable_matrix<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<Vec<f64>>, D::Error> {
    let raw: Vec<Vec<NullableF64>> = Vec::deserialize(d)?;
    Ok(raw
        .into_iter()
        .map(|row| row.into_iter().map(f64::from).collect())
        .collect())
}

fn nullable_tensor<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Vec<Vec<Vec<f64>>>, D::Error> {
    let raw: Vec<Vec<Vec<NullableF64>>> = Vec::deserialize(d)?;
    Ok(raw
        .into_iter()
        .map(|m| {
            m.into_iter()
                .map(|row| row.into_iter().map(f64::from).collect())
                .collect()
        })
        .collect())
}
