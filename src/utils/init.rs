//! Weight initialization schemes
//!
//! An [`Initializer`] maps a layer's fan-in/fan-out to a distribution and
//! draws one weight at a time from it. Biases are never drawn from an
//! initializer; they always start at zero.

use crate::error::NetworkError;
use crate::utils::rng::SimpleRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Standard deviation of the plain `normal` initializer.
pub const NORMAL_STD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initializer {
    /// Glorot uniform in [-sqrt(6/(fan_in+fan_out)), sqrt(6/(fan_in+fan_out))]
    Xavier,
    /// Normal with std sqrt(2/fan_in)
    He,
    /// Normal with std sqrt(1/fan_in)
    Lecun,
    /// Uniform in [-1, 1]
    Uniform,
    /// Normal with std 0.1
    Normal,
    Zeros,
    Ones,
}

impl Initializer {
    pub const ALL: [Initializer; 7] = [
        Initializer::Xavier,
        Initializer::He,
        Initializer::Lecun,
        Initializer::Uniform,
        Initializer::Normal,
        Initializer::Zeros,
        Initializer::Ones,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Initializer::Xavier => "xavier",
            Initializer::He => "he",
            Initializer::Lecun => "lecun",
            Initializer::Uniform => "uniform",
            Initializer::Normal => "normal",
            Initializer::Zeros => "zeros",
            Initializer::Ones => "ones",
        }
    }

    /// Draw a single weight for a layer with the given fan-in and fan-out.
    pub fn sample(self, fan_in: usize, fan_out: usize, rng: &mut SimpleRng) -> f64 {
        match self {
            Initializer::Xavier => {
                let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
                rng.gen_range(-limit, limit)
            }
            Initializer::He => rng.gen_normal((2.0 / fan_in as f64).sqrt()),
            Initializer::Lecun => rng.gen_normal((1.0 / fan_in as f64).sqrt()),
            Initializer::Uniform => rng.gen_range(-1.0, 1.0),
            Initializer::Normal => rng.gen_normal(NORMAL_STD),
            Initializer::Zeros => 0.0,
            Initializer::Ones => 1.0,
        }
    }
}

impl FromStr for Initializer {
    type Err = NetworkError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let lowered = name.trim().to_lowercase();
        let key = match lowered.as_str() {
            "glorot" => "xavier",
            "kaiming" => "he",
            other => other,
        };
        Initializer::ALL
            .iter()
            .copied()
            .find(|i| i.name() == key)
            .ok_or_else(|| NetworkError::configuration(format!("unknown initializer '{}'", name)))
    }
}

impl fmt::Display for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
