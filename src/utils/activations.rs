//! Activation functions for hidden layers
//!
//! Every activation is a variant of the closed [`Activation`] enum. Names are
//! parsed once (see [`Activation::from_str`]) and evaluation is a plain
//! `match`, so an unknown name can only fail at configuration time.
//!
//! Derivatives are taken with respect to the pre-activation value `z`, which
//! is what the backward pass caches.

use crate::error::NetworkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Slope for negative inputs of Leaky ReLU.
pub const LEAKY_RELU_SLOPE: f64 = 0.01;
/// Fixed slope for negative inputs of PReLU.
pub const PRELU_SLOPE: f64 = 0.25;
/// Alpha for ELU and CELU.
pub const ELU_ALPHA: f64 = 1.0;
/// SELU scale (lambda).
pub const SELU_LAMBDA: f64 = 1.050_700_987_355_480_5;
/// SELU alpha.
pub const SELU_ALPHA: f64 = 1.673_263_242_354_377_3;

const GELU_COEFF: f64 = 0.044_715;

/// Activation applied to every hidden layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Sigmoid,
    Tanh,
    Relu,
    LeakyRelu,
    Elu,
    Selu,
    Gelu,
    Swish,
    Mish,
    Softplus,
    Softsign,
    Prelu,
    Celu,
}

impl Activation {
    /// Every supported activation, in display order.
    pub const ALL: [Activation; 14] = [
        Activation::Linear,
        Activation::Sigmoid,
        Activation::Tanh,
        Activation::Relu,
        Activation::LeakyRelu,
        Activation::Elu,
        Activation::Selu,
        Activation::Gelu,
        Activation::Swish,
        Activation::Mish,
        Activation::Softplus,
        Activation::Softsign,
        Activation::Prelu,
        Activation::Celu,
    ];

    /// Registry name, as used in configs and exported documents.
    pub fn name(self) -> &'static str {
        match self {
            Activation::Linear => "linear",
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
            Activation::Relu => "relu",
            Activation::LeakyRelu => "leaky_relu",
            Activation::Elu => "elu",
            Activation::Selu => "selu",
            Activation::Gelu => "gelu",
            Activation::Swish => "swish",
            Activation::Mish => "mish",
            Activation::Softplus => "softplus",
            Activation::Softsign => "softsign",
            Activation::Prelu => "prelu",
            Activation::Celu => "celu",
        }
    }

    /// Evaluate the activation at pre-activation `z`.
    pub fn apply(self, z: f64) -> f64 {
        match self {
            Activation::Linear => z,
            Activation::Sigmoid => sigmoid(z),
            Activation::Tanh => z.tanh(),
            Activation::Relu => z.max(0.0),
            Activation::LeakyRelu => leaky(z, LEAKY_RELU_SLOPE),
            Activation::Prelu => leaky(z, PRELU_SLOPE),
            Activation::Elu => {
                if z > 0.0 {
                    z
                } else {
                    ELU_ALPHA * z.exp_m1()
                }
            }
            Activation::Selu => {
                if z > 0.0 {
                    SELU_LAMBDA * z
                } else {
                    SELU_LAMBDA * SELU_ALPHA * z.exp_m1()
                }
            }
            Activation::Celu => {
                if z > 0.0 {
                    z
                } else {
                    ELU_ALPHA * (z / ELU_ALPHA).exp_m1()
                }
            }
            Activation::Gelu => {
                let inner = gelu_inner(z);
                0.5 * z * (1.0 + inner.tanh())
            }
            Activation::Swish => z * sigmoid(z),
            Activation::Mish => z * softplus(z).tanh(),
            Activation::Softplus => softplus(z),
            Activation::Softsign => z / (1.0 + z.abs()),
        }
    }

    /// Derivative d(activation)/dz evaluated at pre-activation `z`.
    ///
    /// Piecewise functions take the right-hand branch only for `z > 0`, so the
    /// derivative of ReLU at exactly zero is 0.
    pub fn derivative(self, z: f64) -> f64 {
        match self {
            Activation::Linear => 1.0,
            Activation::Sigmoid => {
                let s = sigmoid(z);
                s * (1.0 - s)
            }
            Activation::Tanh => {
                let t = z.tanh();
                1.0 - t * t
            }
            Activation::Relu => {
                if z > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::LeakyRelu => leaky_slope(z, LEAKY_RELU_SLOPE),
            Activation::Prelu => leaky_slope(z, PRELU_SLOPE),
            Activation::Elu => {
                if z > 0.0 {
                    1.0
                } else {
                    ELU_ALPHA * z.exp()
                }
            }
            Activation::Selu => {
                if z > 0.0 {
                    SELU_LAMBDA
                } else {
                    SELU_LAMBDA * SELU_ALPHA * z.exp()
                }
            }
            Activation::Celu => {
                if z > 0.0 {
                    1.0
                } else {
                    (z / ELU_ALPHA).exp()
                }
            }
            Activation::Gelu => {
                let k = (2.0 / std::f64::consts::PI).sqrt();
                let t = gelu_inner(z).tanh();
                0.5 * (1.0 + t) + 0.5 * z * (1.0 - t * t) * k * (1.0 + 3.0 * GELU_COEFF * z * z)
            }
            Activation::Swish => {
                let s = sigmoid(z);
                s + z * s * (1.0 - s)
            }
            Activation::Mish => {
                let t = softplus(z).tanh();
                t + z * (1.0 - t * t) * sigmoid(z)
            }
            Activation::Softplus => sigmoid(z),
            Activation::Softsign => {
                let d = 1.0 + z.abs();
                1.0 / (d * d)
            }
        }
    }
}

impl FromStr for Activation {
    type Err = NetworkError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let lowered = name.trim().to_lowercase();
        let key = match lowered.as_str() {
            "identity" => "linear",
            "leakyrelu" | "leaky-relu" => "leaky_relu",
            other => other,
        };
        Activation::ALL
            .iter()
            .copied()
            .find(|a| a.name() == key)
            .ok_or_else(|| NetworkError::configuration(format!("unknown activation '{}'", name)))
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// ln(1 + e^z) without overflow for large |z|.
pub fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

fn leaky(z: f64, slope: f64) -> f64 {
    if z > 0.0 {
        z
    } else {
        slope * z
    }
}

fn leaky_slope(z: f64, slope: f64) -> f64 {
    if z > 0.0 {
        1.0
    } else {
        slope
    }
}

fn gelu_inner(z: f64) -> f64 {
    (2.0 / std::f64::consts::PI).sqrt() * (z + GELU_COEFF * z * z * z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_sigmoid_zero() {
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < EPSILON);
        assert!((Activation::Sigmoid.derivative(0.0) - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_sigmoid_extremes_are_finite() {
        assert!((sigmoid(-1000.0)).abs() < EPSILON);
        assert!((sigmoid(1000.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_relu_mixed() {
        let values: Vec<f64> = [-2.0, -1.0, 0.0, 1.0, 2.0]
            .iter()
            .map(|&z| Activation::Relu.apply(z))
            .collect();
        assert_eq!(values, vec![0.0, 0.0, 0.0, 1.0, 2.0]);
        assert_eq!(Activation::Relu.derivative(0.0), 0.0);
    }

    #[test]
    fn test_leaky_variants_use_fixed_slopes() {
        assert!((Activation::LeakyRelu.apply(-2.0) + 0.02).abs() < EPSILON);
        assert!((Activation::Prelu.apply(-2.0) + 0.5).abs() < EPSILON);
        assert_eq!(Activation::Prelu.derivative(-1.0), PRELU_SLOPE);
    }

    #[test]
    fn test_selu_scale() {
        assert!((Activation::Selu.apply(1.0) - SELU_LAMBDA).abs() < EPSILON);
    }

    #[test]
    fn test_softplus_large_input() {
        assert!((softplus(800.0) - 800.0).abs() < EPSILON);
        assert!(softplus(-800.0) >= 0.0);
    }

    #[test]
    fn test_softsign_bounds() {
        assert!(Activation::Softsign.apply(1e6) < 1.0);
        assert!(Activation::Softsign.apply(-1e6) > -1.0);
    }

    #[test]
    fn test_derivatives_match_finite_differences() {
        let h = 1e-6;
        // Points away from the kinks of the piecewise functions
        let points = [-2.3, -0.7, 0.4, 1.9];
        for act in Activation::ALL {
            for &z in &points {
                let numeric = (act.apply(z + h) - act.apply(z - h)) / (2.0 * h);
                let analytic = act.derivative(z);
                assert!(
                    (numeric - analytic).abs() < 1e-5,
                    "{} derivative mismatch at {}: analytic {}, numeric {}",
                    act,
                    z,
                    analytic,
                    numeric
                );
            }
        }
    }

    #[test]
    fn test_parse_names() {
        for act in Activation::ALL {
            assert_eq!(act.name().parse::<Activation>().unwrap(), act);
        }
        assert_eq!("identity".parse::<Activation>().unwrap(), Activation::Linear);
        assert_eq!("TANH".parse::<Activation>().unwrap(), Activation::Tanh);
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "softmax".parse::<Activation>().unwrap_err();
        assert!(matches!(err, NetworkError::Configuration(_)));
    }
}
