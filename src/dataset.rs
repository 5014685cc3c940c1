//! Training data for one-dimensional curve fitting
//!
//! The playground fits a named curve over evenly spaced points on [-1, 1].

use crate::error::{NetworkError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Number of grid points the application trains on.
pub const DEFAULT_SAMPLES: usize = 30;

/// `count` evenly spaced points from -1 to 1 inclusive.
///
/// # Examples
///
/// ```
/// use nn_playground::dataset::sample_grid;
///
/// assert_eq!(sample_grid(3), vec![-1.0, 0.0, 1.0]);
/// ```
pub fn sample_grid(count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..count)
            .map(|i| -1.0 + 2.0 * i as f64 / (count - 1) as f64)
            .collect(),
    }
}

/// A curve to fit, selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFunction {
    Linear,
    Quadratic,
    Cubic,
    Sine,
    Step,
    SquareWave,
    Gaussian,
    Zigzag,
}

impl TargetFunction {
    pub const ALL: [TargetFunction; 8] = [
        TargetFunction::Linear,
        TargetFunction::Quadratic,
        TargetFunction::Cubic,
        TargetFunction::Sine,
        TargetFunction::Step,
        TargetFunction::SquareWave,
        TargetFunction::Gaussian,
        TargetFunction::Zigzag,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TargetFunction::Linear => "linear",
            TargetFunction::Quadratic => "quadratic",
            TargetFunction::Cubic => "cubic",
            TargetFunction::Sine => "sine",
            TargetFunction::Step => "step",
            TargetFunction::SquareWave => "square_wave",
            TargetFunction::Gaussian => "gaussian",
            TargetFunction::Zigzag => "zigzag",
        }
    }

    pub fn eval(self, x: f64) -> f64 {
        match self {
            TargetFunction::Linear => x,
            TargetFunction::Quadratic => x * x,
            TargetFunction::Cubic => x * x * x,
            TargetFunction::Sine => (PI * x).sin(),
            TargetFunction::Step => {
                if x < 0.0 {
                    -1.0
                } else {
                    1.0
                }
            }
            // two periods over [-1, 1]
            TargetFunction::SquareWave => {
                if (2.0 * PI * x).sin() < 0.0 {
                    -1.0
                } else {
                    1.0
                }
            }
            TargetFunction::Gaussian => (-x * x / 0.18).exp(),
            // triangle wave with period 1, peaks of 1 at x = ±0.5
            TargetFunction::Zigzag => {
                let phase = x.rem_euclid(1.0);
                1.0 - 4.0 * (phase - 0.5).abs()
            }
        }
    }

    /// Network-ready `(inputs, targets)` over a grid of `count` points.
    pub fn generate(self, count: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        sample_grid(count)
            .into_iter()
            .map(|x| (vec![x], vec![self.eval(x)]))
            .unzip()
    }
}

impl FromStr for TargetFunction {
    type Err = NetworkError;

    fn from_str(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "sin" => return Ok(TargetFunction::Sine),
            "square" => return Ok(TargetFunction::SquareWave),
            _ => {}
        }
        TargetFunction::ALL
            .into_iter()
            .find(|f| f.name() == normalized)
            .ok_or_else(|| NetworkError::configuration(format!("unknown target function '{}'", name)))
    }
}

impl fmt::Display for TargetFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_endpoints() {
        let grid = sample_grid(DEFAULT_SAMPLES);
        assert_eq!(grid.len(), 30);
        assert_eq!(grid[0], -1.0);
        assert!((grid[29] - 1.0).abs() < 1e-12);
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
        assert!(sample_grid(0).is_empty());
    }

    #[test]
    fn test_eval_values() {
        assert_eq!(TargetFunction::Quadratic.eval(-0.5), 0.25);
        assert!(TargetFunction::Sine.eval(0.5) > 0.999);
        assert_eq!(TargetFunction::Step.eval(-0.1), -1.0);
        assert_eq!(TargetFunction::Gaussian.eval(0.0), 1.0);
        assert!((TargetFunction::Zigzag.eval(0.5) - 1.0).abs() < 1e-12);
        assert!((TargetFunction::Zigzag.eval(0.0) + 1.0).abs() < 1e-12);
        assert_eq!(TargetFunction::SquareWave.eval(0.25), 1.0);
        assert_eq!(TargetFunction::SquareWave.eval(-0.25), -1.0);
    }

    #[test]
    fn test_generate_shapes() {
        let (inputs, targets) = TargetFunction::Cubic.generate(5);
        assert_eq!(inputs.len(), 5);
        assert_eq!(targets[0], vec![-1.0]);
        assert!(inputs.iter().all(|x| x.len() == 1));
    }

    #[test]
    fn test_parse_names() {
        for f in TargetFunction::ALL {
            assert_eq!(f.name().parse::<TargetFunction>().unwrap(), f);
        }
        assert_eq!("square-wave".parse::<TargetFunction>().unwrap(), TargetFunction::SquareWave);
        assert!("sawtooth".parse::<TargetFunction>().is_err());
    }
}
