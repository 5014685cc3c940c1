//! Plain and momentum gradient descent update rules
//!
//! - SGD: `w = w - η * g`
//! - Momentum: `v = β * v + g`, then `w = w - η * v`

/// Momentum decay factor (β).
pub const MOMENTUM_BETA: f64 = 0.9;

/// Vanilla gradient descent step for a single parameter.
///
/// # Examples
///
/// ```
/// use nn_playground::optimizers::sgd::sgd_update;
///
/// let mut w = 1.0;
/// sgd_update(&mut w, 0.5, 0.1);
/// assert!((w - 0.95).abs() < 1e-12);
/// ```
#[inline]
pub fn sgd_update(param: &mut f64, grad: f64, learning_rate: f64) {
    *param -= learning_rate * grad;
}

/// Heavy-ball momentum step; `velocity` is this parameter's buffer entry.
#[inline]
pub fn momentum_update(param: &mut f64, velocity: &mut f64, grad: f64, learning_rate: f64) {
    *velocity = MOMENTUM_BETA * *velocity + grad;
    *param -= learning_rate * *velocity;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgd_update() {
        let mut params = [1.0, 2.0, 3.0];
        let grads = [0.1, 0.2, 0.3];
        for (p, g) in params.iter_mut().zip(grads) {
            sgd_update(p, g, 0.1);
        }
        assert!((params[0] - 0.99).abs() < 1e-12);
        assert!((params[1] - 1.98).abs() < 1e-12);
        assert!((params[2] - 2.97).abs() < 1e-12);
    }

    #[test]
    fn test_momentum_accumulates_velocity() {
        let mut w = 0.0;
        let mut v = 0.0;

        momentum_update(&mut w, &mut v, 1.0, 0.1);
        assert!((v - 1.0).abs() < 1e-12);
        assert!((w + 0.1).abs() < 1e-12);

        momentum_update(&mut w, &mut v, 1.0, 0.1);
        assert!((v - 1.9).abs() < 1e-12);
        assert!((w + 0.29).abs() < 1e-12);
    }
}
