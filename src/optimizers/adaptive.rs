//! Per-parameter adaptive step sizes: RMSprop and Adagrad
//!
//! Both divide the gradient by the square root of a running squared-gradient
//! statistic. RMSprop keeps an exponential moving average; Adagrad keeps the
//! unbounded sum, so its effective step only shrinks.

/// Decay rate of the RMSprop squared-gradient average.
pub const RMSPROP_BETA: f64 = 0.9;
/// Added to the denominator to avoid division by zero.
pub const EPSILON: f64 = 1e-8;

/// `s = β·s + (1-β)·g²; w -= η·g / (√s + ε)`
#[inline]
pub fn rmsprop_update(param: &mut f64, square_avg: &mut f64, grad: f64, learning_rate: f64) {
    *square_avg = RMSPROP_BETA * *square_avg + (1.0 - RMSPROP_BETA) * grad * grad;
    *param -= learning_rate * grad / (square_avg.sqrt() + EPSILON);
}

/// `s += g²; w -= η·g / (√s + ε)`
#[inline]
pub fn adagrad_update(param: &mut f64, accumulator: &mut f64, grad: f64, learning_rate: f64) {
    *accumulator += grad * grad;
    *param -= learning_rate * grad / (accumulator.sqrt() + EPSILON);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rmsprop_first_step() {
        let mut w = 1.0;
        let mut s = 0.0;
        rmsprop_update(&mut w, &mut s, 2.0, 0.01);

        // s = 0.1 * 4 = 0.4; step = 0.01 * 2 / sqrt(0.4)
        assert!((s - 0.4).abs() < 1e-12);
        let expected = 1.0 - 0.01 * 2.0 / (0.4f64.sqrt() + EPSILON);
        assert!((w - expected).abs() < 1e-12);
    }

    #[test]
    fn test_adagrad_first_step_is_sign_times_lr() {
        let mut w = 0.0;
        let mut s = 0.0;
        adagrad_update(&mut w, &mut s, -3.0, 0.5);
        assert!((w - 0.5).abs() < 1e-6);
        assert_eq!(s, 9.0);
    }

    #[test]
    fn test_adagrad_steps_shrink() {
        let mut w = 0.0;
        let mut s = 0.0;
        let mut previous = f64::INFINITY;
        for _ in 0..5 {
            let before = w;
            adagrad_update(&mut w, &mut s, 1.0, 0.1);
            let step = before - w;
            assert!(step < previous);
            previous = step;
        }
    }

    #[test]
    fn test_zero_gradient_is_stable() {
        let mut w = 0.3;
        let mut s = 0.0;
        rmsprop_update(&mut w, &mut s, 0.0, 0.1);
        adagrad_update(&mut w, &mut s, 0.0, 0.1);
        assert_eq!(w, 0.3);
    }
}
