//! Adam and Nadam (Adaptive Moment Estimation) update rules
//!
//! Both optimizers share the same state: a first moment `m`, a second moment
//! `v` and a step counter `t` used for bias correction. They differ only in
//! the first-moment term fed into the update.

/// Exponential decay rate for first moment estimates.
pub const BETA1: f64 = 0.9;
/// Exponential decay rate for second moment estimates.
pub const BETA2: f64 = 0.999;
/// Small constant for numerical stability.
pub const EPSILON: f64 = 1e-8;

/// First/second moment buffers shared by Adam and Nadam.
///
/// The update rule is:
///
/// ```text
/// m_t = β1 * m_{t-1} + (1 - β1) * g
/// v_t = β2 * v_{t-1} + (1 - β2) * g²
/// m_hat = m_t / (1 - β1^t)
/// v_hat = v_t / (1 - β2^t)
/// adam:  w -= α * m_hat / (√v_hat + ε)
/// nadam: w -= α * (β1 * m_hat + (1 - β1) * g / (1 - β1^t)) / (√v_hat + ε)
/// ```
///
/// `t` is global: it advances once per optimizer step, not per parameter.
///
/// # Reference
///
/// Kingma, D. P., & Ba, J. (2014). Adam: A method for stochastic optimization.
/// Dozat, T. (2016). Incorporating Nesterov momentum into Adam.
#[derive(Debug, Clone, PartialEq)]
pub struct Moments {
    /// First moment estimates (momentum)
    pub m: Vec<f64>,
    /// Second moment estimates (adaptive learning rate)
    pub v: Vec<f64>,
    /// Time step counter for bias correction
    pub t: u64,
}

impl Moments {
    pub fn new(parameter_count: usize) -> Self {
        Self {
            m: vec![0.0; parameter_count],
            v: vec![0.0; parameter_count],
            t: 0,
        }
    }

    /// Advance the step counter and return `(1 - β1^t, 1 - β2^t)`.
    pub fn begin_step(&mut self) -> (f64, f64) {
        self.t += 1;
        let t = self.t as i32;
        (1.0 - BETA1.powi(t), 1.0 - BETA2.powi(t))
    }

    /// Adam update of parameter `i`.
    #[inline]
    pub fn adam_update(&mut self, i: usize, param: &mut f64, grad: f64, lr: f64, corrections: (f64, f64)) {
        let (m_hat, v_hat) = self.update_moments(i, grad, corrections);
        *param -= lr * m_hat / (v_hat.sqrt() + EPSILON);
    }

    /// Nadam update of parameter `i`: the first moment looks one step ahead.
    #[inline]
    pub fn nadam_update(&mut self, i: usize, param: &mut f64, grad: f64, lr: f64, corrections: (f64, f64)) {
        let (m_hat, v_hat) = self.update_moments(i, grad, corrections);
        let lookahead = BETA1 * m_hat + (1.0 - BETA1) * grad / corrections.0;
        *param -= lr * lookahead / (v_hat.sqrt() + EPSILON);
    }

    fn update_moments(&mut self, i: usize, grad: f64, (bc1, bc2): (f64, f64)) -> (f64, f64) {
        self.m[i] = BETA1 * self.m[i] + (1.0 - BETA1) * grad;
        self.v[i] = BETA2 * self.v[i] + (1.0 - BETA2) * grad * grad;
        (self.m[i] / bc1, self.v[i] / bc2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moments_new() {
        let moments = Moments::new(3);
        assert_eq!(moments.m, vec![0.0; 3]);
        assert_eq!(moments.v, vec![0.0; 3]);
        assert_eq!(moments.t, 0);
    }

    #[test]
    fn test_adam_first_step_is_lr_sized() {
        // With bias correction the first step is ±lr regardless of |g|
        let mut moments = Moments::new(2);
        let corrections = moments.begin_step();
        let mut params = [1.0, 1.0];

        moments.adam_update(0, &mut params[0], 0.3, 0.01, corrections);
        moments.adam_update(1, &mut params[1], -40.0, 0.01, corrections);

        assert!((params[0] - 0.99).abs() < 1e-6);
        assert!((params[1] - 1.01).abs() < 1e-6);
    }

    #[test]
    fn test_adam_multiple_updates() {
        let mut moments = Moments::new(1);
        let mut w = 1.0;
        for _ in 0..3 {
            let c = moments.begin_step();
            moments.adam_update(0, &mut w, 1.0, 0.01, c);
        }
        assert_eq!(moments.t, 3);
        assert!(w < 1.0);
    }

    #[test]
    fn test_nadam_first_step() {
        let mut moments = Moments::new(1);
        let c = moments.begin_step();
        let mut w = 0.0;
        moments.nadam_update(0, &mut w, 1.0, 0.1, c);

        // m_hat = 1, lookahead = 0.9 * 1 + 0.1 * 1 / 0.1 = 1.9, v_hat = 1
        let expected = -0.1 * 1.9 / (1.0 + EPSILON);
        assert!((w - expected).abs() < 1e-12);
    }

    #[test]
    fn test_bias_correction_diminishes() {
        let mut moments = Moments::new(1);
        let mut last = (0.0, 0.0);
        for _ in 0..1000 {
            last = moments.begin_step();
        }
        assert!(last.0 > 0.99);
        // 1 - 0.999^1000 ≈ 0.632
        assert!(last.1 > 0.63);
    }
}
