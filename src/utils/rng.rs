//! Seeded random source for weight initialization and dropout masks.
//!
//! A small xorshift generator keeps every run reproducible from a single
//! `u64` seed. The network owns one instance and passes it explicitly into
//! the forward pass whenever a dropout mask has to be drawn.

/// Xorshift PRNG producing `f64` samples.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
    /// Second Box-Muller sample, kept for the next `next_gaussian` call.
    spare: Option<f64>,
}

impl SimpleRng {
    /// Create a new RNG with explicit seed (if zero, use a fixed value).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state, spare: None }
    }

    /// Basic xorshift step.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform sample in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform sample in [low, high).
    pub fn gen_range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Standard normal sample (Box-Muller, two values per draw).
    pub fn next_gaussian(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        // 1 - u keeps the log argument in (0, 1]
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        let radius = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * std::f64::consts::PI * u2;
        self.spare = Some(radius * theta.sin());
        radius * theta.cos()
    }

    /// Normal sample with the given standard deviation and zero mean.
    pub fn gen_normal(&mut self, std_dev: f64) -> f64 {
        self.next_gaussian() * std_dev
    }

    /// Bernoulli trial that succeeds with probability `p`.
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(42);
        let mut rng2 = SimpleRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = SimpleRng::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!((0.0..1.0).contains(&val));
        }
    }

    #[test]
    fn test_gen_range() {
        let mut rng = SimpleRng::new(67890);

        for _ in 0..1000 {
            let val = rng.gen_range(-1.0, 1.0);
            assert!((-1.0..1.0).contains(&val));
        }
    }

    #[test]
    fn test_gaussian_moments() {
        let mut rng = SimpleRng::new(2024);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.gen_normal(0.5)).collect();

        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        assert!(mean.abs() < 0.02, "mean {} too far from 0", mean);
        assert!((var.sqrt() - 0.5).abs() < 0.02, "std {} too far from 0.5", var.sqrt());
    }

    #[test]
    fn test_gen_bool_extremes() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..100 {
            assert!(rng.gen_bool(1.0));
            assert!(!rng.gen_bool(0.0));
        }
    }

    #[test]
    fn test_clone_replays_sequence() {
        let mut rng = SimpleRng::new(99);
        rng.next_gaussian();
        let mut replay = rng.clone();

        for _ in 0..10 {
            assert_eq!(rng.next_gaussian(), replay.next_gaussian());
        }
    }
}
