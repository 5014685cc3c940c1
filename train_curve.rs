use log::info;
use nn_playground::config::{load_config, NetworkConfig};
use nn_playground::dataset::{TargetFunction, DEFAULT_SAMPLES};
use nn_playground::metrics::{fit_accuracy, RegressionMetrics, DEFAULT_THRESHOLD};
use nn_playground::{Network, Result};
use std::env;
use std::process;
use std::time::Instant;

// Fit a 1-D curve with a small MLP and print the resulting model.
// Usage: train_curve [config.json] [target_function]
const EPOCHS: usize = 500;
const LOG_EVERY: usize = 50;

/// Built-in network used when no config file is given: 1-8-8-1, tanh, adam.
fn default_config() -> NetworkConfig {
    NetworkConfig {
        activation: "tanh".to_string(),
        ..NetworkConfig::default()
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => {
            info!("Loading config from {}", path);
            load_config(path)?
        }
        None => default_config(),
    };
    let target: TargetFunction = match args.get(2) {
        Some(name) => name.parse()?,
        None => TargetFunction::Sine,
    };

    let mut net = Network::from_config(&config)?;
    let (inputs, targets) = target.generate(DEFAULT_SAMPLES);
    println!(
        "Training {:?} {} network on '{}' ({} points, {} epochs)...",
        net.architecture().sizes(),
        net.activation(),
        target,
        inputs.len(),
        EPOCHS
    );

    let train_start = Instant::now();
    for _ in 0..EPOCHS {
        let loss = net.train_epoch(&inputs, &targets)?;
        if net.epoch() % LOG_EVERY == 0 {
            info!("Epoch {} loss={:.6}", net.epoch(), loss);
        }
    }
    println!("Training time: {:.2} seconds", train_start.elapsed().as_secs_f64());

    let predictions: Vec<f64> = inputs
        .iter()
        .map(|x| net.predict(x).map(|y| y[0]))
        .collect::<Result<_>>()?;
    let expected: Vec<f64> = targets.iter().map(|t| t[0]).collect();
    let metrics = RegressionMetrics::compute(&predictions, &expected, DEFAULT_THRESHOLD);
    let stats = net.weight_stats();

    println!("Final loss: {:.6}", net.loss_history().last().copied().unwrap_or(f64::NAN));
    println!("Fit accuracy: {:.2}%", fit_accuracy(&predictions, &expected));
    println!(
        "MSE {:.6}  MAE {:.6}  R² {:.4}  F1 {:.3}",
        metrics.mse, metrics.mae, metrics.r2, metrics.f1
    );
    println!(
        "Parameters: {} (min {:.4}, max {:.4}, mean {:.4}, mean |grad| {:.6})",
        stats.count, stats.min, stats.max, stats.mean, stats.mean_gradient
    );
    println!("{}", net.export_json()?);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("train_curve: {}", e);
        process::exit(1);
    }
}
