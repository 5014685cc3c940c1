//! The instrumented network and its training driver
//!
//! [`Network`] owns everything one interactive session needs: the live
//! parameters and their initial baseline, the optimizer state, the last
//! forward cache and accumulated gradient, and the loss history. Visualizers
//! read from it between epochs; every mutation goes through a method that
//! validates its arguments first, so a rejected call leaves the network as
//! it was.
//!
//! # Example
//!
//! ```
//! use nn_playground::network::Network;
//!
//! let mut net = Network::new(&[1, 4, 1], "tanh", "sgd", 0.1).unwrap();
//! let inputs = vec![vec![-1.0], vec![0.0], vec![1.0]];
//! let targets = inputs.clone();
//!
//! let first = net.train_epoch(&inputs, &targets).unwrap();
//! for _ in 0..50 {
//!     net.train_epoch(&inputs, &targets).unwrap();
//! }
//! assert_eq!(net.epoch(), 51);
//! assert!(net.loss_history()[50] < first);
//! ```

pub mod backward;
pub mod forward;
pub mod params;
pub mod serialize;
pub mod stats;
pub mod trace;

pub use forward::ForwardCache;
pub use params::ParameterStore;
pub use serialize::ModelDocument;
pub use stats::WeightStats;
pub use trace::{Contribution, ForwardTrace};

use crate::architecture::Architecture;
use crate::config::{validate_config, NetworkConfig, ResolvedConfig};
use crate::error::{NetworkError, Result};
use crate::layers::dropout::validate_rate;
use crate::layers::{DenseLayer, LayerGradients};
use crate::optimizers::{validate_learning_rate, Optimizer, OptimizerKind};
use crate::utils::{Activation, Initializer, Loss, SimpleRng};
use backward::backward_pass;
use forward::forward_pass;
use log::{debug, info, warn};

/// A dense feedforward network with a linear output layer.
#[derive(Debug, Clone)]
pub struct Network {
    architecture: Architecture,
    activation: Activation,
    loss: Loss,
    initializer: Initializer,
    optimizer: Optimizer,
    dropout_rate: f64,
    seed: u64,
    rng: SimpleRng,
    params: ParameterStore,
    /// Gradient summed over the last epoch (or set by [`Network::backward`]).
    gradients: Vec<LayerGradients>,
    last_cache: Option<ForwardCache>,
    loss_history: Vec<f64>,
    epoch: usize,
}

impl Network {
    /// Build a network with `mse` loss, `xavier` initialization, no dropout
    /// and the default seed.
    ///
    /// # Arguments
    ///
    /// * `architecture` - Layer widths, input through output (at least two)
    /// * `activation` - Hidden-layer activation name
    /// * `optimizer` - Optimizer name
    /// * `learning_rate` - Positive step size
    pub fn new(architecture: &[usize], activation: &str, optimizer: &str, learning_rate: f64) -> Result<Self> {
        Self::from_config(&NetworkConfig {
            architecture: architecture.to_vec(),
            activation: activation.to_string(),
            optimizer: optimizer.to_string(),
            learning_rate,
            ..NetworkConfig::default()
        })
    }

    /// Build a network from a config; every name is checked before anything
    /// is allocated.
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        let resolved = validate_config(config)?;
        Self::from_resolved(resolved)
    }

    /// Build from already-resolved names. The rates are checked again since
    /// the fields are public.
    pub fn from_resolved(config: ResolvedConfig) -> Result<Self> {
        validate_learning_rate(config.learning_rate)?;
        validate_rate(config.dropout_rate)?;

        let mut rng = SimpleRng::new(config.seed);
        let params = ParameterStore::build(&config.architecture, config.initializer, &mut rng);
        let optimizer = Optimizer::new(
            config.optimizer,
            config.learning_rate,
            config.architecture.parameter_count(),
        )?;
        let gradients = zero_gradients(params.layers());

        info!(
            "Built network {:?} ({} parameters), activation={}, optimizer={} lr={}, loss={}, init={}",
            config.architecture.sizes(),
            config.architecture.parameter_count(),
            config.activation,
            config.optimizer,
            config.learning_rate,
            config.loss,
            config.initializer
        );

        Ok(Self {
            architecture: config.architecture,
            activation: config.activation,
            loss: config.loss,
            initializer: config.initializer,
            optimizer,
            dropout_rate: config.dropout_rate,
            seed: config.seed,
            rng,
            params,
            gradients,
            last_cache: None,
            loss_history: Vec::new(),
            epoch: 0,
        })
    }

    /// Rebuild a network from an exported document, architecture included.
    /// Any defect in the document is a `Validation` error.
    pub fn from_document(doc: &ModelDocument) -> Result<Self> {
        let (architecture, _) = doc.to_layers()?;
        let mut net = Self::from_config(&NetworkConfig {
            architecture: architecture.sizes().to_vec(),
            activation: doc.activation.clone(),
            optimizer: doc.optimizer.clone(),
            learning_rate: doc.learning_rate,
            ..NetworkConfig::default()
        })
        .map_err(document_error)?;
        net.import_model(doc)?;
        Ok(net)
    }

    // ----- configuration --------------------------------------------------

    pub fn set_activation(&mut self, name: &str) -> Result<()> {
        self.activation = name.parse()?;
        info!("Activation set to {}", self.activation);
        Ok(())
    }

    pub fn set_loss(&mut self, name: &str) -> Result<()> {
        self.loss = name.parse()?;
        info!("Loss set to {}", self.loss);
        Ok(())
    }

    /// Switch optimizer and learning rate. All auxiliary state starts fresh,
    /// even when the kind is unchanged.
    pub fn set_optimizer(&mut self, name: &str, learning_rate: f64) -> Result<()> {
        let kind: OptimizerKind = name.parse()?;
        self.optimizer = Optimizer::new(kind, learning_rate, self.architecture.parameter_count())?;
        info!("Optimizer set to {} (lr={})", kind, learning_rate);
        Ok(())
    }

    pub fn set_dropout_rate(&mut self, rate: f64) -> Result<()> {
        validate_rate(rate)?;
        self.dropout_rate = rate;
        info!("Dropout rate set to {}", rate);
        Ok(())
    }

    // ----- training -------------------------------------------------------

    /// One full-batch epoch: forward and backward on every sample, then a
    /// single optimizer step on the summed gradient.
    ///
    /// Every sample is shape-checked before anything changes.
    ///
    /// # Returns
    ///
    /// The mean loss over the batch, which is also appended to the history.
    /// A non-finite loss is returned as-is.
    pub fn train_epoch(&mut self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
        self.check_batch(inputs, targets)?;

        let mut accumulated = zero_gradients(self.params.layers());
        let mut total_loss = 0.0;
        let mut last = None;

        for (input, target) in inputs.iter().zip(targets) {
            let cache = forward_pass(
                self.params.layers(),
                self.activation,
                input,
                Some((self.dropout_rate, &mut self.rng)),
            )?;
            total_loss += self.loss.compute(cache.output(), target);
            let grads = backward_pass(self.params.layers(), self.activation, self.loss, &cache, target)?;
            for (acc, g) in accumulated.iter_mut().zip(&grads) {
                acc.accumulate(g);
            }
            last = Some(cache);
        }

        self.optimizer.step(self.params.layers_mut(), &accumulated);
        self.gradients = accumulated;
        self.last_cache = last;

        let mean_loss = total_loss / inputs.len() as f64;
        self.loss_history.push(mean_loss);
        self.epoch += 1;

        if !mean_loss.is_finite() {
            warn!("Epoch {}: loss is {} (training has diverged)", self.epoch, mean_loss);
        }
        debug!("Epoch {} loss={:.6}", self.epoch, mean_loss);
        Ok(mean_loss)
    }

    fn check_batch(&self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
        if inputs.is_empty() {
            return Err(NetworkError::shape("training batch is empty"));
        }
        if inputs.len() != targets.len() {
            return Err(NetworkError::shape(format!(
                "{} inputs but {} targets",
                inputs.len(),
                targets.len()
            )));
        }
        for (i, (input, target)) in inputs.iter().zip(targets).enumerate() {
            NetworkError::check_len(&format!("input {}", i), self.architecture.input_size(), input.len())?;
            NetworkError::check_len(&format!("target {}", i), self.architecture.output_size(), target.len())?;
        }
        Ok(())
    }

    /// Inference-mode output; never applies dropout.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        let cache = forward_pass(self.params.layers(), self.activation, input, None)?;
        Ok(cache.output().to_vec())
    }

    /// Training-mode forward pass (dropout applied); the cache is kept and
    /// returned for the forward-pass diagram.
    pub fn forward(&mut self, input: &[f64]) -> Result<&ForwardCache> {
        let cache = forward_pass(
            self.params.layers(),
            self.activation,
            input,
            Some((self.dropout_rate, &mut self.rng)),
        )?;
        let cache: &ForwardCache = self.last_cache.insert(cache);
        Ok(cache)
    }

    /// Forward pass in either mode with a caller-supplied random source.
    pub fn forward_with(&self, input: &[f64], training: bool, rng: &mut SimpleRng) -> Result<ForwardCache> {
        let dropout = if training {
            Some((self.dropout_rate, rng))
        } else {
            None
        };
        forward_pass(self.params.layers(), self.activation, input, dropout)
    }

    /// Gradients for the most recent [`Network::forward`] against `target`.
    /// They replace the stored gradient; parameters are not updated.
    ///
    /// Without a cached forward pass there is nothing to differentiate, which
    /// is reported as a `Shape` error (an empty cache).
    pub fn backward(&mut self, target: &[f64]) -> Result<&[LayerGradients]> {
        let cache = self
            .last_cache
            .as_ref()
            .ok_or_else(|| NetworkError::shape("no forward cache, call forward before backward"))?;
        self.gradients = backward_pass(self.params.layers(), self.activation, self.loss, cache, target)?;
        Ok(&self.gradients)
    }

    /// Gradients for an arbitrary cache, without touching the network.
    pub fn gradients_for(&self, cache: &ForwardCache, target: &[f64]) -> Result<Vec<LayerGradients>> {
        backward_pass(self.params.layers(), self.activation, self.loss, cache, target)
    }

    /// Restore the (possibly edited) initial snapshot, reseed the random
    /// source and clear history, optimizer state and gradients.
    pub fn reset(&mut self) {
        self.params.restore_initial();
        self.rng = SimpleRng::new(self.seed);
        self.optimizer.reset();
        self.gradients = zero_gradients(self.params.layers());
        self.last_cache = None;
        self.loss_history.clear();
        self.epoch = 0;
        info!("Network reset to its initial snapshot");
    }

    // ----- introspection --------------------------------------------------

    pub fn weight_stats(&self) -> WeightStats {
        WeightStats::collect(self.params.layers(), &self.gradients)
    }

    /// Inference pass with every neuron's terms recorded.
    pub fn trace(&self, input: &[f64]) -> Result<ForwardTrace> {
        trace::trace_forward(self.params.layers(), self.activation, input)
    }

    /// Split output 0 into the last hidden layer's weighted contributions at
    /// each x.
    pub fn output_contributions(&self, xs: &[f64]) -> Result<Vec<Contribution>> {
        if self.architecture.input_size() != 1 {
            return Err(NetworkError::shape(format!(
                "output decomposition needs a single input, network takes {}",
                self.architecture.input_size()
            )));
        }
        trace::output_contributions(self.params.layers(), self.activation, xs)
    }

    pub fn edit_initial_weight(&mut self, layer: usize, out: usize, input: usize, value: f64) -> Result<()> {
        self.params.edit_initial_weight(layer, out, input, value)
    }

    pub fn edit_initial_bias(&mut self, layer: usize, index: usize, value: f64) -> Result<()> {
        self.params.edit_initial_bias(layer, index, value)
    }

    pub fn weight(&self, layer: usize, out: usize, input: usize) -> Result<f64> {
        self.params.weight(layer, out, input)
    }

    pub fn bias(&self, layer: usize, index: usize) -> Result<f64> {
        self.params.bias(layer, index)
    }

    pub fn initial_weight(&self, layer: usize, out: usize, input: usize) -> Result<f64> {
        self.params.initial_weight(layer, out, input)
    }

    pub fn initial_bias(&self, layer: usize, index: usize) -> Result<f64> {
        self.params.initial_bias(layer, index)
    }

    pub fn weight_delta(&self, layer: usize, out: usize, input: usize) -> Result<f64> {
        self.params.weight_delta(layer, out, input)
    }

    pub fn bias_delta(&self, layer: usize, index: usize) -> Result<f64> {
        self.params.bias_delta(layer, index)
    }

    pub fn layers(&self) -> &[DenseLayer] {
        self.params.layers()
    }

    pub fn initial_layers(&self) -> &[DenseLayer] {
        self.params.initial_layers()
    }

    pub fn gradients(&self) -> &[LayerGradients] {
        &self.gradients
    }

    pub fn last_cache(&self) -> Option<&ForwardCache> {
        self.last_cache.as_ref()
    }

    pub fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn loss(&self) -> Loss {
        self.loss
    }

    pub fn initializer(&self) -> Initializer {
        self.initializer
    }

    pub fn optimizer(&self) -> &Optimizer {
        &self.optimizer
    }

    pub fn learning_rate(&self) -> f64 {
        self.optimizer.learning_rate()
    }

    pub fn dropout_rate(&self) -> f64 {
        self.dropout_rate
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }

    // ----- serialization --------------------------------------------------

    /// Current parameters and training state; the initial snapshot is not
    /// included.
    pub fn export_model(&self) -> ModelDocument {
        let layers = self.params.layers();
        ModelDocument {
            architecture: self.architecture.sizes().to_vec(),
            activation: self.activation.name().to_string(),
            optimizer: self.optimizer.kind().name().to_string(),
            learning_rate: self.optimizer.learning_rate(),
            loss_history: self.loss_history.clone(),
            epoch: self.epoch,
            weights: layers.iter().map(|l| l.weights().to_vec()).collect(),
            biases: layers.iter().map(|l| l.biases().to_vec()).collect(),
            loss: Some(self.loss.name().to_string()),
            dropout_rate: Some(self.dropout_rate),
        }
    }

    /// Replace parameters, hyperparameters and history with `doc`.
    ///
    /// The document must describe this network's architecture. Everything is
    /// checked before the first field is written, so on error the network is
    /// untouched. The imported parameters become the new initial snapshot and
    /// the optimizer starts with fresh state. Unknown names and out-of-range
    /// rates in the document are `Validation` errors like any other defect.
    pub fn import_model(&mut self, doc: &ModelDocument) -> Result<()> {
        let (architecture, layers) = doc.to_layers()?;
        if architecture != self.architecture {
            return Err(NetworkError::validation(format!(
                "document architecture {:?} does not match network {:?}",
                architecture.sizes(),
                self.architecture.sizes()
            )));
        }

        let activation: Activation = doc.activation.parse().map_err(document_error)?;
        let kind: OptimizerKind = doc.optimizer.parse().map_err(document_error)?;
        let optimizer =
            Optimizer::new(kind, doc.learning_rate, architecture.parameter_count()).map_err(document_error)?;
        let loss: Loss = match &doc.loss {
            Some(name) => name.parse().map_err(document_error)?,
            None => self.loss,
        };
        let dropout_rate = match doc.dropout_rate {
            Some(rate) => {
                validate_rate(rate).map_err(document_error)?;
                rate
            }
            None => self.dropout_rate,
        };

        self.params = ParameterStore::from_layers(layers);
        self.gradients = zero_gradients(self.params.layers());
        self.activation = activation;
        self.optimizer = optimizer;
        self.loss = loss;
        self.dropout_rate = dropout_rate;
        self.last_cache = None;
        self.loss_history = doc.loss_history.clone();
        self.epoch = doc.epoch;

        info!(
            "Imported model {:?} at epoch {} ({} loss values)",
            self.architecture.sizes(),
            self.epoch,
            self.loss_history.len()
        );
        Ok(())
    }

    pub fn export_json(&self) -> Result<String> {
        self.export_model().to_json()
    }

    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let doc = ModelDocument::from_json(json)?;
        self.import_model(&doc)
    }
}

fn zero_gradients(layers: &[DenseLayer]) -> Vec<LayerGradients> {
    layers.iter().map(LayerGradients::zeros_like).collect()
}

/// A bad name or rate read from a model document is a document defect.
fn document_error(err: NetworkError) -> NetworkError {
    match err {
        NetworkError::Configuration(msg) => NetworkError::Validation(msg),
        other => other,
    }
}
