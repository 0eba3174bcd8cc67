//! Training loop for any [`TrainableLabeler`].

use std::marker::PhantomData;
use std::path::Path;

use anyhow::{Context, Result, bail};
use mindscan_core::{
    AnnotatedText, CONCERN_LABEL, ConcernRecognizer, EvalReport, TrainableLabeler, evaluate,
};
use oorandom::Rand32;
use serde::Serialize;
use tracing::{info, warn};

use crate::data::{align_spans, load_dataset};

/// Highest accepted dropout rate; 1.0 would mask every feature.
const MAX_DROPOUT: f32 = 0.99;

/// Configuration for a training run.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Full passes over the training set.
    pub epochs: usize,
    /// Probability of masking each input feature during an update.
    pub dropout: f32,
    /// Seed for shuffling and dropout.
    pub seed: u64,
    /// The single entity label the model is registered with.
    pub label: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 30,
            dropout: 0.3,
            seed: 42,
            label: CONCERN_LABEL.to_string(),
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the dropout rate, clamped to `[0, 1)`. NaN disables dropout.
    pub fn with_dropout(mut self, dropout: f32) -> Self {
        self.dropout = if dropout.is_nan() {
            0.0
        } else {
            dropout.clamp(0.0, MAX_DROPOUT)
        };
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Aggregate loss of one pass over the training set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochReport {
    /// 1-based.
    pub epoch: usize,
    pub loss: f32,
}

/// A freshly trained model and its loss history.
#[derive(Debug)]
pub struct TrainedModel<M> {
    pub model: M,
    pub history: Vec<EpochReport>,
    /// Examples the model could actually learn from.
    pub examples: usize,
}

/// Trains a blank `M` from annotated texts.
pub struct Trainer<M> {
    config: TrainingConfig,
    _model: PhantomData<M>,
}

impl<M: TrainableLabeler> Trainer<M> {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            _model: PhantomData,
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every epoch over `docs` and return the final model.
    ///
    /// Each epoch visits all examples once in a freshly shuffled order.
    /// Fails if no document can be turned into a training example.
    pub fn train(&self, docs: &[AnnotatedText]) -> Result<TrainedModel<M>> {
        let mut model = M::blank(&self.config.label)?;

        let examples: Vec<M::Example> = docs
            .iter()
            .filter_map(|doc| model.make_example(doc))
            .collect();
        if examples.is_empty() {
            warn!(documents = docs.len(), "no usable training examples");
            bail!(
                "No usable training examples ({} documents supplied)",
                docs.len()
            );
        }

        info!(
            examples = examples.len(),
            skipped = docs.len() - examples.len(),
            epochs = self.config.epochs,
            dropout = self.config.dropout,
            "starting training"
        );

        let mut rng = Rand32::new(self.config.seed);
        let mut order: Vec<usize> = (0..examples.len()).collect();
        let mut history = Vec::with_capacity(self.config.epochs);

        for epoch in 1..=self.config.epochs {
            shuffle(&mut order, &mut rng);

            let mut loss = 0.0f32;
            for &idx in &order {
                loss += model.update(&examples[idx], self.config.dropout, &mut rng)?;
            }

            info!(epoch, epochs = self.config.epochs, loss, "epoch complete");
            history.push(EpochReport { epoch, loss });
        }

        Ok(TrainedModel {
            model,
            history,
            examples: examples.len(),
        })
    }
}

/// In-place Fisher-Yates shuffle.
fn shuffle(items: &mut [usize], rng: &mut Rand32) {
    for i in (1..items.len()).rev() {
        let j = rng.rand_range(0..(i as u32 + 1)) as usize;
        items.swap(i, j);
    }
}

/// Load the CSV at `dataset`, align its concern phrases into spans.
pub fn load_annotated(dataset: impl AsRef<Path>) -> Result<Vec<AnnotatedText>> {
    let examples = load_dataset(dataset)?;
    let annotated: Vec<AnnotatedText> = align_spans(&examples)
        .into_iter()
        .map(AnnotatedText::from)
        .collect();
    info!(
        rows = examples.len(),
        aligned = annotated.len(),
        "prepared training data"
    );
    Ok(annotated)
}

/// Train a concern recognizer on the CSV at `dataset` and write it to
/// `model_path`, replacing any model already there.
pub fn run_training(
    dataset: impl AsRef<Path>,
    model_path: impl AsRef<Path>,
    config: TrainingConfig,
) -> Result<TrainedModel<ConcernRecognizer>> {
    let model_path = model_path.as_ref();
    let docs = load_annotated(dataset)?;

    let trained = Trainer::<ConcernRecognizer>::new(config).train(&docs)?;
    trained
        .model
        .save(model_path)
        .with_context(|| format!("Failed to save model: {}", model_path.display()))?;

    Ok(trained)
}

/// Score the model at `model_path` against the aligned spans of `dataset`.
pub fn evaluate_model(
    model_path: impl AsRef<Path>,
    dataset: impl AsRef<Path>,
) -> Result<EvalReport> {
    let model_path = model_path.as_ref();
    let recognizer = ConcernRecognizer::load(model_path)
        .with_context(|| format!("Failed to load model: {}", model_path.display()))?;
    let docs = load_annotated(dataset)?;
    Ok(evaluate(&recognizer, &docs)?)
}
