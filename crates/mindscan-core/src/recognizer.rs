//! # Concern Recognizer
//!
//! The trainable sequence-labeling capability behind concern extraction.
//! [`SequenceLabeler`] is all inference and evaluation need;
//! [`TrainableLabeler`] adds what a training loop drives. The pipeline only
//! talks to these traits, so the tagging algorithm can be swapped freely.

use std::path::Path;

use oorandom::Rand32;
use tracing::{debug, info};

use crate::crf::features::sentence_features;
use crate::crf::model::{CrfModel, TaggedSentence};
use crate::error::{MindscanError, Result};
use crate::parser::bio_tags::{BioTag, entities_from_tags, tags_from_spans};
use crate::parser::tokenizer::Tokenizer;
use crate::parser::viterbi::ViterbiDecoder;
use crate::types::{AnnotatedText, CONCERN_LABEL, Span};

/// Perceptron step size. Scaling it only rescales the weights.
const LEARNING_RATE: f32 = 1.0;

/// Anything that can find labeled spans in raw text.
///
/// Implementations must not mutate themselves during prediction, so a loaded
/// labeler can be shared across threads.
pub trait SequenceLabeler: Send + Sync {
    /// The entity label this labeler emits.
    fn label(&self) -> &str;

    /// Predicted spans, ordered by position in `text`.
    fn predict_spans(&self, text: &str) -> Result<Vec<Span>>;
}

/// A labeler that can be created blank, updated example by example and
/// persisted.
pub trait TrainableLabeler: SequenceLabeler + Sized {
    /// Model-specific prepared form of a gold example.
    type Example;

    /// A model registered for exactly one label, with no learned weights.
    fn blank(label: &str) -> Result<Self>;

    /// Prepare a gold example, or `None` if the model cannot represent it.
    fn make_example(&self, doc: &AnnotatedText) -> Option<Self::Example>;

    /// One stochastic update on a single example; returns its loss.
    fn update(&mut self, example: &Self::Example, dropout: f32, rng: &mut Rand32) -> Result<f32>;

    /// Persist the learned parameters, overwriting whatever is at `path`.
    fn save(&self, path: &Path) -> Result<()>;
}

/// Texts of the [`CONCERN_LABEL`] spans `labeler` finds in `text`, in
/// positional order. Spans under any other label are ignored.
pub fn extract_concerns<L>(labeler: &L, text: &str) -> Result<Vec<String>>
where
    L: SequenceLabeler + ?Sized,
{
    Ok(labeler
        .predict_spans(text)?
        .into_iter()
        .filter(|span| span.label == CONCERN_LABEL)
        .filter_map(|span| span.slice(text).map(str::to_string))
        .collect())
}

/// Perceptron-CRF recognizer for mental-health concern spans.
#[derive(Debug, Clone)]
pub struct ConcernRecognizer {
    model: CrfModel,
    tokenizer: Tokenizer,
    decoder: ViterbiDecoder,
}

impl ConcernRecognizer {
    fn from_model(model: CrfModel) -> Result<Self> {
        Ok(Self {
            model,
            tokenizer: Tokenizer::new()?,
            decoder: ViterbiDecoder::new(),
        })
    }

    /// A blank recognizer for [`CONCERN_LABEL`].
    pub fn new() -> Result<Self> {
        Self::blank(CONCERN_LABEL)
    }

    /// Load a persisted recognizer.
    ///
    /// # Errors
    ///
    /// Returns `MindscanError::ModelLoad` if the file is missing, does not
    /// hold a valid model, or holds a model for a label other than
    /// [`CONCERN_LABEL`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let model = CrfModel::load(path)?;
        if model.label != CONCERN_LABEL {
            return Err(MindscanError::model_load(
                path,
                format!(
                    "model is trained for {:?}, expected {CONCERN_LABEL:?}",
                    model.label
                ),
            ));
        }
        info!(
            path = %path.display(),
            label = %model.label,
            features = model.num_features(),
            "loaded concern model"
        );
        Self::from_model(model)
    }

    /// Texts of all recognized concerns, first to last.
    ///
    /// # Examples
    /// ```
    /// use mindscan_core::ConcernRecognizer;
    ///
    /// let recognizer = ConcernRecognizer::new().unwrap();
    /// // A blank model has learned nothing yet.
    /// assert!(recognizer.extract_concerns("I feel anxious").unwrap().is_empty());
    /// ```
    pub fn extract_concerns(&self, text: &str) -> Result<Vec<String>> {
        extract_concerns(self, text)
    }

    /// Learned parameters, for inspection.
    pub fn model(&self) -> &CrfModel {
        &self.model
    }
}

impl SequenceLabeler for ConcernRecognizer {
    fn label(&self) -> &str {
        &self.model.label
    }

    fn predict_spans(&self, text: &str) -> Result<Vec<Span>> {
        let tokens = self.tokenizer.tokenize(text);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let features = sentence_features(&tokens);
        let tags: Vec<BioTag> = self
            .model
            .predict(&self.decoder, &features)?
            .into_iter()
            .filter_map(BioTag::from_index)
            .collect();

        Ok(entities_from_tags(&tokens, &tags)
            .into_iter()
            .map(|entity| Span::new(entity.start, entity.end, self.model.label.clone()))
            .collect())
    }
}

impl TrainableLabeler for ConcernRecognizer {
    type Example = TaggedSentence;

    fn blank(label: &str) -> Result<Self> {
        Self::from_model(CrfModel::new(label))
    }

    fn make_example(&self, doc: &AnnotatedText) -> Option<TaggedSentence> {
        let tokens = self.tokenizer.tokenize(&doc.text);
        let own: Vec<Span> = doc
            .spans
            .iter()
            .filter(|span| span.label == self.model.label)
            .cloned()
            .collect();

        let Some(tags) = tags_from_spans(&tokens, &own) else {
            debug!(text = %doc.text, "span boundaries do not align with tokens, skipping");
            return None;
        };

        Some(TaggedSentence {
            features: sentence_features(&tokens),
            gold: tags.iter().map(BioTag::index).collect(),
        })
    }

    fn update(&mut self, example: &TaggedSentence, dropout: f32, rng: &mut Rand32) -> Result<f32> {
        self.model
            .train_step(&self.decoder, example, dropout, LEARNING_RATE, rng)
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.model.save(path)?;
        info!(path = %path.display(), "saved concern model");
        Ok(())
    }
}
