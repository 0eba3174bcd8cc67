//! # Mindscan
//!
//! Extract, categorize and score mental-health concerns in free text.
//!
//! This crate bundles [`mindscan_core`] (recognition, classification,
//! intensity scoring, evaluation) with [`mindscan_trainer`] (dataset
//! loading and the training loop).
//!
//! ```rust
//! use mindscan::{CategoryTable, ConcernCategory, classify_concern};
//!
//! let table = CategoryTable::default();
//! assert_eq!(classify_concern(&table, "I feel hopeless and empty"), ConcernCategory::Depression);
//! ```

pub use mindscan_core as core;
pub use mindscan_trainer as trainer;

pub use mindscan_core::{
    AnnotatedText, CONCERN_LABEL, CategoryRules, CategoryTable, ConcernAnalyzer, ConcernCategory,
    ConcernRecognizer, ConcernResult, EvalReport, LabeledExample, MindscanError, Result,
    SequenceLabeler, Span, SpanAnnotation, TrainableLabeler, classify_concern, evaluate,
    extract_concerns, score_intensity,
};
pub use mindscan_trainer::{
    Trainer, TrainingConfig, align_spans, evaluate_model, load_dataset, run_training,
};
