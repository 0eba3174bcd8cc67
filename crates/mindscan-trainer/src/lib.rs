//! # Mindscan Trainer
//!
//! Offline workflows for the concern recognizer: CSV dataset loading, span
//! alignment, the training loop and evaluation against a labeled file.

pub mod data;
pub mod trainer;

pub use data::{align_spans, load_dataset, read_dataset};
pub use trainer::{
    EpochReport, TrainedModel, Trainer, TrainingConfig, evaluate_model, load_annotated,
    run_training,
};
