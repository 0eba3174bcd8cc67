//! # Mindscan Core
//!
//! Mental-health concern extraction from free text. Provides a
//! perceptron-trained CRF span recognizer, keyword-table category
//! classification, intensity scoring and span-level evaluation.
//!
//! ## Quick Start
//!
//! ```rust
//! use mindscan_core::{CategoryTable, ConcernCategory, classify_concern, score_intensity};
//!
//! let table = CategoryTable::default();
//! let phrase = "panic attacks are overwhelming me";
//!
//! assert_eq!(classify_concern(&table, phrase), ConcernCategory::Anxiety);
//! assert_eq!(score_intensity(&table, phrase), 9);
//! ```
pub mod analyzer;
pub mod crf;
pub mod error;
pub mod eval;
pub mod parser;
pub mod recognizer;
pub mod scoring;
pub mod types;

// Re-export primary API
pub use analyzer::ConcernAnalyzer;
pub use error::{MindscanError, Result};
pub use eval::{EvalReport, MatchCounts, evaluate};
pub use parser::{BioTag, Token, Tokenizer, ViterbiDecoder};
pub use recognizer::{ConcernRecognizer, SequenceLabeler, TrainableLabeler, extract_concerns};
pub use scoring::{CategoryRules, CategoryTable, classify_concern, score_intensity};
pub use types::{
    AnnotatedText, CONCERN_LABEL, ConcernCategory, ConcernResult, LabeledExample, Span,
    SpanAnnotation,
};
