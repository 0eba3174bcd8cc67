//! # Concern Analyzer
//!
//! Composes extraction, classification and intensity scoring into the
//! per-input analysis a request handler needs.

use std::sync::Arc;

use crate::error::Result;
use crate::recognizer::{ConcernRecognizer, SequenceLabeler, extract_concerns};
use crate::scoring::{CategoryTable, classify_concern, score_intensity};
use crate::types::{ConcernCategory, ConcernResult};

/// Read-only analysis service.
///
/// Cloning is cheap; clones share the loaded labeler and table, so one
/// analyzer can serve many threads.
pub struct ConcernAnalyzer<L: ?Sized = ConcernRecognizer> {
    labeler: Arc<L>,
    table: Arc<CategoryTable>,
}

impl<L: ?Sized> Clone for ConcernAnalyzer<L> {
    fn clone(&self) -> Self {
        Self {
            labeler: Arc::clone(&self.labeler),
            table: Arc::clone(&self.table),
        }
    }
}

impl<L: SequenceLabeler + ?Sized> ConcernAnalyzer<L> {
    pub fn new(labeler: Arc<L>, table: CategoryTable) -> Self {
        Self {
            labeler,
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    pub fn labeler(&self) -> &L {
        &self.labeler
    }

    /// Concern phrases in `text`, first to last.
    pub fn extract_concerns(&self, text: &str) -> Result<Vec<String>> {
        extract_concerns(self.labeler.as_ref(), text)
    }

    #[must_use]
    pub fn classify(&self, phrase: &str) -> ConcernCategory {
        classify_concern(&self.table, phrase)
    }

    #[must_use]
    pub fn score_intensity(&self, phrase: &str) -> u8 {
        score_intensity(&self.table, phrase)
    }

    /// Extract every concern and attach its category and intensity.
    ///
    /// Blank input yields an empty list without consulting the model.
    pub fn analyze(&self, text: &str) -> Result<Vec<ConcernResult>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .extract_concerns(text)?
            .into_iter()
            .map(|phrase| {
                let category = self.classify(&phrase);
                let intensity = self.score_intensity(&phrase);
                ConcernResult::new(phrase, category, intensity)
            })
            .collect())
    }
}

impl ConcernAnalyzer<ConcernRecognizer> {
    /// Load a persisted recognizer and pair it with `table`.
    ///
    /// # Errors
    ///
    /// Returns `MindscanError::ModelLoad` if the model cannot be loaded.
    pub fn from_model_path(
        path: impl AsRef<std::path::Path>,
        table: CategoryTable,
    ) -> Result<Self> {
        let recognizer = ConcernRecognizer::load(path)?;
        Ok(Self::new(Arc::new(recognizer), table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CONCERN_LABEL, Span};

    /// Tags every occurrence of a fixed list of phrases.
    struct PhraseLabeler(Vec<&'static str>);

    impl SequenceLabeler for PhraseLabeler {
        fn label(&self) -> &str {
            CONCERN_LABEL
        }

        fn predict_spans(&self, text: &str) -> Result<Vec<Span>> {
            let mut spans: Vec<Span> = self
                .0
                .iter()
                .flat_map(|phrase| {
                    text.match_indices(phrase)
                        .map(|(start, m)| Span::concern(start, start + m.len()))
                })
                .collect();
            spans.sort_by_key(|s| s.start);
            Ok(spans)
        }
    }

    fn analyzer() -> ConcernAnalyzer<PhraseLabeler> {
        ConcernAnalyzer::new(
            Arc::new(PhraseLabeler(vec![
                "panic attacks are overwhelming me",
                "hopeless and empty",
                "nice weather",
            ])),
            CategoryTable::default(),
        )
    }

    #[test]
    fn analyze_composes_all_three_steps() {
        let results = analyzer()
            .analyze("Lately panic attacks are overwhelming me and I feel hopeless and empty")
            .unwrap();

        assert_eq!(
            results,
            vec![
                ConcernResult::new(
                    "panic attacks are overwhelming me",
                    ConcernCategory::Anxiety,
                    9
                ),
                ConcernResult::new("hopeless and empty", ConcernCategory::Depression, 10),
            ]
        );
    }

    #[test]
    fn unmatched_phrase_is_other_with_minimum_intensity() {
        let results = analyzer().analyze("such nice weather").unwrap();
        assert_eq!(
            results,
            vec![ConcernResult::new("nice weather", ConcernCategory::Other, 1)]
        );
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(analyzer().analyze("   ").unwrap().is_empty());
        assert!(analyzer().analyze("nothing to see").unwrap().is_empty());
    }

    #[test]
    fn clones_share_state_across_threads() {
        let analyzer = analyzer();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let analyzer = analyzer.clone();
                std::thread::spawn(move || analyzer.analyze("hopeless and empty").unwrap())
            })
            .collect();

        for handle in handles {
            let results = handle.join().unwrap();
            assert_eq!(results[0].intensity, 10);
        }
    }

    #[test]
    fn dyn_labeler_is_supported() {
        let labeler: Arc<dyn SequenceLabeler> = Arc::new(PhraseLabeler(vec!["burnout"]));
        let analyzer = ConcernAnalyzer::new(labeler, CategoryTable::default());
        let results = analyzer.analyze("heading for burnout").unwrap();
        assert_eq!(results[0].category, ConcernCategory::Stress);
        assert_eq!(results[0].intensity, 10);
    }

    #[test]
    fn missing_model_path_fails() {
        let result =
            ConcernAnalyzer::from_model_path("/nonexistent/model.json", CategoryTable::default());
        assert!(result.is_err());
    }
}
