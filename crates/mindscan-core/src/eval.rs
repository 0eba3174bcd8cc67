//! Span-level precision / recall / F1 for a [`SequenceLabeler`].
//!
//! Matching is strict: a prediction counts only when start, end and label
//! all equal a gold span. There is no partial-overlap credit.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::recognizer::SequenceLabeler;
use crate::types::{AnnotatedText, Span};

/// True/false positive and false negative counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl MatchCounts {
    /// Count exact matches between one text's predicted and gold spans.
    ///
    /// Each gold span can absorb at most one prediction, so duplicated
    /// predictions of the same span count as false positives.
    #[must_use]
    pub fn from_spans(predicted: &[Span], gold: &[Span]) -> Self {
        let mut unmatched: HashMap<&Span, usize> = HashMap::new();
        for span in gold {
            *unmatched.entry(span).or_default() += 1;
        }

        let mut counts = Self::default();
        for span in predicted {
            match unmatched.get_mut(span) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    counts.true_positives += 1;
                }
                _ => counts.false_positives += 1,
            }
        }
        counts.false_negatives = gold.len() - counts.true_positives;
        counts
    }

    /// `tp / (tp + fp)`, or 0.0 when nothing was predicted.
    #[must_use]
    pub fn precision(&self) -> f64 {
        let predicted = self.true_positives + self.false_positives;
        if predicted == 0 {
            return 0.0;
        }
        self.true_positives as f64 / predicted as f64
    }

    /// `tp / (tp + fn)`, or 0.0 when there is no gold span.
    #[must_use]
    pub fn recall(&self) -> f64 {
        let gold = self.true_positives + self.false_negatives;
        if gold == 0 {
            return 0.0;
        }
        self.true_positives as f64 / gold as f64
    }

    /// Harmonic mean of precision and recall, 0.0 when both are 0.
    #[must_use]
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }

    pub fn merge(&mut self, other: &MatchCounts) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
    }
}

/// Aggregate evaluation over a labeled set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub examples: usize,
    pub counts: MatchCounts,
}

impl EvalReport {
    #[must_use]
    pub fn from_counts(counts: MatchCounts, examples: usize) -> Self {
        Self {
            precision: counts.precision(),
            recall: counts.recall(),
            f1: counts.f1(),
            examples,
            counts,
        }
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Precision: {:.4}", self.precision)?;
        writeln!(f, "Recall:    {:.4}", self.recall)?;
        write!(f, "F1-score:  {:.4}", self.f1)
    }
}

/// Run `labeler` over every example and score it against the gold spans.
///
/// Neither the labeler nor the examples are modified.
///
/// # Errors
///
/// Propagates prediction failures from the labeler.
pub fn evaluate<L>(labeler: &L, examples: &[AnnotatedText]) -> Result<EvalReport>
where
    L: SequenceLabeler + ?Sized,
{
    let mut total = MatchCounts::default();
    for example in examples {
        let predicted = labeler.predict_spans(&example.text)?;
        let counts = MatchCounts::from_spans(&predicted, &example.spans);
        debug!(text = %example.text, ?counts, "scored example");
        total.merge(&counts);
    }
    Ok(EvalReport::from_counts(total, examples.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CONCERN_LABEL;

    /// Labeler that replays a fixed answer per text.
    struct Oracle(HashMap<String, Vec<Span>>);

    impl SequenceLabeler for Oracle {
        fn label(&self) -> &str {
            CONCERN_LABEL
        }

        fn predict_spans(&self, text: &str) -> Result<Vec<Span>> {
            Ok(self.0.get(text).cloned().unwrap_or_default())
        }
    }

    fn gold() -> Vec<AnnotatedText> {
        vec![
            AnnotatedText::new("I feel hopeless", vec![Span::concern(7, 15)]),
            AnnotatedText::new("I can't sleep at night", vec![Span::concern(2, 13)]),
        ]
    }

    #[test]
    fn perfect_predictions_score_one() {
        let oracle = Oracle(gold().into_iter().map(|d| (d.text, d.spans)).collect());
        let report = evaluate(&oracle, &gold()).unwrap();

        assert_eq!(report.precision, 1.0);
        assert_eq!(report.recall, 1.0);
        assert_eq!(report.f1, 1.0);
        assert_eq!(report.examples, 2);
    }

    #[test]
    fn no_predictions_score_zero_recall() {
        let report = evaluate(&Oracle(HashMap::new()), &gold()).unwrap();

        assert_eq!(report.recall, 0.0);
        assert_eq!(report.f1, 0.0);
        assert_eq!(report.precision, 0.0);
        assert_eq!(report.counts.false_negatives, 2);
    }

    #[test]
    fn boundary_mismatch_gets_no_credit() {
        let mut answers = HashMap::new();
        // "feel hopeless" instead of "hopeless"
        answers.insert("I feel hopeless".to_string(), vec![Span::concern(2, 15)]);
        answers.insert(
            "I can't sleep at night".to_string(),
            vec![Span::concern(2, 13)],
        );
        let report = evaluate(&Oracle(answers), &gold()).unwrap();

        assert_eq!(report.counts.true_positives, 1);
        assert_eq!(report.counts.false_positives, 1);
        assert_eq!(report.counts.false_negatives, 1);
        assert!((report.precision - 0.5).abs() < 1e-9);
        assert!((report.recall - 0.5).abs() < 1e-9);
        assert!((report.f1 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn label_must_match() {
        let counts = MatchCounts::from_spans(&[Span::new(7, 15, "OTHER")], &[Span::concern(7, 15)]);
        assert_eq!(counts.true_positives, 0);
        assert_eq!(counts.false_positives, 1);
        assert_eq!(counts.false_negatives, 1);
    }

    #[test]
    fn duplicate_predictions_are_false_positives() {
        let gold = [Span::concern(0, 4)];
        let counts = MatchCounts::from_spans(&[Span::concern(0, 4), Span::concern(0, 4)], &gold);
        assert_eq!(counts.true_positives, 1);
        assert_eq!(counts.false_positives, 1);
        assert_eq!(counts.false_negatives, 0);
    }

    #[test]
    fn empty_everything_is_degenerate_zero() {
        let report = evaluate(&Oracle(HashMap::new()), &[]).unwrap();
        assert_eq!(report.precision, 0.0);
        assert_eq!(report.recall, 0.0);
        assert_eq!(report.f1, 0.0);
    }

    #[test]
    fn display_uses_four_decimals() {
        let report = EvalReport::from_counts(
            MatchCounts {
                true_positives: 2,
                false_positives: 1,
                false_negatives: 0,
            },
            3,
        );
        let text = report.to_string();
        assert!(text.contains("Precision: 0.6667"));
        assert!(text.contains("Recall:    1.0000"));
    }
}
