use serde::{Deserialize, Serialize};

/// The single entity label the recognizer is trained to emit.
pub const CONCERN_LABEL: &str = "MENTAL_HEALTH_CONCERN";

/// A row of the labeled dataset: a sentence and the concern phrase an
/// annotator extracted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    /// Raw user sentence.
    pub text: String,
    /// Phrase expected to occur in `text`.
    pub concern: String,
}

impl LabeledExample {
    pub fn new(text: impl Into<String>, concern: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            concern: concern.into(),
        }
    }
}

/// A labeled half-open interval `[start, end)` over some text.
///
/// Offsets are UTF-8 byte offsets, so `&text[start..end]` is the covered
/// phrase. For non-ASCII text they differ from character offsets; use
/// [`Span::char_range`] when character positions are needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl Span {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    /// Span carrying [`CONCERN_LABEL`].
    pub fn concern(start: usize, end: usize) -> Self {
        Self::new(start, end, CONCERN_LABEL)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slice the covered text, or `None` if the span does not fit `text`.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }

    /// The span as character offsets into `text`, or `None` if it does not
    /// fit `text`.
    pub fn char_range(&self, text: &str) -> Option<(usize, usize)> {
        let covered = self.slice(text)?;
        let start = text.get(..self.start)?.chars().count();
        Some((start, start + covered.chars().count()))
    }
}

/// A training/evaluation example with its span.
///
/// `start` and `end` are byte offsets: `&text[start..end]` is exactly the
/// trimmed concern phrase it was aligned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanAnnotation {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl SpanAnnotation {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end, self.label.clone())
    }

    /// The annotated phrase, or `None` if the offsets are out of range.
    pub fn covered(&self) -> Option<&str> {
        self.text.get(self.start..self.end)
    }
}

/// A text together with all of its gold spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedText {
    pub text: String,
    pub spans: Vec<Span>,
}

impl AnnotatedText {
    pub fn new(text: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            text: text.into(),
            spans,
        }
    }
}

impl From<SpanAnnotation> for AnnotatedText {
    fn from(annotation: SpanAnnotation) -> Self {
        let span = annotation.span();
        Self {
            text: annotation.text,
            spans: vec![span],
        }
    }
}
