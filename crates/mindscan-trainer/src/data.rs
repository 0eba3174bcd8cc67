//! Dataset loading and span alignment.
//!
//! The dataset is a CSV file with a `User Input` column holding the
//! free text and an `Extracted Concern` column holding the concern phrase.
//! Any other columns are ignored.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use mindscan_core::{CONCERN_LABEL, LabeledExample, SpanAnnotation};
use tracing::debug;

pub const TEXT_COLUMN: &str = "User Input";
pub const CONCERN_COLUMN: &str = "Extracted Concern";

/// Load labeled examples from a CSV file.
///
/// Rows with a missing or blank text or concern are dropped. Values are
/// kept as written; trimming happens at alignment.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<LabeledExample>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;
    read_dataset(file).with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Same as [`load_dataset`] for any CSV byte source.
pub fn read_dataset<R: Read>(source: R) -> Result<Vec<LabeledExample>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        match headers.iter().position(|h| h.trim() == name) {
            Some(idx) => Ok(idx),
            None => bail!("Missing column: {name}"),
        }
    };
    let text_idx = column(TEXT_COLUMN)?;
    let concern_idx = column(CONCERN_COLUMN)?;

    let mut examples = Vec::new();
    let mut skipped = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("Failed to read row {}", idx + 1))?;
        let field = |i: usize| row.get(i).filter(|s| !s.trim().is_empty());

        match (field(text_idx), field(concern_idx)) {
            (Some(text), Some(concern)) => examples.push(LabeledExample::new(text, concern)),
            _ => {
                debug!(row = idx + 1, "missing text or concern, skipping row");
                skipped += 1;
            }
        }
    }

    debug!(kept = examples.len(), skipped, "loaded dataset");
    Ok(examples)
}

/// Locate each example's concern phrase inside its text.
///
/// The phrase is trimmed and matched case-sensitively; only its first
/// occurrence becomes a span. Examples whose phrase does not appear
/// verbatim are dropped. Output keeps input order.
pub fn align_spans(examples: &[LabeledExample]) -> Vec<SpanAnnotation> {
    let mut aligned = Vec::with_capacity(examples.len());

    for example in examples {
        let phrase = example.concern.trim();
        if phrase.is_empty() {
            continue;
        }

        match example.text.find(phrase) {
            Some(start) => aligned.push(SpanAnnotation {
                text: example.text.clone(),
                start,
                end: start + phrase.len(),
                label: CONCERN_LABEL.to_string(),
            }),
            None => debug!(text = %example.text, phrase, "concern not found in text, skipping"),
        }
    }

    debug!(
        aligned = aligned.len(),
        dropped = examples.len() - aligned.len(),
        "aligned spans"
    );
    aligned
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
User Input,Extracted Concern,Category
I have been feeling anxious lately,anxious,Anxiety
\"I can't sleep, it's awful\",can't sleep,Insomnia
no concern here,,Other
,hopeless,Depression
Work is fine,   ,Other
";

    #[test]
    fn test_reads_complete_rows_only() {
        let examples = read_dataset(CSV.as_bytes()).unwrap();
        assert_eq!(
            examples,
            vec![
                LabeledExample::new("I have been feeling anxious lately", "anxious"),
                LabeledExample::new("I can't sleep, it's awful", "can't sleep"),
            ]
        );
    }

    #[test]
    fn test_short_rows_count_as_missing() {
        let csv = "User Input,Extracted Concern\nonly text\nI feel sad,sad\n";
        let examples = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(examples, vec![LabeledExample::new("I feel sad", "sad")]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let err = read_dataset("text,concern\na,b\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("User Input"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let examples = load_dataset(file.path()).unwrap();
        assert_eq!(examples.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_dataset("/nonexistent/data.csv").unwrap_err();
        assert!(err.to_string().contains("Failed to open dataset"));
    }

    #[test]
    fn test_align_verbatim_phrase() {
        let aligned = align_spans(&[LabeledExample::new(
            "I feel hopeless and empty",
            "  hopeless and empty ",
        )]);

        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].start, 7);
        assert_eq!(aligned[0].end, 25);
        assert_eq!(aligned[0].label, CONCERN_LABEL);
        assert_eq!(aligned[0].covered(), Some("hopeless and empty"));
    }

    #[test]
    fn test_align_first_occurrence_only() {
        let aligned = align_spans(&[LabeledExample::new("sad, so sad", "sad")]);
        assert_eq!(aligned.len(), 1);
        assert_eq!((aligned[0].start, aligned[0].end), (0, 3));
    }

    #[test]
    fn test_align_skips_non_verbatim() {
        let examples = vec![
            LabeledExample::new("I feel Anxious", "anxious"),
            LabeledExample::new("I feel stressed", "stressed!"),
            LabeledExample::new("I feel stressed", "stressed"),
        ];
        let aligned = align_spans(&examples);
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].covered(), Some("stressed"));
    }

    #[test]
    fn test_align_handles_multibyte_text() {
        let aligned = align_spans(&[LabeledExample::new("Ça va… I'm worried", "worried")]);
        let span = &aligned[0];
        assert_eq!(&span.text[span.start..span.end], "worried");
    }
}
