use serde::{Deserialize, Serialize};

use super::category::ConcernCategory;

/// The analysis of one extracted concern phrase.
///
/// Computed per request and handed to the caller; nothing here is retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcernResult {
    /// Phrase as recognized in the input text.
    pub phrase: String,
    /// First matching category, or `Other`.
    pub category: ConcernCategory,
    /// Severity in `[1, 10]`.
    pub intensity: u8,
}

impl ConcernResult {
    #[must_use]
    pub fn new(phrase: impl Into<String>, category: ConcernCategory, intensity: u8) -> Self {
        Self {
            phrase: phrase.into(),
            category,
            intensity,
        }
    }
}

impl std::fmt::Display for ConcernResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} -> {} (intensity {})",
            self.phrase, self.category, self.intensity
        )
    }
}
