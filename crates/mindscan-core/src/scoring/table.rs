use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MindscanError, Result};
use crate::types::ConcernCategory;

/// Lowest and highest intensity a keyword may carry.
pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 10;

const ANXIETY_KEYWORDS: &[&str] = &[
    "anxious", "panic", "worried", "overthinking", "nervous", "uneasy", "tense", "restless",
    "calm", "relaxed",
];
const ANXIETY_INTENSITY: &[(&str, u8)] = &[
    ("suicide", 10),
    ("panic", 9),
    ("anxious", 8),
    ("nervous", 7),
    ("worried", 6),
    ("overthinking", 7),
    ("uneasy", 4),
    ("tense", 5),
    ("restless", 5),
    ("calm", 2),
    ("relaxed", 1),
];

const DEPRESSION_KEYWORDS: &[&str] = &[
    "sad", "hopeless", "worthless", "unmotivated", "empty", "down", "gloomy", "lonely", "content",
    "hopeful",
];
const DEPRESSION_INTENSITY: &[(&str, u8)] = &[
    ("hopeless", 10),
    ("worthless", 9),
    ("sad", 7),
    ("unmotivated", 6),
    ("empty", 8),
    ("down", 5),
    ("gloomy", 4),
    ("lonely", 5),
    ("content", 2),
    ("hopeful", 1),
    ("happy", 1),
];

const STRESS_KEYWORDS: &[&str] = &[
    "stressed", "pressure", "overwhelmed", "burnout", "tension", "frustrated", "exhausted",
    "agitated", "focused", "motivated",
];
const STRESS_INTENSITY: &[(&str, u8)] = &[
    ("burnout", 10),
    ("overwhelmed", 9),
    ("stressed", 8),
    ("pressure", 7),
    ("tension", 6),
    ("frustrated", 5),
    ("exhausted", 4),
    ("agitated", 3),
    ("focused", 2),
    ("motivated", 1),
    ("sleepy", 2),
];

const INSOMNIA_KEYWORDS: &[&str] = &[
    "can't sleep", "insomnia", "restless", "sleep-deprived", "awake", "nightmare", "tossing",
    "turning", "well-rested", "refreshed",
];
const INSOMNIA_INTENSITY: &[(&str, u8)] = &[
    ("insomnia", 10),
    ("sleep-deprived", 9),
    ("restless", 8),
    ("can't sleep", 7),
    ("awake", 6),
    ("nightmare", 5),
    ("tossing", 4),
    ("turning", 3),
    ("well-rested", 2),
    ("refreshed", 1),
];

const EATING_DISORDER_KEYWORDS: &[&str] = &[
    "not eating", "overeating", "binge eating", "starving", "food issue", "skipping meals",
    "losing appetite", "craving food", "healthy eating", "balanced diet",
];
const EATING_DISORDER_INTENSITY: &[(&str, u8)] = &[
    ("binge eating", 10),
    ("starving", 9),
    ("overeating", 8),
    ("food issue", 7),
    ("not eating", 6),
    ("skipping meals", 5),
    ("losing appetite", 4),
    ("craving food", 3),
    ("healthy eating", 2),
    ("balanced diet", 1),
];

/// Matching keywords and keyword weights for one category.
///
/// The two lists are independent: a keyword can carry a weight without
/// deciding the category, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub category: ConcernCategory,
    pub keywords: Vec<String>,
    pub intensity: BTreeMap<String, u8>,
}

impl CategoryRules {
    fn from_static(
        category: ConcernCategory,
        keywords: &[&str],
        intensity: &[(&str, u8)],
    ) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            intensity: intensity.iter().map(|(k, w)| (k.to_string(), *w)).collect(),
        }
    }
}

/// Ordered category → keyword configuration shared by the classifier and
/// the intensity scorer.
///
/// Order matters: classification returns the first category whose keywords
/// match. Build once at startup and pass it around by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    categories: Vec<CategoryRules>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            categories: vec![
                CategoryRules::from_static(
                    ConcernCategory::Anxiety,
                    ANXIETY_KEYWORDS,
                    ANXIETY_INTENSITY,
                ),
                CategoryRules::from_static(
                    ConcernCategory::Depression,
                    DEPRESSION_KEYWORDS,
                    DEPRESSION_INTENSITY,
                ),
                CategoryRules::from_static(
                    ConcernCategory::Stress,
                    STRESS_KEYWORDS,
                    STRESS_INTENSITY,
                ),
                CategoryRules::from_static(
                    ConcernCategory::Insomnia,
                    INSOMNIA_KEYWORDS,
                    INSOMNIA_INTENSITY,
                ),
                CategoryRules::from_static(
                    ConcernCategory::EatingDisorder,
                    EATING_DISORDER_KEYWORDS,
                    EATING_DISORDER_INTENSITY,
                ),
            ],
        }
    }
}

impl CategoryTable {
    /// Build a table from rules in priority order.
    ///
    /// # Errors
    ///
    /// Returns `MindscanError::InvalidTable` if validation fails.
    pub fn new(categories: Vec<CategoryRules>) -> Result<Self> {
        let table = Self { categories };
        table.validate()?;
        Ok(table)
    }

    /// Parse a JSON array of category rules.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let categories: Vec<CategoryRules> =
            serde_json::from_str(json).map_err(|e| MindscanError::InvalidTable(e.to_string()))?;
        Self::new(categories)
    }

    /// Load a table from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Categories in priority order.
    pub fn categories(&self) -> &[CategoryRules] {
        &self.categories
    }

    pub fn get(&self, category: ConcernCategory) -> Option<&CategoryRules> {
        self.categories.iter().find(|rules| rules.category == category)
    }

    /// Checks that the table is non-empty, has no duplicate or `Other`
    /// entries, uses lowercase non-empty keywords and keeps every weight in
    /// `[MIN_INTENSITY, MAX_INTENSITY]`.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(MindscanError::InvalidTable("no categories defined".into()));
        }

        let mut seen = HashSet::new();
        for rules in &self.categories {
            if rules.category.is_other() {
                return Err(MindscanError::InvalidTable(
                    "\"Other\" is the fallback and cannot carry keywords".into(),
                ));
            }
            if !seen.insert(rules.category) {
                return Err(MindscanError::InvalidTable(format!(
                    "category {} listed twice",
                    rules.category
                )));
            }

            let keywords = rules.keywords.iter().chain(rules.intensity.keys());
            for keyword in keywords {
                if keyword.trim().is_empty() {
                    return Err(MindscanError::InvalidTable(format!(
                        "empty keyword under {}",
                        rules.category
                    )));
                }
                if keyword.to_lowercase() != *keyword {
                    return Err(MindscanError::InvalidTable(format!(
                        "keyword {keyword:?} under {} must be lowercase",
                        rules.category
                    )));
                }
            }

            for (keyword, &weight) in &rules.intensity {
                if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&weight) {
                    return Err(MindscanError::InvalidTable(format!(
                        "weight {weight} for {keyword:?} outside {MIN_INTENSITY}..={MAX_INTENSITY}"
                    )));
                }
            }
        }

        Ok(())
    }
}
