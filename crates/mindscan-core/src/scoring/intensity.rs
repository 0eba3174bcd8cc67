use crate::scoring::table::{CategoryTable, MIN_INTENSITY};

/// Score how severe a concern phrase is.
///
/// Every category's keyword weights are scanned, not just the category the
/// phrase was classified into, and the highest weight among keywords
/// contained in the lowercased phrase wins. A phrase with no weighted
/// keyword scores [`MIN_INTENSITY`], never zero.
#[must_use]
pub fn score_intensity(table: &CategoryTable, phrase: &str) -> u8 {
    let lowered = phrase.to_lowercase();
    table
        .categories()
        .iter()
        .flat_map(|rules| rules.intensity.iter())
        .filter(|(keyword, _)| lowered.contains(keyword.as_str()))
        .map(|(_, &weight)| weight)
        .max()
        .unwrap_or(MIN_INTENSITY)
}
