use crate::scoring::table::CategoryTable;
use crate::types::ConcernCategory;

/// Assign a concern phrase to a category.
///
/// Categories are tried in table order and the first one with any keyword
/// contained in the lowercased phrase wins, even when a later category
/// matches too. Returns [`ConcernCategory::Other`] when nothing matches.
#[must_use]
pub fn classify_concern(table: &CategoryTable, phrase: &str) -> ConcernCategory {
    let lowered = phrase.to_lowercase();
    table
        .categories()
        .iter()
        .find(|rules| rules.keywords.iter().any(|k| lowered.contains(k.as_str())))
        .map_or(ConcernCategory::Other, |rules| rules.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::table::CategoryRules;

    #[test]
    fn first_category_in_order_wins() {
        let table = CategoryTable::default();
        // "panic" (Anxiety) is checked before "overwhelmed" (Stress)
        assert_eq!(
            classify_concern(&table, "panic attacks are overwhelming me"),
            ConcernCategory::Anxiety
        );
        assert_eq!(
            classify_concern(&table, "panic and overwhelmed"),
            ConcernCategory::Anxiety
        );
    }

    #[test]
    fn positive_keywords_still_classify() {
        let table = CategoryTable::default();
        assert_eq!(
            classify_concern(&table, "I am relaxed and well-rested"),
            ConcernCategory::Anxiety
        );
    }

    #[test]
    fn matches_each_category() {
        let table = CategoryTable::default();
        assert_eq!(
            classify_concern(&table, "I feel hopeless and empty"),
            ConcernCategory::Depression
        );
        assert_eq!(
            classify_concern(&table, "total burnout at work"),
            ConcernCategory::Stress
        );
        assert_eq!(
            classify_concern(&table, "I CAN'T SLEEP"),
            ConcernCategory::Insomnia
        );
        assert_eq!(
            classify_concern(&table, "skipping meals again"),
            ConcernCategory::EatingDisorder
        );
    }

    #[test]
    fn restless_goes_to_anxiety_not_insomnia() {
        let table = CategoryTable::default();
        assert_eq!(
            classify_concern(&table, "restless nights"),
            ConcernCategory::Anxiety
        );
    }

    #[test]
    fn no_match_is_other() {
        let table = CategoryTable::default();
        assert_eq!(
            classify_concern(&table, "the weather is nice today"),
            ConcernCategory::Other
        );
        assert_eq!(classify_concern(&table, ""), ConcernCategory::Other);
    }

    #[test]
    fn weight_only_keywords_do_not_classify() {
        let table = CategoryTable::default();
        assert_eq!(classify_concern(&table, "so sleepy"), ConcernCategory::Other);
    }

    #[test]
    fn reordering_the_table_changes_the_outcome() {
        let stress_first = CategoryTable::new(vec![
            CategoryRules {
                category: ConcernCategory::Stress,
                keywords: vec!["overwhelm".into()],
                intensity: Default::default(),
            },
            CategoryRules {
                category: ConcernCategory::Anxiety,
                keywords: vec!["panic".into()],
                intensity: Default::default(),
            },
        ])
        .unwrap();

        assert_eq!(
            classify_concern(&stress_first, "panic attacks are overwhelming me"),
            ConcernCategory::Stress
        );
    }

    #[test]
    fn classification_is_idempotent() {
        let table = CategoryTable::default();
        let phrase = "worried and lonely";
        let first = classify_concern(&table, phrase);
        for _ in 0..5 {
            assert_eq!(classify_concern(&table, phrase), first);
        }
    }
}
