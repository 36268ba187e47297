use std::collections::BTreeMap;

use crate::model::{Category, CounterRecord};

/// Per-category, per-item counters.
///
/// Used both for the historical aggregate (replayed from persisted rows) and
/// for the session aggregate (mutated as the learner answers). Items are kept
/// in symbol order so every derived view is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    categories: BTreeMap<Category, BTreeMap<String, CounterRecord>>,
}

impl Aggregate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `record` into the counters for `(category, item)`.
    pub fn add(&mut self, category: Category, item: impl Into<String>, record: CounterRecord) {
        let slot = self
            .categories
            .entry(category)
            .or_default()
            .entry(item.into())
            .or_default();
        *slot = slot.merged(record);
    }

    /// Count one answer for `(category, item)`.
    pub fn record_answer(&mut self, category: Category, item: &str, correct: bool) {
        let items = self.categories.entry(category).or_default();
        match items.get_mut(item) {
            Some(counter) => counter.record(correct),
            None => {
                let mut counter = CounterRecord::zero();
                counter.record(correct);
                items.insert(item.to_owned(), counter);
            }
        }
    }

    /// Insert zero counters for every listed item that has no entry yet.
    pub fn seed_items<'a>(&mut self, category: Category, items: impl IntoIterator<Item = &'a str>) {
        let known = self.categories.entry(category).or_default();
        for item in items {
            known.entry(item.to_owned()).or_default();
        }
    }

    /// Drop items rejected by `keep`, returning the removed symbols.
    pub fn retain_items(
        &mut self,
        category: Category,
        mut keep: impl FnMut(&str) -> bool,
    ) -> Vec<String> {
        let Some(items) = self.categories.get_mut(&category) else {
            return Vec::new();
        };
        let removed: Vec<String> = items.keys().filter(|item| !keep(item)).cloned().collect();
        for item in &removed {
            items.remove(item);
        }
        removed
    }

    #[must_use]
    pub fn get(&self, category: Category, item: &str) -> Option<CounterRecord> {
        self.categories.get(&category)?.get(item).copied()
    }

    /// Items of a category with their counters, in symbol order.
    pub fn items(&self, category: Category) -> impl Iterator<Item = (&str, CounterRecord)> {
        self.categories
            .get(&category)
            .into_iter()
            .flat_map(|items| items.iter().map(|(item, counter)| (item.as_str(), *counter)))
    }

    /// Number of items with an entry (zero counters included).
    #[must_use]
    pub fn item_count(&self, category: Category) -> usize {
        self.categories.get(&category).map_or(0, BTreeMap::len)
    }

    /// Sum of all counters in a category.
    #[must_use]
    pub fn totals(&self, category: Category) -> CounterRecord {
        self.items(category)
            .fold(CounterRecord::zero(), |acc, (_, counter)| acc.merged(counter))
    }

    /// Per-item sum of `self` and `other`.
    #[must_use]
    pub fn combined(&self, other: &Aggregate) -> Aggregate {
        let mut out = self.clone();
        for (category, items) in &other.categories {
            for (item, counter) in items {
                out.add(*category, item.clone(), *counter);
            }
        }
        out
    }

    /// Entries with at least one answer, across all categories.
    pub fn touched(&self) -> impl Iterator<Item = (Category, &str, CounterRecord)> {
        self.categories.iter().flat_map(|(category, items)| {
            items
                .iter()
                .filter(|(_, counter)| !counter.is_zero())
                .map(move |(item, counter)| (*category, item.as_str(), *counter))
        })
    }

    /// True when no entry has been answered.
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.touched().next().is_none()
    }
}

impl<S: Into<String>> FromIterator<(Category, S, CounterRecord)> for Aggregate {
    fn from_iter<T: IntoIterator<Item = (Category, S, CounterRecord)>>(iter: T) -> Self {
        let mut out = Aggregate::new();
        for (category, item, counter) in iter {
            out.add(category, item, counter);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(seen: u32, correct: u32) -> CounterRecord {
        CounterRecord::new(seen, correct).unwrap()
    }

    #[test]
    fn sums_rows_for_the_same_item() {
        let aggregate: Aggregate = [
            (Category::Hiragana, "あ", counter(3, 2)),
            (Category::Hiragana, "あ", counter(2, 2)),
            (Category::Katakana, "ア", counter(1, 0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(aggregate.get(Category::Hiragana, "あ"), Some(counter(5, 4)));
        assert_eq!(aggregate.get(Category::Katakana, "ア"), Some(counter(1, 0)));
        assert_eq!(aggregate.item_count(Category::Hiragana), 1);
    }

    #[test]
    fn seeding_keeps_existing_counters() {
        let mut aggregate = Aggregate::new();
        aggregate.add(Category::Hiragana, "か", counter(4, 4));
        aggregate.seed_items(Category::Hiragana, ["か", "き"]);

        assert_eq!(aggregate.get(Category::Hiragana, "か"), Some(counter(4, 4)));
        assert_eq!(aggregate.get(Category::Hiragana, "き"), Some(CounterRecord::zero()));
        assert!(aggregate.touched().all(|(_, item, _)| item == "か"));
    }

    #[test]
    fn combined_sums_per_item() {
        let mut past = Aggregate::new();
        past.add(Category::Hiragana, "さ", counter(10, 5));
        let mut session = Aggregate::new();
        session.record_answer(Category::Hiragana, "さ", true);
        session.record_answer(Category::Hiragana, "し", false);

        let total = past.combined(&session);
        assert_eq!(total.get(Category::Hiragana, "さ"), Some(counter(11, 6)));
        assert_eq!(total.get(Category::Hiragana, "し"), Some(counter(1, 0)));
        assert_eq!(total.totals(Category::Hiragana), counter(12, 6));
    }

    #[test]
    fn retain_reports_removed_items() {
        let mut aggregate = Aggregate::new();
        aggregate.seed_items(Category::Katakana, ["ア", "?"]);
        let removed = aggregate.retain_items(Category::Katakana, |item| item != "?");
        assert_eq!(removed, vec!["?".to_string()]);
        assert_eq!(aggregate.item_count(Category::Katakana), 1);
    }

    #[test]
    fn fresh_aggregate_is_untouched() {
        let mut aggregate = Aggregate::new();
        aggregate.seed_items(Category::Hiragana, ["あ"]);
        assert!(aggregate.is_untouched());
        aggregate.record_answer(Category::Hiragana, "あ", false);
        assert!(!aggregate.is_untouched());
    }
}
