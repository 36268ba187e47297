use std::collections::BTreeMap;

use crate::model::{Aggregate, Category};

/// Per-item accuracy in `[0, 1]`, keyed like the aggregate it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accuracies {
    categories: BTreeMap<Category, BTreeMap<String, f64>>,
}

impl Accuracies {
    /// Derive accuracies from historical counters.
    ///
    /// `correct / seen` for each item, exactly `0.0` for items never seen.
    /// Pure: the aggregate is only read.
    #[must_use]
    pub fn from_aggregate(aggregate: &Aggregate) -> Self {
        let mut categories = BTreeMap::new();
        for category in Category::ALL {
            let items: BTreeMap<String, f64> = aggregate
                .items(category)
                .map(|(item, counter)| (item.to_owned(), counter.accuracy()))
                .collect();
            categories.insert(category, items);
        }
        Self { categories }
    }

    #[must_use]
    pub fn get(&self, category: Category, item: &str) -> Option<f64> {
        self.categories.get(&category)?.get(item).copied()
    }

    pub fn items(&self, category: Category) -> impl Iterator<Item = (&str, f64)> {
        self.categories
            .get(&category)
            .into_iter()
            .flat_map(|items| items.iter().map(|(item, acc)| (item.as_str(), *acc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CounterRecord;

    fn aggregate() -> Aggregate {
        [
            (Category::Hiragana, "あ", CounterRecord::new(10, 10).unwrap()),
            (Category::Hiragana, "い", CounterRecord::new(4, 1).unwrap()),
            (Category::Hiragana, "う", CounterRecord::zero()),
            (Category::Katakana, "ア", CounterRecord::new(3, 0).unwrap()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn accuracy_is_ratio_or_zero() {
        let accuracies = Accuracies::from_aggregate(&aggregate());

        assert_eq!(accuracies.get(Category::Hiragana, "あ"), Some(1.0));
        assert_eq!(accuracies.get(Category::Hiragana, "い"), Some(0.25));
        assert_eq!(accuracies.get(Category::Hiragana, "う"), Some(0.0));
        assert_eq!(accuracies.get(Category::Katakana, "ア"), Some(0.0));
        assert_eq!(accuracies.get(Category::Katakana, "イ"), None);
    }

    #[test]
    fn accuracy_stays_in_unit_interval() {
        let accuracies = Accuracies::from_aggregate(&aggregate());
        for category in Category::ALL {
            for (_, acc) in accuracies.items(category) {
                assert!((0.0..=1.0).contains(&acc));
            }
        }
    }

    #[test]
    fn recomputing_yields_identical_results() {
        let aggregate = aggregate();
        let first = Accuracies::from_aggregate(&aggregate);
        let second = Accuracies::from_aggregate(&aggregate);
        assert_eq!(first, second);
    }
}
