use std::collections::BTreeMap;

use thiserror::Error;

use crate::accuracy::Accuracies;
use crate::model::{Aggregate, Category};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SamplingError {
    #[error("no items recorded for {0}")]
    EmptyCategory(Category),
}

//
// ─── WEIGHT FUNCTION ───────────────────────────────────────────────────────────
//

/// Where an item sits inside its category's seen and accuracy ranges.
///
/// Both coordinates are in `[0, 1]`: `0` is the least seen / least accurate
/// item of the category, `1` the most.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativePosition {
    pub seen: f64,
    pub accuracy: f64,
}

/// Unnormalized sampling weight for an item.
///
/// Under-exposed items (`seen < 0.5`) get `2^(1 - 2·seen)`, between 2 and 1.
/// Well-exposed items are ranked by accuracy instead: `1 + (1 - 2·accuracy)`
/// below the midpoint, `1 - 2·(accuracy - 0.5)` above it, so a fully seen and
/// fully accurate item drops to 0.
#[must_use]
pub fn weight(position: RelativePosition) -> f64 {
    if position.seen < 0.5 {
        2_f64.powf(1.0 - 2.0 * position.seen)
    } else if position.accuracy < 0.5 {
        1.0 + (1.0 - 2.0 * position.accuracy)
    } else {
        1.0 - (position.accuracy - 0.5) * 2.0
    }
}

//
// ─── DEGENERATE SPANS ──────────────────────────────────────────────────────────
//

/// Returns the span if it can be divided by, `None` when it has collapsed.
///
/// Applied to the seen range, the accuracy range, and the weight total. A
/// collapsed range divides by 1 (every item sits at position 0); a collapsed
/// weight total falls back to a uniform distribution.
fn usable_span(span: f64) -> Option<f64> {
    (span > 0.0).then_some(span)
}

//
// ─── DISTRIBUTION ──────────────────────────────────────────────────────────────
//

/// Normalized sampling rates for one category, in item order.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingDistribution {
    category: Category,
    entries: Vec<(String, f64)>,
    uniform_fallback: bool,
}

impl SamplingDistribution {
    /// Normalize raw weights so they sum to 1.
    ///
    /// All-zero weights become a uniform distribution flagged with
    /// `is_uniform_fallback`.
    ///
    /// # Errors
    ///
    /// Returns `SamplingError::EmptyCategory` if `weights` is empty.
    pub fn from_weights(
        category: Category,
        weights: Vec<(String, f64)>,
    ) -> Result<Self, SamplingError> {
        if weights.is_empty() {
            return Err(SamplingError::EmptyCategory(category));
        }

        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        let (entries, uniform_fallback) = match usable_span(total) {
            Some(total) => (
                weights
                    .into_iter()
                    .map(|(item, w)| (item, w / total))
                    .collect(),
                false,
            ),
            None => {
                // Item counts are tiny; the cast cannot lose precision in practice.
                #[allow(clippy::cast_precision_loss)]
                let share = 1.0 / weights.len() as f64;
                (
                    weights.into_iter().map(|(item, _)| (item, share)).collect(),
                    true,
                )
            }
        };

        Ok(Self {
            category,
            entries,
            uniform_fallback,
        })
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    #[must_use]
    pub fn rate(&self, item: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == item)
            .map(|(_, rate)| *rate)
    }

    /// Sum of all rates; 1.0 up to floating-point drift.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, rate)| rate).sum()
    }

    #[must_use]
    pub fn is_uniform_fallback(&self) -> bool {
        self.uniform_fallback
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//
// ─── RATE CALCULATION ──────────────────────────────────────────────────────────
//

/// Compute the sampling distribution for one category.
///
/// Every item with an entry in `historical` takes part, zero counters
/// included. Accuracies missing from `accuracies` are derived from the
/// counters directly.
///
/// # Errors
///
/// Returns `SamplingError::EmptyCategory` if the category has no items.
pub fn rates(
    category: Category,
    historical: &Aggregate,
    accuracies: &Accuracies,
) -> Result<SamplingDistribution, SamplingError> {
    let triples: Vec<(&str, f64, f64)> = historical
        .items(category)
        .map(|(item, counter)| {
            let accuracy = accuracies
                .get(category, item)
                .unwrap_or_else(|| counter.accuracy());
            (item, f64::from(counter.seen()), accuracy)
        })
        .collect();

    if triples.is_empty() {
        return Err(SamplingError::EmptyCategory(category));
    }

    let (min_seen, max_seen) = bounds(triples.iter().map(|(_, seen, _)| *seen));
    let (min_acc, max_acc) = bounds(triples.iter().map(|(_, _, acc)| *acc));
    let seen_range = usable_span(max_seen - min_seen).unwrap_or(1.0);
    let acc_range = usable_span(max_acc - min_acc).unwrap_or(1.0);

    let weights = triples
        .into_iter()
        .map(|(item, seen, accuracy)| {
            let position = RelativePosition {
                seen: (seen - min_seen) / seen_range,
                accuracy: (accuracy - min_acc) / acc_range,
            };
            (item.to_owned(), weight(position))
        })
        .collect();

    SamplingDistribution::from_weights(category, weights)
}

/// Compute distributions for every category that has at least one item.
#[must_use]
pub fn distributions(historical: &Aggregate) -> BTreeMap<Category, SamplingDistribution> {
    let accuracies = Accuracies::from_aggregate(historical);
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            rates(category, historical, &accuracies)
                .ok()
                .map(|dist| (category, dist))
        })
        .collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
