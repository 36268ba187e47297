use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::model::{Category, kana};
use crate::sampling::SamplingDistribution;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no sampling distribution for {0}")]
    NoDistribution(Category),
    #[error("{item:?} has no romaji in {category}")]
    UnknownItem { category: Category, item: String },
}

/// An item drawn for the learner together with its canonical answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub category: Category,
    pub item: String,
    pub answer: String,
}

/// Pick an index by inverse-CDF sampling over `(item, rate)` entries.
///
/// Scales the uniform draw by the actual total, so rates that sum to
/// slightly more or less than 1 are accepted. Zero-rate entries are never
/// returned while any entry has a positive rate.
pub fn draw_index<R: Rng>(rng: &mut R, entries: &[(String, f64)]) -> Option<usize> {
    if entries.is_empty() {
        return None;
    }

    let total: f64 = entries.iter().map(|(_, rate)| rate).sum();
    if total <= 0.0 {
        return Some(rng.random_range(0..entries.len()));
    }

    let target = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (index, (_, rate)) in entries.iter().enumerate() {
        cumulative += rate;
        if target < cumulative {
            return Some(index);
        }
    }

    // Drift left `target` at or past the final cumulative sum.
    entries.iter().rposition(|(_, rate)| *rate > 0.0)
}

/// Draws prompts from per-category sampling distributions.
///
/// Distributions are computed once per session; the random source is owned
/// so tests can inject a seeded generator.
pub struct SelectionEngine<R = StdRng> {
    distributions: BTreeMap<Category, SamplingDistribution>,
    rng: R,
}

impl SelectionEngine<StdRng> {
    /// Engine with a deterministic generator.
    #[must_use]
    pub fn seeded(distributions: BTreeMap<Category, SamplingDistribution>, seed: u64) -> Self {
        Self::new(distributions, StdRng::seed_from_u64(seed))
    }

    /// Engine seeded from the operating system.
    #[must_use]
    pub fn from_os_rng(distributions: BTreeMap<Category, SamplingDistribution>) -> Self {
        Self::new(distributions, StdRng::from_os_rng())
    }
}

impl<R: Rng> SelectionEngine<R> {
    #[must_use]
    pub fn new(distributions: BTreeMap<Category, SamplingDistribution>, rng: R) -> Self {
        Self { distributions, rng }
    }

    #[must_use]
    pub fn distribution(&self, category: Category) -> Option<&SamplingDistribution> {
        self.distributions.get(&category)
    }

    /// Draw the next item of `category` and look up its answer.
    ///
    /// # Errors
    ///
    /// - `NoDistribution` if the category has no items
    /// - `UnknownItem` if the drawn symbol is missing from the character table
    pub fn draw(&mut self, category: Category) -> Result<Prompt, SelectionError> {
        let distribution = self
            .distributions
            .get(&category)
            .ok_or(SelectionError::NoDistribution(category))?;
        let index = draw_index(&mut self.rng, distribution.entries())
            .ok_or(SelectionError::NoDistribution(category))?;
        let item = &distribution.entries()[index].0;
        let answer = kana::romaji(category, item).ok_or_else(|| SelectionError::UnknownItem {
            category,
            item: item.clone(),
        })?;

        Ok(Prompt {
            category,
            item: item.clone(),
            answer: answer.to_owned(),
        })
    }
}
