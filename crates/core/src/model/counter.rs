use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CounterError {
    #[error("times correct ({correct}) exceeds times seen ({seen})")]
    CorrectExceedsSeen { seen: u32, correct: u32 },
}

/// Exposure and success counters for one item.
///
/// `correct <= seen` holds for every value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterRecord {
    seen: u32,
    correct: u32,
}

impl CounterRecord {
    /// Build a record from raw counts.
    ///
    /// # Errors
    ///
    /// Returns `CounterError::CorrectExceedsSeen` if `correct > seen`.
    pub fn new(seen: u32, correct: u32) -> Result<Self, CounterError> {
        if correct > seen {
            return Err(CounterError::CorrectExceedsSeen { seen, correct });
        }
        Ok(Self { seen, correct })
    }

    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn seen(&self) -> u32 {
        self.seen
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.seen == 0
    }

    /// Count one answer.
    pub fn record(&mut self, correct: bool) {
        self.seen = self.seen.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    /// Sum two records. Saturates instead of overflowing; `correct` is clamped
    /// so the invariant survives saturation.
    #[must_use]
    pub fn merged(self, other: CounterRecord) -> Self {
        let seen = self.seen.saturating_add(other.seen);
        let correct = self.correct.saturating_add(other.correct).min(seen);
        Self { seen, correct }
    }

    /// `correct / seen`, or exactly `0.0` for an unseen item.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.seen == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.seen)
        }
    }

    /// Accuracy as a percentage, `0.0` when unseen.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.seen == 0 {
            0.0
        } else {
            f64::from(self.correct) * 100.0 / f64::from(self.seen)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_more_correct_than_seen() {
        let err = CounterRecord::new(2, 3).unwrap_err();
        assert_eq!(err, CounterError::CorrectExceedsSeen { seen: 2, correct: 3 });
    }

    #[test]
    fn record_counts_seen_and_correct() {
        let mut counter = CounterRecord::zero();
        counter.record(true);
        counter.record(false);
        assert_eq!(counter.seen(), 2);
        assert_eq!(counter.correct(), 1);
        assert!((counter.accuracy() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn merged_sums_counts() {
        let a = CounterRecord::new(4, 1).unwrap();
        let b = CounterRecord::new(6, 6).unwrap();
        assert_eq!(a.merged(b), CounterRecord::new(10, 7).unwrap());
    }

    #[test]
    fn unseen_accuracy_is_zero() {
        assert_eq!(CounterRecord::zero().accuracy(), 0.0);
        assert_eq!(CounterRecord::zero().percentage(), 0.0);
    }
}
