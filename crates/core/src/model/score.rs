use crate::model::CounterRecord;

/// Which aggregate a score is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreScope {
    /// Answers given in the current session only.
    Session,
    /// Everything persisted before the session started.
    Historical,
    /// Session and historical counters summed per item.
    Combined,
}

impl ScoreScope {
    pub const ALL: [ScoreScope; 3] = [
        ScoreScope::Historical,
        ScoreScope::Session,
        ScoreScope::Combined,
    ];

    /// Heading used when presenting the score to the learner.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreScope::Session => "This session's",
            ScoreScope::Historical => "Past sessions'",
            ScoreScope::Combined => "Overall",
        }
    }
}

/// Totals for a category: answers seen, answered correctly, and the ratio as
/// a percentage (`0.0` when nothing was seen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub seen: u32,
    pub correct: u32,
    pub percentage: f64,
}

impl Score {
    #[must_use]
    pub fn from_totals(totals: CounterRecord) -> Self {
        Self {
            seen: totals.seen(),
            correct: totals.correct(),
            percentage: totals.percentage(),
        }
    }
}
