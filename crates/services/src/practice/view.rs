use kana_core::model::{Category, Score, ScoreScope};

/// End-of-session score summary for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionScores {
    pub category: Category,
    pub historical: Score,
    pub session: Score,
    pub combined: Score,
}

impl SessionScores {
    #[must_use]
    pub fn get(&self, scope: ScoreScope) -> Score {
        match scope {
            ScoreScope::Historical => self.historical,
            ScoreScope::Session => self.session,
            ScoreScope::Combined => self.combined,
        }
    }

    /// Scores in presentation order (past, this session, overall) with labels.
    #[must_use]
    pub fn labeled(&self) -> [(&'static str, Score); 3] {
        ScoreScope::ALL.map(|scope| (scope.label(), self.get(scope)))
    }
}

/// Per-item analytics row: historical counters and the current sampling rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReport {
    pub item: String,
    pub romaji: &'static str,
    pub seen: u32,
    pub correct: u32,
    pub accuracy: f64,
    pub rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kana_core::model::CounterRecord;

    #[test]
    fn labeled_scores_follow_presentation_order() {
        let score = |seen, correct| Score::from_totals(CounterRecord::new(seen, correct).unwrap());
        let scores = SessionScores {
            category: Category::Hiragana,
            historical: score(10, 5),
            session: score(2, 2),
            combined: score(12, 7),
        };

        let labels: Vec<_> = scores.labeled().iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["Past sessions'", "This session's", "Overall"]);
        assert_eq!(scores.labeled()[2].1.seen, 12);
    }
}
