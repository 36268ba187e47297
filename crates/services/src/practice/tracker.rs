use chrono::NaiveDate;
use tracing::info;

use kana_core::model::{Aggregate, Category, Score, ScoreScope};
use storage::HistoryStore;

use crate::error::SessionError;

/// Lifecycle of a practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Created, nothing drawn yet.
    #[default]
    Idle,
    /// At least one item drawn; answers are accepted.
    Active,
    /// Persisted. A new tracker is needed for the next session.
    Finalized,
}

/// Session-scoped answer counters.
///
/// Counts live only in memory until `finalize`, which writes one row per
/// answered item and closes the session for good.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    session: Aggregate,
    state: SessionState,
}

impl SessionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn session(&self) -> &Aggregate {
        &self.session
    }

    /// Move `Idle` to `Active`. Already active sessions stay active.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session is finalized.
    pub fn activate(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Active;
                Ok(())
            }
            SessionState::Active => Ok(()),
            SessionState::Finalized => Err(SessionError::Completed),
        }
    }

    /// Count one answer for `item`.
    ///
    /// # Errors
    ///
    /// - `NotStarted` before the first draw
    /// - `Completed` after `finalize`
    pub fn record_outcome(
        &mut self,
        category: Category,
        item: &str,
        correct: bool,
    ) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => Err(SessionError::NotStarted),
            SessionState::Finalized => Err(SessionError::Completed),
            SessionState::Active => {
                self.session.record_answer(category, item, correct);
                Ok(())
            }
        }
    }

    /// Totals for `category` over the aggregate(s) selected by `scope`.
    ///
    /// `Combined` merges session and historical counters per item before
    /// summing.
    #[must_use]
    pub fn score(&self, scope: ScoreScope, category: Category, historical: &Aggregate) -> Score {
        let totals = match scope {
            ScoreScope::Session => self.session.totals(category),
            ScoreScope::Historical => historical.totals(category),
            ScoreScope::Combined => historical.combined(&self.session).totals(category),
        };
        Score::from_totals(totals)
    }

    /// Persist the session counters and close the session.
    ///
    /// Valid from `Idle` or `Active`; a session with no answers writes
    /// nothing. The state only changes once the write succeeded.
    ///
    /// # Errors
    ///
    /// - `Completed` if already finalized
    /// - `Storage` if the rows cannot be written
    pub fn finalize(
        &mut self,
        store: &dyn HistoryStore,
        date: NaiveDate,
    ) -> Result<usize, SessionError> {
        if self.state == SessionState::Finalized {
            return Err(SessionError::Completed);
        }
        let written = store.save(&self.session, date)?;
        self.state = SessionState::Finalized;
        info!(rows = written, %date, "practice session finalized");
        Ok(written)
    }
}
