use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use kana_core::{
    model::{Aggregate, Category, Score, ScoreScope, kana},
    sampling::{self, SamplingDistribution},
    selection::{Prompt, SelectionEngine},
    time::Clock,
};
use storage::HistoryStore;

use super::tracker::{SessionState, SessionTracker};
use super::view::{ItemReport, SessionScores};
use crate::error::SessionError;

//
// ─── ANSWER RESULT ─────────────────────────────────────────────────────────────
//

/// Result of answering the pending prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub prompt: Prompt,
    pub correct: bool,
    /// Session score for the prompt's category after counting this answer.
    pub session_score: Score,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One learner's practice session.
///
/// Owns the historical counters loaded at start, the sampling distributions
/// derived from them, and the session tracker. Distributions are fixed for
/// the whole session; history only changes when the next session loads it.
pub struct PracticeSession<R = StdRng> {
    clock: Clock,
    store: Arc<dyn HistoryStore>,
    historical: Aggregate,
    engine: SelectionEngine<R>,
    tracker: SessionTracker,
    pending: Option<Prompt>,
}

impl PracticeSession<StdRng> {
    /// Start a session drawing from an OS-seeded generator.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the history cannot be loaded.
    pub fn start(clock: Clock, store: Arc<dyn HistoryStore>) -> Result<Self, SessionError> {
        Self::start_with_rng(clock, store, StdRng::from_os_rng())
    }

    /// Start a session with a reproducible draw sequence.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the history cannot be loaded.
    pub fn start_seeded(
        clock: Clock,
        store: Arc<dyn HistoryStore>,
        seed: u64,
    ) -> Result<Self, SessionError> {
        Self::start_with_rng(clock, store, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PracticeSession<R> {
    /// Load history, fill in every known item, and compute distributions.
    ///
    /// Rows naming symbols outside the character table are ignored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the history cannot be loaded.
    pub fn start_with_rng(
        clock: Clock,
        store: Arc<dyn HistoryStore>,
        rng: R,
    ) -> Result<Self, SessionError> {
        let mut historical = store.load()?;
        for category in Category::ALL {
            historical.seed_items(category, kana::items(category));
            let dropped =
                historical.retain_items(category, |item| kana::romaji(category, item).is_some());
            if !dropped.is_empty() {
                warn!(%category, ?dropped, "ignoring practice rows for unknown items");
            }
        }

        let distributions = sampling::distributions(&historical);
        for (category, distribution) in &distributions {
            debug!(
                %category,
                items = distribution.len(),
                uniform_fallback = distribution.is_uniform_fallback(),
                "computed sampling rates"
            );
        }
        info!(
            seen = Category::ALL
                .iter()
                .map(|c| historical.totals(*c).seen())
                .sum::<u32>(),
            "practice session started"
        );

        Ok(Self {
            clock,
            store,
            historical,
            engine: SelectionEngine::new(distributions, rng),
            tracker: SessionTracker::new(),
            pending: None,
        })
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.tracker.state()
    }

    #[must_use]
    pub fn historical(&self) -> &Aggregate {
        &self.historical
    }

    #[must_use]
    pub fn session(&self) -> &Aggregate {
        self.tracker.session()
    }

    #[must_use]
    pub fn distribution(&self, category: Category) -> Option<&SamplingDistribution> {
        self.engine.distribution(category)
    }

    /// Prompt drawn but not answered yet.
    #[must_use]
    pub fn pending(&self) -> Option<&Prompt> {
        self.pending.as_ref()
    }

    /// Draw the next item and hold it as the pending prompt.
    ///
    /// The first successful draw activates the session. Drawing again before
    /// answering replaces the pending prompt without counting it.
    ///
    /// # Errors
    ///
    /// - `Completed` after `finalize`
    /// - `Selection` if the category cannot be drawn from; the state is
    ///   left unchanged
    pub fn draw(&mut self, category: Category) -> Result<&Prompt, SessionError> {
        if self.state() == SessionState::Finalized {
            return Err(SessionError::Completed);
        }
        let prompt = self.engine.draw(category)?;
        self.tracker.activate()?;
        Ok(&*self.pending.insert(prompt))
    }

    /// Check `input` against the pending prompt and count the outcome.
    ///
    /// # Errors
    ///
    /// - `Completed` after `finalize`
    /// - `NoPendingPrompt` if nothing was drawn since the last answer
    pub fn answer(&mut self, input: &str) -> Result<AnswerOutcome, SessionError> {
        if self.state() == SessionState::Finalized {
            return Err(SessionError::Completed);
        }
        let prompt = self.pending.take().ok_or(SessionError::NoPendingPrompt)?;
        let correct = kana::check_answer(input, &prompt.answer);
        self.tracker
            .record_outcome(prompt.category, &prompt.item, correct)?;
        let session_score = self.score(ScoreScope::Session, prompt.category);

        Ok(AnswerOutcome {
            prompt,
            correct,
            session_score,
        })
    }

    /// Count an outcome the caller judged itself.
    ///
    /// # Errors
    ///
    /// See `SessionTracker::record_outcome`.
    pub fn record_outcome(
        &mut self,
        category: Category,
        item: &str,
        correct: bool,
    ) -> Result<(), SessionError> {
        self.tracker.record_outcome(category, item, correct)
    }

    #[must_use]
    pub fn score(&self, scope: ScoreScope, category: Category) -> Score {
        self.tracker.score(scope, category, &self.historical)
    }

    #[must_use]
    pub fn session_scores(&self, category: Category) -> SessionScores {
        SessionScores {
            category,
            historical: self.score(ScoreScope::Historical, category),
            session: self.score(ScoreScope::Session, category),
            combined: self.score(ScoreScope::Combined, category),
        }
    }

    /// Historical counters, accuracy, and sampling rate for every item of a
    /// category, in gojūon order.
    #[must_use]
    pub fn item_report(&self, category: Category) -> Vec<ItemReport> {
        let distribution = self.engine.distribution(category);
        kana::items(category)
            .map(|item| {
                let counter = self.historical.get(category, item).unwrap_or_default();
                ItemReport {
                    item: item.to_owned(),
                    romaji: kana::romaji(category, item).unwrap_or_default(),
                    seen: counter.seen(),
                    correct: counter.correct(),
                    accuracy: counter.accuracy(),
                    rate: distribution.and_then(|d| d.rate(item)).unwrap_or(0.0),
                }
            })
            .collect()
    }

    /// Persist this session's answers and close it.
    ///
    /// Safe at any point, including before the first draw; a session with
    /// no answers writes nothing.
    ///
    /// # Errors
    ///
    /// - `Completed` if already finalized
    /// - `Storage` if the rows cannot be written
    pub fn finalize(&mut self) -> Result<usize, SessionError> {
        let written = self
            .tracker
            .finalize(self.store.as_ref(), self.clock.today())?;
        self.pending = None;
        Ok(written)
    }
}
