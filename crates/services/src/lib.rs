#![forbid(unsafe_code)]

pub mod error;
pub mod practice;

pub use kana_core::Clock;

pub use error::SessionError;
pub use practice::{
    AnswerOutcome, ItemReport, PracticeSession, SessionScores, SessionState, SessionTracker,
};
