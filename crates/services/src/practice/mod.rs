mod service;
mod tracker;
mod view;

// Public API of the practice subsystem.
pub use crate::error::SessionError;
pub use service::{AnswerOutcome, PracticeSession};
pub use tracker::{SessionState, SessionTracker};
pub use view::{ItemReport, SessionScores};
