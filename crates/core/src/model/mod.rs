mod aggregate;
mod category;
mod counter;
pub mod kana;
mod score;

pub use aggregate::Aggregate;
pub use category::{Category, CategoryError};
pub use counter::{CounterError, CounterRecord};
pub use score::{Score, ScoreScope};
