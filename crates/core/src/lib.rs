#![forbid(unsafe_code)]

pub mod accuracy;
pub mod model;
pub mod sampling;
pub mod selection;
pub mod time;

pub use time::Clock;
