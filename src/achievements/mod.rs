//! Achievement evaluation and unlock persistence

pub mod evaluator;

pub use evaluator::{evaluate_and_unlock, met_badges, streak_from_dates, summarize, ProgressSummary};
