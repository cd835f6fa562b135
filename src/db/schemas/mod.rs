//! Database schemas for woodshed
//!
//! MongoDB document structures for progress records, daily practice
//! logs, and unlocked achievements.

mod achievement;
mod metadata;
mod practice_log;
mod progress;

pub use achievement::{AchievementDoc, ACHIEVEMENT_COLLECTION};
pub use metadata::Metadata;
pub use practice_log::{PracticeLogDoc, PRACTICE_LOG_COLLECTION};
pub use progress::{ProgressDoc, PROGRESS_COLLECTION};
