//! Progress tracking and daily practice menu

pub mod menu;
pub mod store;

pub use menu::{build_menu, MenuItem, MenuReason, STARTER_ARTICLES};
pub use store::PracticeStore;

/// Checklist items per article. Every lesson carries exactly five
/// checkpoints; an article counts as complete once all five are
/// ticked.
pub const CHECKLIST_SIZE: usize = 5;
