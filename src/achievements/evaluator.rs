//! Achievement evaluator
//!
//! Recomputes the fixed list of unlock conditions from aggregate
//! progress and streak data on every toggle. The condition core is a
//! pure function; persistence happens through the unique (user, badge)
//! index, which also arbitrates concurrent evaluations.

use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use tracing::debug;

use crate::badges::{badge_by_id, Badge};
use crate::db::schemas::ProgressDoc;
use crate::practice::{PracticeStore, CHECKLIST_SIZE};
use crate::types::Result;

/// Articles per series, by article-ID prefix
const CATEGORY_TOTALS: &[(&str, usize)] = &[
    ("tech", 19),
    ("theory", 19),
    ("ghost", 9),
    ("dinner", 9),
];

/// Practice-log fetch cap; far beyond the longest streak threshold
const STREAK_LOG_LIMIT: i64 = 365;

/// Aggregate completion state feeding the badge conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub tech: usize,
    pub theory: usize,
    pub ghost: usize,
    pub dinner: usize,
    pub streak: u32,
}

/// Count completed articles per category
///
/// An article is complete once all checklist items are ticked.
pub fn summarize(progress: &[ProgressDoc], streak: u32) -> ProgressSummary {
    ProgressSummary {
        tech: completed_count(progress, "tech"),
        theory: completed_count(progress, "theory"),
        ghost: completed_count(progress, "ghost"),
        dinner: completed_count(progress, "dinner"),
        streak,
    }
}

fn completed_count(progress: &[ProgressDoc], prefix: &str) -> usize {
    let id_prefix = format!("{}_", prefix);
    progress
        .iter()
        .filter(|p| p.article_id.starts_with(&id_prefix) && p.completed_items.len() >= CHECKLIST_SIZE)
        .count()
}

fn category_total(prefix: &str) -> usize {
    CATEGORY_TOTALS
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, total)| *total)
        .unwrap_or(usize::MAX)
}

/// Consecutive practice days ending today
///
/// `dates` must be sorted descending. The walk requires exact
/// day-by-day contiguity and breaks at the first gap; a run that does
/// not include today counts as zero.
pub fn streak_from_dates(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut expected = today;

    for date in dates {
        if *date == expected {
            streak += 1;
            expected = match expected.pred_opt() {
                Some(prev) => prev,
                None => break,
            };
        } else {
            break;
        }
    }

    streak
}

/// Badge IDs whose conditions hold for this summary, in catalog order
pub fn met_badges(summary: &ProgressSummary) -> Vec<&'static str> {
    let tech_total = category_total("tech");
    let theory_total = category_total("theory");
    let ghost_total = category_total("ghost");
    let dinner_total = category_total("dinner");

    let conditions: [(&'static str, bool); 12] = [
        ("technique_starter", summary.tech >= 1),
        ("technique_graduate", summary.tech >= 5),
        ("technique_master", summary.tech >= tech_total),
        ("theory_starter", summary.theory >= 1),
        ("theory_graduate", summary.theory >= 5),
        ("theory_master", summary.theory >= theory_total),
        ("ghost_complete", summary.ghost >= ghost_total),
        ("dinner_complete", summary.dinner >= dinner_total),
        ("streak_3", summary.streak >= 3),
        ("streak_7", summary.streak >= 7),
        ("streak_30", summary.streak >= 30),
        (
            "all_series",
            summary.tech >= tech_total
                && summary.theory >= theory_total
                && summary.ghost >= ghost_total
                && summary.dinner >= dinner_total,
        ),
    ];

    conditions
        .into_iter()
        .filter_map(|(id, met)| met.then_some(id))
        .collect()
}

/// Evaluate all conditions for a user and persist new unlocks
///
/// Returns the badges actually inserted by this call. A duplicate-key
/// failure means a concurrent request already recorded the unlock, so
/// it is absorbed rather than surfaced.
pub async fn evaluate_and_unlock(
    store: &PracticeStore,
    user_id: &str,
) -> Result<Vec<&'static Badge>> {
    let existing = store.unlocked(user_id).await?;
    let unlocked_ids: HashSet<&str> = existing.iter().map(|a| a.badge_id.as_str()).collect();

    let progress = store.progress_for_user(user_id).await?;
    let logs = store.practice_logs_desc(user_id, STREAK_LOG_LIMIT).await?;

    let today = Utc::now().date_naive();
    let dates: Vec<NaiveDate> = logs
        .iter()
        .filter_map(|log| NaiveDate::parse_from_str(&log.date, "%Y-%m-%d").ok())
        .collect();
    let streak = streak_from_dates(&dates, today);
    let summary = summarize(&progress, streak);

    let mut newly_unlocked = Vec::new();
    for badge_id in met_badges(&summary) {
        if unlocked_ids.contains(badge_id) {
            continue;
        }
        if store.record_unlock(user_id, badge_id).await? {
            debug!(user_id, badge_id, "Badge unlocked");
            if let Some(badge) = badge_by_id(badge_id) {
                newly_unlocked.push(badge);
            }
        }
    }

    Ok(newly_unlocked)
}
