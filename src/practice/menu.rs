//! Daily practice menu
//!
//! Ranks a user's progress records into up to three recommendations.
//! Pure function of the records and the current time; recomputed per
//! request with no persisted state.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::db::schemas::ProgressDoc;
use crate::practice::CHECKLIST_SIZE;

/// Maximum recommendations per menu
pub const MAX_MENU_ITEMS: usize = 3;

/// Completed articles older than this become review candidates
pub const REVIEW_AFTER_DAYS: i64 = 7;

/// Series-starter articles suggested to users with no progress yet
pub const STARTER_ARTICLES: &[&str] = &[
    "tech_01", "tech_02", "tech_03", "theory_01", "theory_02", "ghost_01", "dinner_01",
];

/// Why an article landed on the menu
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MenuReason {
    Continue,
    Review,
    New,
}

/// One menu recommendation
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub article_id: String,
    pub reason: MenuReason,
}

/// Build the daily menu from a user's progress records
///
/// Tier order: continue (started, unfinished, most recent first),
/// review (complete and untouched for over a week, stalest first),
/// new (untouched starter articles, list order), then any remaining
/// completed articles as extra review so the menu is never empty for
/// an active user.
pub fn build_menu(progress: &[ProgressDoc], now: DateTime<Utc>) -> Vec<MenuItem> {
    let mut menu: Vec<MenuItem> = Vec::new();

    // 1. continue: most recently practiced first
    let mut continue_items: Vec<&ProgressDoc> = progress
        .iter()
        .filter(|p| !p.completed_items.is_empty() && p.completed_items.len() < CHECKLIST_SIZE)
        .collect();
    continue_items.sort_by_key(|p| std::cmp::Reverse(p.last_updated));

    for p in continue_items {
        if menu.len() >= MAX_MENU_ITEMS {
            return menu;
        }
        menu.push(MenuItem {
            article_id: p.article_id.clone(),
            reason: MenuReason::Continue,
        });
    }

    // 2. review: stalest completed articles first
    let cutoff = now - Duration::days(REVIEW_AFTER_DAYS);
    let mut review_items: Vec<&ProgressDoc> = progress
        .iter()
        .filter(|p| p.completed_items.len() >= CHECKLIST_SIZE && p.last_updated.to_chrono() < cutoff)
        .collect();
    review_items.sort_by_key(|p| p.last_updated);

    for p in review_items {
        if menu.len() >= MAX_MENU_ITEMS {
            return menu;
        }
        menu.push(MenuItem {
            article_id: p.article_id.clone(),
            reason: MenuReason::Review,
        });
    }

    // 3. new: starter articles with zero recorded progress
    let by_id: HashMap<&str, &ProgressDoc> = progress
        .iter()
        .map(|p| (p.article_id.as_str(), p))
        .collect();

    for article_id in STARTER_ARTICLES {
        if menu.len() >= MAX_MENU_ITEMS {
            return menu;
        }
        let untouched = match by_id.get(article_id) {
            None => true,
            Some(p) => p.completed_items.is_empty(),
        };
        if untouched {
            menu.push(MenuItem {
                article_id: article_id.to_string(),
                reason: MenuReason::New,
            });
        }
    }

    // 4. fallback: remaining completed articles keep the menu filled
    if menu.len() < MAX_MENU_ITEMS && !progress.is_empty() {
        let extras: Vec<&ProgressDoc> = progress
            .iter()
            .filter(|p| {
                p.completed_items.len() >= CHECKLIST_SIZE
                    && !menu.iter().any(|m| m.article_id == p.article_id)
            })
            .collect();
        for p in extras {
            if menu.len() >= MAX_MENU_ITEMS {
                break;
            }
            menu.push(MenuItem {
                article_id: p.article_id.clone(),
                reason: MenuReason::Review,
            });
        }
    }

    menu
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::Metadata;

    fn record(article_id: &str, items: &[u32], updated: DateTime<Utc>) -> ProgressDoc {
        ProgressDoc {
            id: None,
            metadata: Metadata::default(),
            user_id: "user-1".to_string(),
            article_id: article_id.to_string(),
            completed_items: items.to_vec(),
            last_updated: bson::DateTime::from_chrono(updated),
        }
    }

    #[test]
    fn test_continue_comes_first() {
        let now = Utc::now();
        let progress = vec![record("tech_05", &[0, 1], now)];

        let menu = build_menu(&progress, now);
        assert_eq!(menu[0].article_id, "tech_05");
        assert_eq!(menu[0].reason, MenuReason::Continue);
    }

    #[test]
    fn test_continue_prefers_most_recent() {
        let now = Utc::now();
        let progress = vec![
            record("tech_05", &[0], now - Duration::days(2)),
            record("tech_06", &[0, 1], now - Duration::hours(1)),
        ];

        let menu = build_menu(&progress, now);
        assert_eq!(menu[0].article_id, "tech_06");
        assert_eq!(menu[1].article_id, "tech_05");
    }

    #[test]
    fn test_stale_completed_article_is_review() {
        let now = Utc::now();
        let progress = vec![record("tech_02", &[0, 1, 2, 3, 4], now - Duration::days(8))];

        let menu = build_menu(&progress, now);
        assert_eq!(menu[0].article_id, "tech_02");
        assert_eq!(menu[0].reason, MenuReason::Review);
    }

    #[test]
    fn test_recently_completed_article_not_reviewed() {
        let now = Utc::now();
        let progress = vec![record("tech_02", &[0, 1, 2, 3, 4], now - Duration::days(2))];

        let menu = build_menu(&progress, now);
        // Not continue, not review; starters fill the menu instead
        assert!(menu.iter().all(|m| m.article_id != "tech_02" || m.reason != MenuReason::Review));
        assert!(menu.iter().any(|m| m.reason == MenuReason::New));
    }

    #[test]
    fn test_review_prefers_stalest() {
        let now = Utc::now();
        let progress = vec![
            record("tech_02", &[0, 1, 2, 3, 4], now - Duration::days(8)),
            record("tech_03", &[0, 1, 2, 3, 4], now - Duration::days(20)),
        ];

        let menu = build_menu(&progress, now);
        assert_eq!(menu[0].article_id, "tech_03");
        assert_eq!(menu[1].article_id, "tech_02");
    }

    #[test]
    fn test_new_user_gets_three_starters() {
        let menu = build_menu(&[], Utc::now());
        assert_eq!(menu.len(), 3);
        assert!(menu.iter().all(|m| m.reason == MenuReason::New));
        assert_eq!(menu[0].article_id, "tech_01");
        assert_eq!(menu[1].article_id, "tech_02");
        assert_eq!(menu[2].article_id, "tech_03");
    }

    #[test]
    fn test_starter_with_empty_record_still_counts_as_new() {
        let now = Utc::now();
        let progress = vec![record("tech_01", &[], now)];

        let menu = build_menu(&progress, now);
        assert!(menu
            .iter()
            .any(|m| m.article_id == "tech_01" && m.reason == MenuReason::New));
    }

    #[test]
    fn test_started_starter_not_recommended_as_new() {
        let now = Utc::now();
        let progress = vec![record("tech_01", &[0], now)];

        let menu = build_menu(&progress, now);
        let tech_01: Vec<_> = menu.iter().filter(|m| m.article_id == "tech_01").collect();
        assert_eq!(tech_01.len(), 1);
        assert_eq!(tech_01[0].reason, MenuReason::Continue);
    }

    #[test]
    fn test_fallback_review_fills_menu_when_starters_exhausted() {
        let now = Utc::now();
        // Every starter has progress; all articles recently completed
        let mut progress: Vec<ProgressDoc> = STARTER_ARTICLES
            .iter()
            .map(|id| record(id, &[0, 1, 2, 3, 4], now - Duration::days(1)))
            .collect();
        progress.push(record("tech_09", &[0, 1, 2, 3, 4], now - Duration::days(1)));

        let menu = build_menu(&progress, now);
        assert_eq!(menu.len(), 3);
        assert!(menu.iter().all(|m| m.reason == MenuReason::Review));
    }

    #[test]
    fn test_menu_never_exceeds_three() {
        let now = Utc::now();
        let progress: Vec<ProgressDoc> = (1..=6)
            .map(|i| record(&format!("tech_{:02}", i), &[0, 1], now))
            .collect();

        let menu = build_menu(&progress, now);
        assert_eq!(menu.len(), 3);
    }
}
