//! Achievement document schema
//!
//! Append-only unlock records. The unique (user, badge) index is the
//! sole concurrency-safety mechanism: when two requests race to unlock
//! the same badge, exactly one insert succeeds and the loser's
//! duplicate-key error is swallowed by the evaluator.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for achievements
pub const ACHIEVEMENT_COLLECTION: &str = "achievements";

/// One unlocked badge for one user
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// User identifier
    pub user_id: String,

    /// Badge identifier from the fixed catalog
    pub badge_id: String,

    /// When the badge was unlocked
    pub unlocked_at: DateTime,
}

impl AchievementDoc {
    /// Create a new unlock record stamped with the current time
    pub fn new(user_id: String, badge_id: String) -> Self {
        Self {
            id: None,
            metadata: Metadata::new(),
            user_id,
            badge_id,
            unlocked_at: DateTime::now(),
        }
    }
}

impl IntoIndexes for AchievementDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // A badge unlocks at most once per user
            (
                doc! { "userId": 1, "badgeId": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("user_badge_unique".to_string())
                        .build(),
                ),
            ),
            // Per-user badge listing
            (
                doc! { "userId": 1 },
                Some(
                    IndexOptions::builder()
                        .name("user_id_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for AchievementDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
