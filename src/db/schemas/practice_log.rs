//! Practice log document schema
//!
//! One record per (user, calendar day) holding the set of articles
//! touched that day. Merged via `$addToSet` upsert on every toggle,
//! so two same-day toggles on different articles share one record.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for practice logs
pub const PRACTICE_LOG_COLLECTION: &str = "practice_logs";

/// One day of practice for one user
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PracticeLogDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// User identifier
    pub user_id: String,

    /// Practice date as `YYYY-MM-DD` (UTC)
    pub date: String,

    /// Article IDs touched on this date
    #[serde(default)]
    pub articles: Vec<String>,
}

impl IntoIndexes for PracticeLogDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // One log record per user per day
            (
                doc! { "userId": 1, "date": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("user_date_unique".to_string())
                        .build(),
                ),
            ),
            // Per-user history listing
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

impl MutMetadata for PracticeLogDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
