//! Progress document schema
//!
//! One record per (user, article) pair holding the set of completed
//! checklist item indices. Created on the first toggle, mutated on
//! every toggle after that, never deleted.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for progress records
pub const PROGRESS_COLLECTION: &str = "progress";

/// Checklist progress for one article
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// User identifier (UUID issued by the client)
    pub user_id: String,

    /// Article identifier, e.g. 'tech_01', 'theory_05'
    pub article_id: String,

    /// Indices of completed checklist items
    #[serde(default)]
    pub completed_items: Vec<u32>,

    /// Last toggle time
    pub last_updated: DateTime,
}

impl ProgressDoc {
    /// Create a new progress record with a single completed item
    pub fn new(user_id: String, article_id: String, item_index: u32) -> Self {
        Self {
            id: None,
            metadata: Metadata::new(),
            user_id,
            article_id,
            completed_items: vec![item_index],
            last_updated: DateTime::now(),
        }
    }
}

impl IntoIndexes for ProgressDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // One progress record per user per article
            (
                doc! { "userId": 1, "articleId": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("user_article_unique".to_string())
                        .build(),
                ),
            ),
            // Per-user progress listing
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

impl MutMetadata for ProgressDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
