//! MongoDB-backed practice store
//!
//! Thin async shell over the three collections. All business rules
//! (menu ranking, badge conditions, streaks) live in pure functions;
//! this type only reads and writes documents.

use bson::{doc, DateTime};

use crate::db::schemas::{
    AchievementDoc, PracticeLogDoc, ProgressDoc, ACHIEVEMENT_COLLECTION, PRACTICE_LOG_COLLECTION,
    PROGRESS_COLLECTION,
};
use crate::db::{MongoClient, MongoCollection};
use crate::types::Result;

/// Collections used by the practice tracker
#[derive(Clone)]
pub struct PracticeStore {
    progress: MongoCollection<ProgressDoc>,
    practice_logs: MongoCollection<PracticeLogDoc>,
    achievements: MongoCollection<AchievementDoc>,
}

impl PracticeStore {
    /// Open all collections, applying their indexes
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        Ok(Self {
            progress: mongo.collection(PROGRESS_COLLECTION).await?,
            practice_logs: mongo.collection(PRACTICE_LOG_COLLECTION).await?,
            achievements: mongo.collection(ACHIEVEMENT_COLLECTION).await?,
        })
    }

    /// All progress records for one user
    pub async fn progress_for_user(&self, user_id: &str) -> Result<Vec<ProgressDoc>> {
        self.progress.find_many(doc! { "userId": user_id }).await
    }

    /// Flip one checklist item for one article
    ///
    /// Creates the record on first touch; afterwards removes the index
    /// if present, appends it if absent. Returns the updated record.
    pub async fn toggle(
        &self,
        user_id: &str,
        article_id: &str,
        item_index: u32,
    ) -> Result<ProgressDoc> {
        let filter = doc! { "userId": user_id, "articleId": article_id };

        match self.progress.find_one(filter.clone()).await? {
            None => {
                let mut record =
                    ProgressDoc::new(user_id.to_string(), article_id.to_string(), item_index);
                let id = self.progress.insert_one(record.clone()).await?;
                record.id = Some(id);
                Ok(record)
            }
            Some(mut record) => {
                toggle_item(&mut record.completed_items, item_index);
                record.last_updated = DateTime::now();

                let items: Vec<i64> = record.completed_items.iter().map(|&i| i64::from(i)).collect();
                let update = doc! {
                    "$set": {
                        "completedItems": items,
                        "lastUpdated": record.last_updated,
                        "metadata.updated_at": DateTime::now(),
                    }
                };
                self.progress.update_one(filter, update).await?;
                Ok(record)
            }
        }
    }

    /// Merge an article into the user's practice log for `date`
    ///
    /// `$addToSet` upsert against the unique (userId, date) index, so
    /// concurrent same-day toggles converge on a single record.
    pub async fn log_practice(&self, user_id: &str, article_id: &str, date: &str) -> Result<()> {
        let filter = doc! { "userId": user_id, "date": date };
        let update = doc! {
            "$addToSet": { "articles": article_id },
            "$set": { "metadata.updated_at": DateTime::now() },
            "$setOnInsert": { "metadata.created_at": DateTime::now() },
        };
        self.practice_logs.upsert_one(filter, update).await?;
        Ok(())
    }

    /// Practice logs for one user, newest date first, capped
    pub async fn practice_logs_desc(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<PracticeLogDoc>> {
        self.practice_logs
            .find_sorted(doc! { "userId": user_id }, doc! { "date": -1 }, limit)
            .await
    }

    /// All unlock records for one user
    pub async fn unlocked(&self, user_id: &str) -> Result<Vec<AchievementDoc>> {
        self.achievements.find_many(doc! { "userId": user_id }).await
    }

    /// Record a badge unlock; returns false when another request won
    /// the race and the unique index rejected the insert
    pub async fn record_unlock(&self, user_id: &str, badge_id: &str) -> Result<bool> {
        let inserted = self
            .achievements
            .insert_unique(AchievementDoc::new(user_id.to_string(), badge_id.to_string()))
            .await?;
        Ok(inserted.is_some())
    }
}

/// Flip membership of one checklist index
fn toggle_item(completed_items: &mut Vec<u32>, item_index: u32) {
    if let Some(pos) = completed_items.iter().position(|&i| i == item_index) {
        completed_items.remove(pos);
    } else {
        completed_items.push(item_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_missing_item() {
        let mut items = vec![0, 2];
        toggle_item(&mut items, 4);
        assert_eq!(items, vec![0, 2, 4]);
    }

    #[test]
    fn test_toggle_removes_present_item() {
        let mut items = vec![0, 2, 4];
        toggle_item(&mut items, 2);
        assert_eq!(items, vec![0, 4]);
    }

    #[test]
    fn test_double_toggle_restores_original_set() {
        let original = vec![1, 3];
        let mut items = original.clone();
        toggle_item(&mut items, 2);
        toggle_item(&mut items, 2);
        assert_eq!(items, original);
    }
}
