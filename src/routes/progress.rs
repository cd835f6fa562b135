//! Progress endpoints
//!
//! - `GET /api/progress?userId=` - all progress records for a user
//! - `POST /api/progress/toggle` - flip one checklist item
//! - `GET /api/progress/practice-log?userId=` - daily log history
//! - `GET /api/progress/daily-menu?userId=` - practice recommendations

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::achievements::evaluate_and_unlock;
use crate::badges::Badge;
use crate::db::schemas::{PracticeLogDoc, ProgressDoc};
use crate::practice::build_menu;
use crate::routes::{
    database_unavailable, error_response, failure_response, json_ok, read_json_body,
    require_user_id,
};
use crate::server::AppState;

/// Practice-log history cap (one year of daily records)
const PRACTICE_LOG_LIMIT: i64 = 365;

/// Progress record as returned to clients
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    pub user_id: String,
    pub article_id: String,
    pub completed_items: Vec<u32>,
    pub last_updated: String,
}

impl From<&ProgressDoc> for ProgressView {
    fn from(doc: &ProgressDoc) -> Self {
        Self {
            user_id: doc.user_id.clone(),
            article_id: doc.article_id.clone(),
            completed_items: doc.completed_items.clone(),
            last_updated: doc.last_updated.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

/// Practice-log record as returned to clients
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeLogView {
    pub user_id: String,
    pub date: String,
    pub articles: Vec<String>,
}

impl From<&PracticeLogDoc> for PracticeLogView {
    fn from(doc: &PracticeLogDoc) -> Self {
        Self {
            user_id: doc.user_id.clone(),
            date: doc.date.clone(),
            articles: doc.articles.clone(),
        }
    }
}

/// Toggle request body
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest {
    user_id: String,
    article_id: String,
    item_index: u32,
}

/// Toggle response body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleResponse {
    progress: ProgressView,
    newly_unlocked: Vec<&'static Badge>,
}

/// Handle GET /api/progress
pub async fn handle_get_progress(
    state: Arc<AppState>,
    query: Option<&str>,
) -> Response<Full<Bytes>> {
    let user_id = match require_user_id(query) {
        Ok(user_id) => user_id,
        Err(resp) => return resp,
    };
    let store = match &state.store {
        Some(store) => store,
        None => return database_unavailable(),
    };

    match store.progress_for_user(&user_id).await {
        Ok(records) => {
            let views: Vec<ProgressView> = records.iter().map(ProgressView::from).collect();
            json_ok(&views)
        }
        Err(e) => failure_response(&e),
    }
}

/// Handle POST /api/progress/toggle
///
/// Flips the item, merges today's practice log, then re-runs the
/// achievement evaluator so the response can report fresh unlocks.
pub async fn handle_toggle(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let body: ToggleRequest = match read_json_body(req).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    if body.user_id.is_empty() || body.article_id.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required parameters (userId, articleId, itemIndex)",
        );
    }
    let store = match &state.store {
        Some(store) => store,
        None => return database_unavailable(),
    };

    let record = match store
        .toggle(&body.user_id, &body.article_id, body.item_index)
        .await
    {
        Ok(record) => record,
        Err(e) => return failure_response(&e),
    };

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    if let Err(e) = store
        .log_practice(&body.user_id, &body.article_id, &today)
        .await
    {
        return failure_response(&e);
    }

    let newly_unlocked = match evaluate_and_unlock(store, &body.user_id).await {
        Ok(badges) => badges,
        Err(e) => return failure_response(&e),
    };

    json_ok(&ToggleResponse {
        progress: ProgressView::from(&record),
        newly_unlocked,
    })
}

/// Handle GET /api/progress/practice-log
pub async fn handle_practice_log(
    state: Arc<AppState>,
    query: Option<&str>,
) -> Response<Full<Bytes>> {
    let user_id = match require_user_id(query) {
        Ok(user_id) => user_id,
        Err(resp) => return resp,
    };
    let store = match &state.store {
        Some(store) => store,
        None => return database_unavailable(),
    };

    match store.practice_logs_desc(&user_id, PRACTICE_LOG_LIMIT).await {
        Ok(logs) => {
            let views: Vec<PracticeLogView> = logs.iter().map(PracticeLogView::from).collect();
            json_ok(&views)
        }
        Err(e) => failure_response(&e),
    }
}

/// Handle GET /api/progress/daily-menu
pub async fn handle_daily_menu(
    state: Arc<AppState>,
    query: Option<&str>,
) -> Response<Full<Bytes>> {
    let user_id = match require_user_id(query) {
        Ok(user_id) => user_id,
        Err(resp) => return resp,
    };
    let store = match &state.store {
        Some(store) => store,
        None => return database_unavailable(),
    };

    match store.progress_for_user(&user_id).await {
        Ok(records) => json_ok(&build_menu(&records, chrono::Utc::now())),
        Err(e) => failure_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;
    use clap::Parser;

    fn state_without_db() -> Arc<AppState> {
        Arc::new(AppState::new(Args::parse_from(["woodshed"])))
    }

    #[tokio::test]
    async fn test_get_progress_without_user_id_is_400() {
        let resp = handle_get_progress(state_without_db(), None).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_practice_log_without_user_id_is_400() {
        let resp = handle_practice_log(state_without_db(), Some("limit=10")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_daily_menu_without_db_is_503() {
        let resp = handle_daily_menu(state_without_db(), Some("userId=u1")).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_progress_view_from_doc() {
        let doc = ProgressDoc::new("u1".to_string(), "tech_01".to_string(), 2);
        let view = ProgressView::from(&doc);
        assert_eq!(view.article_id, "tech_01");
        assert_eq!(view.completed_items, vec![2]);
        assert!(!view.last_updated.is_empty());
    }
}
