//! Achievement endpoints
//!
//! - `GET /api/achievements?userId=` - full badge catalog with unlock state
//! - `POST /api/achievements/evaluate` - manual re-evaluation

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::achievements::evaluate_and_unlock;
use crate::badges::{Badge, BADGES};
use crate::routes::{
    database_unavailable, error_response, failure_response, json_ok, read_json_body,
    require_user_id,
};
use crate::server::AppState;

/// One badge annotated with the user's unlock state
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BadgeStatusView {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    unlocked: bool,
    unlocked_at: Option<String>,
}

/// Manual evaluation request body
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateRequest {
    user_id: String,
}

/// Evaluation response body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateResponse {
    newly_unlocked: Vec<&'static Badge>,
}

/// Handle GET /api/achievements
///
/// Returns every badge in the catalog, annotated with whether (and
/// when) this user unlocked it.
pub async fn handle_get_achievements(
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

    let unlocked = match store.unlocked(&user_id).await {
        Ok(records) => records,
        Err(e) => return failure_response(&e),
    };
    let unlocked_at: HashMap<&str, String> = unlocked
        .iter()
        .map(|a| {
            (
                a.badge_id.as_str(),
                a.unlocked_at.try_to_rfc3339_string().unwrap_or_default(),
            )
        })
        .collect();

    let views: Vec<BadgeStatusView> = BADGES
        .iter()
        .map(|badge| BadgeStatusView {
            id: badge.id,
            name: badge.name,
            description: badge.description,
            icon: badge.icon,
            unlocked: unlocked_at.contains_key(badge.id),
            unlocked_at: unlocked_at.get(badge.id).cloned(),
        })
        .collect();

    json_ok(&views)
}

/// Handle POST /api/achievements/evaluate
pub async fn handle_evaluate(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let body: EvaluateRequest = match read_json_body(req).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    if body.user_id.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing userId parameter");
    }
    let store = match &state.store {
        Some(store) => store,
        None => return database_unavailable(),
    };

    match evaluate_and_unlock(store, &body.user_id).await {
        Ok(newly_unlocked) => json_ok(&EvaluateResponse { newly_unlocked }),
        Err(e) => failure_response(&e),
    }
}
