//! HTTP routes for woodshed

pub mod achievements;
pub mod content;
pub mod health;
pub mod progress;

pub use achievements::{handle_evaluate, handle_get_achievements};
pub use content::{handle_article, handle_catalog};
pub use health::{health_check, version_info};
pub use progress::{handle_daily_menu, handle_get_progress, handle_practice_log, handle_toggle};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tracing::error;

use crate::types::WoodshedError;

/// Build a JSON error response
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message });

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::from(r#"{"error":"Internal error"}"#)))
                .unwrap()
        })
}

/// Build a successful JSON response from any serializable value
pub(crate) fn json_ok<T: Serialize>(data: &T) -> Response<Full<Bytes>> {
    let body = match serde_json::to_vec(data) {
        Ok(body) => body,
        Err(e) => {
            error!("Response serialization failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-cache")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
}

/// Map a service error to its HTTP response
///
/// Unexpected failures are logged here and surfaced as a generic
/// message; validation and not-found errors keep their text.
pub(crate) fn failure_response(err: &WoodshedError) -> Response<Full<Bytes>> {
    match err {
        WoodshedError::Validation(msg) => error_response(StatusCode::BAD_REQUEST, msg),
        WoodshedError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, msg),
        _ => {
            error!("Request failed: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Response used when MongoDB was not connected at startup (dev mode)
pub(crate) fn database_unavailable() -> Response<Full<Bytes>> {
    error_response(StatusCode::SERVICE_UNAVAILABLE, "Database not available")
}

/// Parse query string into key-value map
pub(crate) fn parse_query_params(query: &str) -> HashMap<String, String> {
    if query.is_empty() {
        return HashMap::new();
    }

    query
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let value = parts.next().unwrap_or("");
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Extract the required userId query parameter, or the 400 to return
pub(crate) fn require_user_id(query: Option<&str>) -> Result<String, Response<Full<Bytes>>> {
    let params = parse_query_params(query.unwrap_or(""));
    match params.get("userId") {
        Some(user_id) if !user_id.is_empty() => Ok(user_id.clone()),
        _ => Err(error_response(
            StatusCode::BAD_REQUEST,
            "Missing userId parameter",
        )),
    }
}

/// Collect and deserialize a JSON request body, or the 400 to return
pub(crate) async fn read_json_body<T: DeserializeOwned>(
    req: Request<Incoming>,
) -> Result<T, Response<Full<Bytes>>> {
    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                &format!("Failed to read request body: {}", e),
            ));
        }
    };

    serde_json::from_slice(&body)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_params() {
        let params = parse_query_params("userId=abc&limit=10");
        assert_eq!(params.get("userId"), Some(&"abc".to_string()));
        assert_eq!(params.get("limit"), Some(&"10".to_string()));
    }

    #[test]
    fn test_parse_query_params_empty() {
        assert!(parse_query_params("").is_empty());
    }

    #[test]
    fn test_require_user_id_present() {
        assert_eq!(require_user_id(Some("userId=u1")).unwrap(), "u1");
    }

    #[test]
    fn test_require_user_id_missing_is_400() {
        let resp = require_user_id(Some("other=x")).unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = require_user_id(None).unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_require_user_id_empty_is_400() {
        let resp = require_user_id(Some("userId=")).unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_failure_response_statuses() {
        let not_found = WoodshedError::NotFound("missing".to_string());
        assert_eq!(failure_response(&not_found).status(), StatusCode::NOT_FOUND);

        let validation = WoodshedError::Validation("bad".to_string());
        assert_eq!(failure_response(&validation).status(), StatusCode::BAD_REQUEST);

        let database = WoodshedError::Database("down".to_string());
        assert_eq!(
            failure_response(&database).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
