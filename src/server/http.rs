//! HTTP server implementation
//!
//! hyper http1 with TokioIo, one spawned task per connection. Routing
//! is a single match over (method, path).

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Args;
use crate::db::MongoClient;
use crate::practice::PracticeStore;
use crate::routes;
use crate::types::WoodshedError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub mongo: Option<MongoClient>,
    /// Typed collections; None when running without MongoDB (dev mode)
    pub store: Option<PracticeStore>,
}

impl AppState {
    /// Create AppState without a database (dev mode, content-only)
    pub fn new(args: Args) -> Self {
        Self {
            args,
            mongo: None,
            store: None,
        }
    }

    /// Create AppState backed by MongoDB
    ///
    /// Opens the progress, practice-log, and achievement collections,
    /// applying their unique indexes before the first request.
    pub async fn with_store(args: Args, mongo: MongoClient) -> Result<Self, WoodshedError> {
        let store = PracticeStore::new(&mongo).await?;
        Ok(Self {
            args,
            mongo: Some(mongo),
            store: Some(store),
        })
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), WoodshedError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Woodshed listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    if state.args.dev_mode {
        warn!("Development mode enabled - progress endpoints unavailable without MongoDB");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(|q| q.to_string());

    info!("[{}] {} {}", addr, method, path);

    let response = match (method, path.as_str()) {
        // Health and build info
        (Method::GET, "/health") | (Method::GET, "/healthz") | (Method::GET, "/api/health") => {
            routes::health_check(state)
        }
        (Method::GET, "/version") => routes::version_info(),

        // CORS preflight
        (Method::OPTIONS, _) => preflight_response(),

        // Progress
        (Method::GET, "/api/progress") => {
            routes::handle_get_progress(state, query.as_deref()).await
        }
        (Method::POST, "/api/progress/toggle") => routes::handle_toggle(state, req).await,
        (Method::GET, "/api/progress/practice-log") => {
            routes::handle_practice_log(state, query.as_deref()).await
        }
        (Method::GET, "/api/progress/daily-menu") => {
            routes::handle_daily_menu(state, query.as_deref()).await
        }

        // Achievements
        (Method::GET, "/api/achievements") => {
            routes::handle_get_achievements(state, query.as_deref()).await
        }
        (Method::POST, "/api/achievements/evaluate") => routes::handle_evaluate(state, req).await,

        // Content
        (Method::GET, "/api/content/catalog") => routes::handle_catalog(state),
        (Method::GET, p) if p.starts_with("/api/content/") => routes::handle_article(state, p),

        _ => not_found_response(&path),
    };

    Ok(response)
}

/// CORS preflight response
fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Not found response
fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "Not Found",
        "path": path,
    });

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
