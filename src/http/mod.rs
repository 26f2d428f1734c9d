//! axum router for every HTTP surface: the JSON-RPC tool endpoints, the rmcp
//! streamable-HTTP endpoint, the Google OAuth flow, Gmail reads and the
//! resident overview.

pub mod error;
pub mod google;
pub mod mcp;
pub mod residents;

pub use error::ApiError;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{Json, Router};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::StreamableHttpService;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CarelogConfig;
use crate::db::Db;
use crate::google::OAuthClient;
use crate::rpc::{EchoToolset, ResidentToolset};
use crate::session::SessionStore;
use crate::tools::CarelogTools;

/// The toolset behind each JSON-RPC endpoint.
#[derive(Clone)]
pub struct Toolsets {
    pub simple: EchoToolset,
    pub streaming: EchoToolset,
    pub residents: ResidentToolset,
    pub streaming_residents: ResidentToolset,
}

impl Toolsets {
    pub fn new(db: &Db, config: &CarelogConfig) -> Self {
        let settings = Arc::new(config.tools.clone());
        Self {
            simple: EchoToolset::simple(),
            streaming: EchoToolset::streaming(Duration::from_millis(
                config.tools.stream_echo_delay_ms,
            )),
            residents: ResidentToolset::new("nextjs-mcp", db.clone(), Arc::clone(&settings)),
            streaming_residents: ResidentToolset::new(
                "streaming-residents-mcp",
                db.clone(),
                settings,
            ),
        }
    }
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Arc<CarelogConfig>,
    pub http: reqwest::Client,
    pub oauth: OAuthClient,
    pub session: SessionStore,
    pub toolsets: Toolsets,
}

impl AppState {
    pub fn new(db: Db, config: CarelogConfig) -> Self {
        let http = reqwest::Client::new();
        let oauth = OAuthClient::new(http.clone(), config.google.clone());
        let session = SessionStore::new(&config.session);
        let toolsets = Toolsets::new(&db, &config);
        Self {
            db,
            config: Arc::new(config),
            http,
            oauth,
            session,
            toolsets,
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let db = state.db.clone();
    let settings = Arc::new(state.config.tools.clone());
    let rmcp_service = StreamableHttpService::new(
        move || Ok(CarelogTools::new(db.clone(), settings.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/mcp/simple",
            post(mcp::simple).get(mcp::simple_info).options(mcp::preflight),
        )
        .route(
            "/api/mcp/http",
            post(mcp::http).get(mcp::http_info).options(mcp::preflight),
        )
        .route(
            "/api/mcp/stream",
            post(mcp::stream).get(mcp::stream_info).options(mcp::preflight),
        )
        .route(
            "/api/mcp/stream-residents",
            post(mcp::stream_residents)
                .get(mcp::stream_residents_info)
                .options(mcp::preflight),
        )
        .nest_service("/api/mcp/mcp", rmcp_service)
        .route("/api/google/oauth/start", get(google::oauth_start))
        .route("/api/google/oauth/callback", get(google::oauth_callback))
        .route("/api/google/oauth/logout", post(google::oauth_logout))
        .route("/api/gmail/labels", get(google::labels))
        .route("/api/gmail/messages", post(google::messages))
        .route("/api/residents", get(residents::overview))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
