//! Server entry points for the HTTP and stdio transports.
//!
//! Provides [`serve_http`] and [`serve_stdio`], which open the database and wire
//! it into the axum router or the rmcp stdio service.

use crate::config::CarelogConfig;
use crate::db::{self, Db};
use crate::http::{self, AppState};
use crate::tools::CarelogTools;
use anyhow::{Context, Result};
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

fn open_shared_db(config: &CarelogConfig) -> Result<Db> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");
    Ok(Arc::new(Mutex::new(conn)))
}

/// Start the MCP tools over stdio transport.
pub async fn serve_stdio(config: CarelogConfig) -> Result<()> {
    tracing::info!("starting carelog MCP server on stdio");

    let db = open_shared_db(&config)?;
    let tools = CarelogTools::new(db, Arc::new(config.tools.clone()));
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the HTTP server with every endpoint mounted.
pub async fn serve_http(config: CarelogConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    tracing::info!(addr = %bind_addr, "starting carelog HTTP server");

    let db = open_shared_db(&config)?;
    let router = http::router(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "listening at http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
