//! Bookline webhook server
//!
//! Exposes the voice platform tool-call webhook and a health probe.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use bookline_app::commands::health::{health_check, HealthStatus};
use bookline_app::commands::tools::handle_tool_call;
use bookline_app::utils::logging::init_tracing;
use bookline_app::AppContext;
use bookline_domain::{ToolCallPayload, ToolReply};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = bookline_infra::config::load()?;
    let bind_addr = config.server.bind_addr.clone();
    let ctx = AppContext::new(config)?;

    let app = Router::new()
        .route("/health", get(health))
        .route("/webhooks/{agent_id}/tool-call", post(tool_call))
        .with_state(ctx);

    info!(%bind_addr, "bookline webhook server listening");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(ctx): State<Arc<AppContext>>) -> Json<HealthStatus> {
    Json(health_check(&ctx))
}

async fn tool_call(
    State(ctx): State<Arc<AppContext>>,
    Path(agent_id): Path<String>,
    Json(payload): Json<ToolCallPayload>,
) -> Json<ToolReply> {
    Json(handle_tool_call(&ctx, &agent_id, payload).await)
}
