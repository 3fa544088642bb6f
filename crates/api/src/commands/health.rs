//! Health check command

use serde::{Deserialize, Serialize};

use crate::AppContext;

/// Service health snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub database_ok: bool,
}

/// Report process health, probing the database pool.
pub fn health_check(ctx: &AppContext) -> HealthStatus {
    let database_ok = ctx.db.connection().is_ok();
    let status = if database_ok { "ok" } else { "degraded" };
    HealthStatus { status: status.to_string(), database_ok }
}
