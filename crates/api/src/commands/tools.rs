//! Calendar tool-call command

use std::time::Instant;

use bookline_domain::{ToolCallPayload, ToolReply};
use tracing::info;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Handle a tool invocation delivered by the voice platform webhook.
///
/// The dispatcher guarantees a speakable reply, so this wrapper only adds
/// command-level logging.
pub async fn handle_tool_call(
    ctx: &AppContext,
    agent_id: &str,
    payload: ToolCallPayload,
) -> ToolReply {
    let command_name = "tools::handle_tool_call";
    let start = Instant::now();

    info!(agent_id, tool = %payload.name, "handling tool call");
    let reply = ctx.dispatcher.dispatch(agent_id, &payload).await;

    log_command_execution(command_name, &payload.name, start.elapsed(), reply.success);
    reply
}
