use anyhow::Result;
use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::info;

use crate::dispatch::Dispatcher;
use crate::server::core::DevRevMcpCore;

/// Serve the MCP handler over stdin/stdout until the peer disconnects.
pub async fn serve_stdio(dispatcher: Dispatcher) -> Result<()> {
    info!("starting MCP server on stdio");

    let server = DevRevMcpCore::new(dispatcher).serve((stdin(), stdout())).await?;
    let quit_reason = server.waiting().await?;
    info!(?quit_reason, "MCP server stopped");

    Ok(())
}
