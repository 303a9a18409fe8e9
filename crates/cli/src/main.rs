use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use devrev_api::{ApiConfig, DevRevClient};
use devrev_mcp::{Dispatcher, McpHttpServer, resolve_bind_address, serve_stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

/// Serve DevRev tools over the Model Context Protocol.
#[derive(Parser, Debug)]
#[command(name = "devrev-mcp", version, about)]
struct Args {
    /// Transport to serve on
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Loopback address for the HTTP transport
    #[arg(long)]
    bind: Option<String>,

    /// Per-request timeout against the DevRev API, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Interval between SSE keep-alive pings on the HTTP transport, in seconds
    #[arg(long)]
    sse_keep_alive_secs: Option<u64>,

    /// Override the DevRev API base URL
    #[arg(long)]
    api_base: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = load_config(&args)?;
    let client = DevRevClient::new(&config).context("failed to build DevRev API client")?;
    let dispatcher = Dispatcher::new(Arc::new(client));
    info!(base_url = config.base_url(), transport = ?args.transport, "starting DevRev MCP server");

    match args.transport {
        Transport::Stdio => serve_stdio(dispatcher).await,
        Transport::Http => {
            let keep_alive = args.sse_keep_alive_secs.map(Duration::from_secs);
            serve_http(dispatcher, args.bind.as_deref(), keep_alive).await
        }
    }
}

// stdout carries the stdio transport, so logs go to stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &Args) -> Result<ApiConfig> {
    let mut config = ApiConfig::from_env().context("failed to load DevRev API configuration")?;
    if let Some(api_base) = args.api_base.as_deref() {
        config = config.with_base_url(api_base).context("invalid --api-base")?;
    }
    if let Some(seconds) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(seconds));
    }
    Ok(config)
}

async fn serve_http(dispatcher: Dispatcher, bind: Option<&str>, keep_alive: Option<Duration>) -> Result<()> {
    let bind_address = resolve_bind_address(bind)?;
    let mut server = McpHttpServer::new(bind_address, dispatcher);
    if let Some(interval) = keep_alive {
        server = server.with_sse_keep_alive(interval);
    }
    let running = server.start().await?;
    info!(url = %format!("http://{}/mcp", running.bound_address()), "MCP HTTP endpoint ready");

    tokio::signal::ctrl_c().await.context("failed to listen for ctrl-c")?;
    info!(clients = running.connected_clients(), "shutting down");
    running.stop().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_stdio() {
        let args = Args::try_parse_from(["devrev-mcp"]).unwrap();
        assert_eq!(args.transport, Transport::Stdio);
        assert!(args.bind.is_none());
        assert!(args.sse_keep_alive_secs.is_none());
    }

    #[test]
    fn parses_http_flags() {
        let args = Args::try_parse_from([
            "devrev-mcp",
            "--transport",
            "http",
            "--bind",
            "127.0.0.1:8931",
            "--timeout-secs",
            "5",
            "--sse-keep-alive-secs",
            "15",
        ])
        .unwrap();
        assert_eq!(args.transport, Transport::Http);
        assert_eq!(args.bind.as_deref(), Some("127.0.0.1:8931"));
        assert_eq!(args.timeout_secs, Some(5));
        assert_eq!(args.sse_keep_alive_secs, Some(15));
    }

    #[test]
    fn rejects_unknown_transport() {
        assert!(Args::try_parse_from(["devrev-mcp", "--transport", "sse"]).is_err());
    }
}
