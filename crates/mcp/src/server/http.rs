//! Streamable HTTP host for the DevRev MCP handler.
//!
//! Sessions are tracked by `rmcp`'s local session manager; a background task
//! samples the session count so callers can report connected clients.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use axum::Router;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::dispatch::Dispatcher;
use crate::server::core::DevRevMcpCore;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:0";
pub const MCP_PATH: &str = "/mcp";
const SESSION_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct McpHttpServer {
    bind_address: SocketAddr,
    dispatcher: Dispatcher,
    sse_keep_alive: Option<Duration>,
}

impl McpHttpServer {
    pub fn new(bind_address: SocketAddr, dispatcher: Dispatcher) -> Self {
        Self {
            bind_address,
            dispatcher,
            sse_keep_alive: None,
        }
    }

    /// Send SSE keep-alive pings at this interval.
    pub fn with_sse_keep_alive(mut self, interval: Duration) -> Self {
        self.sse_keep_alive = Some(interval);
        self
    }

    /// Bind the listener and serve [`MCP_PATH`] in the background.
    pub async fn start(self) -> Result<RunningMcpHttpServer> {
        let shutdown = CancellationToken::new();
        let sessions = Arc::new(LocalSessionManager::default());
        let router = self.router(Arc::clone(&sessions), shutdown.child_token());

        let listener = TcpListener::bind(self.bind_address)
            .await
            .with_context(|| format!("failed to bind MCP HTTP server to {}", self.bind_address))?;
        let bound_address = listener.local_addr()?;
        info!(address = %bound_address, path = MCP_PATH, "MCP HTTP server listening");

        let serve_token = shutdown.child_token();
        let server_task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { serve_token.cancelled().await })
                .await;
            if let Err(error) = result {
                warn!(%error, "MCP HTTP server exited with an error");
            }
        });

        let client_count = Arc::new(AtomicUsize::new(0));
        let monitor_task = sample_sessions(sessions, Arc::clone(&client_count), shutdown.child_token());

        Ok(RunningMcpHttpServer {
            bound_address,
            shutdown,
            server_task,
            monitor_task,
            client_count,
        })
    }

    fn router(&self, sessions: Arc<LocalSessionManager>, cancellation_token: CancellationToken) -> Router {
        let dispatcher = self.dispatcher.clone();
        let config = StreamableHttpServerConfig {
            stateful_mode: true,
            sse_keep_alive: self.sse_keep_alive,
            cancellation_token,
            ..Default::default()
        };
        let service: StreamableHttpService<DevRevMcpCore, LocalSessionManager> =
            StreamableHttpService::new(move || Ok(DevRevMcpCore::new(dispatcher.clone())), sessions, config);
        Router::new().nest_service(MCP_PATH, service)
    }
}

/// Handle to a started server. Dropping it leaves the server running; call
/// [`RunningMcpHttpServer::stop`] to shut down.
#[derive(Debug)]
pub struct RunningMcpHttpServer {
    bound_address: SocketAddr,
    shutdown: CancellationToken,
    server_task: JoinHandle<()>,
    monitor_task: JoinHandle<()>,
    client_count: Arc<AtomicUsize>,
}

impl RunningMcpHttpServer {
    pub fn bound_address(&self) -> SocketAddr {
        self.bound_address
    }

    pub fn connected_clients(&self) -> usize {
        self.client_count.load(Ordering::Relaxed)
    }

    pub async fn stop(self) -> Result<()> {
        self.shutdown.cancel();
        self.monitor_task.await.context("session monitor task panicked")?;
        self.server_task.await.context("MCP HTTP server task panicked")?;
        info!(address = %self.bound_address, "MCP HTTP server stopped");
        Ok(())
    }
}

/// Parse a bind address, defaulting to an ephemeral loopback port. Only
/// loopback addresses are accepted.
pub fn resolve_bind_address(bind_address: Option<&str>) -> Result<SocketAddr> {
    let raw = bind_address.unwrap_or(DEFAULT_BIND_ADDRESS);
    let address: SocketAddr = raw
        .parse()
        .with_context(|| format!("invalid MCP HTTP bind address '{raw}'"))?;
    if !address.ip().is_loopback() {
        bail!("MCP HTTP server must bind to a loopback address, got {address}");
    }
    Ok(address)
}

fn sample_sessions(
    sessions: Arc<LocalSessionManager>,
    client_count: Arc<AtomicUsize>,
    cancellation_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SAMPLE_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => break,
                _ = ticker.tick() => {
                    client_count.store(sessions.sessions.read().await.len(), Ordering::Relaxed);
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use devrev_api::{ApiError, RemoteClient};
    use devrev_types::{Arguments, RemoteResult};

    struct UnusedClient;

    #[async_trait]
    impl RemoteClient for UnusedClient {
        async fn call(&self, endpoint: &str, _body: &Arguments) -> Result<RemoteResult, ApiError> {
            Err(ApiError::transport(endpoint, "not expected in this test"))
        }
    }

    #[test]
    fn default_bind_is_ephemeral_loopback() {
        let address = resolve_bind_address(None).expect("default address");
        assert!(address.ip().is_loopback());
        assert_eq!(address.port(), 0);
    }

    #[test]
    fn rejects_non_loopback_addresses() {
        assert!(resolve_bind_address(Some("0.0.0.0:8080")).is_err());
        assert!(resolve_bind_address(Some("[::1]:8080")).is_ok());
        assert!(resolve_bind_address(Some("not-an-address")).is_err());
    }

    #[tokio::test]
    async fn starts_on_ephemeral_port_and_stops() {
        let dispatcher = Dispatcher::new(Arc::new(UnusedClient));
        let running = McpHttpServer::new(resolve_bind_address(None).unwrap(), dispatcher)
            .with_sse_keep_alive(Duration::from_secs(15))
            .start()
            .await
            .expect("server starts");
        assert_ne!(running.bound_address().port(), 0);
        assert_eq!(running.connected_clients(), 0);
        running.stop().await.expect("clean shutdown");
    }
}
