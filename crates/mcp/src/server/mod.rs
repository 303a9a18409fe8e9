mod core;
mod http;
mod log_payload;
mod stdio;

pub use core::DevRevMcpCore;
pub use http::{McpHttpServer, RunningMcpHttpServer, resolve_bind_address};
pub use stdio::serve_stdio;
