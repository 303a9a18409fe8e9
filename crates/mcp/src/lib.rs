//! DevRev tools exposed over the Model Context Protocol.
//!
//! The crate is split along the request path:
//!
//! - [`catalog`] and [`operation`]: the closed set of tools and their input contracts
//! - [`payload`]: argument checks and outbound body construction
//! - [`format`]: remote result to caller content
//! - [`dispatch`]: routes an invocation through the above and the remote client
//! - [`server`]: the `rmcp` handler plus stdio and streamable HTTP hosts

pub mod catalog;
pub mod dispatch;
pub mod errors;
pub mod format;
pub mod operation;
pub mod payload;
pub mod server;

pub use catalog::{find_operation, list_operations};
pub use dispatch::Dispatcher;
pub use errors::ToolError;
pub use operation::Operation;
pub use server::{DevRevMcpCore, McpHttpServer, RunningMcpHttpServer, resolve_bind_address, serve_stdio};
