use std::sync::Arc;

use devrev_types::{Arguments, ContentItem};
use once_cell::sync::Lazy;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData, Implementation, ListToolsResult, PaginatedRequestParams,
    ProtocolVersion, ServerCapabilities, ServerInfo, Tool, ToolAnnotations,
};
use rmcp::{RoleServer, ServerHandler, service::RequestContext};
use serde_json::{Value, json};
use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::operation::Operation;
use crate::server::log_payload::{build_log_payload, render_log_payload};

const SERVER_INSTRUCTIONS: &str = "DevRev tools. Use search to find issues, tickets, parts, articles and users. \
Use get_work, create_work, update_work and list_works for issues and tickets; get_part, create_part and update_part \
for parts; create_timeline_comment and get_timeline_entries for work timelines. get_object, create_object and update_object are deprecated aliases of the *_work tools. A remote failure \
is returned as text starting with '<Operation> failed with status'.";

static TOOLS: Lazy<Vec<Tool>> = Lazy::new(|| Operation::ALL.iter().map(tool_for).collect());

fn tool_for(operation: &Operation) -> Tool {
    let mut tool = Tool::new(
        operation.name(),
        operation.description(),
        Arc::new(operation.descriptor().input_schema()),
    );
    let mut annotations = ToolAnnotations::new();
    annotations.read_only_hint = Some(operation.read_only());
    annotations.open_world_hint = Some(true);
    tool.annotations = Some(annotations);
    tool
}

/// MCP handler exposing the DevRev catalog as tools.
///
/// One instance is created per session; all instances share the dispatcher.
#[derive(Debug, Clone)]
pub struct DevRevMcpCore {
    dispatcher: Dispatcher,
}

impl DevRevMcpCore {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Published tools in catalog order.
    pub fn tools(&self) -> &'static [Tool] {
        TOOLS.as_slice()
    }

    /// Invoke one tool by name, mapping tool errors onto protocol errors.
    pub async fn call(&self, name: &str, arguments: Option<&Arguments>) -> Result<CallToolResult, ErrorData> {
        let request = arguments.map(|arguments| Value::Object(arguments.clone()));
        match self.dispatcher.dispatch(name, arguments).await {
            Ok(content) => {
                let response = CallToolResult::success(content.into_iter().map(into_content).collect());
                self.emit_log(name, request, serde_json::to_value(&response).ok());
                Ok(response)
            }
            Err(error) => {
                let error = ErrorData::from(error);
                self.emit_log(name, request, error_log_response(&error));
                Err(error)
            }
        }
    }

    fn emit_log(&self, tool_name: &str, request: Option<Value>, response: Option<Value>) {
        let Some(payload) = build_log_payload(request, response) else {
            return;
        };
        debug!(tool = tool_name, payload = %render_log_payload(&payload), "MCP tool call");
    }
}

fn error_log_response(error: &ErrorData) -> Option<Value> {
    serde_json::to_value(error).ok().map(|error| json!({ "error": error }))
}

fn into_content(item: ContentItem) -> Content {
    Content::text(item.text)
}

impl ServerHandler for DevRevMcpCore {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.tools().to_vec())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move { self.call(&request.name, request.arguments.as_ref()).await }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "devrev-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("DevRev MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }
}
