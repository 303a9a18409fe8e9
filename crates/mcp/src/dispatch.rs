//! Routes a named invocation through validation, payload building, the remote
//! call and response formatting.

use std::sync::Arc;

use devrev_api::RemoteClient;
use devrev_types::{Arguments, ContentItem, InvocationRequest};
use tracing::{debug, info, warn};

use crate::errors::ToolError;
use crate::format::format_response;
use crate::operation::Operation;
use crate::payload::build_payload;

/// Stateless between invocations; safe to share across concurrent calls.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn RemoteClient>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self { client }
    }

    /// Dispatch one invocation.
    ///
    /// Local failures return before any remote call. A remote failure status
    /// comes back as content.
    pub async fn dispatch(&self, name: &str, arguments: Option<&Arguments>) -> Result<Vec<ContentItem>, ToolError> {
        let operation = Operation::from_name(name).ok_or_else(|| ToolError::unknown_operation(name))?;
        if operation.is_deprecated_alias() {
            debug!(tool = name, canonical = %operation.canonical(), "deprecated tool alias invoked");
        }

        let payload = build_payload(operation, arguments)?;
        debug!(tool = name, endpoint = payload.endpoint, "built outbound payload");

        let result = self
            .client
            .call(payload.endpoint, &payload.body)
            .await
            .inspect_err(|error| warn!(tool = name, endpoint = payload.endpoint, %error, "remote call failed"))?;
        if operation.is_success(result.status_code) {
            info!(tool = name, status = result.status_code, "tool call completed");
        } else {
            warn!(
                tool = name,
                status = result.status_code,
                expected = operation.success_status(),
                "remote API reported failure"
            );
        }

        let empty = Arguments::new();
        format_response(operation, arguments.unwrap_or(&empty), &result)
    }

    pub async fn dispatch_request(&self, request: &InvocationRequest) -> Result<Vec<ContentItem>, ToolError> {
        self.dispatch(&request.operation_name, request.arguments.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use devrev_api::ApiError;
    use devrev_types::RemoteResult;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingClient {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RemoteClient for CountingClient {
        async fn call(&self, endpoint: &str, _body: &Arguments) -> Result<RemoteResult, ApiError> {
            self.calls.lock().unwrap().push(endpoint.to_string());
            Ok(RemoteResult::new(200, "{}"))
        }
    }

    #[tokio::test]
    async fn unknown_tool_never_reaches_the_client() {
        let client = Arc::new(CountingClient::default());
        let dispatcher = Dispatcher::new(client.clone());
        let error = dispatcher.dispatch("delete_everything", None).await.unwrap_err();
        assert_eq!(error.to_string(), "Unknown tool: delete_everything");
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn request_wrapper_dispatches_by_name() {
        let client = Arc::new(CountingClient::default());
        let dispatcher = Dispatcher::new(client.clone());
        let arguments = json!({ "id": "PART-1" }).as_object().cloned();
        let request = InvocationRequest::new("get_part", arguments);
        let content = dispatcher.dispatch_request(&request).await.unwrap();
        assert_eq!(content[0].text, "Part information for 'PART-1':\n{}");
        assert_eq!(*client.calls.lock().unwrap(), vec!["parts.get".to_string()]);
    }
}
