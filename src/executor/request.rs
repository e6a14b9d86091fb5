use super::{NodeContext, NodeExecutor, merge_headers};
use crate::ast::Value;
use crate::error::NodeError;
use crate::flow::RequestConfig;
use tracing::debug;

impl NodeExecutor for RequestConfig {
    /// Issues the configured call and returns `{ status, statusText, data }`,
    /// where `data` is the JSON-decoded response body.
    ///
    /// Request bodies and authentication are not supported.
    async fn execute(&self, ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(NodeError::MissingUrl);
        }

        let mut request = ctx.http.request(self.method.into(), url);
        for (key, value) in merge_headers(&self.headers) {
            request = request.header(key, value);
        }

        debug!(node_id = ctx.node_id, method = self.method.as_str(), url, "Sending request");
        let response = request
            .send()
            .await
            .map_err(|e| NodeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NodeError::RequestFailed(e.to_string()))?;
        debug!(node_id = ctx.node_id, status = status.as_u16(), "Received response");

        Ok(Value::object([
            ("status", Value::Number(f64::from(status.as_u16()))),
            (
                "statusText",
                Value::from(status.canonical_reason().unwrap_or("")),
            ),
            ("data", Value::from(data)),
        ]))
    }
}
