//! `CallToolResult` construction helpers

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

/// Serialize `data` to pretty JSON and wrap it as a successful tool result.
///
/// ```rust,ignore
/// let outcome = QueryOutcome { row_count: 3, .. };
/// json_success(&outcome)
/// ```
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Wrap plain text as a successful tool result.
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}
