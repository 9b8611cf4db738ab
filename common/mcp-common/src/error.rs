//! Error conversion for tool handlers
//!
//! Tool handlers return `Result<CallToolResult, McpError>`. These traits let
//! domain errors cross that boundary with `?` instead of ad-hoc `map_err`.

use rmcp::ErrorData as McpError;

/// Result alias for MCP tool handlers.
pub type McpResult<T> = Result<T, McpError>;

/// Convert a domain error into an MCP protocol error.
///
/// Implement this for server-local error enums; blanket impls below cover
/// the usual suspects (io, serde_json, anyhow, strings).
pub trait IntoMcpError {
    fn into_mcp_error(self) -> McpError;
}

impl IntoMcpError for std::io::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(format!("IO error: {}", self), None)
    }
}

impl IntoMcpError for serde_json::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(format!("JSON error: {}", self), None)
    }
}

impl IntoMcpError for anyhow::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(self.to_string(), None)
    }
}

impl IntoMcpError for String {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(self, None)
    }
}

impl IntoMcpError for &str {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(self.to_string(), None)
    }
}

/// `result.to_mcp_err()?` for any error implementing [`IntoMcpError`].
pub trait ResultExt<T> {
    fn to_mcp_err(self) -> Result<T, McpError>;
}

impl<T, E: IntoMcpError> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> Result<T, McpError> {
        self.map_err(|e| e.into_mcp_error())
    }
}

/// Shorthand for an internal MCP error.
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}

/// Shorthand for an invalid-params MCP error.
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::invalid_params(message.into(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_into_mcp_error_keeps_message() {
        let err = "schema missing".into_mcp_error();
        assert!(err.message.contains("schema missing"));
    }

    #[test]
    fn result_ext_converts_io_errors() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "not found",
        ));
        assert!(result.to_mcp_err().is_err());
    }

    #[test]
    fn helper_constructors() {
        assert!(internal_error("boom").message.contains("boom"));
        assert!(invalid_params("bad").message.contains("bad"));
    }
}
