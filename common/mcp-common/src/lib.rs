//! MCP Common - shared plumbing for MCP servers
//!
//! Everything an MCP server binary needs besides its tools:
//!
//! - **Startup**: [`init_tracing`] and the `serve_stdio!` macro
//! - **Results**: [`json_success`] / [`text_success`] for `CallToolResult`
//! - **Errors**: [`IntoMcpError`] and [`ResultExt`] so `?` works in handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{serve_stdio, json_success};
//!
//! // main.rs - the whole entrypoint
//! serve_stdio!(HoldsMcpServer, "holds_mcp");
//!
//! // inside a tool handler
//! async fn my_tool(&self) -> Result<CallToolResult, McpError> {
//!     let payload = self.query().await.to_mcp_err()?;
//!     json_success(&payload)
//! }
//! ```

pub mod error;
pub mod init;
pub mod result;

pub use error::{internal_error, invalid_params, IntoMcpError, McpResult, ResultExt};
pub use init::init_tracing;
pub use result::{json_success, text_success};

// Commonly needed rmcp types, re-exported so servers depend on one name
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};
