//! Holds MCP Server
//!
//! NL-to-SQL invoice-hold queries with a sanitization guardrail between the
//! generator and the database.

use holds_mcp::HoldsMcpServer;

mcp_common::serve_stdio!(HoldsMcpServer, "holds_mcp");
