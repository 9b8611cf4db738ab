//! Holds MCP Library
//!
//! Answers natural-language questions about accounts-payable invoice holds
//! by asking an AI backend for SQL, sanitizing that SQL through a
//! deterministic guardrail, and executing the result against the target
//! database. The guardrail is the core: untrusted generator output either
//! becomes a policy-compliant statement or is rejected with the rule that
//! failed - nothing out of policy ever reaches the database.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use holds_mcp::{sanitize, SanitizationPolicy};
//!
//! let stmt = sanitize(raw_sql, &policy)?;
//! let rows = db.execute(&stmt).await?;
//! ```

pub mod audit;
pub mod clauses;
pub mod config;
pub mod db;
pub mod generate;
pub mod handlers;
pub mod lex;
pub mod params;
pub mod policy;
pub mod report;
pub mod sanitize;
pub mod server;
pub mod types;

// Re-export the main server type
pub use server::HoldsMcpServer;

// Re-exports for direct API usage
pub use policy::SanitizationPolicy;
pub use sanitize::{sanitize, SanitizedStatement};
pub use types::{DbError, QueryOutcome, SanitizeError};
