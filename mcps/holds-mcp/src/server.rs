//! MCP server wiring
//!
//! Holds the immutable policy, the database handle, the generator backend
//! and the audit log; tool implementations live in the handlers module.

use std::sync::Arc;

use mcp_common::{CallToolResult, McpError};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::audit::AuditLog;
use crate::config::HoldsConfig;
use crate::db::Database;
use crate::generate::{self, http::HttpSqlGenerator, SqlGenerator};
use crate::handlers;
use crate::params::{AskHoldsParams, ListHoldsParams};
use crate::policy::SanitizationPolicy;

/// The invoice-holds MCP server
#[derive(Clone)]
pub struct HoldsMcpServer {
    policy: Arc<SanitizationPolicy>,
    db: Arc<Database>,
    generator: Arc<dyn SqlGenerator>,
    audit: Arc<AuditLog>,
    tool_router: ToolRouter<Self>,
}

impl HoldsMcpServer {
    /// Load configuration and open the database. This is the whole startup
    /// sequence; everything constructed here is read-only afterwards.
    pub async fn connect() -> anyhow::Result<Self> {
        let config = HoldsConfig::load()?;
        Self::with_config(config).await
    }

    /// Construct the server from an explicit config.
    pub async fn with_config(config: HoldsConfig) -> anyhow::Result<Self> {
        let db = Database::connect(&config.database).await?;

        // One round trip to learn the schema the generator's qualifiers
        // must be rewritten to
        let target_schema = match db.current_schema().await {
            Ok(schema) => {
                tracing::info!(%schema, "runtime schema detected");
                Some(schema)
            }
            Err(e) => {
                tracing::warn!(
                    "schema detection failed, falling back to configured user: {}",
                    e
                );
                Some(config.database.user.to_uppercase())
            }
        };

        let policy = SanitizationPolicy::from_config(&config.policy, target_schema);
        let preamble = generate::build_preamble(&config.policy.table, &config.policy.columns);
        let generator = HttpSqlGenerator::new(config.generator.clone(), preamble)?;

        Ok(Self {
            policy: Arc::new(policy),
            db: Arc::new(db),
            generator: Arc::new(generator),
            audit: Arc::new(AuditLog::new(&config.audit)),
            tool_router: Self::tool_router(),
        })
    }
}

#[tool_router]
impl HoldsMcpServer {
    #[tool(description = "Answer a natural-language question about invoice holds. \
        Generates SQL via the configured AI backend, validates it against the \
        guardrail policy (single table, read-only, mandatory predicates, row limit) \
        and executes the sanitized statement. Returns the rows, the final SQL and a \
        summary message.")]
    async fn ask_holds(
        &self,
        Parameters(params): Parameters<AskHoldsParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::ask_holds(
            self.generator.as_ref(),
            &self.policy,
            &self.db,
            &self.audit,
            params,
        )
        .await
    }

    #[tool(description = "List currently open invoice holds (most recent first). \
        Optionally pass a row limit; capped at 100.")]
    async fn list_holds(
        &self,
        Parameters(params): Parameters<ListHoldsParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::list_holds(&self.policy, &self.db, &self.audit, params).await
    }

    #[tool(description = "Count open invoice holds grouped by hold code, plus the \
        overall total.")]
    async fn hold_statistics(&self) -> Result<CallToolResult, McpError> {
        handlers::hold_statistics(&self.policy, &self.db, &self.audit).await
    }

    #[tool(description = "Test the database connection and report status with a \
        timestamp.")]
    async fn check_connection(&self) -> Result<CallToolResult, McpError> {
        handlers::check_connection(&self.db).await
    }
}

#[tool_handler]
impl rmcp::ServerHandler for HoldsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Invoice-holds query server. Use ask_holds for natural-language \
                 questions (AI-generated SQL is sanitized before execution), \
                 list_holds for the current hold list, hold_statistics for \
                 per-code counts, and check_connection to verify database access. \
                 All queries are read-only and restricted to the holds table."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
