//! Tool handlers
//!
//! Every handler funnels through [`run_statement`]: sanitize, execute,
//! audit, report. Policy violations become protocol errors before any
//! database contact; execution faults come back as a structured payload so
//! the calling conversation can explain what happened instead of crashing.

use std::collections::BTreeMap;

use mcp_common::{internal_error, json_success, CallToolResult, McpError};

use crate::audit::AuditLog;
use crate::db::Database;
use crate::generate::SqlGenerator;
use crate::params::{AskHoldsParams, ListHoldsParams};
use crate::policy::SanitizationPolicy;
use crate::report;
use crate::sanitize;
use crate::types::{ConnectionTest, HoldStatistics, QueryOutcome, SanitizeError};

fn sanitize_error_to_mcp(err: SanitizeError) -> McpError {
    // All sanitizer rejections are the peer's statement being out of policy
    McpError::invalid_request(err.to_string(), None)
}

/// Sanitize and execute one raw statement.
///
/// Validation failures abort before the database is touched. Execution
/// failures are converted to an error outcome, not propagated.
async fn run_statement(
    policy: &SanitizationPolicy,
    db: &Database,
    audit: &AuditLog,
    raw: &str,
) -> Result<QueryOutcome, McpError> {
    let stmt = sanitize::sanitize(raw, policy).map_err(sanitize_error_to_mcp)?;
    tracing::info!(sql = %stmt, "executing sanitized statement");

    match db.execute(&stmt).await {
        Ok(rows) => {
            audit.record(stmt.as_str(), rows.len());
            let message = report::summarize(&rows);
            Ok(QueryOutcome::success(stmt.into_string(), rows, message))
        }
        Err(e) => {
            tracing::error!("execution failed: {}", e);
            audit.record_failure(stmt.as_str(), &e.to_string());
            Ok(QueryOutcome::failure(stmt.into_string(), &e))
        }
    }
}

/// Answer a natural-language question: generate SQL, then run it through
/// the guardrail and the database.
pub async fn ask_holds(
    generator: &dyn SqlGenerator,
    policy: &SanitizationPolicy,
    db: &Database,
    audit: &AuditLog,
    params: AskHoldsParams,
) -> Result<CallToolResult, McpError> {
    let raw = generator
        .generate_sql(&params.question)
        .await
        .map_err(|e| internal_error(format!("SQL generation failed: {}", e)))?;
    tracing::info!(backend = generator.name(), raw = %raw, "generated SQL");

    let outcome = run_statement(policy, db, audit, &raw).await?;
    json_success(&outcome)
}

/// List open holds with a canned query, through the same guardrail path.
pub async fn list_holds(
    policy: &SanitizationPolicy,
    db: &Database,
    audit: &AuditLog,
    params: ListHoldsParams,
) -> Result<CallToolResult, McpError> {
    let limit = params.limit.unwrap_or(20).min(100);
    let raw = format!(
        "SELECT INVOICE_ID, LINE_LOCATION_ID, HOLD_ID, HOLD_LOOKUP_CODE, HOLD_REASON \
         FROM {} WHERE 1 = 1 ORDER BY HOLD_ID DESC FETCH FIRST {} ROWS ONLY",
        policy.allowed_table, limit
    );

    let outcome = run_statement(policy, db, audit, &raw).await?;
    json_success(&outcome)
}

/// Count open holds per hold code.
pub async fn hold_statistics(
    policy: &SanitizationPolicy,
    db: &Database,
    audit: &AuditLog,
) -> Result<CallToolResult, McpError> {
    let raw = format!(
        "SELECT HOLD_LOOKUP_CODE, COUNT(*) AS HOLD_COUNT \
         FROM {} WHERE 1 = 1 GROUP BY HOLD_LOOKUP_CODE ORDER BY COUNT(*) DESC",
        policy.allowed_table
    );

    let outcome = run_statement(policy, db, audit, &raw).await?;
    if outcome.error.is_some() {
        return json_success(&outcome);
    }

    let mut hold_type_counts = BTreeMap::new();
    let mut total_holds = 0i64;
    for row in &outcome.rows {
        let code = row
            .get("hold_lookup_code")
            .and_then(|v| v.as_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let count = row.get("hold_count").and_then(|v| v.as_i64()).unwrap_or(0);
        total_holds += count;
        hold_type_counts.insert(code, count);
    }

    json_success(&HoldStatistics {
        total_holds,
        hold_type_counts,
    })
}

/// Probe the database connection.
pub async fn check_connection(db: &Database) -> Result<CallToolResult, McpError> {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let result = match db.ping().await {
        Ok(()) => ConnectionTest {
            status: "success".into(),
            message: "database connection ok".into(),
            timestamp,
        },
        Err(e) => ConnectionTest {
            status: "error".into(),
            message: format!("database connection failed: {}", e),
            timestamp,
        },
    };
    json_success(&result)
}
