//! Type definitions for the holds MCP server

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Policy violations found while sanitizing a generated statement.
///
/// All variants are terminal: a statement that fails any check never
/// reaches the database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("generated statement is empty")]
    Empty,

    #[error("forbidden keyword in statement: {keyword}")]
    Forbidden { keyword: String },

    #[error("table not allowed: {identifier}")]
    TableNotAllowed { identifier: String },
}

/// Database faults, split by where they occur.
///
/// Neither variant is retried; execution faults are returned to the caller
/// as data (see [`QueryOutcome::failure`]) rather than as a tool error.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("query execution failed: {0}")]
    Execution(String),
}

// ============================================================================
// Response Types
// ============================================================================

/// Result of one sanitize-and-execute round trip.
///
/// Execution faults are carried in `error` next to the sanitized SQL so the
/// calling conversation can explain what was attempted.
#[derive(Debug, Serialize)]
pub struct QueryOutcome {
    pub status: String,
    pub message: String,
    pub sql: String,
    pub row_count: usize,
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryOutcome {
    pub fn success(
        sql: String,
        rows: Vec<serde_json::Map<String, serde_json::Value>>,
        message: String,
    ) -> Self {
        Self {
            status: "success".into(),
            message,
            sql,
            row_count: rows.len(),
            rows,
            error: None,
        }
    }

    pub fn failure(sql: String, error: &DbError) -> Self {
        Self {
            status: "error".into(),
            message: format!("query failed: {}", error),
            sql,
            row_count: 0,
            rows: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Per-hold-code counts plus the overall total.
#[derive(Debug, Serialize)]
pub struct HoldStatistics {
    pub total_holds: i64,
    pub hold_type_counts: std::collections::BTreeMap<String, i64>,
}

/// Payload for the connection-test tool.
#[derive(Debug, Serialize)]
pub struct ConnectionTest {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}
