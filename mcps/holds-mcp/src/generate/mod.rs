//! SQL generator backends
//!
//! Trait-based abstraction over the AI service that turns a natural-language
//! question into a SQL statement. The backend returns raw text exactly as
//! produced; cleanup and validation belong to the sanitizer, never here.

use anyhow::Result;
use async_trait::async_trait;

pub mod http;

/// A backend that generates SQL from a natural-language question.
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    /// Backend name, for logging
    fn name(&self) -> &str;

    /// Produce one raw SQL statement for the question. The output carries no
    /// guarantees - it may be fenced, terminated, or not SQL at all.
    async fn generate_sql(&self, question: &str) -> Result<String>;
}

/// Build the fixed instruction preamble sent ahead of every question.
///
/// Describes the single allowed table and its columns, and asks for one
/// bare SELECT statement - no fences, no semicolon. The sanitizer tolerates
/// violations of all of this.
pub fn build_preamble(table: &str, columns: &[String]) -> String {
    format!(
        "You are a SQL assistant for the accounts-payable invoice holds table.\n\
         - Use only the {table} table.\n\
         - Always include a WHERE clause and end with 'FETCH FIRST 100 ROWS ONLY'.\n\
         Schema: {table}({columns})\n\
         Output exactly one SELECT statement in plain text: no code fences, no semicolon, no commentary.",
        table = table,
        columns = columns.join(",")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_names_table_and_columns() {
        let preamble = build_preamble(
            "AP_HOLDS_ALL",
            &["HOLD_ID".to_string(), "HOLD_REASON".to_string()],
        );
        assert!(preamble.contains("AP_HOLDS_ALL(HOLD_ID,HOLD_REASON)"));
        assert!(preamble.contains("no code fences"));
    }
}
