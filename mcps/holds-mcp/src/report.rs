//! Result reporter
//!
//! Turns an execution result into the one-line message shown to the caller.

use serde_json::{Map, Value};

/// Summarize query rows for a chat-style answer.
///
/// A single scalar result (one row, one column) reads as an answer to a
/// counting or lookup question; anything else is reported by row count.
pub fn summarize(rows: &[Map<String, Value>]) -> String {
    if rows.is_empty() {
        return "No matching rows found.".to_string();
    }

    if rows.len() == 1 && rows[0].len() == 1 {
        if let Some((key, value)) = rows[0].iter().next() {
            return format!("{} is {}.", key, render(value));
        }
    }

    format!("{} rows returned.", rows.len())
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
