//! Sanitization policy
//!
//! The static rules the sanitizer enforces. Built once at startup (schema
//! resolution may cost one database round trip) and shared read-only across
//! requests; nothing here is mutated after construction.

use crate::config::PolicyConfig;

/// Immutable rule set consumed by the sanitizer.
#[derive(Debug, Clone)]
pub struct SanitizationPolicy {
    /// The single table FROM/JOIN targets may reference (compared
    /// case-insensitively on the final identifier segment)
    pub allowed_table: String,
    /// Conditions ANDed into every WHERE clause, ahead of whatever the
    /// generator supplied
    pub mandatory_predicates: Vec<String>,
    /// Statement-altering verbs that reject the whole statement
    pub forbidden_keywords: Vec<String>,
    /// Substituted for a missing or malformed ORDER BY; `None` drops the
    /// clause instead
    pub default_order_clause: Option<String>,
    /// Appended when no row-limit clause is present
    pub default_limit_clause: String,
    /// Schema qualifier the generator assumes in its output
    pub source_schema: String,
    /// Schema actually reachable at execution time; `None` disables the
    /// qualifier rewrite
    pub target_schema: Option<String>,
}

impl SanitizationPolicy {
    /// Build the policy from configuration plus the schema resolved against
    /// the live database.
    pub fn from_config(cfg: &PolicyConfig, target_schema: Option<String>) -> Self {
        let mut mandatory_predicates = Vec::new();
        if cfg.force_release_null {
            mandatory_predicates.push("RELEASE_LOOKUP_CODE IS NULL".to_string());
        }
        if !cfg.hold_codes.is_empty() {
            let codes = cfg
                .hold_codes
                .iter()
                .map(|c| format!("'{}'", c.replace('\'', "''")))
                .collect::<Vec<_>>()
                .join(", ");
            mandatory_predicates.push(format!("HOLD_LOOKUP_CODE IN ({})", codes));
        }

        Self {
            allowed_table: cfg.table.to_uppercase(),
            mandatory_predicates,
            forbidden_keywords: cfg.forbidden_keywords.clone(),
            default_order_clause: cfg.default_order_clause.clone(),
            default_limit_clause: cfg.default_limit_clause.clone(),
            source_schema: cfg.source_schema.clone(),
            target_schema: target_schema.map(|s| s.to_uppercase()),
        }
    }
}
