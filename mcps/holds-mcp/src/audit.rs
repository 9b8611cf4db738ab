//! Append-only audit log
//!
//! One timestamped line per execution attempt with the final SQL and the
//! resulting row count. A write failure is logged and swallowed: auditing
//! must never block or fail the request it records.

use std::io::Write;
use std::path::PathBuf;

use crate::config::AuditConfig;

pub struct AuditLog {
    path: Option<PathBuf>,
}

impl AuditLog {
    pub fn new(cfg: &AuditConfig) -> Self {
        Self {
            path: cfg.enabled.then(|| cfg.path.clone()),
        }
    }

    /// Record a completed execution.
    pub fn record(&self, sql: &str, row_count: usize) {
        self.append(&format!("{} rows", row_count), sql);
    }

    /// Record a failed execution attempt.
    pub fn record_failure(&self, sql: &str, error: &str) {
        self.append(&format!("error: {}", error), sql);
    }

    fn append(&self, outcome: &str, sql: &str) {
        let Some(path) = &self.path else {
            return;
        };
        let line = format!(
            "[{}] {} -- {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            sql,
            outcome
        );
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut f| f.write_all(line.as_bytes()));
        if let Err(e) = result {
            tracing::warn!("audit log write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_log_writes_nothing() {
        let log = AuditLog::new(&AuditConfig {
            enabled: false,
            path: PathBuf::from("/nonexistent/dir/audit.log"),
        });
        // must not panic or create anything
        log.record("SELECT 1", 0);
    }

    #[test]
    fn record_appends_line() {
        let dir = std::env::temp_dir().join("holds-mcp-audit-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("audit-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let log = AuditLog::new(&AuditConfig {
            enabled: true,
            path: path.clone(),
        });
        log.record("SELECT * FROM AP_HOLDS_ALL", 3);
        log.record_failure("SELECT broken", "syntax error");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("SELECT * FROM AP_HOLDS_ALL -- 3 rows"));
        assert!(content.contains("error: syntax error"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn write_failure_does_not_panic() {
        let log = AuditLog::new(&AuditConfig {
            enabled: true,
            path: PathBuf::from("/nonexistent/dir/audit.log"),
        });
        log.record("SELECT 1", 1);
    }
}
