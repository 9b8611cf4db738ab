//! Configuration loading for holds-mcp
//!
//! Configuration is loaded from:
//! 1. `HOLDS_CONFIG_PATH` environment variable
//! 2. `~/.holds/holds.toml`
//! 3. Default values
//!
//! Individual connection fields can be overridden by environment variables
//! (`HOLDS_DB_*`, `GENAI_*`) so credentials stay out of the config file.

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HoldsConfig {
    /// Target database connection
    #[serde(default)]
    pub database: DatabaseConfig,
    /// AI SQL generator backend
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Sanitization policy knobs
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Audit log
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Target database connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_db_name")]
    pub dbname: String,
    /// Connection establishment timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// SQL generator backend configuration (OpenAI-compatible endpoint)
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Base URL, e.g. `http://localhost:11434/v1`
    #[serde(default = "default_generator_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_generator_model")]
    pub model: String,
    /// Bearer token; usually supplied via `GENAI_API_KEY` instead
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_generator_timeout")]
    pub timeout_secs: u64,
}

/// Sanitization policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// The single table FROM/JOIN targets may reference
    #[serde(default = "default_table")]
    pub table: String,
    /// Columns described to the generator in the prompt preamble
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
    /// Hold codes the mandatory IN predicate restricts to (empty disables it)
    #[serde(default = "default_hold_codes")]
    pub hold_codes: Vec<String>,
    /// Require `RELEASE_LOOKUP_CODE IS NULL` on every query
    #[serde(default = "default_true")]
    pub force_release_null: bool,
    /// Schema name the generator assumes; rewritten to the runtime schema
    #[serde(default = "default_source_schema")]
    pub source_schema: String,
    /// Statement-altering verbs that reject the whole statement
    #[serde(default = "default_forbidden_keywords")]
    pub forbidden_keywords: Vec<String>,
    /// Appended when the generated statement has no row-limit clause
    #[serde(default = "default_limit_clause")]
    pub default_limit_clause: String,
    /// Substituted for a malformed or missing ORDER BY (explicitly unset =
    /// drop the clause)
    #[serde(default = "default_order_clause")]
    pub default_order_clause: Option<String>,
}

/// Audit log configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_audit_path")]
    pub path: PathBuf,
}

// Default value functions

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "apps".to_string()
}

fn default_db_name() -> String {
    "ebsdb".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_generator_endpoint() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_generator_model() -> String {
    "llama3.1".to_string()
}

fn default_generator_timeout() -> u64 {
    60
}

fn default_table() -> String {
    "AP_HOLDS_ALL".to_string()
}

fn default_columns() -> Vec<String> {
    [
        "HOLD_ID",
        "INVOICE_ID",
        "LINE_LOCATION_ID",
        "HOLD_LOOKUP_CODE",
        "HOLD_REASON",
        "RELEASE_LOOKUP_CODE",
        "HOLD_DATE",
        "CREATION_DATE",
        "LAST_UPDATE_DATE",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_hold_codes() -> Vec<String> {
    ["QTY ORD", "QTY REC", "PRICE", "AMT ORG"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_source_schema() -> String {
    "HOL_AGENT_05".to_string()
}

fn default_forbidden_keywords() -> Vec<String> {
    [
        "insert", "update", "delete", "merge", "create", "alter", "drop", "grant",
        "revoke", "truncate",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_limit_clause() -> String {
    "FETCH FIRST 100 ROWS ONLY".to_string()
}

fn default_order_clause() -> Option<String> {
    Some("ORDER BY \"HOLD_DATE\" ASC".to_string())
}

fn default_audit_path() -> PathBuf {
    PathBuf::from("holds_sql.log")
}

fn default_true() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: String::new(),
            dbname: default_db_name(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generator_endpoint(),
            model: default_generator_model(),
            api_key: None,
            timeout_secs: default_generator_timeout(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            columns: default_columns(),
            hold_codes: default_hold_codes(),
            force_release_null: default_true(),
            source_schema: default_source_schema(),
            forbidden_keywords: default_forbidden_keywords(),
            default_limit_clause: default_limit_clause(),
            default_order_clause: default_order_clause(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_audit_path(),
        }
    }
}

impl HoldsConfig {
    /// Load configuration from file, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = if let Some(path) = Self::find_config_path() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)?
            } else {
                tracing::info!("Config file not found, using defaults");
                Self::default()
            }
        } else {
            tracing::info!("No config path available, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HOLDS_DB_HOST") {
            self.database.host = host;
        }
        if let Ok(port) = std::env::var("HOLDS_DB_PORT") {
            if let Ok(port) = port.parse() {
                self.database.port = port;
            }
        }
        if let Ok(user) = std::env::var("HOLDS_DB_USER") {
            self.database.user = user;
        }
        if let Ok(password) = std::env::var("HOLDS_DB_PASSWORD") {
            self.database.password = password;
        }
        if let Ok(dbname) = std::env::var("HOLDS_DB_NAME") {
            self.database.dbname = dbname;
        }
        if let Ok(endpoint) = std::env::var("GENAI_ENDPOINT") {
            self.generator.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("GENAI_MODEL") {
            self.generator.model = model;
        }
        if let Ok(key) = std::env::var("GENAI_API_KEY") {
            self.generator.api_key = Some(key);
        }
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("HOLDS_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        dirs::home_dir().map(|home| home.join(".holds").join("holds.toml"))
    }
}
