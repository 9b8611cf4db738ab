//! Database handle
//!
//! Owns the Postgres client and the spawned connection task. Construction is
//! the explicit one-time initialization step: callers hold the handle and
//! pass it around, there is no process-global connection state. The executor
//! accepts only [`SanitizedStatement`]s, so nothing reaches the wire without
//! going through the sanitizer first.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tokio_postgres::types::Type;
use tokio_postgres::{NoTls, Row};

use crate::config::DatabaseConfig;
use crate::sanitize::SanitizedStatement;
use crate::types::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Database {
    client: tokio_postgres::Client,
}

impl Database {
    /// Open the connection and spawn its driver task.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, DbError> {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&cfg.host)
            .port(cfg.port)
            .user(&cfg.user)
            .dbname(&cfg.dbname)
            .connect_timeout(std::time::Duration::from_secs(cfg.connect_timeout_secs));
        if !cfg.password.is_empty() {
            pg.password(&cfg.password);
        }

        let (client, connection) = pg
            .connect(NoTls)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("database connection task ended: {}", e);
            }
        });

        tracing::info!(host = %cfg.host, dbname = %cfg.dbname, "database connected");
        Ok(Self { client })
    }

    /// Schema the session actually resolves unqualified names against.
    /// Used once, at policy construction.
    pub async fn current_schema(&self) -> Result<String, DbError> {
        let row = self
            .client
            .query_one("SELECT current_schema()", &[])
            .await
            .map_err(|e| DbError::Execution(e.to_string()))?;
        Ok(row.get::<_, String>(0))
    }

    /// Cheap liveness probe for the connection-test tool.
    pub async fn ping(&self) -> Result<(), DbError> {
        self.client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;
        Ok(())
    }

    /// Execute a sanitized statement and return rows as column-keyed JSON
    /// maps. One blocking call per request; errors are never retried here.
    pub async fn execute(
        &self,
        stmt: &SanitizedStatement,
    ) -> Result<Vec<Map<String, Value>>, DbError> {
        let rows = self
            .client
            .query(stmt.as_str(), &[])
            .await
            .map_err(|e| DbError::Execution(e.to_string()))?;

        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn row_to_json(row: &Row) -> Map<String, Value> {
    let mut map = Map::with_capacity(row.len());
    for (idx, col) in row.columns().iter().enumerate() {
        map.insert(col.name().to_string(), cell_to_json(row, idx));
    }
    map
}

fn cell_to_json(row: &Row, idx: usize) -> Value {
    let t = row.columns()[idx].type_();
    if *t == Type::BOOL {
        opt(row.try_get::<_, Option<bool>>(idx))
    } else if *t == Type::INT2 {
        opt(row.try_get::<_, Option<i16>>(idx))
    } else if *t == Type::INT4 {
        opt(row.try_get::<_, Option<i32>>(idx))
    } else if *t == Type::INT8 {
        opt(row.try_get::<_, Option<i64>>(idx))
    } else if *t == Type::FLOAT4 {
        opt(row.try_get::<_, Option<f32>>(idx))
    } else if *t == Type::FLOAT8 {
        opt(row.try_get::<_, Option<f64>>(idx))
    } else if *t == Type::NUMERIC {
        match row.try_get::<_, Option<Decimal>>(idx) {
            Ok(Some(d)) => d
                .to_f64()
                .map(|f| serde_json::json!(f))
                .unwrap_or_else(|| Value::String(d.to_string())),
            _ => Value::Null,
        }
    } else if *t == Type::TEXT || *t == Type::VARCHAR || *t == Type::BPCHAR || *t == Type::NAME {
        opt(row.try_get::<_, Option<String>>(idx))
    } else if *t == Type::TIMESTAMP {
        match row.try_get::<_, Option<chrono::NaiveDateTime>>(idx) {
            Ok(Some(ts)) => Value::String(ts.format(DATE_FORMAT).to_string()),
            _ => Value::Null,
        }
    } else if *t == Type::TIMESTAMPTZ {
        match row.try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx) {
            Ok(Some(ts)) => Value::String(ts.format(DATE_FORMAT).to_string()),
            _ => Value::Null,
        }
    } else if *t == Type::DATE {
        match row.try_get::<_, Option<chrono::NaiveDate>>(idx) {
            Ok(Some(d)) => Value::String(d.format("%Y-%m-%d").to_string()),
            _ => Value::Null,
        }
    } else if *t == Type::JSON || *t == Type::JSONB {
        opt(row.try_get::<_, Option<Value>>(idx))
    } else {
        Value::String(format!("<unsupported type {}>", t))
    }
}

fn opt<T: Into<Value>>(value: Result<Option<T>, tokio_postgres::Error>) -> Value {
    match value {
        Ok(Some(v)) => v.into(),
        Ok(None) => Value::Null,
        Err(e) => {
            tracing::warn!("failed to read column value: {}", e);
            Value::Null
        }
    }
}
