//! OpenAI-compatible chat-completions generator
//!
//! Posts the preamble plus the user question to a `/chat/completions`
//! endpoint and returns the first choice's content verbatim.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::SqlGenerator;
use crate::config::GeneratorConfig;

/// Chat-completions backend for SQL generation.
pub struct HttpSqlGenerator {
    client: Client,
    config: GeneratorConfig,
    preamble: String,
}

impl HttpSqlGenerator {
    pub fn new(config: GeneratorConfig, preamble: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent("holds-mcp/0.1")
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            preamble,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl SqlGenerator for HttpSqlGenerator {
    fn name(&self) -> &str {
        "chat-completions"
    }

    async fn generate_sql(&self, question: &str) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.preamble,
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
            temperature: 0.0,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("generator error {}: {}", status, text));
        }

        let parsed: ChatResponse = response.json().await?;
        let raw = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("generator returned no choices"))?;

        tracing::debug!(sql = %raw, "raw generated SQL");
        Ok(raw)
    }
}
