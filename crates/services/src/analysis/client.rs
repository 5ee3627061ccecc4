use std::env;

use async_trait::async_trait;
use latin_core::model::{ChatRole, ChatTurn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::TextGenerator;
use crate::error::GenerationError;

const PLACEHOLDER_KEY: &str = "INSERT_API_KEY";

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GenerationConfig {
    /// Read `LATIN_AI_API_KEY`, `LATIN_AI_BASE_URL` and `LATIN_AI_MODEL`.
    ///
    /// Returns `None` when the key is missing, blank or still the placeholder.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("LATIN_AI_API_KEY").ok()?;
        Self::new(
            api_key,
            env::var("LATIN_AI_BASE_URL").ok(),
            env::var("LATIN_AI_MODEL").ok(),
        )
    }

    #[must_use]
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Option<Self> {
        if api_key.trim().is_empty() || api_key.contains(PLACEHOLDER_KEY) {
            return None;
        }
        Some(Self {
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".into()),
            api_key,
            model: model.unwrap_or_else(|| "gpt-4o-mini".into()),
        })
    }
}

/// OpenAI-compatible `/chat/completions` client.
#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    config: GenerationConfig,
}

impl GenerationClient {
    #[must_use]
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        json: bool,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: 0.2,
            response_format: json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(content)
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    async fn generate_json(&self, prompt: &str) -> Result<String, GenerationError> {
        self.complete(vec![ChatMessage::user(prompt)], true).await
    }

    async fn chat(
        &self,
        system: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, GenerationError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system",
            content: system.to_string(),
        });
        messages.extend(history.iter().map(|turn| ChatMessage {
            role: match turn.role {
                ChatRole::User => "user",
                ChatRole::Model => "assistant",
            },
            content: turn.text.clone(),
        }));
        messages.push(ChatMessage::user(message));
        self.complete(messages, false).await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl ChatMessage {
    fn user(content: &str) -> Self {
        Self {
            role: "user",
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
