use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::LlmSettings,
    credentials::ApiKey,
    error::{Error, Result},
    http::fetch_json,
};

use super::ChatModel;

/// OpenAI-compatible chat completions client (Groq by default).
#[derive(Debug, Clone)]
pub struct GroqChat {
    endpoint: String,
    model: String,
    http: Client,
}

impl GroqChat {
    pub fn new(settings: &LlmSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build chat completion HTTP client")?;

        Ok(Self {
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            model: settings.model.clone(),
            http,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

fn first_choice_text(parsed: ChatResponse) -> Result<String> {
    parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::Api("chat completion returned no choices".into()))?
        .message
        .content
        .ok_or_else(|| Error::Api("chat completion choice has no content".into()))
}

#[async_trait]
impl ChatModel for GroqChat {
    async fn complete(&self, key: &ApiKey, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "requesting chat completion");

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage { role: "user", content: prompt }],
        };

        let request = self.http.post(&self.endpoint).bearer_auth(key.expose()).json(&body);
        let parsed: ChatResponse = fetch_json(request, "llm").await?;

        first_choice_text(parsed)
    }
}
