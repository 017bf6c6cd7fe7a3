use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use spdlog::debug;

use crate::error::{PostError, Result};

/// A chat model: one system message, one user message, one text reply.
pub trait ChatCompletion {
    fn complete(&self, model: &str, system: &str, user: &str) -> Result<String>;
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

pub struct OpenAiClient {
    api_url: String,
    api_key: String,
    client: Client,
}

impl OpenAiClient {
    pub fn new(api_url: &str, api_key: String, client: Client) -> Self {
        OpenAiClient {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }
}

impl ChatCompletion for OpenAiClient {
    fn complete(&self, model: &str, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model,
            messages: [
                Message { role: "system", content: system },
                Message { role: "user", content: user },
            ],
        };

        debug!("Asking {} for a completion", model);
        let response = self.client.post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| PostError::SuggestionFormat(format!("request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(PostError::SuggestionFormat(format!("server answered {}", response.status())));
        }

        let reply: ChatResponse = response.json()
            .map_err(|e| PostError::SuggestionFormat(e.to_string()))?;
        reply.choices.into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PostError::SuggestionFormat("reply has no content".to_string()))
    }
}
