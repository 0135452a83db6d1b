use crate::actors::messages::{AppError, CompletionRequest, Role};
use crate::actors::traits::ChatBackend;
use crate::config::AthenaMistSettings;
use crate::providers::{check_status, join_url, USER_AGENT};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Client for the OpenAI-compatible AthenaMist chat API.
pub struct AthenaMistClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl AthenaMistClient {
    pub fn new(settings: &AthenaMistSettings, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: settings.endpoint.clone(),
            api_key: api_key.filter(|k| !k.is_empty()),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    fn headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(reqwest::header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| AppError::Config(format!("Invalid AthenaMist API key: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn build_payload(&self, request: &CompletionRequest) -> serde_json::Value {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        if !request.system_prompt.is_empty() {
            messages.push(json!({"role": "system", "content": request.system_prompt}));
        }
        for turn in &request.history {
            let role = match turn.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            messages.push(json!({"role": role, "content": turn.content}));
        }
        messages.push(json!({"role": "user", "content": request.message}));

        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false
        })
    }
}

#[async_trait]
impl ChatBackend for AthenaMistClient {
    fn name(&self) -> &'static str {
        "athena_mist"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError> {
        let url = join_url(&self.endpoint, "chat/completions")?;
        info!("AthenaMist request ({} prior turns)", request.history.len());

        let res = self
            .client
            .post(url)
            .headers(self.headers()?)
            .timeout(self.timeout)
            .json(&self.build_payload(&request))
            .send()
            .await?;
        let res = check_status(res).await?;

        let completion: ChatCompletion = res.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        debug!(chars = content.len(), "AthenaMist reply received");
        Ok(content)
    }
}
