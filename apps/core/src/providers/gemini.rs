use crate::actors::messages::{AppError, CompletionRequest, Role};
use crate::actors::traits::ChatBackend;
use crate::config::GeminiSettings;
use crate::providers::{check_status, join_url};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

const STREAM_CHUNK_TIMEOUT: Duration = Duration::from_secs(30);
const NO_CANDIDATES_REPLY: &str = "I'm sorry, I couldn't generate a response. Please try again.";
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Client for Google's Gemini `generateContent` API.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SafetyRating {
    category: String,
    #[serde(default)]
    blocked: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: Option<String>,
}

impl Candidate {
    fn texts(&self) -> impl Iterator<Item = &str> {
        self.content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
    }

    fn blocked_categories(&self) -> Vec<&str> {
        self.safety_ratings
            .iter()
            .filter(|r| r.blocked)
            .map(|r| r.category.as_str())
            .collect()
    }
}

/// Reply text for a non-streaming response.
fn reply_text(response: &GenerateResponse) -> String {
    let Some(candidate) = response.candidates.first() else {
        return NO_CANDIDATES_REPLY.to_string();
    };

    let blocked = candidate.blocked_categories();
    if !blocked.is_empty() {
        return format!(
            "I'm sorry, but I can't provide a response to that query due to content safety restrictions ({}).",
            blocked.join(", ")
        );
    }

    candidate.texts().collect::<Vec<_>>().join("\n")
}

fn api_error(err: &ErrorBody) -> AppError {
    AppError::Api {
        status: err.code.unwrap_or(500),
        body: err
            .message
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string()),
    }
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.base_url.clone(),
            api_key: api_key.filter(|k| !k.is_empty()),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    fn api_key(&self) -> Result<&str, AppError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("No Gemini API key configured".to_string()))
    }

    fn build_payload(&self, request: &CompletionRequest) -> serde_json::Value {
        let turn = |role: &str, text: &str| json!({"role": role, "parts": [{"text": text}]});

        let mut contents = Vec::new();
        if !request.system_prompt.is_empty() {
            contents.push(turn("user", &request.system_prompt));
        }
        if let Some(scene) = &request.scene {
            let scene_json = serde_json::to_string(scene).unwrap_or_default();
            contents.push(turn("user", &format!("Current Blender context: {}", scene_json)));
        }
        for message in &request.history {
            let role = match message.role {
                Role::Assistant => "model",
                Role::User | Role::System => "user",
            };
            contents.push(turn(role, &message.content));
        }
        contents.push(turn("user", &request.message));

        let safety: Vec<serde_json::Value> = SAFETY_CATEGORIES
            .iter()
            .map(|c| json!({"category": c, "threshold": "BLOCK_MEDIUM_AND_ABOVE"}))
            .collect();

        json!({
            "contents": contents,
            "generationConfig": {
                "temperature": self.temperature,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": self.max_tokens,
                "stopSequences": ["###"]
            },
            "safetySettings": safety
        })
    }

    async fn post(&self, method: &str, request: &CompletionRequest) -> Result<reqwest::Response, AppError> {
        let key = self.api_key()?;
        let url = join_url(&self.base_url, &format!("models/{}:{}", self.model, method))?;

        let res = self
            .client
            .post(url)
            .header("x-goog-api-key", key)
            .timeout(self.timeout)
            .json(&self.build_payload(request))
            .send()
            .await?;
        check_status(res).await
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError> {
        info!(model = %self.model, "Gemini request ({} prior turns)", request.history.len());
        let res = self.post("generateContent", &request).await?;
        let response: GenerateResponse = res.json().await?;
        if let Some(err) = &response.error {
            return Err(api_error(err));
        }
        Ok(reply_text(&response))
    }

    async fn stream_complete(
        &self,
        request: CompletionRequest,
        chunk_sender: mpsc::Sender<Result<String, AppError>>,
    ) -> Result<(), AppError> {
        info!(model = %self.model, "Gemini streaming request");
        let res = self.post("streamGenerateContent?alt=sse", &request).await?;

        let mut stream = res.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = timeout(STREAM_CHUNK_TIMEOUT, stream.next()).await? {
            buffer.extend_from_slice(&chunk?);

            // Lines are decoded whole, a character split across chunks waits for its tail
            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                if !forward_event(&line, &chunk_sender).await? {
                    return Ok(());
                }
            }
        }

        // Final event without a trailing newline
        if !buffer.is_empty() {
            forward_event(&buffer, &chunk_sender).await?;
        }

        Ok(())
    }
}

/// Sends the text parts of one SSE line. Returns `false` once the receiver is gone.
async fn forward_event(
    line: &[u8],
    chunk_sender: &mpsc::Sender<Result<String, AppError>>,
) -> Result<bool, AppError> {
    let line = match std::str::from_utf8(line) {
        Ok(line) => line,
        Err(e) => {
            warn!("Skipping streaming line with invalid UTF-8: {}", e);
            return Ok(true);
        }
    };
    let Some(data) = line.trim_end().strip_prefix("data: ") else {
        return Ok(true);
    };
    let event: GenerateResponse = match serde_json::from_str(data) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to parse streaming event: {}", e);
            return Ok(true);
        }
    };
    if let Some(err) = &event.error {
        return Err(api_error(err));
    }
    if let Some(candidate) = event.candidates.first() {
        for text in candidate.texts() {
            if chunk_sender.send(Ok(text.to_string())).await.is_err() {
                debug!("Stream receiver dropped, stopping");
                return Ok(false);
            }
        }
    }
    Ok(true)
}
