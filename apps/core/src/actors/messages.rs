use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::oneshot;

use crate::actors::mode::AssistantMode;
use crate::brain::intent::ParsedIntent;
use crate::brain::response::{ResponseContext, SuggestedAction};

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// The actor's mailbox or reply channel is gone.
    #[error("Actor channel closed: {0}")]
    ChannelClosed(String),
    /// An error reported by a chat backend.
    #[error("Backend request failed: {0}")]
    Backend(String),
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(err.to_string())
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Summary of the host scene supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneContext {
    pub objects: Vec<String>,
    pub materials: Vec<String>,
    pub render_engine: Option<String>,
    pub user_mode: Option<String>,
    pub active_object: Option<String>,
    pub selected_objects: Vec<String>,
    pub frame_current: Option<i32>,
}

impl SceneContext {
    /// Multi-line summary embedded in system prompts.
    pub fn describe(&self) -> String {
        format!(
            "- Objects in scene: {}\n- Materials: {}\n- Render engine: {}\n- User mode: {}",
            self.objects.len(),
            self.materials.len(),
            self.render_engine.as_deref().unwrap_or("Unknown"),
            self.user_mode.as_deref().unwrap_or("Object Mode"),
        )
    }
}

/// Everything a backend needs to produce one reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub scene: Option<SceneContext>,
    /// Prior turns, oldest first
    pub history: Vec<ChatMessage>,
    pub message: String,
}

impl CompletionRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            system_prompt: String::new(),
            scene: None,
            history: Vec::new(),
            message: message.into(),
        }
    }
}

/// Reply produced by the assistant actor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantResponse {
    pub content: String,
    pub confidence: f32,
    pub suggestions: Vec<String>,
    pub actions: Vec<SuggestedAction>,
    pub context: ResponseContext,
    pub mode: AssistantMode,
    /// How the request itself was understood
    pub intent: ParsedIntent,
}

pub type Preferences = BTreeMap<String, serde_json::Value>;

/// Messages that can be sent to the assistant actor.
#[derive(Debug)]
pub enum AssistantMessage {
    /// A user chat message to answer.
    Chat {
        message: String,
        scene: Option<SceneContext>,
        /// Overrides the current mode for this message only.
        mode: Option<AssistantMode>,
        /// A channel to send the reply back. Dropping the receiver cancels.
        responder: oneshot::Sender<Result<AssistantResponse, AppError>>,
    },
    /// Switch the default interaction mode.
    SetMode { mode: AssistantMode },
    /// Merge user preferences into the stored ones.
    UpdatePreferences { preferences: Preferences },
    /// A request for a summary of the conversation so far.
    Summary {
        responder: oneshot::Sender<crate::actors::conversation::ConversationSummary>,
    },
    /// Forget all prior turns.
    ClearHistory,
    /// A command to stop the actor.
    Shutdown,
}
