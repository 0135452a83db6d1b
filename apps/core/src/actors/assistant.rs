use crate::actors::conversation::{ConversationHistory, ConversationSummary, DEFAULT_CAPACITY};
use crate::actors::messages::{
    ActorError, AppError, AssistantMessage, AssistantResponse, ChatMessage, CompletionRequest,
    Preferences, SceneContext,
};
use crate::actors::mode::AssistantMode;
use crate::actors::traits::ChatBackend;
use crate::brain::analyzer::IntentParser;
use crate::brain::intent::ParsedIntent;
use crate::brain::response::{
    analyze_context, extract_actions, extract_suggestions, ComplexityLevel, FocusArea, Mood,
    ResponseContext,
};
use crate::config::AssistantSettings;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, instrument, warn};

const BACKEND_CONFIDENCE: f32 = 0.9;
const FALLBACK_CONFIDENCE: f32 = 0.6;

/// What to answer when the backend call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Answer with canned guidance based on the message and scene.
    #[default]
    LocalGuidance,
    /// Answer with the error text and zero confidence.
    ReportError,
}

#[derive(Debug, Clone)]
pub struct AssistantOptions {
    pub mode: AssistantMode,
    pub fallback: FallbackPolicy,
    /// Prior turns sent with each request
    pub history_limit: usize,
    pub request_timeout: Duration,
}

impl Default for AssistantOptions {
    fn default() -> Self {
        Self::from_settings(&AssistantSettings::default(), FallbackPolicy::default())
    }
}

impl AssistantOptions {
    pub fn from_settings(settings: &AssistantSettings, fallback: FallbackPolicy) -> Self {
        Self {
            mode: AssistantMode::default(),
            fallback,
            history_limit: settings.history_limit,
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
        }
    }
}

/// A handle to the assistant actor.
///
/// This is the entry point for chat: it owns no state itself and can be
/// cloned freely. All conversation state lives in the spawned runner.
///
/// Deadlines belong to the runner. Each backend call is bounded by
/// `request_timeout` from the moment the runner picks the chat up, so a
/// reply, possibly a fallback, always arrives however long the queue is.
#[derive(Clone)]
pub struct AssistantHandle {
    sender: mpsc::Sender<AssistantMessage>,
}

/// A chat reply that has not arrived yet.
///
/// Dropping it, or calling [`PendingReply::cancel`], abandons the request;
/// the actor stops waiting on the backend as soon as it notices.
pub struct PendingReply {
    receiver: oneshot::Receiver<Result<AssistantResponse, AppError>>,
}

impl PendingReply {
    pub async fn wait(self) -> Result<AssistantResponse, AppError> {
        self.receiver
            .await
            .map_err(|e| AppError::Actor(ActorError::ChannelClosed(e.to_string())))?
    }

    pub fn cancel(self) {
        debug!("Chat request cancelled by caller");
    }
}

impl AssistantHandle {
    /// Spawns the assistant actor over `backend` and returns a handle to it.
    pub fn new<B: ChatBackend>(backend: Arc<B>, options: AssistantOptions) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = AssistantRunner::new(receiver, backend, options);
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }

    async fn send(&self, msg: AssistantMessage) -> Result<(), AppError> {
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(ActorError::ChannelClosed(e.to_string())))
    }

    /// Queues a chat message and returns without waiting for the reply.
    #[instrument(skip(self, scene))]
    pub async fn submit(
        &self,
        message: String,
        scene: Option<SceneContext>,
        mode: Option<AssistantMode>,
    ) -> Result<PendingReply, AppError> {
        let (send, recv) = oneshot::channel();
        self.send(AssistantMessage::Chat {
            message,
            scene,
            mode,
            responder: send,
        })
        .await?;
        Ok(PendingReply { receiver: recv })
    }

    /// Sends a chat message and waits for the reply.
    pub async fn chat(
        &self,
        message: String,
        scene: Option<SceneContext>,
        mode: Option<AssistantMode>,
    ) -> Result<AssistantResponse, AppError> {
        self.submit(message, scene, mode).await?.wait().await
    }

    pub async fn set_mode(&self, mode: AssistantMode) -> Result<(), AppError> {
        self.send(AssistantMessage::SetMode { mode }).await
    }

    pub async fn update_preferences(&self, preferences: Preferences) -> Result<(), AppError> {
        self.send(AssistantMessage::UpdatePreferences { preferences })
            .await
    }

    pub async fn summary(&self) -> Result<ConversationSummary, AppError> {
        let (send, recv) = oneshot::channel();
        self.send(AssistantMessage::Summary { responder: send })
            .await?;
        recv.await
            .map_err(|e| AppError::Actor(ActorError::ChannelClosed(e.to_string())))
    }

    pub async fn clear_history(&self) -> Result<(), AppError> {
        self.send(AssistantMessage::ClearHistory).await
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.send(AssistantMessage::Shutdown).await
    }
}

// --- Actor Runner ---
struct AssistantRunner<B: ChatBackend> {
    receiver: mpsc::Receiver<AssistantMessage>,
    backend: Arc<B>,
    parser: IntentParser,
    history: ConversationHistory,
    preferences: Preferences,
    options: AssistantOptions,
}

impl<B: ChatBackend> AssistantRunner<B> {
    fn new(receiver: mpsc::Receiver<AssistantMessage>, backend: Arc<B>, options: AssistantOptions) -> Self {
        Self {
            receiver,
            backend,
            parser: IntentParser::new(),
            history: ConversationHistory::new(DEFAULT_CAPACITY.max(options.history_limit)),
            preferences: Preferences::new(),
            options,
        }
    }

    async fn run(mut self) {
        info!(backend = self.backend.name(), "Assistant started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, AssistantMessage::Shutdown) {
                break;
            }
            self.handle_message(msg).await;
        }
        info!(backend = self.backend.name(), "Assistant stopped");
    }

    async fn handle_message(&mut self, msg: AssistantMessage) {
        match msg {
            AssistantMessage::Chat {
                message,
                scene,
                mode,
                mut responder,
            } => {
                let mode = mode.unwrap_or(self.options.mode);
                let reply = tokio::select! {
                    reply = self.handle_chat(message, scene, mode) => reply,
                    _ = responder.closed() => {
                        info!("Chat request abandoned before completion");
                        return;
                    }
                };
                let _ = responder.send(Ok(reply));
            }
            AssistantMessage::SetMode { mode } => {
                info!(%mode, "Assistant mode changed");
                self.options.mode = mode;
            }
            AssistantMessage::UpdatePreferences { preferences } => {
                self.preferences.extend(preferences);
            }
            AssistantMessage::Summary { responder } => {
                let _ = responder.send(self.history.summary(self.options.mode, &self.preferences));
            }
            AssistantMessage::ClearHistory => {
                debug!("Conversation history cleared");
                self.history.clear();
            }
            AssistantMessage::Shutdown => {}
        }
    }

    #[instrument(skip(self, scene), fields(backend = self.backend.name()))]
    async fn handle_chat(
        &mut self,
        message: String,
        scene: Option<SceneContext>,
        mode: AssistantMode,
    ) -> AssistantResponse {
        let intent = self.parser.parse(&message);
        let scene_text = scene.as_ref().map(SceneContext::describe);
        let request = CompletionRequest {
            system_prompt: mode.system_prompt(scene_text.as_deref(), Some(intent.category)),
            scene: scene.clone(),
            history: self.history.recent(self.options.history_limit),
            message: message.clone(),
        };

        let result = match timeout(self.options.request_timeout, self.backend.complete(request)).await {
            Ok(result) => result,
            Err(elapsed) => Err(AppError::from(elapsed)),
        };

        match result {
            Ok(content) => {
                self.history.push(ChatMessage::user(message));
                self.history.push(ChatMessage::assistant(content.clone()));
                AssistantResponse {
                    suggestions: extract_suggestions(&content),
                    actions: extract_actions(&content),
                    context: analyze_context(&content),
                    content,
                    confidence: BACKEND_CONFIDENCE,
                    mode,
                    intent,
                }
            }
            Err(e) => {
                match self.options.fallback {
                    FallbackPolicy::LocalGuidance => warn!("Backend failed, answering locally: {}", e),
                    FallbackPolicy::ReportError => error!("Backend failed: {}", e),
                }
                fallback_response(self.options.fallback, &e, &message, scene.as_ref(), mode, intent)
            }
        }
    }
}

fn fallback_response(
    policy: FallbackPolicy,
    err: &AppError,
    message: &str,
    scene: Option<&SceneContext>,
    mode: AssistantMode,
    intent: ParsedIntent,
) -> AssistantResponse {
    match policy {
        FallbackPolicy::LocalGuidance => AssistantResponse {
            content: local_guidance(message).to_string(),
            confidence: FALLBACK_CONFIDENCE,
            suggestions: scene_suggestions(scene),
            actions: Vec::new(),
            context: ResponseContext::fallback(),
            mode,
            intent,
        },
        FallbackPolicy::ReportError => AssistantResponse {
            content: err.to_string(),
            confidence: 0.0,
            suggestions: Vec::new(),
            actions: Vec::new(),
            context: ResponseContext {
                mood: Mood::Neutral,
                complexity: ComplexityLevel::Beginner,
                focus_area: FocusArea::General,
            },
            mode,
            intent,
        },
    }
}

fn local_guidance(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    if lower.contains("create") {
        "I'd be happy to help you create something in Blender! What type of object are you \
         thinking of? I can guide you through the process step by step."
    } else if lower.contains("material") {
        "Materials are essential for bringing your 3D objects to life! Would you like to create \
         a realistic material, or are you looking for something more stylized?"
    } else if lower.contains("animate") {
        "Animation brings movement and life to your creations! I can help you set up keyframes, \
         create smooth motion, or add special effects."
    } else {
        "I'm here to help with your 3D creation journey! Whether you need help with modeling, \
         materials, animation, or rendering, I'm ready to assist."
    }
}

fn scene_suggestions(scene: Option<&SceneContext>) -> Vec<String> {
    let (objects, materials) = scene
        .map(|s| (s.objects.len(), s.materials.len()))
        .unwrap_or((0, 0));

    let mut suggestions = Vec::new();
    if objects == 0 {
        suggestions.push("Try creating a basic cube to get started with 3D modeling");
        suggestions.push("Consider adding some lighting to your scene");
    }
    if materials < 2 {
        suggestions.push("Create a new material to add visual interest to your objects");
        suggestions.push("Experiment with different material types like Principled BSDF");
    }
    suggestions.push("Use the subdivision surface modifier for smoother geometry");
    suggestions.push("Try different viewport shading modes to see your work in different ways");

    suggestions.into_iter().take(3).map(String::from).collect()
}
