use crate::actors::assistant::{AssistantHandle, AssistantOptions, FallbackPolicy};
use crate::actors::messages::{AppError, CompletionRequest, Role, SceneContext};
use crate::actors::mode::AssistantMode;
use crate::actors::traits::ChatBackend;
use crate::brain::intent::IntentCategory;
use crate::brain::response::{ActionKind, Mood};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};

// --- Mock Components ---

/// Replies with a fixed text and records every request it sees.
struct EchoBackend {
    reply: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl EchoBackend {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for EchoBackend {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.reply.clone())
    }
}

struct FailingBackend;

#[async_trait]
impl ChatBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, AppError> {
        Err(AppError::Api {
            status: 503,
            body: "Service Unavailable".to_string(),
        })
    }
}

/// Never answers in time; notes whether its future was dropped early.
struct SlowBackend {
    started: AtomicUsize,
    finished: AtomicBool,
}

#[async_trait]
impl ChatBackend for SlowBackend {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, AppError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        sleep(Duration::from_secs(5)).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok("too late".to_string())
    }
}

/// Answers "ok" after a fixed delay.
struct DelayBackend {
    delay: Duration,
}

#[async_trait]
impl ChatBackend for DelayBackend {
    fn name(&self) -> &'static str {
        "delay"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, AppError> {
        sleep(self.delay).await;
        Ok("ok".to_string())
    }
}

fn options(fallback: FallbackPolicy) -> AssistantOptions {
    AssistantOptions {
        fallback,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_chat_success_analyzes_reply() {
    let backend = EchoBackend::new(
        "Great idea! I suggest adding a bevel.\nThen create trees around it.\n```python\nimport bpy\n```",
    );
    let assistant = AssistantHandle::new(backend.clone(), options(FallbackPolicy::LocalGuidance));

    let response = assistant
        .chat("Create a cube".to_string(), None, None)
        .await
        .unwrap();

    assert_eq!(response.confidence, 0.9);
    assert_eq!(response.mode, AssistantMode::CreativeAssistant);
    assert_eq!(response.intent.category, IntentCategory::CreateObject);
    assert_eq!(response.suggestions, vec!["Great idea! I suggest adding a bevel.".to_string()]);
    assert!(response.actions.iter().any(|a| a.action == "trees"));
    assert!(response
        .actions
        .iter()
        .any(|a| a.kind == ActionKind::CodeExecution));
    assert_eq!(response.context.mood, Mood::Positive);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].system_prompt.contains("Detected request type: create_object"));
    assert!(requests[0].history.is_empty());
}

#[tokio::test]
async fn test_history_is_sent_and_bounded() {
    let backend = EchoBackend::new("ok");
    let assistant = AssistantHandle::new(
        backend.clone(),
        AssistantOptions {
            history_limit: 3,
            ..options(FallbackPolicy::LocalGuidance)
        },
    );

    for i in 0..3 {
        assistant
            .chat(format!("message {}", i), None, None)
            .await
            .unwrap();
    }

    let requests = backend.requests();
    assert_eq!(requests[1].history.len(), 2);
    assert_eq!(requests[1].history[0].role, Role::User);
    assert_eq!(requests[1].history[0].content, "message 0");
    assert_eq!(requests[1].history[1].role, Role::Assistant);

    // Four turns recorded, only the last three are sent
    let last = &requests[2].history;
    assert_eq!(last.len(), 3);
    assert_eq!(last[0].role, Role::Assistant);
    assert_eq!(last[2].content, "ok");

    let summary = assistant.summary().await.unwrap();
    assert_eq!(summary.total_messages, 6);
}

#[tokio::test]
async fn test_local_guidance_fallback() {
    let assistant = AssistantHandle::new(Arc::new(FailingBackend), options(FallbackPolicy::LocalGuidance));
    let scene = SceneContext {
        objects: vec!["Cube".into()],
        materials: vec![],
        ..Default::default()
    };

    let response = assistant
        .chat("give my material more shine".to_string(), Some(scene), None)
        .await
        .unwrap();

    assert_eq!(response.confidence, 0.6);
    assert!(response.content.starts_with("Materials are essential"));
    assert_eq!(response.suggestions.len(), 3);
    assert!(response.suggestions[0].contains("new material"));
    assert!(response.actions.is_empty());
    assert_eq!(response.context.mood, Mood::Helpful);

    // Failed exchanges are not recorded
    let summary = assistant.summary().await.unwrap();
    assert_eq!(summary.total_messages, 0);
}

#[tokio::test]
async fn test_report_error_fallback() {
    let assistant = AssistantHandle::new(Arc::new(FailingBackend), options(FallbackPolicy::ReportError));

    let response = assistant
        .chat("render the scene".to_string(), None, Some(AssistantMode::TechnicalExpert))
        .await
        .unwrap();

    assert_eq!(response.confidence, 0.0);
    assert!(response.content.contains("503"));
    assert!(response.suggestions.is_empty());
    assert_eq!(response.mode, AssistantMode::TechnicalExpert);
    assert_eq!(response.intent.category, IntentCategory::RenderScene);
}

#[tokio::test]
async fn test_backend_timeout_falls_back() {
    let backend = Arc::new(SlowBackend {
        started: AtomicUsize::new(0),
        finished: AtomicBool::new(false),
    });
    let assistant = AssistantHandle::new(
        backend.clone(),
        AssistantOptions {
            request_timeout: Duration::from_millis(100),
            ..options(FallbackPolicy::ReportError)
        },
    );

    let response = assistant
        .chat("hello".to_string(), None, None)
        .await
        .unwrap();
    assert_eq!(response.confidence, 0.0);
    assert!(response.content.contains("timed out"));
    assert!(!backend.finished.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_queued_chats_all_get_backend_replies() {
    // Each call fits its own timeout, the queue as a whole does not
    let assistant = AssistantHandle::new(
        Arc::new(DelayBackend {
            delay: Duration::from_millis(900),
        }),
        AssistantOptions {
            request_timeout: Duration::from_secs(1),
            ..options(FallbackPolicy::ReportError)
        },
    );

    let mut pending = Vec::new();
    for i in 0..8 {
        pending.push(
            assistant
                .submit(format!("message {}", i), None, None)
                .await
                .unwrap(),
        );
    }

    for reply in pending {
        let response = reply.wait().await.unwrap();
        assert_eq!(response.content, "ok");
        assert_eq!(response.confidence, 0.9);
    }

    let summary = assistant.summary().await.unwrap();
    assert_eq!(summary.total_messages, 16);
}

#[tokio::test]
async fn test_cancelled_request_frees_the_actor() {
    let backend = Arc::new(SlowBackend {
        started: AtomicUsize::new(0),
        finished: AtomicBool::new(false),
    });
    let assistant = AssistantHandle::new(backend.clone(), options(FallbackPolicy::LocalGuidance));

    let pending = assistant
        .submit("create a cube".to_string(), None, None)
        .await
        .unwrap();

    // Let the actor start the backend call, then walk away
    while backend.started.load(Ordering::SeqCst) == 0 {
        sleep(Duration::from_millis(10)).await;
    }
    pending.cancel();

    // The actor answers control messages long before the backend would finish
    let summary = tokio::time::timeout(Duration::from_secs(2), assistant.summary())
        .await
        .expect("actor still blocked on cancelled request")
        .unwrap();
    assert_eq!(summary.total_messages, 0);
    assert!(!backend.finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_mode_preferences_and_clear() {
    let backend = EchoBackend::new("Create a new material for the cube.");
    let assistant = AssistantHandle::new(backend.clone(), options(FallbackPolicy::LocalGuidance));

    assistant.set_mode(AssistantMode::CodeHelper).await.unwrap();
    let mut prefs = BTreeMap::new();
    prefs.insert("units".to_string(), serde_json::json!("metric"));
    assistant.update_preferences(prefs).await.unwrap();

    let response = assistant
        .chat("animate the ball".to_string(), None, None)
        .await
        .unwrap();
    assert_eq!(response.mode, AssistantMode::CodeHelper);
    assert!(backend.requests()[0].system_prompt.contains("Mode: code_helper"));

    let summary = assistant.summary().await.unwrap();
    assert_eq!(summary.current_mode, AssistantMode::CodeHelper);
    assert_eq!(summary.user_preferences["units"], "metric");
    assert_eq!(summary.recent_topics, vec!["animation", "object_creation"]);
    let first_id = summary.conversation_id;

    assistant.clear_history().await.unwrap();
    let summary = assistant.summary().await.unwrap();
    assert_eq!(summary.total_messages, 0);
    assert!(summary.recent_topics.is_empty());
    assert_ne!(summary.conversation_id, first_id);
}

#[tokio::test]
async fn test_shutdown_closes_mailbox() {
    let assistant = AssistantHandle::new(EchoBackend::new("ok"), options(FallbackPolicy::LocalGuidance));
    assistant.shutdown().await.unwrap();

    // Give the runner a moment to exit
    sleep(Duration::from_millis(50)).await;
    let result = assistant.chat("hello".to_string(), None, None).await;
    assert!(matches!(result, Err(AppError::Actor(_))));
}
