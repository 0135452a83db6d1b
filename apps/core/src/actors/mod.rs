//! Assistant actor and the backend seam it talks through.

pub mod assistant;
pub mod conversation;
pub mod messages;
pub mod mode;
pub mod traits;

pub use assistant::{AssistantHandle, AssistantOptions, FallbackPolicy, PendingReply};
pub use messages::{AssistantResponse, ChatMessage, CompletionRequest, SceneContext};
pub use mode::AssistantMode;
pub use traits::ChatBackend;
