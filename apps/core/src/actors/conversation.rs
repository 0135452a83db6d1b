//! Bounded conversation history owned by the assistant actor.

use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

use crate::actors::messages::{ChatMessage, Preferences};
use crate::actors::mode::AssistantMode;

pub const DEFAULT_CAPACITY: usize = 100;

const TOPIC_WINDOW: usize = 5;
const TOPICS: &[(&str, &str)] = &[
    ("create", "object_creation"),
    ("material", "materials"),
    ("animate", "animation"),
    ("render", "rendering"),
];

/// Snapshot of the conversation state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSummary {
    pub conversation_id: Uuid,
    pub total_messages: usize,
    pub current_mode: AssistantMode,
    pub user_preferences: Preferences,
    pub recent_topics: Vec<String>,
}

/// Oldest turns are dropped once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    id: Uuid,
    capacity: usize,
    messages: VecDeque<ChatMessage>,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ConversationHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            id: Uuid::new_v4(),
            capacity,
            messages: VecDeque::with_capacity(capacity),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: ChatMessage) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// The last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ChatMessage> {
        let skip = self.messages.len().saturating_sub(n);
        self.messages.iter().skip(skip).cloned().collect()
    }

    /// Starts a new conversation with a fresh id.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.id = Uuid::new_v4();
    }

    /// Topics of the last few turns, in order of first mention.
    pub fn recent_topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = Vec::new();
        for message in self.recent(TOPIC_WINDOW) {
            let content = message.content.to_lowercase();
            let topic = TOPICS
                .iter()
                .find(|(keyword, _)| content.contains(keyword))
                .map(|(_, topic)| *topic);
            if let Some(topic) = topic {
                if !topics.iter().any(|t| t == topic) {
                    topics.push(topic.to_string());
                }
            }
        }
        topics
    }

    pub fn summary(&self, mode: AssistantMode, preferences: &Preferences) -> ConversationSummary {
        ConversationSummary {
            conversation_id: self.id,
            total_messages: self.messages.len(),
            current_mode: mode,
            user_preferences: preferences.clone(),
            recent_topics: self.recent_topics(),
        }
    }
}
