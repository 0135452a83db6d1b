//! Interaction modes shaping the assistant's system prompt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::brain::intent::IntentCategory;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantMode {
    #[default]
    CreativeAssistant,
    TechnicalExpert,
    ArtisticMentor,
    WorkflowOptimizer,
    ImmersiveStoryteller,
    ModelingAssistant,
    CodeHelper,
    SceneAnalysis,
    TutorialMode,
}

impl AssistantMode {
    pub const ALL: [AssistantMode; 9] = [
        AssistantMode::CreativeAssistant,
        AssistantMode::TechnicalExpert,
        AssistantMode::ArtisticMentor,
        AssistantMode::WorkflowOptimizer,
        AssistantMode::ImmersiveStoryteller,
        AssistantMode::ModelingAssistant,
        AssistantMode::CodeHelper,
        AssistantMode::SceneAnalysis,
        AssistantMode::TutorialMode,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AssistantMode::CreativeAssistant => "creative_assistant",
            AssistantMode::TechnicalExpert => "technical_expert",
            AssistantMode::ArtisticMentor => "artistic_mentor",
            AssistantMode::WorkflowOptimizer => "workflow_optimizer",
            AssistantMode::ImmersiveStoryteller => "immersive_storyteller",
            AssistantMode::ModelingAssistant => "modeling_assistant",
            AssistantMode::CodeHelper => "code_helper",
            AssistantMode::SceneAnalysis => "scene_analysis",
            AssistantMode::TutorialMode => "tutorial_mode",
        }
    }

    /// User-facing one-liner
    pub fn description(&self) -> &'static str {
        match self {
            AssistantMode::CreativeAssistant => "Creative companion for new ideas",
            AssistantMode::TechnicalExpert => "Technical workflow expert",
            AssistantMode::ArtisticMentor => "Artistic guidance and inspiration",
            AssistantMode::WorkflowOptimizer => "Improve your workflow and performance",
            AssistantMode::ImmersiveStoryteller => "Narrative and scene context",
            AssistantMode::ModelingAssistant => "Get help with 3D modeling tasks",
            AssistantMode::CodeHelper => "Generate and debug Python/Blender API code",
            AssistantMode::SceneAnalysis => "Analyze and optimize your 3D scene",
            AssistantMode::TutorialMode => "Step-by-step guidance and tutorials",
        }
    }

    /// Line appended to the system prompt
    pub fn focus(&self) -> &'static str {
        match self {
            AssistantMode::CreativeAssistant => "Focus on creative inspiration and artistic guidance.",
            AssistantMode::TechnicalExpert => "Focus on technical accuracy and workflow optimization.",
            AssistantMode::ArtisticMentor => "Focus on artistic development and creative techniques.",
            AssistantMode::WorkflowOptimizer => "Focus on efficiency and performance optimization.",
            AssistantMode::ImmersiveStoryteller => "Focus on narrative context and immersive experiences.",
            AssistantMode::ModelingAssistant => "Focus on practical modeling steps and tools.",
            AssistantMode::CodeHelper => "Answer with runnable Python using the bpy API where possible.",
            AssistantMode::SceneAnalysis => "Review the scene and point out concrete improvements.",
            AssistantMode::TutorialMode => "Explain step by step, one operation per step.",
        }
    }

    /// System prompt for this mode, mentioning how the request was classified.
    pub fn system_prompt(&self, scene: Option<&str>, intent: Option<IntentCategory>) -> String {
        let mut prompt = String::from(
            "You are Athena, an intelligent AI assistant integrated with Blender 3D software.\n\
             Your specializations: 3D modeling, material creation, animation, lighting, \
             rendering, workflow optimization\n",
        );
        if let Some(scene) = scene {
            prompt.push_str("\nCurrent Blender context:\n");
            prompt.push_str(scene);
            prompt.push('\n');
        }
        prompt.push_str(&format!(
            "\nMode: {} - {}\n",
            self.label(),
            self.description()
        ));
        if let Some(category) = intent {
            prompt.push_str(&format!("Detected request type: {}\n", category));
        }
        prompt.push_str(
            "\nProvide helpful, creative, and practical assistance for 3D creation in Blender.\n\
             Always include specific Blender operations and suggestions.\n",
        );
        prompt.push_str(self.focus());
        prompt
    }
}

impl fmt::Display for AssistantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AssistantMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|mode| mode.label() == wanted)
            .ok_or_else(|| AppError::Validation(format!("Unknown mode: {}", s)))
    }
}
