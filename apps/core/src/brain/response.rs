//! Heuristics over LLM output.
//!
//! Pulls follow-up suggestions and actionable items out of free text and
//! characterises its tone, depth and subject.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const SUGGESTION_MARKERS: &[&str] = &["suggest", "try", "consider", "recommend"];
const FOLLOW_UP_MARKERS: &[&str] = &["you might want to", "you could try"];
const MAX_SUGGESTIONS: usize = 5;

static ACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"create\s+(\w+)",
        r"add\s+(\w+)",
        r"modify\s+(\w+)",
        r"animate\s+(\w+)",
        r"render\s+(\w+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex: action pattern"))
    .collect()
});

/// Kind of item extracted from a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// A verb/object pair mentioned in prose
    Suggestion,
    /// A fenced code block the user may run
    CodeExecution,
}

/// An actionable item found in a reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub kind: ActionKind,
    pub action: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Technical,
    Creative,
    Neutral,
    /// Used for locally generated guidance
    Helpful,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusArea {
    Modeling,
    Materials,
    Animation,
    Lighting,
    Rendering,
    General,
}

/// Tone, depth and subject of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseContext {
    pub mood: Mood,
    pub complexity: ComplexityLevel,
    pub focus_area: FocusArea,
}

impl ResponseContext {
    /// Context attached to locally generated fallback guidance
    pub fn fallback() -> Self {
        Self {
            mood: Mood::Helpful,
            complexity: ComplexityLevel::Intermediate,
            focus_area: FocusArea::General,
        }
    }
}

/// Collect suggestion lines from a reply.
///
/// Lines mentioning suggest/try/consider/recommend come first. When there are
/// none but the reply offers follow-ups ("you might want to ..."), its last
/// sentences are used instead.
pub fn extract_suggestions(content: &str) -> Vec<String> {
    let lines: Vec<String> = content
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            SUGGESTION_MARKERS.iter().any(|m| lower.contains(m))
        })
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect();

    if !lines.is_empty() {
        return lines;
    }

    let lower = content.to_lowercase();
    if !FOLLOW_UP_MARKERS.iter().any(|m| lower.contains(m)) {
        return Vec::new();
    }

    let sentences: Vec<&str> = content
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.len() < 2 {
        return Vec::new();
    }

    sentences[sentences.len().saturating_sub(3)..]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Collect actionable items from a reply.
pub fn extract_actions(content: &str) -> Vec<SuggestedAction> {
    let lower = content.to_lowercase();

    let mut actions: Vec<SuggestedAction> = ACTION_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(&lower))
        .filter_map(|caps| caps.get(1))
        .map(|m| SuggestedAction {
            kind: ActionKind::Suggestion,
            action: m.as_str().to_string(),
            description: format!("Action: {}", m.as_str()),
            code: None,
        })
        .collect();

    if let Some(code) = first_code_block(content) {
        actions.push(SuggestedAction {
            kind: ActionKind::CodeExecution,
            action: "execute_code".to_string(),
            description: "Execute the provided code".to_string(),
            code: Some(code),
        });
    }

    actions
}

/// Body of the first fenced block, without the language tag line.
fn first_code_block(content: &str) -> Option<String> {
    let mut parts = content.split("```");
    parts.next()?;
    let block = parts.next()?;
    // An unterminated fence is not a block
    parts.next()?;

    let body = match block.split_once('\n') {
        Some((tag, rest)) if !tag.trim().is_empty() && !tag.trim().contains(' ') => rest,
        _ => block,
    };
    let body = body.trim();
    (!body.is_empty()).then(|| body.to_string())
}

/// Characterise a reply.
pub fn analyze_context(content: &str) -> ResponseContext {
    let lower = content.to_lowercase();
    ResponseContext {
        mood: detect_mood(&lower),
        complexity: assess_complexity(&lower),
        focus_area: identify_focus_area(&lower),
    }
}

fn detect_mood(lower: &str) -> Mood {
    const POSITIVE: &[&str] = &["great", "excellent", "wonderful", "amazing", "inspiring"];
    const TECHNICAL: &[&str] = &["technical", "precise", "accurate", "efficient"];
    const CREATIVE: &[&str] = &["creative", "artistic", "beautiful", "inspiring", "imaginative"];

    let any = |words: &[&str]| words.iter().any(|w| lower.contains(w));
    if any(POSITIVE) {
        Mood::Positive
    } else if any(TECHNICAL) {
        Mood::Technical
    } else if any(CREATIVE) {
        Mood::Creative
    } else {
        Mood::Neutral
    }
}

fn assess_complexity(lower: &str) -> ComplexityLevel {
    const TERMS: &[&str] = &["modifier", "shader", "texture", "animation", "rendering"];

    let word_count = lower.split_whitespace().count();
    let technical = TERMS.iter().filter(|t| lower.contains(*t)).count();

    if technical > 3 || word_count > 200 {
        ComplexityLevel::Advanced
    } else if technical > 1 || word_count > 100 {
        ComplexityLevel::Intermediate
    } else {
        ComplexityLevel::Beginner
    }
}

fn identify_focus_area(lower: &str) -> FocusArea {
    const AREAS: &[(FocusArea, &[&str])] = &[
        (FocusArea::Modeling, &["mesh", "geometry", "vertex", "face", "edge", "model"]),
        (FocusArea::Materials, &["material", "texture", "shader", "surface", "appearance"]),
        (FocusArea::Animation, &["animate", "keyframe", "motion", "timeline", "action"]),
        (FocusArea::Lighting, &["light", "illumination", "shadow", "brightness", "exposure"]),
        (FocusArea::Rendering, &["render", "output", "image", "quality", "settings"]),
    ];

    let mut best = FocusArea::General;
    let mut best_hits = 0;
    for (area, keywords) in AREAS {
        let hits = keywords.iter().filter(|k| lower.contains(*k)).count();
        if hits > best_hits {
            best = *area;
            best_hits = hits;
        }
    }
    best
}
