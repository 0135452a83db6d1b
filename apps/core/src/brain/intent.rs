//! Intent types produced by the parser.
//!
//! `IntentCategory` is a closed set. Its declaration order is significant:
//! when two categories score the same, the one declared first wins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// High-level goal inferred from a user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    /// Add a new object to the scene (create, make, add, ...)
    CreateObject,
    /// Change an existing object (modify, edit, transform, ...)
    ModifyObject,
    /// Build a material ("looks like metal")
    CreateMaterial,
    /// Keyframe or otherwise animate an object
    AnimateObject,
    /// Improve scene performance or quality
    OptimizeScene,
    /// Produce a final image
    RenderScene,
    /// Add a modifier (subdivision, bevel, array, mirror)
    ApplyModifier,
    /// Add or adjust lights
    SetupLighting,
    /// Build a texture or surface detail
    CreateTexture,
    /// Ask how to do something
    HelpRequest,
}

impl IntentCategory {
    /// Every category in declaration (tie-break) order.
    pub const ALL: [IntentCategory; 10] = [
        IntentCategory::CreateObject,
        IntentCategory::ModifyObject,
        IntentCategory::CreateMaterial,
        IntentCategory::AnimateObject,
        IntentCategory::OptimizeScene,
        IntentCategory::RenderScene,
        IntentCategory::ApplyModifier,
        IntentCategory::SetupLighting,
        IntentCategory::CreateTexture,
        IntentCategory::HelpRequest,
    ];

    /// Returns the snake_case label for the category
    pub fn label(&self) -> &'static str {
        match self {
            IntentCategory::CreateObject => "create_object",
            IntentCategory::ModifyObject => "modify_object",
            IntentCategory::CreateMaterial => "create_material",
            IntentCategory::AnimateObject => "animate_object",
            IntentCategory::OptimizeScene => "optimize_scene",
            IntentCategory::RenderScene => "render_scene",
            IntentCategory::ApplyModifier => "apply_modifier",
            IntentCategory::SetupLighting => "setup_lighting",
            IntentCategory::CreateTexture => "create_texture",
            IntentCategory::HelpRequest => "help_request",
        }
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A typed field extracted from the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
}

impl ParamValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            ParamValue::Numbers(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ParamValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(value: Vec<f64>) -> Self {
        ParamValue::Numbers(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

/// Extracted fields keyed by name. Ordered so that two parses of the same
/// input compare and serialize identically.
pub type Parameters = BTreeMap<String, ParamValue>;

/// Result of parsing one request. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIntent {
    /// Winning category
    pub category: IntentCategory,
    /// Keyword score of the winning category (0.0 - 1.0)
    pub confidence: f32,
    /// Fields extracted for `category` only
    pub parameters: Parameters,
    /// Canned advice for the category/parameter combination
    pub suggestions: Vec<String>,
    /// Recognition patterns of `category` that matched the normalized input
    pub matched_patterns: Vec<String>,
}

impl ParsedIntent {
    /// Whether the caller should treat this as a recognized request.
    ///
    /// The parser applies no threshold itself; 0.0 always means nothing was
    /// detected even though a category is still reported.
    pub fn is_recognized(&self, threshold: f32) -> bool {
        self.confidence > 0.0 && self.confidence >= threshold
    }

    /// Shorthand for reading a text parameter
    pub fn text(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(ParamValue::as_text)
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Intent: {} ({:.0}%), Parameters: {}, Suggestions: {}",
            self.category,
            self.confidence * 100.0,
            self.parameters.len(),
            self.suggestions.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_declaration_order() {
        let mut sorted = IntentCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, IntentCategory::ALL);
        assert_eq!(IntentCategory::ALL[0], IntentCategory::CreateObject);
        assert_eq!(IntentCategory::ALL[9], IntentCategory::HelpRequest);
    }

    #[test]
    fn test_labels_match_serde() {
        for category in IntentCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.label()));
        }
    }

    #[test]
    fn test_param_value_untagged_serialization() {
        let mut params = Parameters::new();
        params.insert("color".into(), "red".into());
        params.insert("position".into(), vec![1.0, 2.0, 3.0].into());
        params.insert("realistic".into(), true.into());
        params.insert("size".into(), 5.0.into());

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "color": "red",
                "position": [1.0, 2.0, 3.0],
                "realistic": true,
                "size": 5.0
            })
        );

        let back: Parameters = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_is_recognized() {
        let intent = ParsedIntent {
            category: IntentCategory::CreateObject,
            confidence: 0.0,
            parameters: Parameters::new(),
            suggestions: vec![],
            matched_patterns: vec![],
        };
        assert!(!intent.is_recognized(0.0));

        let intent = ParsedIntent {
            confidence: 0.4,
            ..intent
        };
        assert!(intent.is_recognized(0.3));
        assert!(!intent.is_recognized(0.5));
    }
}
