//! Canned advice keyed by category and an extracted parameter value.

use super::intent::{IntentCategory, Parameters};

/// One row of the advice table
pub struct SuggestionEntry {
    pub category: IntentCategory,
    pub field: &'static str,
    pub value: &'static str,
    pub advice: [&'static str; 3],
}

pub const SUGGESTION_TABLE: &[SuggestionEntry] = &[
    SuggestionEntry {
        category: IntentCategory::CreateObject,
        field: "object_type",
        value: "tree",
        advice: [
            "Consider adding a displacement modifier for realistic bark",
            "Use particle system for leaves",
            "Add subsurface scattering for realistic wood",
        ],
    },
    SuggestionEntry {
        category: IntentCategory::CreateObject,
        field: "object_type",
        value: "cube",
        advice: [
            "Consider beveling edges for smoother appearance",
            "Add subdivision surface for organic look",
            "Use array modifier for repetition",
        ],
    },
    SuggestionEntry {
        category: IntentCategory::CreateMaterial,
        field: "material_type",
        value: "metal",
        advice: [
            "Add roughness map for realistic metal",
            "Use environment texture for reflections",
            "Consider adding scratches or wear",
        ],
    },
    SuggestionEntry {
        category: IntentCategory::CreateMaterial,
        field: "material_type",
        value: "wood",
        advice: [
            "Add wood grain texture",
            "Use bump mapping for surface detail",
            "Consider adding knots and variations",
        ],
    },
    SuggestionEntry {
        category: IntentCategory::AnimateObject,
        field: "animation_type",
        value: "bounce",
        advice: [
            "Ease the keyframes at the top of each bounce",
            "Add squash and stretch on contact frames",
            "Use a cycles modifier to loop the motion",
        ],
    },
    SuggestionEntry {
        category: IntentCategory::AnimateObject,
        field: "animation_type",
        value: "rotation",
        advice: [
            "Set linear interpolation for constant rotation speed",
            "Use a driver to tie rotation to the frame number",
            "Apply rotation before animating to avoid gimbal issues",
        ],
    },
];

/// Look up advice for a category and its extracted parameters.
///
/// The first matching row wins; no match means no advice.
pub fn suggest(category: IntentCategory, parameters: &Parameters) -> Vec<String> {
    SUGGESTION_TABLE
        .iter()
        .find(|entry| {
            entry.category == category
                && parameters
                    .get(entry.field)
                    .and_then(|v| v.as_text())
                    .is_some_and(|v| v == entry.value)
        })
        .map(|entry| entry.advice.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}
