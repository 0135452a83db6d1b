//! Pattern table: keywords and recognition patterns per intent category.
//!
//! Compiled once on first use and never mutated afterwards, so the table can
//! be shared freely between threads.

use regex::Regex;
use std::sync::LazyLock;

use super::intent::IntentCategory;

/// Keywords and recognition patterns for one category.
pub struct CategoryPatterns {
    pub category: IntentCategory,
    /// Scored by the classifier, in order
    pub keywords: &'static [&'static str],
    /// Informational matches reported alongside the classification
    pub patterns: Vec<Regex>,
}

// NOTE: expect() is acceptable here, the patterns are compile-time constants
fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex in intent pattern table"))
        .collect()
}

/// The full table, indexed in `IntentCategory::ALL` order.
pub static PATTERN_TABLE: LazyLock<Vec<CategoryPatterns>> = LazyLock::new(|| {
    vec![
        CategoryPatterns {
            category: IntentCategory::CreateObject,
            keywords: &["create", "make", "add", "generate", "build", "new"],
            patterns: compile(&[
                r"create\s+(?:a\s+)?(\w+)",
                r"make\s+(?:a\s+)?(\w+)",
                r"add\s+(?:a\s+)?(\w+)",
                r"generate\s+(?:a\s+)?(\w+)",
                r"build\s+(?:a\s+)?(\w+)",
            ]),
        },
        CategoryPatterns {
            category: IntentCategory::ModifyObject,
            keywords: &["modify", "change", "edit", "update", "alter", "transform"],
            patterns: compile(&[
                r"modify\s+(?:the\s+)?(\w+)",
                r"change\s+(?:the\s+)?(\w+)",
                r"edit\s+(?:the\s+)?(\w+)",
                r"update\s+(?:the\s+)?(\w+)",
                r"alter\s+(?:the\s+)?(\w+)",
            ]),
        },
        CategoryPatterns {
            category: IntentCategory::CreateMaterial,
            keywords: &["material", "texture", "shader", "look", "appearance"],
            patterns: compile(&[
                r"create\s+(?:a\s+)?material\s+(?:that\s+)?(?:looks\s+)?(?:like\s+)?(\w+)",
                r"make\s+(?:a\s+)?material\s+(?:that\s+)?(?:looks\s+)?(?:like\s+)?(\w+)",
                r"add\s+(?:a\s+)?material\s+(?:that\s+)?(?:looks\s+)?(?:like\s+)?(\w+)",
                r"generate\s+(?:a\s+)?material\s+(?:that\s+)?(?:looks\s+)?(?:like\s+)?(\w+)",
            ]),
        },
        CategoryPatterns {
            category: IntentCategory::AnimateObject,
            keywords: &["animate", "animation", "move", "motion", "keyframe"],
            patterns: compile(&[
                r"animate\s+(?:the\s+)?(\w+)",
                r"add\s+animation\s+to\s+(?:the\s+)?(\w+)",
                r"make\s+(?:the\s+)?(\w+)\s+move",
                r"create\s+animation\s+for\s+(?:the\s+)?(\w+)",
            ]),
        },
        CategoryPatterns {
            category: IntentCategory::OptimizeScene,
            keywords: &["optimize", "improve", "better", "enhance", "performance"],
            patterns: compile(&[
                r"optimize\s+(?:the\s+)?scene",
                r"improve\s+(?:the\s+)?scene",
                r"make\s+(?:the\s+)?scene\s+better",
                r"enhance\s+(?:the\s+)?scene",
            ]),
        },
        CategoryPatterns {
            category: IntentCategory::RenderScene,
            keywords: &["render", "image", "picture", "output", "final"],
            patterns: compile(&[
                r"render(?:ing)?\s+(?:the\s+)?scene",
                r"create\s+(?:a\s+)?render",
                r"generate\s+(?:a\s+)?render",
                r"make\s+(?:a\s+)?render",
            ]),
        },
        CategoryPatterns {
            category: IntentCategory::ApplyModifier,
            keywords: &["modifier", "subdivision", "bevel", "array", "mirror"],
            patterns: vec![],
        },
        CategoryPatterns {
            category: IntentCategory::SetupLighting,
            keywords: &["light", "lighting", "illuminate", "bright", "shadow"],
            patterns: vec![],
        },
        CategoryPatterns {
            category: IntentCategory::CreateTexture,
            keywords: &["texture", "pattern", "surface", "detail", "bump"],
            patterns: vec![],
        },
        CategoryPatterns {
            category: IntentCategory::HelpRequest,
            keywords: &["help", "how", "what", "why", "tutorial", "guide"],
            patterns: vec![],
        },
    ]
});

/// Look up the table row for a category.
pub fn patterns_for(category: IntentCategory) -> &'static CategoryPatterns {
    // Rows are laid out in declaration order, checked by the tests below.
    &PATTERN_TABLE[category as usize]
}

/// Return the text of every recognition pattern of `category` matching `text`.
pub fn matched_patterns(category: IntentCategory, text: &str) -> Vec<String> {
    patterns_for(category)
        .patterns
        .iter()
        .filter_map(|p| p.find(text))
        .map(|m| m.as_str().to_string())
        .collect()
}
