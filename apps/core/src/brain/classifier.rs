//! Keyword-overlap intent classification.
//!
//! Each category is scored against its keyword list:
//! - +1.0 when the keyword occurs anywhere in the normalized input
//! - +0.5 for every whitespace token that contains the keyword or is
//!   contained in it
//!
//! The sum is divided by the keyword count and clamped to 1.0. The highest
//! score wins; ties go to the category declared first in `IntentCategory`.
//!
//! Normalizing by list length favours categories with short keyword lists.
//! Scores are therefore only roughly comparable across categories.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::intent::IntentCategory;
use super::patterns::{CategoryPatterns, PATTERN_TABLE};

/// Outcome of classifying one normalized input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: IntentCategory,
    pub confidence: f32,
    /// Score of every category in declaration order
    pub scores: Vec<(IntentCategory, f32)>,
}

/// Classifier over the static pattern table
pub struct IntentClassifier {
    table: &'static [CategoryPatterns],
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            table: PATTERN_TABLE.as_slice(),
        }
    }

    /// Score `text` against a single keyword list.
    pub fn score(text: &str, keywords: &[&str]) -> f32 {
        if keywords.is_empty() {
            return 0.0;
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut score = 0.0f32;

        for keyword in keywords {
            if text.contains(keyword) {
                score += 1.0;
            }
            for token in &tokens {
                if token.contains(keyword) || keyword.contains(token) {
                    score += 0.5;
                }
            }
        }

        (score / keywords.len() as f32).min(1.0)
    }

    /// Classify an already-normalized input.
    pub fn classify(&self, text: &str) -> Classification {
        let scores: Vec<(IntentCategory, f32)> = self
            .table
            .iter()
            .map(|row| (row.category, Self::score(text, row.keywords)))
            .collect();

        let mut best_category = IntentCategory::ALL[0];
        let mut best_score = f32::NEG_INFINITY;

        // Strictly greater keeps the earliest category on ties.
        for &(category, score) in &scores {
            if score > best_score {
                best_category = category;
                best_score = score;
            }
        }

        trace!(?scores, winner = %best_category, "classified input");

        Classification {
            category: best_category,
            confidence: best_score.max(0.0),
            scores,
        }
    }
}
