//! Intent parser - main orchestrator for the Brain module.
//!
//! Runs the stages in order:
//! 1. Normalize the raw text
//! 2. Classify it into a category with a confidence score
//! 3. Extract parameters for that category
//! 4. Look up canned suggestions
//!
//! Every stage is a pure function of its input and the static tables, so a
//! parser can be shared between threads without locking.

use std::sync::LazyLock;
use std::time::Instant;
use tracing::debug;

use super::classifier::IntentClassifier;
use super::extractor;
use super::intent::ParsedIntent;
use super::normalizer::normalize;
use super::patterns::matched_patterns;
use super::suggestions::suggest;

static DEFAULT_PARSER: LazyLock<IntentParser> = LazyLock::new(IntentParser::new);

/// Parse `text` with the shared default parser.
pub fn parse(text: &str) -> ParsedIntent {
    DEFAULT_PARSER.parse(text)
}

/// Stateless natural-language intent parser
pub struct IntentParser {
    classifier: IntentClassifier,
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentParser {
    pub fn new() -> Self {
        Self {
            classifier: IntentClassifier::new(),
        }
    }

    /// Parse a user request into an intent. Never fails.
    pub fn parse(&self, text: &str) -> ParsedIntent {
        let start = Instant::now();

        let normalized = normalize(text);
        let classification = self.classifier.classify(&normalized);
        let category = classification.category;

        let parameters = extractor::extract(&normalized, category);
        let suggestions = suggest(category, &parameters);

        let intent = ParsedIntent {
            category,
            confidence: classification.confidence,
            parameters,
            suggestions,
            matched_patterns: matched_patterns(category, &normalized),
        };

        debug!(
            input = %normalized,
            elapsed_us = start.elapsed().as_micros() as u64,
            "{}",
            intent.summary()
        );

        intent
    }
}
