//! # Brain Module
//!
//! Fast, non-LLM analysis of user requests and model replies.
//! Requests are parsed BEFORE calling the LLM so the assistant can choose a
//! prompt and answer locally when the backend is unavailable.
//!
//! ## Components
//! - `normalizer`: Lowercasing, whitespace folding, abbreviation expansion
//! - `patterns`: Keyword lists and recognition regexes per category
//! - `classifier`: Keyword-overlap scoring
//! - `extractor`: Category-specific parameter rules
//! - `suggestions`: Canned advice table
//! - `response`: Suggestion/action/context heuristics over LLM output
//! - `analyzer`: Main orchestrator

pub mod analyzer;
pub mod classifier;
pub mod extractor;
pub mod intent;
pub mod normalizer;
pub mod patterns;
pub mod response;
pub mod suggestions;

pub use analyzer::{parse, IntentParser};
pub use classifier::{Classification, IntentClassifier};
pub use intent::{IntentCategory, ParamValue, Parameters, ParsedIntent};
pub use normalizer::normalize;
pub use response::{
    analyze_context, extract_actions, extract_suggestions, ResponseContext, SuggestedAction,
};
