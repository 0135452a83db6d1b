//! Input normalization ahead of classification.
//!
//! Lowercases, collapses whitespace and expands a fixed set of standalone
//! abbreviations. Never fails.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Abbreviations expanded when they appear as whole words.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("obj", "object"),
    ("mat", "material"),
    ("tex", "texture"),
    ("anim", "animate"),
    ("mod", "modifier"),
    ("light", "lighting"),
    ("render", "rendering"),
];

static ABBREVIATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = ABBREVIATIONS
        .iter()
        .map(|(abbrev, _)| regex::escape(abbrev))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("Invalid regex: abbreviation table")
});

fn expand(abbrev: &str) -> &'static str {
    ABBREVIATIONS
        .iter()
        .find(|(short, _)| *short == abbrev)
        .map(|(_, full)| *full)
        .unwrap_or_default()
}

/// Normalize raw user text.
pub fn normalize(text: &str) -> String {
    let collapsed = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    ABBREVIATION_PATTERN
        .replace_all(&collapsed, |caps: &Captures| expand(&caps[0]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_and_case() {
        assert_eq!(normalize("Create   A\tCube"), "create a cube");
        assert_eq!(normalize("create a cube"), "create a cube");
        assert_eq!(normalize("  \n Create\n\na  cube \t"), "create a cube");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n "), "");
    }

    #[test]
    fn test_abbreviation_expansion() {
        assert_eq!(normalize("add an obj"), "add an object");
        assert_eq!(normalize("new MAT please"), "new material please");
        assert_eq!(normalize("tex, mod and anim"), "texture, modifier and animate");
        assert_eq!(normalize("render the light"), "rendering the lighting");
    }

    #[test]
    fn test_abbreviations_only_whole_words() {
        assert_eq!(normalize("animation"), "animation");
        assert_eq!(normalize("material"), "material");
        assert_eq!(normalize("modify the object"), "modify the object");
        assert_eq!(normalize("lights and renderer"), "lights and renderer");
        assert_eq!(normalize("context"), "context");
    }
}
