//! Category-specific parameter extraction.
//!
//! Extraction is a table of rules per category. A rule that does not match
//! simply contributes no key; it is never an error.

use regex::Regex;
use std::sync::LazyLock;

use super::intent::{IntentCategory, ParamValue, Parameters};

static CREATE_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"create\s+(?:a\s+)?(\w+)(?:\s+with\s+(.+))?")
        .expect("Invalid regex: create object pattern")
});
static SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"size\s+(\d+(?:\.\d+)?)").expect("Invalid regex: size pattern")
});
static POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"at\s+\(([^)]+)\)").expect("Invalid regex: position pattern"));
static COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"color\s+(\w+)").expect("Invalid regex: color pattern"));
static LOOKS_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"looks?\s+like\s+(\w+)").expect("Invalid regex: looks like pattern"));

/// Which part of the input a rule looks at
#[derive(Clone, Copy)]
pub enum Scope {
    /// The whole normalized input
    Whole,
    /// One capture group of the rule set's anchor, e.g. the `with ...` clause
    Anchor(usize),
}

/// How a rule turns text into a value
#[derive(Clone, Copy)]
pub enum Matcher {
    /// The scoped text itself
    Verbatim,
    /// Capture group 1 of the pattern, converted by the parser function
    Capture(&'static LazyLock<Regex>, fn(&str) -> Option<ParamValue>),
    /// `true` when the literal occurs anywhere in scope
    Contains(&'static str),
    /// First keyword present wins, otherwise the fallback value
    FirstOf(&'static [(&'static str, &'static str)], &'static str),
}

/// One declarative extraction rule
#[derive(Clone, Copy)]
pub struct ExtractionRule {
    pub field: &'static str,
    pub scope: Scope,
    pub matcher: Matcher,
}

/// The rules of one category.
///
/// The anchor is matched once per extraction and its groups are shared by
/// every `Scope::Anchor` rule.
pub struct RuleSet {
    pub anchor: Option<&'static LazyLock<Regex>>,
    pub rules: &'static [ExtractionRule],
}

impl Matcher {
    fn apply(&self, scoped: &str) -> Option<ParamValue> {
        match *self {
            Matcher::Verbatim => Some(ParamValue::Text(scoped.to_string())),
            Matcher::Capture(pattern, parse) => parse(pattern.captures(scoped)?.get(1)?.as_str()),
            Matcher::Contains(literal) => scoped.contains(literal).then_some(ParamValue::Flag(true)),
            Matcher::FirstOf(choices, fallback) => {
                let value = choices
                    .iter()
                    .find(|(keyword, _)| scoped.contains(keyword))
                    .map(|(_, value)| *value)
                    .unwrap_or(fallback);
                Some(ParamValue::Text(value.to_string()))
            }
        }
    }
}

fn parse_number(raw: &str) -> Option<ParamValue> {
    raw.trim().parse::<f64>().ok().map(ParamValue::Number)
}

/// All coordinates must parse, otherwise the field is dropped.
fn parse_coordinates(raw: &str) -> Option<ParamValue> {
    raw.split(',')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()
        .map(ParamValue::Numbers)
}

fn parse_word(raw: &str) -> Option<ParamValue> {
    Some(ParamValue::Text(raw.to_string()))
}

static CREATE_OBJECT_FIELDS: [ExtractionRule; 4] = [
    ExtractionRule {
        field: "object_type",
        scope: Scope::Anchor(1),
        matcher: Matcher::Verbatim,
    },
    ExtractionRule {
        field: "size",
        scope: Scope::Anchor(2),
        matcher: Matcher::Capture(&SIZE, parse_number),
    },
    ExtractionRule {
        field: "position",
        scope: Scope::Anchor(2),
        matcher: Matcher::Capture(&POSITION, parse_coordinates),
    },
    ExtractionRule {
        field: "color",
        scope: Scope::Anchor(2),
        matcher: Matcher::Capture(&COLOR, parse_word),
    },
];

static CREATE_MATERIAL_FIELDS: [ExtractionRule; 3] = [
    ExtractionRule {
        field: "material_type",
        scope: Scope::Whole,
        matcher: Matcher::Capture(&LOOKS_LIKE, parse_word),
    },
    ExtractionRule {
        field: "realistic",
        scope: Scope::Whole,
        matcher: Matcher::Contains("realistic"),
    },
    ExtractionRule {
        field: "procedural",
        scope: Scope::Whole,
        matcher: Matcher::Contains("procedural"),
    },
];

static ANIMATE_OBJECT_FIELDS: [ExtractionRule; 1] = [ExtractionRule {
    field: "animation_type",
    scope: Scope::Whole,
    matcher: Matcher::FirstOf(
        &[("bounce", "bounce"), ("rotate", "rotation"), ("scale", "scale")],
        "custom",
    ),
}];

static CREATE_OBJECT_RULES: RuleSet = RuleSet {
    anchor: Some(&CREATE_OBJECT),
    rules: &CREATE_OBJECT_FIELDS,
};
static CREATE_MATERIAL_RULES: RuleSet = RuleSet {
    anchor: None,
    rules: &CREATE_MATERIAL_FIELDS,
};
static ANIMATE_OBJECT_RULES: RuleSet = RuleSet {
    anchor: None,
    rules: &ANIMATE_OBJECT_FIELDS,
};
static NO_RULES: RuleSet = RuleSet {
    anchor: None,
    rules: &[],
};

/// Rules for a category. Categories without structured fields have none.
pub fn rules_for(category: IntentCategory) -> &'static RuleSet {
    match category {
        IntentCategory::CreateObject => &CREATE_OBJECT_RULES,
        IntentCategory::CreateMaterial => &CREATE_MATERIAL_RULES,
        IntentCategory::AnimateObject => &ANIMATE_OBJECT_RULES,
        _ => &NO_RULES,
    }
}

/// Extract every field the rules of `category` can find in `text`.
pub fn extract(text: &str, category: IntentCategory) -> Parameters {
    let rule_set = rules_for(category);
    let anchor = rule_set.anchor.and_then(|pattern| pattern.captures(text));

    rule_set
        .rules
        .iter()
        .filter_map(|rule| {
            let scoped = match rule.scope {
                Scope::Whole => text,
                Scope::Anchor(group) => anchor.as_ref()?.get(group)?.as_str(),
            };
            rule.matcher
                .apply(scoped)
                .map(|value| (rule.field.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_type_only() {
        let params = extract("create a cube", IntentCategory::CreateObject);
        assert_eq!(params.len(), 1);
        assert_eq!(params["object_type"], ParamValue::Text("cube".into()));
    }

    #[test]
    fn test_with_clause_fields() {
        let params = extract(
            "create a cube with size 5 at (1, 2, 3) color red",
            IntentCategory::CreateObject,
        );
        assert_eq!(params["object_type"].as_text(), Some("cube"));
        assert_eq!(params["size"].as_number(), Some(5.0));
        assert_eq!(params["position"].as_numbers(), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(params["color"].as_text(), Some("red"));
    }

    #[test]
    fn test_properties_ignored_outside_with_clause() {
        let params = extract("size 5 create a sphere", IntentCategory::CreateObject);
        assert_eq!(params["object_type"].as_text(), Some("sphere"));
        assert!(!params.contains_key("size"));
    }

    #[test]
    fn test_bad_coordinates_drop_position() {
        let params = extract(
            "create a cube with size 2.5 at (1, two, 3)",
            IntentCategory::CreateObject,
        );
        assert_eq!(params["size"].as_number(), Some(2.5));
        assert!(!params.contains_key("position"));
    }

    #[test]
    fn test_no_create_verb_yields_nothing() {
        let params = extract("make a cube", IntentCategory::CreateObject);
        assert!(params.is_empty());
    }

    #[test]
    fn test_material_fields() {
        let params = extract(
            "create a realistic procedural material that looks like metal",
            IntentCategory::CreateMaterial,
        );
        assert_eq!(params["material_type"].as_text(), Some("metal"));
        assert_eq!(params["realistic"].as_flag(), Some(true));
        assert_eq!(params["procedural"].as_flag(), Some(true));

        let params = extract("a material that look like wood", IntentCategory::CreateMaterial);
        assert_eq!(params["material_type"].as_text(), Some("wood"));
        assert!(!params.contains_key("realistic"));
    }

    #[test]
    fn test_animation_priority() {
        let kind = |text: &str| {
            extract(text, IntentCategory::AnimateObject)["animation_type"]
                .as_text()
                .map(str::to_string)
        };
        assert_eq!(kind("bounce and rotate it").as_deref(), Some("bounce"));
        assert_eq!(kind("rotate then scale").as_deref(), Some("rotation"));
        assert_eq!(kind("scale it up").as_deref(), Some("scale"));
        assert_eq!(kind("animate the character").as_deref(), Some("custom"));
    }

    #[test]
    fn test_categories_without_rules() {
        for category in [
            IntentCategory::ModifyObject,
            IntentCategory::OptimizeScene,
            IntentCategory::RenderScene,
            IntentCategory::ApplyModifier,
            IntentCategory::SetupLighting,
            IntentCategory::CreateTexture,
            IntentCategory::HelpRequest,
        ] {
            assert!(extract("create a cube with size 5", category).is_empty());
        }
    }

    #[test]
    fn test_clause_rules_share_one_anchor() {
        let rule_set = rules_for(IntentCategory::CreateObject);
        assert!(rule_set.anchor.is_some());
        assert!(rule_set
            .rules
            .iter()
            .all(|rule| matches!(rule.scope, Scope::Anchor(_))));

        // Clause fields only resolve through the anchor's second group
        let params = extract("create a cone with color blue", IntentCategory::CreateObject);
        assert_eq!(params["object_type"].as_text(), Some("cone"));
        assert_eq!(params["color"].as_text(), Some("blue"));
        assert!(rules_for(IntentCategory::RenderScene).rules.is_empty());
    }
}
