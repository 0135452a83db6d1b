//! Brain Module Tests
//!
//! End-to-end checks of the intent parser through its public entry points,
//! plus properties that span several stages.

use crate::brain::patterns::PATTERN_TABLE;
use crate::brain::{normalize, parse, IntentCategory, IntentClassifier, IntentParser, ParamValue};

#[cfg(test)]
mod parse_tests {
    use super::*;

    #[test]
    fn test_create_cube() {
        let intent = parse("Create a cube");
        assert_eq!(intent.category, IntentCategory::CreateObject);
        assert_eq!(intent.text("object_type"), Some("cube"));
        assert!(intent.is_recognized(0.5));
    }

    #[test]
    fn test_material_looks_like_metal() {
        let intent = parse("create a material that looks like metal");
        assert_eq!(intent.category, IntentCategory::CreateMaterial);
        assert_eq!(intent.text("material_type"), Some("metal"));
        assert_eq!(intent.suggestions.len(), 3);
        assert!(intent.suggestions[0].contains("roughness"));
    }

    #[test]
    fn test_animate_with_bounce() {
        let intent = parse("animate the character with a bounce");
        assert_eq!(intent.category, IntentCategory::AnimateObject);
        assert_eq!(intent.text("animation_type"), Some("bounce"));
        assert_eq!(
            intent.matched_patterns,
            vec!["animate the character".to_string()]
        );
    }

    #[test]
    fn test_create_with_properties() {
        let intent = parse("create a cube with size 5 at (1, 2, 3) color red");
        assert_eq!(intent.category, IntentCategory::CreateObject);

        let params = &intent.parameters;
        assert_eq!(params.get("object_type"), Some(&ParamValue::Text("cube".into())));
        assert_eq!(params.get("size").and_then(ParamValue::as_number), Some(5.0));
        assert_eq!(
            params.get("position").and_then(ParamValue::as_numbers),
            Some(&[1.0, 2.0, 3.0][..])
        );
        assert_eq!(params.get("color").and_then(ParamValue::as_text), Some("red"));
    }

    #[test]
    fn test_messy_input_matches_clean_input() {
        assert_eq!(parse("  CREATE   a\tCube \n"), parse("create a cube"));
    }

    #[test]
    fn test_abbreviations_feed_classification() {
        let intent = parse("new obj");
        assert_eq!(intent.category, IntentCategory::CreateObject);

        let intent = parse("tex please");
        assert_ne!(intent.confidence, 0.0);
    }

    #[test]
    fn test_empty_and_blank_input() {
        for text in ["", "   ", "\n\t"] {
            let intent = parse(text);
            assert_eq!(intent.category, IntentCategory::CreateObject);
            assert_eq!(intent.confidence, 0.0);
            assert!(intent.parameters.is_empty());
            assert!(intent.suggestions.is_empty());
            assert!(intent.matched_patterns.is_empty());
        }
    }

    #[test]
    fn test_unicode_input_does_not_panic() {
        for text in ["créer un cube", "立方体を作成", "🧊 create a 🧊", "create a cube with size ∞"] {
            let intent = parse(text);
            assert!((0.0..=1.0).contains(&intent.confidence));
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    #[test]
    fn test_keyword_presence_floor() {
        for row in PATTERN_TABLE.iter() {
            for keyword in row.keywords {
                let text = normalize(&format!("please {} now", keyword));
                let score = IntentClassifier::score(&text, row.keywords);
                let floor = 1.0 / row.keywords.len() as f32;
                assert!(
                    score >= floor,
                    "{} scored {} for keyword '{}', expected >= {}",
                    row.category,
                    score,
                    keyword,
                    floor
                );
            }
        }
    }

    #[test]
    fn test_confidence_in_unit_range() {
        let inputs = [
            "help help help help help",
            "create make add generate build new",
            "render rendering render the scene",
            "random words that match nothing",
        ];
        for text in inputs {
            let intent = parse(text);
            assert!(
                (0.0..=1.0).contains(&intent.confidence),
                "confidence {} out of range for '{}'",
                intent.confidence,
                text
            );
        }
    }

    #[test]
    fn test_parameters_are_gated_by_category() {
        let category_fields = [
            (IntentCategory::CreateObject, &["object_type", "size", "position", "color"][..]),
            (IntentCategory::CreateMaterial, &["material_type", "realistic", "procedural"][..]),
            (IntentCategory::AnimateObject, &["animation_type"][..]),
        ];
        let inputs = [
            "create a cube with size 2 color blue",
            "make a realistic material that looks like wood",
            "animate the ball so it can rotate",
            "optimize the scene",
            "render the scene",
            "how do i add a bevel modifier",
        ];

        for text in inputs {
            let intent = parse(text);
            let allowed = category_fields
                .iter()
                .find(|(c, _)| *c == intent.category)
                .map(|(_, fields)| *fields)
                .unwrap_or(&[]);
            for key in intent.parameters.keys() {
                assert!(
                    allowed.contains(&key.as_str()),
                    "'{}' produced key '{}' not valid for {}",
                    text,
                    key,
                    intent.category
                );
            }
        }
    }

    #[test]
    fn test_parser_is_shareable_across_threads() {
        let parser = std::sync::Arc::new(IntentParser::new());
        let expected = parser.parse("create a material that looks like metal");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let parser = parser.clone();
                std::thread::spawn(move || parser.parse("create a material that looks like metal"))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_json_shape() {
        let intent = parse("create a cube with size 5 at (1, 2, 3) color red");
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["category"], "create_object");
        assert_eq!(json["parameters"]["object_type"], "cube");
        assert_eq!(json["parameters"]["size"], 5.0);
        assert_eq!(json["parameters"]["position"], serde_json::json!([1.0, 2.0, 3.0]));
    }
}
