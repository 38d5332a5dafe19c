//! Structure validator enforcing heading-hierarchy and Hero-count rules.
//!
//! Two heading sources exist in a component tree:
//! - a `Hero` with a non-empty `headline` prop counts as a level-1 heading
//!   (the page's H1 equivalent);
//! - a `Section` with a non-empty `heading` prop counts as a heading at its
//!   `heading_level` prop, defaulting to 2.
//!
//! A valid page has exactly one H1 equivalent, starts its heading sequence
//! at level 1, and never skips a level downward (1→3 without a 2 is
//! invalid; repeats and decreases are fine).

use serde::{Deserialize, Serialize};

use crate::structure::{Component, PageStructure, COMPONENT_HERO, COMPONENT_SECTION};
use crate::validation::rules::FieldViolation;

/// Default heading level for a `Section` without a `heading_level` prop.
const DEFAULT_SECTION_LEVEL: i64 = 2;

/// How to treat a structure with an empty component list.
///
/// Historical revisions disagree: the earliest treated an empty tree as
/// vacuously valid, later ones reject it because no H1 equivalent exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmptyStructurePolicy {
    /// Reject an empty component list (no H1 equivalent exists).
    #[default]
    Reject,
    /// Accept an empty component list as vacuously valid.
    Accept,
}

/// Configuration for the structure validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureRules {
    pub empty_components: EmptyStructurePolicy,
}

/// Validate a page structure against the heading rules.
///
/// Boolean form used by the page create/update path; see
/// [`check_structure`] for field-level detail.
pub fn validate_structure(structure: &PageStructure, rules: &StructureRules) -> bool {
    check_structure(structure, rules).is_empty()
}

/// Validate a page structure, returning every violation found.
pub fn check_structure(structure: &PageStructure, rules: &StructureRules) -> Vec<FieldViolation> {
    if structure.components.is_empty() {
        return match rules.empty_components {
            EmptyStructurePolicy::Accept => Vec::new(),
            EmptyStructurePolicy::Reject => vec![FieldViolation::new(
                "components",
                "h1_count",
                "Page must contain exactly one H1-equivalent heading",
            )],
        };
    }

    let mut violations = Vec::new();
    let (h1_count, levels) = collect_heading_levels(&structure.components);

    if h1_count != 1 {
        violations.push(FieldViolation::new(
            "components",
            "h1_count",
            format!("Page must contain exactly one H1-equivalent heading, found {h1_count}"),
        ));
    }

    violations.extend(check_heading_hierarchy(&levels));
    violations
}

/// Validate a blueprint page during archetype-driven creation.
///
/// On top of the archetype's structural guarantees this enforces the
/// Hero-count rule: a `home` page carries exactly one Hero, any other page
/// at most one.
pub fn check_blueprint_structure(
    page_type: &str,
    structure: &PageStructure,
) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    let hero_count = structure.count_of_type(COMPONENT_HERO);

    if page_type == "home" {
        if hero_count != 1 {
            violations.push(FieldViolation::new(
                "page_structure.components",
                "hero_count",
                format!("Home page must contain exactly one Hero component, found {hero_count}"),
            ));
        }
    } else if hero_count > 1 {
        violations.push(FieldViolation::new(
            "page_structure.components",
            "hero_count",
            format!("Page must contain at most one Hero component, found {hero_count}"),
        ));
    }

    violations
}

/// Validate the SEO map required on archetype-driven creation:
/// `seo_data.schema` and `seo_data.keywords` must be present.
pub fn check_blueprint_seo(seo_data: &serde_json::Map<String, serde_json::Value>) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    if !seo_data.contains_key("schema") {
        violations.push(FieldViolation::new(
            "seo_data.schema",
            "required",
            "Structured-data schema map is required",
        ));
    }
    if !seo_data.contains_key("keywords") {
        violations.push(FieldViolation::new(
            "seo_data.keywords",
            "required",
            "Keyword list is required",
        ));
    }
    violations
}

/// Scan components in order, returning the H1-equivalent count and the
/// full heading-level sequence.
fn collect_heading_levels(components: &[Component]) -> (usize, Vec<i64>) {
    let mut h1_count = 0;
    let mut levels = Vec::new();

    for component in components {
        match component.component_type.as_str() {
            COMPONENT_HERO => {
                if component
                    .prop_str("headline")
                    .is_some_and(|h| !h.is_empty())
                {
                    h1_count += 1;
                    levels.push(1);
                }
            }
            COMPONENT_SECTION => {
                if component.prop_str("heading").is_some_and(|h| !h.is_empty()) {
                    levels.push(
                        component
                            .prop_i64("heading_level")
                            .unwrap_or(DEFAULT_SECTION_LEVEL),
                    );
                }
            }
            _ => {}
        }
    }

    (h1_count, levels)
}

/// Check the heading-level sequence: first heading must be level 1 and no
/// later heading may skip a level downward.
fn check_heading_hierarchy(levels: &[i64]) -> Vec<FieldViolation> {
    let Some(&first) = levels.first() else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    if first != 1 {
        violations.push(FieldViolation::new(
            "components",
            "heading_hierarchy",
            format!("First heading must be level 1, found level {first}"),
        ));
    }

    for window in levels.windows(2) {
        if window[1] > window[0] + 1 {
            violations.push(FieldViolation::new(
                "components",
                "heading_hierarchy",
                format!(
                    "Heading level skips from {} to {} without an intermediate level",
                    window[0], window[1]
                ),
            ));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hero(headline: &str) -> serde_json::Value {
        json!({ "id": "hero", "type": "Hero", "props": { "headline": headline } })
    }

    fn section(level: i64) -> serde_json::Value {
        json!({
            "id": "section",
            "type": "Section",
            "props": { "heading": "Heading", "heading_level": level }
        })
    }

    fn structure(components: Vec<serde_json::Value>) -> PageStructure {
        PageStructure::from_value(&json!({ "version": "1.0", "components": components })).unwrap()
    }

    // -- H1 count ------------------------------------------------------------

    #[test]
    fn single_hero_headline_validates() {
        let s = structure(vec![hero("Welcome")]);
        assert!(validate_structure(&s, &StructureRules::default()));
    }

    #[test]
    fn two_hero_headlines_rejected() {
        let s = structure(vec![hero("One"), hero("Two")]);
        let violations = check_structure(&s, &StructureRules::default());
        assert!(violations.iter().any(|v| v.rule == "h1_count"));
    }

    #[test]
    fn hero_with_empty_headline_does_not_count() {
        let s = structure(vec![hero(""), hero("Real")]);
        assert!(validate_structure(&s, &StructureRules::default()));
    }

    #[test]
    fn zero_headings_rejected_with_nonempty_components() {
        let s = structure(vec![json!({ "id": "cta", "type": "CTA", "props": {} })]);
        assert!(!validate_structure(&s, &StructureRules::default()));
    }

    // -- Heading hierarchy ---------------------------------------------------

    #[test]
    fn section_alone_fails_on_both_rules() {
        // A lone level-2 heading: the H1 count is zero and the sequence
        // does not start at level 1.
        let s = structure(vec![section(2)]);
        let violations = check_structure(&s, &StructureRules::default());
        assert!(violations.iter().any(|v| v.rule == "h1_count"));
        assert!(violations.iter().any(|v| v.rule == "heading_hierarchy"));
    }

    #[test]
    fn sequential_levels_validate() {
        let s = structure(vec![hero("H1"), section(2), section(3)]);
        assert!(validate_structure(&s, &StructureRules::default()));
    }

    #[test]
    fn skipped_level_rejected() {
        let s = structure(vec![hero("H1"), section(3)]);
        let violations = check_structure(&s, &StructureRules::default());
        assert!(violations.iter().any(|v| v.rule == "heading_hierarchy"));
    }

    #[test]
    fn repeated_levels_validate() {
        let s = structure(vec![hero("H1"), section(2), section(2), section(3)]);
        assert!(validate_structure(&s, &StructureRules::default()));
    }

    #[test]
    fn decreasing_levels_validate() {
        let s = structure(vec![hero("H1"), section(2), section(3), section(2)]);
        assert!(validate_structure(&s, &StructureRules::default()));
    }

    #[test]
    fn section_defaults_to_level_two() {
        let s = structure(vec![
            hero("H1"),
            json!({ "id": "s", "type": "Section", "props": { "heading": "Sub" } }),
        ]);
        assert!(validate_structure(&s, &StructureRules::default()));
    }

    // -- Empty components policy ---------------------------------------------

    #[test]
    fn empty_components_rejected_by_default() {
        let s = structure(vec![]);
        assert!(!validate_structure(&s, &StructureRules::default()));
    }

    #[test]
    fn empty_components_accepted_under_lenient_policy() {
        let s = structure(vec![]);
        let rules = StructureRules {
            empty_components: EmptyStructurePolicy::Accept,
        };
        assert!(validate_structure(&s, &rules));
    }

    // -- Hero count on the blueprint path ------------------------------------

    #[test]
    fn home_page_requires_exactly_one_hero() {
        let with_hero = structure(vec![hero("Welcome")]);
        assert!(check_blueprint_structure("home", &with_hero).is_empty());

        let without_hero = structure(vec![json!({ "id": "c", "type": "CTA", "props": {} })]);
        let violations = check_blueprint_structure("home", &without_hero);
        assert!(violations.iter().any(|v| v.rule == "hero_count"));

        let two_heroes = structure(vec![hero("One"), hero("Two")]);
        let violations = check_blueprint_structure("home", &two_heroes);
        assert!(violations.iter().any(|v| v.rule == "hero_count"));
    }

    #[test]
    fn blueprint_seo_requires_schema_and_keywords() {
        let full: serde_json::Map<String, serde_json::Value> =
            serde_json::from_value(json!({ "schema": {}, "keywords": [] })).unwrap();
        assert!(check_blueprint_seo(&full).is_empty());

        let missing: serde_json::Map<String, serde_json::Value> =
            serde_json::from_value(json!({ "robots": "index,follow" })).unwrap();
        let violations = check_blueprint_seo(&missing);
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"seo_data.schema"));
        assert!(fields.contains(&"seo_data.keywords"));
    }

    #[test]
    fn non_home_page_allows_zero_or_one_hero() {
        let none = structure(vec![json!({ "id": "c", "type": "CTA", "props": {} })]);
        assert!(check_blueprint_structure("services", &none).is_empty());

        let one = structure(vec![hero("Welcome")]);
        assert!(check_blueprint_structure("services", &one).is_empty());

        let two = structure(vec![hero("One"), hero("Two")]);
        let violations = check_blueprint_structure("services", &two);
        assert!(violations.iter().any(|v| v.rule == "hero_count"));
    }
}
