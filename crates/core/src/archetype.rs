//! Archetype catalog: named bundles of page blueprints.
//!
//! Archetypes are immutable configuration embedded at build time and parsed
//! once per process. The catalog value is passed by reference to consumers
//! so tests can substitute a custom set. Unknown archetype names resolve to
//! the `default` entry rather than erroring.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::structure::PageStructure;
use crate::validation::rules::FieldViolation;

/// Name of the catch-all archetype every catalog must contain.
pub const ARCHETYPE_DEFAULT: &str = "default";

/// Maximum length for a page's meta description.
pub const META_DESCRIPTION_MAX: usize = 160;

/// Embedded built-in archetype definitions.
const BUILTIN_ARCHETYPES_JSON: &str = include_str!("../assets/archetypes.json");

/// Template data used to instantiate a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageBlueprint {
    #[serde(default)]
    pub page_type: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub seo_data: Map<String, Value>,
    #[serde(default)]
    pub page_structure: Option<PageStructure>,
}

/// A named, versioned bundle of page blueprints for one business type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archetype {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pages: Vec<PageBlueprint>,
}

/// Registry of archetypes keyed by business type.
#[derive(Debug, Clone)]
pub struct ArchetypeCatalog {
    archetypes: BTreeMap<String, Archetype>,
}

impl ArchetypeCatalog {
    /// Parse a catalog from JSON. The `default` entry must be present.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let archetypes: BTreeMap<String, Archetype> = serde_json::from_str(json)
            .map_err(|e| CoreError::Internal(format!("Malformed archetype catalog: {e}")))?;
        if !archetypes.contains_key(ARCHETYPE_DEFAULT) {
            return Err(CoreError::Internal(
                "Archetype catalog is missing the 'default' entry".into(),
            ));
        }
        Ok(Self { archetypes })
    }

    /// The built-in catalog, parsed once per process.
    pub fn builtin() -> &'static ArchetypeCatalog {
        static BUILTIN: OnceLock<ArchetypeCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            ArchetypeCatalog::from_json(BUILTIN_ARCHETYPES_JSON)
                .expect("built-in archetype catalog is valid")
        })
    }

    /// Look up an archetype by business type, falling back to `default`.
    pub fn get(&self, business_type: &str) -> &Archetype {
        self.archetypes
            .get(business_type)
            .unwrap_or_else(|| &self.archetypes[ARCHETYPE_DEFAULT])
    }

    /// All registered archetype names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.archetypes.keys().map(String::as_str)
    }
}

/// Validate an archetype's overall shape, returning every violation.
///
/// Built-in archetypes always pass; this guards custom or future catalogs
/// against missing fields before any page is created.
pub fn validate_archetype(archetype: &Archetype) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    require_str("name", &archetype.name, &mut violations);
    require_str("description", &archetype.description, &mut violations);

    if archetype.pages.is_empty() {
        violations.push(FieldViolation::new(
            "pages",
            "min_items",
            "Archetype must define at least one page",
        ));
        return violations;
    }

    for (i, page) in archetype.pages.iter().enumerate() {
        validate_page_blueprint(&format!("pages[{i}]"), page, &mut violations);
    }

    violations
}

fn validate_page_blueprint(path: &str, page: &PageBlueprint, violations: &mut Vec<FieldViolation>) {
    require_str(&format!("{path}.page_type"), &page.page_type, violations);
    require_str(&format!("{path}.slug"), &page.slug, violations);
    require_str(&format!("{path}.title"), &page.title, violations);

    match &page.meta_description {
        None => violations.push(FieldViolation::new(
            format!("{path}.meta_description"),
            "required",
            "Field is required",
        )),
        Some(meta) if meta.chars().count() > META_DESCRIPTION_MAX => {
            violations.push(FieldViolation::new(
                format!("{path}.meta_description"),
                "max_length",
                format!("Must not exceed {META_DESCRIPTION_MAX} characters"),
            ));
        }
        Some(_) => {}
    }

    if page.seo_data.is_empty() {
        violations.push(FieldViolation::new(
            format!("{path}.seo_data"),
            "required",
            "Field is required",
        ));
    } else {
        if !page
            .seo_data
            .get("schema")
            .is_some_and(|v| v.is_object())
        {
            violations.push(FieldViolation::new(
                format!("{path}.seo_data.schema"),
                "required",
                "Structured-data schema map is required",
            ));
        }
        if !page
            .seo_data
            .get("keywords")
            .is_some_and(|v| v.is_array())
        {
            violations.push(FieldViolation::new(
                format!("{path}.seo_data.keywords"),
                "required",
                "Keyword list is required",
            ));
        }
    }

    let Some(structure) = &page.page_structure else {
        violations.push(FieldViolation::new(
            format!("{path}.page_structure"),
            "required",
            "Field is required",
        ));
        return;
    };

    require_str(
        &format!("{path}.page_structure.version"),
        &structure.version,
        violations,
    );

    if structure.components.is_empty() {
        violations.push(FieldViolation::new(
            format!("{path}.page_structure.components"),
            "min_items",
            "At least one component is required",
        ));
        return;
    }

    for (j, component) in structure.components.iter().enumerate() {
        let cpath = format!("{path}.page_structure.components[{j}]");
        require_str(&format!("{cpath}.id"), &component.id, violations);
        require_str(&format!("{cpath}.type"), &component.component_type, violations);

        if component.props.is_empty() {
            violations.push(FieldViolation::new(
                format!("{cpath}.props"),
                "required",
                "Field is required",
            ));
        } else if !component
            .props
            .get("aria_label")
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty())
        {
            violations.push(FieldViolation::new(
                format!("{cpath}.props.aria_label"),
                "required",
                "Accessible label is required",
            ));
        }

        if component.prompt_metadata.is_none() {
            violations.push(FieldViolation::new(
                format!("{cpath}.prompt_metadata"),
                "required",
                "Field must be present",
            ));
        }
    }
}

fn require_str(path: &str, value: &str, violations: &mut Vec<FieldViolation>) {
    if value.is_empty() {
        violations.push(FieldViolation::new(path, "required", "Field is required"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = ArchetypeCatalog::builtin();
        let names: Vec<_> = catalog.names().collect();
        for expected in ["services", "products", "professional", "portfolio", "default"] {
            assert!(names.contains(&expected), "missing archetype {expected}");
        }
    }

    #[test]
    fn builtin_archetypes_pass_shape_validation() {
        let catalog = ArchetypeCatalog::builtin();
        for name in ["services", "products", "professional", "portfolio", "default"] {
            let archetype = catalog.get(name);
            let violations = validate_archetype(archetype);
            assert!(
                violations.is_empty(),
                "archetype {name} has violations: {violations:?}"
            );
        }
    }

    #[test]
    fn unknown_name_falls_back_to_default() {
        let catalog = ArchetypeCatalog::builtin();
        let fallback = catalog.get("nonexistent-name");
        let default = catalog.get(ARCHETYPE_DEFAULT);
        assert_eq!(fallback.name, default.name);
        assert_eq!(fallback.pages.len(), default.pages.len());
    }

    #[test]
    fn services_archetype_has_expected_pages() {
        let archetype = ArchetypeCatalog::builtin().get("services");
        let page_types: Vec<_> = archetype.pages.iter().map(|p| p.page_type.as_str()).collect();
        assert_eq!(page_types, ["home", "services", "about", "contact"]);
    }

    #[test]
    fn home_blueprints_carry_exactly_one_hero() {
        let catalog = ArchetypeCatalog::builtin();
        for name in ["services", "products", "professional", "portfolio", "default"] {
            for page in &catalog.get(name).pages {
                let structure = page.page_structure.as_ref().unwrap();
                let hero_count = structure.count_of_type("Hero");
                if page.page_type == "home" {
                    assert_eq!(hero_count, 1, "{name} home page must have one Hero");
                } else {
                    assert!(hero_count <= 1, "{name} {} page has {hero_count} Heroes", page.page_type);
                }
            }
        }
    }

    #[test]
    fn catalog_without_default_rejected() {
        let json = r#"{ "services": { "name": "S", "description": "d", "pages": [] } }"#;
        assert!(ArchetypeCatalog::from_json(json).is_err());
    }

    #[test]
    fn malformed_blueprint_aggregates_all_violations() {
        let archetype: Archetype = serde_json::from_value(json!({
            "name": "",
            "description": "Custom",
            "pages": [
                {
                    "page_type": "home",
                    "slug": "",
                    "title": "Home",
                    "seo_data": { "schema": {} },
                    "page_structure": {
                        "version": "1.0",
                        "components": [
                            { "id": "c1", "type": "Hero", "props": { "headline": "Hi" } }
                        ]
                    }
                }
            ]
        }))
        .unwrap();

        let violations = validate_archetype(&archetype);
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"pages[0].slug"));
        assert!(fields.contains(&"pages[0].meta_description"));
        assert!(fields.contains(&"pages[0].seo_data.keywords"));
        assert!(fields.contains(&"pages[0].page_structure.components[0].props.aria_label"));
        assert!(fields.contains(&"pages[0].page_structure.components[0].prompt_metadata"));
    }

    #[test]
    fn overlong_meta_description_rejected() {
        let archetype: Archetype = serde_json::from_value(json!({
            "name": "Custom",
            "description": "Custom",
            "pages": [{
                "page_type": "home",
                "slug": "home",
                "title": "Home",
                "meta_description": "x".repeat(161),
                "seo_data": { "schema": {}, "keywords": [] },
                "page_structure": {
                    "version": "1.0",
                    "components": [{
                        "id": "c1", "type": "Hero",
                        "props": { "aria_label": "hero" },
                        "prompt_metadata": {}
                    }]
                }
            }]
        }))
        .unwrap();

        let violations = validate_archetype(&archetype);
        assert!(violations
            .iter()
            .any(|v| v.field == "pages[0].meta_description" && v.rule == "max_length"));
    }

    #[test]
    fn empty_pages_rejected() {
        let archetype: Archetype = serde_json::from_value(json!({
            "name": "Custom",
            "description": "Custom",
            "pages": []
        }))
        .unwrap();
        let violations = validate_archetype(&archetype);
        assert!(violations.iter().any(|v| v.field == "pages"));
    }
}
