//! Page component tree types.
//!
//! A page's `page_structure` is a versioned, ordered list of components.
//! Component `type` is an open string: unrecognized types are legal data
//! and degrade to a placeholder at render time rather than failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Component type that counts as a level-1 heading when it carries a
/// non-empty `headline` prop.
pub const COMPONENT_HERO: &str = "Hero";
/// Component type that counts as a heading at its `heading_level` prop
/// (default 2) when it carries a non-empty `heading` prop.
pub const COMPONENT_SECTION: &str = "Section";
/// Main content landmark component type.
pub const COMPONENT_MAIN: &str = "Main";
/// Call-to-action component type.
pub const COMPONENT_CTA: &str = "CTA";

/// A page's component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStructure {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

/// A single building block within a page structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub component_type: String,
    #[serde(default)]
    pub props: Map<String, Value>,
    /// AI-generation hints (`maxLength`, `readingLevel`). Consumed by the
    /// content-generation subsystem, carried here untouched.
    #[serde(default)]
    pub prompt_metadata: Option<Map<String, Value>>,
}

impl Component {
    /// Read a string prop, returning `None` when absent or not a string.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Read an integer prop, returning `None` when absent or not a number.
    pub fn prop_i64(&self, key: &str) -> Option<i64> {
        self.props.get(key).and_then(Value::as_i64)
    }
}

impl PageStructure {
    /// Parse a structure from a raw JSON value.
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        serde_json::from_value(value.clone())
            .map_err(|e| CoreError::Validation(format!("Malformed page structure: {e}")))
    }

    /// Number of components of the given type.
    pub fn count_of_type(&self, component_type: &str) -> usize {
        self.components
            .iter()
            .filter(|c| c.component_type == component_type)
            .count()
    }
}

/// Validate that a URL slug matches `^[a-z0-9-]+$`.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    use std::sync::OnceLock;
    static SLUG_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = SLUG_RE.get_or_init(|| regex::Regex::new("^[a-z0-9-]+$").expect("valid regex"));
    if re.is_match(slug) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid slug '{slug}': must match ^[a-z0-9-]+$"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_component_tree() {
        let value = json!({
            "version": "1.0",
            "components": [
                {
                    "id": "hero-1",
                    "type": "Hero",
                    "props": { "headline": "Welcome", "aria_label": "Main hero" },
                    "prompt_metadata": { "maxLength": 50 }
                }
            ]
        });
        let structure = PageStructure::from_value(&value).unwrap();
        assert_eq!(structure.version, "1.0");
        assert_eq!(structure.components.len(), 1);
        assert_eq!(structure.components[0].component_type, "Hero");
        assert_eq!(structure.components[0].prop_str("headline"), Some("Welcome"));
    }

    #[test]
    fn missing_fields_default() {
        let value = json!({ "components": [] });
        let structure = PageStructure::from_value(&value).unwrap();
        assert!(structure.version.is_empty());
        assert!(structure.components.is_empty());
    }

    #[test]
    fn count_of_type_filters() {
        let value = json!({
            "version": "1",
            "components": [
                { "id": "a", "type": "Hero", "props": {} },
                { "id": "b", "type": "CTA", "props": {} },
                { "id": "c", "type": "Hero", "props": {} }
            ]
        });
        let structure = PageStructure::from_value(&value).unwrap();
        assert_eq!(structure.count_of_type(COMPONENT_HERO), 2);
        assert_eq!(structure.count_of_type(COMPONENT_CTA), 1);
        assert_eq!(structure.count_of_type(COMPONENT_MAIN), 0);
    }

    #[test]
    fn valid_slugs_accepted() {
        assert!(validate_slug("about").is_ok());
        assert!(validate_slug("our-services-2").is_ok());
    }

    #[test]
    fn invalid_slugs_rejected() {
        assert!(validate_slug("About").is_err());
        assert!(validate_slug("with space").is_err());
        assert!(validate_slug("slash/slug").is_err());
        assert!(validate_slug("").is_err());
    }
}
