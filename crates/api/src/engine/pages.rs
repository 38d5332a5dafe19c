//! Page creation from archetype blueprints.

use sqlx::PgExecutor;

use seobuilder_core::archetype::PageBlueprint;
use seobuilder_core::error::CoreError;
use seobuilder_core::types::DbId;
use seobuilder_core::validation::structure::{check_blueprint_seo, check_blueprint_structure};
use seobuilder_db::models::page::{CreatePage, Page};
use seobuilder_db::repositories::PageRepo;

/// Robots directive applied when a blueprint's SEO map omits one.
pub const DEFAULT_ROBOTS: &str = "index,follow";

/// Convert a blueprint into a page insert, applying SEO defaults and
/// enforcing the archetype-path validation rules (Hero count per page
/// type, required `seo_data.schema`/`keywords`).
pub fn blueprint_to_create_page(blueprint: &PageBlueprint) -> Result<CreatePage, CoreError> {
    let structure = blueprint
        .page_structure
        .as_ref()
        .ok_or_else(|| CoreError::Validation("page_structure: Field is required".into()))?;

    let mut seo_data = blueprint.seo_data.clone();
    seo_data
        .entry("robots".to_string())
        .or_insert_with(|| serde_json::Value::String(DEFAULT_ROBOTS.to_string()));

    let mut violations = check_blueprint_structure(&blueprint.page_type, structure);
    violations.extend(check_blueprint_seo(&seo_data));
    if !violations.is_empty() {
        return Err(CoreError::from_violations(&violations));
    }

    Ok(CreatePage {
        page_type: blueprint.page_type.clone(),
        slug: blueprint.slug.clone(),
        title: blueprint.title.clone(),
        meta_description: blueprint.meta_description.clone(),
        page_structure: Some(
            serde_json::to_value(structure)
                .map_err(|e| CoreError::Internal(format!("Cannot serialize structure: {e}")))?,
        ),
        seo_data: Some(serde_json::Value::Object(seo_data)),
        ai_generated_content: None,
    })
}

/// Create and persist one page from a blueprint.
///
/// Takes any executor so the archetype applier can run the whole blueprint
/// inside a single transaction.
pub async fn create_page_from_blueprint<'e, E>(
    executor: E,
    project_id: DbId,
    blueprint: &PageBlueprint,
) -> Result<Page, CoreError>
where
    E: PgExecutor<'e>,
{
    let input = blueprint_to_create_page(blueprint)?;
    PageRepo::create_with(executor, project_id, &input)
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seobuilder_core::archetype::ArchetypeCatalog;

    #[test]
    fn robots_defaults_when_absent() {
        let mut blueprint = ArchetypeCatalog::builtin().get("default").pages[0].clone();
        blueprint.seo_data.remove("robots");

        let input = blueprint_to_create_page(&blueprint).unwrap();
        let seo = input.seo_data.unwrap();
        assert_eq!(seo["robots"], DEFAULT_ROBOTS);
    }

    #[test]
    fn existing_robots_directive_preserved() {
        let mut blueprint = ArchetypeCatalog::builtin().get("default").pages[0].clone();
        blueprint
            .seo_data
            .insert("robots".into(), serde_json::json!("noindex"));

        let input = blueprint_to_create_page(&blueprint).unwrap();
        assert_eq!(input.seo_data.unwrap()["robots"], "noindex");
    }

    #[test]
    fn home_blueprint_without_hero_rejected() {
        let mut blueprint = ArchetypeCatalog::builtin().get("default").pages[0].clone();
        let structure = blueprint.page_structure.as_mut().unwrap();
        structure.components.retain(|c| c.component_type != "Hero");

        let err = blueprint_to_create_page(&blueprint).unwrap_err();
        assert!(err.to_string().contains("Hero"));
    }

    #[test]
    fn missing_seo_schema_rejected() {
        let mut blueprint = ArchetypeCatalog::builtin().get("default").pages[0].clone();
        blueprint.seo_data.remove("schema");

        let err = blueprint_to_create_page(&blueprint).unwrap_err();
        assert!(err.to_string().contains("seo_data.schema"));
    }

    #[test]
    fn builtin_blueprints_convert_cleanly() {
        let catalog = ArchetypeCatalog::builtin();
        for name in ["services", "products", "professional", "portfolio", "default"] {
            for blueprint in &catalog.get(name).pages {
                let input = blueprint_to_create_page(blueprint)
                    .unwrap_or_else(|e| panic!("{name}/{}: {e}", blueprint.slug));
                assert!(input.seo_data.is_some());
                assert!(input.page_structure.is_some());
            }
        }
    }
}
