//! End-to-end packaging tests against local storage.

use std::collections::HashSet;
use std::io::{Cursor, Read};

use chrono::Utc;
use serde_json::json;

use seobuilder_db::models::page::Page;
use seobuilder_db::models::project::Project;
use seobuilder_export::generate_theme;
use seobuilder_storage::{LocalStorage, StorageBackend};

fn project(id: i64, name: &str) -> Project {
    Project {
        id,
        user_id: 1,
        name: name.to_string(),
        keywords: json!([]),
        settings: json!({}),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn page(id: i64, project_id: i64, slug: &str, title: &str, structure: serde_json::Value) -> Page {
    Page {
        id,
        project_id,
        page_type: "home".to_string(),
        slug: slug.to_string(),
        title: title.to_string(),
        meta_description: None,
        page_structure: Some(structure),
        seo_data: None,
        ai_generated_content: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn hero_structure(headline: &str) -> serde_json::Value {
    json!({
        "version": "1.0",
        "components": [
            { "id": "hero-1", "type": "Hero", "props": { "headline": headline } }
        ]
    })
}

async fn archive_entries(
    storage: &LocalStorage,
    archive_path: &str,
) -> (HashSet<String>, zip::ZipArchive<Cursor<Vec<u8>>>) {
    let bytes = storage.get(archive_path).await.unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names = archive.file_names().map(String::from).collect();
    (names, archive)
}

fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
    let mut entry = archive.by_name(name).unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    content
}

#[tokio::test]
async fn archive_contains_exactly_the_theme_files() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());

    let project = project(1, "Test Project");
    let pages = vec![
        page(1, 1, "home", "Home", hero_structure("Welcome")),
        page(2, 1, "contact", "Contact", hero_structure("Reach Us")),
    ];

    let generated = generate_theme(&storage, &project, &pages).await.unwrap();
    assert!(generated.archive_path.ends_with(".zip"));

    let (names, _) = archive_entries(&storage, &generated.archive_path).await;
    let expected: HashSet<String> = [
        "style.css",
        "header.php",
        "footer.php",
        "index.php",
        "page-home.php",
        "page-contact.php",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn staging_directory_is_removed_after_packaging() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());

    let project = project(2, "Cleanup Project");
    let pages = vec![page(1, 2, "home", "Home", hero_structure("Hi"))];

    let generated = generate_theme(&storage, &project, &pages).await.unwrap();

    // Only the archive remains under exports/.
    let leftover = storage.list("exports").await.unwrap();
    assert_eq!(leftover, vec![generated.archive_path.clone()]);

    let staging_dir = generated.archive_path.trim_end_matches(".zip");
    assert!(storage.list(staging_dir).await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_page_project_gets_empty_notice_entry() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());

    let project = project(3, "Empty Project");
    let generated = generate_theme(&storage, &project, &[]).await.unwrap();

    let (names, mut archive) = archive_entries(&storage, &generated.archive_path).await;
    assert!(names.contains("page-empty.php"));
    let content = read_entry(&mut archive, "page-empty.php");
    assert!(content.contains("No content defined for this page"));
}

#[tokio::test]
async fn injected_markup_is_escaped_in_generated_pages() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());

    let project = project(4, "Escape Project");
    let pages = vec![page(
        1,
        4,
        "home",
        "Home",
        hero_structure("<script>alert(1)</script>"),
    )];

    let generated = generate_theme(&storage, &project, &pages).await.unwrap();
    let (_, mut archive) = archive_entries(&storage, &generated.archive_path).await;
    let content = read_entry(&mut archive, "page-home.php");
    assert!(content.contains("&lt;script&gt;"));
    assert!(!content.contains("<script>"));
}

#[tokio::test]
async fn unknown_component_degrades_to_visible_marker() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());

    let project = project(5, "Marker Project");
    let structure = json!({
        "version": "1.0",
        "components": [
            { "id": "h", "type": "Hero", "props": { "headline": "Hi" } },
            { "id": "b", "type": "Banana", "props": {} }
        ]
    });
    let pages = vec![page(1, 5, "home", "Home", structure)];

    let generated = generate_theme(&storage, &project, &pages).await.unwrap();
    let (_, mut archive) = archive_entries(&storage, &generated.archive_path).await;
    let content = read_entry(&mut archive, "page-home.php");
    assert!(content.contains("Unknown component type: Banana"));
}

#[tokio::test]
async fn stylesheet_leads_with_theme_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());

    let project = project(6, "Styled Project");
    let generated = generate_theme(&storage, &project, &[]).await.unwrap();

    let (_, mut archive) = archive_entries(&storage, &generated.archive_path).await;
    let style = read_entry(&mut archive, "style.css");
    assert!(style.starts_with("/*\nTheme Name:"));
    assert!(style.contains("Styled Project"));

    let header = read_entry(&mut archive, "header.php");
    assert!(header.contains("wp_head()"));
    let footer = read_entry(&mut archive, "footer.php");
    assert!(footer.contains("wp_footer()"));
}
