//! WordPress theme text generation.
//!
//! Pure, deterministic rendering of a project's pages into theme source
//! files. Component rendering dispatches through a lookup table keyed by
//! component type; unknown types emit a visible placeholder comment and
//! never fail. Every user-controlled string is HTML-escaped before being
//! embedded in generated output.

use crate::structure::{Component, PageStructure};

/// HTML-escape a user-controlled string.
///
/// Escapes `&`, `<`, `>`, `"`, and `'` so injected markup appears verbatim
/// as text in the generated theme.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

type RenderFn = fn(&Component) -> String;

/// Render strategies for the known component types. Anything not listed
/// here falls through to the placeholder comment.
const RENDERERS: &[(&str, RenderFn)] = &[
    ("Hero", render_hero),
    ("Main", render_main),
    ("CTA", render_cta),
];

/// Render a single component to theme markup.
pub fn render_component(component: &Component) -> String {
    match RENDERERS
        .iter()
        .find(|(kind, _)| *kind == component.component_type)
    {
        Some((_, render)) => render(component),
        None => format!(
            "<!-- Unknown component type: {} -->\n",
            component.component_type
        ),
    }
}

fn render_hero(component: &Component) -> String {
    let headline = escape_html(component.prop_str("headline").unwrap_or(""));
    let sub = escape_html(component.prop_str("sub").unwrap_or(""));
    let cta = escape_html(component.prop_str("cta").unwrap_or("Learn More"));
    format!(
        "<header>\n    <h1>{headline}</h1>\n    <p>{sub}</p>\n    <a href='#'>{cta}</a>\n</header>\n\n"
    )
}

fn render_main(component: &Component) -> String {
    let content = escape_html(component.prop_str("content").unwrap_or(""));
    format!("<main>\n    {content}\n</main>\n\n")
}

fn render_cta(component: &Component) -> String {
    let text = escape_html(component.prop_str("text").unwrap_or("Click Here"));
    format!("<section class='cta-section'>\n    <a href='#'>{text}</a>\n</section>\n\n")
}

/// Render a page template (`page-{slug}.php`).
///
/// A page with zero components renders a minimal fallback body containing
/// the escaped title and a notice, never an empty file.
pub fn render_page(title: &str, structure: Option<&PageStructure>) -> String {
    let mut out = format!(
        "<?php\n/**\n * Template Name: {title}\n * Generated from SEO Builder\n */\nget_header();\n?>\n\n"
    );

    let components = structure.map(|s| s.components.as_slice()).unwrap_or(&[]);
    if components.is_empty() {
        out.push_str(&format!(
            "<main><h1>{}</h1><p>No content defined for this page.</p></main>\n",
            escape_html(title)
        ));
    } else {
        for component in components {
            out.push_str(&render_component(component));
        }
    }

    out.push_str("\n<?php get_footer(); ?>");
    out
}

/// Render the theme stylesheet (`style.css`).
///
/// The metadata comment block must come first per WordPress convention.
pub fn render_style(project_name: &str, theme_name: &str) -> String {
    format!(
        r#"/*
Theme Name: SEO Builder Project {project_name}
Description: Generated theme for project {project_name}
Author: SEO Builder
Version: 1.0
Text Domain: {theme_name}
*/

body {{
    font-family: system-ui, -apple-system, sans-serif;
    margin: 0;
    padding: 0;
    line-height: 1.6;
}}

header {{
    background: #f8f9fa;
    padding: 2rem 1rem;
    text-align: center;
}}

main {{
    padding: 2rem 1rem;
    max-width: 800px;
    margin: 0 auto;
}}

.cta-section {{
    background: #007cba;
    color: white;
    padding: 2rem 1rem;
    text-align: center;
}}

.cta-section a {{
    color: white;
    text-decoration: none;
    background: rgba(255,255,255,0.2);
    padding: 0.5rem 1rem;
    border-radius: 4px;
}}
"#
    )
}

/// Render the header fragment (`header.php`).
pub fn render_header(project_name: &str) -> String {
    format!(
        r#"<?php
/**
 * Header template for SEO Builder theme
 * Project: {project_name}
 */
?>
<!DOCTYPE html>
<html <?php language_attributes(); ?>>
<head>
    <meta charset="<?php bloginfo('charset'); ?>">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <?php wp_head(); ?>
</head>
<body <?php body_class(); ?>>
<?php wp_body_open(); ?>
"#
    )
}

/// Render the footer fragment (`footer.php`).
pub fn render_footer() -> String {
    "<?php wp_footer(); ?>\n</body>\n</html>\n".to_string()
}

/// Render the fallback index template (`index.php`).
pub fn render_index() -> String {
    r#"<?php
/**
 * Main template file
 * Fallback template for SEO Builder theme
 */
get_header();
?>

<main>
    <?php if (have_posts()) : ?>
        <?php while (have_posts()) : the_post(); ?>
            <article>
                <h1><?php the_title(); ?></h1>
                <div><?php the_content(); ?></div>
            </article>
        <?php endwhile; ?>
    <?php else : ?>
        <p>No content found.</p>
    <?php endif; ?>
</main>

<?php get_footer(); ?>
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn component(value: serde_json::Value) -> Component {
        serde_json::from_value(value).unwrap()
    }

    // -- escape_html ---------------------------------------------------------

    #[test]
    fn escapes_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#039;"
        );
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(escape_html("Hello World"), "Hello World");
    }

    // -- component rendering -------------------------------------------------

    #[test]
    fn hero_renders_escaped_props() {
        let hero = component(json!({
            "id": "h",
            "type": "Hero",
            "props": { "headline": "<script>alert(1)</script>", "sub": "Sub", "cta": "Go" }
        }));
        let out = render_component(&hero);
        assert!(out.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!out.contains("<script>"));
        assert!(out.contains("Go"));
    }

    #[test]
    fn hero_cta_defaults_to_learn_more() {
        let hero = component(json!({
            "id": "h", "type": "Hero", "props": { "headline": "Hi" }
        }));
        assert!(render_component(&hero).contains("Learn More"));
    }

    #[test]
    fn main_renders_content() {
        let main = component(json!({
            "id": "m", "type": "Main", "props": { "content": "Body & text" }
        }));
        let out = render_component(&main);
        assert!(out.contains("<main>"));
        assert!(out.contains("Body &amp; text"));
    }

    #[test]
    fn cta_defaults_to_click_here() {
        let cta = component(json!({ "id": "c", "type": "CTA", "props": {} }));
        assert!(render_component(&cta).contains("Click Here"));
    }

    #[test]
    fn unknown_type_renders_placeholder_comment() {
        let banana = component(json!({ "id": "b", "type": "Banana", "props": {} }));
        let out = render_component(&banana);
        assert_eq!(out, "<!-- Unknown component type: Banana -->\n");
    }

    // -- page rendering ------------------------------------------------------

    #[test]
    fn page_with_components_renders_each() {
        let structure: PageStructure = serde_json::from_value(json!({
            "version": "1.0",
            "components": [
                { "id": "h", "type": "Hero", "props": { "headline": "Hi" } },
                { "id": "x", "type": "Widget", "props": {} }
            ]
        }))
        .unwrap();
        let out = render_page("Home", Some(&structure));
        assert!(out.contains("Template Name: Home"));
        assert!(out.contains("<h1>Hi</h1>"));
        assert!(out.contains("Unknown component type: Widget"));
        assert!(out.contains("get_footer()"));
    }

    #[test]
    fn empty_page_renders_fallback_notice() {
        let out = render_page("Empty <Page>", None);
        assert!(out.contains("No content defined for this page."));
        assert!(out.contains("Empty &lt;Page&gt;"));
    }

    // -- theme fragments -----------------------------------------------------

    #[test]
    fn style_embeds_project_name_and_theme_name() {
        let css = render_style("Test Project", "seobuilder-project-1-20250101-000000");
        assert!(css.starts_with("/*\nTheme Name:"));
        assert!(css.contains("Test Project"));
        assert!(css.contains("seobuilder-project-1-20250101-000000"));
    }

    #[test]
    fn header_contains_wp_hooks() {
        let header = render_header("Test Project");
        assert!(header.contains("wp_head()"));
        assert!(header.contains("language_attributes()"));
        assert!(header.contains("Test Project"));
    }

    #[test]
    fn footer_contains_wp_footer() {
        assert!(render_footer().contains("wp_footer()"));
    }

    #[test]
    fn index_is_fallback_template() {
        let index = render_index();
        assert!(index.contains("have_posts()"));
        assert!(index.contains("No content found."));
    }
}
