//! Swipe-result content extraction and placeholder substitution.
//!
//! Extraction normalizes one parsed swipe result into a flat content map
//! keyed by placeholder name; injection substitutes that map into a
//! template's `{{placeholder}}` slots.

use serde_json::{Map, Value as JsonValue};

use crate::models::SwipeResult;

/// Normalized content map used for injection (JSON object of strings).
pub type ContentMap = Map<String, JsonValue>;

/// Extract a normalized content map from a swipe result.
///
/// Listicle templates get the bullet list rendered as numbered items,
/// everything else as `<li>` tags.
pub fn extract_content(swipe: &SwipeResult, advertorial_type: &str) -> ContentMap {
    let mut content = ContentMap::new();

    if let Some(ref headline) = swipe.headline {
        content.insert("headline".to_string(), JsonValue::String(headline.clone()));
    }

    if let Some(ref subheadline) = swipe.subheadline {
        content.insert(
            "subheadline".to_string(),
            JsonValue::String(subheadline.clone()),
        );
    }

    if let Some(body) = render_body(swipe.body.as_ref()) {
        content.insert("body".to_string(), JsonValue::String(body));
    }

    if let Some(bullets) = render_bullets(&swipe.bullets, advertorial_type) {
        content.insert("bullets".to_string(), JsonValue::String(bullets));
    }

    if let Some(ref cta) = swipe.cta {
        content.insert("cta".to_string(), JsonValue::String(cta.clone()));
    }

    content
}

/// Body copy: a string, or an array of paragraphs joined with `<p>` tags.
fn render_body(body: Option<&JsonValue>) -> Option<String> {
    match body? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Array(paragraphs) => {
            let joined: Vec<String> = paragraphs
                .iter()
                .filter_map(|p| p.as_str())
                .map(|p| format!("<p>{}</p>", p.trim()))
                .collect();
            if joined.is_empty() {
                None
            } else {
                Some(joined.join("\n"))
            }
        }
        _ => None,
    }
}

/// Bullet list. Listicles render numbered items, everything else `<li>` tags.
fn render_bullets(bullets: &[String], advertorial_type: &str) -> Option<String> {
    if bullets.is_empty() {
        return None;
    }

    let rendered = if advertorial_type == "listicle" {
        bullets
            .iter()
            .enumerate()
            .map(|(i, b)| format!("<h3>{}. {}</h3>", i + 1, b))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        bullets
            .iter()
            .map(|b| format!("<li>{}</li>", b))
            .collect::<Vec<_>>()
            .join("\n")
    };

    Some(rendered)
}

/// Substitute a content map into a template's `{{placeholder}}` slots.
///
/// Known placeholders get their content value; any placeholder left over
/// after substitution is removed so partial content still renders cleanly.
pub fn inject_placeholders(template_html: &str, content: &ContentMap) -> String {
    let mut html = template_html.to_string();

    for (key, value) in content {
        if let Some(text) = value.as_str() {
            html = html.replace(&format!("{{{{{}}}}}", key), text);
        }
    }

    remove_unfilled_placeholders(&html)
}

/// Remove remaining `{{...}}` slots.
fn remove_unfilled_placeholders(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        match rest[start..].find("}}") {
            Some(end) => rest = &rest[start + end + 2..],
            None => {
                // Unterminated slot: keep the tail as-is
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_canonical_fields_with_aliases() {
        let swipe = SwipeResult::from_value(&json!({
            "title": "Big Headline",
            "hook": "A hook",
            "copy": "Body text",
            "call_to_action": "Buy now"
        }));

        let content = extract_content(&swipe, "advertorial");
        assert_eq!(content["headline"], "Big Headline");
        assert_eq!(content["subheadline"], "A hook");
        assert_eq!(content["body"], "Body text");
        assert_eq!(content["cta"], "Buy now");
    }

    #[test]
    fn test_body_array_joins_paragraphs() {
        let swipe = SwipeResult::from_value(&json!({"body": ["First.", "Second."]}));
        let content = extract_content(&swipe, "advertorial");
        assert_eq!(content["body"], "<p>First.</p>\n<p>Second.</p>");
    }

    #[test]
    fn test_listicle_bullets_are_numbered() {
        let swipe = SwipeResult::from_value(&json!({"bullets": ["Alpha", "Beta"]}));

        let content = extract_content(&swipe, "listicle");
        assert_eq!(content["bullets"], "<h3>1. Alpha</h3>\n<h3>2. Beta</h3>");

        let content = extract_content(&swipe, "advertorial");
        assert_eq!(content["bullets"], "<li>Alpha</li>\n<li>Beta</li>");
    }

    #[test]
    fn test_empty_swipe_extracts_nothing() {
        let swipe = SwipeResult::from_value(&json!({"notes": 42}));
        assert!(extract_content(&swipe, "advertorial").is_empty());
    }

    #[test]
    fn test_inject_substitutes_and_cleans_leftovers() {
        let mut content = ContentMap::new();
        content.insert("headline".to_string(), json!("Hello"));

        let html = inject_placeholders("<h1>{{headline}}</h1><p>{{body}}</p>", &content);
        assert_eq!(html, "<h1>Hello</h1><p></p>");
    }

    #[test]
    fn test_inject_handles_repeated_placeholders() {
        let mut content = ContentMap::new();
        content.insert("cta".to_string(), json!("Buy"));

        let html = inject_placeholders("{{cta}} and {{cta}}", &content);
        assert_eq!(html, "Buy and Buy");
    }

    #[test]
    fn test_unterminated_placeholder_is_kept() {
        let content = ContentMap::new();
        let html = inject_placeholders("text {{broken", &content);
        assert_eq!(html, "text {{broken");
    }
}
