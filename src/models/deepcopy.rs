//! Typed views of DeepCopy API payloads.
//!
//! The raw payload is always retained as `serde_json::Value` for storage;
//! these structs are the typed layer the materializer and injector work
//! against, keyed by the job's API version rather than probed field by field.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::TargetApproach;

/// Remote job status reported by DeepCopy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    Submitted,
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl RemoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        }
    }

    /// Parse the remote status string. Unknown strings return None; the
    /// reconciler leaves local status unchanged for those.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUBMITTED" => Some(Self::Submitted),
            "PENDING" => Some(Self::Pending),
            "RUNNING" => Some(Self::Running),
            "SUCCEEDED" => Some(Self::Succeeded),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status response from `getStatus`, raw body retained alongside the parsed
/// status string.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub status: String,
    pub raw: JsonValue,
}

/// One swipe result (one marketing angle) from a DeepCopy payload.
///
/// Wire field names vary between payload revisions, so parsing folds the
/// known aliases into canonical fields instead of deriving Deserialize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwipeResult {
    pub angle: Option<String>,
    pub headline: Option<String>,
    pub subheadline: Option<String>,
    /// Body copy: a string or an array of paragraphs.
    pub body: Option<JsonValue>,
    pub bullets: Vec<String>,
    pub cta: Option<String>,
}

impl SwipeResult {
    /// Parse a raw swipe object, folding field aliases
    /// (`headline`/`title`, `body`/`content`/`copy`, `cta`/`call_to_action`).
    pub fn from_value(value: &JsonValue) -> Self {
        SwipeResult {
            angle: first_string(value, &["angle", "angle_name"]),
            headline: first_string(value, &["headline", "title"]),
            subheadline: first_string(value, &["subheadline", "subtitle", "hook"]),
            body: ["body", "content", "copy"]
                .iter()
                .find_map(|name| value.get(name))
                .cloned(),
            bullets: value
                .get("bullets")
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|b| b.as_str().map(|s| s.to_string()))
                        .collect()
                })
                .unwrap_or_default(),
            cta: first_string(value, &["cta", "call_to_action", "cta_text"]),
        }
    }
}

/// First present non-empty string among the given field aliases.
fn first_string(value: &JsonValue, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| value.get(name).and_then(|v| v.as_str()))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// v1 result payload: flat sections, a known subset of which may be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct V1Result {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub research_analysis: Option<String>,
    #[serde(default)]
    pub avatar_sheet: Option<String>,
    #[serde(default)]
    pub marketing_angles: Vec<String>,
    /// Swipe results; a list, or a map converted in insertion order.
    #[serde(default)]
    pub swipe_results: Option<JsonValue>,
}

/// v2 result payload: sections nested under `results`, with top-level
/// fallbacks kept for older payload revisions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct V2Result {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub results: Option<V2Sections>,
    #[serde(default)]
    pub swipe_results: Option<JsonValue>,
    #[serde(default)]
    pub avatars: Vec<RemoteAvatar>,
    #[serde(default)]
    pub product_image: Option<String>,
}

/// Nested `results` block of a v2 payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct V2Sections {
    #[serde(default)]
    pub swipe_results: Option<JsonValue>,
    #[serde(default)]
    pub avatars: Vec<RemoteAvatar>,
    #[serde(default)]
    pub product_image: Option<String>,
    #[serde(default)]
    pub marketing_angles: Vec<String>,
}

impl V2Result {
    /// Avatars from the nested block, falling back to top level.
    pub fn avatars(&self) -> &[RemoteAvatar] {
        match &self.results {
            Some(sections) if !sections.avatars.is_empty() => &sections.avatars,
            _ => &self.avatars,
        }
    }

    /// Product screenshot from the nested block, falling back to top level.
    pub fn product_image(&self) -> Option<&str> {
        self.results
            .as_ref()
            .and_then(|s| s.product_image.as_deref())
            .or(self.product_image.as_deref())
    }
}

/// Customer avatar as emitted by the v2 DeepCopy API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteAvatar {
    #[serde(default)]
    pub persona_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age_bracket: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub pains: Vec<String>,
    #[serde(default)]
    pub desires: Vec<String>,
    #[serde(default)]
    pub objections: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Customer avatar in the application schema (what the job row stores and the
/// dashboard renders).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Avatar {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub objections: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Result payload, tagged by the job's API version.
#[derive(Debug, Clone)]
pub enum ResultPayload {
    V1(V1Result),
    V2(V2Result),
}

impl ResultPayload {
    /// Parse the raw payload according to the job's target approach.
    pub fn parse(approach: TargetApproach, raw: &JsonValue) -> AppResult<Self> {
        match approach {
            TargetApproach::V1 => {
                let parsed: V1Result = serde_json::from_value(raw.clone()).map_err(|e| {
                    AppError::Materialization(format!("Failed to parse v1 payload: {}", e))
                })?;
                Ok(Self::V1(parsed))
            }
            TargetApproach::V2 => {
                let parsed: V2Result = serde_json::from_value(raw.clone()).map_err(|e| {
                    AppError::Materialization(format!("Failed to parse v2 payload: {}", e))
                })?;
                Ok(Self::V2(parsed))
            }
        }
    }
}

/// Extract the swipe-result list from a raw payload.
///
/// Looks at `results.swipe_results` first, then top-level `swipe_results`.
/// A map value converts to a list preserving insertion order.
pub fn extract_swipe_results(payload: &JsonValue) -> Vec<JsonValue> {
    let node = payload
        .get("results")
        .and_then(|r| r.get("swipe_results"))
        .or_else(|| payload.get("swipe_results"));

    match node {
        Some(JsonValue::Array(items)) => items.clone(),
        Some(JsonValue::Object(map)) => map.values().cloned().collect(),
        _ => Vec::new(),
    }
}

/// Extract the marketing-angle text list from a raw payload, used to align a
/// user-selected angle with its swipe result.
pub fn extract_marketing_angles(payload: &JsonValue) -> Vec<String> {
    let node = payload
        .get("results")
        .and_then(|r| r.get("marketing_angles"))
        .or_else(|| payload.get("marketing_angles"));

    match node {
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_status_parsing_is_total_over_known_states() {
        for s in ["SUBMITTED", "PENDING", "RUNNING", "SUCCEEDED", "FAILED"] {
            assert_eq!(RemoteStatus::parse(s).unwrap().as_str(), s);
        }
        assert_eq!(RemoteStatus::parse("QUEUED"), None);
        assert_eq!(RemoteStatus::parse("succeeded"), None);
    }

    #[test]
    fn test_extract_swipe_results_nested_and_top_level() {
        let nested = json!({"results": {"swipe_results": [{"angle": "A"}, {"angle": "B"}]}});
        assert_eq!(extract_swipe_results(&nested).len(), 2);

        let top = json!({"swipe_results": [{"angle": "A"}]});
        assert_eq!(extract_swipe_results(&top).len(), 1);

        let neither = json!({"other": 1});
        assert!(extract_swipe_results(&neither).is_empty());
    }

    #[test]
    fn test_extract_swipe_results_map_preserves_insertion_order() {
        let payload = json!({
            "swipe_results": {
                "angle_3": {"headline": "third"},
                "angle_1": {"headline": "first"},
                "angle_2": {"headline": "second"}
            }
        });

        let items = extract_swipe_results(&payload);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["headline"], "third");
        assert_eq!(items[1]["headline"], "first");
        assert_eq!(items[2]["headline"], "second");
    }

    #[test]
    fn test_v2_nested_sections_take_precedence() {
        let raw = json!({
            "product_image": "top.png",
            "results": {
                "product_image": "nested.png",
                "avatars": [{"persona_name": "Ana"}]
            }
        });

        let parsed: V2Result = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.product_image(), Some("nested.png"));
        assert_eq!(parsed.avatars().len(), 1);
    }

    #[test]
    fn test_swipe_result_folds_field_aliases() {
        let raw = json!({
            "angle_name": "Budget",
            "title": "Save big",
            "hook": "Really",
            "copy": "Body text",
            "call_to_action": "Buy",
            "bullets": ["a", "b"]
        });

        let swipe = SwipeResult::from_value(&raw);
        assert_eq!(swipe.angle.as_deref(), Some("Budget"));
        assert_eq!(swipe.headline.as_deref(), Some("Save big"));
        assert_eq!(swipe.subheadline.as_deref(), Some("Really"));
        assert_eq!(swipe.body, Some(json!("Body text")));
        assert_eq!(swipe.bullets, vec!["a", "b"]);
        assert_eq!(swipe.cta.as_deref(), Some("Buy"));
    }

    #[test]
    fn test_swipe_result_canonical_fields_win_over_aliases() {
        let raw = json!({"headline": "Primary", "title": "Secondary"});
        let swipe = SwipeResult::from_value(&raw);
        assert_eq!(swipe.headline.as_deref(), Some("Primary"));
    }

    #[test]
    fn test_result_payload_parse_branches_on_approach() {
        let raw = json!({"project_name": "Acme", "research_analysis": "notes"});
        match ResultPayload::parse(TargetApproach::V1, &raw).unwrap() {
            ResultPayload::V1(v1) => {
                assert_eq!(v1.project_name.as_deref(), Some("Acme"));
                assert_eq!(v1.research_analysis.as_deref(), Some("notes"));
            }
            ResultPayload::V2(_) => panic!("expected v1 payload"),
        }
    }
}
