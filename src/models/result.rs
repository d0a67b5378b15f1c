//! Result metadata stored as JSONB alongside the generated HTML.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Metadata column of a `job_results` row.
///
/// `full_result` MUST retain the unmodified raw payload: template regeneration
/// reads it back instead of re-querying DeepCopy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Remote DeepCopy job id this result came from.
    pub deepcopy_job_id: String,
    /// The entire raw remote payload, unmodified.
    pub full_result: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// ISO-8601 timestamp carried over from the remote payload, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// v1 or v2.
    pub api_version: String,
    /// When this Result row was derived.
    pub generated_at: String,
    /// Number of swipe results found at materialization time.
    pub html_templates_count: usize,
}

impl ResultMetadata {
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }

    pub fn from_json(value: &JsonValue) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_round_trip_retains_full_result() {
        let raw = json!({"swipe_results": [{"angle": "A"}], "project_name": "Acme"});
        let metadata = ResultMetadata {
            deepcopy_job_id: "dc-123".to_string(),
            full_result: raw.clone(),
            project_name: Some("Acme".to_string()),
            timestamp: None,
            api_version: "v2".to_string(),
            generated_at: "2026-03-01T00:00:00Z".to_string(),
            html_templates_count: 1,
        };

        let parsed = ResultMetadata::from_json(&metadata.to_json()).unwrap();
        assert_eq!(parsed.full_result, raw);
        assert_eq!(parsed.deepcopy_job_id, "dc-123");
        assert_eq!(parsed.html_templates_count, 1);
    }
}
