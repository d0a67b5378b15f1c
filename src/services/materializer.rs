//! Result materialization service.
//!
//! Turns a raw DeepCopy payload into the persisted Result row and the derived
//! artifacts on the job: a readable HTML summary for v1 jobs, transformed
//! avatars and the product screenshot for v2 jobs. Re-running against the same
//! payload re-derives and overwrites the same content.

use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::info;

use crate::config::Config;
use crate::db::DbPool;
use crate::entity::job;
use crate::error::AppResult;
use crate::models::{
    Avatar, RemoteAvatar, ResultMetadata, ResultPayload, TargetApproach, extract_swipe_results,
};
use crate::services::sanitize;

/// Materialize a raw result payload for a job.
///
/// Invoked by the reconciler on the completed transition and by the manual
/// reprocess endpoint. Tolerates repeat invocations: the Result row is
/// re-derived from the same payload.
pub async fn materialize(
    pool: &DbPool,
    config: &Config,
    job: &job::Model,
    raw_payload: &JsonValue,
    remote_job_id: &str,
) -> AppResult<()> {
    // The development datastore rejects NUL bytes inside text values
    let raw = if config.sanitize_payloads() {
        sanitize::strip_null_bytes(raw_payload.clone())
    } else {
        raw_payload.clone()
    };

    let approach = TargetApproach::parse(&job.target_approach).unwrap_or(TargetApproach::V2);
    let payload = ResultPayload::parse(approach, &raw)?;
    let swipe_count = extract_swipe_results(&raw).len();

    let (html_content, project_name) = match &payload {
        ResultPayload::V1(v1) => (build_v1_summary(v1, swipe_count), v1.project_name.clone()),
        ResultPayload::V2(v2) => {
            // v2 stores structured JSON; derived artifacts land on the job row
            let avatars = transform_avatars(v2.avatars());
            let avatars_json = if avatars.is_empty() {
                None
            } else {
                Some(serde_json::to_value(&avatars)?)
            };
            let product_image = v2.product_image().map(|s| s.to_string());

            if avatars_json.is_some() || product_image.is_some() {
                pool.update_job_materialized(job.id, avatars_json, product_image)
                    .await?;
            }

            (String::new(), v2.project_name.clone())
        }
    };

    let timestamp = raw_timestamp(&raw);
    let metadata = ResultMetadata {
        deepcopy_job_id: remote_job_id.to_string(),
        full_result: raw,
        project_name,
        timestamp,
        api_version: approach.as_str().to_string(),
        generated_at: Utc::now().to_rfc3339(),
        html_templates_count: swipe_count,
    };

    pool.upsert_result(job.id, html_content, metadata.to_json())
        .await?;

    info!(
        "Materialized result: job_id={}, api_version={}, swipe_results={}",
        job.id, approach, swipe_count
    );

    Ok(())
}

/// ISO timestamp carried over from the remote payload, if present.
fn raw_timestamp(payload: &JsonValue) -> Option<String> {
    ["timestamp", "generated_at"]
        .iter()
        .find_map(|name| payload.get(name).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

/// Build a human-readable HTML summary from whichever v1 sections are present.
///
/// Deterministic for a given payload, so re-materialization produces an
/// identical document.
pub fn build_v1_summary(result: &crate::models::V1Result, swipe_count: usize) -> String {
    let mut sections = Vec::new();

    if let Some(ref name) = result.project_name {
        sections.push(format!("<h1>{}</h1>", name));
    } else {
        sections.push("<h1>Research Results</h1>".to_string());
    }

    if let Some(ref analysis) = result.research_analysis {
        sections.push(format!(
            "<section><h2>Research Analysis</h2>\n{}</section>",
            analysis
        ));
    }

    if let Some(ref sheet) = result.avatar_sheet {
        sections.push(format!(
            "<section><h2>Customer Avatars</h2>\n{}</section>",
            sheet
        ));
    }

    if !result.marketing_angles.is_empty() {
        let items: Vec<String> = result
            .marketing_angles
            .iter()
            .map(|a| format!("<li>{}</li>", a))
            .collect();
        sections.push(format!(
            "<section><h2>Marketing Angles</h2>\n<ul>{}</ul></section>",
            items.join("\n")
        ));
    }

    sections.push(format!(
        "<section><h2>Swipe Results</h2><p>{} swipe result(s) generated.</p></section>",
        swipe_count
    ));

    format!(
        "<!DOCTYPE html>\n<html>\n<body>\n{}\n</body>\n</html>",
        sections.join("\n")
    )
}

/// Transform remote v2 avatars into the application avatar schema.
pub fn transform_avatars(remote: &[RemoteAvatar]) -> Vec<Avatar> {
    remote
        .iter()
        .enumerate()
        .map(|(i, avatar)| Avatar {
            name: avatar
                .persona_name
                .clone()
                .or_else(|| avatar.name.clone())
                .unwrap_or_else(|| format!("Avatar {}", i + 1)),
            age_range: avatar.age_bracket.clone(),
            occupation: avatar.occupation.clone(),
            pain_points: avatar.pains.clone(),
            goals: avatar.desires.clone(),
            objections: avatar.objections.clone(),
            summary: avatar.bio.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::V1Result;
    use serde_json::json;

    #[test]
    fn test_v1_summary_includes_present_sections_only() {
        let result = V1Result {
            project_name: Some("Acme Widget".to_string()),
            research_analysis: Some("<p>Deep analysis</p>".to_string()),
            avatar_sheet: None,
            marketing_angles: vec!["Angle one".to_string()],
            swipe_results: None,
        };

        let html = build_v1_summary(&result, 3);
        assert!(html.contains("<h1>Acme Widget</h1>"));
        assert!(html.contains("Deep analysis"));
        assert!(!html.contains("Customer Avatars"));
        assert!(html.contains("<li>Angle one</li>"));
        assert!(html.contains("3 swipe result(s)"));
    }

    #[test]
    fn test_v1_summary_is_deterministic() {
        let result = V1Result {
            project_name: None,
            research_analysis: Some("analysis".to_string()),
            avatar_sheet: Some("avatars".to_string()),
            marketing_angles: Vec::new(),
            swipe_results: None,
        };

        assert_eq!(build_v1_summary(&result, 2), build_v1_summary(&result, 2));
    }

    #[test]
    fn test_avatar_transform_maps_remote_schema() {
        let remote: Vec<RemoteAvatar> = serde_json::from_value(json!([
            {
                "persona_name": "Busy Beth",
                "age_bracket": "35-44",
                "occupation": "Agency owner",
                "pains": ["No time"],
                "desires": ["Automation"],
                "objections": ["Price"],
                "bio": "Runs a small agency."
            }
        ]))
        .unwrap();

        let avatars = transform_avatars(&remote);
        assert_eq!(avatars.len(), 1);
        assert_eq!(avatars[0].name, "Busy Beth");
        assert_eq!(avatars[0].age_range.as_deref(), Some("35-44"));
        assert_eq!(avatars[0].pain_points, vec!["No time"]);
        assert_eq!(avatars[0].goals, vec!["Automation"]);
        assert_eq!(avatars[0].summary.as_deref(), Some("Runs a small agency."));
    }

    #[test]
    fn test_avatar_transform_synthesizes_missing_names() {
        let remote = vec![RemoteAvatar::default(), RemoteAvatar::default()];
        let avatars = transform_avatars(&remote);
        assert_eq!(avatars[0].name, "Avatar 1");
        assert_eq!(avatars[1].name, "Avatar 2");
    }

    #[test]
    fn test_avatar_round_trip_through_job_schema() {
        // Job.avatars must equal the transform applied to the payload's
        // avatar section
        let remote: Vec<RemoteAvatar> = serde_json::from_value(json!([
            {"persona_name": "Ana", "pains": ["a"], "desires": ["b"]}
        ]))
        .unwrap();

        let avatars = transform_avatars(&remote);
        let stored = serde_json::to_value(&avatars).unwrap();
        let reloaded: Vec<Avatar> = serde_json::from_value(stored).unwrap();
        assert_eq!(reloaded, avatars);
    }
}
