//! Template injection service.
//!
//! Injects each marketing angle of a completed job into an injectable
//! template, producing one finished HTML document per angle. Per-angle
//! failures are counted and never abort the batch; zero angles is a success.

use serde_json::Value as JsonValue;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entity::{injectable_template, job};
use crate::error::{AppError, AppResult};
use crate::models::{
    GeneratedTemplate, InjectionSummary, ResultMetadata, SwipeResult, extract_marketing_angles,
    extract_swipe_results,
};
use crate::services::{angle_match, content};

/// Historical template ids mapped to their canonical injectable-template ids.
/// Jobs created by older dashboard versions carry the legacy ids.
const CANONICAL_TEMPLATE_ALIASES: &[(&str, &str)] = &[
    ("template_1", "classic-advertorial"),
    ("template_2", "modern-advertorial"),
    ("template_3", "modern-listicle"),
    ("advertorial-default", "classic-advertorial"),
    ("listicle-default", "modern-listicle"),
];

/// Resolve the injectable template for a job.
///
/// Order: exact template id, canonical alias of the template id, newest
/// template matching the advertorial type.
pub async fn resolve_template(
    pool: &DbPool,
    template_id: Option<&str>,
    advertorial_type: &str,
) -> AppResult<injectable_template::Model> {
    if let Some(id) = template_id {
        if let Some(template) = pool.get_injectable_template(id).await? {
            return Ok(template);
        }

        if let Some((_, canonical)) = CANONICAL_TEMPLATE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == id)
            && let Some(template) = pool.get_injectable_template(canonical).await?
        {
            return Ok(template);
        }
    }

    pool.latest_injectable_template_for_type(advertorial_type)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Injectable template for advertorial type '{}'",
                advertorial_type
            ))
        })
}

/// Angle label for a swipe result: explicit field, else "Angle {i+1}".
fn angle_name_for(swipe: &SwipeResult, index: usize) -> String {
    swipe
        .angle
        .clone()
        .unwrap_or_else(|| format!("Angle {}", index + 1))
}

/// Angle labels of all swipe results, for matching.
fn swipe_angle_names(swipes: &[JsonValue]) -> Vec<Option<String>> {
    swipes
        .iter()
        .map(|swipe| SwipeResult::from_value(swipe).angle)
        .collect()
}

/// One fully rendered angle, ready to persist.
#[derive(Debug, Clone)]
pub struct AngleDocument {
    /// 1-based position in the swipe_results array.
    pub angle_index: i32,
    pub angle_name: String,
    pub html: String,
    pub content: content::ContentMap,
}

/// Render one swipe result against a template. Pure: no I/O.
fn render_angle(
    template_html: &str,
    swipe: &JsonValue,
    advertorial_type: &str,
    index: usize,
) -> Result<AngleDocument, String> {
    let parsed = SwipeResult::from_value(swipe);
    let extracted = content::extract_content(&parsed, advertorial_type);
    if extracted.is_empty() {
        return Err(format!(
            "swipe result {} has no extractable content",
            index + 1
        ));
    }

    let html = content::inject_placeholders(template_html, &extracted);

    Ok(AngleDocument {
        angle_index: (index + 1) as i32,
        angle_name: angle_name_for(&parsed, index),
        html,
        content: extracted,
    })
}

/// Render every angle of a payload. Failures are per-angle: a broken swipe
/// result never takes down its neighbors.
pub fn render_angles(
    template_html: &str,
    swipes: &[JsonValue],
    advertorial_type: &str,
) -> (Vec<AngleDocument>, usize) {
    let mut documents = Vec::with_capacity(swipes.len());
    let mut errors = 0usize;

    for (i, swipe) in swipes.iter().enumerate() {
        match render_angle(template_html, swipe, advertorial_type, i) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                warn!("Angle rendering failed: {}", e);
                errors += 1;
            }
        }
    }

    (documents, errors)
}

/// Generate injected templates for every angle in the payload.
///
/// One row per angle; `(job_id, angle_index)` conflicts mean another call got
/// there first and count as generated. Individual angle failures are logged
/// and counted without stopping the rest of the batch.
pub async fn generate_injected_templates(
    pool: &DbPool,
    job: &job::Model,
    payload: &JsonValue,
) -> AppResult<InjectionSummary> {
    let template = resolve_template(pool, job.template_id.as_deref(), &job.advertorial_type).await?;

    let swipes = extract_swipe_results(payload);
    if swipes.is_empty() {
        // Not an error: the job is complete, angle files can be produced on
        // demand once swipe results exist
        info!("No swipe results for job {}; nothing to inject", job.id);
        return Ok(InjectionSummary {
            success: true,
            generated: 0,
            total: 0,
            errors: 0,
            message: Some(
                "No swipe results found in the job payload; templates can be generated on demand."
                    .to_string(),
            ),
        });
    }

    let total = swipes.len();
    let (documents, mut errors) = render_angles(&template.html, &swipes, &job.advertorial_type);
    let mut generated = 0usize;

    for doc in documents {
        match pool
            .insert_injected_template(
                Uuid::now_v7(),
                job.id,
                doc.angle_index,
                &doc.angle_name,
                &doc.html,
                &template.id,
                Some(JsonValue::Object(doc.content)),
            )
            .await
        {
            Ok(inserted) => {
                if !inserted {
                    // Concurrent reconcile already wrote this angle
                    info!(
                        "Angle {} of job {} already generated, skipping",
                        doc.angle_index, job.id
                    );
                }
                generated += 1;
            }
            Err(e) => {
                warn!(
                    "Failed to persist angle {} of job {}: {}",
                    doc.angle_index, job.id, e
                );
                errors += 1;
            }
        }
    }

    info!(
        "Template generation for job {}: {}/{} angles, {} errors",
        job.id, generated, total, errors
    );

    Ok(InjectionSummary {
        success: generated > 0,
        generated,
        total,
        errors,
        message: None,
    })
}

/// Generate a single template on demand for a user-selected angle.
///
/// Reads the stored result payload (never re-queries DeepCopy), matches the
/// angle string against the job's marketing angles and swipe results, and
/// injects into the requested template. The rendered document is returned
/// without replacing the job's stored batch.
pub async fn generate_single_template(
    pool: &DbPool,
    job: &job::Model,
    template_id: &str,
    angle_query: &str,
) -> AppResult<GeneratedTemplate> {
    let result_row = pool
        .get_result(job.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Results for job {}", job.id)))?;

    let metadata = ResultMetadata::from_json(&result_row.metadata).ok_or_else(|| {
        AppError::Materialization(format!("Stored metadata for job {} is unreadable", job.id))
    })?;

    let swipes = extract_swipe_results(&metadata.full_result);
    let angles = extract_marketing_angles(&metadata.full_result);
    let names = swipe_angle_names(&swipes);

    let index = angle_match::find_angle_index(&angles, &names, angle_query).ok_or_else(|| {
        let available = if angles.is_empty() {
            names
                .iter()
                .flatten()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            angles.join(", ")
        };
        AppError::NotFound(format!(
            "Marketing angle '{}' in job results (available: {})",
            angle_query, available
        ))
    })?;

    let template = pool
        .get_injectable_template(template_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Injectable template {}", template_id)))?;

    let doc = render_angle(&template.html, &swipes[index], &job.advertorial_type, index)
        .map_err(AppError::Materialization)?;

    Ok(GeneratedTemplate {
        id: Uuid::now_v7(),
        angle: doc.angle_name,
        template_id: template.id,
        html: doc.html,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_angle_name_prefers_explicit_field() {
        let swipe = SwipeResult::from_value(&json!({"angle": "Budget Friendly"}));
        assert_eq!(angle_name_for(&swipe, 0), "Budget Friendly");

        let swipe = SwipeResult::from_value(&json!({"angle_name": "Premium"}));
        assert_eq!(angle_name_for(&swipe, 2), "Premium");

        let swipe = SwipeResult::from_value(&json!({"headline": "No angle here"}));
        assert_eq!(angle_name_for(&swipe, 2), "Angle 3");
    }

    #[test]
    fn test_swipe_angle_names_keep_positions() {
        let swipes = vec![json!({"angle": "A"}), json!({"headline": "x"})];
        let names = swipe_angle_names(&swipes);
        assert_eq!(names, vec![Some("A".to_string()), None]);
    }

    #[test]
    fn test_render_angles_isolates_per_angle_failures() {
        // Angle 2 of 3 has nothing to extract; angles 1 and 3 still render
        let swipes = vec![
            json!({"angle": "First", "headline": "One"}),
            json!({"notes": 42}),
            json!({"angle": "Third", "headline": "Three"}),
        ];

        let (documents, errors) = render_angles("<h1>{{headline}}</h1>", &swipes, "advertorial");

        assert_eq!(documents.len(), 2);
        assert_eq!(errors, 1);
        assert_eq!(documents[0].angle_index, 1);
        assert_eq!(documents[1].angle_index, 3);
        assert_eq!(documents[0].html, "<h1>One</h1>");
        assert_eq!(documents[1].html, "<h1>Three</h1>");
    }

    #[test]
    fn test_render_angle_keeps_content_for_config_data() {
        let swipe = json!({"headline": "One", "cta": "Go"});
        let doc = render_angle("<h1>{{headline}}</h1>", &swipe, "advertorial", 0).unwrap();
        assert_eq!(doc.content["headline"], "One");
        assert_eq!(doc.content["cta"], "Go");
        assert_eq!(doc.angle_name, "Angle 1");
    }
}
