//! Pure angle normalization and matching.
//!
//! Used by the on-demand regeneration path to resolve a user-provided angle
//! string to a swipe result. No I/O: takes strings and lists, returns an
//! index or nothing.

/// Normalize an angle label for comparison: lowercase, collapse whitespace
/// and newlines, trim surrounding quote characters.
pub fn normalize_angle(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string()
}

/// Drop a leading `"Title: "`-style prefix (text up to the first colon).
/// Angle labels are sometimes formatted as `Title: 'Description'`.
fn strip_label_prefix(s: &str) -> &str {
    match s.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => s,
    }
}

/// Compare two angle labels using normalized equality or substring
/// containment, with and without the `"Title: "` prefix.
pub fn angle_matches(candidate: &str, query: &str) -> bool {
    let cand = normalize_angle(candidate);
    let quer = normalize_angle(query);

    if cand.is_empty() || quer.is_empty() {
        return false;
    }

    if cand == quer || cand.contains(&quer) || quer.contains(&cand) {
        return true;
    }

    let cand_stripped = normalize_angle(strip_label_prefix(&cand));
    let quer_stripped = normalize_angle(strip_label_prefix(&quer));

    cand_stripped == quer_stripped
        || cand_stripped.contains(&quer_stripped)
        || quer_stripped.contains(&cand_stripped)
}

/// Resolve a user-provided angle string to a swipe-result index.
///
/// Order: (1) index-alignment against the marketing-angle list (angles and
/// swipe results are emitted in the same order by the remote service), then
/// (2) the swipe results' own angle labels. Returns None if neither matches.
pub fn find_angle_index(
    marketing_angles: &[String],
    swipe_angle_names: &[Option<String>],
    query: &str,
) -> Option<usize> {
    // Index-alignment: the matching marketing-angle position selects the
    // swipe result directly
    if let Some(idx) = marketing_angles
        .iter()
        .position(|angle| angle_matches(angle, query))
        && idx < swipe_angle_names.len()
    {
        return Some(idx);
    }

    // Fallback: search swipe results by their own angle field
    swipe_angle_names
        .iter()
        .position(|name| name.as_deref().is_some_and(|n| angle_matches(n, query)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_and_case() {
        assert_eq!(
            normalize_angle("  Time-Saving\n  AUTOMATION  "),
            "time-saving automation"
        );
    }

    #[test]
    fn test_matches_description_extracted_from_titled_label() {
        assert!(angle_matches(
            "Time-Saving Automation: 'Stop wasting hours on marketing'",
            "Stop wasting hours on marketing"
        ));
    }

    #[test]
    fn test_titled_label_selects_correct_index() {
        // The extracted description must resolve to swipe_results[0], not [1]
        let angles = vec![
            "Time-Saving Automation: 'Stop wasting hours on marketing'".to_string(),
            "Data-Driven Growth".to_string(),
        ];
        let swipe_names = vec![None, None];

        assert_eq!(
            find_angle_index(&angles, &swipe_names, "Stop wasting hours on marketing"),
            Some(0)
        );
        assert_eq!(
            find_angle_index(&angles, &swipe_names, "Data-Driven Growth"),
            Some(1)
        );
    }

    #[test]
    fn test_fallback_to_swipe_result_angle_names() {
        let angles: Vec<String> = Vec::new();
        let swipe_names = vec![
            Some("Budget Friendly".to_string()),
            Some("Premium Quality".to_string()),
        ];

        assert_eq!(
            find_angle_index(&angles, &swipe_names, "premium quality"),
            Some(1)
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        let angles = vec!["Data-Driven Growth".to_string()];
        let swipe_names = vec![Some("Data-Driven Growth".to_string())];

        assert_eq!(find_angle_index(&angles, &swipe_names, "Eco Friendly"), None);
    }

    #[test]
    fn test_empty_query_never_matches() {
        assert!(!angle_matches("Data-Driven Growth", "   "));
    }

    #[test]
    fn test_index_alignment_ignores_out_of_range_angle() {
        // Marketing angle matches at index 1 but only one swipe result exists;
        // fall through to the swipe-name search
        let angles = vec!["First".to_string(), "Second".to_string()];
        let swipe_names = vec![Some("Second".to_string())];

        assert_eq!(find_angle_index(&angles, &swipe_names, "Second"), Some(0));
    }
}
