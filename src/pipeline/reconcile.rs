use super::types::ReconciledMatch;

/// Similarity floor below which a suggestion reports no match.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Fuzzy-match each suggested medicine name against the reference
/// vocabulary. Pure and deterministic: similarity is normalized Levenshtein
/// over lowercased names, the single best candidate at or above `threshold`
/// wins, and ties go to the first-encountered reference entry.
///
/// The vocabulary is only read. A suggestion with no sufficiently similar
/// entry maps to None; whether to register it is the caller's policy.
pub fn reconcile(
    suggested: &[String],
    reference: &[String],
    threshold: f64,
) -> Vec<ReconciledMatch> {
    suggested
        .iter()
        .map(|name| ReconciledMatch {
            suggested_name: name.clone(),
            matched_reference: best_match(name, reference, threshold),
        })
        .collect()
}

fn best_match(name: &str, reference: &[String], threshold: f64) -> Option<String> {
    let needle = name.to_lowercase();
    let mut best: Option<(usize, f64)> = None;

    for (index, candidate) in reference.iter().enumerate() {
        let similarity = strsim::normalized_levenshtein(&needle, &candidate.to_lowercase());
        if similarity >= threshold && best.map_or(true, |(_, score)| similarity > score) {
            best = Some((index, similarity));
        }
    }

    best.map(|(index, _)| reference[index].clone())
}
