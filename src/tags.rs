//! Tag normalization and completion for comma-separated tag input

use crate::search::ratio;

/// Most suggestions returned by [`complete`]
pub const MAX_SUGGESTIONS: usize = 10;

const PREFIX_SCORE: f64 = 100.0;
const SUBSTRING_SCORE: f64 = 80.0;
/// Typo matches below this similarity are not suggested
const MIN_FUZZY_SCORE: f64 = 70.0;

/// Lowercase, spaces to dashes, then keep only alphanumerics, `-` and `_`.
///
/// Also used to derive snippet ids from names.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Split `"python, Web Dev,  "` into `["python", "web-dev"]`
pub fn parse_tag_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(normalize_tag)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// The tag currently being typed: whatever follows the last comma
pub fn current_tag(input: &str) -> &str {
    match input.rfind(',') {
        Some(idx) => input[idx + 1..].trim_start(),
        None => input,
    }
}

/// Suggest tags for a partial entry.
///
/// Prefix matches rank above substring matches, which rank above typo
/// matches. Ties are broken alphabetically. A blank partial lists the
/// first tags as given.
pub fn complete<'a>(all_tags: &'a [String], partial: &str) -> Vec<&'a str> {
    let needle = partial.trim().to_lowercase();
    if needle.is_empty() {
        return all_tags
            .iter()
            .take(MAX_SUGGESTIONS)
            .map(String::as_str)
            .collect();
    }

    let mut scored: Vec<(&str, f64)> = all_tags
        .iter()
        .filter_map(|tag| {
            let lowered = tag.to_lowercase();
            let score = if lowered.starts_with(&needle) {
                PREFIX_SCORE
            } else if lowered.contains(&needle) {
                SUBSTRING_SCORE
            } else {
                let fuzzy = ratio(&needle, &lowered);
                if fuzzy < MIN_FUZZY_SCORE {
                    return None;
                }
                fuzzy
            };
            Some((tag.as_str(), score))
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(tag, _)| tag)
        .collect()
}
