//! Fuzzy phrase overlap

use crate::processing::phrase_extractor::PhraseSet;
use std::collections::BTreeSet;

/// Token-set similarity above this counts as a hit
pub const FUZZY_HIT_THRESHOLD: f64 = 85.0;

/// Indel similarity `2·M / (|a| + |b|)` in [0, 100], where M is the length
/// of the longest common subsequence. Halves round to even.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let matches = longest_common_subsequence(&a, &b);
    round_half_even(200.0 * matches as f64 / (a.len() + b.len()) as f64)
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

fn round_half_even(value: f64) -> f64 {
    let rounded = value.round();
    if (value - value.trunc()).abs() == 0.5 {
        2.0 * (value / 2.0).round()
    } else {
        rounded
    }
}

fn token_set(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn join(tokens: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    tokens
        .into_iter()
        .map(|t| t.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity that ignores word order and duplicates. When one token set is
/// contained in the other the result is 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));

    let combined_a = format!("{} {}", intersection, only_a).trim().to_string();
    let combined_b = format!("{} {}", intersection, only_b).trim().to_string();

    [
        ratio(&intersection, &combined_a),
        ratio(&intersection, &combined_b),
        ratio(&combined_a, &combined_b),
    ]
    .into_iter()
    .fold(0.0, f64::max)
}

/// Percentage of job phrases with at least one close resume phrase, 0 when
/// the job yields no phrases
pub fn fuzzy_overlap_score(job_phrases: &PhraseSet, resume_phrases: &PhraseSet) -> f64 {
    if job_phrases.is_empty() {
        return 0.0;
    }

    let hits = job_phrases
        .iter()
        .filter(|job| {
            resume_phrases
                .iter()
                .any(|resume| token_set_ratio(job, resume) > FUZZY_HIT_THRESHOLD)
        })
        .count();

    (hits as f64 / job_phrases.len() as f64).min(1.0) * 100.0
}
