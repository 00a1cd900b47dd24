//! Bag-of-words cosine similarity, scaled to a 0–100 "ATS score".
//!
//! Algorithm:
//! 1. Lowercase both texts and tokenize: a token is a run of two or more word
//!    characters (single characters and punctuation are ignored).
//! 2. Count tokens over the vocabulary fitted jointly on both texts.
//! 3. score = cos(a, b) × 100; 0 when either vector is all zeros.
//!
//! Word order is irrelevant; this measures shared vocabulary, not meaning.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Before/after scores for one enhancement run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComparison {
    pub before: f64,
    pub after: f64,
    pub delta: f64,
}

impl ScoreComparison {
    /// Scores the original and merged resume texts against the same job description.
    pub fn compute(job_description: &str, original: &str, merged: &str) -> Self {
        let before = ats_score(job_description, original);
        let after = ats_score(job_description, merged);
        Self {
            before,
            after,
            delta: after - before,
        }
    }
}

/// Cosine similarity of the two texts' token-count vectors, as a percentage.
pub fn ats_score(a: &str, b: &str) -> f64 {
    let counts_a = token_counts(a);
    let counts_b = token_counts(b);

    if counts_a.is_empty() || counts_b.is_empty() {
        return 0.0;
    }

    // Tokens missing from one side contribute zero to the dot product, so the
    // joint vocabulary only matters for the norms.
    let dot: f64 = counts_a
        .iter()
        .filter_map(|(token, &ca)| counts_b.get(token).map(|&cb| ca as f64 * cb as f64))
        .sum();

    let norm_a = norm(&counts_a);
    let norm_b = norm(&counts_b);

    ((dot / (norm_a * norm_b)) * 100.0).clamp(0.0, 100.0)
}

fn token_counts(text: &str) -> HashMap<String, u32> {
    let lowered = text.to_lowercase();
    let mut counts = HashMap::new();
    for token in TOKEN_RE.find_iter(&lowered) {
        *counts.entry(token.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

fn norm(counts: &HashMap<String, u32>) -> f64 {
    counts
        .values()
        .map(|&c| (c as f64) * (c as f64))
        .sum::<f64>()
        .sqrt()
}
