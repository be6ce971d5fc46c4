//! Normalization and similarity primitives shared by the analyzer.

use std::collections::HashSet;

pub const TOKEN_SET_WEIGHT: f64 = 0.7;
pub const SEQUENCE_WEIGHT: f64 = 0.3;

/// Tokens this short or shorter are ignored by the token-set comparison
const MIN_SET_TOKEN_LEN: usize = 2;

/// Lowercase, drop everything except letters, digits and whitespace, then
/// collapse runs of whitespace into single spaces.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split already-normalized text into words
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

pub fn char_len(token: &str) -> usize {
    token.chars().count()
}

/// Jaccard index over the sets of tokens longer than two characters.
/// Returns 0.0 when neither side has such a token.
pub fn token_set_similarity(words_a: &[&str], words_b: &[&str]) -> f64 {
    let set_a: HashSet<&str> = significant_tokens(words_a);
    let set_b: HashSet<&str> = significant_tokens(words_b);

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

fn significant_tokens<'a>(words: &[&'a str]) -> HashSet<&'a str> {
    words
        .iter()
        .copied()
        .filter(|w| char_len(w) > MIN_SET_TOKEN_LEN)
        .collect()
}

/// Length of the longest common subsequence of two word sequences.
///
/// Classic O(n*m) table, kept to two rows.
pub fn lcs_length(words_a: &[&str], words_b: &[&str]) -> usize {
    // Iterate over the longer sequence so the rows stay short
    let (outer, inner) = if words_a.len() >= words_b.len() {
        (words_a, words_b)
    } else {
        (words_b, words_a)
    };

    if inner.is_empty() {
        return 0;
    }

    let mut previous = vec![0usize; inner.len() + 1];
    let mut current = vec![0usize; inner.len() + 1];

    for outer_word in outer {
        for (j, inner_word) in inner.iter().enumerate() {
            current[j + 1] = if outer_word == inner_word {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[inner.len()]
}

/// LCS length over the longer sequence length; 0.0 when both are empty
pub fn sequence_similarity(words_a: &[&str], words_b: &[&str]) -> f64 {
    let longest = words_a.len().max(words_b.len());
    if longest == 0 {
        return 0.0;
    }

    lcs_length(words_a, words_b) as f64 / longest as f64
}

/// Hybrid similarity of two word sequences in [0, 1].
///
/// `max_sequence_words` bounds the alignment step only; the token sets always
/// cover every word.
pub fn word_similarity(words_a: &[&str], words_b: &[&str], max_sequence_words: usize) -> f64 {
    if !words_a.is_empty() && words_a == words_b {
        return 1.0;
    }

    let token_set = token_set_similarity(words_a, words_b);
    let sequence = sequence_similarity(
        &words_a[..words_a.len().min(max_sequence_words)],
        &words_b[..words_b.len().min(max_sequence_words)],
    );

    (TOKEN_SET_WEIGHT * token_set + SEQUENCE_WEIGHT * sequence).clamp(0.0, 1.0)
}

/// Similarity of two raw texts, normalizing both first
pub fn calculate_similarity(text_a: &str, text_b: &str) -> f64 {
    let normalized_a = normalize(text_a);
    let normalized_b = normalize(text_b);

    word_similarity(
        &tokenize(&normalized_a),
        &tokenize(&normalized_b),
        usize::MAX,
    )
}
