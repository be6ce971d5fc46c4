use crate::divergence::report::{Difference, DifferenceKind, ReportMetadata, MAX_DIFFERENCES};
use crate::divergence::text::char_len;
use crate::error::SecondOpinionResult;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Concept candidates must be longer than this
const MIN_CONCEPT_LEN: usize = 4;
/// Tokens longer than this count as concepts even when they appear once
const LONG_CONCEPT_LEN: usize = 7;
const MAX_CONCEPTS_PER_TEXT: usize = 10;
const MAX_REPORTED_CONCEPTS: usize = 3;

/// Pick the salient words of one response.
///
/// Words longer than four characters qualify when they repeat or are longer
/// than seven characters. Ordered by frequency, then by first appearance.
pub fn extract_key_concepts(words: &[&str]) -> Vec<String> {
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    let mut discovered: Vec<&str> = Vec::new();

    for word in words.iter().copied().filter(|w| char_len(w) > MIN_CONCEPT_LEN) {
        let count = frequency.entry(word).or_insert(0);
        if *count == 0 {
            discovered.push(word);
        }
        *count += 1;
    }

    let mut concepts: Vec<(&str, usize)> = discovered
        .into_iter()
        .map(|w| (w, frequency[w]))
        .filter(|(w, count)| *count > 1 || char_len(w) > LONG_CONCEPT_LEN)
        .collect();

    // Stable sort keeps discovery order among equal frequencies
    concepts.sort_by(|a, b| b.1.cmp(&a.1));

    concepts
        .into_iter()
        .take(MAX_CONCEPTS_PER_TEXT)
        .map(|(w, _)| w.to_string())
        .collect()
}

/// One polarity check: a statement in one answer and its negation in the other
#[derive(Debug, Clone)]
pub struct ContradictionRule {
    pub label: &'static str,
    affirmative: Regex,
    negative: Regex,
}

impl ContradictionRule {
    pub fn new(label: &'static str, affirmative: &str, negative: &str) -> SecondOpinionResult<Self> {
        Ok(Self {
            label,
            affirmative: Regex::new(affirmative)?,
            negative: Regex::new(negative)?,
        })
    }

    /// True when one text asserts without negating and the other negates
    pub fn matches(&self, text_a: &str, text_b: &str) -> bool {
        let (aff_a, neg_a) = (self.affirmative.is_match(text_a), self.negative.is_match(text_a));
        let (aff_b, neg_b) = (self.affirmative.is_match(text_b), self.negative.is_match(text_b));

        (aff_a && !neg_a && neg_b) || (aff_b && !neg_b && neg_a)
    }
}

/// Ordered rule list; the first matching rule wins.
///
/// Patterns run against normalized text, so contractions appear without
/// their apostrophe ("isnt", "cant").
#[derive(Debug, Clone)]
pub struct ContradictionDetector {
    rules: Vec<ContradictionRule>,
}

impl ContradictionDetector {
    pub fn new() -> SecondOpinionResult<Self> {
        Ok(Self {
            rules: vec![
                ContradictionRule::new(
                    "copula",
                    r"\b(is|are|was|were)\b",
                    r"\b(is|are|was|were)\s+not\b|\b(isnt|arent|wasnt|werent)\b",
                )?,
                ContradictionRule::new(
                    "modal",
                    r"\b(can|could|will|would|should)\b",
                    r"\b(can|could|will|would|should)\s+not\b|\b(cannot|cant|couldnt|wont|wouldnt|shouldnt)\b",
                )?,
                ContradictionRule::new(
                    "assent",
                    r"\b(yes|correct|true|right)\b",
                    r"\b(no|incorrect|false|wrong)\b",
                )?,
            ],
        })
    }

    pub fn with_rules(rules: Vec<ContradictionRule>) -> Self {
        Self { rules }
    }

    /// Label of the first rule that fires, if any
    pub fn detect(&self, text_a: &str, text_b: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(text_a, text_b))
            .map(|rule| rule.label)
    }
}

/// Inputs the difference rules look at, all derived from normalized text
pub struct ComparedTexts<'a> {
    pub normalized_a: &'a str,
    pub normalized_b: &'a str,
    pub words_a: &'a [&'a str],
    pub words_b: &'a [&'a str],
    pub metadata: ReportMetadata,
}

/// Run the difference rules in precedence order: concepts, length,
/// contradiction. The result never holds more than `MAX_DIFFERENCES`.
pub fn find_differences(
    texts: &ComparedTexts<'_>,
    contradictions: &ContradictionDetector,
    min_word_difference: usize,
) -> Vec<Difference> {
    let mut differences = Vec::new();

    let concepts_a = extract_key_concepts(texts.words_a);
    let concepts_b = extract_key_concepts(texts.words_b);

    if let Some(only_a) = exclusive_concepts(&concepts_a, &concepts_b) {
        differences.push(Difference::new(
            DifferenceKind::ConceptsOnlyInFirst,
            format!("Response 1 mentions: {}", only_a),
        ));
    }
    if let Some(only_b) = exclusive_concepts(&concepts_b, &concepts_a) {
        differences.push(Difference::new(
            DifferenceKind::ConceptsOnlyInSecond,
            format!("Response 2 mentions: {}", only_b),
        ));
    }

    let meta = texts.metadata;
    if meta.word_count_delta >= min_word_difference && meta.word_count_delta > 0 {
        let longer = if meta.word_count_1 > meta.word_count_2 { 1 } else { 2 };
        differences.push(Difference::new(
            DifferenceKind::LengthDisparity,
            format!(
                "Response {} is more detailed ({} more words)",
                longer, meta.word_count_delta
            ),
        ));
    }

    if let Some(label) = contradictions.detect(texts.normalized_a, texts.normalized_b) {
        tracing::debug!(rule = label, "Contradiction heuristic fired");
        differences.push(Difference::new(
            DifferenceKind::Contradiction,
            "The responses may contain contradictory statements",
        ));
    }

    differences.truncate(MAX_DIFFERENCES);
    differences
}

fn exclusive_concepts(ours: &[String], theirs: &[String]) -> Option<String> {
    let theirs: HashSet<&str> = theirs.iter().map(String::as_str).collect();
    let exclusive: Vec<&str> = ours
        .iter()
        .map(String::as_str)
        .filter(|c| !theirs.contains(c))
        .take(MAX_REPORTED_CONCEPTS)
        .collect();

    if exclusive.is_empty() {
        None
    } else {
        Some(exclusive.join(", "))
    }
}
