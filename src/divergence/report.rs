use serde::{Deserialize, Serialize};

/// Upper bound on entries in `DivergenceReport::differences`
pub const MAX_DIFFERENCES: usize = 5;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DivergenceLevel {
    Low,
    Medium,
    High,
}

impl DivergenceLevel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for DivergenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    /// Key concepts that only the first response mentions
    ConceptsOnlyInFirst,
    /// Key concepts that only the second response mentions
    ConceptsOnlyInSecond,
    LengthDisparity,
    Contradiction,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Difference {
    pub kind: DifferenceKind,
    pub description: String,
}

impl Difference {
    pub fn new(kind: DifferenceKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }

    pub fn is_concept(&self) -> bool {
        matches!(
            self.kind,
            DifferenceKind::ConceptsOnlyInFirst | DifferenceKind::ConceptsOnlyInSecond
        )
    }
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReportMetadata {
    pub word_count_1: usize,
    pub word_count_2: usize,
    pub word_count_delta: usize,
}

impl ReportMetadata {
    pub fn new(word_count_1: usize, word_count_2: usize) -> Self {
        Self {
            word_count_1,
            word_count_2,
            word_count_delta: word_count_1.abs_diff(word_count_2),
        }
    }
}

/// Outcome of comparing two answers to the same prompt
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DivergenceReport {
    pub similarity: f64,
    pub divergence_level: DivergenceLevel,
    pub differences: Vec<Difference>,
    pub suggested_questions: Vec<String>,
    pub metadata: ReportMetadata,
}

impl DivergenceReport {
    pub fn has_contradiction(&self) -> bool {
        self.differences
            .iter()
            .any(|d| d.kind == DifferenceKind::Contradiction)
    }

    /// Plain difference strings, in report order
    pub fn difference_descriptions(&self) -> Vec<&str> {
        self.differences
            .iter()
            .map(|d| d.description.as_str())
            .collect()
    }

    pub fn similarity_percent(&self) -> u32 {
        (self.similarity * 100.0).round() as u32
    }
}
