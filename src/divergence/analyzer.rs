use crate::config::DivergenceConfig;
use crate::divergence::differences::{find_differences, ComparedTexts, ContradictionDetector};
use crate::divergence::questions::{self, suggest_questions};
use crate::divergence::report::{DivergenceLevel, DivergenceReport, ReportMetadata};
use crate::divergence::text::{normalize, tokenize, word_similarity};
use crate::error::SecondOpinionResult;

/// Compares two answers to the same prompt.
///
/// Holds no per-call state, so one analyzer can be shared across threads.
#[derive(Debug, Clone)]
pub struct DivergenceAnalyzer {
    config: DivergenceConfig,
    contradictions: ContradictionDetector,
}

impl DivergenceAnalyzer {
    pub fn new(config: DivergenceConfig) -> SecondOpinionResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            contradictions: ContradictionDetector::new()?,
        })
    }

    pub fn with_detector(
        config: DivergenceConfig,
        contradictions: ContradictionDetector,
    ) -> SecondOpinionResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            contradictions,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Build a report for the pair, or `None` when analysis is switched off.
    ///
    /// `None` means "not analyzed"; it is never a stand-in for an empty report.
    pub fn analyze(&self, response_a: &str, response_b: &str) -> Option<DivergenceReport> {
        if !self.config.enabled {
            return None;
        }

        let normalized_a = normalize(response_a);
        let normalized_b = normalize(response_b);
        let words_a = tokenize(&normalized_a);
        let words_b = tokenize(&normalized_b);

        let similarity = word_similarity(&words_a, &words_b, self.config.max_compare_words);
        let level = self.classify(similarity);
        let metadata = ReportMetadata::new(words_a.len(), words_b.len());

        let differences = find_differences(
            &ComparedTexts {
                normalized_a: &normalized_a,
                normalized_b: &normalized_b,
                words_a: &words_a,
                words_b: &words_b,
                metadata,
            },
            &self.contradictions,
            self.config.min_word_difference,
        );

        let suggested_questions = if self.config.follow_up_questions {
            suggest_questions(level, &differences, self.config.max_questions)
        } else {
            Vec::new()
        };

        tracing::debug!(
            similarity,
            level = level.name(),
            differences = differences.len(),
            questions = suggested_questions.len(),
            "Analyzed response divergence"
        );

        Some(DivergenceReport {
            similarity,
            divergence_level: level,
            differences,
            suggested_questions,
            metadata,
        })
    }

    pub fn classify(&self, similarity: f64) -> DivergenceLevel {
        if similarity >= self.config.low_threshold {
            DivergenceLevel::Low
        } else if similarity >= self.config.medium_threshold {
            DivergenceLevel::Medium
        } else {
            DivergenceLevel::High
        }
    }

    pub fn summary(&self, report: &DivergenceReport, language: &str) -> &'static str {
        questions::summary(report, language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divergence::differences::ContradictionRule;
    use crate::divergence::report::DifferenceKind;

    fn analyzer() -> DivergenceAnalyzer {
        DivergenceAnalyzer::new(DivergenceConfig::default()).unwrap()
    }

    #[test]
    fn disabled_analyzer_returns_none() {
        let analyzer = DivergenceAnalyzer::new(DivergenceConfig {
            enabled: false,
            ..Default::default()
        })
        .unwrap();

        assert!(!analyzer.is_enabled());
        assert!(analyzer.analyze("a", "b").is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = DivergenceAnalyzer::new(DivergenceConfig {
            low_threshold: 0.5,
            medium_threshold: 0.5,
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn classification_boundaries_are_inclusive() {
        let analyzer = analyzer();
        assert_eq!(analyzer.classify(0.8), DivergenceLevel::Low);
        assert_eq!(analyzer.classify(0.79), DivergenceLevel::Medium);
        assert_eq!(analyzer.classify(0.5), DivergenceLevel::Medium);
        assert_eq!(analyzer.classify(0.49), DivergenceLevel::High);
        assert_eq!(analyzer.classify(0.0), DivergenceLevel::High);
    }

    #[test]
    fn identical_answers_are_low_and_quiet() {
        let text = "Use a mutex to guard the shared counter.";
        let report = analyzer().analyze(text, text).unwrap();

        assert_eq!(report.similarity, 1.0);
        assert_eq!(report.divergence_level, DivergenceLevel::Low);
        assert!(report.differences.is_empty());
        assert!(report.suggested_questions.is_empty());
        assert_eq!(report.metadata.word_count_delta, 0);
    }

    #[test]
    fn polarity_flip_raises_contradiction() {
        let report = analyzer()
            .analyze("The cat is happy.", "The cat is not happy.")
            .unwrap();

        assert!(report.similarity > 0.7);
        assert!(report.divergence_level >= DivergenceLevel::Medium);
        assert!(report.has_contradiction());
        assert_eq!(report.metadata.word_count_1, 4);
        assert_eq!(report.metadata.word_count_2, 5);
        assert_eq!(report.metadata.word_count_delta, 1);

        // three canned questions plus the two contradiction follow-ups
        assert_eq!(report.suggested_questions.len(), 5);
    }

    #[test]
    fn follow_ups_can_be_disabled() {
        let analyzer = DivergenceAnalyzer::new(DivergenceConfig {
            follow_up_questions: false,
            ..Default::default()
        })
        .unwrap();

        let report = analyzer
            .analyze("Apples are red.", "Bananas seem yellow.")
            .unwrap();
        assert_eq!(report.divergence_level, DivergenceLevel::High);
        assert!(report.suggested_questions.is_empty());
    }

    #[test]
    fn length_gap_uses_configured_minimum() {
        let analyzer = DivergenceAnalyzer::new(DivergenceConfig {
            min_word_difference: 3,
            ..Default::default()
        })
        .unwrap();

        let report = analyzer
            .analyze("short answer", "short answer with plenty of extra words")
            .unwrap();

        let length = report
            .differences
            .iter()
            .find(|d| d.kind == DifferenceKind::LengthDisparity)
            .unwrap();
        assert_eq!(length.description, "Response 2 is more detailed (5 more words)");
    }

    #[test]
    fn custom_detector_replaces_default_rules() {
        let detector = ContradictionDetector::with_rules(vec![ContradictionRule::new(
            "safety",
            r"\bsafe\b",
            r"\bunsafe\b",
        )
        .unwrap()]);
        let analyzer =
            DivergenceAnalyzer::with_detector(DivergenceConfig::default(), detector).unwrap();

        assert!(analyzer
            .analyze("This block is safe.", "This block is unsafe.")
            .unwrap()
            .has_contradiction());
        assert!(!analyzer
            .analyze("The cat is happy.", "The cat is not happy.")
            .unwrap()
            .has_contradiction());
    }

    #[test]
    fn summary_delegates_to_table() {
        let analyzer = analyzer();
        let report = analyzer.analyze("same words here", "same words here").unwrap();
        assert_eq!(analyzer.summary(&report, "en"), "Both answers broadly agree.");
    }
}
