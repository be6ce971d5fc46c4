use crate::divergence::report::{Difference, DifferenceKind, DivergenceLevel, DivergenceReport};

/// Extra questions appended on top of the canned bank
const MAX_CONDITIONED_QUESTIONS: usize = 2;

const MEDIUM_QUESTIONS: [&str; 3] = [
    "Which parts of the two answers matter most for your situation?",
    "Would you like me to reconcile the points where the answers differ?",
    "Should I go deeper into any specific point where they disagree?",
];

const HIGH_QUESTIONS: [&str; 3] = [
    "The answers differ substantially. Which one better matches what you asked?",
    "Can you add more context so the question can be answered more precisely?",
    "Would you like a third opinion to settle the disagreement?",
];

const CONCEPT_QUESTION: &str =
    "Should I explain the concepts that appear in only one of the answers?";
const LENGTH_QUESTION: &str = "Would you prefer the more detailed answer or a concise summary?";
const CONTRADICTION_QUESTIONS: [&str; 2] = [
    "Which of the conflicting statements should be verified first?",
    "Would you like sources that confirm or refute each claim?",
];

/// Build follow-up questions for a non-low divergence.
///
/// Low divergence yields nothing. Otherwise the level's canned questions come
/// first, then up to two conditioned on which kinds of difference fired.
pub fn suggest_questions(
    level: DivergenceLevel,
    differences: &[Difference],
    max_questions: usize,
) -> Vec<String> {
    let bank: &[&str] = match level {
        DivergenceLevel::Low => return Vec::new(),
        DivergenceLevel::Medium => &MEDIUM_QUESTIONS,
        DivergenceLevel::High => &HIGH_QUESTIONS,
    };

    let mut conditioned: Vec<&str> = Vec::new();
    if differences.iter().any(Difference::is_concept) {
        conditioned.push(CONCEPT_QUESTION);
    }
    if differences
        .iter()
        .any(|d| d.kind == DifferenceKind::LengthDisparity)
    {
        conditioned.push(LENGTH_QUESTION);
    }
    if differences
        .iter()
        .any(|d| d.kind == DifferenceKind::Contradiction)
    {
        conditioned.extend(CONTRADICTION_QUESTIONS);
    }

    bank.iter()
        .copied()
        .chain(conditioned.into_iter().take(MAX_CONDITIONED_QUESTIONS))
        .take(max_questions)
        .map(str::to_string)
        .collect()
}

/// One-line verdict for a report in the requested language.
///
/// Language tags match on their primary subtag ("es-MX" reads as "es").
/// Unsupported languages fall back to English.
pub fn summary(report: &DivergenceReport, language: &str) -> &'static str {
    let primary = language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    summary_for(&primary, report.divergence_level)
        .or_else(|| summary_for("en", report.divergence_level))
        .unwrap_or_default()
}

fn summary_for(language: &str, level: DivergenceLevel) -> Option<&'static str> {
    use DivergenceLevel::*;

    let sentence = match (language, level) {
        ("en", Low) => "Both answers broadly agree.",
        ("en", Medium) => "The answers agree in part but differ on some points.",
        ("en", High) => "The answers differ significantly; review both carefully.",
        ("es", Low) => "Ambas respuestas coinciden en lo esencial.",
        ("es", Medium) => "Las respuestas coinciden en parte, pero difieren en algunos puntos.",
        ("es", High) => "Las respuestas difieren de forma notable; revisa ambas con atención.",
        ("fr", Low) => "Les deux réponses sont globalement d'accord.",
        ("fr", Medium) => "Les réponses concordent en partie mais divergent sur certains points.",
        ("fr", High) => "Les réponses divergent nettement ; examinez-les attentivement.",
        ("de", Low) => "Beide Antworten stimmen weitgehend überein.",
        ("de", Medium) => "Die Antworten stimmen teilweise überein, weichen aber in einigen Punkten ab.",
        ("de", High) => "Die Antworten unterscheiden sich deutlich; prüfen Sie beide sorgfältig.",
        _ => return None,
    };

    Some(sentence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divergence::report::ReportMetadata;

    fn report(level: DivergenceLevel) -> DivergenceReport {
        DivergenceReport {
            similarity: 0.5,
            divergence_level: level,
            differences: Vec::new(),
            suggested_questions: Vec::new(),
            metadata: ReportMetadata::new(1, 1),
        }
    }

    #[test]
    fn low_divergence_asks_nothing() {
        let differences = vec![Difference::new(DifferenceKind::Contradiction, "x")];
        assert!(suggest_questions(DivergenceLevel::Low, &differences, 5).is_empty());
    }

    #[test]
    fn bank_comes_first() {
        let questions = suggest_questions(DivergenceLevel::High, &[], 10);
        assert_eq!(questions, HIGH_QUESTIONS.map(str::to_string).to_vec());
    }

    #[test]
    fn conditioned_questions_are_capped_at_two() {
        let differences = vec![
            Difference::new(DifferenceKind::ConceptsOnlyInFirst, "Response 1 mentions: a"),
            Difference::new(DifferenceKind::LengthDisparity, "Response 1 is more detailed"),
            Difference::new(DifferenceKind::Contradiction, "contradiction"),
        ];
        let questions = suggest_questions(DivergenceLevel::Medium, &differences, 10);

        assert_eq!(questions.len(), 5);
        assert_eq!(questions[3], CONCEPT_QUESTION);
        assert_eq!(questions[4], LENGTH_QUESTION);
    }

    #[test]
    fn contradiction_alone_adds_two() {
        let differences = vec![Difference::new(DifferenceKind::Contradiction, "c")];
        let questions = suggest_questions(DivergenceLevel::Medium, &differences, 10);
        assert_eq!(&questions[3..], &CONTRADICTION_QUESTIONS.map(str::to_string));
    }

    #[test]
    fn max_questions_truncates() {
        let differences = vec![Difference::new(DifferenceKind::Contradiction, "c")];
        assert_eq!(
            suggest_questions(DivergenceLevel::High, &differences, 2).len(),
            2
        );
        assert!(suggest_questions(DivergenceLevel::High, &differences, 0).is_empty());
    }

    #[test]
    fn summary_uses_language_and_level() {
        assert_eq!(
            summary(&report(DivergenceLevel::Low), "es"),
            "Ambas respuestas coinciden en lo esencial."
        );
        assert_eq!(
            summary(&report(DivergenceLevel::High), "de-AT"),
            "Die Antworten unterscheiden sich deutlich; prüfen Sie beide sorgfältig."
        );
    }

    #[test]
    fn summary_falls_back_to_english() {
        assert_eq!(
            summary(&report(DivergenceLevel::Medium), "ja"),
            "The answers agree in part but differ on some points."
        );
        assert_eq!(
            summary(&report(DivergenceLevel::Medium), ""),
            "The answers agree in part but differ on some points."
        );
    }
}
