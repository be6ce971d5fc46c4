pub mod analyzer;
pub mod differences;
pub mod questions;
pub mod report;
pub mod text;

pub use analyzer::DivergenceAnalyzer;
pub use differences::{extract_key_concepts, ContradictionDetector, ContradictionRule};
pub use questions::{suggest_questions, summary};
pub use report::{
    Difference, DifferenceKind, DivergenceLevel, DivergenceReport, ReportMetadata,
    MAX_DIFFERENCES,
};
pub use text::{
    calculate_similarity, lcs_length, normalize, token_set_similarity, tokenize,
};
