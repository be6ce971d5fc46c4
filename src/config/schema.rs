use crate::error::{SecondOpinionError, SecondOpinionResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub selection: SelectionConfig,
    pub divergence: DivergenceConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// One of priority, cost, performance, round-robin, random.
    /// Anything else falls back to priority.
    pub policy: String,
    /// Preferred alternates, most preferred first
    pub priority: Vec<String>,
    /// Weight adjustment applied per feedback report
    pub feedback_step: f64,
    pub costs: CostTable,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            policy: "priority".to_string(),
            priority: vec![
                "anthropic".to_string(),
                "openai".to_string(),
                "gemini".to_string(),
                "ollama".to_string(),
            ],
            feedback_step: 0.1,
            costs: default_cost_table(),
        }
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> SecondOpinionResult<()> {
        if !self.feedback_step.is_finite() || self.feedback_step <= 0.0 {
            return Err(SecondOpinionError::Config(format!(
                "selection.feedback_step must be a positive finite number, got {}",
                self.feedback_step
            )));
        }

        Ok(())
    }
}

/// provider -> model -> per-token cost
pub type CostTable = HashMap<String, HashMap<String, ModelCost>>;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct ModelCost {
    pub input_cost_per_token: f64,
    pub output_cost_per_token: f64,
}

impl ModelCost {
    pub fn new(input_cost_per_token: f64, output_cost_per_token: f64) -> Self {
        Self {
            input_cost_per_token,
            output_cost_per_token,
        }
    }

    pub fn blended(&self) -> f64 {
        (self.input_cost_per_token + self.output_cost_per_token) / 2.0
    }
}

fn default_cost_table() -> CostTable {
    let mut table = HashMap::new();
    table.insert(
        "openai".to_string(),
        HashMap::from([
            ("gpt-4o".to_string(), ModelCost::new(0.0000025, 0.00001)),
            ("gpt-4o-mini".to_string(), ModelCost::new(0.00000015, 0.0000006)),
        ]),
    );
    table.insert(
        "anthropic".to_string(),
        HashMap::from([
            ("claude-sonnet".to_string(), ModelCost::new(0.000003, 0.000015)),
            ("claude-haiku".to_string(), ModelCost::new(0.0000008, 0.000004)),
        ]),
    );
    table.insert(
        "gemini".to_string(),
        HashMap::from([
            ("gemini-pro".to_string(), ModelCost::new(0.00000125, 0.000005)),
            ("gemini-flash".to_string(), ModelCost::new(0.0000001, 0.0000004)),
        ]),
    );
    table
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DivergenceConfig {
    pub enabled: bool,
    pub follow_up_questions: bool,
    /// Scores at or above this are low divergence
    pub low_threshold: f64,
    /// Scores at or above this (and below low_threshold) are medium divergence
    pub medium_threshold: f64,
    pub min_word_difference: usize,
    pub max_questions: usize,
    /// Word sequences are cut to this length before alignment
    pub max_compare_words: usize,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            follow_up_questions: true,
            low_threshold: 0.8,
            medium_threshold: 0.5,
            min_word_difference: 50,
            max_questions: 5,
            max_compare_words: 2000,
        }
    }
}

impl Config {
    pub fn validate(&self) -> SecondOpinionResult<()> {
        self.selection.validate()?;
        self.divergence.validate()
    }
}

impl DivergenceConfig {
    pub fn validate(&self) -> SecondOpinionResult<()> {
        for (name, value) in [
            ("low_threshold", self.low_threshold),
            ("medium_threshold", self.medium_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SecondOpinionError::Config(format!(
                    "divergence.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.low_threshold <= self.medium_threshold {
            return Err(SecondOpinionError::Config(format!(
                "divergence.low_threshold ({}) must be greater than medium_threshold ({})",
                self.low_threshold, self.medium_threshold
            )));
        }

        if self.max_compare_words == 0 {
            return Err(SecondOpinionError::Config(
                "divergence.max_compare_words must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_divergence_config_is_valid() {
        assert!(DivergenceConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let config = DivergenceConfig {
            low_threshold: 0.4,
            medium_threshold: 0.6,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SecondOpinionError::Config(_))
        ));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let config = DivergenceConfig {
            low_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn feedback_step_must_be_positive_and_finite() {
        assert!(SelectionConfig::default().validate().is_ok());

        for step in [0.0, -0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = SelectionConfig {
                feedback_step: step,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(SecondOpinionError::Config(_))),
                "step {}",
                step
            );
        }
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [selection]
            policy = "cost"

            [selection.costs.openai.gpt-4o]
            input_cost_per_token = 0.001
            output_cost_per_token = 0.003
            "#,
        )
        .unwrap();

        assert_eq!(config.selection.policy, "cost");
        assert_eq!(config.selection.feedback_step, 0.1);
        assert_eq!(config.selection.costs.len(), 1);
        assert!((config.selection.costs["openai"]["gpt-4o"].blended() - 0.002).abs() < 1e-12);
        assert_eq!(config.divergence.max_questions, 5);
        assert_eq!(config.general.log_level, LogLevel::Info);
    }
}
