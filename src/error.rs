use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecondOpinionError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config at {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // Selection errors
    #[error("No alternative providers available{}", .excluded.as_ref().map(|p| format!(" (excluding '{}')", p)).unwrap_or_default())]
    NoAlternatives { excluded: Option<String> },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Parse error: {0}")]
    Parse(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    // Regex errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<toml::de::Error> for SecondOpinionError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SecondOpinionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type SecondOpinionResult<T> = Result<T, SecondOpinionError>;
