mod schema;

pub use schema::*;

use crate::error::{SecondOpinionError, SecondOpinionResult};
use std::path::{Path, PathBuf};

/// Get the OS-appropriate config directory for second-opinion
/// - Linux: ~/.config/second-opinion
/// - macOS: ~/Library/Application Support/second-opinion
/// - Windows: %APPDATA%\second-opinion
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("second-opinion"))
}

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("second-opinion.toml"))
}

pub fn load_config(path: &Path) -> SecondOpinionResult<Config> {
    if !path.exists() {
        return Err(SecondOpinionError::ConfigNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content).map_err(|e| SecondOpinionError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    config.validate()?;

    Ok(config)
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    User(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit(path) | Self::User(path) => write!(f, "{}", path.display()),
            Self::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Pick the config to run with: `explicit` if it exists, then the user
/// config directory, then built-in defaults. A file that exists but does not
/// parse or validate is an error, never a silent fallback.
pub fn resolve_config(explicit: &Path) -> SecondOpinionResult<(Config, ConfigSource)> {
    resolve_from(explicit, default_config_path().as_deref())
}

fn resolve_from(
    explicit: &Path,
    user: Option<&Path>,
) -> SecondOpinionResult<(Config, ConfigSource)> {
    if explicit.exists() {
        let config = load_config(explicit)?;
        return Ok((config, ConfigSource::Explicit(explicit.to_path_buf())));
    }

    match user {
        Some(path) if path.exists() => {
            let config = load_config(path)?;
            Ok((config, ConfigSource::User(path.to_path_buf())))
        }
        _ => Ok((Config::default(), ConfigSource::Defaults)),
    }
}

pub fn create_default_config(path: &Path) -> SecondOpinionResult<()> {
    save_config(path, &Config::default())
}

/// Save config to a file, creating parent directories if needed
pub fn save_config(path: &Path, config: &Config) -> SecondOpinionResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| SecondOpinionError::Serialization(e.to_string()))?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(
            load_config(&path),
            Err(SecondOpinionError::ConfigNotFound(p)) if p == path
        ));
    }

    #[test]
    fn default_config_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("second-opinion.toml");

        create_default_config(&path).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.selection.policy, "priority");
        assert_eq!(loaded.selection.priority[0], "anthropic");
        assert_eq!(
            loaded.selection.costs.get("openai").map(|m| m.len()),
            Some(2)
        );
        assert_eq!(loaded.divergence.low_threshold, 0.8);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[divergence\nenabled = ").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(SecondOpinionError::ConfigParse { .. })
        ));
    }

    #[test]
    fn non_finite_feedback_step_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        for (name, step) in [("nan", "nan"), ("inf", "inf"), ("negative", "-0.5")] {
            let path = dir.path().join(format!("{}.toml", name));
            std::fs::write(&path, format!("[selection]\nfeedback_step = {}\n", step)).unwrap();

            assert!(
                matches!(load_config(&path), Err(SecondOpinionError::Config(_))),
                "feedback_step = {}",
                step
            );
        }
    }

    #[test]
    fn explicit_file_wins_over_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.toml");
        let user = dir.path().join("user.toml");
        std::fs::write(&explicit, "[selection]\npolicy = \"cost\"\n").unwrap();
        std::fs::write(&user, "[selection]\npolicy = \"random\"\n").unwrap();

        let (config, source) = resolve_from(&explicit, Some(&user)).unwrap();
        assert_eq!(config.selection.policy, "cost");
        assert_eq!(source, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn user_file_then_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("absent.toml");
        let user = dir.path().join("user.toml");

        let (config, source) = resolve_from(&explicit, Some(&user)).unwrap();
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config.selection.policy, "priority");
        assert_eq!(resolve_from(&explicit, None).unwrap().1, ConfigSource::Defaults);

        std::fs::write(&user, "[selection]\npolicy = \"round-robin\"\n").unwrap();
        let (config, source) = resolve_from(&explicit, Some(&user)).unwrap();
        assert_eq!(config.selection.policy, "round-robin");
        assert_eq!(source, ConfigSource::User(user));
    }

    #[test]
    fn broken_user_file_is_not_replaced_by_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("absent.toml");
        let user = dir.path().join("user.toml");
        std::fs::write(&user, "[selection]\nfeedback_step = nan\n").unwrap();

        assert!(matches!(
            resolve_from(&explicit, Some(&user)),
            Err(SecondOpinionError::Config(_))
        ));
    }

    #[test]
    fn invalid_thresholds_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.toml");
        std::fs::write(
            &path,
            "[divergence]\nlow_threshold = 0.3\nmedium_threshold = 0.6\n",
        )
        .unwrap();

        assert!(matches!(
            load_config(&path),
            Err(SecondOpinionError::Config(_))
        ));
    }
}
