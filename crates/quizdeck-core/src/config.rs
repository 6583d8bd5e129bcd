//! Quizdeck configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `state_dir`.
pub const STATE_DIR_ENV: &str = "QUIZDECK_STATE_DIR";
/// Environment variable overriding `time_limit_minutes`.
pub const TIME_LIMIT_ENV: &str = "QUIZDECK_TIME_LIMIT";

/// Top-level quizdeck configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizdeckConfig {
    /// Questions drawn per session; 0 uses the whole bank.
    #[serde(default)]
    pub random_count: usize,
    /// Session time limit; 0 runs untimed.
    #[serde(default)]
    pub time_limit_minutes: u32,
    /// Where saved progress is kept.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Where reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report formats written after submission, comma-separated.
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("./.quizdeck")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizdeck-results")
}
fn default_format() -> String {
    "json".to_string()
}

impl Default for QuizdeckConfig {
    fn default() -> Self {
        Self {
            random_count: 0,
            time_limit_minutes: 0,
            state_dir: default_state_dir(),
            output_dir: default_output_dir(),
            default_format: default_format(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `quizdeck.toml` in the current directory
/// 2. `~/.config/quizdeck/config.toml`
///
/// Environment variable overrides: `QUIZDECK_STATE_DIR`, `QUIZDECK_TIME_LIMIT`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizdeckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizdeck.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizdeckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => QuizdeckConfig::default(),
    };

    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Apply `QUIZDECK_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides(
    mut config: QuizdeckConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<QuizdeckConfig> {
    if let Some(dir) = lookup(STATE_DIR_ENV).filter(|v| !v.trim().is_empty()) {
        config.state_dir = PathBuf::from(dir);
    }
    if let Some(limit) = lookup(TIME_LIMIT_ENV) {
        config.time_limit_minutes = limit
            .trim()
            .parse()
            .with_context(|| format!("{TIME_LIMIT_ENV} must be a whole number of minutes"))?;
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizdeck"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn default_config() {
        let config = QuizdeckConfig::default();
        assert_eq!(config.random_count, 0);
        assert_eq!(config.time_limit_minutes, 0);
        assert_eq!(config.default_format, "json");
    }

    #[test]
    fn parse_partial_config() {
        let config: QuizdeckConfig = toml::from_str(
            r#"
random_count = 20
time_limit_minutes = 15
"#,
        )
        .unwrap();
        assert_eq!(config.random_count, 20);
        assert_eq!(config.time_limit_minutes, 15);
        assert_eq!(config.state_dir, PathBuf::from("./.quizdeck"));
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizdeck.toml");
        std::fs::write(&path, "default_format = \"json,html\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_format, "json,html");
    }

    #[test]
    fn missing_explicit_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/quizdeck.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizdeck.toml");
        std::fs::write(&path, "random_count = \"many\"").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn env_overrides() {
        let config = apply_env_overrides(
            QuizdeckConfig::default(),
            env(&[(STATE_DIR_ENV, "/tmp/state"), (TIME_LIMIT_ENV, " 5 ")]),
        )
        .unwrap();
        assert_eq!(config.state_dir, PathBuf::from("/tmp/state"));
        assert_eq!(config.time_limit_minutes, 5);

        let err =
            apply_env_overrides(QuizdeckConfig::default(), env(&[(TIME_LIMIT_ENV, "soon")]))
                .unwrap_err();
        assert!(err.to_string().contains(TIME_LIMIT_ENV));
    }
}
