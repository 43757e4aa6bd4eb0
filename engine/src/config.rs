//! `~/.mcq/config.toml` loading.
//!
//! ```toml
//! [app]
//! dark_mode_default = false
//! ascii_only = false
//! reduced_motion = false
//!
//! [api_keys]
//! google = "${GEMINI_API_KEY}"
//!
//! [google]
//! model = "gemini-3-flash-preview"
//! base_url = "https://generativelanguage.googleapis.com/v1beta"
//! question_count = 5
//! ```

use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use mcq_providers::GeminiConfig;

/// Environment variables consulted for the Gemini key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Default, Deserialize)]
pub struct McqConfig {
    pub app: Option<AppConfig>,
    pub api_keys: Option<ApiKeys>,
    pub google: Option<GoogleConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Dark mode when no preference has been saved yet.
    #[serde(default)]
    pub dark_mode_default: bool,
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Show a static spinner instead of an animated one.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Default, Deserialize)]
pub struct ApiKeys {
    pub google: Option<String>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let google = if self.google.is_some() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("ApiKeys").field("google", &google).finish()
    }
}

/// Gemini request settings.
#[derive(Debug, Default, Deserialize)]
pub struct GoogleConfig {
    pub model: Option<String>,
    /// Override the API base URL (proxies, local mocks).
    pub base_url: Option<String>,
    /// Questions requested per quiz. Default: 5.
    pub question_count: Option<usize>,
}

/// Replace `${VAR}` references with environment values (missing vars become empty).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

impl McqConfig {
    /// Load the config from its default location. `Ok(None)` when absent.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {}: {source}", path.display());
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map(Some).map_err(|source| {
            tracing::warn!("Failed to parse config at {}: {source}", path.display());
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Resolve the Gemini key: config first (with `${VAR}` expansion), then the environment.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        let configured = self
            .api_keys
            .as_ref()
            .and_then(|keys| keys.google.as_deref())
            .map(expand_env_vars)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        configured.or_else(|| {
            API_KEY_ENV_VARS.iter().find_map(|var| {
                env::var(var)
                    .ok()
                    .map(|key| key.trim().to_string())
                    .filter(|key| !key.is_empty())
            })
        })
    }

    /// Source settings with defaults filled in.
    #[must_use]
    pub fn gemini_config(&self) -> GeminiConfig {
        let mut config = GeminiConfig {
            api_key: self.resolve_api_key(),
            ..GeminiConfig::default()
        };
        if let Some(google) = &self.google {
            if let Some(model) = google.model.as_deref().map(str::trim)
                && !model.is_empty()
            {
                config.model = model.to_string();
            }
            if let Some(base_url) = google.base_url.as_deref().map(str::trim)
                && !base_url.is_empty()
            {
                config.base_url = base_url.to_string();
            }
            match google.question_count {
                Some(0) => tracing::warn!("Ignoring question_count = 0 in config"),
                Some(count) => config.question_count = count,
                None => {}
            }
        }
        config
    }

    #[must_use]
    pub fn app(&self) -> Option<&AppConfig> {
        self.app.as_ref()
    }
}

/// Directory holding config, preferences, logs and printed reports.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".mcq"))
}

pub fn config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_env_vars_no_vars() {
        assert_eq!(expand_env_vars("hello world"), "hello world");
    }

    #[test]
    fn expand_env_vars_single_var() {
        unsafe {
            env::set_var("MCQ_TEST_CONFIG_VAR", "replaced");
        }
        let result = expand_env_vars("prefix ${MCQ_TEST_CONFIG_VAR} suffix");
        assert_eq!(result, "prefix replaced suffix");
        unsafe {
            env::remove_var("MCQ_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn expand_env_vars_missing_var_becomes_empty() {
        unsafe {
            env::remove_var("MCQ_MISSING_VAR_FOR_TEST");
        }
        let result = expand_env_vars("before ${MCQ_MISSING_VAR_FOR_TEST} after");
        assert_eq!(result, "before  after");
    }

    #[test]
    fn expand_env_vars_unclosed_brace_preserved() {
        assert_eq!(expand_env_vars("test ${UNCLOSED"), "test ${UNCLOSED");
    }

    #[test]
    fn expand_env_vars_empty_var_name_dropped() {
        assert_eq!(expand_env_vars("test ${} more"), "test  more");
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = McqConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn parse_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[google\nmodel = 1").unwrap();

        let err = McqConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn gemini_config_applies_overrides() {
        let config: McqConfig = toml::from_str(
            r#"
            [api_keys]
            google = "  literal-key  "

            [google]
            model = "gemini-test"
            base_url = "http://127.0.0.1:9999/v1beta"
            question_count = 3
            "#,
        )
        .unwrap();

        let gemini = config.gemini_config();
        assert_eq!(gemini.api_key.as_deref(), Some("literal-key"));
        assert_eq!(gemini.model, "gemini-test");
        assert_eq!(gemini.base_url, "http://127.0.0.1:9999/v1beta");
        assert_eq!(gemini.question_count, 3);
    }

    #[test]
    fn gemini_config_defaults() {
        let config: McqConfig = toml::from_str(
            r#"
            [api_keys]
            google = "k"
            [google]
            question_count = 0
            "#,
        )
        .unwrap();
        let gemini = config.gemini_config();
        assert_eq!(gemini.model, mcq_providers::DEFAULT_GEMINI_MODEL);
        assert_eq!(gemini.base_url, mcq_providers::GEMINI_API_BASE_URL);
        assert_eq!(gemini.question_count, 5);
    }

    #[test]
    fn app_flags_default_to_false() {
        let config: McqConfig = toml::from_str("[app]\nascii_only = true\n").unwrap();
        let app = config.app().unwrap();
        assert!(app.ascii_only);
        assert!(!app.reduced_motion);
        assert!(!app.dark_mode_default);
    }

    #[test]
    fn api_keys_debug_redacts() {
        let keys = ApiKeys {
            google: Some("secret".to_string()),
        };
        let rendered = format!("{keys:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret"));
    }
}
