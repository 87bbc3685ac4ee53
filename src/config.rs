use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 10;
/// Large-context probes can legitimately take minutes.
pub const DEFAULT_SWEEP_TIMEOUT_SECS: u64 = 600;

/// Connection settings shared by every service-facing probe.
///
/// Built from defaults, then an optional YAML config file, then CLI flags,
/// in that order of precedence. The API key is always a literal
/// configuration value; it is never read from the environment.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub base_url: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub health_timeout_secs: u64,
    pub sweep_timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            health_timeout_secs: DEFAULT_HEALTH_TIMEOUT_SECS,
            sweep_timeout_secs: DEFAULT_SWEEP_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    health_timeout_secs: Option<u64>,
    sweep_timeout_secs: Option<u64>,
}

impl ProbeConfig {
    /// Load config from `path`, or from the default location if present.
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(path: Option<&Path>) -> Result<ProbeConfig, Box<dyn std::error::Error>> {
        let mut config = ProbeConfig::default();

        let explicit = path.is_some();
        let resolved = path.map(PathBuf::from).or_else(default_config_path);
        if let Some(resolved) = resolved {
            match fs::read_to_string(&resolved) {
                Ok(text) => {
                    let file: ConfigFile = serde_yaml::from_str(&text)?;
                    config.merge_file(file);
                }
                Err(e) if explicit => {
                    return Err(
                        format!("failed to read config file {}: {}", resolved.display(), e).into(),
                    );
                }
                Err(_) => {}
            }
        }

        Ok(config)
    }

    fn merge_file(&mut self, file: ConfigFile) {
        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if file.model.is_some() {
            self.model = file.model;
        }
        if file.api_key.is_some() {
            self.api_key = file.api_key;
        }
        if let Some(timeout) = file.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(timeout) = file.health_timeout_secs {
            self.health_timeout_secs = timeout;
        }
        if let Some(timeout) = file.sweep_timeout_secs {
            self.sweep_timeout_secs = timeout;
        }
    }

    /// CLI flags take precedence over the config file. An explicit
    /// `--timeout` applies to sweep probes as well.
    pub fn apply_cli(
        &mut self,
        url: Option<String>,
        model: Option<String>,
        api_key: Option<String>,
        timeout: Option<u64>,
    ) {
        if let Some(url) = url {
            self.base_url = url;
        }
        if model.is_some() {
            self.model = model;
        }
        if api_key.is_some() {
            self.api_key = api_key;
        }
        if let Some(timeout) = timeout {
            self.timeout_secs = timeout;
            self.sweep_timeout_secs = timeout;
        }
    }

    /// URL under the native Ollama API, e.g. `native_url("tags")`.
    pub fn native_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// URL under the OpenAI-compatible API, e.g. `openai_url("models")`.
    pub fn openai_url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", key)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn sweep_timeout(&self) -> Duration {
        Duration::from_secs(self.sweep_timeout_secs)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("llm-probe").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_helpers_trim_trailing_slash() {
        let config = ProbeConfig {
            base_url: "http://localhost:8600/".to_string(),
            ..ProbeConfig::default()
        };
        assert_eq!(config.native_url("tags"), "http://localhost:8600/api/tags");
        assert_eq!(
            config.openai_url("chat/completions"),
            "http://localhost:8600/v1/chat/completions"
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut config = ProbeConfig::default();
        let file: ConfigFile = serde_yaml::from_str("base_url: http://remote:9000\nmodel: qwen3:262k\n").unwrap();
        config.merge_file(file);
        assert_eq!(config.base_url, "http://remote:9000");
        assert_eq!(config.model.as_deref(), Some("qwen3:262k"));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = ProbeConfig::default();
        config.merge_file(ConfigFile {
            model: Some("from-file".to_string()),
            timeout_secs: Some(30),
            ..ConfigFile::default()
        });
        config.apply_cli(None, Some("from-flag".to_string()), None, Some(300));
        assert_eq!(config.model.as_deref(), Some("from-flag"));
        assert_eq!(config.timeout_secs, 300);
        assert_eq!(config.sweep_timeout_secs, 300);
    }

    #[test]
    fn test_bearer_header_only_with_key() {
        let config = ProbeConfig::default();
        assert!(!config.headers().contains_key(AUTHORIZATION));

        let config = ProbeConfig {
            api_key: Some("sk-test".to_string()),
            ..ProbeConfig::default()
        };
        assert_eq!(
            config.headers().get(AUTHORIZATION).unwrap(),
            "Bearer sk-test"
        );
    }
}
