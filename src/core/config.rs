//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SedError};

/// Full detector configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub integrations: IntegrationsConfig,
    pub engines: EnginesConfig,
    pub url: UrlConfig,
    pub text: TextConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

/// Service identity reported by front ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceConfig {
    pub project_name: String,
    pub api_version: String,
}

/// Credentials for third-party reputation services.
///
/// Declared for deployments that wire external lookups; no scoring path
/// reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct IntegrationsConfig {
    pub virustotal_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

/// Which engines the orchestrator registers. URL is registered before TEXT.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnginesConfig {
    pub url_enabled: bool,
    pub text_enabled: bool,
}

/// URL heuristic knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UrlConfig {
    /// URLs strictly longer than this many characters are penalized.
    pub max_length: usize,
    /// Substrings that flag credential-harvesting URLs, in report order.
    pub suspicious_keywords: Vec<String>,
}

/// Extra keywords appended after the built-in text strategy lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct TextConfig {
    pub extra_urgency_keywords: Vec<String>,
    pub extra_authority_roles: Vec<String>,
    pub extra_demand_keywords: Vec<String>,
}

/// JSONL activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub jsonl_log: PathBuf,
}

/// Filesystem paths used by the detector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            project_name: "social-eng-detector".to_string(),
            api_version: "v1".to_string(),
        }
    }
}

impl Default for EnginesConfig {
    fn default() -> Self {
        Self {
            url_enabled: true,
            text_enabled: true,
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            max_length: 80,
            suspicious_keywords: ["login", "update", "verify"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            jsonl_log: home_dir()
                .join(".local")
                .join("share")
                .join("sed")
                .join("activity.jsonl"),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_file: home_dir().join(".config").join("sed").join("config.toml"),
        }
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[SED-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| SedError::Io {
                path: path_buf.clone(),
                source,
            })?;
            toml::from_str::<Self>(&raw)?
        } else if is_explicit_path {
            return Err(SedError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for logging.
    ///
    /// FNV-1a over the canonical JSON encoding; stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // engines
        if let Some(raw) = lookup("SED_ENGINES_URL_ENABLED") {
            self.engines.url_enabled = parse_env_bool("SED_ENGINES_URL_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("SED_ENGINES_TEXT_ENABLED") {
            self.engines.text_enabled = parse_env_bool("SED_ENGINES_TEXT_ENABLED", &raw)?;
        }

        // url
        if let Some(raw) = lookup("SED_URL_MAX_LENGTH") {
            self.url.max_length = parse_env_usize("SED_URL_MAX_LENGTH", &raw)?;
        }

        // integrations
        if let Some(raw) = lookup("SED_VIRUSTOTAL_API_KEY") {
            self.integrations.virustotal_api_key = Some(raw);
        }
        if let Some(raw) = lookup("SED_OPENAI_API_KEY") {
            self.integrations.openai_api_key = Some(raw);
        }

        // logging
        if let Some(raw) = lookup("SED_LOGGING_ENABLED") {
            self.logging.enabled = parse_env_bool("SED_LOGGING_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("SED_LOGGING_JSONL_LOG") {
            self.logging.jsonl_log = PathBuf::from(raw);
        }

        Ok(())
    }

    /// Check cross-field constraints. Called by [`Config::load`].
    pub fn validate(&self) -> Result<()> {
        if !self.engines.url_enabled && !self.engines.text_enabled {
            return Err(SedError::InvalidConfig {
                details: "at least one of engines.url_enabled / engines.text_enabled must be true"
                    .to_string(),
            });
        }

        if self.url.max_length == 0 {
            return Err(SedError::InvalidConfig {
                details: "url.max_length must be >= 1".to_string(),
            });
        }

        validate_keywords("url.suspicious_keywords", &self.url.suspicious_keywords)?;
        validate_keywords("text.extra_urgency_keywords", &self.text.extra_urgency_keywords)?;
        validate_keywords("text.extra_authority_roles", &self.text.extra_authority_roles)?;
        validate_keywords("text.extra_demand_keywords", &self.text.extra_demand_keywords)?;

        for (name, key) in [
            (
                "integrations.virustotal_api_key",
                &self.integrations.virustotal_api_key,
            ),
            (
                "integrations.openai_api_key",
                &self.integrations.openai_api_key,
            ),
        ] {
            if key.as_ref().is_some_and(|value| value.trim().is_empty()) {
                return Err(SedError::InvalidConfig {
                    details: format!("{name} cannot be blank; omit it instead"),
                });
            }
        }

        if self.service.project_name.trim().is_empty() || self.service.api_version.trim().is_empty()
        {
            return Err(SedError::InvalidConfig {
                details: "service.project_name and service.api_version cannot be empty".to_string(),
            });
        }

        if self.logging.enabled && self.logging.jsonl_log.as_os_str().is_empty() {
            return Err(SedError::InvalidConfig {
                details: "logging.jsonl_log must be set when logging.enabled=true".to_string(),
            });
        }

        Ok(())
    }
}

fn validate_keywords(name: &str, keywords: &[String]) -> Result<()> {
    if let Some(index) = keywords.iter().position(|kw| kw.trim().is_empty()) {
        return Err(SedError::InvalidConfig {
            details: format!("{name}[{index}] cannot be empty"),
        });
    }
    Ok(())
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_usize(name: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|error| SedError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    raw.trim()
        .parse::<bool>()
        .map_err(|error| SedError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
