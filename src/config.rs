//! Configuration management for the FAQ relay

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::links::LinkConfig;
use crate::{Error, Result};

/// Default port when `PORT` is unset
pub const DEFAULT_PORT: u16 = 5000;

/// Default FAQ document location
pub const DEFAULT_FAQ_PATH: &str = "faq.json";

/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Default attribution label returned with every reply
pub const DEFAULT_SOURCE_LABEL: &str = "The Ice Butcher Expertise";

/// Default completion API base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Relay configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Path to the FAQ JSON document
    pub faq_path: PathBuf,

    /// Completion API settings
    pub llm: LlmConfig,

    /// Session store bounds
    pub sessions: SessionConfig,

    /// Link formatting rules
    pub links: LinkConfig,

    /// Attribution label returned alongside replies
    pub source_label: String,
}

/// Completion API configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `OpenAI` API key (from `OPENAI_API_KEY`)
    pub api_key: SecretString,

    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,

    /// Model identifier sent with every completion
    pub model: String,

    /// Sampling temperature sent with every completion
    pub temperature: f32,

    /// Upper bound on a single completion round trip
    pub timeout: Duration,
}

/// Session store bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum live sessions; the least recently used is evicted past this (0 = unbounded)
    pub max_sessions: usize,

    /// Sessions idle longer than this are dropped
    pub idle_ttl: Duration,

    /// How often the idle sweeper runs
    pub sweep_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            idle_ttl: Duration::from_secs(60 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Load configuration from the environment
    ///
    /// `port` and `faq_path` come from the command line (which itself falls
    /// back to `PORT` / `FAQ_PATH`).
    ///
    /// # Errors
    ///
    /// Returns error if `OPENAI_API_KEY` is missing or a numeric/URL variable
    /// fails to parse
    pub fn from_env(port: u16, faq_path: PathBuf) -> Result<Self> {
        Self::from_lookup(port, faq_path, |key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`]
    pub fn from_lookup<F>(port: u16, faq_path: PathBuf, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("OPENAI_API_KEY is required".to_string()))?;

        let base_url = lookup("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
        url::Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("invalid OPENAI_BASE_URL {base_url:?}: {e}")))?;

        let llm = LlmConfig {
            api_key: SecretString::new(api_key.into()),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: lookup("RELAY_LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parse_var(&lookup, "RELAY_LLM_TEMPERATURE")?
                .unwrap_or(DEFAULT_TEMPERATURE),
            timeout: Duration::from_secs(
                parse_var(&lookup, "RELAY_LLM_TIMEOUT_SECS")?.unwrap_or(60),
            ),
        };

        let defaults = SessionConfig::default();
        let sessions = SessionConfig {
            max_sessions: parse_var(&lookup, "RELAY_MAX_SESSIONS")?
                .unwrap_or(defaults.max_sessions),
            idle_ttl: parse_var(&lookup, "RELAY_SESSION_IDLE_SECS")?
                .map_or(defaults.idle_ttl, Duration::from_secs),
            sweep_interval: defaults.sweep_interval,
        };

        Ok(Self {
            port,
            faq_path,
            llm,
            sessions,
            links: LinkConfig::default(),
            source_label: lookup("RELAY_SOURCE_LABEL")
                .unwrap_or_else(|| DEFAULT_SOURCE_LABEL.to_string()),
        })
    }
}

/// Parse an optional variable, failing loudly on a malformed value
fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| Error::Config(format!("invalid {key} {raw:?}: {e}")))
        })
        .transpose()
}
