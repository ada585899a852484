//! Startup configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first (without overriding
//! variables that are already set). The configuration is built once and passed
//! into the service context and the analyzer; nothing reads the environment
//! after startup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Variable holding the Gemini API key. Required for `analyze`.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const MODEL_VAR: &str = "SCHEMAVIZ_MODEL";
const API_BASE_VAR: &str = "SCHEMAVIZ_API_BASE";
const CHECKOUT_DIR_VAR: &str = "SCHEMAVIZ_CHECKOUT_DIR";
const MAX_FILE_CHARS_VAR: &str = "SCHEMAVIZ_MAX_FILE_CHARS";
const TIMEOUT_VAR: &str = "SCHEMAVIZ_TIMEOUT_SECS";

const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_CHECKOUT_DIR: &str = "temp";
const DEFAULT_MAX_FILE_CHARS: usize = 4000;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Errors raised while building [`Config`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} is not set. Add it to your environment or .env file")]
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    #[error("invalid value for {key}: {value:?}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Sampling and prompt settings for the extraction call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSettings {
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling mass.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Per-file character budget before truncation.
    pub max_file_chars: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            top_p: 0.8,
            top_k: 10,
            max_file_chars: DEFAULT_MAX_FILE_CHARS,
        }
    }
}

/// Everything the `analyze` pipeline needs from its environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Gemini API key.
    pub api_key: String,
    /// Base URL of the Gemini REST API.
    pub api_base: String,
    /// Directory under which per-request checkouts are created.
    pub checkout_dir: PathBuf,
    /// Upper bound on the extraction round-trip.
    pub request_timeout: Duration,
    /// Extraction prompt and sampling settings.
    pub extraction: ExtractionSettings,
}

impl Config {
    /// Loads `.env` and builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the API key is absent and
    /// [`ConfigError::Invalid`] when a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::build(lookup, true)
    }

    /// Loads `.env` and the environment for a run whose model calls are
    /// replayed, so the API key may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a numeric variable cannot be parsed.
    pub fn for_replay() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::build(|key| env::var(key).ok(), false)
    }

    fn build<F>(lookup: F, require_key: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = match get(API_KEY_VAR) {
            Some(key) => key,
            None if require_key => return Err(ConfigError::Missing(API_KEY_VAR)),
            None => String::new(),
        };
        let defaults = ExtractionSettings::default();

        Ok(Self {
            api_key,
            api_base: get(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            checkout_dir: get(CHECKOUT_DIR_VAR)
                .map_or_else(|| PathBuf::from(DEFAULT_CHECKOUT_DIR), PathBuf::from),
            request_timeout: Duration::from_secs(parse_or(
                TIMEOUT_VAR,
                get(TIMEOUT_VAR),
                DEFAULT_TIMEOUT_SECS,
            )?),
            extraction: ExtractionSettings {
                model: get(MODEL_VAR).unwrap_or(defaults.model),
                max_file_chars: parse_or(
                    MAX_FILE_CHARS_VAR,
                    get(MAX_FILE_CHARS_VAR),
                    defaults.max_file_chars,
                )?,
                ..defaults
            },
        })
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_fails_fast() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(API_KEY_VAR));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[(API_KEY_VAR, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(API_KEY_VAR));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.checkout_dir, PathBuf::from("temp"));
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.extraction, ExtractionSettings::default());
        assert_eq!(config.extraction.model, "gemini-2.5-pro");
        assert_eq!(config.extraction.max_file_chars, 4000);
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "k"),
            (MODEL_VAR, "gemini-2.5-flash"),
            (CHECKOUT_DIR_VAR, "/tmp/checkouts"),
            (MAX_FILE_CHARS_VAR, "1000"),
            (TIMEOUT_VAR, "5"),
        ]))
        .unwrap();
        assert_eq!(config.extraction.model, "gemini-2.5-flash");
        assert_eq!(config.checkout_dir, PathBuf::from("/tmp/checkouts"));
        assert_eq!(config.extraction.max_file_chars, 1000);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn key_is_optional_when_not_required() {
        let config = Config::build(lookup(&[(CHECKOUT_DIR_VAR, "out")]), false).unwrap();
        assert!(config.api_key.is_empty());
        assert_eq!(config.checkout_dir, PathBuf::from("out"));
    }

    #[test]
    fn unparsable_numbers_are_rejected() {
        let err =
            Config::from_lookup(lookup(&[(API_KEY_VAR, "k"), (TIMEOUT_VAR, "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::Invalid { key: TIMEOUT_VAR, value: "soon".into() });
    }
}
