use anyhow::{bail, Context, Result};
use std::time::Duration;

pub const API_URL_ENV: &str = "PLAZA_API_URL";
pub const AUTH_URL_ENV: &str = "PLAZA_AUTH_URL";
pub const AUTH_KEY_ENV: &str = "PLAZA_AUTH_KEY";
pub const TIMEOUT_ENV: &str = "PLAZA_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_AUTH_URL: &str = "http://localhost:54321";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Values given on the command line; they win over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub auth_url: Option<String>,
    pub auth_api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Where the client sends its requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub auth_url: String,
    pub auth_api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            auth_api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Resolve the configuration from CLI overrides and the process environment.
    /// The binary's clap flags already fold their variables into `overrides`;
    /// the lookup here covers library callers that build overrides by hand.
    ///
    /// Priority:
    /// 1. CLI argument (highest priority)
    /// 2. Environment variable (`.env` is loaded before this runs)
    /// 3. Built-in default
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::resolve`] with an explicit variable lookup
    pub fn resolve_with<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let pick = |cli: Option<String>, key: &str| {
            cli.or_else(|| lookup(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = pick(overrides.api_url, API_URL_ENV).unwrap_or(defaults.api_url);
        let auth_url = pick(overrides.auth_url, AUTH_URL_ENV).unwrap_or(defaults.auth_url);
        let auth_api_key = pick(overrides.auth_api_key, AUTH_KEY_ENV);

        let request_timeout = match overrides.timeout_secs {
            Some(secs) => Duration::from_secs(secs),
            None => match lookup(TIMEOUT_ENV) {
                Some(raw) => Duration::from_secs(
                    raw.trim()
                        .parse::<u64>()
                        .with_context(|| format!("{} must be a number of seconds, got {:?}", TIMEOUT_ENV, raw))?,
                ),
                None => defaults.request_timeout,
            },
        };

        if request_timeout.is_zero() {
            bail!("Request timeout must be greater than zero");
        }

        Ok(Self {
            api_url: normalize_url(&api_url).context("Invalid API URL")?,
            auth_url: normalize_url(&auth_url).context("Invalid auth URL")?,
            auth_api_key,
            request_timeout,
        })
    }
}

fn normalize_url(url: &str) -> Result<String> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("{:?} must start with http:// or https://", url);
    }
    Ok(url.trim_end_matches('/').to_string())
}
