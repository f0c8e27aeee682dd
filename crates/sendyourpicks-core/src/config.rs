//! Application configuration.
//!
//! Configuration comes from the environment (the web binary loads a `.env`
//! file first if one is present):
//!
//! - `PUBLIC_SUPABASE_URL`: auth provider base URL
//! - `PUBLIC_SUPABASE_PUBLISHABLE_KEY`: provider API key sent as `apikey`
//! - `PUBLIC_API_BASE_URL`: picks backend base URL

use thiserror::Error;

pub const AUTH_URL_VAR: &str = "PUBLIC_SUPABASE_URL";
pub const AUTH_KEY_VAR: &str = "PUBLIC_SUPABASE_PUBLISHABLE_KEY";
pub const API_BASE_URL_VAR: &str = "PUBLIC_API_BASE_URL";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid auth provider URL: {0}")]
    InvalidAuthUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub auth_url: String,
    pub auth_key: String,
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let auth_url = required(AUTH_URL_VAR)?.trim_end_matches('/').to_string();
        if project_ref(&auth_url).is_none() {
            return Err(ConfigError::InvalidAuthUrl(auth_url));
        }

        Ok(Self {
            auth_url,
            auth_key: required(AUTH_KEY_VAR)?,
            api_base_url: required(API_BASE_URL_VAR)?.trim_end_matches('/').to_string(),
        })
    }

    /// Cookie name under which the session is persisted:
    /// `sb-<project ref>-auth-token`.
    pub fn auth_storage_key(&self) -> String {
        let reference = project_ref(&self.auth_url).unwrap_or_default();
        format!("sb-{}-auth-token", reference)
    }
}

/// First DNS label of the URL's host, e.g. `abcd` for
/// `https://abcd.supabase.co`.
fn project_ref(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', ':', '?', '#']).next()?;
    let label = host.split('.').next()?;
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}
