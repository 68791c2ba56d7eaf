// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::http::DEFAULT_USER_AGENT;

/// Default attack service location
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Default credentials file used by the CLI
pub const DEFAULT_STORAGE_FILE: &str = ".fgsm-credentials.json";

/// Endpoint paths on the attack service
pub mod endpoints {
    pub const ATTACK: &str = "/attack";
    pub const ATTACK_FROM_URL: &str = "/attack-from-url";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const VERIFY_TOKEN: &str = "/verify-token";
    pub const AVAILABLE_IMAGES: &str = "/available-images";
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the attack service
    pub api_base: Url,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Safety-net session re-check period
    pub recheck_interval: Duration,
    /// Durable credentials file (memory-only when unset)
    pub storage_path: Option<PathBuf>,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            recheck_interval: Duration::from_secs(5),
            storage_path: None,
            proxy: None,
        }
    }
}

impl ClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service base URL
    pub fn api_base(mut self, base: impl AsRef<str>) -> Result<Self> {
        self.api_base = Url::parse(base.as_ref())?;
        Ok(self)
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the session re-check period
    pub fn recheck_interval(mut self, interval: Duration) -> Self {
        self.recheck_interval = interval;
        self
    }

    /// Persist credentials to a file
    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Config used by the command line tool
    pub fn for_cli() -> Self {
        Self {
            storage_path: Some(PathBuf::from(DEFAULT_STORAGE_FILE)),
            ..Default::default()
        }
    }

    /// Overlay `FGSM_*` environment variables onto this config
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Default config with environment overrides applied
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(base) = var("FGSM_API_URL") {
            self.api_base = Url::parse(&base)
                .map_err(|e| Error::config(format!("FGSM_API_URL '{}': {}", base, e)))?;
        }
        if let Some(secs) = var("FGSM_TIMEOUT_SECS") {
            self.timeout = Duration::from_secs(parse_secs("FGSM_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = var("FGSM_RECHECK_SECS") {
            self.recheck_interval = Duration::from_secs(parse_secs("FGSM_RECHECK_SECS", &secs)?);
        }
        if let Some(path) = var("FGSM_STORAGE_PATH") {
            self.storage_path = Some(PathBuf::from(path));
        }
        if let Some(proxy) = var("FGSM_PROXY") {
            self.proxy = Some(proxy);
        }
        Ok(self)
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.api_base.join(path)?)
    }
}

fn default_api_base() -> Url {
    Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL")
}

fn parse_secs(name: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(Error::config(format!(
            "{} must be a positive number of seconds, got '{}'",
            name, value
        ))),
    }
}
