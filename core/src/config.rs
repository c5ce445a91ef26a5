//! Client configuration and validated credentials.
//!
//! # Design
//! `Config` is the raw, unvalidated input and may come from code or from the
//! environment. `Credentials` only exists once the three identity fields are
//! known to be non-empty and the source IP is settled, so everything
//! downstream of the resolver can rely on them.

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

pub const PRODUCTION_URL: &str = "https://api.namecheap.com/xml.response";
pub const SANDBOX_URL: &str = "https://api.sandbox.namecheap.com/xml.response";
pub const IP_ECHO_URL: &str = "https://dynamicdns.park-your-domain.com/getip";

/// Which API host the client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Endpoint {
    #[default]
    Production,
    Sandbox,
    /// Any other base URL, e.g. a local mock server.
    Custom(String),
}

impl Endpoint {
    pub fn from_sandbox_flag(use_sandbox: bool) -> Self {
        if use_sandbox {
            Endpoint::Sandbox
        } else {
            Endpoint::Production
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Endpoint::Production => PRODUCTION_URL,
            Endpoint::Sandbox => SANDBOX_URL,
            Endpoint::Custom(url) => url,
        }
    }
}

/// Input to `NamecheapClient::resolve`.
#[derive(Debug)]
pub struct Config {
    pub username: String,
    pub api_user: String,
    pub access_token: SecretString,
    /// The allow-listed source IP. Looked up via `ip_echo_url` when `None` or blank.
    pub source_ip: Option<String>,
    pub endpoint: Endpoint,
    /// Emit raw response payloads through `tracing` before decoding.
    pub debug: bool,
    pub ip_echo_url: String,
}

impl Config {
    pub fn new(username: &str, api_user: &str, access_token: &str) -> Self {
        Self {
            username: username.to_string(),
            api_user: api_user.to_string(),
            access_token: SecretString::from(access_token.to_string()),
            source_ip: None,
            endpoint: Endpoint::Production,
            debug: false,
            ip_echo_url: IP_ECHO_URL.to_string(),
        }
    }

    /// Reads `NAMECHEAP_*` and `DEBUG` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// `NAMECHEAP_USE_SANDBOX` is truthy unless empty or `false`; `DEBUG` is
    /// truthy unless empty.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let sandbox = var("NAMECHEAP_USE_SANDBOX");
        let use_sandbox = !sandbox.is_empty() && sandbox != "false";
        let ip = var("NAMECHEAP_IP");

        Self {
            username: var("NAMECHEAP_USERNAME"),
            api_user: var("NAMECHEAP_API_USER"),
            access_token: SecretString::from(var("NAMECHEAP_TOKEN")),
            source_ip: (!ip.is_empty()).then_some(ip),
            endpoint: Endpoint::from_sandbox_flag(use_sandbox),
            debug: !var("DEBUG").is_empty(),
            ip_echo_url: IP_ECHO_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_source_ip(mut self, ip: &str) -> Self {
        self.source_ip = Some(ip.to_string());
        self
    }

    #[must_use]
    pub fn with_sandbox(mut self, use_sandbox: bool) -> Self {
        self.endpoint = Endpoint::from_sandbox_flag(use_sandbox);
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_ip_echo_url(mut self, url: &str) -> Self {
        self.ip_echo_url = url.to_string();
        self
    }

    /// Fails unless username, API user and access token are all non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let token_len = self.access_token.expose_secret().len();
        if self.username.is_empty() || self.api_user.is_empty() || token_len == 0 {
            return Err(ConfigError::MissingCredentials {
                username: self.username.clone(),
                api_user: self.api_user.clone(),
                token_len,
            });
        }
        Ok(())
    }

    /// The explicitly configured source IP, ignoring blank values.
    pub(crate) fn explicit_source_ip(&self) -> Option<&str> {
        self.source_ip
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    }
}

/// Validated identity fields sent with every request.
#[derive(Debug)]
pub struct Credentials {
    username: String,
    api_user: String,
    access_token: SecretString,
    source_ip: String,
}

impl Credentials {
    /// Validates the identity triple and an explicit source IP, which is
    /// stored trimmed.
    pub fn new(
        username: &str,
        api_user: &str,
        access_token: &str,
        source_ip: &str,
    ) -> Result<Self, ConfigError> {
        let config = Config::new(username, api_user, access_token);
        config.validate()?;
        let source_ip = source_ip.trim();
        if source_ip.is_empty() {
            return Err(ConfigError::MissingSourceIp);
        }
        Ok(Self::from_validated(config, source_ip.to_string()))
    }

    pub(crate) fn from_validated(config: Config, source_ip: String) -> Self {
        Self {
            username: config.username,
            api_user: config.api_user,
            access_token: config.access_token,
            source_ip,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn api_user(&self) -> &str {
        &self.api_user
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn source_ip(&self) -> &str {
        &self.source_ip
    }
}
