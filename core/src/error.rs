//! Error types for the Namecheap API client.
//!
//! # Design
//! `Api` gets a dedicated variant because the remote API reports business
//! failures inside a successful HTTP exchange, and callers need to tell those
//! apart from local construction, transport and decoding failures. Nothing in
//! the crate retries; every error is returned to the caller on first failure.

use thiserror::Error;

/// Errors returned by the client, the request builder and the decoder.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing credentials or failure to resolve the caller's public IP.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The endpoint base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    /// The request could not be constructed (unsupported scheme, unencodable form).
    #[error("failed to build request: {0}")]
    Request(String),

    /// Network or protocol failure while talking to the remote host.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response body is not well-formed XML or does not match the payload schema.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The remote API reported a logical failure.
    #[error("API error: {0}")]
    Api(ApiFault),
}

impl Error {
    /// The remote-reported fault, if this is an API error.
    pub fn api_fault(&self) -> Option<&ApiFault> {
        match self {
            Error::Api(fault) => Some(fault),
            _ => None,
        }
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api(_))
    }

    pub(crate) fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport(Box::new(err))
    }
}

/// Failures raised while turning a `Config` into a ready client.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more of username, API user and access token is empty.
    ///
    /// Only the token length is reported so the secret never reaches logs.
    #[error("missing configuration - username={username:?}, api_user={api_user:?}, token length={token_len}")]
    MissingCredentials {
        username: String,
        api_user: String,
        token_len: usize,
    },

    /// An explicitly supplied source IP was empty or whitespace.
    #[error("source IP is empty")]
    MissingSourceIp,

    /// The public IP lookup failed.
    #[error("failed to resolve client IP: {0}")]
    IpResolution(#[source] Box<Error>),
}

/// A single error entry reported by the remote API.
///
/// `number` is kept as the raw token the API sent; Namecheap documents these
/// as numeric but does not guarantee it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFault {
    pub number: String,
    pub message: String,
    /// Entries reported after the first one, in document order.
    pub additional: Vec<ApiFault>,
}

impl ApiFault {
    pub fn new(number: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            message: message.into(),
            additional: Vec::new(),
        }
    }
}

impl std::fmt::Display for ApiFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.number)?;
        if !self.additional.is_empty() {
            write!(f, " and {} more", self.additional.len())?;
        }
        Ok(())
    }
}
