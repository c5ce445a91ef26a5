//! Namecheap API client.
//!
//! # Design
//! `NamecheapClient` is read-only after `resolve`. Each call is split into a
//! pure `build` step that produces an `HttpRequest` and a pure `parse` step
//! that consumes an `HttpResponse`; `execute` wires the two together through
//! the client's `Transport`. Callers that run their own I/O can use the two
//! halves directly.

use std::time::Duration;

use tracing::debug;

use crate::config::{Config, Credentials};
use crate::decode::Decoder;
use crate::domains::{DomainsCheck, DomainsCheckCommandResponse};
use crate::envelope::ApiResponse;
use crate::error::{ConfigError, Error};
use crate::http::{HttpRequest, HttpResponse};
use crate::request::{build_request, Command, Params};
use crate::transport::{Transport, UreqTransport};

/// Synchronous client for the Namecheap XML API.
#[derive(Debug)]
pub struct NamecheapClient<T = UreqTransport> {
    credentials: Credentials,
    base_url: String,
    decoder: Decoder,
    transport: T,
}

impl NamecheapClient<UreqTransport> {
    /// Resolves `config` using a default `ureq` transport.
    pub fn from_config(config: Config) -> Result<Self, Error> {
        Self::resolve(config, UreqTransport::default())
    }

    /// Resolves `config` using a `ureq` transport with a global timeout.
    pub fn with_timeout(config: Config, timeout: Duration) -> Result<Self, Error> {
        Self::resolve(config, UreqTransport::new(Some(timeout)))
    }

    /// Resolves configuration read from `NAMECHEAP_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_config(Config::from_env())
    }
}

impl<T: Transport> NamecheapClient<T> {
    /// Validates `config` and settles the source IP.
    ///
    /// When no source IP is configured, exactly one GET is issued to
    /// `config.ip_echo_url` through `transport`. No retry.
    pub fn resolve(config: Config, transport: T) -> Result<Self, Error> {
        config.validate()?;

        let source_ip = match config.explicit_source_ip() {
            Some(ip) => ip.to_string(),
            None => lookup_public_ip(&transport, &config.ip_echo_url)
                .map_err(|e| ConfigError::IpResolution(Box::new(e)))?,
        };

        let base_url = config.endpoint.url().to_string();
        let decoder = Decoder::new(config.debug);
        debug!(%base_url, %source_ip, "namecheap client ready");

        Ok(Self {
            credentials: Credentials::from_validated(config, source_ip),
            base_url,
            decoder,
            transport,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn decoder(&self) -> Decoder {
        self.decoder
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the request for `command` without sending it.
    pub fn build<C: Command>(&self, command: &C) -> Result<HttpRequest, Error> {
        let mut params: Params = command.params();
        params.insert("Command".to_string(), C::NAME.to_string());
        build_request(&self.base_url, &self.credentials, params)
    }

    /// Decodes `response` as the envelope of `C` and applies the error convention.
    ///
    /// The HTTP status is ignored; only the envelope decides success.
    pub fn parse<C: Command>(&self, response: &HttpResponse) -> Result<C::Response, Error> {
        let envelope: ApiResponse<C::Response> = self.decoder.decode(&response.body)?;
        envelope.evaluate()
    }

    /// Builds, sends and parses `command`.
    pub fn execute<C: Command>(&self, command: &C) -> Result<C::Response, Error> {
        let request = self.build(command)?;
        debug!(command = C::NAME, "sending API request");
        let response = self.transport.execute(&request)?;
        debug!(command = C::NAME, status = response.status, "received API response");
        self.parse::<C>(&response)
    }

    /// Checks availability of a single domain.
    pub fn domains_check(&self, domain: &str) -> Result<DomainsCheckCommandResponse, Error> {
        self.execute(&DomainsCheck::new([domain]))
    }

    /// Checks availability of several domains in one call.
    pub fn domains_check_many<I, S>(&self, domains: I) -> Result<DomainsCheckCommandResponse, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execute(&DomainsCheck::new(domains))
    }
}

/// GETs `url` and returns the trimmed plain-text body as the public IP.
fn lookup_public_ip<T: Transport>(transport: &T, url: &str) -> Result<String, Error> {
    let response = transport.execute(&HttpRequest::get(url))?;
    if !response.is_success() {
        return Err(Error::Transport(
            format!("IP lookup returned HTTP {}", response.status).into(),
        ));
    }

    let ip = String::from_utf8_lossy(&response.body).trim().to_string();
    if ip.is_empty() {
        return Err(Error::Transport("IP lookup returned an empty body".into()));
    }
    debug!(%ip, "resolved public IP");
    Ok(ip)
}
