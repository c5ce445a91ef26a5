//! Synchronous client core for the Namecheap XML API.
//!
//! # Overview
//! Builds authenticated form-encoded POST requests, sends them through a
//! pluggable `Transport`, and decodes the XML response envelope into typed
//! command payloads.
//!
//! # Design
//! - `NamecheapClient::resolve` validates credentials and, when no source IP
//!   is configured, looks it up once through the transport.
//! - `build_request` and `Decoder` are pure; only `Transport` does I/O.
//! - Every command shares `ApiResponse<P>` and its error convention: any
//!   `<Error>` entry fails the call, whatever the HTTP status says.
//! - Commands implement `Command`, which ties a command name to its payload
//!   type, so decoding is driven by types rather than runtime inspection.

pub mod client;
pub mod config;
pub mod decode;
pub mod domains;
pub mod envelope;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;

pub use client::NamecheapClient;
pub use config::{Config, Credentials, Endpoint};
pub use decode::Decoder;
pub use domains::{DomainCheckResult, DomainsCheck, DomainsCheckCommandResponse};
pub use envelope::{ApiResponse, ErrorEntry, ResponseStatus};
pub use error::{ApiFault, ConfigError, Error};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{build_request, Command, Params};
pub use transport::{Transport, UreqTransport};
