//! Form-encoded request construction.
//!
//! Every call is a POST of `application/x-www-form-urlencoded` fields to the
//! endpoint base URL. The four authentication fields are written last so a
//! caller can never override the client's identity.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Credentials;
use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest};

/// Outbound form fields, ordered by key.
pub type Params = BTreeMap<String, String>;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A named remote operation with its own parameters and payload schema.
///
/// The envelope and error convention are shared; a command only says what it
/// sends and what `CommandResponse` looks like.
pub trait Command {
    /// Value of the `Command` form field, e.g. `namecheap.domains.check`.
    const NAME: &'static str;

    /// Shape of the `CommandResponse` element.
    type Response: DeserializeOwned;

    /// Command-specific form fields, excluding `Command` and authentication.
    fn params(&self) -> Params;
}

/// Builds the outbound POST for `params` against `base_url`.
///
/// Performs no I/O. `Username`, `ApiKey`, `ApiUser` and `ClientIp` always
/// reflect `credentials`, whatever `params` contained under those keys.
pub fn build_request(
    base_url: &str,
    credentials: &Credentials,
    mut params: Params,
) -> Result<HttpRequest, Error> {
    let url = Url::parse(base_url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Request(format!(
            "unsupported URL scheme {:?}",
            url.scheme()
        )));
    }

    params.insert("Username".to_string(), credentials.username().to_string());
    params.insert("ApiKey".to_string(), credentials.access_token().to_string());
    params.insert("ApiUser".to_string(), credentials.api_user().to_string());
    params.insert("ClientIp".to_string(), credentials.source_ip().to_string());

    let body = serde_urlencoded::to_string(&params)
        .map_err(|e| Error::Request(format!("failed to encode form body: {e}")))?;

    Ok(HttpRequest {
        method: HttpMethod::Post,
        url: url.to_string(),
        headers: vec![
            ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ("content-length".to_string(), body.len().to_string()),
        ],
        body: Some(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("alice", "alice-api", "token-123", "198.51.100.4").unwrap()
    }

    fn decode_form(req: &HttpRequest) -> Params {
        serde_urlencoded::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn build_request_produces_form_post() {
        let req = build_request(
            "https://api.namecheap.com/xml.response",
            &credentials(),
            params(&[("Command", "namecheap.domains.check"), ("DomainList", "example.com")]),
        )
        .unwrap();

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://api.namecheap.com/xml.response");
        assert_eq!(req.header("Content-Type"), Some(FORM_CONTENT_TYPE));
        let body = req.body.as_deref().unwrap();
        assert_eq!(req.header("content-length"), Some(body.len().to_string().as_str()));
    }

    #[test]
    fn merged_key_set_is_input_plus_auth() {
        let input = params(&[("Command", "x"), ("DomainList", "a.com,b.net"), ("Extra", "1")]);
        let req = build_request("https://api.namecheap.com/xml.response", &credentials(), input.clone()).unwrap();
        let sent = decode_form(&req);

        let mut expected: Vec<&str> = input.keys().map(String::as_str).collect();
        expected.extend(["Username", "ApiKey", "ApiUser", "ClientIp"]);
        expected.sort_unstable();
        let actual: Vec<&str> = sent.keys().map(String::as_str).collect();
        assert_eq!(actual, expected);
        assert_eq!(sent["DomainList"], "a.com,b.net");
    }

    #[test]
    fn auth_fields_override_caller_values() {
        let spoofed = params(&[
            ("Command", "namecheap.domains.check"),
            ("Username", "mallory"),
            ("ApiKey", "stolen"),
            ("ApiUser", "mallory-api"),
            ("ClientIp", "10.0.0.1"),
        ]);
        let req = build_request("https://api.namecheap.com/xml.response", &credentials(), spoofed).unwrap();
        let sent = decode_form(&req);

        assert_eq!(sent["Username"], "alice");
        assert_eq!(sent["ApiKey"], "token-123");
        assert_eq!(sent["ApiUser"], "alice-api");
        assert_eq!(sent["ClientIp"], "198.51.100.4");
        assert_eq!(sent.len(), 5);
    }

    #[test]
    fn form_encoding_round_trips_special_characters() {
        let input = params(&[
            ("Command", "namecheap.domains.check"),
            ("Note", "a&b=c d+e/ü"),
            ("Empty", ""),
        ]);
        let req = build_request("https://api.namecheap.com/xml.response", &credentials(), input.clone()).unwrap();
        let mut sent = decode_form(&req);
        for key in ["Username", "ApiKey", "ApiUser", "ClientIp"] {
            sent.remove(key);
        }
        assert_eq!(sent, input);
    }

    #[test]
    fn unparseable_base_url_is_url_error() {
        let err = build_request("not a url", &credentials(), Params::new()).unwrap_err();
        assert!(matches!(err, Error::Url(_)));
    }

    #[test]
    fn unsupported_scheme_is_request_error() {
        let err = build_request("ftp://api.namecheap.com/xml.response", &credentials(), Params::new()).unwrap_err();
        assert!(matches!(err, Error::Request(_)));
    }
}
