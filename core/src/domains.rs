//! `namecheap.domains.check`: domain availability and premium pricing.

use serde::Deserialize;

use crate::request::{Command, Params};

/// Checks availability of one or more domains in a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainsCheck {
    pub domains: Vec<String>,
}

impl DomainsCheck {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }
}

impl Command for DomainsCheck {
    const NAME: &'static str = "namecheap.domains.check";
    type Response = DomainsCheckCommandResponse;

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.insert("DomainList".to_string(), self.domains.join(","));
        params
    }
}

/// `<CommandResponse Type="namecheap.domains.check">`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DomainsCheckCommandResponse {
    #[serde(rename = "@Type", default)]
    pub command_type: Option<String>,
    #[serde(rename = "DomainCheckResult", default)]
    pub results: Vec<DomainCheckResult>,
}

impl DomainsCheckCommandResponse {
    /// The result for `domain`, compared case-insensitively.
    pub fn result_for(&self, domain: &str) -> Option<&DomainCheckResult> {
        self.results.iter().find(|r| {
            r.domain
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(domain))
        })
    }
}

/// One `<DomainCheckResult>`. Every attribute is optional so a missing value
/// stays distinct from a reported zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DomainCheckResult {
    #[serde(rename = "@Domain", default)]
    pub domain: Option<String>,
    #[serde(rename = "@Available", default)]
    pub available: Option<bool>,
    #[serde(rename = "@ErrorNo", default)]
    pub error_no: Option<String>,
    #[serde(rename = "@Description", default)]
    pub description: Option<String>,
    #[serde(rename = "@IsPremiumName", default)]
    pub is_premium_name: Option<bool>,
    #[serde(rename = "@PremiumRegistrationPrice", default)]
    pub premium_registration_price: Option<f64>,
    #[serde(rename = "@PremiumRenewalPrice", default)]
    pub premium_renewal_price: Option<f64>,
    #[serde(rename = "@PremiumRestorePrice", default)]
    pub premium_restore_price: Option<f64>,
    #[serde(rename = "@PremiumTransferPrice", default)]
    pub premium_transfer_price: Option<f64>,
    #[serde(rename = "@IcannFee", default)]
    pub icann_fee: Option<f64>,
    #[serde(rename = "@EapFee", default)]
    pub eap_fee: Option<f64>,
}

impl DomainCheckResult {
    /// `false` when the attribute was not reported.
    pub fn is_available(&self) -> bool {
        self.available.unwrap_or(false)
    }

    /// `false` when the attribute was not reported.
    pub fn is_premium(&self) -> bool {
        self.is_premium_name.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Decoder;
    use crate::envelope::ApiResponse;

    const STANDARD: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
  <Errors />
  <Warnings />
  <RequestedCommand>namecheap.domains.check</RequestedCommand>
  <CommandResponse Type="namecheap.domains.check">
    <DomainCheckResult Domain="example.com" Available="true" ErrorNo="0" Description="" IsPremiumName="false" PremiumRegistrationPrice="0" PremiumRenewalPrice="0" PremiumRestorePrice="0" PremiumTransferPrice="0" IcannFee="0" EapFee="0" />
  </CommandResponse>
  <Server>PHX01SBAPIEXT06</Server>
  <GMTTimeDifference>--4:00</GMTTimeDifference>
  <ExecutionTime>0.417</ExecutionTime>
</ApiResponse>"#;

    const PREMIUM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
  <Errors />
  <CommandResponse Type="namecheap.domains.check">
    <DomainCheckResult Domain="us.xyz" Available="true" ErrorNo="0" Description="" IsPremiumName="true" PremiumRegistrationPrice="13000.0000" PremiumRenewalPrice="13000.0000" PremiumRestorePrice="6500.0000" PremiumTransferPrice="13000.0000" IcannFee="0.0000" EapFee="0.0000" />
  </CommandResponse>
</ApiResponse>"#;

    fn evaluate(xml: &str) -> DomainsCheckCommandResponse {
        Decoder::default()
            .decode::<ApiResponse<DomainsCheckCommandResponse>>(xml.as_bytes())
            .unwrap()
            .evaluate()
            .unwrap()
    }

    #[test]
    fn params_join_domains() {
        let cmd = DomainsCheck::new(["example.com", "example.net"]);
        let params = cmd.params();
        assert_eq!(params.len(), 1);
        assert_eq!(params["DomainList"], "example.com,example.net");
        assert_eq!(DomainsCheck::NAME, "namecheap.domains.check");
    }

    #[test]
    fn standard_domain_result() {
        let payload = evaluate(STANDARD);
        assert_eq!(payload.command_type.as_deref(), Some("namecheap.domains.check"));
        let result = payload.result_for("example.com").unwrap();
        assert!(result.is_available());
        assert!(!result.is_premium());
        assert_eq!(result.premium_registration_price, Some(0.0));
        assert_eq!(result.error_no.as_deref(), Some("0"));
    }

    #[test]
    fn premium_domain_result() {
        let payload = evaluate(PREMIUM);
        let result = &payload.results[0];
        assert_eq!(result.domain.as_deref(), Some("us.xyz"));
        assert!(result.is_premium());
        assert_eq!(result.premium_registration_price, Some(13000.0));
        assert_eq!(result.premium_renewal_price, Some(13000.0));
        assert_eq!(result.premium_restore_price, Some(6500.0));
        assert_eq!(result.premium_transfer_price, Some(13000.0));
    }

    #[test]
    fn absent_attributes_stay_none() {
        let payload = evaluate(
            r#"<ApiResponse Status="OK"><Errors/><CommandResponse Type="namecheap.domains.check"><DomainCheckResult Domain="bare.org" Available="false"/></CommandResponse></ApiResponse>"#,
        );
        let result = payload.result_for("BARE.org").unwrap();
        assert_eq!(result.available, Some(false));
        assert_eq!(result.is_premium_name, None);
        assert_eq!(result.premium_registration_price, None);
        assert_eq!(result.eap_fee, None);
    }

    #[test]
    fn multiple_results_keep_document_order() {
        let payload = evaluate(
            r#"<ApiResponse Status="OK"><Errors/><CommandResponse Type="namecheap.domains.check">
                <DomainCheckResult Domain="a.com" Available="true"/>
                <DomainCheckResult Domain="b.com" Available="false"/>
            </CommandResponse></ApiResponse>"#,
        );
        let domains: Vec<_> = payload.results.iter().filter_map(|r| r.domain.as_deref()).collect();
        assert_eq!(domains, ["a.com", "b.com"]);
        assert!(payload.result_for("c.com").is_none());
    }

    #[test]
    fn non_boolean_available_is_decode_error() {
        let result = Decoder::default().decode::<ApiResponse<DomainsCheckCommandResponse>>(
            br#"<ApiResponse Status="OK"><Errors/><CommandResponse Type="namecheap.domains.check"><DomainCheckResult Domain="a.com" Available="maybe"/></CommandResponse></ApiResponse>"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_numeric_attribute_is_decode_error() {
        let err = Decoder::default()
            .decode::<ApiResponse<DomainsCheckCommandResponse>>(
                br#"<ApiResponse Status="OK"><Errors/><CommandResponse Type="namecheap.domains.check"><DomainCheckResult Domain="a.com" Available="true" PremiumRegistrationPrice=""/></CommandResponse></ApiResponse>"#,
            )
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Decode(_)), "{err:?}");
    }

    #[test]
    fn empty_description_is_kept_as_empty_text() {
        let payload = evaluate(STANDARD);
        assert_eq!(payload.results[0].description.as_deref(), Some(""));
    }
}
