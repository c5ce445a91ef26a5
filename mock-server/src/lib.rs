//! In-process stand-in for the Namecheap XML API and the IP echo service.
//!
//! Mirrors the remote contract closely enough for the client's integration
//! tests: every response is HTTP 200, failures are reported as `<Error>`
//! entries, and all authentication problems are collected rather than
//! stopping at the first one.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use quick_xml::escape::escape;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const ECHO_IP: &str = "127.0.0.1";
pub const DOMAINS_CHECK: &str = "namecheap.domains.check";

pub const ERR_MISSING_API_USER: &str = "1010101";
pub const ERR_MISSING_API_KEY: &str = "1010102";
pub const ERR_MISSING_COMMAND: &str = "1010104";
pub const ERR_MISSING_CLIENT_IP: &str = "1010105";
pub const ERR_INVALID_API_KEY: &str = "1011102";
pub const ERR_UNKNOWN_COMMAND: &str = "1011104";
pub const ERR_INVALID_IP: &str = "1011150";
pub const ERR_MISSING_DOMAIN_LIST: &str = "2011169";
pub const ERR_UNSUPPORTED_TLD: &str = "2030280";

/// The single API account the server accepts.
#[derive(Debug, Clone)]
pub struct Account {
    pub username: String,
    pub api_user: String,
    pub api_key: String,
    pub allowed_ips: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PremiumPricing {
    pub registration: f64,
    pub renewal: f64,
    pub restore: f64,
    pub transfer: f64,
}

/// Account plus the domain inventory answered by `namecheap.domains.check`.
#[derive(Debug, Clone)]
pub struct Registry {
    pub account: Account,
    pub echo_ip: String,
    pub registered: HashSet<String>,
    pub premium: HashMap<String, PremiumPricing>,
}

impl Default for Registry {
    fn default() -> Self {
        let account = Account {
            username: "demo".to_string(),
            api_user: "demo".to_string(),
            api_key: "demo-api-key".to_string(),
            allowed_ips: vec![ECHO_IP.to_string()],
        };
        let premium = HashMap::from([(
            "us.xyz".to_string(),
            PremiumPricing {
                registration: 13000.0,
                renewal: 13000.0,
                restore: 6500.0,
                transfer: 13000.0,
            },
        )]);
        Self {
            account,
            echo_ip: ECHO_IP.to_string(),
            registered: HashSet::from(["taken.com".to_string(), "example.org".to_string()]),
            premium,
        }
    }
}

/// Every form posted to `/xml.response`, in arrival order.
pub type RequestLog = Arc<RwLock<Vec<BTreeMap<String, String>>>>;

#[derive(Debug, Clone)]
pub struct AppState {
    registry: Arc<Registry>,
    received: RequestLog,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            received: RequestLog::default(),
        }
    }

    pub async fn received(&self) -> Vec<BTreeMap<String, String>> {
        self.received.read().await.clone()
    }

    /// For callers outside the runtime, e.g. synchronous integration tests.
    pub fn blocking_received(&self) -> Vec<BTreeMap<String, String>> {
        self.received.blocking_read().clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Registry::default())
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/xml.response", post(xml_response))
        .route("/getip", get(get_ip))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn get_ip(State(state): State<AppState>) -> String {
    state.registry.echo_ip.clone()
}

async fn xml_response(
    State(state): State<AppState>,
    Form(form): Form<BTreeMap<String, String>>,
) -> impl IntoResponse {
    state.received.write().await.push(form.clone());

    let command = form.get("Command").map(String::as_str).unwrap_or_default();
    let mut errors = authenticate(&state.registry.account, &form);

    let payload = if !errors.is_empty() {
        None
    } else if command.is_empty() {
        errors.push(Fault::new(ERR_MISSING_COMMAND, "Parameter Command is missing"));
        None
    } else if command == DOMAINS_CHECK {
        match domains_check(&state.registry, &form) {
            Ok(results) => Some(results),
            Err(fault) => {
                errors.push(fault);
                None
            }
        }
    } else {
        errors.push(Fault::new(
            ERR_UNKNOWN_COMMAND,
            format!("Invalid Command {command}"),
        ));
        None
    };

    info!(command, errors = errors.len(), "handled API request");
    (
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        render_envelope(command, &errors, payload.as_deref()),
    )
}

#[derive(Debug, Clone, PartialEq)]
struct Fault {
    number: &'static str,
    message: String,
}

impl Fault {
    fn new(number: &'static str, message: impl Into<String>) -> Self {
        Self {
            number,
            message: message.into(),
        }
    }
}

fn authenticate(account: &Account, form: &BTreeMap<String, String>) -> Vec<Fault> {
    let field = |key: &str| form.get(key).map(String::as_str).unwrap_or_default();
    let mut faults = Vec::new();

    let api_user = field("ApiUser");
    let api_key = field("ApiKey");
    if api_user.is_empty() {
        faults.push(Fault::new(ERR_MISSING_API_USER, "Parameter APIUser is missing"));
    }
    if api_key.is_empty() {
        faults.push(Fault::new(ERR_MISSING_API_KEY, "Parameter APIKey is missing"));
    }
    if !api_user.is_empty()
        && !api_key.is_empty()
        && (api_user != account.api_user
            || api_key != account.api_key
            || field("Username") != account.username)
    {
        faults.push(Fault::new(
            ERR_INVALID_API_KEY,
            "API Key is invalid or API access has not been enabled",
        ));
    }

    let client_ip = field("ClientIp");
    if client_ip.is_empty() {
        faults.push(Fault::new(ERR_MISSING_CLIENT_IP, "Parameter ClientIp is missing"));
    } else if !account.allowed_ips.iter().any(|ip| ip == client_ip) {
        faults.push(Fault::new(
            ERR_INVALID_IP,
            format!("Invalid request IP: {client_ip}"),
        ));
    }

    faults
}

/// Renders the `DomainCheckResult` elements for the requested list.
fn domains_check(registry: &Registry, form: &BTreeMap<String, String>) -> Result<String, Fault> {
    let domains: Vec<&str> = form
        .get("DomainList")
        .map(|list| list.split(',').map(str::trim).filter(|d| !d.is_empty()).collect())
        .unwrap_or_default();
    if domains.is_empty() {
        return Err(Fault::new(ERR_MISSING_DOMAIN_LIST, "Parameter DomainList is missing"));
    }

    let mut out = String::new();
    for domain in domains {
        let key = domain.to_ascii_lowercase();
        let name = escape(domain);
        if !key.contains('.') {
            out.push_str(&format!(
                r#"<DomainCheckResult Domain="{name}" Available="false" ErrorNo="{ERR_UNSUPPORTED_TLD}" Description="TLD is not supported in API" />"#
            ));
            continue;
        }

        let available = !registry.registered.contains(&key);
        let (is_premium, pricing) = match registry.premium.get(&key) {
            Some(pricing) => (true, *pricing),
            None => (
                false,
                PremiumPricing {
                    registration: 0.0,
                    renewal: 0.0,
                    restore: 0.0,
                    transfer: 0.0,
                },
            ),
        };
        out.push_str(&format!(
            r#"<DomainCheckResult Domain="{name}" Available="{available}" ErrorNo="0" Description="" IsPremiumName="{is_premium}" PremiumRegistrationPrice="{:.4}" PremiumRenewalPrice="{:.4}" PremiumRestorePrice="{:.4}" PremiumTransferPrice="{:.4}" IcannFee="0" EapFee="0" />"#,
            pricing.registration, pricing.renewal, pricing.restore, pricing.transfer,
        ));
    }
    Ok(out)
}

fn render_envelope(command: &str, errors: &[Fault], payload: Option<&str>) -> String {
    let status = if errors.is_empty() { "OK" } else { "ERROR" };
    let command = escape(command);

    let mut out = String::from(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    out.push_str(&format!(
        r#"<ApiResponse Status="{status}" xmlns="http://api.namecheap.com/xml.response">"#
    ));
    if errors.is_empty() {
        out.push_str("<Errors />");
    } else {
        out.push_str("<Errors>");
        for fault in errors {
            out.push_str(&format!(
                r#"<Error Number="{}">{}</Error>"#,
                fault.number,
                escape(fault.message.as_str())
            ));
        }
        out.push_str("</Errors>");
    }
    out.push_str("<Warnings />");
    out.push_str(&format!("<RequestedCommand>{command}</RequestedCommand>"));
    match payload {
        Some(body) => out.push_str(&format!(r#"<CommandResponse Type="{command}">{body}</CommandResponse>"#)),
        None => out.push_str(&format!(r#"<CommandResponse Type="{command}" />"#)),
    }
    out.push_str("<Server>MOCK01</Server><GMTTimeDifference>--0:00</GMTTimeDifference><ExecutionTime>0.001</ExecutionTime>");
    out.push_str("</ApiResponse>");
    out
}
