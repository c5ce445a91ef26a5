//! Command-line host for `namecheap-core`.
//!
//! Credentials come from `NAMECHEAP_*` environment variables; flags override
//! the endpoint, source IP and debug switch.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use namecheap_core::{Config, DomainCheckResult, NamecheapClient};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "namecheap", version, about = "Query the Namecheap XML API")]
struct Cli {
    /// Use the sandbox endpoint instead of production
    #[arg(long, global = true)]
    sandbox: bool,

    /// Allow-listed source IP; looked up automatically when omitted
    #[arg(long, global = true)]
    ip: Option<String>,

    /// Log raw response payloads
    #[arg(long, global = true)]
    debug: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check availability and premium pricing of one or more domains
    Check {
        #[arg(required = true)]
        domains: Vec<String>,
    },
}

/// Filter used when `RUST_LOG` is unset. Debug mode needs debug level or the
/// raw payloads never reach the output.
fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "warn"
    }
}

fn init_logging(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(debug))),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Applies flag overrides on top of the environment-derived `base`.
fn config_from(cli: &Cli, base: Config) -> Config {
    let mut config = base;
    if cli.sandbox {
        config = config.with_sandbox(true);
    }
    if let Some(ip) = &cli.ip {
        config = config.with_source_ip(ip);
    }
    if cli.debug {
        config = config.with_debug(true);
    }
    config
}

fn format_result(result: &DomainCheckResult) -> String {
    let domain = result.domain.as_deref().unwrap_or("?");
    let availability = match result.available {
        Some(true) => "available",
        Some(false) => "unavailable",
        None => "unknown",
    };
    let mut line = format!("{domain}\t{availability}");
    if result.is_premium() {
        if let Some(price) = result.premium_registration_price {
            line.push_str(&format!("\tpremium {price:.2}"));
        } else {
            line.push_str("\tpremium");
        }
    }
    line
}

fn run(cli: &Cli, config: Config) -> anyhow::Result<()> {
    let client = NamecheapClient::with_timeout(config, Duration::from_secs(cli.timeout))
        .context("failed to configure Namecheap client")?;

    match &cli.command {
        Commands::Check { domains } => {
            let payload = client
                .domains_check_many(domains.iter().cloned())
                .context("domain check failed")?;
            for result in &payload.results {
                println!("{}", format_result(result));
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = config_from(&cli, Config::from_env());
    init_logging(config.debug);

    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_with_flags() {
        let cli = Cli::try_parse_from(["namecheap", "--sandbox", "--ip", "10.0.0.1", "check", "a.com", "b.net"]).unwrap();
        assert!(cli.sandbox);
        assert_eq!(cli.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(cli.timeout, 30);
        let Commands::Check { domains } = cli.command;
        assert_eq!(domains, ["a.com", "b.net"]);
    }

    fn env(vars: &[(&str, &str)]) -> Config {
        let vars: Vec<(String, String)> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(move |key: &str| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn debug_env_enables_debug_logging_without_flag() {
        let cli = Cli::try_parse_from(["namecheap", "check", "a.com"]).unwrap();
        let config = config_from(&cli, env(&[("DEBUG", "1")]));
        assert!(config.debug);
        assert_eq!(default_filter(config.debug), "debug");
    }

    #[test]
    fn debug_flag_overrides_quiet_env() {
        let cli = Cli::try_parse_from(["namecheap", "--debug", "check", "a.com"]).unwrap();
        let config = config_from(&cli, env(&[]));
        assert!(config.debug);
        assert_eq!(default_filter(config.debug), "debug");
    }

    #[test]
    fn quiet_by_default() {
        let cli = Cli::try_parse_from(["namecheap", "check", "a.com"]).unwrap();
        let config = config_from(&cli, env(&[]));
        assert!(!config.debug);
        assert_eq!(default_filter(config.debug), "warn");
    }

    #[test]
    fn flags_override_environment() {
        let cli = Cli::try_parse_from(["namecheap", "--sandbox", "--ip", "10.0.0.9", "check", "a.com"]).unwrap();
        let config = config_from(&cli, env(&[("NAMECHEAP_IP", "10.0.0.1")]));
        assert_eq!(config.source_ip.as_deref(), Some("10.0.0.9"));
        assert_eq!(config.endpoint, namecheap_core::Endpoint::Sandbox);
    }

    #[test]
    fn check_requires_a_domain() {
        assert!(Cli::try_parse_from(["namecheap", "check"]).is_err());
    }

    #[test]
    fn format_premium_result() {
        let result = DomainCheckResult {
            domain: Some("us.xyz".to_string()),
            available: Some(true),
            is_premium_name: Some(true),
            premium_registration_price: Some(13000.0),
            ..DomainCheckResult::default()
        };
        assert_eq!(format_result(&result), "us.xyz\tavailable\tpremium 13000.00");
    }

    #[test]
    fn format_unreported_availability() {
        let result = DomainCheckResult {
            domain: Some("odd.com".to_string()),
            ..DomainCheckResult::default()
        };
        assert_eq!(format_result(&result), "odd.com\tunknown");
    }
}
