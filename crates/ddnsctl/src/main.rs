// # ddnsctl - One-shot DDNS updater
//
// This binary is a THIN integration layer:
// - DO NOT add DNS or reconciliation logic here
// - All DDNS logic lives in ddns-core
//
// ddnsctl is responsible for:
// 1. Reading configuration from flags and environment variables
// 2. Validating it before any network call
// 3. Initializing logging and the runtime
// 4. Wiring the HTTP IP source and the DigitalOcean provider into the engine
// 5. Mapping the outcome to an exit code
//
// ## Configuration
//
// Every option can be given as a flag or an environment variable:
//
// - `--hostname` / `DDNS_HOSTNAME`: Hostname to keep up to date (required)
// - `--token` / `DDNS_PROVIDER_API_TOKEN`: DigitalOcean API token (required)
// - `-4` / `-6`: Only update the A or the AAAA record
// - `--ipv4` / `DDNS_IPV4`, `--ipv6` / `DDNS_IPV6`: Use this address, skip discovery
// - `--ttl` / `DDNS_TTL`: Record TTL in seconds
// - `--dry-run`, or `DDNS_MODE=dry-run`: List records, change nothing
// - `--log-level` / `DDNS_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export DDNS_PROVIDER_API_TOKEN=your_token
// ddnsctl --hostname home.example.com
// ```

use anyhow::{Context, Result};
use clap::Parser;
use ddns_core::config::{
    DEFAULT_DIGITALOCEAN_API_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_IPV4_URL, DEFAULT_IPV6_URL,
    DEFAULT_TTL,
};
use ddns_core::{
    Action, DdnsConfig, DdnsEngine, FamilySelection, ForcedAddresses, Hostname, IpSourceConfig,
    ProviderConfig, RunReport,
};
use ddns_ip_http::HttpIpSource;
use ddns_provider_digitalocean::DigitalOceanProvider;
use std::io::IsTerminal;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Run completed
/// - 1: Configuration error (nothing was sent over the network)
/// - 2: Runtime error (address discovery or provider failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Run completed, records are up to date
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "ddnsctl")]
#[command(version)]
#[command(about = "Point a hostname's A/AAAA records at this machine's public addresses")]
struct Cli {
    /// Hostname to update (e.g. home.example.com)
    #[arg(long, env = "DDNS_HOSTNAME", value_name = "HOST")]
    hostname: String,

    /// DigitalOcean API token
    #[arg(long, env = "DDNS_PROVIDER_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Only update the A record
    #[arg(short = '4', long, conflicts_with = "ipv6_only")]
    ipv4_only: bool,

    /// Only update the AAAA record
    #[arg(short = '6', long)]
    ipv6_only: bool,

    /// Use this IPv4 address instead of discovering it
    #[arg(long, env = "DDNS_IPV4", value_name = "ADDR")]
    ipv4: Option<Ipv4Addr>,

    /// Use this IPv6 address instead of discovering it
    #[arg(long, env = "DDNS_IPV6", value_name = "ADDR")]
    ipv6: Option<Ipv6Addr>,

    /// Record TTL in seconds
    #[arg(long, env = "DDNS_TTL", default_value_t = DEFAULT_TTL)]
    ttl: u32,

    /// HTTP timeout in seconds
    #[arg(long, env = "DDNS_HTTP_TIMEOUT", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    timeout: u64,

    /// List records but do not change anything
    #[arg(long)]
    dry_run: bool,

    /// Run mode (`dry-run` is the same as --dry-run)
    #[arg(long, env = "DDNS_MODE", hide = true, value_parser = ["live", "dry-run"])]
    mode: Option<String>,

    /// IPv4 address-echo endpoint
    #[arg(long, env = "DDNS_IPV4_URL", default_value = DEFAULT_IPV4_URL)]
    ipv4_url: String,

    /// IPv6 address-echo endpoint
    #[arg(long, env = "DDNS_IPV6_URL", default_value = DEFAULT_IPV6_URL)]
    ipv6_url: String,

    /// DigitalOcean API base URL
    #[arg(long, env = "DDNS_API_URL", default_value = DEFAULT_DIGITALOCEAN_API_URL)]
    api_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        env = "DDNS_LOG_LEVEL",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,
}

impl Cli {
    fn is_dry_run(&self) -> bool {
        self.dry_run || self.mode.as_deref() == Some("dry-run")
    }

    fn families(&self) -> FamilySelection {
        if self.ipv4_only {
            FamilySelection::ipv4_only()
        } else if self.ipv6_only {
            FamilySelection::ipv6_only()
        } else {
            FamilySelection::both()
        }
    }

    /// Build the run configuration
    ///
    /// A missing token becomes an empty one so that validation reports it.
    fn to_config(&self) -> DdnsConfig {
        DdnsConfig {
            hostname: self.hostname.clone(),
            families: self.families(),
            forced: ForcedAddresses {
                ipv4: self.ipv4,
                ipv6: self.ipv6,
            },
            ttl: self.ttl,
            provider: ProviderConfig::DigitalOcean {
                api_token: self.token.clone().unwrap_or_default(),
                api_url: self.api_url.clone(),
                dry_run: self.is_dry_run(),
            },
            ip_source: IpSourceConfig::Http {
                ipv4_url: self.ipv4_url.clone(),
                ipv6_url: self.ipv6_url.clone(),
            },
            http_timeout_secs: self.timeout,
        }
    }

    fn log_level(&self) -> Level {
        match self.log_level.as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                DdnsExitCode::ConfigError.into()
            } else {
                DdnsExitCode::Success.into()
            };
        }
    };

    let config = cli.to_config();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Logs and errors go to stderr; stdout stays clean for callers
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match run(config).await {
            Ok(()) => DdnsExitCode::Success,
            Err(e) => {
                error!("Update failed: {:#}", e);
                exit_code_for(&e)
            }
        }
    });

    code.into()
}

/// Wire the collaborators and run the engine once
async fn run(config: DdnsConfig) -> Result<()> {
    let timeout = Duration::from_secs(config.http_timeout_secs);

    let ip_source = HttpIpSource::from_config(&config.ip_source, timeout)
        .context("Failed to create IP source")?;
    let provider = DigitalOceanProvider::from_config(&config.provider, timeout)
        .context("Failed to create DigitalOcean provider")?;

    info!(
        "Using {} provider ({} mode)",
        config.provider.type_name(),
        if provider.is_dry_run() { "dry-run" } else { "live" }
    );

    let engine = DdnsEngine::new(Box::new(ip_source), Box::new(provider), config)?;
    let report = engine.run().await?;

    log_summary(engine.hostname(), &report);
    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> DdnsExitCode {
    match err.downcast_ref::<ddns_core::Error>() {
        Some(e) if e.is_config_error() => DdnsExitCode::ConfigError,
        _ => DdnsExitCode::RuntimeError,
    }
}

fn log_summary(hostname: &Hostname, report: &RunReport) {
    for (record_type, action) in &report.actions {
        info!("{} {}: {}", hostname, record_type, describe(action));
    }
    info!("Done: {} change(s) for {}", report.mutation_count(), hostname);
}

fn describe(action: &Action) -> String {
    match action {
        Action::NoRecordNoAddress => "no record, no address".to_string(),
        Action::Unchanged { address, .. } => format!("unchanged ({})", address),
        Action::Created { address, .. } => format!("created ({})", address),
        Action::Updated {
            previous, address, ..
        } => format!("updated ({} -> {})", previous, address),
        Action::Deleted { previous, .. } => format!("deleted ({})", previous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["ddnsctl"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--hostname", "home.example.com", "--token", "t0ken"]);
        let config = cli.to_config();

        assert_eq!(config.hostname, "home.example.com");
        assert_eq!(config.families, FamilySelection::both());
        assert_eq!(config.ttl, DEFAULT_TTL);
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(config.ip_source, IpSourceConfig::default());
        assert!(!cli.is_dry_run());
        assert_eq!(cli.log_level(), Level::INFO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_family_flags() {
        let cli = parse(&["--hostname", "home.example.com", "-4"]);
        assert_eq!(cli.families(), FamilySelection::ipv4_only());

        let cli = parse(&["--hostname", "home.example.com", "--ipv6-only"]);
        assert_eq!(cli.families(), FamilySelection::ipv6_only());
    }

    #[test]
    fn test_family_flags_conflict() {
        let result = Cli::try_parse_from(["ddnsctl", "--hostname", "home.example.com", "-4", "-6"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_forced_addresses_are_typed() {
        let cli = parse(&[
            "--hostname",
            "home.example.com",
            "--ipv4",
            "203.0.113.5",
            "--ipv6",
            "2001:db8::5",
        ]);
        let config = cli.to_config();
        assert_eq!(config.forced.ipv4, Some("203.0.113.5".parse().unwrap()));
        assert_eq!(config.forced.ipv6, Some("2001:db8::5".parse().unwrap()));

        let result = Cli::try_parse_from([
            "ddnsctl",
            "--hostname",
            "home.example.com",
            "--ipv4",
            "2001:db8::5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_dry_run_via_mode() {
        let cli = parse(&["--hostname", "home.example.com", "--mode", "dry-run"]);
        assert!(cli.is_dry_run());

        match cli.to_config().provider {
            ProviderConfig::DigitalOcean { dry_run, .. } => assert!(dry_run),
        }

        let result = Cli::try_parse_from(["ddnsctl", "--hostname", "a.example.com", "--mode", "yolo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let cli = parse(&["--hostname", "home.example.com", "--token", ""]);
        let err = cli.to_config().validate().unwrap_err();

        assert!(matches!(err, ddns_core::Error::MissingCredential(_)));
        assert_eq!(
            exit_code_for(&anyhow::Error::new(err)),
            DdnsExitCode::ConfigError
        );
    }

    #[test]
    fn test_runtime_errors_map_to_exit_code_two() {
        let err = anyhow::Error::new(ddns_core::Error::address_resolution("timed out"));
        assert_eq!(exit_code_for(&err), DdnsExitCode::RuntimeError);

        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&err), DdnsExitCode::RuntimeError);
    }

    #[test]
    fn test_describe_actions() {
        let action = Action::Updated {
            record_id: "42".to_string(),
            previous: "198.51.100.1".to_string(),
            address: "203.0.113.5".parse().unwrap(),
        };
        assert_eq!(describe(&action), "updated (198.51.100.1 -> 203.0.113.5)");
        assert_eq!(describe(&Action::NoRecordNoAddress), "no record, no address");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
