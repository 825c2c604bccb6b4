use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use std::process::exit;

use sancheck::config::{Config, ConfigError, DEFAULT_CONFIG_FILE};
use sancheck::{render, san, Certificate, Target};

mod metrics;

#[derive(Parser)]
#[command(
    name = "sancheck",
    version,
    about = "Fetches the TLS certificate a host presents (chain validation disabled) and checks whether its SANs authorize the requested hostname"
)]
struct Cli {
    /// Hostname to connect to
    #[arg(long)]
    hostname: Option<String>,

    /// Port to connect to
    #[arg(long)]
    port: Option<u16>,

    /// Output JSON
    #[arg(long)]
    json: bool,

    /// Do not set server-name in TLS configuration
    #[arg(long = "noservername")]
    no_server_name: bool,

    /// Don't validate given hostname
    #[arg(long = "no-validate")]
    no_validate: bool,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Push metrics to a Prometheus Push Gateway
    #[arg(long)]
    prometheus: bool,

    /// Prometheus push gateway address
    #[arg(long)]
    prometheus_address: Option<String>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", Config::example_toml());
        return;
    }

    exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    let hostname = match config.hostname {
        Some(ref hostname) if !hostname.is_empty() => hostname.clone(),
        _ => {
            eprintln!("no hostname specified");
            return 1;
        }
    };

    let no_server_name = config.no_server_name.unwrap_or(false);
    let target = match Target::new(&hostname, config.port, !no_server_name) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    let cert = match Certificate::from_target(&target) {
        Ok(cert) => cert,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    // The certificate is always shown, even when the verdict below turns out
    // negative.
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let rendered = if config.json.unwrap_or(false) {
        render::render_json(&cert, &mut out)
    } else {
        render::render_pretty(&cert, &mut out)
    };
    if let Err(e) = rendered {
        eprintln!("cannot write certificate summary: {}", e);
        return 1;
    }

    let verdict = if config.no_validate.unwrap_or(false) {
        None
    } else {
        Some(san::is_authorized(&cert.sans, &hostname))
    };

    push_metrics(&config, &cert, verdict);

    match verdict {
        Some(false) => {
            eprintln!("Validation failed: {} is not matched by SANS", hostname);
            1
        }
        _ => 0,
    }
}

/// Resolves the effective configuration: defaults, then the config file when
/// one is given or `sancheck.toml` exists, then CLI flags on top.
fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(path) = &cli.config {
        config = config.merge_with(Config::from_file(path)?);
    } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
        config = config.merge_with(Config::from_file(DEFAULT_CONFIG_FILE)?);
    }

    // Absent boolean flags stay None so they don't clobber file settings.
    let cli_config = Config::from_cli_args(
        cli.hostname.clone(),
        cli.port,
        cli.json.then_some(true),
        cli.no_server_name.then_some(true),
        cli.no_validate.then_some(true),
        cli.prometheus.then_some(true),
        cli.prometheus_address.clone(),
    );

    Ok(config.merge_with(cli_config))
}

fn push_metrics(config: &Config, cert: &Certificate, authorized: Option<bool>) {
    if let Some(prom) = &config.prometheus {
        if prom.enabled.unwrap_or(false) {
            if let Some(address) = &prom.address {
                metrics::prom::prometheus_metrics(cert, authorized, address);
            }
        }
    }
}
