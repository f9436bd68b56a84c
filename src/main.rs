//! dump-proxy
//!
//! Forwards every inbound request to one upstream and prints each exchange.
//!
//! ```text
//!     Client ──▶ listener ──▶ dispatcher ──▶ logging transport ──▶ hyper client ──▶ Upstream
//!                                 (rewrite)        │
//!                                                  └──▶ stdout: one block per exchange
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use dump_proxy::config::loader::load_config;
use dump_proxy::config::ProxyConfig;
use dump_proxy::error::ConfigError;
use dump_proxy::lifecycle::{self, Overrides, Shutdown};
use dump_proxy::observability::{logging, metrics};
use dump_proxy::{net, HttpServer};

#[derive(Parser)]
#[command(name = "dump-proxy", version)]
#[command(about = "Reverse proxy that prints every request and response it forwards")]
#[command(after_help = "TARGET may be a URL, a bare host[:port], or a bare port number (same machine).")]
struct Cli {
    /// The port to listen on [default: 8080]
    #[arg(short, long)]
    port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Diagnostic log level, written to stderr
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Upstream to proxy to
    target: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => ProxyConfig::default(),
    };

    let overrides = Overrides {
        port: cli.port,
        target: cli.target,
        log_level: cli.log_level,
    };
    let (config, target) = match lifecycle::resolve(file_config, overrides) {
        Ok(resolved) => resolved,
        Err(ConfigError::MissingTarget) => {
            eprintln!("{}", Cli::command().render_help());
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!("dump-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = match net::bind(&config.listener).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to listen: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Listening on :{} and proxying to {}...",
        config.listener.port, target
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = match HttpServer::new(&config, target) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = server.run(listener, shutdown.subscribe()).await {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
