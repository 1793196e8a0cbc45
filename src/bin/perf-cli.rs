use std::path::PathBuf;
use axum::http::Method;
use clap::{Parser, Subcommand};

use perf_middleware::config::{apply_env_overrides, load_config, PerfConfig};
use perf_middleware::routing::{normalize_path, RouteResolver, RouteTable};
use perf_middleware::telemetry::{TelemetryReporter, TimingRecord};

#[derive(Parser)]
#[command(name = "perf-cli")]
#[command(about = "Inspect route normalization and test timing delivery", long_about = None)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the route template a path normalizes to
    Normalize {
        path: String,
        #[arg(short, long, default_value = "GET")]
        method: String,
    },
    /// Send one synthetic timing record to the ingest endpoint
    Ping {
        /// Override the configured endpoint
        #[arg(short, long)]
        endpoint: Option<String>,
        /// Override the configured API key
        #[arg(short, long)]
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PerfConfig::default(),
    };
    apply_env_overrides(&mut config);

    match cli.command {
        Commands::Normalize { path, method } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let table = RouteTable::from_config(&config.routes)?;
            let recognition = table.recognize_path(&path, &method);

            match normalize_path(&path, &recognition) {
                Some(template) => {
                    println!("{template}");
                    if let Some(route) = recognition.route() {
                        for (name, value) in route.iter() {
                            println!("  {name} = {value}");
                        }
                    }
                }
                None => {
                    eprintln!("No route matches {method} {path}; it would not be reported");
                    std::process::exit(1);
                }
            }
        }
        Commands::Ping { endpoint, key } => {
            let mut reporter_config = config.reporter.clone();
            if let Some(endpoint) = endpoint {
                reporter_config.endpoint = endpoint;
            }
            if let Some(key) = key {
                reporter_config.api_key = key;
            }
            reporter_config.debug = true;

            let reporter = TelemetryReporter::new(reporter_config);
            let record = TimingRecord {
                ip_addr: "127.0.0.1".into(),
                request_method: "GET".into(),
                request_url: "http://localhost/perf-cli/ping".into(),
                normalized_uri: "/perf-cli/ping".into(),
                status_code: 200,
                time_in_millis: 0,
            };

            println!("{}", record.to_payload()?);
            match reporter.send(&record).await {
                Ok(()) => println!("Delivered to {}", reporter.endpoint()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
