//! FARECAST — multi-strategy airfare analysis and savings engine
//!
//! Entry point. Parses the command line, loads configuration, initialises
//! structured logging, runs one analysis (cancellable with Ctrl+C), prints
//! the summary and exports the result as JSON.

use anyhow::Result;
use clap::Parser;
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use farecast::config::AppConfig;
use farecast::engine::Analyzer;
use farecast::estimators::fares::SimulatedFares;
use farecast::report::{self, export};
use farecast::types::{parse_date, Query};

const BANNER: &str = r#"
  _____ _    ____  _____ ____    _    ____ _____
 |  ___/ \  |  _ \| ____/ ___|  / \  / ___|_   _|
 | |_ / _ \ | |_) |  _|| |     / _ \ \___ \ | |
 |  _/ ___ \|  _ <| |__| |___ / ___ \ ___) || |
 |_|/_/   \_\_| \_\_____\____/_/   \_\____/ |_|

  Multi-strategy airfare analysis
  v0.1.0
"#;

/// Farecast - find the cheapest way to fly a route.
#[derive(Parser, Debug)]
#[command(name = "farecast")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Origin airport code (e.g. FRA)
    origin: String,

    /// Destination airport code (e.g. JFK)
    destination: String,

    /// Departure date (YYYY-MM-DD, DD.MM.YYYY or DD/MM/YYYY)
    departure: String,

    /// Return date, same formats as departure
    #[arg(short = 'r', long = "return")]
    return_date: Option<String>,

    /// Target price in the base currency
    #[arg(short, long)]
    target: Option<Decimal>,

    /// Export file name (".json" is appended when missing)
    #[arg(short, long)]
    export: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Countries to compare for geo-pricing, comma separated (e.g. DE,PL)
    #[arg(long, value_delimiter = ',')]
    countries: Vec<String>,

    /// Print the summary without writing the JSON export
    #[arg(long)]
    no_export: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    // Missing config is fine; a broken one is not.
    let config_found = Path::new(&cli.config).exists();
    let cfg = if config_found {
        AppConfig::load(&cli.config)?
    } else {
        AppConfig::default()
    };

    init_logging(&cfg);
    if !config_found {
        warn!(path = %cli.config, "Config file not found, using defaults");
    }

    println!("{BANNER}");

    let query = build_query(&cli)?;
    info!(
        route = %query,
        round_trip = query.is_round_trip(),
        target = ?query.target_price(),
        "Query accepted"
    );

    let analyzer = Analyzer::from_config(&cfg, Arc::new(SimulatedFares::new()))?;
    let result = analyzer
        .analyze_until(&query, tokio::signal::ctrl_c())
        .await?;

    print!("{}", report::render_summary(&result));

    if cli.no_export {
        info!("Export skipped");
    } else {
        let path = export::export_path(cli.export.as_deref());
        export::save_report(&result, Some(&path))?;
        println!("Results exported to {path}");
    }

    Ok(())
}

/// Build the validated query from command-line arguments. Dates are
/// relative to today.
fn build_query(cli: &Cli) -> Result<Query> {
    let departure = parse_date(&cli.departure)?;
    let return_date = cli.return_date.as_deref().map(parse_date).transpose()?;
    let today = chrono::Local::now().date_naive();

    let mut query = Query::new(&cli.origin, &cli.destination, departure, return_date, today)?;
    if let Some(target) = cli.target {
        query = query.with_target_price(target)?;
    }
    if !cli.countries.is_empty() {
        query = query.with_countries(&cli.countries);
    }
    Ok(query)
}

/// Initialise the `tracing` subscriber.
fn init_logging(cfg: &AppConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("farecast=info"));

    let json_logging = cfg.logging.json || std::env::var("FARECAST_LOG_JSON").is_ok();

    // Logs go to stderr so the printed summary stays clean.
    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
