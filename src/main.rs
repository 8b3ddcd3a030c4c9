use anyhow::{Context, Result};
use chrono::Utc;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wateringscale::{LoggingConfig, ScaleRequest, WateringConfig, WateringError, compute_scale};

const USAGE: &str = "Usage: wateringscale [--json] [--config FILE] [REQUEST.json]

Reads a JSON scale request from REQUEST.json (or stdin when omitted) and prints
the controller query string, or the JSON result with --json.";

#[derive(Debug, Default)]
struct CliArgs {
    json: bool,
    config: Option<PathBuf>,
    request: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<CliArgs>> {
    let mut cli = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--json" => cli.json = true,
            "--config" => {
                let path = args.next().context("--config needs a file argument")?;
                cli.config = Some(PathBuf::from(path));
            }
            other if other.starts_with('-') => {
                anyhow::bail!("Unknown option '{other}'\n\n{USAGE}");
            }
            path => cli.request = Some(PathBuf::from(path)),
        }
    }

    Ok(Some(cli))
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wateringscale={}", logging.level)));

    // Logs go to stderr so stdout stays the controller response
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn read_request(path: Option<&PathBuf>) -> Result<ScaleRequest> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(WateringError::from)
            .with_context(|| format!("Failed to read request file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(WateringError::from)
                .context("Failed to read request from stdin")?;
            buffer
        }
    };

    let request: ScaleRequest = serde_json::from_str(&raw)
        .map_err(WateringError::from)
        .context("Failed to decode scale request")?;
    request.validate()?;
    Ok(request)
}

fn run(cli: &CliArgs) -> Result<()> {
    let config = WateringConfig::load_from_path(cli.config.clone())?;
    init_logging(&config.logging);
    debug!(?config, "Configuration loaded");

    let request = read_request(cli.request.as_ref())?;
    let result = compute_scale(&request, &config.scale, Utc::now());

    if cli.json {
        println!("{}", result.to_json()?);
    } else {
        println!("{}", result.to_query_string());
    }

    Ok(())
}

fn main() -> Result<()> {
    let Some(cli) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    run(&cli).inspect_err(|e| {
        if let Some(watering_error) = e.downcast_ref::<WateringError>() {
            error!("{}", watering_error.user_message());
        }
    })
}
