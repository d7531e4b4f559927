//! SpanExplore CLI
//!
//! Command-line interface for decoding and composing explore view query params.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use spanexplore::models::{ReadableQueryParams, WritableQueryParams};
use spanexplore::query::{self, OrganizationFeatures, RawQueryParams};
use spanexplore::{api::HttpServer, Config};

/// SpanExplore - Readable query params for span exploration
#[derive(Parser)]
#[command(name = "spanexplore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SPANEXPLORE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (for commands that support it)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a query string into explore view params
    Resolve {
        /// Query string, with or without the leading `?`
        query: String,

        /// Extra organization feature flags
        #[arg(long = "feature")]
        features: Vec<String>,
    },

    /// Show the params used when the URL carries none
    Defaults {
        /// Extra organization feature flags
        #[arg(long = "feature")]
        features: Vec<String>,
    },

    /// Encode explore view params (JSON) into a query string
    Encode {
        /// JSON file holding the params, `-` for stdin
        #[arg(default_value = "-")]
        input: String,
    },

    /// Apply a partial update (JSON) to a query string
    Update {
        /// Current query string
        query: String,

        /// JSON file holding the update, `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Extra organization feature flags, used with `--format json`
        #[arg(long = "feature")]
        features: Vec<String>,
    },

    /// Start the HTTP API server
    Serve {
        /// HTTP API port
        #[arg(long, env = "SPANEXPLORE_HTTP_PORT")]
        http_port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let _ = dotenvy::dotenv();
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Resolve { query, features } => {
            run_resolve(&config, &query, features, cli.format)
        }
        Commands::Defaults { features } => run_resolve(&config, "", features, cli.format),
        Commands::Encode { input } => run_encode(&input),
        Commands::Update {
            query,
            input,
            features,
        } => run_update(&config, &query, &input, features, cli.format),
        Commands::Serve { http_port } => run_serve(config, http_port).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let log_level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn features_with(config: &Config, extra: Vec<String>) -> OrganizationFeatures {
    let mut features = config.explore.features();
    features.extend(extra);
    features
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))
    }
}

fn run_resolve(
    config: &Config,
    query_string: &str,
    features: Vec<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let raw = RawQueryParams::parse(query_string);
    let features = features_with(config, features);
    let params = query::decode(&raw, &features)?;

    print_params(&params, format)
}

fn run_encode(input: &str) -> anyhow::Result<()> {
    let params: ReadableQueryParams =
        serde_json::from_str(&read_input(input)?).context("parsing explore params")?;

    println!("{}", query::encode(&params).to_query_string());
    Ok(())
}

fn run_update(
    config: &Config,
    query_string: &str,
    input: &str,
    features: Vec<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let update: WritableQueryParams =
        serde_json::from_str(&read_input(input)?).context("parsing params update")?;

    let next = query::apply(&RawQueryParams::parse(query_string), &update);
    match format {
        OutputFormat::Text => println!("{}", next.to_query_string()),
        OutputFormat::Json => {
            let features = features_with(config, features);
            let params = query::decode(&next, &features)?;
            let output = serde_json::json!({
                "queryString": next.to_query_string(),
                "params": params,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

async fn run_serve(config: Config, http_port: Option<u16>) -> anyhow::Result<()> {
    let port = http_port.unwrap_or(config.server.http_port);
    let addr = format!("{}:{}", config.server.host, port);

    info!(
        features = ?config.explore.organization_features,
        "Starting SpanExplore API on {}", addr
    );

    HttpServer::new(config.explore.features()).serve(&addr).await?;
    Ok(())
}

fn print_params(params: &ReadableQueryParams, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(params)?),
        OutputFormat::Text => {
            let sorts = |sort_bys: &[spanexplore::models::SortBy]| {
                sort_bys
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            println!("mode:              {}", params.mode.as_str());
            println!("query:             {}", params.query);
            println!("cursor:            {}", params.cursor);
            println!("extrapolate:       {}", params.extrapolate);
            println!("fields:            {}", params.fields.join(", "));
            println!("sort:              {}", sorts(&params.sort_bys));
            println!("group by:");
            for group_by in params.group_bys() {
                let label = if group_by.group_by.is_empty() {
                    "(none)"
                } else {
                    group_by.group_by.as_str()
                };
                println!("  - {label}");
            }
            println!("visualize:");
            for visualize in params.visualizes() {
                println!(
                    "  - {} ({:?})",
                    visualize.y_axis,
                    visualize.selected_chart_type()
                );
            }
            println!("aggregate sort:    {}", sorts(&params.aggregate_sort_bys));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use spanexplore::query::OTEL_FRIENDLY_UI;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_update_accepts_features() {
        let cli = Cli::try_parse_from([
            "spanexplore",
            "update",
            "mode=aggregate",
            "update.json",
            "--feature",
            OTEL_FRIENDLY_UI,
        ])
        .unwrap();

        let Commands::Update { features, .. } = cli.command else {
            panic!("expected the update command");
        };
        assert!(features_with(&Config::default(), features).has(OTEL_FRIENDLY_UI));
    }

    #[test]
    fn test_features_with_keeps_configured_flags() {
        let mut config = Config::default();
        config.explore.organization_features = vec!["configured-flag".to_string()];

        let features = features_with(&config, vec![OTEL_FRIENDLY_UI.to_string()]);
        assert!(features.has("configured-flag"));
        assert!(features.has(OTEL_FRIENDLY_UI));
    }
}
