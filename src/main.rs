use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pipe_core::{Filter, OutputFormat, Pipeline, PipelineContext, Publisher, Render, SortOrder};
use pipe_relay::{decode_public_key, KeysSigner, NaddrEncoder, RelayClient};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "nostr-pipe")]
#[command(about = "Query, aggregate and republish Nostr events")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (default: ./nostr-pipe.toml if present)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Relay to query (overrides relay.url)
    #[arg(long, global = true)]
    relay: Option<String>,

    /// Relay timeout in seconds (overrides relay.timeout_secs)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the raw event buffer
    Events(QueryArgs),
    /// Count tag values
    Tags {
        #[command(flatten)]
        query: QueryArgs,
        /// Tag key to aggregate
        #[arg(long, default_value = "t")]
        key: String,
        /// Ordering of the counted values
        #[arg(long, value_enum, default_value_t = SortArg::Count)]
        sort: SortArg,
    },
    /// List the `title` tag of each event
    Titles(QueryArgs),
    /// Encode each event as an naddr
    Addresses {
        #[command(flatten)]
        query: QueryArgs,
        /// Relay hint to embed (repeatable)
        #[arg(long = "hint")]
        hints: Vec<String>,
    },
    /// Re-sign matching events with PRIVATE_KEY and publish them
    Republish {
        #[command(flatten)]
        query: QueryArgs,
        /// Destination relay (overrides publish.relay)
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Author npub or hex public key (repeatable)
    #[arg(long)]
    author: Vec<String>,
    /// Event kind (repeatable)
    #[arg(long)]
    kind: Vec<u16>,
    /// Maximum number of events
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Text => OutputFormat::Text,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Count,
    Name,
    None,
}

impl Commands {
    fn query(&self) -> &QueryArgs {
        match self {
            Commands::Events(query) | Commands::Titles(query) => query,
            Commands::Tags { query, .. }
            | Commands::Addresses { query, .. }
            | Commands::Republish { query, .. } => query,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())
        .with_context(|| "Failed to load configuration")?;
    if let Some(relay) = &cli.relay {
        config.relay.url = relay.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.relay.timeout_secs = timeout;
    }
    if let Commands::Republish { to: Some(to), .. } = &cli.command {
        config.publish.relay = Some(to.clone());
    }

    init_logging(&config.logging.level)?;

    config.validate().with_context(|| "Configuration validation failed")?;

    // Fail on a missing or malformed key before touching any relay.
    let signer = match &cli.command {
        Commands::Republish { .. } => {
            let secret = Config::signing_key()?;
            Some(KeysSigner::from_secret(&secret).with_context(|| "Invalid PRIVATE_KEY")?)
        }
        _ => None,
    };

    let filter = build_filter(cli.command.query(), &config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling pipeline");
            on_interrupt.cancel();
        }
    });

    let source = RelayClient::connect(&config.relay.url, config.timeout())
        .await
        .with_context(|| format!("Failed to connect to {}", config.relay.url))?;

    let ctx = PipelineContext::new(source.clone())
        .with_timeout(config.timeout())
        .with_cancellation(cancel)
        .with_format(cli.format.into());

    let buffer = Pipeline::with_filter(&ctx, filter)
        .query()
        .await
        .with_context(|| "Query failed")?;

    match cli.command {
        Commands::Events(_) => {
            buffer.emit()?;
        }
        Commands::Tags { key, sort, .. } => {
            let counts = buffer.tags(&key)?;
            match sort {
                SortArg::Count => {
                    counts.sort(SortOrder::Count).emit()?;
                }
                SortArg::Name => {
                    counts.sort(SortOrder::Name).emit()?;
                }
                SortArg::None => {
                    counts.emit()?;
                }
            }
        }
        Commands::Titles(_) => {
            buffer.titles()?.emit()?;
        }
        Commands::Addresses { hints, .. } => {
            let encoder = NaddrEncoder::with_relays(hints)?;
            buffer.identifiers(&encoder)?.emit()?;
        }
        Commands::Republish { .. } => {
            let signer = signer.context("Signing key not loaded")?;
            let destination = if config.publish_relay() == config.relay.url {
                source
            } else {
                RelayClient::connect(config.publish_relay(), config.timeout())
                    .await
                    .with_context(|| format!("Failed to connect to {}", config.publish_relay()))?
            };
            let publisher = Publisher::new(destination, signer);
            let report = buffer
                .publish(&publisher)
                .await
                .with_context(|| "Republish failed")?;
            tracing::info!("Republished {} event(s) to {}", report.len(), config.publish_relay());
            ctx.write_output(&report.render(ctx.format())?)?;
        }
    }

    Ok(())
}

/// Command line criteria win over the config file's defaults.
fn build_filter(args: &QueryArgs, config: &Config) -> Result<Filter> {
    let kinds = if args.kind.is_empty() {
        config.query.kinds.clone()
    } else {
        args.kind.clone()
    };

    let mut filter = Filter::new()
        .with_kinds(kinds)?
        .with_limit(args.limit.unwrap_or(config.query.limit))?;

    if !args.author.is_empty() {
        let authors = args
            .author
            .iter()
            .map(|author| decode_public_key(author))
            .collect::<Result<Vec<_>, _>>()?;
        filter = filter.with_authors(authors)?;
    }

    Ok(filter)
}

fn init_logging(level: &str) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter.to_string())),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    Ok(())
}
