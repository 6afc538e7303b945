use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use marquee_config::{ConfigLoad, ConfigLoader, ConfigWarnings};
use marquee_core::model::{
    Availability, CatalogKind, ContentItem, MediaId, MediaType,
};
use marquee_core::router::{ContentState, EntityListing};
use marquee_core::{Engine, RouteOutcome};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(about = "Browse networks and studios and request missing content")]
struct Cli {
    /// Path to marquee.toml (overrides MARQUEE_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to an env file loaded before reading the environment
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Keep the catalogs fresh until interrupted
    Run,
    /// Refresh once and print the view for a navigation path
    Browse {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Request a movie or series from the service
    Request {
        #[arg(value_enum)]
        media_type: MediaKindArg,
        id: u64,
        /// Title shown in notifications
        #[arg(long)]
        title: Option<String>,
    },
    /// Validate configuration and print warnings
    CheckConfig,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MediaKindArg {
    Movie,
    Tv,
}

impl From<MediaKindArg> for MediaType {
    fn from(arg: MediaKindArg) -> Self {
        match arg {
            MediaKindArg::Movie => MediaType::Movie,
            MediaKindArg::Tv => MediaType::Series,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,marquee_core=info,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ConfigLoad { config, warnings } = load_config(&cli)?;
    log_warnings(&warnings);
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }

    match cli.command {
        Command::CheckConfig => {
            println!("service: {}", config.service.url);
            println!("refresh interval: {}h", config.refresh.interval_hours);
            println!("display networks: {}", config.display.networks.join(", "));
            println!("display studios: {}", config.display.studios.join(", "));
            if warnings.is_empty() {
                println!("no warnings");
            }
            for warning in warnings.iter() {
                match &warning.hint {
                    Some(hint) => println!("warning: {} ({hint})", warning.message),
                    None => println!("warning: {}", warning.message),
                }
            }
            Ok(())
        }
        Command::Run => {
            let engine = Engine::new(config).context("failed to build engine")?;
            run(engine).await
        }
        Command::Browse { path } => {
            let engine = Engine::new(config).context("failed to build engine")?;
            let report = engine.refresh().await;
            info!(%report, "catalogs refreshed");
            print_outcome(&engine.navigate(&path).await);
            Ok(())
        }
        Command::Request {
            media_type,
            id,
            title,
        } => {
            let engine = Engine::new(config).context("failed to build engine")?;
            request(&engine, media_type.into(), id, title).await
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ConfigLoad> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &cli.env_file {
        loader = loader.with_env_file(path);
    }
    loader.load().context("failed to load configuration")
}

fn log_warnings(warnings: &ConfigWarnings) {
    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }
}

async fn run(engine: Engine) -> anyhow::Result<()> {
    let mut reports = engine.cache().subscribe_reports();
    engine.start();
    info!(service = %engine.config().service.url, "marquee running; press ctrl-c to stop");

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for shutdown signal")?;
                break;
            }
            report = reports.recv() => match report {
                Ok(report) => info!(
                    %report,
                    networks = engine.cache().snapshot(CatalogKind::Networks).len(),
                    studios = engine.cache().snapshot(CatalogKind::Studios).len(),
                    "refresh cycle finished"
                ),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "missed refresh reports"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    info!("shutting down");
    engine.shutdown().await;
    Ok(())
}

async fn request(
    engine: &Engine,
    media_type: MediaType,
    id: u64,
    title: Option<String>,
) -> anyhow::Result<()> {
    let mut item = ContentItem {
        id: MediaId(id),
        media_type,
        title: title.unwrap_or_else(|| format!("{} {id}", media_type.as_wire())),
        poster_ref: None,
        release_date: None,
        library_ref: None,
        availability: Availability::NotAvailable,
    };

    item.availability = engine
        .workflow()
        .reconcile(&item)
        .await
        .context("failed to check library status")?;
    if !item.availability.is_requestable() {
        bail!("{} is not requestable ({:?})", item.title, item.availability);
    }

    let outcome = engine.workflow().submit(&item).await?;
    for notification in engine.notifications().active() {
        println!(
            "[{}] {}: {}",
            notification.severity, notification.title, notification.message
        );
    }
    if !outcome.is_success() {
        bail!("request for {} was not accepted", item.title);
    }
    Ok(())
}

fn print_outcome(outcome: &RouteOutcome) {
    match outcome {
        RouteOutcome::Home(listing) => {
            println!("Home");
            print_listing(listing);
        }
        RouteOutcome::BrowseAll(listing) => {
            println!("All networks and studios");
            print_listing(listing);
        }
        RouteOutcome::Detail(view) => {
            println!("{} ({})", view.entity.name, view.kind);
            match &view.content {
                ContentState::Loaded { movies, series } => {
                    for (label, cards) in [("Movies", movies), ("Series", series)] {
                        if cards.is_empty() {
                            continue;
                        }
                        println!("  {label}");
                        for card in cards {
                            let year = card
                                .item
                                .release_year()
                                .map(|year| format!(" ({year})"))
                                .unwrap_or_default();
                            println!(
                                "    {}{year} [{:?}]",
                                card.item.title,
                                card.availability()
                            );
                        }
                    }
                }
                ContentState::Failed { message } => {
                    println!("  content unavailable: {message}");
                }
            }
        }
        RouteOutcome::NotFound { kind, id } => {
            println!("{} {id} is not in the catalog", kind.segment());
        }
        RouteOutcome::Unchanged => println!("not a marquee view"),
    }
}

fn print_listing(listing: &EntityListing) {
    for (label, entities) in [("Networks", &listing.networks), ("Studios", &listing.studios)] {
        println!("  {label}");
        for entity in entities {
            println!("    {} ({})", entity.name, entity.id);
        }
    }
}
