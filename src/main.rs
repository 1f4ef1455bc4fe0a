use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use channel_carousel::config::Config;
use channel_carousel::pipeline::{load_snapshots, patch_page, Pipeline};
use channel_carousel::{PatchReport, YouTubeClient};

#[derive(Parser)]
#[command(name = "channel-carousel", version)]
#[command(about = "Publish curated YouTube channel uploads as JSON snapshots and page carousels")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to channel-carousel.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for snapshot files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch videos and write one JSON snapshot per category
    Snapshot,
    /// Fetch videos and splice fresh cards into the page
    Build {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Splice cards from the saved snapshots into the page, without network access
    Render {
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(clap::Args)]
struct PageArgs {
    /// Page document to patch in place
    #[arg(long)]
    page: Option<PathBuf>,

    /// Fail when a carousel region is not found in the page
    #[arg(long)]
    strict: bool,
}

impl PageArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(page) = &self.page {
            config.output.page_path = page.clone();
        }
        if self.strict {
            config.output.strict_markers = true;
        }
    }
}

type LogHandle = reload::Handle<EnvFilter, Registry>;

fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("channel_carousel={},warn", level))
}

/// Install the subscriber before anything else logs. Returns a handle for
/// applying the configured level later, unless RUST_LOG or --verbose decide it.
fn init_logging(verbose: bool) -> Option<LogHandle> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
        return None;
    }

    let level = if verbose { "debug" } else { "info" };
    let (filter, handle) = reload::Layer::new(crate_filter(level));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();

    if verbose {
        None
    } else {
        Some(handle)
    }
}

fn apply_log_level(handle: Option<LogHandle>, level: &str) {
    if let Some(handle) = handle {
        if let Err(e) = handle.reload(crate_filter(level)) {
            warn!("⚠️ Failed to apply log level '{}': {}", level, e);
        }
    }
}

fn log_patch_report(report: &PatchReport) {
    if report.all_replaced() {
        info!("✅ All {} carousel regions updated", report.regions.len());
    } else {
        let missing: Vec<&str> = report.missing().collect();
        warn!("⚠️ Regions not found in page: {}", missing.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_handle = init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data_dir) = &cli.data_dir {
        config.output.data_dir = data_dir.clone();
    }

    apply_log_level(log_handle, &config.output.log_level);
    debug!("{}", config.summary());

    match &cli.command {
        Commands::Snapshot => {
            config.validate(true)?;
            let client = YouTubeClient::new(&config.catalog)?;

            info!("🚀 Fetching videos for channel {}...", config.catalog.channel_id);
            let summary = Pipeline::new(&client, &config).run_snapshots().await?;

            for (name, count, path) in &summary.written {
                info!("✅ Saved {} {} to {}", count, name, path.display());
            }
        }
        Commands::Build { page } => {
            page.apply(&mut config);
            config.validate(true)?;
            let client = YouTubeClient::new(&config.catalog)?;

            info!("🚀 Fetching videos for channel {}...", config.catalog.channel_id);
            let report = Pipeline::new(&client, &config).run_page_build().await?;
            log_patch_report(&report);
        }
        Commands::Render { page } => {
            page.apply(&mut config);
            config.validate(false)?;

            info!("📂 Rendering from snapshots in {}", config.output.data_dir.display());
            let results = load_snapshots(&config)?;
            let report = patch_page(&config, &results)?;
            log_patch_report(&report);
        }
    }

    Ok(())
}
