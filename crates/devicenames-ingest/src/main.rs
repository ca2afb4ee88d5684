//! Device Names Ingest - catalog loading tool

use anyhow::{Context, Result};
use devicenames_common::logging::{init_logging, LogConfig, LogLevel};
use devicenames_common::DeviceKey;
use devicenames_ingest::store::{self, StoreConfig};
use devicenames_ingest::{IngestConfig, IngestPipeline};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "devicenames-ingest")]
#[command(author, version, about = "Device catalog ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Download the catalog and ingest it
    Fetch {
        /// Catalog URL, overrides INGEST_SOURCE_URL
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Ingest a catalog already on disk
    File {
        /// Path to the CSV file
        #[arg(short, long)]
        path: String,
    },

    /// Look up the marketing name of a device
    Lookup {
        #[arg(short, long)]
        branding: String,

        #[arg(short, long)]
        model: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("devicenames-ingest")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    let pool = store::connect(&StoreConfig::from_env()?).await?;
    store::migrate(&pool).await?;

    match cli.command {
        Command::Fetch { url } => {
            let mut config = IngestConfig::from_env()?;
            if let Some(url) = url {
                config.source_url = url;
            }
            let pipeline = IngestPipeline::new(pool, &config)?;
            info!(url = %pipeline.source_url(), "Ingesting device catalog");
            let summary = pipeline.run().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        },
        Command::File { path } => {
            let raw = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path))?;
            let pipeline = IngestPipeline::new(pool, &IngestConfig::from_env()?)?;
            info!(path = %path, "Ingesting device catalog from file");
            let summary = pipeline.ingest_bytes(&raw).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        },
        Command::Lookup { branding, model } => {
            let key = DeviceKey::new(&branding, &model);
            match store::find_marketing_name(&pool, &key).await? {
                Some(name) => println!("{}", name),
                None => {
                    println!("No device found for {}", key);
                    std::process::exit(1);
                },
            }
        },
    }

    info!("Done");
    Ok(())
}
