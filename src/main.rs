use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use readwise_cleaner::cleaner::OpenRouterCleaner;
use readwise_cleaner::cli::{Cli, Commands};
use readwise_cleaner::config::Config;
use readwise_cleaner::pipeline::{self, SyncOptions, TextSource};
use readwise_cleaner::readwise::ReadwiseClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Values from .env fill in whatever the process environment lacks
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "readwise_cleaner=debug"
    } else {
        "readwise_cleaner=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    match cli.command {
        Commands::Sync {
            dry_run,
            limit,
            model,
        } => {
            let model = config.resolve_model(model.as_deref())?;
            let store = ReadwiseClient::new(config.require_readwise_key()?);
            let cleaner = OpenRouterCleaner::new(config.require_openrouter_key()?, model);

            pipeline::run_sync(&store, &cleaner, &SyncOptions { dry_run, limit }).await?;
        }
        Commands::Clean {
            text,
            file,
            model,
            output,
        } => {
            let model = config.resolve_model(model.as_deref())?;
            let cleaner = OpenRouterCleaner::new(config.require_openrouter_key()?, model);

            // clap's ArgGroup guarantees exactly one of the two is present
            let source = match (text, file) {
                (Some(text), None) => TextSource::Literal(text),
                (None, Some(path)) => TextSource::File(path),
                _ => unreachable!("clap enforces the text/file group"),
            };

            pipeline::run_single(&cleaner, &source, output.as_deref()).await?;
        }
    }

    Ok(())
}
