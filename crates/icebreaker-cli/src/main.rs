mod enrich;

use clap::{Parser, Subcommand};
use icebreaker_core::RESOLVER_CYCLE_CEILING;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "icebreaker")]
#[command(about = "Person-intelligence enrichment from public profiles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve, scrape and synthesize intel for one person
    Enrich {
        /// Full name of the person
        name: String,
        /// Override the resolver cycle limit
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(RESOLVER_CYCLE_CEILING)))]
        max_cycles: Option<u32>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Only resolve a name to its profile URL
    Resolve {
        /// Full name of the person
        name: String,
        /// Override the resolver cycle limit
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(RESOLVER_CYCLE_CEILING)))]
        max_cycles: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = icebreaker_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    match cli.command {
        Commands::Enrich {
            name,
            max_cycles,
            pretty,
        } => {
            if let Some(cycles) = max_cycles {
                config.resolver_max_cycles = cycles;
            }
            enrich::run_enrich(&config, &name, pretty, cancel).await
        }
        Commands::Resolve { name, max_cycles } => {
            if let Some(cycles) = max_cycles {
                config.resolver_max_cycles = cycles;
            }
            enrich::run_resolve(&config, &name, cancel).await
        }
    }
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("received ctrl-c, cancelling in-flight calls");
            cancel.cancel();
        }
        Err(e) => tracing::warn!(error = %e, "failed to listen for ctrl-c"),
    }
}

#[cfg(test)]
mod tests;
