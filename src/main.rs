use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use faq_relay::config::{DEFAULT_FAQ_PATH, DEFAULT_PORT};
use faq_relay::{Config, Daemon};

/// FAQ Relay - chat relay grounding an LLM in a FAQ corpus
#[derive(Parser)]
#[command(name = "faq-relay", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Path to the FAQ JSON document
    #[arg(long, env = "FAQ_PATH", default_value = DEFAULT_FAQ_PATH)]
    faq: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Best-effort: a missing .env is normal in production
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,faq_relay=info",
        1 => "info,faq_relay=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!(port = cli.port, faq = %cli.faq.display(), "starting faq relay");

    let config = Config::from_env(cli.port, cli.faq)?;
    tracing::debug!(?config, "loaded configuration");

    let daemon = Daemon::new(config)?;
    daemon.run().await?;

    tracing::info!("faq relay stopped");
    Ok(())
}
