use anyhow::Result;
use clap::Parser;
use larder::cli::Cli;
use larder::config::Config;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Both ring and aws-lc-rs can end up linked; pick one explicitly.
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    let cli = Cli::parse();
    let config = Config::load_or_init()?;

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        config.observability.level()
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: Failed to install log subscriber: {e}");
    }

    larder::app::dispatch(cli, config).await
}
