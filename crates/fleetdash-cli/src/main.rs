mod audit;
mod run;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fleetdash")]
#[command(about = "Unattended productivity and inventory-accuracy reporting for a store fleet")]
struct Cli {
    /// Store roster file, overriding the configured path.
    #[arg(long, value_name = "PATH")]
    stores: Option<PathBuf>,

    /// Collect and audit-log, but post nothing to the webhooks.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = fleetdash_core::load_app_config()?;
    if let Some(stores) = cli.stores {
        config.stores_path = stores;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(if config.debug { "debug" } else { "info" }))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    run::run(&config, cli.dry_run).await
}
