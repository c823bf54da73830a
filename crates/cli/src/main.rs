use anyhow::Result;
use blockstats_cli::{args::CliArgs, config, logging, runner};
use blockstats_config::LoggerConfig;
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let config = match config::load(&args).await {
        Ok(config) => config,
        Err(err) => {
            logging::init_tracing(&LoggerConfig::default());
            error!(target: "blockstats", error = %format!("{:#}", err), "failed to start processing");
            return Err(err);
        }
    };
    logging::init_tracing(&config.logger);

    info!(
        target: "blockstats",
        version = blockstats_cli::VERSION,
        backend = %config.storage.backend,
        storage = %config.storage.path.display(),
        chain_id = config.storage.chain_id,
        network = %config.storage.network_type,
        start_height = config.scan.start_height,
        page_size = config.scan.page_size,
        ceiling = ?config.scan.ceiling,
        "blockstats starting"
    );

    let outcome = runner::run(config).await?;
    info!(
        target: "blockstats",
        rows = outcome.rows,
        last_height = ?outcome.last_height,
        "report written to {}",
        outcome.output.display()
    );

    Ok(())
}
