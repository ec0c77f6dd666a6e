use anyhow::Context;
use external_link_tracker::config::{self, Config};
use external_link_tracker::error::FatalError;
use external_link_tracker::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env().context("invalid configuration")?;

    init_tracing(&config);
    config.print_summary();

    if let Some(root) = &config.app_root {
        std::env::set_current_dir(root).map_err(|source| FatalError::WorkingDirectory {
            path: root.display().to_string(),
            source,
        })?;
    }

    if let Err(e) = server::run(config).await {
        tracing::error!(error = %e, "Fatal error, shutting down");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
