use std::sync::Arc;

use clap::Parser;
use tracing::{debug, error, info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};
use uptime_monitor::{
    actors::{MonitorHandle, RetentionHandle},
    config::{Config, load_config},
    monitors::{NetTransport, Prober},
    storage::{SampleStore, sqlite::SqliteStore},
};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (defaults apply when omitted)
    #[arg(short)]
    file: Option<String>,
}

fn init(debug: bool) {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = filter::Targets::new().with_targets(vec![
        ("uptime_monitor", level),
        ("tower_http", LevelFilter::INFO),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.file.as_deref())?;
    init(config.logging.log_debug);
    trace!("started with args: {args:?}");
    debug!("effective config: {config:?}");

    // the monitor cannot run without its database
    let store: Arc<dyn SampleStore> = Arc::new(SqliteStore::new(&config.storage.path).await?);

    let (monitor, retention) = spawn_actors(&config, store.clone())?;

    #[cfg(feature = "api")]
    {
        use uptime_monitor::api::{ApiConfig, ApiState, spawn_api_server};

        let api_config = ApiConfig::from(&config.dashboard);
        if let Err(e) = spawn_api_server(api_config, ApiState::new(store.clone())).await {
            error!("failed to start API server: {e}");
        }
    }

    tokio::signal::ctrl_c().await?;
    info!("received Ctrl-C, shutting down");

    if let Err(e) = monitor.shutdown().await {
        error!("failed to stop monitor: {e}");
    }
    if let Err(e) = retention.shutdown().await {
        error!("failed to stop retention sweeper: {e}");
    }
    store.close().await?;

    Ok(())
}

fn spawn_actors(
    config: &Config,
    store: Arc<dyn SampleStore>,
) -> anyhow::Result<(MonitorHandle, RetentionHandle)> {
    let prober = Prober::from_config(NetTransport::new()?, &config.monitor);
    info!(
        "monitoring {}:{} every {:?}",
        prober.target().host,
        prober.target().port,
        config.monitor.interval()
    );

    let monitor = MonitorHandle::spawn(
        Arc::new(prober),
        store.clone(),
        config.monitor.interval(),
        config.logging.clone(),
    );

    let retention = RetentionHandle::spawn(
        store,
        config.storage.retention(),
        config.storage.cleanup_interval(),
    );

    Ok((monitor, retention))
}
