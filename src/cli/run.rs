//! Handler for the `run` command.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use crate::app::{build_registry, AppState, Config, Orchestrator};
use crate::cli::{banner, RunArgs};
use crate::error::Result;

/// Executes the `run` command: loads configuration, applies CLI overrides,
/// wires the application, and drives the tick loop until `Ctrl-C`
/// (spec.md §5's cooperative-shutdown shape).
pub async fn execute(config_path: &std::path::Path, args: &RunArgs) -> Result<()> {
    let mut config = Config::load(config_path)?;
    config.apply_overrides(
        args.trade_size_usdt,
        args.min_raw_spread_pct,
        args.min_trade_usdt,
        args.scan_interval_ms,
        args.scan_batch_size,
        if args.debug { Some(true) } else { None },
        args.json_logs,
        args.status_file.clone(),
    );

    config.init_logging();

    if !args.no_banner {
        banner::print_banner();
    }

    info!(
        venues = ?config.scan_venues,
        trade_size_usdt = %config.trade_size_usdt,
        scan_interval_ms = config.scan_interval_ms,
        "arbiscan starting"
    );

    let registry = build_registry(&config.scan_venues);
    let state = Arc::new(AppState::bootstrap(config, registry));
    let orchestrator = Orchestrator::new(state);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut run_handle = tokio::spawn(async move {
        orchestrator.run(shutdown_rx).await;
    });

    tokio::select! {
        result = &mut run_handle => {
            if let Err(join_err) = result {
                error!(error = %join_err, "orchestrator task panicked");
            }
            info!("arbiscan stopped");
            return Ok(());
        }
        _ = signal::ctrl_c() => {
            info!("shutdown signal received (Ctrl-C)");
            let _ = shutdown_tx.send(true);
        }
    }

    if let Err(join_err) = run_handle.await {
        error!(error = %join_err, "orchestrator task panicked");
    }

    info!("arbiscan stopped");
    Ok(())
}
