use std::path::Path;
use std::sync::Arc;

use claimlock::ConsoleCommand;
use claimlock::Error;
use claimlock::LockNode;
use claimlock::LockNodeBuilder;
use claimlock::LockNodeConfig;
use claimlock::PhysicalPosition;
use claimlock::Result;
use claimlock::SimulatedBoard;
use claimlock::TaskError;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tokio::sync::watch;
use tracing::error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let config = LockNodeConfig::new()?.validate()?;

    // Initializing Logs
    let _guard = init_observability(&config.device.log_dir)?;

    // Initializing Shutdown Signal
    let (graceful_tx, graceful_rx) = watch::channel(());

    let position = if config.device.simulated_initially_closed {
        PhysicalPosition::Closed
    } else {
        PhysicalPosition::Open
    };
    let board = Arc::new(SimulatedBoard::new(position));

    // Build Node
    let node = LockNodeBuilder::init(config, graceful_rx.clone())
        .hardware(board.clone())
        .build()?
        .start_metrics_server(graceful_rx.clone())
        .ready()?;

    info!("Lock {} started. Waiting for CTRL+C signal...", node.node_config.device.device_name);
    // Listen on Shutdown Signal
    tokio::spawn(async {
        if let Err(e) = graceful_shutdown(graceful_tx).await {
            error!("Failed to shutdown: {:?}", e);
        }
    });

    tokio::spawn(console(node.clone(), board, graceful_rx));

    // Start Node
    if let Err(e) = node.run().await {
        error!("node stops: {:?}", e);
    }

    println!("Exiting program.");
    Ok(())
}

/// Stdin console driving the simulated lock.
async fn console(
    node: Arc<LockNode>,
    board: Arc<SimulatedBoard>,
    mut shutdown_signal: watch::Receiver<()>,
) {
    println!("{}", claimlock::CONSOLE_HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = shutdown_signal.changed() => return,
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => return,
                    Err(e) => {
                        error!("console read failed: {}", e);
                        return;
                    }
                };
                match ConsoleCommand::parse(&line) {
                    Ok(Some(command)) => {
                        let (node, board) = (node.clone(), board.clone());
                        match tokio::task::spawn_blocking(move || command.execute(&node, &board)).await {
                            Ok(output) => println!("{}", output),
                            Err(e) => error!("console command failed: {}", e),
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("{}", e),
                }
            }
        }
    }
}

async fn graceful_shutdown(graceful_tx: watch::Sender<()>) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt()).map_err(|e| Error::Fatal(e.to_string()))?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(|e| Error::Fatal(e.to_string()))?;
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C detected.");
        },
    }

    info!("Shutdown lock node..");
    graceful_tx.send(()).map_err(|e| {
        error!("Failed to send shutdown signal: {}", e);
        TaskError::SignalSendFailed(format!("Failed to send shutdown signal: {}", e))
    })?;

    info!("Shutdown completed");
    Ok(())
}

pub fn init_observability(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir).map_err(|e| Error::Fatal(format!("log dir {}: {}", log_dir.display(), e)))?;
    let log_file = tracing_appender::rolling::never(log_dir, "claimlockd.log");

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let base_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(base_subscriber).init();

    Ok(guard)
}
