//! Graceful shutdown
//!
//! On SIGINT or SIGTERM the server stops accepting connections and gets
//! `shutdown_timeout_secs` to finish in-flight requests. Connections still
//! open after that are dropped.

use std::{future::Future, io, time::Duration};

use tokio::{signal, sync::Notify};
use tracing::{error, info, warn};

/// How the server loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// The server stopped without a shutdown signal
    Stopped,
    /// All connections closed within the deadline
    Drained,
    /// The deadline passed with connections still open
    TimedOut,
}

/// Drive `serve` until `signal` fires, then allow it `timeout` to drain
///
/// `drain` is notified when the signal arrives; `serve` must begin its
/// graceful shutdown on that notification.
pub async fn run_until_shutdown<F, S>(
    serve: F,
    drain: &Notify,
    signal: S,
    timeout: Duration,
) -> io::Result<ShutdownOutcome>
where
    F: Future<Output = io::Result<()>>,
    S: Future<Output = ()>,
{
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => return result.map(|()| ShutdownOutcome::Stopped),
        () = signal => {},
    }

    drain.notify_one();
    info!("Waiting up to {:?} for connections to close...", timeout);

    match tokio::time::timeout(timeout, serve).await {
        Ok(result) => result.map(|()| ShutdownOutcome::Drained),
        Err(_) => {
            warn!(
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout elapsed, dropping open connections"
            );
            Ok(ShutdownOutcome::TimedOut)
        },
    }
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
