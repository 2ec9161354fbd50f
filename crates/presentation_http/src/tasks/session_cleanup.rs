//! Expired session cleanup task
//!
//! Expired sessions are already rejected on use; this task keeps the
//! sessions table from growing with tokens nobody presents again.

use std::{sync::Arc, time::Duration};

use application::AuthService;
use tracing::{debug, error, info};

/// Default cleanup interval: once per hour
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 3600;

/// Spawn a background task that periodically deletes expired sessions
///
/// The first run happens one interval after startup. Abort the returned
/// handle on shutdown.
pub fn spawn_session_cleanup_task(
    auth: Arc<AuthService>,
    cleanup_interval: Option<Duration>,
) -> tokio::task::JoinHandle<()> {
    let interval = cleanup_interval.unwrap_or(Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS));

    info!(
        interval_secs = interval.as_secs(),
        "Starting session cleanup task"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            debug!("Running session cleanup");

            if let Err(e) = auth.purge_expired_sessions().await {
                error!(error = %e, "Failed to purge expired sessions");
            }
        }
    })
}
