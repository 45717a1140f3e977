//! Keepalive command implementation.
//!
//! Holds a session open for a fixed duration while the client's keepalive
//! timer refreshes it, then logs out. Ctrl+C ends the hold early; the session
//! is still logged out before the command reports cancellation.

use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::cancellation::{CancellationToken, Cancelled};

/// How often progress is reported while holding the session.
const REPORT_INTERVAL: Duration = Duration::from_secs(30);

pub async fn run(
    config: apic_config::Config,
    duration: Duration,
    cancel: &CancellationToken,
) -> Result<()> {
    let client = super::build_client(&config)?;

    info!("Connecting to {}", client.controller());
    let login = client.login(true).await?;
    eprintln!(
        "Session open on {} (timeout {}s, refresh every {:.0}s); holding for {}s",
        client.controller(),
        login.refresh_timeout_seconds,
        login.refresh_timeout().as_secs_f64() * client.refresh_ratio(),
        duration.as_secs()
    );

    let hold = tokio::time::sleep(duration);
    tokio::pin!(hold);
    let mut report = tokio::time::interval(REPORT_INTERVAL);
    report.tick().await;

    let cancelled = loop {
        tokio::select! {
            _ = &mut hold => break false,
            _ = cancel.cancelled() => break true,
            _ = report.tick() => {
                if let Some(next) = client.next_refresh_in() {
                    info!(status = %client.status(), next_refresh_secs = next.as_secs(), "Session held");
                }
            }
        }
    };

    client.logout().await?;
    eprintln!("Logged out");

    if cancelled {
        return Err(Cancelled.into());
    }
    Ok(())
}
