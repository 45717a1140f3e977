//! Single-request commands: get, post and delete.
//!
//! Each request runs inside a scoped session, so the controller session is
//! logged out whether the request succeeds, fails, or is interrupted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use futures::FutureExt;
use tracing::info;

use crate::cancellation::{CancellationToken, Cancelled};

/// The request to send.
#[derive(Debug)]
pub enum Verb {
    Get,
    Post(String),
    Delete,
}

/// Read a POST body from `--data` or `--file`.
pub fn read_body(data: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (data, file) {
        (Some(data), _) => Ok(data),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read request body from {}", path.display())),
        (None, None) => anyhow::bail!("Either --data or --file is required"),
    }
}

pub async fn run(
    config: apic_config::Config,
    verb: Verb,
    target: String,
    cancel: &CancellationToken,
) -> Result<()> {
    let client = super::build_client(&config)?;
    info!("Connecting to {}", client.controller());

    let body_cancel = cancel.clone();
    let outcome = client
        .with_session(false, move |session| {
            async move {
                let request = async move {
                    match verb {
                        Verb::Get => session.get(&target).await,
                        Verb::Post(body) => session.post(&target, body).await,
                        Verb::Delete => session.delete(&target).await,
                    }
                };
                tokio::select! {
                    response = request => response.map(Some),
                    _ = body_cancel.cancelled() => Ok(None),
                }
            }
            .boxed()
        })
        .await?;

    let Some(response) = outcome else {
        return Err(Cancelled.into());
    };

    eprintln!("{} {}", response.status(), response.url());
    let text = response.text();
    if !text.is_empty() {
        println!("{text}");
    }

    super::ensure_success(&response)?;
    Ok(())
}
