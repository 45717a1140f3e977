//! Login command implementation.

use anyhow::Result;
use tracing::info;

pub async fn run(config: apic_config::Config) -> Result<()> {
    let client = super::build_client(&config)?;

    info!("Connecting to {}", client.controller());
    let login = client.login(true).await?;
    let next_refresh = client.next_refresh_in();
    let challenge_active = client.challenge_token_active();
    client.logout().await?;

    println!(
        "Logged in to {} as {}",
        client.controller(),
        client.username()
    );
    println!("Session timeout: {}s", login.refresh_timeout_seconds);
    if let Some(next) = next_refresh {
        println!(
            "Keepalive refresh after: {:.0}s (ratio {})",
            next.as_secs_f64(),
            client.refresh_ratio()
        );
    }
    if let Some(lifetime) = login.maximum_lifetime_seconds {
        println!("Maximum lifetime: {lifetime}s");
    }
    if let Some(version) = &login.version {
        println!("Controller version: {version}");
    }
    println!(
        "Challenge token: {}",
        if challenge_active { "enabled" } else { "disabled" }
    );
    println!("Logged out");

    Ok(())
}
