//! Account subcommands: login, register, logout, tier.

use std::sync::Arc;

use tracing::info;

use forgor_config::Config;

use crate::context::build_session;
use crate::sink::LogBadgeSink;

pub(crate) async fn login(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let session = build_session(config, Arc::new(LogBadgeSink))?;
    session.login(username, password).await?;
    println!("Signed in as {}", username);
    print_tier(&session).await;
    Ok(())
}

pub(crate) async fn register(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let session = build_session(config, Arc::new(LogBadgeSink))?;
    session.register(username, password).await?;
    println!("Registered and signed in as {}", username);
    print_tier(&session).await;
    Ok(())
}

pub(crate) async fn logout(config: &Config) -> anyhow::Result<()> {
    let session = build_session(config, Arc::new(LogBadgeSink))?;
    session.logout().await?;
    println!("Signed out");
    Ok(())
}

pub(crate) async fn tier(config: &Config) -> anyhow::Result<()> {
    let session = build_session(config, Arc::new(LogBadgeSink))?;
    let info = session.tier().refresh().await?;
    info!("Fetched tier info");
    println!(
        "{}: {} of {} saves used, {} left",
        info.tier,
        info.current_saves,
        info.max_saves,
        info.saves_left()
    );
    Ok(())
}

async fn print_tier(session: &forgor_runloop::Session) {
    if let Some(info) = session.tier().snapshot() {
        println!("Tier {}: {} saves left", info.tier, info.saves_left());
    }
}
