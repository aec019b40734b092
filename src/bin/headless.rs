//! Headless runner.
//!
//! Runs the session with no local terminal. A remote front end connects over
//! the TCP adapter, renders observations and sends commands.

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tokio::runtime::Handle;
use tracing::info;

use cyber_shield::adapter::{
    Adapter, ConfiguredGenerator, Driver, GeneratorWorker, ServerConfig, ServerState,
};
use cyber_shield::core::{Session, SessionConfig};
use cyber_shield::types::TICK_MS;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if ServerState::is_disabled() {
        bail!("CYBER_SHIELD_AI_DISABLED is set; the headless runner has no other front end");
    }

    info!("cyber-shield headless v{} starting", env!("CARGO_PKG_VERSION"));

    let handle = Handle::current();
    let generator = ConfiguredGenerator::from_env();
    let worker = GeneratorWorker::new(generator, handle.clone());
    let adapter = Adapter::start(ServerConfig::from_env(), &handle);
    let mut driver = Driver::new(Session::new(SessionConfig::from_env()), worker, Some(adapter));

    let mut interval = tokio::time::interval(Duration::from_millis(u64::from(TICK_MS)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let elapsed = last_tick.elapsed();
                last_tick = Instant::now();
                let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
                driver.step(elapsed_ms);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                return Ok(());
            }
        }
    }
}
