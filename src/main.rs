//! Terminal runner (default binary).
//!
//! Plays a session in the terminal with crossterm for input and a line-diff
//! renderer. The remote adapter runs alongside unless
//! `CYBER_SHIELD_AI_DISABLED` is set.

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info};

use cyber_shield::adapter::{Adapter, ConfiguredGenerator, Driver, GeneratorWorker};
use cyber_shield::core::{Session, SessionConfig};
use cyber_shield::input::{key_hint, map_key, should_quit};
use cyber_shield::term::{Line, SessionView, TerminalRenderer, Tone};
use cyber_shield::types::TICK_MS;

fn main() -> Result<()> {
    init_logging()?;

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    let generator = ConfiguredGenerator::from_env();
    if generator.is_offline() {
        info!("no content generator configured, using the seed catalog");
    }
    let worker = GeneratorWorker::new(generator, rt.handle().clone());
    let adapter = Adapter::start_from_env(rt.handle());
    let mut driver = Driver::new(Session::new(SessionConfig::from_env()), worker, adapter);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut driver);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Log to a file when `CYBER_SHIELD_LOG_PATH` is set; the screen belongs to
/// the game.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var("CYBER_SHIELD_LOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, driver: &mut Driver<ConfiguredGenerator>) -> Result<()> {
    let tick_duration = Duration::from_millis(u64::from(TICK_MS));
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, _h) = crossterm::terminal::size().unwrap_or((80, 24));
        let snapshot = driver.session().snapshot();
        let mut lines = SessionView::new(w).render(&snapshot);
        lines.push(Line::blank());
        lines.push(Line::new(key_hint(snapshot.phase, snapshot.exit_prompt), Tone::Dim));
        term.draw(lines)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let session = driver.session();
                    if should_quit(key, session.phase()) {
                        return Ok(());
                    }
                    if let Some(command) = map_key(key, session.phase(), session.exit_prompt()) {
                        driver.apply(command);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
            for event in driver.step(elapsed_ms) {
                debug!(?event, "session event");
            }
        }
    }
}
