//! projstat: one-line status for many git working copies
//!
//! Probes every requested project under a common root concurrently and
//! prints branch, short head, cleanliness and, with `--fetch`, ahead/behind.

use anyhow::{Context, Result};
use crossterm::tty::IsTty;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use projstat::cli::Args;
use projstat::{App, StatusConfig};

/// Initialize logging with RUST_LOG environment variable support
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging();

    let mut config = StatusConfig::load(args.config.as_deref()).context("loading configuration")?;
    args.apply(&mut config);
    config.validate()?;

    // Colors only for an interactive terminal that has not opted out
    if std::env::var_os("NO_COLOR").is_some() || !io::stdout().is_tty() {
        config.output.color = false;
    }

    let request = args.request()?;
    let app = App::new(config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = app.run(&request, &mut out).await?;

    tracing::debug!("{:?}", summary);
    Ok(())
}
