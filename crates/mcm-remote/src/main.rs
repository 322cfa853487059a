//! MCM Remote - headless control surface bridge.
//!
//! Reads input events as JSON lines on stdin, drives the controller over the
//! realtime link, and writes surface views and haptic hints to stdout.

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use mcm_link::{Link, endpoint_from_origin};
use mcm_remote::{ControlSurface, SurfaceState, bridge, config};

mod signals;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // The configured filter is not known yet, so loading logs at info
    let config = tracing::subscriber::with_default(bootstrap_subscriber(), config::load_config)?;

    // Logs go to stderr; stdout carries the bridge output
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.log_level))
        .context("Invalid log level")?;
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting MCM remote");
    info!(
        origin = %config.connection.origin,
        log_level = %config.logging.log_level,
        "Configuration loaded"
    );

    let endpoint = endpoint_from_origin(&config.connection.origin)
        .with_context(|| format!("Invalid controller origin: {}", config.connection.origin))?;
    info!(%endpoint, "Controller endpoint resolved");

    let (link, events) = Link::spawn(endpoint, config.connection.backoff());
    let mut surface =
        ControlSurface::new(link, SurfaceState::new(), config.gestures.surface_settings());

    let shutdown_rx = signals::setup_signal_handlers();

    let result = bridge::run(
        &mut surface,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        events,
        shutdown_rx,
    )
    .await;

    info!("Shutting down");
    surface.into_sink().close();

    result
}

/// Subscriber used while the config that configures logging is loaded.
fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt().with_max_level(Level::INFO).with_writer(std::io::stderr).finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_loading_is_logged() {
        let enabled = tracing::subscriber::with_default(bootstrap_subscriber(), || {
            (tracing::enabled!(Level::INFO), tracing::enabled!(Level::DEBUG))
        });

        assert_eq!(enabled, (true, false));
    }
}
