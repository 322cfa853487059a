//! Line-oriented bridge between a front end and the surface.
//!
//! Input is one JSON [`InputEvent`] per line. Output is one JSON object per
//! line: a full [`SurfaceView`] whenever something visible changed, and a
//! haptic hint whenever the front end should vibrate.

use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use mcm_link::LinkEvent;

use crate::state::SurfaceView;
use crate::surface::{CommandSink, ControlSurface, InputEvent};

/// One output line.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BridgeOutput {
    View(SurfaceView),
    Haptic { duration_ms: u64 },
}

async fn emit<W: AsyncWrite + Unpin>(out: &mut W, output: &BridgeOutput) -> Result<()> {
    let mut line = serde_json::to_string(output)?;
    line.push('\n');
    out.write_all(line.as_bytes()).await.context("Failed to write output")?;
    out.flush().await.context("Failed to flush output")?;
    Ok(())
}

/// Handle one input line.
///
/// Lines that do not parse are logged and skipped.
///
/// # Errors
/// Returns an error only if writing output fails.
pub async fn handle_line<S, W>(
    surface: &mut ControlSurface<S>,
    line: &str,
    now: Instant,
    out: &mut W,
) -> Result<()>
where
    S: CommandSink,
    W: AsyncWrite + Unpin,
{
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }

    let event = match serde_json::from_str::<InputEvent>(line) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Ignoring unparseable input");
            return Ok(());
        }
    };

    let page_before = surface.state().page();
    let haptic = surface.handle_input(event, now);

    if let Some(haptic) = haptic {
        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = haptic.duration().as_millis() as u64;
        emit(out, &BridgeOutput::Haptic { duration_ms }).await?;
    }
    if surface.state().page() != page_before {
        emit(out, &BridgeOutput::View(surface.state().view())).await?;
    }
    Ok(())
}

/// Handle one link event, emitting a view if anything visible changed.
///
/// # Errors
/// Returns an error if writing output fails.
pub async fn handle_link_event<S, W>(
    surface: &mut ControlSurface<S>,
    event: LinkEvent,
    out: &mut W,
) -> Result<()>
where
    S: CommandSink,
    W: AsyncWrite + Unpin,
{
    let visible = !matches!(event, LinkEvent::RetryScheduled(_));
    surface.apply_link_event(event);
    if visible {
        emit(out, &BridgeOutput::View(surface.state().view())).await?;
    }
    Ok(())
}

/// Run the bridge until shutdown or until the link stops.
///
/// Closing the input does not stop the bridge; views keep flowing.
///
/// # Errors
/// Returns an error if reading input or writing output fails.
pub async fn run<S, R, W>(
    surface: &mut ControlSurface<S>,
    input: R,
    mut out: W,
    mut link_events: mpsc::Receiver<LinkEvent>,
    mut shutdown_rx: mpsc::Receiver<()>,
) -> Result<()>
where
    S: CommandSink,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut input_open = true;

    emit(&mut out, &BridgeOutput::View(surface.state().view())).await?;

    loop {
        tokio::select! {
            event = link_events.recv() => match event {
                Some(event) => handle_link_event(surface, event, &mut out).await?,
                None => {
                    warn!("Link stopped");
                    break;
                }
            },

            line = lines.next_line(), if input_open => {
                match line.context("Failed to read input")? {
                    Some(line) => handle_line(surface, &line, Instant::now(), &mut out).await?,
                    None => {
                        debug!("Input closed");
                        input_open = false;
                    }
                }
            }

            Some(()) = shutdown_rx.recv() => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    Ok(())
}
