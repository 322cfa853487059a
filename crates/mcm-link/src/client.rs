//! Reconnecting realtime link.
//!
//! A single task owns the websocket. It connects, forwards snapshots and
//! lifecycle changes to the owner, writes commands while connected, and on
//! any loss waits out the backoff before replacing the socket with a new one.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};
use url::Url;

use mcm_core::{ConnectionState, ControlSnapshot, OutboundCommand};

use crate::error::LinkError;
use crate::protocol::{decode_snapshot, encode_command};
use crate::reconnect::{Backoff, ReconnectTracker};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Notifications from the link to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// The connection state changed
    StateChanged(ConnectionState),
    /// The next attempt will start after this delay
    RetryScheduled(Duration),
    /// The controller pushed a valid snapshot
    Snapshot(ControlSnapshot),
}

/// Why a connected session ended.
enum SessionEnd {
    /// The channel closed cleanly
    Closed,
    /// The transport failed; a close is implied
    Failed(LinkError),
    /// The handle was dropped
    OwnerGone,
}

/// Entry point for spawning the link task.
pub struct Link;

impl Link {
    /// Spawn the link on the current tokio runtime.
    ///
    /// The returned receiver yields [`LinkEvent`]s; dropping the handle or
    /// calling [`LinkHandle::close`] ends the task.
    #[must_use]
    pub fn spawn(endpoint: Url, backoff: Backoff) -> (LinkHandle, mpsc::Receiver<LinkEvent>) {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (event_tx, event_rx) = mpsc::channel(64);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);

        let task = tokio::spawn(run_link(
            endpoint,
            ReconnectTracker::new(backoff),
            command_rx,
            event_tx,
            state_tx,
        ));

        (LinkHandle { command_tx, state_rx, task }, event_rx)
    }
}

/// Handle for sending commands over the link.
pub struct LinkHandle {
    command_tx: mpsc::Sender<OutboundCommand>,
    state_rx: watch::Receiver<ConnectionState>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for LinkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkHandle").field("state", &self.state()).finish_non_exhaustive()
    }
}

impl LinkHandle {
    /// Send a command if the link is connected.
    ///
    /// Never blocks. Returns `false` when the command was dropped; dropped
    /// commands are not retried. `true` means queued for the open socket, not
    /// delivered: a command queued as the socket dies is discarded too.
    pub fn send(&self, command: OutboundCommand) -> bool {
        if *self.state_rx.borrow() != ConnectionState::Connected {
            trace!(command = command.tag(), "Link not connected, dropping command");
            return false;
        }

        match self.command_tx.try_send(command) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "Command queue unavailable, dropping command");
                false
            }
        }
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Stop the link and drop the socket.
    pub fn close(self) {
        self.task.abort();
    }
}

async fn run_link(
    endpoint: Url,
    mut tracker: ReconnectTracker,
    mut command_rx: mpsc::Receiver<OutboundCommand>,
    event_tx: mpsc::Sender<LinkEvent>,
    state_tx: watch::Sender<ConnectionState>,
) {
    info!(%endpoint, "Link starting");

    loop {
        match connect_async(endpoint.as_str()).await {
            Ok((socket, _)) => {
                info!("Connected to controller");
                publish(&state_tx, &event_tx, tracker.on_open()).await;

                let end = run_session(socket, &mut command_rx, &event_tx).await;
                // Stop accepting commands before anything else is awaited
                state_tx.send_replace(ConnectionState::Reconnecting);

                match end {
                    SessionEnd::Closed => info!("Controller closed the link"),
                    SessionEnd::Failed(e) => {
                        warn!(error = %e, "Link failed");
                        publish(&state_tx, &event_tx, tracker.on_error()).await;
                    }
                    SessionEnd::OwnerGone => {
                        debug!("Link handle dropped, stopping");
                        return;
                    }
                }
            }
            Err(e) => {
                debug!(error = %e, "Failed to connect to controller");
                publish(&state_tx, &event_tx, tracker.on_error()).await;
            }
        }

        let delay = tracker.on_close();
        publish(&state_tx, &event_tx, tracker.state()).await;
        let _ = event_tx.send(LinkEvent::RetryScheduled(delay)).await;

        if !wait_for_retry(delay, &mut command_rx).await {
            debug!("Link handle dropped, stopping");
            return;
        }
    }
}

async fn publish(
    state_tx: &watch::Sender<ConnectionState>,
    event_tx: &mpsc::Sender<LinkEvent>,
    state: ConnectionState,
) {
    state_tx.send_replace(state);
    let _ = event_tx.send(LinkEvent::StateChanged(state)).await;
}

/// Sleep until the retry, discarding anything queued meanwhile.
///
/// Returns `false` if the handle went away.
async fn wait_for_retry(delay: Duration, command_rx: &mut mpsc::Receiver<OutboundCommand>) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            () = &mut sleep => return true,
            command = command_rx.recv() => match command {
                Some(command) => trace!(command = command.tag(), "Discarding stale command"),
                None => return false,
            },
        }
    }
}

async fn run_session(
    socket: Socket,
    command_rx: &mut mpsc::Receiver<OutboundCommand>,
    event_tx: &mpsc::Sender<LinkEvent>,
) -> SessionEnd {
    let (mut writer, mut reader) = socket.split();

    loop {
        tokio::select! {
            command = command_rx.recv() => {
                let Some(command) = command else {
                    let _ = writer.close().await;
                    return SessionEnd::OwnerGone;
                };
                let text = match encode_command(&command) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, command = command.tag(), "Failed to encode command");
                        continue;
                    }
                };
                trace!(%text, "Sending command");
                if let Err(e) = writer.send(Message::text(text)).await {
                    return SessionEnd::Failed(e.into());
                }
            }

            frame = reader.next() => match frame {
                Some(Ok(Message::Text(text))) => match decode_snapshot(&text) {
                    Ok(snapshot) => {
                        let _ = event_tx.send(LinkEvent::Snapshot(snapshot)).await;
                    }
                    Err(e) => warn!(error = %e, "Ignoring malformed snapshot"),
                },
                Some(Ok(Message::Close(_))) | None => return SessionEnd::Closed,
                Some(Ok(_)) => {}
                Some(Err(e)) => return SessionEnd::Failed(e.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use mcm_core::snapshot::{ChannelMode, ChannelStrip, ModeAxis};
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    use crate::endpoint::endpoint_from_origin;
    use crate::protocol::encode_snapshot;

    const WAIT: Duration = Duration::from_secs(5);

    fn sample() -> ControlSnapshot {
        ControlSnapshot {
            primary_mode: ModeAxis::Solo,
            master_volume: 0.42,
            channels: vec![ChannelStrip::new("L", ChannelMode::Normal, 0)],
            ..Default::default()
        }
    }

    fn fast_backoff() -> Backoff {
        Backoff::new(Duration::from_millis(10), 1.5, Duration::from_millis(100))
    }

    async fn next_event(events: &mut mpsc::Receiver<LinkEvent>) -> LinkEvent {
        timeout(WAIT, events.recv()).await.expect("timed out").expect("link stopped")
    }

    async fn next_retry(events: &mut mpsc::Receiver<LinkEvent>) -> (Vec<ConnectionState>, Duration) {
        let mut states = Vec::new();
        loop {
            match next_event(events).await {
                LinkEvent::StateChanged(state) => states.push(state),
                LinkEvent::RetryScheduled(delay) => return (states, delay),
                LinkEvent::Snapshot(_) => {}
            }
        }
    }

    #[tokio::test]
    async fn test_wait_for_retry_discards_queued_commands() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(OutboundCommand::ToggleMute).await.unwrap();
        tx.send(OutboundCommand::SetVolume { value: 0.5 }).await.unwrap();

        assert!(wait_for_retry(Duration::from_millis(10), &mut rx).await);
        assert_matches!(rx.try_recv(), Err(mpsc::error::TryRecvError::Empty));

        // Commands sent after the wait are kept for the next session
        tx.send(OutboundCommand::ToggleDim).await.unwrap();
        assert_eq!(rx.try_recv().unwrap(), OutboundCommand::ToggleDim);
    }

    #[tokio::test]
    async fn test_wait_for_retry_stops_when_handle_dropped() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(OutboundCommand::ToggleCut).await.unwrap();
        drop(tx);

        let stopped = timeout(WAIT, wait_for_retry(Duration::from_secs(60), &mut rx)).await;
        assert_eq!(stopped, Ok(false));
    }

    #[tokio::test]
    async fn test_round_trip_and_reconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();

            ws.send(Message::text("not json".to_owned())).await.unwrap();
            ws.send(Message::text(encode_snapshot(&sample()).unwrap())).await.unwrap();

            let received = loop {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => break text.to_string(),
                    Some(Ok(_)) => {}
                    other => panic!("unexpected frame: {other:?}"),
                }
            };

            ws.close(None).await.unwrap();
            while let Some(Ok(_)) = ws.next().await {}
            received
        });

        let endpoint = endpoint_from_origin(&format!("http://{addr}")).unwrap();
        let (handle, mut events) = Link::spawn(endpoint, fast_backoff());

        // Nothing is sent before the link opens
        assert!(!handle.send(OutboundCommand::ToggleMute));

        assert_eq!(next_event(&mut events).await, LinkEvent::StateChanged(ConnectionState::Connected));
        // The malformed frame is skipped, the valid one comes through
        assert_eq!(next_event(&mut events).await, LinkEvent::Snapshot(sample()));

        assert!(handle.send(OutboundCommand::ToggleSolo));
        let received = timeout(WAIT, server).await.unwrap().unwrap();
        assert_eq!(received, r#"{"type":"ToggleSolo"}"#);

        let (states, delay) = next_retry(&mut events).await;
        assert_eq!(states.last(), Some(&ConnectionState::Reconnecting));
        assert_eq!(delay, Duration::from_millis(10));
        assert!(!handle.send(OutboundCommand::ToggleDim));

        // The listener is gone, so the retry fails and backs off further
        let (states, delay) = next_retry(&mut events).await;
        assert_eq!(states, vec![ConnectionState::Failed, ConnectionState::Reconnecting]);
        assert_eq!(delay, Duration::from_millis(15));
        assert_eq!(handle.state(), ConnectionState::Reconnecting);

        handle.close();
    }

    #[tokio::test]
    async fn test_unreachable_controller_keeps_retrying() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = endpoint_from_origin(&format!("http://{addr}")).unwrap();
        let (handle, mut events) = Link::spawn(endpoint, fast_backoff());

        let mut delays = Vec::new();
        for _ in 0..3 {
            let (states, delay) = next_retry(&mut events).await;
            assert_matches!(states.as_slice(), [ConnectionState::Failed, ConnectionState::Reconnecting]);
            delays.push(delay.as_millis());
        }

        assert_eq!(delays, vec![10, 15, 22]);
        handle.close();
    }
}
