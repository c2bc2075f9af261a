//! Receive → transform → send → log cycle.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::socket::{Datagram, ReplyHandle, SocketError, SocketManager};
use crate::transform::{latin1_text, PayloadTransform, Uppercase};
use crate::types::LoopPhase;
use crate::{lock_transcript, SharedTranscript};

/// Counters and phase published by the loop for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStatus {
    pub phase: LoopPhase,
    pub received: u64,
    pub sent: u64,
    pub send_failures: u64,
    pub canceled_receives: u64,
    pub receive_errors: u64,
}

/// Notification sent to the console after the transcript changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerEvent {
    Refresh,
}

/// What one iteration of the loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A datagram was answered (or the reply failed and was dropped).
    Echoed,
    /// The receive was canceled by a rebind or close.
    Canceled,
    /// The OS reported a receive error; the loop carries on.
    ReceiveFailed,
}

/// The network half of the server.
pub struct ServerLoop<T = Uppercase> {
    sockets: Arc<SocketManager>,
    transcript: SharedTranscript,
    transform: T,
    status: watch::Sender<LoopStatus>,
    events: Option<mpsc::UnboundedSender<ServerEvent>>,
}

impl ServerLoop<Uppercase> {
    pub fn new(sockets: Arc<SocketManager>, transcript: SharedTranscript) -> Self {
        Self::with_transform(sockets, transcript, Uppercase)
    }
}

impl<T: PayloadTransform> ServerLoop<T> {
    pub fn with_transform(
        sockets: Arc<SocketManager>,
        transcript: SharedTranscript,
        transform: T,
    ) -> Self {
        let (status, _) = watch::channel(LoopStatus::default());
        Self {
            sockets,
            transcript,
            transform,
            status,
            events: None,
        }
    }

    /// Send a [`ServerEvent::Refresh`] on `tx` whenever the transcript changes.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<ServerEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn status(&self) -> watch::Receiver<LoopStatus> {
        self.status.subscribe()
    }

    /// Run until the server is shut down.
    pub async fn run(mut self) -> LoopStatus {
        while self.sockets.is_running() {
            self.step().await;
        }
        self.set_phase(LoopPhase::Stopped);
        self.refresh();
        log::info!("server loop stopped");
        *self.status.borrow()
    }

    /// Wait for one datagram (or a cancellation) and handle it.
    pub async fn step(&mut self) -> Step {
        let was_bound = self.sockets.is_bound();
        self.set_phase(if was_bound {
            LoopPhase::Receiving
        } else {
            LoopPhase::Unbound
        });

        match self.sockets.receive().await {
            Ok((datagram, reply)) => {
                self.process(datagram, reply).await;
                Step::Echoed
            }
            Err(SocketError::ReceiveCanceled) => {
                if was_bound && self.sockets.is_running() {
                    log::warn!("receive canceled");
                    self.log("[WARNING] Canceled receiving data");
                    self.status.send_modify(|s| s.canceled_receives += 1);
                    self.refresh();
                }
                if self.sockets.is_bound() {
                    self.set_phase(LoopPhase::Bound);
                }
                Step::Canceled
            }
            Err(err) => {
                log::error!("{err}");
                self.log(&format!("[ERROR] {err}"));
                self.status.send_modify(|s| s.receive_errors += 1);
                self.refresh();
                Step::ReceiveFailed
            }
        }
    }

    async fn process(&mut self, datagram: Datagram, reply_via: ReplyHandle) {
        self.set_phase(LoopPhase::Processing);

        let reply = self.transform.apply(&datagram.payload);
        let peer = format!("{}:{}", datagram.source.ip(), datagram.source.port());
        let received_text = latin1_text(&datagram.payload);
        let reply_text = latin1_text(&reply);

        log::debug!("{} bytes from {peer}", datagram.payload.len());
        {
            let mut transcript = lock_transcript(&self.transcript);
            transcript.log(&format!(
                "Received \"{}\" from client {peer}",
                trim_incidental(&received_text)
            ));
            transcript.log(&format!(
                "Sending \"{}\" to client {peer}",
                trim_incidental(&reply_text)
            ));
        }
        self.status.send_modify(|s| s.received += 1);

        match reply_via.send(&reply, datagram.source).await {
            Ok(()) => self.status.send_modify(|s| s.sent += 1),
            Err(err) => {
                log::error!("reply to {peer}: {err}");
                self.log(&format!("[ERROR] Failed to send to client {peer}: {err}"));
                self.status.send_modify(|s| s.send_failures += 1);
            }
        }

        self.refresh();
    }

    fn log(&self, line: &str) {
        lock_transcript(&self.transcript).log(line);
    }

    fn set_phase(&self, phase: LoopPhase) {
        self.status.send_if_modified(|s| {
            let changed = s.phase != phase;
            s.phase = phase;
            changed
        });
    }

    fn refresh(&self) {
        if let Some(tx) = &self.events {
            let _ = tx.send(ServerEvent::Refresh);
        }
    }
}

/// Strip leading/trailing whitespace and control characters (NUL padding included).
pub fn trim_incidental(text: &str) -> &str {
    text.trim_matches(|c: char| c <= ' ')
}
