//! Server runtime integration.
//!
//! Bridges the synchronous console loop with the async network loop.

use std::sync::{Arc, Mutex};

use tokio::runtime::Runtime;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::core::Transcript;
use crate::interpreter::CommandInterpreter;
use crate::server_loop::{LoopStatus, ServerEvent, ServerLoop};
use crate::socket::SocketManager;
use crate::transform::{PayloadTransform, Uppercase};
use crate::{lock_transcript, SharedTranscript};

/// Running server instance.
///
/// Owns the tokio runtime the network loop runs on. Dropping the handle
/// without calling [`Server::shutdown`] also stops the loop.
pub struct Server {
    rt: Runtime,
    sockets: Arc<SocketManager>,
    transcript: SharedTranscript,
    status_rx: watch::Receiver<LoopStatus>,
    events_tx: mpsc::UnboundedSender<ServerEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<ServerEvent>>,
    loop_task: JoinHandle<LoopStatus>,
}

impl Server {
    /// Start the server with the default uppercase transform.
    pub fn start(config: &ServerConfig) -> anyhow::Result<Self> {
        Self::start_with_transform(config, Uppercase)
    }

    pub fn start_with_transform<T: PayloadTransform>(
        config: &ServerConfig,
        transform: T,
    ) -> anyhow::Result<Self> {
        let host = config.host_addr()?;
        let rt = Runtime::new()?;

        let transcript: SharedTranscript = Arc::new(Mutex::new(Transcript::new()));
        lock_transcript(&transcript).log("Starting server...");

        let sockets = Arc::new(SocketManager::new(host, config.port, rt.handle().clone()));
        match sockets.bind(config.port) {
            Ok(outcome) => {
                lock_transcript(&transcript)
                    .log(&format!("Initialized socket on port {}", outcome.port()));
            }
            Err(err) => {
                log::error!("initial bind: {err}");
                lock_transcript(&transcript).log(&format!(
                    "[ERROR] Failed to initialize socket on port {}: {err}",
                    config.port
                ));
            }
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let server_loop = ServerLoop::with_transform(
            Arc::clone(&sockets),
            Arc::clone(&transcript),
            transform,
        )
        .with_events(events_tx.clone());
        let status_rx = server_loop.status();
        let loop_task = rt.spawn(server_loop.run());

        log::info!("server started on {}:{}", host, sockets.current_port());

        Ok(Self {
            rt,
            sockets,
            transcript,
            status_rx,
            events_tx,
            events_rx: Some(events_rx),
            loop_task,
        })
    }

    pub fn sockets(&self) -> Arc<SocketManager> {
        Arc::clone(&self.sockets)
    }

    pub fn transcript(&self) -> SharedTranscript {
        Arc::clone(&self.transcript)
    }

    /// A command interpreter bound to this server's state.
    pub fn interpreter(&self) -> CommandInterpreter {
        CommandInterpreter::new(self.sockets(), self.transcript())
    }

    pub fn current_port(&self) -> u16 {
        self.sockets.current_port()
    }

    /// Latest loop phase and counters.
    pub fn status(&self) -> LoopStatus {
        *self.status_rx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.sockets.is_running() && !self.loop_task.is_finished()
    }

    pub fn try_recv_event(&mut self) -> Option<ServerEvent> {
        self.events_rx.as_mut()?.try_recv().ok()
    }

    /// Hand the event stream to another consumer (e.g. a printer thread).
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<ServerEvent>> {
        self.events_rx.take()
    }

    /// Wake event consumers after the console changed the transcript.
    pub fn notify_refresh(&self) {
        let _ = self.events_tx.send(ServerEvent::Refresh);
    }

    /// Block until the loop stops (i.e. until a confirmed shutdown).
    pub fn wait(self) -> anyhow::Result<LoopStatus> {
        let status = self.rt.block_on(self.loop_task)?;
        self.rt.shutdown_background();
        Ok(status)
    }

    /// Stop immediately. Datagrams in flight are abandoned.
    pub fn shutdown(self) {
        self.sockets.shutdown();
        self.loop_task.abort();
        self.rt.shutdown_background();
    }
}
