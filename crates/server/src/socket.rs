//! Rebindable UDP socket.
//!
//! [`SocketManager`] owns the single listening socket. The network loop waits
//! in [`SocketManager::receive`] while the console thread may call
//! [`SocketManager::bind`] or [`SocketManager::close`] at any time; both bump a
//! watch-channel generation so that the in-flight receive returns
//! [`SocketError::ReceiveCanceled`] instead of racing on a stale handle.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arrayvec::ArrayVec;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::types::MAX_DATAGRAM;

/// Errors that can arise from socket operations.
#[derive(Debug, Error)]
pub enum SocketError {
    /// The OS refused to bind the requested port (usually already in use).
    #[error("port {port} unavailable: {source}")]
    PortUnavailable {
        port: u16,
        #[source]
        source: io::Error,
    },
    /// The socket was replaced or closed while a receive was waiting.
    #[error("receive canceled by rebind or close")]
    ReceiveCanceled,
    /// Any other receive failure reported by the OS.
    #[error("receive failed: {0}")]
    Receive(#[source] io::Error),
    /// The reply could not be sent.
    #[error("send failed: {0}")]
    SendFailed(#[source] io::Error),
}

/// One received UDP message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub payload: ArrayVec<u8, MAX_DATAGRAM>,
    pub source: SocketAddr,
}

impl Datagram {
    /// Build a datagram, truncating `bytes` to [`MAX_DATAGRAM`].
    pub fn new(bytes: &[u8], source: SocketAddr) -> Self {
        let mut payload = ArrayVec::new();
        let n = bytes.len().min(MAX_DATAGRAM);
        // Cannot overflow: n <= capacity.
        let _ = payload.try_extend_from_slice(&bytes[..n]);
        Self { payload, source }
    }
}

/// The socket a datagram arrived on.
///
/// Replies go out through it even if the manager has rebound since, so the
/// client always hears back from the port it sent to.
#[derive(Debug, Clone)]
pub struct ReplyHandle {
    socket: Arc<UdpSocket>,
}

impl ReplyHandle {
    pub fn local_port(&self) -> Option<u16> {
        self.socket.local_addr().ok().map(|a| a.port())
    }

    pub async fn send(&self, payload: &[u8], destination: SocketAddr) -> Result<(), SocketError> {
        self.socket
            .send_to(payload, destination)
            .await
            .map_err(SocketError::SendFailed)?;
        Ok(())
    }
}

/// Result of a successful [`SocketManager::bind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// A socket was opened on the port that was already current.
    Initialized(u16),
    /// The server moved from one port to another.
    Changed { from: u16, to: u16 },
}

impl BindOutcome {
    pub fn port(&self) -> u16 {
        match *self {
            BindOutcome::Initialized(port) => port,
            BindOutcome::Changed { to, .. } => to,
        }
    }

    /// Transcript line describing the bind.
    pub fn describe(&self) -> String {
        match *self {
            BindOutcome::Initialized(port) => format!("Initialized socket on port {port}"),
            BindOutcome::Changed { to, .. } => format!("Changed port to {to}"),
        }
    }
}

/// Socket-related server state, guarded by the manager's mutex.
#[derive(Debug)]
pub struct ServerState {
    /// Port of the bound socket, or the last successfully bound one.
    pub current_port: u16,
    socket: Option<Arc<UdpSocket>>,
    pub running: bool,
}

impl ServerState {
    fn new(port: u16) -> Self {
        Self {
            current_port: port,
            socket: None,
            running: true,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.socket.is_some()
    }
}

/// Owner of the server's single UDP socket.
#[derive(Debug)]
pub struct SocketManager {
    host: IpAddr,
    state: Mutex<ServerState>,
    generation: watch::Sender<u64>,
    runtime: Handle,
}

impl SocketManager {
    /// Create an unbound manager.
    ///
    /// `initial_port` is reported as the current port until the first bind.
    /// Sockets are registered with `runtime`, so `bind` may be called from
    /// threads that are not part of it.
    pub fn new(host: IpAddr, initial_port: u16, runtime: Handle) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            host,
            state: Mutex::new(ServerState::new(initial_port)),
            generation,
            runtime,
        }
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn current_port(&self) -> u16 {
        self.lock().current_port
    }

    pub fn is_bound(&self) -> bool {
        self.lock().is_bound()
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Address of the bound socket, if any.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.lock()
            .socket
            .as_ref()
            .and_then(|s| s.local_addr().ok())
    }

    /// Bind `port`, replacing the current socket only once the new one is open.
    ///
    /// Port 0 asks the OS for an ephemeral port; the chosen port becomes current.
    /// Binding the port that is already bound keeps the live socket and only
    /// cancels the pending receive.
    pub fn bind(&self, port: u16) -> Result<BindOutcome, SocketError> {
        let mut state = self.lock();

        if state.is_bound() && port != 0 && port == state.current_port {
            self.bump_generation();
            return Ok(BindOutcome::Initialized(port));
        }

        let socket = self.open(port)?;
        let bound_port = socket
            .local_addr()
            .map(|a| a.port())
            .unwrap_or(port);

        let from = std::mem::replace(&mut state.current_port, bound_port);
        // The old socket closes once the loop drops its clone after cancellation.
        state.socket = Some(Arc::new(socket));
        self.bump_generation();

        log::info!("bound {}:{}", self.host, bound_port);
        if from == bound_port {
            Ok(BindOutcome::Initialized(bound_port))
        } else {
            Ok(BindOutcome::Changed {
                from,
                to: bound_port,
            })
        }
    }

    /// Release the socket. Safe to call when nothing is bound.
    pub fn close(&self) {
        let mut state = self.lock();
        if state.socket.take().is_some() {
            log::info!("closed socket on port {}", state.current_port);
        }
        self.bump_generation();
    }

    /// Stop the server: mark it not running and close the socket.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.running = false;
        state.socket = None;
        self.bump_generation();
    }

    /// Wait for the next datagram; returns it with the socket it arrived on.
    ///
    /// Returns [`SocketError::ReceiveCanceled`] when the socket is replaced or
    /// closed while waiting. With nothing bound, waits for the next bind/close.
    pub async fn receive(&self) -> Result<(Datagram, ReplyHandle), SocketError> {
        // Subscribe under the same lock bind/close take, so no change is missed.
        let (socket, mut changed) = {
            let state = self.lock();
            (state.socket.clone(), self.generation.subscribe())
        };

        let Some(socket) = socket else {
            let _ = changed.changed().await;
            return Err(SocketError::ReceiveCanceled);
        };

        let reply = ReplyHandle {
            socket: Arc::clone(&socket),
        };
        let mut buf = [0u8; MAX_DATAGRAM];
        tokio::select! {
            biased;
            _ = changed.changed() => Err(SocketError::ReceiveCanceled),
            res = socket.recv_from(&mut buf) => {
                let (n, source) = res.map_err(SocketError::Receive)?;
                Ok((Datagram::new(&buf[..n], source), reply))
            }
        }
    }

    /// Send `payload` to `destination` through the current socket.
    pub async fn send(&self, payload: &[u8], destination: SocketAddr) -> Result<(), SocketError> {
        let socket = self.lock().socket.clone().ok_or_else(|| {
            SocketError::SendFailed(io::Error::new(io::ErrorKind::NotConnected, "no socket bound"))
        })?;
        socket
            .send_to(payload, destination)
            .await
            .map_err(SocketError::SendFailed)?;
        Ok(())
    }

    fn open(&self, port: u16) -> Result<UdpSocket, SocketError> {
        let unavailable = |source| SocketError::PortUnavailable { port, source };
        let std_socket =
            std::net::UdpSocket::bind(SocketAddr::new(self.host, port)).map_err(unavailable)?;
        std_socket.set_nonblocking(true).map_err(unavailable)?;

        let _guard = self.runtime.enter();
        UdpSocket::from_std(std_socket).map_err(unavailable)
    }

    fn bump_generation(&self) {
        self.generation.send_modify(|g| *g = g.wrapping_add(1));
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
