//! Server crate - UDP echo loop and console command execution
//!
//! The server owns exactly one UDP socket. Every datagram it receives is run
//! through a [`PayloadTransform`] (uppercase by default) and sent back to its
//! source, and both directions are recorded in the shared [`Transcript`].
//!
//! Operators steer the server through console lines:
//!
//! | Line | Effect |
//! |------|--------|
//! | `clear` | Hide the transcript history |
//! | `reset` | Reveal the full history again |
//! | `port` | Report the current port |
//! | `port <p>` | Rebind to `p` (0 < p < 65535); the old socket stays on failure |
//! | `shutdown` / `exit` / `halt` | Terminate after confirmation |
//!
//! Anything else is logged as `[SERVER] <line>`.
//!
//! # Concurrency
//!
//! - The [`ServerLoop`] runs as a tokio task on the runtime owned by [`Server`].
//! - The [`CommandInterpreter`] runs on the console thread.
//! - Rebinding from the console cancels the loop's pending receive through
//!   [`SocketManager`], which surfaces as [`SocketError::ReceiveCanceled`].
//!
//! # Environment Variables
//!
//! - `RAINBOW_UDP_HOST`: Bind address (default: "0.0.0.0")
//! - `RAINBOW_UDP_PORT`: Startup port (default: 10127)
//!
//! # Testing
//!
//! ```bash
//! nc -u 127.0.0.1 10127
//! ping
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub mod config;
pub mod interpreter;
pub mod runtime;
pub mod server_loop;
pub mod socket;
pub mod transform;

pub use rainbow_udp_core as core;
pub use rainbow_udp_types as types;

pub use crate::core::Transcript;
pub use config::ServerConfig;
pub use interpreter::{
    command_queue, CommandInterpreter, CommandReceiver, CommandResponse, CommandSender, Flow,
};
pub use runtime::Server;
pub use server_loop::{LoopStatus, ServerEvent, ServerLoop, Step};
pub use socket::{BindOutcome, Datagram, ReplyHandle, ServerState, SocketError, SocketManager};
pub use transform::{PayloadTransform, Uppercase};

/// Transcript shared between the network loop and the console.
pub type SharedTranscript = Arc<Mutex<Transcript>>;

/// Lock the transcript, recovering from a poisoned mutex.
pub fn lock_transcript(transcript: &SharedTranscript) -> MutexGuard<'_, Transcript> {
    transcript.lock().unwrap_or_else(PoisonError::into_inner)
}
