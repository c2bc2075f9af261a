//! Core console logic - pure, deterministic, and testable
//!
//! This crate holds the parts of the server that have no I/O at all:
//!
//! - [`transcript`]: append-only operator log with clear/reset window semantics
//! - [`command`]: the console command grammar and input highlighting
//! - [`console`]: collaborator traits the interpreter drives (display sink, input source)
//!
//! # Example
//!
//! ```
//! use rainbow_udp_core::{command, Command, Transcript};
//! use rainbow_udp_types::{CommandName, InputStyle};
//!
//! let mut transcript = Transcript::new();
//! transcript.append_at(1, "Starting server...", true);
//! transcript.hide_history();
//! assert_eq!(transcript.visible_content(), "");
//!
//! assert_eq!(command::parse("port 20000"), Command::WithArg(CommandName::Port, 20000));
//! assert_eq!(command::highlight("exit"), InputStyle::Warning);
//! ```

pub mod command;
pub mod console;
pub mod transcript;

pub use rainbow_udp_types as types;

pub use command::{highlight, matches, matches_strict, parse, Command, MalformedArgument};
pub use console::{Console, DisplaySink, InputSource};
pub use transcript::{epoch_millis, Transcript};
