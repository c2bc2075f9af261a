//! Rainbow UDP server (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as
//! `rainbow_udp::{core,input,server,term,types}` and adds the line-oriented
//! [`headless`] console used when no terminal UI is wanted.

pub mod headless;

pub use rainbow_udp_core as core;
pub use rainbow_udp_input as input;
pub use rainbow_udp_server as server;
pub use rainbow_udp_term as term;
pub use rainbow_udp_types as types;
