//! Terminal console for the server.
//!
//! Renders into a plain framebuffer (no widget library) that is diffed
//! against the previous frame and flushed with crossterm.
//!
//! - [`ConsoleView`] is pure layout and can be tested without a terminal.
//! - [`TerminalRenderer`] owns raw mode and the alternate screen.
//! - [`TerminalConsole`] ties both to a [`LineEditor`] and implements the
//!   core console traits.

pub mod console;
pub mod console_view;
pub mod fb;
pub mod render_throttle;
pub mod renderer;

pub use rainbow_udp_core as core;
pub use rainbow_udp_input as input;
pub use rainbow_udp_types as types;

pub use console::{ConsoleInput, TerminalConsole};
pub use console_view::{wrapped_tail, ConsoleFrame, ConsoleView, StatusView, Viewport};
pub use fb::{palette, Cell, CellStyle, FrameBuffer, Rgb};
pub use input::LineEditor;
pub use render_throttle::{Fnv1aHasher, RenderThrottle};
pub use renderer::{encode_frame_into, TerminalRenderer};
