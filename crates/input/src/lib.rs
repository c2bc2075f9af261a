//! Terminal input module (console-facing).
//!
//! This module is independent of any rendering. It maps `crossterm` key
//! events into [`EditorKey`]s and keeps the operator's pending command line
//! in a [`LineEditor`].

pub mod editor;
pub mod map;

pub use rainbow_udp_types as types;

pub use editor::LineEditor;
pub use map::{confirm_answer, handle_key_event, is_interrupt, EditorKey};
