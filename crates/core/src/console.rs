//! Collaborator traits for the operator console.
//!
//! The command interpreter never touches a terminal directly. It talks to a
//! display sink (where text, input styling and confirmations go) and to the
//! input source that produced the submitted line.

use crate::types::InputStyle;

/// Where the interpreter shows text and asks questions.
pub trait DisplaySink {
    /// Replace the displayed transcript with `text`.
    fn show_text(&mut self, text: &str);

    /// Restyle the pending input line.
    fn set_input_style(&mut self, style: InputStyle);

    /// Ask the operator a yes/no question. Blocks until answered.
    fn prompt_confirm(&mut self, message: &str) -> bool;
}

/// The editable input line commands are typed into.
pub trait InputSource {
    /// Current, not yet submitted, text.
    fn current_input(&self) -> &str;

    /// Reset the input line to empty.
    fn clear_input(&mut self);
}

/// Both halves of an operator console.
pub trait Console: DisplaySink + InputSource {}

impl<T: DisplaySink + InputSource> Console for T {}
