//! Append-only operator transcript with a visible-window offset.

use std::time::{SystemTime, UNIX_EPOCH};

/// The server's operational log.
///
/// Entries are only ever appended. "Clear" moves the visible window to the end
/// of the buffer and "reset" moves it back to the start; neither deletes text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    buffer: String,
    visible_offset: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `line`, prefixed with the current epoch-millis timestamp.
    pub fn append(&mut self, line: &str, with_newline: bool) {
        self.append_at(epoch_millis(), line, with_newline);
    }

    /// Append `line` with an explicit timestamp.
    ///
    /// Renders as `[<millis>] <line>` followed by `\n` when `with_newline` is set.
    pub fn append_at(&mut self, millis: u64, line: &str, with_newline: bool) {
        use std::fmt::Write;

        // Writing into a String cannot fail.
        let _ = write!(self.buffer, "[{millis}] {line}");
        if with_newline {
            self.buffer.push('\n');
        }
    }

    /// Shorthand for `append(line, true)`.
    pub fn log(&mut self, line: &str) {
        self.append(line, true);
    }

    /// Text currently visible to the operator.
    pub fn visible_content(&self) -> &str {
        &self.buffer[self.visible_offset..]
    }

    /// Full history, regardless of the visible window.
    pub fn full_content(&self) -> &str {
        &self.buffer
    }

    /// Hide everything appended so far ("clear").
    pub fn hide_history(&mut self) {
        self.visible_offset = self.buffer.len();
    }

    /// Reveal the whole history again ("reset").
    pub fn reveal_history(&mut self) {
        self.visible_offset = 0;
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn visible_offset(&self) -> usize {
        self.visible_offset
    }

    /// Text appended after byte offset `from`.
    ///
    /// Used by followers that stream the transcript (headless mode). Offsets
    /// past the end, or not on a char boundary, yield an empty slice.
    pub fn since(&self, from: usize) -> &str {
        self.buffer.get(from..).unwrap_or("")
    }
}

/// Milliseconds since the Unix epoch.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
