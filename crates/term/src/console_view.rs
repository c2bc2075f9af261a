//! ConsoleView: maps the transcript, status and input line into a framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout, bottom-up:
//!
//! ```text
//! [1700000000000] Received "ping" from client 127.0.0.1:5000   <- transcript tail
//! [1700000000000] Sending "PING" to client 127.0.0.1:5000
//!  Rainbow UDP Server Terminal | port 10127 | RECEIVING | rx 1 tx 1   <- status bar
//! Changed port to 20000                                         <- last response / confirm
//! > port 20000_                                                 <- input line
//! ```

use std::hash::{Hash, Hasher};

use crate::fb::{palette, CellStyle, FrameBuffer};
use crate::render_throttle::Fnv1aHasher;
use crate::types::{InputStyle, LoopPhase, CONSOLE_TITLE};

const PROMPT: &str = "> ";

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Server figures shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusView {
    pub port: u16,
    pub phase: LoopPhase,
    pub received: u64,
    pub sent: u64,
    pub send_failures: u64,
}

impl StatusView {
    pub fn line(&self) -> String {
        let mut line = format!(
            " {CONSOLE_TITLE} | port {} | {} | rx {} tx {}",
            self.port,
            self.phase.as_str(),
            self.received,
            self.sent
        );
        if self.send_failures > 0 {
            line.push_str(&format!(" | send failures {}", self.send_failures));
        }
        line
    }
}

/// Everything one console frame shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFrame<'a> {
    /// Visible transcript text.
    pub transcript: &'a str,
    pub input: &'a str,
    /// Input cursor, in chars.
    pub cursor: usize,
    pub input_style: InputStyle,
    /// Response to the last submitted command.
    pub response: Option<&'a str>,
    /// Pending yes/no question, shown instead of the response.
    pub confirm: Option<&'a str>,
    pub status: StatusView,
}

impl ConsoleFrame<'_> {
    /// Cheap change detector for [`crate::RenderThrottle`].
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1aHasher::new();
        self.transcript.hash(&mut h);
        self.input.hash(&mut h);
        self.cursor.hash(&mut h);
        self.input_style.hash(&mut h);
        self.response.hash(&mut h);
        self.confirm.hash(&mut h);
        self.status.hash(&mut h);
        h.finish()
    }
}

/// Console layout renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleView;

impl ConsoleView {
    pub fn new() -> Self {
        Self
    }

    /// Render into a fresh framebuffer; returns it with the cursor position.
    pub fn render(
        &self,
        frame: &ConsoleFrame<'_>,
        viewport: Viewport,
    ) -> (FrameBuffer, Option<(u16, u16)>) {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        let cursor = self.render_into(frame, &mut fb);
        (fb, cursor)
    }

    /// Render into `fb` (sized by the caller); returns where the cursor goes.
    pub fn render_into(&self, frame: &ConsoleFrame<'_>, fb: &mut FrameBuffer) -> Option<(u16, u16)> {
        fb.clear(CellStyle::default().into_cell(' '));
        let (w, h) = (fb.width(), fb.height());
        if w == 0 || h == 0 {
            return None;
        }

        let input_y = h - 1;
        if h >= 4 {
            let status_y = h - 3;
            let response_y = h - 2;
            self.draw_transcript(fb, frame.transcript, status_y);
            fb.fill_row(status_y, CellStyle::status_bar());
            fb.put_str(0, status_y, &frame.status.line(), CellStyle::status_bar());
            if let Some(question) = frame.confirm {
                let style = CellStyle {
                    fg: palette::WARNING,
                    bold: true,
                    ..CellStyle::default()
                };
                let end = fb.put_str(0, response_y, &format!("{question} [y/N] "), style);
                return Some((end.min(w - 1), response_y));
            }
            if let Some(response) = frame.response {
                let style = CellStyle {
                    fg: palette::NEUTRAL_INPUT,
                    dim: true,
                    ..CellStyle::default()
                };
                fb.put_str(0, response_y, &sanitize(response), style);
            }
        }

        Some(self.draw_input(fb, frame, input_y))
    }

    /// Fill rows `0..rows` with the wrapped tail of the transcript.
    fn draw_transcript(&self, fb: &mut FrameBuffer, text: &str, rows: u16) {
        let tail = wrapped_tail(text, fb.width() as usize, rows as usize);
        let style = CellStyle::default();
        for (y, line) in tail.iter().enumerate() {
            fb.put_str(0, y as u16, &sanitize(line), style);
        }
    }

    fn draw_input(&self, fb: &mut FrameBuffer, frame: &ConsoleFrame<'_>, y: u16) -> (u16, u16) {
        let prompt_style = CellStyle::for_input(InputStyle::Neutral);
        let x0 = fb.put_str(0, y, PROMPT, prompt_style);

        let room = fb.width().saturating_sub(x0) as usize;
        if room == 0 {
            return (fb.width() - 1, y);
        }

        // Scroll horizontally so the cursor stays on screen.
        let start = (frame.cursor + 1).saturating_sub(room);
        let visible: String = frame.input.chars().skip(start).take(room).collect();
        fb.put_str(x0, y, &sanitize(&visible), CellStyle::for_input(frame.input_style));

        let cx = x0 as usize + frame.cursor - start;
        (cx.min(fb.width() as usize - 1) as u16, y)
    }
}

/// Last `rows` screen rows of `text`, with lines wrapped at `width` chars.
pub fn wrapped_tail(text: &str, width: usize, rows: usize) -> Vec<&str> {
    let mut tail: Vec<&str> = Vec::with_capacity(rows);
    if width == 0 || rows == 0 {
        return tail;
    }

    // Walk backwards so only the visible end of a long transcript is touched.
    for line in text.lines().rev() {
        let chunks = wrap_line(line, width);
        for chunk in chunks.into_iter().rev() {
            if tail.len() == rows {
                break;
            }
            tail.push(chunk);
        }
        if tail.len() == rows {
            break;
        }
    }
    tail.reverse();
    tail
}

fn wrap_line(line: &str, width: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (i, _) in line.char_indices() {
        if count == width {
            chunks.push(&line[start..i]);
            start = i;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&line[start..]);
    chunks
}

/// Control characters from datagram payloads must not reach the terminal.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
