//! Line-oriented console for running without a terminal UI.
//!
//! Commands arrive one per line on the command queue (normally fed from
//! stdin). Confirmation questions consume the next queued line; only `y` or
//! `yes` confirms.
//!
//! Output is an append-only stream: transcript lines are printed once, as
//! they are added. `clear` and `reset` still move the transcript's visible
//! window (and print their responses) but nothing already printed is
//! withdrawn or repeated.

use std::io::{self, BufRead, Write};
use std::thread;

use crate::core::{DisplaySink, InputSource};
use crate::server::{lock_transcript, CommandReceiver, CommandSender, ServerEvent, SharedTranscript};
use crate::types::InputStyle;
use tokio::sync::mpsc;

pub struct HeadlessConsole<W: Write> {
    queue: CommandReceiver,
    pending: String,
    out: W,
}

impl<W: Write> HeadlessConsole<W> {
    pub fn new(queue: CommandReceiver, out: W) -> Self {
        Self {
            queue,
            pending: String::new(),
            out,
        }
    }

    /// Block for the next submitted line. `None` once every sender is gone.
    pub fn next_line(&mut self) -> Option<String> {
        let line = self.queue.blocking_recv()?;
        self.pending.clone_from(&line);
        Some(line)
    }

    /// Print a command response.
    pub fn respond(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for HeadlessConsole<W> {
    // Already streamed by `spawn_transcript_printer`; see the module docs.
    fn show_text(&mut self, _text: &str) {}

    fn set_input_style(&mut self, _style: InputStyle) {}

    fn prompt_confirm(&mut self, message: &str) -> bool {
        let _ = write!(self.out, "{message} [y/N] ");
        let _ = self.out.flush();
        match self.queue.blocking_recv() {
            Some(answer) => is_yes(&answer),
            None => false,
        }
    }
}

impl<W: Write> InputSource for HeadlessConsole<W> {
    fn current_input(&self) -> &str {
        &self.pending
    }

    fn clear_input(&mut self) {
        self.pending.clear();
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Forward lines read from `input` onto the command queue until EOF.
pub fn spawn_line_reader<R>(input: R, queue: CommandSender) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            if queue.send(line).is_err() {
                break;
            }
        }
        log::debug!("command input closed");
    })
}

/// Print transcript text to `out` as it is appended.
///
/// Wakes on every [`ServerEvent`] and exits when the event stream closes.
pub fn spawn_transcript_printer<W>(
    transcript: SharedTranscript,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
    mut out: W,
) -> thread::JoinHandle<()>
where
    W: Write + Send + 'static,
{
    thread::spawn(move || {
        let mut printed = 0;
        loop {
            let chunk = {
                let transcript = lock_transcript(&transcript);
                let chunk = transcript.since(printed).to_string();
                printed = transcript.len();
                chunk
            };
            if !chunk.is_empty() && (out.write_all(chunk.as_bytes()).is_err() || out.flush().is_err()) {
                break;
            }
            if events.blocking_recv().is_none() {
                break;
            }
        }
    })
}
