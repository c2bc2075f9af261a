#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::UdpSocket;
use std::time::{Duration, Instant};

use rainbow_udp::core::{DisplaySink, InputSource};
use rainbow_udp::server::{lock_transcript, SharedTranscript};
use rainbow_udp::types::InputStyle;

/// Console double that records what the interpreter does to it.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub shown: String,
    pub input: String,
    pub style: InputStyle,
    pub answers: VecDeque<bool>,
    pub prompts: Vec<String>,
}

impl RecordingConsole {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Pretend the operator typed `line`.
    pub fn type_line(&mut self, line: &str) {
        self.input = line.to_string();
    }
}

impl DisplaySink for RecordingConsole {
    fn show_text(&mut self, text: &str) {
        self.shown = text.to_string();
    }

    fn set_input_style(&mut self, style: InputStyle) {
        self.style = style;
    }

    fn prompt_confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}

impl InputSource for RecordingConsole {
    fn current_input(&self) -> &str {
        &self.input
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }
}

/// A loopback port that was free a moment ago.
pub fn free_port() -> u16 {
    let probe = UdpSocket::bind("127.0.0.1:0").unwrap();
    probe.local_addr().unwrap().port()
}

/// Poll the transcript until it contains `needle` or `timeout` passes.
pub fn wait_for_transcript(transcript: &SharedTranscript, needle: &str, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if lock_transcript(transcript).full_content().contains(needle) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

pub fn client() -> UdpSocket {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_millis(500)))
        .unwrap();
    socket
}
