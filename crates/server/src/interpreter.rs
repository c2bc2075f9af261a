//! Executes console commands against the running server.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::core::{command, Command, Console};
use crate::socket::{SocketError, SocketManager};
use crate::types::{CommandName, CONFIRM_EXIT_PROMPT};
use crate::{lock_transcript, SharedTranscript};

/// Sending half of the operator command queue.
pub type CommandSender = mpsc::UnboundedSender<String>;
/// Receiving half of the operator command queue.
pub type CommandReceiver = mpsc::UnboundedReceiver<String>;

/// Create the queue submitted console lines travel through.
pub fn command_queue() -> (CommandSender, CommandReceiver) {
    mpsc::unbounded_channel()
}

/// Whether the process should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Shutdown,
}

/// Human-readable answer to one submitted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub text: String,
    pub flow: Flow,
}

impl CommandResponse {
    fn reply(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flow: Flow::Continue,
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.flow == Flow::Shutdown
    }
}

pub struct CommandInterpreter {
    sockets: Arc<SocketManager>,
    transcript: SharedTranscript,
}

impl CommandInterpreter {
    pub fn new(sockets: Arc<SocketManager>, transcript: SharedTranscript) -> Self {
        Self {
            sockets,
            transcript,
        }
    }

    /// Execute every line waiting in `queue`, stopping after a confirmed shutdown.
    pub fn process_pending<C: Console + ?Sized>(
        &mut self,
        queue: &mut CommandReceiver,
        console: &mut C,
    ) -> Vec<CommandResponse> {
        let mut responses = Vec::new();
        while let Ok(line) = queue.try_recv() {
            let response = self.execute(&line, console);
            let stop = response.is_shutdown();
            responses.push(response);
            if stop {
                break;
            }
        }
        responses
    }

    /// Execute one submitted line. The input line is cleared afterwards.
    pub fn execute<C: Console + ?Sized>(&mut self, line: &str, console: &mut C) -> CommandResponse {
        let response = self.dispatch(line, console);
        log::info!("console {line:?} -> {:?}", response.text);

        if !response.is_shutdown() {
            let visible = lock_transcript(&self.transcript).visible_content().to_string();
            console.show_text(&visible);
        }
        console.clear_input();
        let style = command::highlight(console.current_input());
        console.set_input_style(style);
        response
    }

    fn dispatch<C: Console + ?Sized>(&mut self, line: &str, console: &mut C) -> CommandResponse {
        match command::parse(line) {
            Command::WarningAction(name) => {
                if console.prompt_confirm(CONFIRM_EXIT_PROMPT) {
                    log::info!("{} confirmed, shutting down", name.as_str());
                    self.sockets.shutdown();
                    CommandResponse {
                        text: "Shutting down".to_string(),
                        flow: Flow::Shutdown,
                    }
                } else {
                    CommandResponse::reply("Shutdown canceled")
                }
            }
            Command::NoArg(CommandName::Clear) => {
                lock_transcript(&self.transcript).hide_history();
                CommandResponse::reply("Cleared console display")
            }
            Command::NoArg(CommandName::Reset) => {
                lock_transcript(&self.transcript).reveal_history();
                CommandResponse::reply("Restored console display")
            }
            Command::NoArg(CommandName::Port) => {
                let text = format!("Current port: {}", self.sockets.current_port());
                self.log(&text);
                CommandResponse::reply(text)
            }
            Command::WithArg(CommandName::Port, port) => self.change_port(port),
            Command::PlainMessage(text) => self.plain_message(text),
            // The grammar never produces other shapes.
            Command::NoArg(_) | Command::WithArg(..) => self.plain_message(line),
        }
    }

    fn change_port(&mut self, port: u16) -> CommandResponse {
        match self.sockets.bind(port) {
            Ok(outcome) => {
                self.log(&outcome.describe());
                CommandResponse::reply(format!("Changed port to {port}"))
            }
            Err(err) => {
                if let SocketError::PortUnavailable { source, .. } = &err {
                    log::error!("bind {port}: {source}");
                }
                self.log(&format!("[ERROR] Port {port} already in use"));
                CommandResponse::reply(format!(
                    "[ERROR] Failed to change port to {port}: already in use"
                ))
            }
        }
    }

    fn plain_message(&mut self, text: &str) -> CommandResponse {
        self.log(&format!("[SERVER] {text}"));
        CommandResponse::reply(format!("No command issued; invalid input: {text}"))
    }

    fn log(&self, line: &str) {
        lock_transcript(&self.transcript).log(line);
    }
}
