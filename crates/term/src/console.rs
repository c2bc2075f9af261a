//! TerminalConsole: the interactive operator console.
//!
//! Owns the line editor and the renderer. Implements the core console traits
//! so the command interpreter can drive it without knowing about terminals.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use crate::console_view::{ConsoleFrame, ConsoleView, StatusView};
use crate::core::{DisplaySink, InputSource};
use crate::fb::FrameBuffer;
use crate::input::{confirm_answer, handle_key_event, is_interrupt, LineEditor};
use crate::render_throttle::RenderThrottle;
use crate::renderer::TerminalRenderer;
use crate::types::{InputStyle, REFRESH_MS};

/// Repaint at least this often even when nothing changed.
const IDLE_REPAINT_MS: u64 = 1000;

/// Result of one input poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// Nothing happened before the timeout.
    Idle,
    /// The pending line changed.
    Edited,
    /// Enter was pressed; carries the submitted line.
    Submitted(String),
    /// Ctrl+C.
    Interrupt,
    Resized,
}

pub struct TerminalConsole {
    renderer: TerminalRenderer,
    view: ConsoleView,
    fb: FrameBuffer,
    editor: LineEditor,
    shown: String,
    input_style: InputStyle,
    response: Option<String>,
    status: StatusView,
    throttle: RenderThrottle,
    started: Instant,
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            renderer: TerminalRenderer::new(),
            view: ConsoleView::new(),
            fb: FrameBuffer::new(0, 0),
            editor: LineEditor::new(),
            shown: String::new(),
            input_style: InputStyle::Neutral,
            response: None,
            status: StatusView::default(),
            throttle: RenderThrottle::new(IDLE_REPAINT_MS),
            started: Instant::now(),
        }
    }

    /// Switch the terminal to raw mode and the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        self.renderer.enter()?;
        self.throttle.reset();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.renderer.exit()
    }

    pub fn set_status(&mut self, status: StatusView) {
        self.status = status;
    }

    /// Show `text` on the response line.
    pub fn set_response(&mut self, text: impl Into<String>) {
        self.response = Some(text.into());
    }

    pub fn shown_text(&self) -> &str {
        &self.shown
    }

    pub fn input_style(&self) -> InputStyle {
        self.input_style
    }

    /// Repaint unconditionally.
    pub fn draw(&mut self) -> Result<()> {
        self.paint(None)
    }

    /// Repaint only if the frame changed (or the idle interval passed).
    pub fn redraw_if_changed(&mut self) -> Result<()> {
        let now_ms = self.started.elapsed().as_millis() as u64;
        let fingerprint = self.frame(None).fingerprint();
        if self.throttle.should_render(now_ms, fingerprint) {
            self.paint(None)?;
        }
        Ok(())
    }

    /// Wait up to `timeout` for one terminal event and apply it to the line.
    pub fn poll_input(&mut self, timeout: Duration) -> Result<ConsoleInput> {
        if !event::poll(timeout)? {
            return Ok(ConsoleInput::Idle);
        }

        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if is_interrupt(key) {
                    return Ok(ConsoleInput::Interrupt);
                }
                let Some(edit) = handle_key_event(key) else {
                    return Ok(ConsoleInput::Idle);
                };
                Ok(match self.editor.apply(edit) {
                    Some(line) => ConsoleInput::Submitted(line),
                    None => ConsoleInput::Edited,
                })
            }
            Event::Resize(..) => {
                self.renderer.invalidate();
                self.throttle.reset();
                Ok(ConsoleInput::Resized)
            }
            _ => Ok(ConsoleInput::Idle),
        }
    }

    fn frame<'a>(&'a self, confirm: Option<&'a str>) -> ConsoleFrame<'a> {
        ConsoleFrame {
            transcript: &self.shown,
            input: self.editor.text(),
            cursor: self.editor.cursor(),
            input_style: self.input_style,
            response: self.response.as_deref(),
            confirm,
            status: self.status,
        }
    }

    fn paint(&mut self, confirm: Option<&str>) -> Result<()> {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let mut fb = std::mem::replace(&mut self.fb, FrameBuffer::new(0, 0));
        fb.resize(w, h);

        let cursor = self.view.render_into(&self.frame(confirm), &mut fb);
        let drawn = self.renderer.draw(&fb, cursor);
        self.fb = fb;
        drawn
    }

    fn read_confirmation(&mut self, message: &str) -> Result<bool> {
        self.renderer.invalidate();
        loop {
            self.paint(Some(message))?;
            if !event::poll(Duration::from_millis(REFRESH_MS))? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(answer) = confirm_answer(key) {
                        return Ok(answer);
                    }
                }
                Event::Resize(..) => self.renderer.invalidate(),
                _ => {}
            }
        }
    }
}

impl DisplaySink for TerminalConsole {
    fn show_text(&mut self, text: &str) {
        if self.shown != text {
            self.shown.clear();
            self.shown.push_str(text);
        }
    }

    fn set_input_style(&mut self, style: InputStyle) {
        self.input_style = style;
    }

    fn prompt_confirm(&mut self, message: &str) -> bool {
        let answer = match self.read_confirmation(message) {
            Ok(answer) => answer,
            Err(err) => {
                log::error!("confirmation prompt failed: {err}");
                false
            }
        };
        self.throttle.reset();
        answer
    }
}

impl InputSource for TerminalConsole {
    fn current_input(&self) -> &str {
        self.editor.text()
    }

    fn clear_input(&mut self) {
        self.editor.clear();
    }
}
