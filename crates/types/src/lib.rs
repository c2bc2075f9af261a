//! Shared types module - constants and small enums used across the workspace
//!
//! Everything here is plain data with no external dependencies, so the same
//! definitions can be used by the command grammar, the network loop and the
//! terminal console.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_PORT` | 10127 | Port bound at startup |
//! | `DEFAULT_HOST` | `0.0.0.0` | Bind address (all interfaces) |
//! | `MAX_DATAGRAM` | 1024 | Receive buffer size; longer datagrams are truncated |
//!
//! # Console vocabulary
//!
//! The console recognizes two groups of command words:
//!
//! - **commands**: `clear`, `reset`, `port`
//! - **warning commands**: `shutdown`, `exit`, `halt` (require confirmation)
//!
//! # Examples
//!
//! ```
//! use rainbow_udp_types::{CommandName, InputStyle, DEFAULT_PORT, MAX_DATAGRAM};
//!
//! assert_eq!(DEFAULT_PORT, 10127);
//! assert_eq!(MAX_DATAGRAM, 1024);
//!
//! let name = CommandName::from_str("halt").unwrap();
//! assert!(name.is_warning());
//! assert_eq!(name.style(), InputStyle::Warning);
//! ```

/// Port bound at startup when nothing else is configured.
pub const DEFAULT_PORT: u16 = 10127;

/// Bind address used when nothing else is configured.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Receive buffer size in bytes.
pub const MAX_DATAGRAM: usize = 1024;

/// Title shown by the terminal console.
pub const CONSOLE_TITLE: &str = "Rainbow UDP Server Terminal";

/// Confirmation asked before `shutdown`, `exit` or `halt` terminate the process.
pub const CONFIRM_EXIT_PROMPT: &str = "Are you sure you would like to exit?";

/// Console refresh interval while idle, in milliseconds.
pub const REFRESH_MS: u64 = 50;

/// Command words that change server state.
pub const COMMANDS: [CommandName; 3] = [CommandName::Clear, CommandName::Reset, CommandName::Port];

/// Command words that terminate the process after confirmation.
pub const WARNING_COMMANDS: [CommandName; 3] =
    [CommandName::Shutdown, CommandName::Exit, CommandName::Halt];

/// Every recognized console command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Clear,
    Reset,
    Port,
    Shutdown,
    Exit,
    Halt,
}

impl CommandName {
    /// Parse an exact command word (case-sensitive, like the console grammar).
    ///
    /// # Examples
    ///
    /// ```
    /// use rainbow_udp_types::CommandName;
    ///
    /// assert_eq!(CommandName::from_str("port"), Some(CommandName::Port));
    /// assert_eq!(CommandName::from_str("PORT"), None);
    /// assert_eq!(CommandName::from_str("porter"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "clear" => Some(CommandName::Clear),
            "reset" => Some(CommandName::Reset),
            "port" => Some(CommandName::Port),
            "shutdown" => Some(CommandName::Shutdown),
            "exit" => Some(CommandName::Exit),
            "halt" => Some(CommandName::Halt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::Clear => "clear",
            CommandName::Reset => "reset",
            CommandName::Port => "port",
            CommandName::Shutdown => "shutdown",
            CommandName::Exit => "exit",
            CommandName::Halt => "halt",
        }
    }

    /// Whether the command terminates the process (after confirmation).
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            CommandName::Shutdown | CommandName::Exit | CommandName::Halt
        )
    }

    /// Input style used while this command is being typed.
    pub fn style(&self) -> InputStyle {
        if self.is_warning() {
            InputStyle::Warning
        } else {
            InputStyle::Command
        }
    }
}

/// Highlight applied to the not-yet-submitted console input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputStyle {
    /// Input does not start with a known command word.
    #[default]
    Neutral,
    /// Input starts with `clear`, `reset` or `port`.
    Command,
    /// Input starts with `shutdown`, `exit` or `halt`.
    Warning,
}

/// Lifecycle phase of the network loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoopPhase {
    #[default]
    Starting,
    /// No socket is open (initial bind failed, or the socket was closed).
    Unbound,
    /// A socket is open; the loop is about to wait for a datagram.
    Bound,
    /// Waiting inside `receive()`.
    Receiving,
    /// Transforming, logging and replying to a datagram.
    Processing,
    /// Terminal state, reached only after a confirmed shutdown.
    Stopped,
}

impl LoopPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopPhase::Starting => "STARTING",
            LoopPhase::Unbound => "UNBOUND",
            LoopPhase::Bound => "BOUND",
            LoopPhase::Receiving => "RECEIVING",
            LoopPhase::Processing => "PROCESSING",
            LoopPhase::Stopped => "STOPPED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_words_round_trip_through_names() {
        for name in COMMANDS.iter().chain(WARNING_COMMANDS.iter()) {
            assert_eq!(CommandName::from_str(name.as_str()), Some(*name));
        }
    }

    #[test]
    fn warning_words_are_the_terminating_ones() {
        assert!(WARNING_COMMANDS.iter().all(|c| c.is_warning()));
        assert!(COMMANDS.iter().all(|c| !c.is_warning()));
        assert_eq!(CommandName::Port.style(), InputStyle::Command);
        assert_eq!(CommandName::Exit.style(), InputStyle::Warning);
    }

    #[test]
    fn reference_defaults() {
        assert_eq!(DEFAULT_PORT, 10127);
        assert_eq!(MAX_DATAGRAM, 1024);
        assert_eq!(InputStyle::default(), InputStyle::Neutral);
    }
}
