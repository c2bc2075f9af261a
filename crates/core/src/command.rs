//! Console command grammar.
//!
//! Commands are single words, optionally followed by one space and an
//! argument. Matching is prefix-with-boundary: `"port 80"` matches `port`,
//! `"port1"` does not.

use crate::types::{CommandName, InputStyle, COMMANDS, WARNING_COMMANDS};

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `clear`, `reset`, or a bare `port` query.
    NoArg(CommandName),
    /// `port <p>` with a valid port.
    WithArg(CommandName, u16),
    /// `shutdown`, `exit` or `halt`.
    WarningAction(CommandName),
    /// Anything else, echoed into the transcript verbatim.
    PlainMessage(&'a str),
}

/// Why a `port` argument was not accepted.
///
/// These never reach the operator as errors: the line is handled as a plain
/// message instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedArgument {
    NotANumber,
    OutOfRange(i64),
}

/// `line` equals `target`, or starts with `target` followed by a space.
pub fn matches(line: &str, target: &str) -> bool {
    match line.strip_prefix(target) {
        Some(rest) => rest.is_empty() || rest.starts_with(' '),
        None => false,
    }
}

/// `line` equals `target` exactly.
pub fn matches_strict(line: &str, target: &str) -> bool {
    line == target
}

/// Parse a `port` argument; valid ports are strictly between 0 and 65535.
pub fn parse_port_argument(arg: &str) -> Result<u16, MalformedArgument> {
    let value: i64 = arg.parse().map_err(|_| MalformedArgument::NotANumber)?;
    if value > 0 && value < 65535 {
        Ok(value as u16)
    } else {
        Err(MalformedArgument::OutOfRange(value))
    }
}

/// Classify a submitted console line.
pub fn parse(line: &str) -> Command<'_> {
    if let Some(name) = WARNING_COMMANDS
        .iter()
        .find(|name| matches(line, name.as_str()))
    {
        return Command::WarningAction(*name);
    }

    if matches(line, CommandName::Clear.as_str()) {
        return Command::NoArg(CommandName::Clear);
    }
    if matches(line, CommandName::Reset.as_str()) {
        return Command::NoArg(CommandName::Reset);
    }

    let port = CommandName::Port.as_str();
    if matches_strict(line, port) {
        return Command::NoArg(CommandName::Port);
    }
    if matches(line, port) {
        // `matches` guarantees the "port " prefix.
        let arg = &line[port.len() + 1..];
        if let Ok(p) = parse_port_argument(arg) {
            return Command::WithArg(CommandName::Port, p);
        }
    }

    Command::PlainMessage(line)
}

/// Style for the current, not yet submitted, input text.
///
/// Warning commands take precedence over regular ones.
pub fn highlight(input: &str) -> InputStyle {
    let mut style = InputStyle::Neutral;
    for name in COMMANDS.iter() {
        if matches(input, name.as_str()) {
            style = InputStyle::Command;
        }
    }
    for name in WARNING_COMMANDS.iter() {
        if matches(input, name.as_str()) {
            style = InputStyle::Warning;
        }
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_boundary_matching() {
        assert!(matches("port", "port"));
        assert!(matches("port 80", "port"));
        assert!(matches("port ", "port"));
        assert!(!matches("porter", "port"));
        assert!(!matches("port1", "port"));
        assert!(!matches("po", "port"));
        assert!(!matches(" port", "port"));
    }

    #[test]
    fn strict_matching_rejects_trailing_content() {
        assert!(matches_strict("port", "port"));
        assert!(!matches_strict("port ", "port"));
        assert!(!matches_strict("port 80", "port"));
    }

    #[test]
    fn parses_no_arg_commands() {
        assert_eq!(parse("clear"), Command::NoArg(CommandName::Clear));
        assert_eq!(parse("reset"), Command::NoArg(CommandName::Reset));
        assert_eq!(parse("port"), Command::NoArg(CommandName::Port));
        // Trailing words after clear/reset are ignored.
        assert_eq!(parse("clear all"), Command::NoArg(CommandName::Clear));
    }

    #[test]
    fn parses_port_change() {
        assert_eq!(parse("port 80"), Command::WithArg(CommandName::Port, 80));
        assert_eq!(parse("port 1"), Command::WithArg(CommandName::Port, 1));
        assert_eq!(parse("port 65534"), Command::WithArg(CommandName::Port, 65534));
        assert_eq!(parse("port +8080"), Command::WithArg(CommandName::Port, 8080));
    }

    #[test]
    fn malformed_port_falls_through_to_plain_message() {
        for line in [
            "port ",
            "port abc",
            "port 0",
            "port 65535",
            "port -1",
            "port  80",
            "port 80 ",
            "port 99999999999999999999",
        ] {
            assert_eq!(parse(line), Command::PlainMessage(line), "{line:?}");
        }
    }

    #[test]
    fn warning_commands() {
        assert_eq!(parse("shutdown"), Command::WarningAction(CommandName::Shutdown));
        assert_eq!(parse("exit now"), Command::WarningAction(CommandName::Exit));
        assert_eq!(parse("halt"), Command::WarningAction(CommandName::Halt));
        assert_eq!(parse("exits"), Command::PlainMessage("exits"));
    }

    #[test]
    fn anything_else_is_plain() {
        assert_eq!(parse("hello"), Command::PlainMessage("hello"));
        assert_eq!(parse(""), Command::PlainMessage(""));
        assert_eq!(parse("porter"), Command::PlainMessage("porter"));
        assert_eq!(parse("Clear"), Command::PlainMessage("Clear"));
    }

    #[test]
    fn port_argument_errors() {
        assert_eq!(parse_port_argument("x"), Err(MalformedArgument::NotANumber));
        assert_eq!(parse_port_argument(""), Err(MalformedArgument::NotANumber));
        assert_eq!(parse_port_argument("0"), Err(MalformedArgument::OutOfRange(0)));
        assert_eq!(
            parse_port_argument("65535"),
            Err(MalformedArgument::OutOfRange(65535))
        );
        assert_eq!(parse_port_argument("10127"), Ok(10127));
    }

    #[test]
    fn highlight_styles() {
        assert_eq!(highlight(""), InputStyle::Neutral);
        assert_eq!(highlight("por"), InputStyle::Neutral);
        assert_eq!(highlight("port"), InputStyle::Command);
        assert_eq!(highlight("port 9"), InputStyle::Command);
        assert_eq!(highlight("clear"), InputStyle::Command);
        assert_eq!(highlight("reset x"), InputStyle::Command);
        assert_eq!(highlight("exit"), InputStyle::Warning);
        assert_eq!(highlight("halt "), InputStyle::Warning);
        assert_eq!(highlight("shutdowns"), InputStyle::Neutral);
    }
}
