//! Rainbow UDP server (default binary).
//!
//! Echoes every datagram back in uppercase and takes operator commands from
//! an interactive terminal console, or from stdin with `--headless`.

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::tty::IsTty;

use rainbow_udp::core::{command, DisplaySink, InputSource};
use rainbow_udp::headless::{spawn_line_reader, spawn_transcript_printer, HeadlessConsole};
use rainbow_udp::server::{command_queue, lock_transcript, LoopStatus, Server, ServerConfig};
use rainbow_udp::term::{ConsoleInput, StatusView, TerminalConsole};
use rainbow_udp::types::REFRESH_MS;

/// UDP server that answers every datagram with its uppercase form.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Bind address (overrides RAINBOW_UDP_HOST).
    #[arg(long)]
    host: Option<String>,

    /// Startup port (overrides RAINBOW_UDP_PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Read commands from stdin and print the transcript to stdout.
    /// Implied when stdin is not a terminal.
    #[arg(long)]
    headless: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let headless = cli.headless || !io::stdin().is_tty();

    // The terminal UI owns the screen; stay quiet unless RUST_LOG says otherwise.
    let default_filter = if headless { "info" } else { "off" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = ServerConfig::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let server = Server::start(&config)?;
    lock_transcript(&server.transcript()).log("Loading user interface...");

    if headless {
        run_headless(server)
    } else {
        run_terminal(server)
    }
}

fn run_terminal(mut server: Server) -> Result<()> {
    let mut console = TerminalConsole::new();
    console.enter()?;

    let result = terminal_loop(&mut server, &mut console);

    // Always try to restore terminal state.
    let _ = console.exit();
    server.shutdown();
    result
}

fn terminal_loop(server: &mut Server, console: &mut TerminalConsole) -> Result<()> {
    let transcript = server.transcript();
    let mut interpreter = server.interpreter();
    let (cmd_tx, mut cmd_rx) = command_queue();

    console.show_text(lock_transcript(&transcript).visible_content());
    loop {
        let mut refreshed = false;
        while server.try_recv_event().is_some() {
            refreshed = true;
        }
        if refreshed {
            let visible = lock_transcript(&transcript).visible_content().to_string();
            console.show_text(&visible);
        }
        console.set_status(status_view(server.current_port(), server.status()));
        console.redraw_if_changed()?;

        match console.poll_input(Duration::from_millis(REFRESH_MS))? {
            ConsoleInput::Submitted(line) => {
                let _ = cmd_tx.send(line);
            }
            ConsoleInput::Interrupt => {
                let _ = cmd_tx.send("exit".to_string());
            }
            ConsoleInput::Edited => {
                let style = command::highlight(console.current_input());
                console.set_input_style(style);
            }
            ConsoleInput::Idle | ConsoleInput::Resized => {}
        }

        for response in interpreter.process_pending(&mut cmd_rx, console) {
            console.set_response(response.text.as_str());
            if response.is_shutdown() {
                return Ok(());
            }
        }
    }
}

fn run_headless(mut server: Server) -> Result<()> {
    let (cmd_tx, cmd_rx) = command_queue();
    spawn_line_reader(io::BufReader::new(io::stdin()), cmd_tx);
    if let Some(events) = server.take_events() {
        spawn_transcript_printer(server.transcript(), events, io::stdout());
    }
    server.notify_refresh();

    let mut interpreter = server.interpreter();
    let mut console = HeadlessConsole::new(cmd_rx, io::stdout());
    while let Some(line) = console.next_line() {
        let response = interpreter.execute(&line, &mut console);
        console.respond(&response.text)?;
        if response.is_shutdown() {
            server.shutdown();
            return Ok(());
        }
        server.notify_refresh();
    }

    log::info!("stdin closed; serving until killed");
    let status = server.wait()?;
    log::info!("server stopped after {} datagrams", status.received);
    Ok(())
}

fn status_view(port: u16, status: LoopStatus) -> StatusView {
    StatusView {
        port,
        phase: status.phase,
        received: status.received,
        sent: status.sent,
        send_failures: status.send_failures,
    }
}
