mod common;

use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;

use common::{free_port, RecordingConsole};
use rainbow_udp::server::{
    command_queue, lock_transcript, CommandInterpreter, SharedTranscript, SocketManager,
    Transcript,
};
use rainbow_udp::types::{InputStyle, CONFIRM_EXIT_PROMPT};

const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

fn setup() -> (Arc<SocketManager>, SharedTranscript, CommandInterpreter) {
    let sockets = Arc::new(SocketManager::new(LOOPBACK, 0, Handle::current()));
    sockets.bind(0).expect("ephemeral bind");
    let transcript: SharedTranscript = Arc::new(Mutex::new(Transcript::new()));
    let interpreter = CommandInterpreter::new(Arc::clone(&sockets), Arc::clone(&transcript));
    (sockets, transcript, interpreter)
}

fn transcript_text(transcript: &SharedTranscript) -> String {
    lock_transcript(transcript).full_content().to_string()
}

#[tokio::test]
async fn port_query_reports_and_logs_current_port() {
    let (sockets, transcript, mut interpreter) = setup();
    let port = sockets.current_port();
    let mut console = RecordingConsole::default();

    let response = interpreter.execute("port", &mut console);

    assert_eq!(response.text, format!("Current port: {port}"));
    assert!(transcript_text(&transcript).contains(&format!("] Current port: {port}\n")));
    assert!(console.shown.contains(&format!("Current port: {port}")));
}

#[tokio::test]
async fn port_change_rebinds_and_logs() {
    let (sockets, transcript, mut interpreter) = setup();
    let target = free_port();
    let mut console = RecordingConsole::default();

    let response = interpreter.execute(&format!("port {target}"), &mut console);

    assert_eq!(response.text, format!("Changed port to {target}"));
    assert_eq!(sockets.current_port(), target);
    assert_eq!(sockets.local_addr().map(|a| a.port()), Some(target));
    assert!(transcript_text(&transcript).contains(&format!("Changed port to {target}")));
}

#[tokio::test]
async fn port_in_use_keeps_the_old_socket() {
    let (sockets, transcript, mut interpreter) = setup();
    let before = sockets.current_port();
    let blocker = UdpSocket::bind((LOOPBACK, 0)).unwrap();
    let taken = blocker.local_addr().unwrap().port();
    let mut console = RecordingConsole::default();

    let response = interpreter.execute(&format!("port {taken}"), &mut console);

    assert_eq!(
        response.text,
        format!("[ERROR] Failed to change port to {taken}: already in use")
    );
    assert_eq!(sockets.current_port(), before);
    assert!(sockets.is_bound());
    assert!(transcript_text(&transcript).contains(&format!("[ERROR] Port {taken} already in use")));
}

#[tokio::test]
async fn malformed_port_commands_are_plain_messages() {
    let (sockets, transcript, mut interpreter) = setup();
    let before = sockets.current_port();
    let mut console = RecordingConsole::default();

    for line in ["port 70000", "port 65535", "port 0", "port abc", "porter", "Port"] {
        let response = interpreter.execute(line, &mut console);
        assert_eq!(
            response.text,
            format!("No command issued; invalid input: {line}")
        );
        assert!(transcript_text(&transcript).contains(&format!("[SERVER] {line}\n")));
    }
    assert_eq!(sockets.current_port(), before);
}

#[tokio::test]
async fn clear_hides_history_and_reset_restores_it() {
    let (_sockets, transcript, mut interpreter) = setup();
    let mut console = RecordingConsole::default();
    interpreter.execute("hello", &mut console);

    let cleared = interpreter.execute("clear", &mut console);
    assert_eq!(cleared.text, "Cleared console display");
    assert_eq!(console.shown, "");

    interpreter.execute("again", &mut console);
    assert!(console.shown.contains("[SERVER] again"));
    assert!(!console.shown.contains("[SERVER] hello"));

    let reset = interpreter.execute("reset", &mut console);
    assert_eq!(reset.text, "Restored console display");
    assert!(console.shown.contains("[SERVER] hello"));
    assert_eq!(console.shown, transcript_text(&transcript));
}

#[tokio::test]
async fn declined_exit_changes_nothing() {
    let (sockets, transcript, mut interpreter) = setup();
    let mut console = RecordingConsole::answering(&[false]);
    let before = transcript_text(&transcript);

    let response = interpreter.execute("exit", &mut console);

    assert_eq!(response.text, "Shutdown canceled");
    assert!(!response.is_shutdown());
    assert_eq!(console.prompts, vec![CONFIRM_EXIT_PROMPT.to_string()]);
    assert_eq!(transcript_text(&transcript), before);
    assert!(sockets.is_running());
    assert!(sockets.is_bound());
}

#[tokio::test]
async fn confirmed_halt_shuts_down() {
    let (sockets, _transcript, mut interpreter) = setup();
    let mut console = RecordingConsole::answering(&[true]);

    let response = interpreter.execute("halt", &mut console);

    assert!(response.is_shutdown());
    assert!(!sockets.is_running());
    assert!(!sockets.is_bound());
}

#[tokio::test]
async fn input_is_cleared_and_restyled_after_each_command() {
    let (_sockets, _transcript, mut interpreter) = setup();
    let mut console = RecordingConsole::default();
    console.type_line("clear");
    console.style = InputStyle::Command;

    interpreter.execute("clear", &mut console);

    assert_eq!(console.input, "");
    assert_eq!(console.style, InputStyle::Neutral);
}

#[tokio::test]
async fn pending_queue_stops_after_shutdown() {
    let (_sockets, _transcript, mut interpreter) = setup();
    let (tx, mut rx) = command_queue();
    for line in ["hello", "shutdown", "port"] {
        tx.send(line.to_string()).unwrap();
    }
    let mut console = RecordingConsole::answering(&[true]);

    let responses = interpreter.process_pending(&mut rx, &mut console);

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].text, "No command issued; invalid input: hello");
    assert!(responses[1].is_shutdown());
    assert_eq!(rx.try_recv().unwrap(), "port");
}
