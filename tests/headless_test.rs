use rainbow_udp::headless::HeadlessConsole;
use rainbow_udp::server::{command_queue, lock_transcript, Server, ServerConfig};

#[test]
fn scripted_session_runs_until_confirmed_exit() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let server = Server::start(&config).expect("server start");
    let port = server.current_port();
    let mut interpreter = server.interpreter();

    let (tx, rx) = command_queue();
    for line in ["port", "hello there", "exit", "n", "halt", "yes", "port"] {
        tx.send(line.to_string()).unwrap();
    }
    let mut console = HeadlessConsole::new(rx, Vec::new());

    let mut responses = Vec::new();
    while let Some(line) = console.next_line() {
        let response = interpreter.execute(&line, &mut console);
        console.respond(&response.text).unwrap();
        responses.push(response.text.clone());
        if response.is_shutdown() {
            break;
        }
    }

    assert_eq!(
        responses,
        vec![
            format!("Current port: {port}"),
            "No command issued; invalid input: hello there".to_string(),
            "Shutdown canceled".to_string(),
            "Shutting down".to_string(),
        ]
    );
    let out = String::from_utf8(console.into_inner()).unwrap();
    assert_eq!(out.matches("Are you sure you would like to exit? [y/N] ").count(), 2);
    assert!(lock_transcript(&server.transcript())
        .full_content()
        .contains("[SERVER] hello there"));

    server.shutdown();
}
