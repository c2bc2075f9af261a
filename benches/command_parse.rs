use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rainbow_udp::core::{command, Transcript};
use rainbow_udp::server::{PayloadTransform, Uppercase};

fn bench_parse(c: &mut Criterion) {
    let lines = ["port 20000", "port", "porter", "clear", "exit", "hello world"];

    c.bench_function("parse_console_lines", |b| {
        b.iter(|| {
            for line in lines {
                black_box(command::parse(black_box(line)));
            }
        })
    });
}

fn bench_highlight(c: &mut Criterion) {
    c.bench_function("highlight_partial_input", |b| {
        b.iter(|| {
            black_box(command::highlight(black_box("shutdown now")));
            black_box(command::highlight(black_box("por")));
        })
    });
}

fn bench_transcript_append(c: &mut Criterion) {
    c.bench_function("transcript_log_line", |b| {
        let mut transcript = Transcript::new();
        b.iter(|| {
            if transcript.len() > 1 << 20 {
                transcript = Transcript::new();
            }
            transcript.append_at(
                black_box(1_700_000_000_000),
                "Received \"ping\" from client 127.0.0.1:5000",
                true,
            );
        })
    });
}

fn bench_uppercase(c: &mut Criterion) {
    let payload = vec![b'a'; 1024];

    c.bench_function("uppercase_1k", |b| {
        b.iter(|| black_box(Uppercase.apply(black_box(&payload))))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_highlight,
    bench_transcript_append,
    bench_uppercase
);
criterion_main!(benches);
