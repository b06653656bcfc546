//! Benchmarks for stream and document parsing.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use xmlstream_core::{Element, StreamEvent, StreamParser, Tokenizer};

/// Build a stream of `count` message stanzas inside one container.
fn message_stream(count: usize) -> Vec<u8> {
    let mut out = b"<stream:stream to='example.org' version='1.0'>".to_vec();
    for i in 0..count {
        out.extend_from_slice(
            format!(
                "<message to='user{i}@example.org' type='chat'><body>benchmark payload {i} &amp; counting</body></message>"
            )
            .as_bytes(),
        );
    }
    out.extend_from_slice(b"</stream:stream>");
    out
}

fn count_events(input: &[u8], chunk: usize) -> usize {
    let mut count = 0usize;
    {
        let sink = |_: StreamEvent| count += 1;
        let mut parser = StreamParser::new(Tokenizer::new(), sink, None);
        for piece in input.chunks(chunk) {
            parser.feed(piece);
        }
    }
    count
}

fn bench_stream(c: &mut Criterion) {
    let input = message_stream(200);

    let mut group = c.benchmark_group("stream");
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("one_chunk", |b| {
        b.iter(|| count_events(black_box(&input), input.len()))
    });

    group.bench_function("chunks_64", |b| {
        b.iter(|| count_events(black_box(&input), 64))
    });

    group.bench_function("byte_at_a_time", |b| {
        b.iter(|| count_events(black_box(&input), 1))
    });

    group.finish();
}

fn bench_document(c: &mut Criterion) {
    let small = b"<message to='juliet@example.org'><body>hi</body></message>";
    let large = {
        let mut out = b"<query xmlns='jabber:iq:roster'>".to_vec();
        for i in 0..500 {
            out.extend_from_slice(
                format!("<item jid='user{i}@example.org' name='User {i}'/>").as_bytes(),
            );
        }
        out.extend_from_slice(b"</query>");
        out
    };

    let mut group = c.benchmark_group("document");

    group.throughput(Throughput::Bytes(small.len() as u64));
    group.bench_function("small_stanza", |b| {
        b.iter(|| Element::parse(black_box(small)).unwrap())
    });

    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("large_roster", |b| {
        b.iter(|| Element::parse(black_box(&large)).unwrap())
    });

    group.finish();
}

fn bench_text_heavy(c: &mut Criterion) {
    let mut input = b"<doc>".to_vec();
    input.extend_from_slice("lorem ipsum &amp; dolor sit amet ".repeat(500).as_bytes());
    input.extend_from_slice(b"</doc>");

    let mut group = c.benchmark_group("text_heavy");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("entity_decode", |b| {
        b.iter(|| Element::parse(black_box(&input)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_stream, bench_document, bench_text_heavy);
criterion_main!(benches);
