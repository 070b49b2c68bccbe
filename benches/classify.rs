//! Classification throughput over a synthetic conversation

use comms_analysis::context::FilterSettings;
use comms_analysis::engine::AnalysisEngine;
use comms_analysis::models::{Direction, Message};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const LINES: &[&str] = &[
    "hey, are we still on for tonight?",
    "whatever",
    "I'm sorry, I was wrong",
    "That never happened",
    "lol you're ridiculous",
    "haha",
    "thank you for picking up the kids",
    "You're crazy",
    "my boss is such an idiot today",
    "can we talk later? I need some space",
];

fn conversation(len: usize) -> Vec<Message> {
    (0..len)
        .map(|i| {
            let direction = if i % 3 == 0 { Direction::Sent } else { Direction::Received };
            #[allow(clippy::cast_possible_wrap)]
            Message::text(i as i64 + 1, direction, LINES[i % LINES.len()])
        })
        .collect()
}

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute");
    for workers in [1, 4] {
        let engine = AnalysisEngine::standard(FilterSettings::default(), workers).expect("Failed to build engine");
        for len in [1_000, 10_000] {
            let messages = conversation(len);
            group.throughput(Throughput::Elements(len as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("workers_{workers}"), len),
                &messages,
                |b, messages| b.iter(|| engine.recompute(black_box(messages))),
            );
        }
    }
    group.finish();
}

fn bench_single_message(c: &mut Criterion) {
    let engine = AnalysisEngine::standard(FilterSettings::default(), 1).expect("Failed to build engine");
    let messages = conversation(LINES.len());
    let radius = engine.context_radius();
    c.bench_function("classify_window", |b| {
        b.iter(|| {
            for i in 0..messages.len() {
                if let Some(window) = comms_analysis::context::ContextWindow::around(&messages, i, radius) {
                    black_box(engine.classify(&window));
                }
            }
        });
    });
}

criterion_group!(benches, bench_recompute, bench_single_message);
criterion_main!(benches);
