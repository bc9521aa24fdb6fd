use criterion::{black_box, criterion_group, criterion_main, Criterion};

use studycomp_core::model::Difficulty;
use studycomp_core::synthesis::{mock_question, parse_generated_questions};

const GENERATED: &str = r#"```json
[
  {"question": "Which layer routes packets?", "options": ["Network", "Transport", "Session", "Physical"], "answer": "Network"},
  {"question": "TCP is?", "options": ["Connection-oriented", "Connectionless", "Broadcast", "Stateless"], "answer": "Connection-oriented"},
  {"question": "Port 443 serves?", "options": ["HTTPS", "SSH", "DNS", "SMTP"], "answer": "HTTPS"}
]
```"#;

fn bench_mock_question(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock_question");

    group.bench_function("single", |b| {
        b.iter(|| mock_question(black_box("Computer Networks"), black_box(7), Difficulty::Hard))
    });

    group.bench_function("quiz_of_20", |b| {
        b.iter(|| {
            (0..20u64)
                .map(|i| mock_question(black_box("Computer Networks"), i, Difficulty::Moderate))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

fn bench_parse_generated(c: &mut Criterion) {
    c.bench_function("parse_generated_questions", |b| {
        b.iter(|| parse_generated_questions(black_box(GENERATED)))
    });
}

criterion_group!(benches, bench_mock_question, bench_parse_generated);
criterion_main!(benches);
