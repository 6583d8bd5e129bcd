use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizdeck_core::model::{Question, QuestionBank, QuizOption, SourceFormat};
use quizdeck_core::scoring::{percentage, review, score};
use quizdeck_core::session::Session;

fn make_bank(n: u32) -> QuestionBank {
    QuestionBank {
        source_name: "bench.csv".into(),
        format: SourceFormat::MultipleChoice,
        questions: (1..=n)
            .map(|id| Question {
                id,
                text: format!("Question {id}"),
                options: ["A", "B", "C", "D"]
                    .iter()
                    .map(|k| QuizOption::new(*k, format!("option {k}")))
                    .collect(),
                answer: "C".into(),
            })
            .collect(),
    }
}

fn submitted_session(n: u32) -> Session {
    let mut session = Session::new(make_bank(n).questions).unwrap();
    for id in 1..=n {
        let key = if id % 3 == 0 { "A" } else { "C" };
        session.select(id, key).unwrap();
    }
    session.mark_submitted();
    session
}

fn bench_percentage(c: &mut Criterion) {
    let mut group = c.benchmark_group("percentage");

    group.bench_function("3_of_4", |b| {
        b.iter(|| percentage(black_box(3), black_box(4)))
    });

    group.bench_function("333_of_1000", |b| {
        b.iter(|| percentage(black_box(333), black_box(1000)))
    });

    group.finish();
}

fn bench_score_and_review(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_and_review");

    for n in [10, 100, 1000] {
        let session = submitted_session(n);
        group.bench_function(format!("score_{n}"), |b| {
            b.iter(|| score(black_box(&session)))
        });
        group.bench_function(format!("review_{n}"), |b| {
            b.iter(|| review(black_box(&session)))
        });
    }

    group.finish();
}

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw");
    let bank = make_bank(1000);

    group.bench_function("full_bank", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| Session::draw(black_box(&bank), 0, &mut rng))
    });

    group.bench_function("random_50", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| Session::draw(black_box(&bank), black_box(50), &mut rng))
    });

    group.finish();
}

criterion_group!(benches, bench_percentage, bench_score_and_review, bench_draw);
criterion_main!(benches);
