use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizdeck_core::loader::records_from_csv_str;
use quizdeck_core::parser::{parse_records, split_embedded_options, Record};

fn bench_split_embedded(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_embedded");

    let short = "某题(A)选项一(B)选项二";
    let no_labels = "這一題沒有任何選項標記，只有題幹文字";
    let long = {
        let mut s = String::from("長題幹");
        for label in ["A", "B", "C", "D", "E", "F", "G", "H"] {
            s.push_str(&format!("({label})選項內容 {label} 比較長的一段說明文字"));
        }
        s
    };

    group.bench_function("two_options", |b| {
        b.iter(|| split_embedded_options(black_box(short)))
    });

    group.bench_function("no_labels", |b| {
        b.iter(|| split_embedded_options(black_box(no_labels)))
    });

    group.bench_function("eight_options", |b| {
        b.iter(|| split_embedded_options(black_box(&long)))
    });

    group.finish();
}

fn bench_parse_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_records");

    let small = standard_records(10);
    let medium = standard_records(200);
    let large = standard_records(2000);

    group.bench_function("10_rows", |b| {
        b.iter(|| parse_records(black_box(&small), black_box("bench.csv")))
    });

    group.bench_function("200_rows", |b| {
        b.iter(|| parse_records(black_box(&medium), black_box("bench.csv")))
    });

    group.bench_function("2000_rows", |b| {
        b.iter(|| parse_records(black_box(&large), black_box("bench.csv")))
    });

    group.finish();
}

fn bench_csv_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_loading");
    let csv = generate_csv(500);

    group.bench_function("500_rows", |b| {
        b.iter(|| records_from_csv_str(black_box(&csv)))
    });

    group.finish();
}

fn standard_records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let mut record = Record::new();
            record.insert("問題".into(), format!("第 {i} 題"));
            for key in ["A", "B", "C", "D"] {
                record.insert(format!("選項{key}"), format!("選項 {key}{i}"));
            }
            record.insert("正確答案".into(), "b".into());
            record
        })
        .collect()
}

fn generate_csv(n: usize) -> String {
    let mut s = String::from("問題,選項A,選項B,選項C,選項D,正確答案\n");
    for i in 0..n {
        s.push_str(&format!("第 {i} 題,甲,乙,丙,丁,C\n"));
    }
    s
}

criterion_group!(
    benches,
    bench_split_embedded,
    bench_parse_records,
    bench_csv_loading
);
criterion_main!(benches);
