use criterion::{Criterion, black_box, criterion_group, criterion_main};
use newsdesk_engine::normalize::{normalize, normalize_str, normalize_with_report};
mod common;

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    group.sample_size(20);

    let raw = common::generate_article(100);
    group.bench_function("structured", |b| {
        b.iter(|| {
            let doc = normalize(black_box(&raw));
            black_box(doc);
        });
    });

    let text = common::generate_article_text(100);
    group.bench_function("string_encoded", |b| {
        b.iter(|| {
            let doc = normalize_str(black_box(&text));
            black_box(doc);
        });
    });

    group.bench_function("with_report", |b| {
        b.iter(|| {
            let normalized = normalize_with_report(black_box(&raw));
            black_box(normalized);
        });
    });

    group.finish();
}

fn bench_document_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_operations");
    group.sample_size(20);

    let doc = normalize(&common::generate_article(100));

    group.bench_function("to_value", |b| {
        b.iter(|| {
            let value = doc.to_value();
            black_box(value);
        });
    });

    group.bench_function("summary", |b| {
        b.iter(|| {
            let summary = doc.summary();
            black_box(summary);
        });
    });

    group.bench_function("excerpt", |b| {
        b.iter(|| {
            let excerpt = doc.excerpt(black_box(200));
            black_box(excerpt);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_document_operations);
criterion_main!(benches);
