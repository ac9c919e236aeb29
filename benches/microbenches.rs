//! Criterion microbenches for document parsing and validation.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - Document JSON parsing (from_json_str)
//! - Whole-document validation against the builtin registry

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use mirdoc::doc::io_json::{from_json_str, to_json_string};
use mirdoc::doc::{Annotation, Document};
use mirdoc::ns::NamespaceRegistry;
use mirdoc::validation::{validate_document, ValidateOptions};

// Include the test fixture at compile time (no file I/O during benchmark)
const DOCUMENT_FIXTURE: &str = include_str!("../tests/fixtures/sample_valid.json");

/// A larger synthetic document for validation throughput.
fn dense_document() -> Document {
    let mut doc = Document::new();
    doc.file_metadata.duration = Some(10_000.0);

    let mut beats = Annotation::new("beat");
    for i in 0..2_000 {
        beats.append(i as f64 * 0.5, 0.0, (i % 4) + 1, None);
    }
    doc.push(beats);

    let mut tags = Annotation::new("tag_open");
    for i in 0..500 {
        tags.append(i as f64, 1.0, "rock", Some(0.5));
    }
    doc.push(tags);

    doc
}

/// Benchmark document JSON parsing from string.
fn bench_document_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_parse");
    group.throughput(Throughput::Bytes(DOCUMENT_FIXTURE.len() as u64));

    group.bench_function("from_json_str", |b| {
        b.iter(|| {
            let doc = from_json_str(black_box(DOCUMENT_FIXTURE)).unwrap();
            black_box(doc)
        })
    });

    group.finish();
}

/// Benchmark document JSON serialization.
fn bench_document_write(c: &mut Criterion) {
    let doc = from_json_str(DOCUMENT_FIXTURE).unwrap();

    let mut group = c.benchmark_group("document_write");
    group.bench_function("to_json_string", |b| {
        b.iter(|| {
            let json = to_json_string(black_box(&doc)).unwrap();
            black_box(json)
        })
    });

    group.finish();
}

/// Benchmark whole-document validation.
fn bench_document_validate(c: &mut Criterion) {
    let registry = NamespaceRegistry::with_builtins();
    let opts = ValidateOptions::default();
    let doc = dense_document();
    let observations: usize = doc.annotations.iter().map(|a| a.len()).sum();

    let mut group = c.benchmark_group("document_validate");
    group.throughput(Throughput::Elements(observations as u64));

    group.bench_function("validate_document", |b| {
        b.iter(|| {
            let report = validate_document(black_box(&doc), &registry, &opts);
            black_box(report)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_document_parse,
    bench_document_write,
    bench_document_validate
);
criterion_main!(benches);
