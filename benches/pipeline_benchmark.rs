//! Benchmarks for the outline pipeline.
//!
//! Run with: cargo bench
//!
//! These benchmarks run the pipeline over synthetic reports of increasing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdf_headings::pipeline::{CandidateSelector, LineMerger};
use pdf_headings::{BBox, OutlineExtractor, TextLine};

/// Creates a synthetic report with headings, split body lines and footers.
fn create_test_lines(page_count: u32) -> Vec<TextLine> {
    let mut lines = vec![TextLine::new(
        "Benchmark Report",
        24.0,
        "Helvetica-Bold",
        1,
        BBox::new(72.0, 80.0, 400.0, 104.0),
    )];

    for page in 1..=page_count {
        lines.push(TextLine::new(
            format!("{}. Section {}", page, page),
            16.0,
            "Helvetica-Bold",
            page,
            BBox::new(72.0, 130.0, 300.0, 146.0),
        ));
        lines.push(TextLine::new(
            format!("{}.1 Details", page),
            13.0,
            "Helvetica-Bold",
            page,
            BBox::new(72.0, 170.0, 260.0, 183.0),
        ));

        for row in 0..40 {
            let y0 = 200.0 + row as f32 * 13.0;
            // Each body line arrives as two fragments.
            lines.push(TextLine::new(
                "Body text for pipeline",
                10.0,
                "Times-Roman",
                page,
                BBox::new(72.0, y0, 250.0, y0 + 10.0),
            ));
            lines.push(TextLine::new(
                "performance measurement.",
                10.0,
                "Times-Roman",
                page,
                BBox::new(255.0, y0 + 0.5, 420.0, y0 + 10.5),
            ));
        }

        lines.push(TextLine::new(
            format!("Page {}", page),
            8.0,
            "Helvetica",
            page,
            BBox::new(290.0, 760.0, 320.0, 768.0),
        ));
    }

    lines
}

/// Benchmark fragment merging.
fn bench_line_merging(c: &mut Criterion) {
    let lines = create_test_lines(20);
    let merger = LineMerger::default();

    c.bench_function("merge_20_pages", |b| {
        b.iter(|| merger.merge(black_box(&lines)));
    });
}

/// Benchmark candidate selection on merged lines.
fn bench_candidate_selection(c: &mut Criterion) {
    let merged = LineMerger::default().merge(&create_test_lines(20));
    let selector = CandidateSelector::default();

    c.bench_function("select_20_pages", |b| {
        b.iter(|| selector.select(black_box(&merged)));
    });
}

/// Benchmark the full pipeline at various sizes.
fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for page_count in [1, 10, 50].iter() {
        let lines = create_test_lines(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| pdf_headings::process(black_box(&lines)));
        });
    }

    group.finish();
}

/// Benchmark parallel batch extraction.
fn bench_batch_extraction(c: &mut Criterion) {
    let documents: Vec<Vec<TextLine>> = (0..16).map(|_| create_test_lines(10)).collect();
    let parallel = OutlineExtractor::new();
    let sequential = OutlineExtractor::new().sequential();

    c.bench_function("batch_parallel", |b| {
        b.iter(|| parallel.extract_many(black_box(&documents)));
    });

    c.bench_function("batch_sequential", |b| {
        b.iter(|| sequential.extract_many(black_box(&documents)));
    });
}

criterion_group!(
    benches,
    bench_line_merging,
    bench_candidate_selection,
    bench_full_pipeline,
    bench_batch_extraction,
);
criterion_main!(benches);
