//! Benchmarks for pdfnav navigation operations.
//!
//! Run with: cargo bench
//!
//! These benchmarks run against synthetic in-memory documents so they
//! measure navigation logic, not PDF parsing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdfnav::search::search;
use pdfnav::{
    find_section, get_toc, HeadingDetector, MemoryPage, MemorySource, NavOptions, OutlineEntry,
    Span, Toc, TocSource,
};

/// Creates a paper-like document: a numbered heading every fourth page,
/// forty body lines per page.
fn create_test_document(page_count: u32) -> MemorySource {
    let mut doc = MemorySource::new();
    for i in 0..page_count {
        let mut page = MemoryPage::new();
        if i % 4 == 0 {
            page = page.line(format!("{}. Section about topic {}", i / 4 + 1, i), 16.0, true);
        }
        for line in 0..40 {
            page = page.line(
                format!(
                    "Line {} on page {} discusses attention, memory and retrieval.",
                    line,
                    i + 1
                ),
                10.0,
                false,
            );
        }
        doc = doc.page(page);
    }
    doc
}

fn create_test_toc(entries: u32) -> Toc {
    let entries = (0..entries)
        .map(|i| {
            let level = if i % 5 == 0 { 1 } else { 2 };
            OutlineEntry::new(level, format!("Chapter {} on subject {}", i, i * 7), i + 1)
        })
        .collect();
    Toc::new(entries, TocSource::Native)
}

/// Benchmark heading detection over raw spans.
fn bench_heading_detection(c: &mut Criterion) {
    let detector = HeadingDetector::new();
    let spans: Vec<Vec<Span>> = (0..50)
        .map(|page| {
            let mut spans = vec![Span::new("1. Introduction", 16.0, true, page).at(72.0, 800.0)];
            spans.extend((0..40).map(|line| {
                Span::new("Body text of a regular size line.", 10.0, false, page)
                    .at(72.0, 780.0 - line as f32 * 14.0)
            }));
            spans
        })
        .collect();

    c.bench_function("heading_detection_50_pages", |b| {
        b.iter(|| detector.detect(black_box(spans.clone())));
    });
}

/// Benchmark TOC resolution, sequential and parallel.
fn bench_toc_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("toc_resolution");
    let doc = create_test_document(40);

    group.bench_function("detected_40_pages", |b| {
        b.iter(|| get_toc(black_box(&doc)));
    });

    group.finish();
}

/// Benchmark fuzzy section lookup across the three match tiers.
fn bench_find_section(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_section");
    let toc = create_test_toc(500);

    for (name, query) in [
        ("exact", "chapter 250 on subject 1750"),
        ("substring", "subject 3493"),
        ("word_overlap", "subject chapter zebra"),
        ("miss", "nothing here matches"),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| find_section(black_box(&toc), black_box(query), 600));
        });
    }

    group.finish();
}

/// Benchmark full-text search at various sizes.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for page_count in [10, 50, 100].iter() {
        let doc = create_test_document(*page_count);
        let options = NavOptions::default();

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| search(black_box(&doc), black_box("attention"), 10, &options).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_heading_detection,
    bench_toc_resolution,
    bench_find_section,
    bench_search,
);
criterion_main!(benches);
