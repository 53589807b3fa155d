//! Criterion benchmarks for Termcel critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Raster: flood-fill region discovery and line rasterization
//! - Edit: batched paint strokes and undo/redo replay
//! - Parse: JSON5 definition parsing and resolution
//! - Template: version-line expansion and recovery
//! - Export: definition serialization

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use std::collections::HashMap;
use termcel::edit::EditEngine;
use termcel::export::export_animation;
use termcel::models::{Animation, AnimationDoc, AnimationMetadata, Frame, Position};
use termcel::raster::{fill_region, line_cells};
use termcel::template::{expand, parameterize};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a solid block of paintable content with the given dimensions
fn make_content(width: usize, height: usize) -> String {
    (0..height).map(|_| "#".repeat(width)).collect::<Vec<_>>().join("\n")
}

/// Generate a frame whose every cell is paintable
fn make_frame(width: usize, height: usize) -> Frame {
    Frame::new("bench", make_content(width, height), 100)
}

/// Generate a definition in .cel syntax with the given shape
fn make_definition(frame_count: usize, width: usize, height: usize) -> String {
    let frames: Vec<String> = (0..frame_count)
        .map(|i| {
            let lines: Vec<String> =
                (0..height).map(|_| format!("\"{}\"", "#".repeat(width))).collect();
            let colors: Vec<String> = (0..height)
                .step_by(2)
                .flat_map(|row| {
                    (0..width)
                        .step_by(4)
                        .map(move |col| format!("\"{},{}\": {}", row, col, (row + col) % 16))
                })
                .collect();
            format!(
                "{{ title: \"frame {}\", duration: 90, content: [{}], colors: {{{}}} }}",
                i,
                lines.join(", "),
                colors.join(", ")
            )
        })
        .collect();
    format!(
        "{{ metadata: {{ id: \"bench\", name: \"Bench\" }}, frames: [{}] }}",
        frames.join(", ")
    )
}

/// Generate an animation with a sparse color overlay on every frame
fn make_animation(frame_count: usize, width: usize, height: usize) -> Animation {
    let frames = (0..frame_count)
        .map(|i| {
            let mut frame = make_frame(width, height);
            frame.title = format!("frame {}", i);
            for row in (0..height).step_by(2) {
                for col in (0..width).step_by(4) {
                    frame.colors.insert(Position::new(row, col), ((row + col) % 16) as u8);
                }
            }
            frame
        })
        .collect();
    Animation {
        metadata: AnimationMetadata {
            id: "bench".to_string(),
            name: "Bench".to_string(),
            description: None,
        },
        frames,
    }
}

// =============================================================================
// Raster Benchmarks
// =============================================================================

fn bench_raster(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster");

    // Flood-fill an entirely paintable, entirely uncolored grid: the
    // worst case visits every cell.
    for size in [8, 16, 32, 64].iter() {
        let frame = make_frame(*size, *size);
        let grid = frame.grid();
        let colors: HashMap<Position, u8> = HashMap::new();

        group.throughput(Throughput::Elements((*size * *size) as u64));
        group.bench_with_input(
            BenchmarkId::new("fill_region", format!("{}x{}", size, size)),
            &(grid, colors),
            |b, (grid, colors)| {
                b.iter(|| fill_region(black_box(grid), black_box(colors), Position::new(0, 0)))
            },
        );
    }

    // Fill bounded by a color border: only the interior is visited.
    let frame = make_frame(32, 32);
    let grid = frame.grid();
    let mut border: HashMap<Position, u8> = HashMap::new();
    for i in 0..32 {
        border.insert(Position::new(0, i), 1);
        border.insert(Position::new(31, i), 1);
        border.insert(Position::new(i, 0), 1);
        border.insert(Position::new(i, 31), 1);
    }
    group.bench_function("fill_region_bordered_32x32", |b| {
        b.iter(|| fill_region(black_box(&grid), black_box(&border), Position::new(16, 16)))
    });

    // Line rasterization at several lengths and slopes
    for len in [8, 64, 512].iter() {
        group.throughput(Throughput::Elements(*len as u64));
        group.bench_with_input(BenchmarkId::new("line_horizontal", len), len, |b, &len| {
            b.iter(|| line_cells(black_box(0), black_box(0), black_box(0), black_box(len - 1)))
        });
        group.bench_with_input(BenchmarkId::new("line_diagonal", len), len, |b, &len| {
            b.iter(|| {
                line_cells(black_box(0), black_box(0), black_box(len - 1), black_box(len / 3))
            })
        });
    }

    group.finish();
}

// =============================================================================
// Edit Engine Benchmarks
// =============================================================================

fn bench_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit");

    // One gesture: paint a full row of n cells as a single batch
    for n in [16, 64, 256].iter() {
        group.throughput(Throughput::Elements(*n as u64));
        group.bench_with_input(BenchmarkId::new("paint_batch", n), n, |b, &n| {
            b.iter_batched(
                || vec![make_frame(1, n)],
                |mut frames| {
                    let mut engine = EditEngine::new();
                    engine.start_batch();
                    for col in 0..n {
                        engine.paint_character(&mut frames, 0, 0, col, 9);
                    }
                    engine.commit_batch();
                    frames
                },
                BatchSize::SmallInput,
            )
        });
    }

    // Undo then redo one 64-cell batch; each cycle restores the state it
    // started from, so the measurement is steady across iterations.
    let mut frames = vec![make_frame(1, 64)];
    let mut engine = EditEngine::new();
    engine.start_batch();
    for col in 0..64 {
        engine.paint_character(&mut frames, 0, 0, col, 9);
    }
    engine.commit_batch();
    group.bench_function("undo_redo_64", |b| {
        b.iter(|| {
            engine.undo(black_box(&mut frames));
            engine.redo(black_box(&mut frames));
        })
    });

    // History churn: 100 one-cell batches against the bounded stack,
    // evicting the oldest batch most of the time.
    group.bench_function("history_churn_100", |b| {
        b.iter_batched(
            || vec![make_frame(1, 100)],
            |mut frames| {
                let mut engine = EditEngine::new();
                for col in 0..100 {
                    engine.start_batch();
                    engine.paint_character(&mut frames, 0, 0, col, 5);
                    engine.commit_batch();
                }
                frames
            },
            BatchSize::SmallInput,
        )
    });

    // Flood-fill as an undoable gesture over a 32x32 block
    group.bench_function("flood_fill_gesture_32x32", |b| {
        b.iter_batched(
            || vec![make_frame(32, 32)],
            |mut frames| {
                let mut engine = EditEngine::new();
                engine.start_batch();
                engine.flood_fill(&mut frames, 0, 16, 16, 12);
                engine.commit_batch();
                frames
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// =============================================================================
// Definition Parsing Benchmarks
// =============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (frame_count, width, height) in [(4, 16, 8), (4, 64, 24), (30, 16, 8)].iter() {
        let content = make_definition(*frame_count, *width, *height);
        let name = format!("definition_{}f_{}x{}", frame_count, width, height);

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_function(&name, |b| {
            b.iter(|| {
                json5::from_str::<AnimationDoc>(black_box(&content)).map(|doc| doc.resolve())
            })
        });
    }

    group.finish();
}

// =============================================================================
// Template Benchmarks
// =============================================================================

fn bench_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("template");

    let templated = (0..24)
        .map(|i| {
            if i % 4 == 0 {
                "│  ${version_line:8}   │".to_string()
            } else {
                format!("│  banner line {:02}             │", i)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    let resolved = expand(&templated, "1.4.0");

    group.throughput(Throughput::Bytes(templated.len() as u64));
    group.bench_function("expand", |b| b.iter(|| expand(black_box(&templated), "1.4.0")));

    group.throughput(Throughput::Bytes(resolved.len() as u64));
    group.bench_function("parameterize", |b| {
        b.iter(|| parameterize(black_box(&resolved), "1.4.0"))
    });

    // No placeholders: the scan still walks the whole content
    let plain = make_content(64, 24);
    group.bench_function("expand_no_placeholders", |b| {
        b.iter(|| expand(black_box(&plain), "1.4.0"))
    });

    group.finish();
}

// =============================================================================
// Export Benchmarks
// =============================================================================

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for (frame_count, width, height) in [(4, 16, 8), (30, 16, 8), (4, 64, 24)].iter() {
        let animation = make_animation(*frame_count, *width, *height);
        let name = format!("animation_{}f_{}x{}", frame_count, width, height);

        group.throughput(Throughput::Elements(*frame_count as u64));
        group.bench_with_input(BenchmarkId::new("serialize", &name), &animation, |b, animation| {
            b.iter(|| export_animation(black_box(animation), "0.0.1"))
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_raster,
    bench_edit,
    bench_parse,
    bench_template,
    bench_export
);

criterion_main!(benches);
