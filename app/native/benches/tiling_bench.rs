//! Benchmarks for layout tree hot paths.
//!
//! Run with: `cargo bench -p trellis`
//!
//! Results are saved to `target/criterion/` with HTML reports.
//!
//! ## Benchmark Groups
//!
//! - `layouts`: Child partitioning at various child counts
//! - `tree`: Insertion and directional navigation on populated workspaces
//! - `resize`: Continuous resize steps and the final ratio fold
//! - `replay`: Full event scripts through the manager
//! - `geometry`: Edge detection and rect operations

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use trellis_lib::cli::replay;
use trellis_lib::config::TrellisConfig;
use trellis_lib::tiling::grab::resize_edges;
use trellis_lib::tiling::node::SplitChild;
use trellis_lib::tiling::split::layout_children;
use trellis_lib::tiling::{
    Action, Dimensions, Direction, Edges, HostEvent, NodeId, Point, Rect, SplitType, WindowId,
    Workspace,
};

// ============================================================================
// Test Data
// ============================================================================

/// A 1080p workarea below a 32px panel.
fn workarea_1080p() -> Rect { Rect::new(0, 32, 1920, 1048) }

/// Children with equal ratios.
#[allow(clippy::cast_precision_loss)] // counts are tiny
fn equal_children(count: usize) -> Vec<SplitChild> {
    (0..count).map(|i| SplitChild::new(NodeId(i as u64), 1.0 / count as f64)).collect()
}

/// A workspace holding `count` tiled windows, every other one opening a
/// nested split so the tree has depth.
fn populated_workspace(count: u32) -> (Workspace, Vec<NodeId>) {
    let mut ws = Workspace::new(Point::default(), workarea_1080p());
    let mut ids = Vec::new();
    for window in 1..=count {
        let node = ws.create_view(WindowId(window), format!("w{window}"), Rect::new(0, 0, 400, 300));
        let id = node.id();
        ws.insert_tiled_node(node);
        ws.set_active(id);
        if window % 2 == 0 {
            ws.set_preferred_split(id, SplitType::HSplit);
        }
        ids.push(id);
    }
    (ws, ids)
}

fn attach_events(count: u32) -> Vec<HostEvent> {
    let mut events: Vec<HostEvent> = (1..=count)
        .map(|window| HostEvent::ViewAttached {
            window: WindowId(window),
            title: format!("w{window}"),
            geometry: Rect::new(0, 0, 400, 300),
            workspace: None,
            toplevel: true,
            tiled: true,
        })
        .collect();
    events.extend([Action::FocusLeft, Action::ToggleSplitDirection, Action::MoveDown].map(|action| {
        HostEvent::Binding { action }
    }));
    events
}

// ============================================================================
// Layout Benchmarks
// ============================================================================

fn bench_layouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("layouts");
    let rect = workarea_1080p();

    for count in [1, 2, 4, 8, 16, 32] {
        let children = equal_children(count);

        group.bench_with_input(BenchmarkId::new("hsplit", count), &count, |b, _| {
            b.iter(|| layout_children(black_box(rect), SplitType::HSplit, black_box(&children)));
        });

        group.bench_with_input(BenchmarkId::new("tabbed", count), &count, |b, _| {
            b.iter(|| layout_children(black_box(rect), SplitType::Tabbed, black_box(&children)));
        });
    }

    group.finish();
}

// ============================================================================
// Tree Benchmarks
// ============================================================================

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree");

    for count in [4, 16, 64] {
        group.bench_with_input(BenchmarkId::new("insert", count), &count, |b, &count| {
            b.iter(|| populated_workspace(black_box(count)));
        });

        let (ws, ids) = populated_workspace(count);
        group.bench_with_input(BenchmarkId::new("get_adjacent", count), &count, |b, _| {
            b.iter(|| {
                for &id in &ids {
                    black_box(ws.get_adjacent(id, Direction::Left));
                    black_box(ws.get_adjacent(id, Direction::Down));
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Resize Benchmarks
// ============================================================================

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");

    let (mut ws, ids) = populated_workspace(8);
    let target = ids[3];
    let base = ws.geometry(target).unwrap_or_default();

    group.bench_function("resize_continuous_step", |b| {
        let mut grow = 0;
        b.iter(|| {
            grow = (grow + 1) % 50;
            let dims = Dimensions::new(base.width + grow, base.height + grow);
            ws.resize_continuous(black_box(target), dims, Edges::RIGHT | Edges::BOTTOM)
        });
    });

    group.bench_function("end_resize", |b| {
        b.iter(|| ws.end_resize(black_box(target)));
    });

    group.finish();
}

// ============================================================================
// Replay Benchmarks
// ============================================================================

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    let config = TrellisConfig::default();

    for count in [8, 32] {
        let events = attach_events(count);
        group.bench_with_input(BenchmarkId::new("script", count), &events, |b, events| {
            b.iter(|| replay(black_box(events), &config));
        });
    }

    group.finish();
}

// ============================================================================
// Geometry Benchmarks
// ============================================================================

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");

    let rect = Rect::new(100, 200, 800, 600);
    let corner = Point::new(120, 210);
    let middle = rect.center();

    group.bench_function("resize_edges_corner", |b| {
        b.iter(|| resize_edges(black_box(rect), black_box(corner)));
    });

    group.bench_function("resize_edges_middle", |b| {
        b.iter(|| resize_edges(black_box(rect), black_box(middle)));
    });

    group.bench_function("rect_contains", |b| {
        b.iter(|| black_box(rect).contains(black_box(middle)));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_layouts,
    bench_tree,
    bench_resize,
    bench_replay,
    bench_geometry,
);

criterion_main!(benches);
