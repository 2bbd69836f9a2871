//! Benchmarks for scene rebuilds and painting
//!
//! Run with: cargo bench --bench rendering

mod support;
use support::make_table;

use gridview::grid::{Navigation, RecordingSurface};
use gridview::CellValue;

fn main() {
    divan::main();
}

// ============================================================================
// Full redraws
// ============================================================================

/// Cost of a full pass should not depend on dataset size, only on the window
#[divan::bench(args = [1_000, 100_000, 1_000_000])]
fn full_redraw(bencher: divan::Bencher, rows: usize) {
    let mut table = make_table(rows, 20);
    bencher.bench_local(|| {
        table.redraw(true);
        divan::black_box(table.renderer().stats().last_cells_drawn)
    });
}

#[divan::bench(args = [10, 100, 1000])]
fn full_redraw_wide(bencher: divan::Bencher, cols: usize) {
    let mut table = make_table(1000, cols);
    bencher.bench_local(|| {
        table.redraw(true);
        divan::black_box(table.renderer().stats().last_cells_drawn)
    });
}

// ============================================================================
// Partial redraws
// ============================================================================

#[divan::bench]
fn selection_redraw(bencher: divan::Bencher) {
    let mut table = make_table(100_000, 20);
    bencher.bench_local(|| {
        table.redraw(false);
    });
}

#[divan::bench]
fn single_cell_edit(bencher: divan::Bencher) {
    let mut table = make_table(100_000, 20);
    let mut n = 0i64;
    bencher.bench_local(|| {
        n += 1;
        divan::black_box(table.set_value(3, 1, CellValue::Int(n)).ok())
    });
}

#[divan::bench]
fn arrow_key_step(bencher: divan::Bencher) {
    let mut table = make_table(100_000, 20);
    let mut down = true;
    bencher.bench_local(|| {
        let nav = if down { Navigation::Down } else { Navigation::Up };
        down = !down;
        divan::black_box(table.navigate(nav, false))
    });
}

#[divan::bench]
fn scroll_one_page(bencher: divan::Bencher) {
    let mut table = make_table(100_000, 20);
    let mut dy = 1000.0;
    bencher.bench_local(|| {
        dy = -dy;
        divan::black_box(table.scroll_by(0.0, dy))
    });
}

// ============================================================================
// Painting
// ============================================================================

#[divan::bench]
fn paint_to_recording_surface(bencher: divan::Bencher) {
    let table = make_table(10_000, 20);
    bencher.bench_local(|| {
        let mut surface = RecordingSurface::new();
        table.paint(&mut surface);
        divan::black_box(surface.ops.len())
    });
}
