//! Selection behaviour driven through the mouse and keyboard entry points

mod common;

use common::{cell_center, click, ctrl_click, grid, people, shift_click, table_for};
use gridview::grid::{ClickModifiers, Navigation};
use gridview::{CellPosition, Damage};

// ========================================================================
// Cell clicks
// ========================================================================

#[test]
fn test_click_selects_single_cell() {
    let mut t = grid(10, 4);
    click(&mut t, 3, 2);
    assert_eq!(t.selection().current(), Some(CellPosition::new(3, 2)));
    assert_eq!(t.selection().cell_count(), 1);
    assert!(t.selection().is_selected(3, 2));
    assert!(!t.selection().is_selected(3, 1));
}

#[test]
fn test_click_same_cell_reports_no_damage() {
    let mut t = grid(10, 4);
    let (x, y) = cell_center(&t, 0, 0);
    assert_eq!(t.mouse_down(x, y, ClickModifiers::default()), Damage::None);
}

#[test]
fn test_shift_click_selects_rectangle_from_anchor() {
    let mut t = grid(10, 4);
    click(&mut t, 1, 1);
    shift_click(&mut t, 3, 2);

    assert_eq!(t.selection().multi_rows(), &[1, 2, 3]);
    assert_eq!(t.selection().multi_cols(), &[1, 2]);
    assert_eq!(t.selection().anchor(), Some(CellPosition::new(1, 1)));
    assert_eq!(t.selection().current(), Some(CellPosition::new(3, 2)));
    assert_eq!(t.selection().cell_count(), 6);

    // Shift-click back above the anchor flips the range
    shift_click(&mut t, 0, 0);
    assert_eq!(t.selection().multi_rows(), &[0, 1]);
    assert_eq!(t.selection().multi_cols(), &[0, 1]);
}

#[test]
fn test_ctrl_click_adds_and_removes_row_and_column() {
    let mut t = grid(10, 4);
    click(&mut t, 1, 1);
    ctrl_click(&mut t, 4, 3);

    // Rows and columns combine, so the cross product is selected
    assert!(t.selection().is_selected(1, 3));
    assert!(t.selection().is_selected(4, 1));
    assert_eq!(t.selection().cell_count(), 4);
    assert_eq!(t.selection().current(), Some(CellPosition::new(4, 3)));

    ctrl_click(&mut t, 4, 3);
    assert_eq!(t.selection().multi_rows(), &[1]);
    assert_eq!(t.selection().multi_cols(), &[1]);
    assert_eq!(t.selection().current(), Some(CellPosition::new(1, 1)));
}

#[test]
fn test_ctrl_click_last_cell_clears_selection() {
    let mut t = grid(10, 4);
    click(&mut t, 2, 2);
    ctrl_click(&mut t, 2, 2);
    assert!(t.selection().is_empty());
}

#[test]
fn test_click_outside_data_keeps_selection() {
    let mut t = grid(3, 2);
    click(&mut t, 1, 1);
    // Below the last row and right of the last column
    t.mouse_down(400.0, 200.0, ClickModifiers::default());
    assert_eq!(t.selection().current(), Some(CellPosition::new(1, 1)));
}

#[test]
fn test_drag_past_table_edge_clamps_to_last_cell() {
    let mut t = grid(5, 3);
    let (x, y) = cell_center(&t, 1, 0);
    t.mouse_down(x, y, ClickModifiers::default());
    t.mouse_drag(440.0, 240.0);
    t.mouse_up(440.0, 240.0);

    assert_eq!(t.selection().multi_rows(), &[1, 2, 3, 4]);
    assert_eq!(t.selection().multi_cols(), &[0, 1, 2]);
    assert_eq!(t.selection().current(), Some(CellPosition::new(4, 2)));
}

#[test]
fn test_drag_without_press_does_nothing() {
    let mut t = grid(5, 3);
    assert_eq!(t.mouse_drag(200.0, 100.0), Damage::None);
    assert_eq!(t.selection().cell_count(), 1);
}

// ========================================================================
// Header clicks
// ========================================================================

#[test]
fn test_row_header_click_selects_row() {
    let mut t = grid(10, 4);
    // Row header strip is x < 50; row 3 spans y 24 + 66 .. 24 + 88
    t.mouse_down(20.0, 24.0 + 70.0, ClickModifiers::default());
    t.mouse_up(20.0, 24.0 + 70.0);

    assert_eq!(t.selection().multi_rows(), &[3]);
    assert_eq!(t.selection().multi_cols(), &[0, 1, 2, 3]);
    assert!(!t.selection().all_rows());
}

#[test]
fn test_row_header_drag_extends_rows() {
    let mut t = grid(10, 4);
    t.mouse_down(20.0, 24.0 + 30.0, ClickModifiers::default());
    t.mouse_drag(20.0, 24.0 + 100.0);
    t.mouse_up(20.0, 24.0 + 100.0);
    assert_eq!(t.selection().multi_rows(), &[1, 2, 3, 4]);
    assert_eq!(t.selection().multi_cols().len(), 4);
}

#[test]
fn test_shift_click_column_header_extends_columns() {
    let mut t = grid(6, 4);
    t.mouse_down(70.0, 10.0, ClickModifiers::default());
    t.mouse_up(70.0, 10.0);
    t.mouse_down(
        270.0,
        10.0,
        ClickModifiers {
            shift: true,
            ctrl: false,
        },
    );
    t.mouse_up(270.0, 10.0);

    assert_eq!(t.selection().multi_cols(), &[0, 1, 2]);
    assert!(t.selection().all_rows());
    assert_eq!(t.selection().multi_rows().len(), 6);
}

#[test]
fn test_corner_click_selects_everything() {
    let mut t = grid(6, 4);
    t.mouse_down(10.0, 10.0, ClickModifiers::default());
    t.mouse_up(10.0, 10.0);
    assert_eq!(t.selection().cell_count(), 24);
    assert!(t.selection().all_rows());
}

#[test]
fn test_select_all_on_empty_table_is_no_op() {
    let mut t = grid(0, 0);
    assert_eq!(t.select_all(), Damage::None);
    assert!(t.selection().is_empty());
}

#[test]
fn test_clear_selection() {
    let mut t = grid(3, 3);
    assert!(t.clear_selection().needs_redraw());
    assert!(t.selection().is_empty());
    assert_eq!(t.clear_selection(), Damage::None);
}

// ========================================================================
// Keyboard navigation
// ========================================================================

#[test]
fn test_navigation_stays_in_bounds() {
    let mut t = grid(3, 3);
    assert_eq!(t.navigate(Navigation::Up, false), Damage::None);
    assert_eq!(t.navigate(Navigation::Left, false), Damage::None);

    t.navigate(Navigation::LastCell, false);
    assert_eq!(t.selection().current(), Some(CellPosition::new(2, 2)));
    t.navigate(Navigation::NextCell, false);
    assert_eq!(t.selection().current(), Some(CellPosition::new(2, 2)));
}

#[test]
fn test_tab_wraps_to_next_row() {
    let mut t = grid(3, 3);
    t.select_cell(0, 2);
    t.navigate(Navigation::NextCell, false);
    assert_eq!(t.selection().current(), Some(CellPosition::new(1, 0)));
    t.navigate(Navigation::PrevCell, false);
    assert_eq!(t.selection().current(), Some(CellPosition::new(0, 2)));
}

#[test]
fn test_shift_arrows_extend_from_anchor() {
    let mut t = grid(10, 5);
    t.select_cell(2, 2);
    t.navigate(Navigation::Down, true);
    t.navigate(Navigation::Right, true);
    assert_eq!(t.selection().multi_rows(), &[2, 3]);
    assert_eq!(t.selection().multi_cols(), &[2, 3]);
    assert_eq!(t.selection().anchor(), Some(CellPosition::new(2, 2)));

    // Plain movement collapses the range
    t.navigate(Navigation::Down, false);
    assert_eq!(t.selection().cell_count(), 1);
}

#[test]
fn test_navigation_scrolls_current_cell_into_view() {
    let mut t = grid(100, 10);
    let damage = t.navigate(Navigation::LastCell, false);
    assert!(damage.is_full());
    // 100 rows of 22 px in a 220 px canvas, 10 columns of 100 px in 400 px
    assert_eq!(t.viewport().scroll_y, 1980.0);
    assert_eq!(t.viewport().scroll_x, 600.0);
    assert!(t.viewport().is_row_visible(99));
    assert!(t.viewport().is_col_visible(9));

    t.navigate(Navigation::FirstCell, false);
    assert_eq!(t.viewport().scroll_y, 0.0);
    assert_eq!(t.viewport().scroll_x, 0.0);
}

#[test]
fn test_navigation_within_view_only_redraws_selection() {
    let mut t = grid(100, 10);
    let before = t.renderer().stats();
    let damage = t.navigate(Navigation::Down, false);
    assert!(!damage.is_full());
    assert!(damage.includes_selection());
    let after = t.renderer().stats();
    assert_eq!(after.full_redraws, before.full_redraws);
    assert_eq!(after.selection_redraws, before.selection_redraws + 1);
}

#[test]
fn test_page_down_moves_by_visible_rows() {
    let mut t = grid(100, 3);
    t.navigate(Navigation::PageDown, false);
    assert_eq!(t.selection().current(), Some(CellPosition::new(10, 0)));
    t.navigate(Navigation::PageUp, false);
    assert_eq!(t.selection().current(), Some(CellPosition::new(0, 0)));
}

// ========================================================================
// Extraction
// ========================================================================

#[test]
fn test_single_cell_extent_covers_whole_column() {
    let mut t = table_for(people());
    click(&mut t, 2, 1);
    let (rows, cols) = t.selection_extent();
    assert_eq!(rows, vec![0, 1, 2, 3]);
    assert_eq!(cols, vec![1]);
}

#[test]
fn test_block_extent_is_sorted() {
    let mut t = table_for(people());
    click(&mut t, 3, 2);
    shift_click(&mut t, 1, 0);
    let (rows, cols) = t.selection_extent();
    assert_eq!(rows, vec![1, 2, 3]);
    assert_eq!(cols, vec![0, 1, 2]);

    let sub = t.selected_subframe();
    assert_eq!(sub.column_names(), vec!["name", "age", "score"]);
    assert_eq!(sub.index(), &["1", "2", "3"]);
}

#[test]
fn test_status_reports_current_cell_and_count() {
    let mut t = table_for(people());
    click(&mut t, 1, 1);
    assert_eq!(t.status(), "2:2 age (int)");
    shift_click(&mut t, 2, 2);
    assert_eq!(t.status(), "3:3 score (float) | 4 cells selected");
}
