//! Cell editor flows: text entry, choice lists and how edits end

mod common;

use common::{cell_center, click, people, table_for};
use gridview::data::value::parse_datetime;
use gridview::data::Column;
use gridview::grid::{ClickModifiers, EditCommand, EditMode, Layer, Navigation};
use gridview::{dispatch, CellPosition, CellValue, ColumnType, DataFrame, UserAction};

fn session_text(t: &gridview::Table) -> Option<String> {
    t.editor().session().map(|s| s.pending_text())
}

// ========================================================================
// Text editing
// ========================================================================

#[test]
fn test_double_click_opens_editor_with_value() {
    let mut t = table_for(people());
    let (x, y) = cell_center(&t, 1, 0);
    t.mouse_down(x, y, ClickModifiers::default());
    t.mouse_up(x, y);
    t.double_click(x, y);

    assert!(t.editor().is_editing());
    assert_eq!(session_text(&t), Some("bob".to_string()));
    assert_eq!(t.renderer().grid().count(Layer::EditOverlay), 1);
}

#[test]
fn test_typing_replaces_cell_content() {
    let mut t = table_for(people());
    t.select_cell(2, 0);
    t.type_char('z');
    t.type_char('o');
    assert_eq!(session_text(&t), Some("zo".to_string()));

    t.commit_edit();
    assert_eq!(t.get_value(2, 0), CellValue::from("zo"));
    assert!(t.renderer().grid().count(Layer::EditOverlay) == 0);
}

#[test]
fn test_cursor_movement_and_word_delete() {
    let mut t = table_for(people());
    t.begin_edit_at(0, 0);
    t.edit(EditCommand::End { select: false });
    t.edit(EditCommand::InsertText(" lee".to_string()));
    assert_eq!(session_text(&t), Some("ann lee".to_string()));

    t.edit(EditCommand::DeleteWordBackward);
    assert_eq!(session_text(&t), Some("ann ".to_string()));

    t.edit(EditCommand::Home { select: false });
    t.edit(EditCommand::Delete);
    assert_eq!(session_text(&t), Some("nn ".to_string()));

    t.edit(EditCommand::SelectAll);
    t.edit(EditCommand::InsertChar('q'));
    assert_eq!(session_text(&t), Some("q".to_string()));
}

#[test]
fn test_blank_entry_commits_empty_value() {
    let mut t = table_for(people());
    t.begin_edit_at(0, 1);
    t.edit(EditCommand::SelectAll);
    t.edit(EditCommand::Backspace);
    t.commit_edit();
    assert_eq!(t.get_value(0, 1), CellValue::Empty);
}

#[test]
fn test_float_entry_is_parsed() {
    let mut t = table_for(people());
    t.select_cell(1, 2);
    for ch in "-7.75".chars() {
        t.type_char(ch);
    }
    t.commit_edit();
    assert_eq!(t.get_value(1, 2), CellValue::Float(-7.75));
    assert_eq!(t.selection().current(), Some(CellPosition::new(2, 2)));
}

#[test]
fn test_commit_on_last_row_stays_put() {
    let mut t = table_for(people());
    t.select_cell(3, 0);
    t.type_char('x');
    t.commit_edit();
    assert_eq!(t.selection().current(), Some(CellPosition::new(3, 0)));
}

#[test]
fn test_datetime_edit_round_trips() {
    let df = DataFrame::from_columns(vec![Column::from_values(
        "when",
        ColumnType::DateTime,
        vec![CellValue::from("2024-01-05"), CellValue::Empty],
    )])
    .unwrap();
    let mut t = table_for(df);

    t.begin_edit_at(0, 0);
    assert_eq!(session_text(&t), Some("2024-01-05".to_string()));
    t.edit(EditCommand::SelectAll);
    t.edit(EditCommand::InsertText("2024-02-10 08:30".to_string()));
    t.commit_edit();
    assert_eq!(
        t.get_value(0, 0),
        CellValue::DateTime(parse_datetime("2024-02-10 08:30:00").unwrap())
    );

    // Unparseable dates leave the cell alone
    t.begin_edit_at(1, 0);
    t.edit(EditCommand::InsertText("soon".to_string()));
    t.commit_edit();
    assert_eq!(t.get_value(1, 0), CellValue::Empty);
    assert!(!t.editor().is_editing());
}

// ========================================================================
// Ending an edit
// ========================================================================

#[test]
fn test_cancel_discards_changes() {
    let mut t = table_for(people());
    t.select_cell(0, 0);
    t.type_char('q');
    assert!(t.cancel_edit().includes_selection());
    assert_eq!(t.get_value(0, 0), CellValue::from("ann"));
    assert_eq!(t.renderer().grid().count(Layer::EditOverlay), 0);
}

#[test]
fn test_click_elsewhere_abandons_edit() {
    let mut t = table_for(people());
    t.select_cell(0, 0);
    t.type_char('q');
    click(&mut t, 2, 1);

    assert!(!t.editor().is_editing());
    assert_eq!(t.get_value(0, 0), CellValue::from("ann"));
    assert_eq!(t.selection().current(), Some(CellPosition::new(2, 1)));
}

#[test]
fn test_structural_change_cancels_edit() {
    let mut t = table_for(people());
    t.select_cell(0, 0);
    t.type_char('q');
    t.add_rows(2);
    assert!(!t.editor().is_editing());
    assert_eq!(t.get_value(0, 0), CellValue::from("ann"));
}

#[test]
fn test_begin_edit_without_cells_does_nothing() {
    let mut t = table_for(DataFrame::empty(0, 2));
    assert!(!t.begin_edit().needs_redraw());
    assert!(!t.editor().is_editing());
}

// ========================================================================
// Choice editing
// ========================================================================

#[test]
fn test_category_cell_opens_choice_list() {
    let mut t = table_for(people());
    t.begin_edit_at(1, 3);
    let session = t.editor().session().unwrap();
    match &session.mode {
        EditMode::Choice {
            options,
            highlighted,
        } => {
            assert_eq!(options, &["red", "blue", "green"]);
            assert_eq!(*highlighted, 1);
        }
        other => panic!("expected choice mode, got {:?}", other),
    }
    // The drop-down texts are drawn in the overlay
    let overlay = t.renderer().grid().texts(Layer::EditOverlay);
    assert!(overlay.contains(&"green"));
}

#[test]
fn test_clicking_a_choice_commits_it() {
    let mut t = table_for(people());
    t.begin_edit_at(0, 3);

    // Choices hang below the cell, one row each: "blue" is the second
    let (x, _) = cell_center(&t, 0, 3);
    let row_height = t.layout().row_height();
    let y = t.config().header_height + row_height * 2.5;
    t.mouse_down(x, y, ClickModifiers::default());
    t.mouse_up(x, y);

    assert!(!t.editor().is_editing());
    assert_eq!(t.get_value(0, 3), CellValue::Category("blue".into()));
    // Choosing keeps the current cell where it was
    assert_eq!(t.selection().current(), Some(CellPosition::new(0, 3)));
}

#[test]
fn test_typed_letter_jumps_to_matching_choice() {
    let mut t = table_for(people());
    t.select_cell(0, 3);
    t.type_char('g');
    t.commit_edit();
    assert_eq!(t.get_value(0, 3), CellValue::Category("green".into()));
}

#[test]
fn test_choice_highlight_clamps_at_ends() {
    let mut t = table_for(people());
    t.begin_edit_at(0, 3);
    t.edit(EditCommand::ChoicePrev);
    t.edit(EditCommand::ChoicePrev);
    assert_eq!(session_text(&t), Some("red".to_string()));
    for _ in 0..5 {
        t.edit(EditCommand::ChoiceNext);
    }
    assert_eq!(session_text(&t), Some("green".to_string()));
}

#[test]
fn test_text_commands_ignored_in_choice_mode() {
    let mut t = table_for(people());
    t.begin_edit_at(0, 3);
    assert!(!t.edit(EditCommand::Backspace).needs_redraw());
    assert_eq!(session_text(&t), Some("red".to_string()));
}

// ========================================================================
// Keyboard-driven flows through dispatch
// ========================================================================

#[test]
fn test_dispatch_enter_edit_type_enter() {
    let mut t = table_for(people());
    dispatch(&mut t, UserAction::Navigate {
        nav: Navigation::Down,
        extend: false,
    });
    dispatch(&mut t, UserAction::BeginEdit);
    dispatch(&mut t, UserAction::Edit(EditCommand::End { select: false }));
    dispatch(&mut t, UserAction::TypeChar('!'));
    dispatch(&mut t, UserAction::CommitEdit);

    assert_eq!(t.get_value(1, 0), CellValue::from("bob!"));
    assert_eq!(t.selection().current(), Some(CellPosition::new(2, 0)));
}

#[test]
fn test_dispatch_down_commits_and_moves() {
    let mut t = table_for(people());
    dispatch(&mut t, UserAction::TypeChar('k'));
    dispatch(&mut t, UserAction::Navigate {
        nav: Navigation::Down,
        extend: false,
    });
    assert!(!t.editor().is_editing());
    assert_eq!(t.get_value(0, 0), CellValue::from("k"));
    assert_eq!(t.selection().current(), Some(CellPosition::new(1, 0)));
}

#[test]
fn test_dispatch_up_commits_in_place_then_moves() {
    let mut t = table_for(people());
    t.select_cell(2, 0);
    dispatch(&mut t, UserAction::TypeChar('k'));
    dispatch(&mut t, UserAction::Navigate {
        nav: Navigation::Up,
        extend: false,
    });
    assert_eq!(t.get_value(2, 0), CellValue::from("k"));
    assert_eq!(t.selection().current(), Some(CellPosition::new(1, 0)));
}

#[test]
fn test_dispatch_paste_while_idle_writes_block() {
    let mut t = table_for(people());
    t.select_cell(1, 0);
    dispatch(&mut t, UserAction::Paste("pat\t19\nquin\t20".to_string()));
    assert_eq!(t.get_value(1, 0), CellValue::from("pat"));
    assert_eq!(t.get_value(2, 1), CellValue::Int(20));
    assert_eq!(t.selection().multi_rows(), &[1, 2]);
    assert_eq!(t.selection().multi_cols(), &[0, 1]);
}
