//! User actions and their dispatch onto a [`Table`]
//!
//! Every input the viewer understands is translated into a [`UserAction`]
//! first; [`dispatch`] routes it to the grid and returns the [`Damage`]
//! describing what needs presenting. While a cell editor is open, movement
//! keys are reinterpreted: Left/Right/Home/End edit the text, Up/Down move
//! the drop-down highlight for category cells, and anything else commits the
//! edit before moving.

use crate::damage::Damage;
use crate::data::ColumnType;
use crate::grid::{ClickModifiers, EditCommand, EditMode, Navigation, Table};
use crate::theme::Color;

/// Everything a user can do to the grid
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    // === Selection and movement ===
    /// Arrow keys, Tab, Home/End, paging (with Shift to extend)
    Navigate { nav: Navigation, extend: bool },
    SelectAll,
    /// Wheel or trackpad scroll in pixels
    ScrollBy { dx: f64, dy: f64 },

    // === Editing ===
    /// Enter/F2 on the current cell
    BeginEdit,
    /// Printable character: starts an edit or types into the open one
    TypeChar(char),
    Edit(EditCommand),
    CommitEdit,
    CancelEdit,

    // === Clipboard and bulk values ===
    /// Tab-separated text pasted at the current cell
    Paste(String),
    FillDown,
    ClearValues,

    // === Structure ===
    AddRows(usize),
    DeleteSelectedRows,
    AddColumn { name: String, kind: ColumnType },
    DeleteSelectedColumns,
    MoveColumn { from: usize, to: usize },
    SortCurrentColumn { ascending: bool },
    Undo,

    // === Columns and decoration ===
    /// Fit the selected columns (all columns when none are selected)
    AutofitColumns,
    ResizeColumn { col: usize, width: f64 },
    SetColumnColor { col: usize, color: Option<Color> },
    SetRowColor { row: usize, color: Option<Color> },
    ClearColors,

    // === View ===
    ZoomIn,
    ZoomOut,
    ToggleIndex,
    /// Window resized (size includes the header strips)
    Resize { width: f64, height: f64 },

    // === Pointer (window coordinates) ===
    MouseDown { x: f64, y: f64, modifiers: ClickModifiers },
    MouseDrag { x: f64, y: f64 },
    MouseUp { x: f64, y: f64 },
    DoubleClick { x: f64, y: f64 },
}

/// Apply an action to the table
///
/// Debug builds wrap the dispatch in a span and log selection changes.
#[inline]
pub fn dispatch(table: &mut Table, action: UserAction) -> Damage {
    #[cfg(debug_assertions)]
    {
        dispatch_traced(table, action)
    }
    #[cfg(not(debug_assertions))]
    {
        dispatch_inner(table, action)
    }
}

#[cfg(debug_assertions)]
fn dispatch_traced(table: &mut Table, action: UserAction) -> Damage {
    use crate::tracing::SelectionSnapshot;

    // Pointer motion arrives at frame rate
    let noisy = matches!(action, UserAction::MouseDrag { .. } | UserAction::ScrollBy { .. });
    let name = action_name(&action);
    let _span = (!noisy)
        .then(|| tracing::span!(tracing::Level::DEBUG, "dispatch", action = name).entered());

    let before = SelectionSnapshot::from_selection(table.selection());
    let damage = dispatch_inner(table, action);
    let after = SelectionSnapshot::from_selection(table.selection());
    if let Some(diff) = before.diff(&after) {
        tracing::debug!(target: "selection", %diff, "state changed");
    }
    if !noisy {
        tracing::debug!(damage = ?damage, "dispatched");
    }
    damage
}

#[cfg(debug_assertions)]
fn action_name(action: &UserAction) -> &'static str {
    match action {
        UserAction::Navigate { .. } => "Navigate",
        UserAction::SelectAll => "SelectAll",
        UserAction::ScrollBy { .. } => "ScrollBy",
        UserAction::BeginEdit => "BeginEdit",
        UserAction::TypeChar(_) => "TypeChar",
        UserAction::Edit(_) => "Edit",
        UserAction::CommitEdit => "CommitEdit",
        UserAction::CancelEdit => "CancelEdit",
        UserAction::Paste(_) => "Paste",
        UserAction::FillDown => "FillDown",
        UserAction::ClearValues => "ClearValues",
        UserAction::AddRows(_) => "AddRows",
        UserAction::DeleteSelectedRows => "DeleteSelectedRows",
        UserAction::AddColumn { .. } => "AddColumn",
        UserAction::DeleteSelectedColumns => "DeleteSelectedColumns",
        UserAction::MoveColumn { .. } => "MoveColumn",
        UserAction::SortCurrentColumn { .. } => "SortCurrentColumn",
        UserAction::Undo => "Undo",
        UserAction::AutofitColumns => "AutofitColumns",
        UserAction::ResizeColumn { .. } => "ResizeColumn",
        UserAction::SetColumnColor { .. } => "SetColumnColor",
        UserAction::SetRowColor { .. } => "SetRowColor",
        UserAction::ClearColors => "ClearColors",
        UserAction::ZoomIn => "ZoomIn",
        UserAction::ZoomOut => "ZoomOut",
        UserAction::ToggleIndex => "ToggleIndex",
        UserAction::Resize { .. } => "Resize",
        UserAction::MouseDown { .. } => "MouseDown",
        UserAction::MouseDrag { .. } => "MouseDrag",
        UserAction::MouseUp { .. } => "MouseUp",
        UserAction::DoubleClick { .. } => "DoubleClick",
    }
}

fn dispatch_inner(table: &mut Table, action: UserAction) -> Damage {
    match action {
        UserAction::Navigate { nav, extend } => {
            if table.editor().is_editing() {
                navigate_while_editing(table, nav, extend)
            } else {
                table.navigate(nav, extend)
            }
        }
        UserAction::SelectAll => {
            if table.editor().is_editing() {
                table.edit(EditCommand::SelectAll)
            } else {
                table.select_all()
            }
        }
        UserAction::ScrollBy { dx, dy } => table.scroll_by(dx, dy),

        UserAction::BeginEdit => {
            if table.editor().is_editing() {
                table.commit_edit()
            } else {
                table.begin_edit()
            }
        }
        UserAction::TypeChar(ch) => table.type_char(ch),
        UserAction::Edit(command) => table.edit(command),
        UserAction::CommitEdit => table.commit_edit(),
        UserAction::CancelEdit => table.cancel_edit(),

        UserAction::Paste(text) => {
            if table.editor().is_editing() {
                table.edit(EditCommand::InsertText(text))
            } else {
                table.paste_tsv(&text)
            }
        }
        UserAction::FillDown => table.fill_down(),
        UserAction::ClearValues => {
            if table.editor().is_editing() {
                table.edit(EditCommand::Delete)
            } else {
                table.clear_selection_values()
            }
        }

        UserAction::AddRows(n) => table.add_rows(n),
        UserAction::DeleteSelectedRows => table.delete_selected_rows(),
        UserAction::AddColumn { name, kind } => match table.add_column(&name, kind) {
            Ok(damage) => damage,
            Err(e) => {
                tracing::warn!("Add column refused: {}", e);
                Damage::None
            }
        },
        UserAction::DeleteSelectedColumns => table.delete_selected_columns(),
        UserAction::MoveColumn { from, to } => match table.move_column(from, to) {
            Ok(damage) => damage,
            Err(e) => {
                tracing::warn!("Column move refused: {}", e);
                Damage::None
            }
        },
        UserAction::SortCurrentColumn { ascending } => match table.selection().current() {
            Some(pos) => table.sort_by_column(pos.col, ascending),
            None => Damage::None,
        },
        UserAction::Undo => table.undo(),

        UserAction::AutofitColumns => {
            let cols = table.selection().multi_cols().to_vec();
            table.autofit_columns(&cols)
        }
        UserAction::ResizeColumn { col, width } => table.resize_column(col, width),
        UserAction::SetColumnColor { col, color } => table.set_column_color(col, color),
        UserAction::SetRowColor { row, color } => table.set_row_color(row, color),
        UserAction::ClearColors => table.clear_colors(),

        UserAction::ZoomIn => table.zoom_in(),
        UserAction::ZoomOut => table.zoom_out(),
        UserAction::ToggleIndex => table.toggle_index(),
        UserAction::Resize { width, height } => table.set_size(width, height),

        UserAction::MouseDown { x, y, modifiers } => table.mouse_down(x, y, modifiers),
        UserAction::MouseDrag { x, y } => table.mouse_drag(x, y),
        UserAction::MouseUp { x, y } => table.mouse_up(x, y),
        UserAction::DoubleClick { x, y } => table.double_click(x, y),
    }
}

/// Movement keys while a cell editor is open
fn navigate_while_editing(table: &mut Table, nav: Navigation, extend: bool) -> Damage {
    let choice = table
        .editor()
        .session()
        .is_some_and(|s| matches!(s.mode, EditMode::Choice { .. }));

    let command = match (nav, choice) {
        (Navigation::Up, true) => Some(EditCommand::ChoicePrev),
        (Navigation::Down, true) => Some(EditCommand::ChoiceNext),
        (Navigation::Left, false) => Some(EditCommand::MoveLeft { select: extend }),
        (Navigation::Right, false) => Some(EditCommand::MoveRight { select: extend }),
        (Navigation::RowStart, false) => Some(EditCommand::Home { select: extend }),
        (Navigation::RowEnd, false) => Some(EditCommand::End { select: extend }),
        _ => None,
    };
    if let Some(command) = command {
        return table.edit(command);
    }

    // Down confirms and moves like Enter; other moves confirm in place first
    if nav == Navigation::Down {
        return table.commit_edit();
    }
    let mut damage = table.commit_edit_in_place();
    damage.merge(table.navigate(nav, false));
    damage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::data::{CellValue, Column, DataFrame, TabularModel};
    use crate::grid::CellPosition;
    use crate::theme::Theme;

    fn table() -> Table {
        let df = DataFrame::from_columns(vec![
            Column::from_values(
                "name",
                ColumnType::Text,
                vec!["ada".into(), "bob".into(), "cy".into()],
            ),
            Column::from_values(
                "team",
                ColumnType::Category,
                vec![
                    CellValue::Category("red".into()),
                    CellValue::Category("blue".into()),
                    CellValue::Category("red".into()),
                ],
            ),
        ])
        .unwrap();
        Table::new(df, EngineConfig::default(), Theme::default(), 400.0, 300.0)
    }

    fn nav(nav: Navigation) -> UserAction {
        UserAction::Navigate { nav, extend: false }
    }

    #[test]
    fn test_navigate_moves_current_cell() {
        let mut t = table();
        let damage = dispatch(&mut t, nav(Navigation::Right));
        assert!(damage.includes_selection());
        assert_eq!(t.selection().current(), Some(CellPosition::new(0, 1)));

        dispatch(&mut t, nav(Navigation::NextCell));
        assert_eq!(t.selection().current(), Some(CellPosition::new(1, 0)));
    }

    #[test]
    fn test_left_right_edit_text_while_editing() {
        let mut t = table();
        dispatch(&mut t, UserAction::BeginEdit);
        dispatch(&mut t, nav(Navigation::Left));
        dispatch(&mut t, UserAction::TypeChar('!'));
        dispatch(&mut t, UserAction::CommitEdit);
        assert_eq!(t.get_value(0, 0), CellValue::from("ad!a"));
        assert_eq!(t.selection().current(), Some(CellPosition::new(1, 0)));
    }

    #[test]
    fn test_tab_commits_in_place_then_moves() {
        let mut t = table();
        dispatch(&mut t, UserAction::TypeChar('z'));
        dispatch(&mut t, nav(Navigation::NextCell));
        assert!(!t.editor().is_editing());
        assert_eq!(t.get_value(0, 0), CellValue::from("z"));
        assert_eq!(t.selection().current(), Some(CellPosition::new(0, 1)));
    }

    #[test]
    fn test_up_down_move_choice_highlight() {
        let mut t = table();
        dispatch(&mut t, nav(Navigation::Right));
        dispatch(&mut t, UserAction::BeginEdit);
        dispatch(&mut t, nav(Navigation::Down));
        assert!(t.editor().is_editing());
        dispatch(&mut t, UserAction::CommitEdit);
        assert_eq!(t.get_value(0, 1), CellValue::Category("blue".into()));
    }

    #[test]
    fn test_escape_cancels_edit() {
        let mut t = table();
        dispatch(&mut t, UserAction::TypeChar('q'));
        dispatch(&mut t, UserAction::CancelEdit);
        assert_eq!(t.get_value(0, 0), CellValue::from("ada"));
        assert!(!t.editor().is_editing());
    }

    #[test]
    fn test_add_duplicate_column_is_no_damage() {
        let mut t = table();
        let damage = dispatch(
            &mut t,
            UserAction::AddColumn {
                name: "name".into(),
                kind: ColumnType::Text,
            },
        );
        assert_eq!(damage, Damage::None);
        assert_eq!(t.model().column_count(), 2);
    }

    #[test]
    fn test_sort_current_column_then_undo() {
        let mut t = table();
        dispatch(&mut t, nav(Navigation::Right));
        dispatch(&mut t, UserAction::SortCurrentColumn { ascending: true });
        assert_eq!(t.get_value(0, 0), CellValue::from("bob"));
        assert_eq!(t.column_header().sort_state(), Some((1, true)));

        dispatch(&mut t, UserAction::Undo);
        assert_eq!(t.get_value(0, 0), CellValue::from("ada"));
    }
}
