//! In-place cell editing
//!
//! State machine: `Idle → Editing → (Committed | Cancelled | Rejected) → Idle`.
//! Free-text columns edit through an [`EditBuffer`]; category columns use a
//! fixed choice list where picking an entry commits immediately.

use super::CellPosition;
use crate::config::EngineConfig;
use crate::data::{ColumnType, TabularModel};

/// Single-line text buffer with a character cursor and optional selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    chars: Vec<char>,
    cursor: usize,
    /// Selection anchor; the selection spans anchor..cursor
    anchor: Option<usize>,
}

impl EditBuffer {
    pub fn from_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self {
            chars,
            cursor,
            anchor: None,
        }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Selected character range, if any
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        (anchor != self.cursor).then(|| (anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    pub fn selected_text(&self) -> String {
        self.selection()
            .map(|(a, b)| self.chars[a..b].iter().collect())
            .unwrap_or_default()
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.cursor = self.chars.len();
    }

    fn delete_selection(&mut self) -> bool {
        let Some((a, b)) = self.selection() else {
            self.anchor = None;
            return false;
        };
        self.chars.drain(a..b);
        self.cursor = a;
        self.anchor = None;
        true
    }

    pub fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    /// Insert text at cursor (for paste); line breaks are dropped
    pub fn insert_text(&mut self, text: &str) {
        self.delete_selection();
        for ch in text.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.chars.insert(self.cursor, ch);
            self.cursor += 1;
        }
    }

    /// Delete character before cursor (backspace)
    pub fn delete_backward(&mut self) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
    }

    /// Delete character at cursor (delete)
    pub fn delete_forward(&mut self) {
        if self.delete_selection() || self.cursor >= self.chars.len() {
            return;
        }
        self.chars.remove(self.cursor);
    }

    /// Delete word before cursor
    pub fn delete_word_backward(&mut self) {
        if self.delete_selection() {
            return;
        }
        let start = self.word_left_of(self.cursor);
        self.chars.drain(start..self.cursor);
        self.cursor = start;
    }

    fn place(&mut self, pos: usize, select: bool) {
        if select {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = pos.min(self.chars.len());
    }

    pub fn move_left(&mut self, select: bool) {
        let pos = match self.selection() {
            Some((a, _)) if !select => a,
            _ => self.cursor.saturating_sub(1),
        };
        self.place(pos, select);
    }

    pub fn move_right(&mut self, select: bool) {
        let pos = match self.selection() {
            Some((_, b)) if !select => b,
            _ => self.cursor + 1,
        };
        self.place(pos, select);
    }

    pub fn move_home(&mut self, select: bool) {
        self.place(0, select);
    }

    pub fn move_end(&mut self, select: bool) {
        self.place(self.chars.len(), select);
    }

    pub fn move_word_left(&mut self, select: bool) {
        self.place(self.word_left_of(self.cursor), select);
    }

    pub fn move_word_right(&mut self, select: bool) {
        let mut pos = self.cursor;
        let len = self.chars.len();
        while pos < len && !self.chars[pos].is_whitespace() {
            pos += 1;
        }
        while pos < len && self.chars[pos].is_whitespace() {
            pos += 1;
        }
        self.place(pos, select);
    }

    fn word_left_of(&self, mut pos: usize) -> usize {
        while pos > 0 && self.chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !self.chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        pos
    }
}

/// How the open editor takes input
#[derive(Debug, Clone, PartialEq)]
pub enum EditMode {
    Text(EditBuffer),
    Choice {
        options: Vec<String>,
        highlighted: usize,
    },
}

/// An open edit of one cell
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub position: CellPosition,
    pub kind: ColumnType,
    /// Value shown when editing began
    pub original: String,
    pub mode: EditMode,
}

impl EditSession {
    /// Text the commit would parse
    pub fn pending_text(&self) -> String {
        match &self.mode {
            EditMode::Text(buffer) => buffer.text(),
            EditMode::Choice {
                options,
                highlighted,
            } => options.get(*highlighted).cloned().unwrap_or_default(),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.pending_text() != self.original
    }
}

/// Result of leaving the editing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Value written back to the model
    Committed(CellPosition),
    /// Value could not be coerced; the cell keeps its old value
    Rejected(CellPosition),
    /// Editor closed without writing
    Cancelled(CellPosition),
    /// Nothing was being edited
    Idle,
}

#[derive(Debug, Clone, Default, PartialEq)]
enum EditorState {
    #[default]
    Idle,
    Editing(EditSession),
}

/// Overlay editor for a single cell
#[derive(Debug, Clone, Default)]
pub struct CellEditor {
    state: EditorState,
    choice_limit: usize,
}

impl CellEditor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: EditorState::Idle,
            choice_limit: config.category_choice_limit.max(1),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditorState::Editing(_))
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            EditorState::Editing(session) => Some(session),
            EditorState::Idle => None,
        }
    }

    /// Open the editor on a cell with its current value.
    ///
    /// Empty and NaN values start as an empty string. Returns false when the
    /// position is outside the model.
    pub fn begin(&mut self, model: &dyn TabularModel, row: usize, col: usize) -> bool {
        if row >= model.row_count() || col >= model.column_count() {
            return false;
        }
        let Some(kind) = model.column_type(col) else {
            return false;
        };
        let original = model.get_value(row, col).to_plain_string();

        let mode = if kind.is_free_text() {
            EditMode::Text(EditBuffer::from_text(&original))
        } else {
            let options: Vec<String> = model
                .category_values(col)
                .into_iter()
                .take(self.choice_limit)
                .collect();
            let highlighted = options.iter().position(|o| *o == original).unwrap_or(0);
            EditMode::Choice {
                options,
                highlighted,
            }
        };

        tracing::debug!("Editing ({}, {}) as {}", row, col, kind.label());
        self.state = EditorState::Editing(EditSession {
            position: CellPosition::new(row, col),
            kind,
            original,
            mode,
        });
        true
    }

    /// Open the editor replacing the cell content with a typed character.
    ///
    /// Category columns jump to the first choice starting with `ch` instead.
    pub fn begin_with_char(
        &mut self,
        model: &dyn TabularModel,
        row: usize,
        col: usize,
        ch: char,
    ) -> bool {
        if !self.begin(model, row, col) {
            return false;
        }
        if let EditorState::Editing(session) = &mut self.state {
            match &mut session.mode {
                EditMode::Text(buffer) => *buffer = EditBuffer::from_text(&ch.to_string()),
                EditMode::Choice {
                    options,
                    highlighted,
                } => {
                    let lower = ch.to_lowercase().to_string();
                    if let Some(i) = options
                        .iter()
                        .position(|o| o.to_lowercase().starts_with(&lower))
                    {
                        *highlighted = i;
                    }
                }
            }
        }
        true
    }

    /// Text buffer of a free-text edit
    pub fn buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        match &mut self.state {
            EditorState::Editing(EditSession {
                mode: EditMode::Text(buffer),
                ..
            }) => Some(buffer),
            _ => None,
        }
    }

    /// Move the highlighted choice by `delta`, clamped to the list
    pub fn move_choice(&mut self, delta: isize) -> bool {
        match &mut self.state {
            EditorState::Editing(EditSession {
                mode:
                    EditMode::Choice {
                        options,
                        highlighted,
                    },
                ..
            }) if !options.is_empty() => {
                let last = options.len() as isize - 1;
                *highlighted = (*highlighted as isize + delta).clamp(0, last) as usize;
                true
            }
            _ => false,
        }
    }

    /// Pick a choice; commits immediately
    pub fn choose(&mut self, index: usize, model: &mut dyn TabularModel) -> EditOutcome {
        match &mut self.state {
            EditorState::Editing(EditSession {
                mode:
                    EditMode::Choice {
                        options,
                        highlighted,
                    },
                ..
            }) if index < options.len() => {
                *highlighted = index;
            }
            _ => return EditOutcome::Idle,
        }
        self.commit(model)
    }

    /// Parse the pending text by column type and write it back.
    ///
    /// Coercion failures reject the edit silently; the editor is closed in
    /// every case.
    pub fn commit(&mut self, model: &mut dyn TabularModel) -> EditOutcome {
        let EditorState::Editing(session) = std::mem::take(&mut self.state) else {
            return EditOutcome::Idle;
        };
        let pos = session.position;
        let text = session.pending_text();

        let Some(value) = session.kind.parse(&text) else {
            tracing::debug!(
                "Rejected '{}' for {} cell ({}, {})",
                text,
                session.kind.label(),
                pos.row,
                pos.col
            );
            return EditOutcome::Rejected(pos);
        };

        match model.set_value(value, pos.row, pos.col) {
            Ok(()) => {
                tracing::debug!("Committed edit at ({}, {})", pos.row, pos.col);
                EditOutcome::Committed(pos)
            }
            Err(e) => {
                tracing::debug!("Edit rejected by model: {}", e);
                EditOutcome::Rejected(pos)
            }
        }
    }

    /// Close the editor without writing
    pub fn cancel(&mut self) -> EditOutcome {
        match std::mem::take(&mut self.state) {
            EditorState::Editing(session) => {
                tracing::debug!(
                    "Cancelled edit at ({}, {})",
                    session.position.row,
                    session.position.col
                );
                EditOutcome::Cancelled(session.position)
            }
            EditorState::Idle => EditOutcome::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CellValue, Column, DataFrame};

    fn frame() -> DataFrame {
        DataFrame::from_columns(vec![
            Column::from_values("name", ColumnType::Text, vec!["ann".into()]),
            Column::from_values("n", ColumnType::Integer, vec![CellValue::Int(5)]),
            Column::from_values("x", ColumnType::Float, vec![CellValue::Float(f64::NAN)]),
            Column::from_values("kind", ColumnType::Category, vec!["b".into()]),
        ])
        .unwrap()
    }

    fn editor() -> CellEditor {
        CellEditor::new(&EngineConfig::default())
    }

    #[test]
    fn test_buffer_editing() {
        let mut buffer = EditBuffer::from_text("ab");
        assert_eq!(buffer.cursor(), 2);
        buffer.move_home(false);
        buffer.move_right(false);
        buffer.insert_char('X');
        assert_eq!(buffer.text(), "aXb");
        assert_eq!(buffer.cursor(), 2);

        buffer.delete_backward();
        buffer.delete_forward();
        assert_eq!(buffer.text(), "a");
    }

    #[test]
    fn test_buffer_words_and_selection() {
        let mut buffer = EditBuffer::from_text("hello big world");
        buffer.move_home(false);
        buffer.move_word_right(false);
        assert_eq!(buffer.cursor(), 6);
        buffer.move_word_right(true);
        assert_eq!(buffer.selected_text(), "big ");

        buffer.insert_char('-');
        assert_eq!(buffer.text(), "hello -world");

        buffer.move_end(false);
        buffer.delete_word_backward();
        assert_eq!(buffer.text(), "hello ");

        buffer.select_all();
        buffer.insert_text("new\ntext");
        assert_eq!(buffer.text(), "newtext");
    }

    #[test]
    fn test_commit_coerces_to_column_type() {
        let mut df = frame();
        let mut editor = editor();

        assert!(editor.begin(&df, 0, 1));
        assert_eq!(editor.session().unwrap().original, "5");
        let buffer = editor.buffer_mut().unwrap();
        buffer.select_all();
        buffer.insert_text("42");

        assert_eq!(
            editor.commit(&mut df),
            EditOutcome::Committed(CellPosition::new(0, 1))
        );
        assert_eq!(df.get_value(0, 1), CellValue::Int(42));
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_commit_rejects_bad_number() {
        let mut df = frame();
        let mut editor = editor();

        editor.begin_with_char(&df, 0, 1, 'x');
        assert_eq!(editor.session().unwrap().pending_text(), "x");
        assert_eq!(
            editor.commit(&mut df),
            EditOutcome::Rejected(CellPosition::new(0, 1))
        );
        assert_eq!(df.get_value(0, 1), CellValue::Int(5));
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_nan_starts_empty() {
        let df = frame();
        let mut editor = editor();
        editor.begin(&df, 0, 2);
        assert_eq!(editor.session().unwrap().pending_text(), "");
    }

    #[test]
    fn test_cancel_leaves_value() {
        let df = frame();
        let mut editor = editor();
        editor.begin_with_char(&df, 0, 0, 'z');
        assert_eq!(
            editor.cancel(),
            EditOutcome::Cancelled(CellPosition::new(0, 0))
        );
        assert_eq!(df.get_value(0, 0), CellValue::from("ann"));
        assert_eq!(editor.cancel(), EditOutcome::Idle);
    }

    #[test]
    fn test_category_choice_commits_immediately() {
        let mut df = frame();
        df.add_rows(1);
        df.set_value(CellValue::from("a"), 1, 3).unwrap();

        let mut editor = editor();
        editor.begin(&df, 0, 3);
        match &editor.session().unwrap().mode {
            EditMode::Choice {
                options,
                highlighted,
            } => {
                assert_eq!(options, &vec!["b".to_string(), "a".to_string()]);
                assert_eq!(*highlighted, 0);
            }
            other => panic!("expected choice mode, got {:?}", other),
        }

        assert_eq!(
            editor.choose(1, &mut df),
            EditOutcome::Committed(CellPosition::new(0, 3))
        );
        assert_eq!(df.get_value(0, 3), CellValue::Category("a".to_string()));
    }

    #[test]
    fn test_begin_out_of_range() {
        let df = frame();
        let mut editor = editor();
        assert!(!editor.begin(&df, 5, 0));
        assert!(!editor.is_editing());
    }
}
