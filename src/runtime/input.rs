//! Keyboard input mapping
//!
//! Translates winit key events into grid [`UserAction`]s or into viewer
//! commands that need the window, clipboard or file dialogs.
//!
//! Shortcuts use Ctrl (or Cmd on macOS):
//! - C / X / V: copy, cut, paste tab-separated values
//! - O / S / Shift+S: open, save, save as
//! - A: select all (Shift+A autofits columns)
//! - Z: undo, D: fill down, I: toggle index labels
//! - + / -: zoom
//! - Shift+R / Shift+C: add row / add column
//! - Shift+D / Shift+X: delete selected rows / columns
//! - Shift+H / Shift+J / Shift+L: mark column / mark row / clear marks
//! - Alt+Up / Alt+Down: sort current column ascending / descending

use winit::keyboard::{Key, ModifiersState, NamedKey};

use gridview::grid::{EditCommand, Navigation};
use gridview::UserAction;

/// Operations handled by the viewer rather than the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Copy,
    Cut,
    Paste,
    Open,
    Save,
    SaveAs,
    AddColumn,
    MarkColumn,
    MarkRow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Action(UserAction),
    Command(AppCommand),
}

fn action(action: UserAction) -> Option<KeyOutcome> {
    Some(KeyOutcome::Action(action))
}

fn command(command: AppCommand) -> Option<KeyOutcome> {
    Some(KeyOutcome::Command(command))
}

/// Map a key press; `editing` tells whether a cell editor is open
pub fn map_key(key: &Key, mods: ModifiersState, editing: bool) -> Option<KeyOutcome> {
    let primary = mods.control_key() || mods.super_key();
    let shift = mods.shift_key();
    let alt = mods.alt_key();

    match key {
        Key::Named(named) => map_named(*named, primary, shift, alt, editing),
        Key::Character(text) if primary => {
            let ch = text.chars().next()?.to_ascii_lowercase();
            map_shortcut(ch, shift, editing)
        }
        Key::Character(text) if !alt => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => action(UserAction::TypeChar(ch)),
                (Some(_), Some(_)) if editing => {
                    action(UserAction::Edit(EditCommand::InsertText(text.to_string())))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn map_shortcut(ch: char, shift: bool, editing: bool) -> Option<KeyOutcome> {
    match (ch, shift) {
        ('c', false) => command(AppCommand::Copy),
        ('x', false) if !editing => command(AppCommand::Cut),
        ('v', _) => command(AppCommand::Paste),
        ('o', _) => command(AppCommand::Open),
        ('s', false) => command(AppCommand::Save),
        ('s', true) => command(AppCommand::SaveAs),
        ('a', false) => action(UserAction::SelectAll),
        ('a', true) => action(UserAction::AutofitColumns),
        ('z', _) => action(UserAction::Undo),
        ('d', false) => action(UserAction::FillDown),
        ('i', false) => action(UserAction::ToggleIndex),
        ('=' | '+', _) => action(UserAction::ZoomIn),
        ('-', _) => action(UserAction::ZoomOut),
        ('r', true) => action(UserAction::AddRows(1)),
        ('c', true) => command(AppCommand::AddColumn),
        ('d', true) => action(UserAction::DeleteSelectedRows),
        ('x', true) => action(UserAction::DeleteSelectedColumns),
        ('h', true) => command(AppCommand::MarkColumn),
        ('j', true) => command(AppCommand::MarkRow),
        ('l', true) => action(UserAction::ClearColors),
        _ => None,
    }
}

fn navigate(nav: Navigation, extend: bool) -> Option<KeyOutcome> {
    action(UserAction::Navigate { nav, extend })
}

fn map_named(
    key: NamedKey,
    primary: bool,
    shift: bool,
    alt: bool,
    editing: bool,
) -> Option<KeyOutcome> {
    match key {
        NamedKey::ArrowUp if alt => action(UserAction::SortCurrentColumn { ascending: true }),
        NamedKey::ArrowDown if alt => action(UserAction::SortCurrentColumn { ascending: false }),

        // Word movement inside the editor
        NamedKey::ArrowLeft if editing && (primary || alt) => {
            action(UserAction::Edit(EditCommand::WordLeft { select: shift }))
        }
        NamedKey::ArrowRight if editing && (primary || alt) => {
            action(UserAction::Edit(EditCommand::WordRight { select: shift }))
        }
        NamedKey::Backspace if editing && (primary || alt) => {
            action(UserAction::Edit(EditCommand::DeleteWordBackward))
        }

        NamedKey::ArrowUp => navigate(Navigation::Up, shift),
        NamedKey::ArrowDown => navigate(Navigation::Down, shift),
        NamedKey::ArrowLeft => navigate(Navigation::Left, shift),
        NamedKey::ArrowRight => navigate(Navigation::Right, shift),
        NamedKey::Tab if shift => navigate(Navigation::PrevCell, false),
        NamedKey::Tab => navigate(Navigation::NextCell, false),
        NamedKey::Home if primary => navigate(Navigation::FirstCell, shift),
        NamedKey::End if primary => navigate(Navigation::LastCell, shift),
        NamedKey::Home => navigate(Navigation::RowStart, shift),
        NamedKey::End => navigate(Navigation::RowEnd, shift),
        NamedKey::PageUp => navigate(Navigation::PageUp, shift),
        NamedKey::PageDown => navigate(Navigation::PageDown, shift),

        NamedKey::Enter if editing => action(UserAction::CommitEdit),
        NamedKey::Enter | NamedKey::F2 => action(UserAction::BeginEdit),
        NamedKey::Escape if editing => action(UserAction::CancelEdit),
        NamedKey::Backspace if editing => action(UserAction::Edit(EditCommand::Backspace)),
        NamedKey::Delete if editing => action(UserAction::Edit(EditCommand::Delete)),
        NamedKey::Backspace | NamedKey::Delete => action(UserAction::ClearValues),
        NamedKey::Space => action(UserAction::TypeChar(' ')),
        _ => None,
    }
}
