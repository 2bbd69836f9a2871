use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::Result;
use softbuffer::Context;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

use gridview::data::{csv, ColumnType, DataFrame, TabularModel};
use gridview::grid::{ClickModifiers, Table};
use gridview::theme::{Color, Theme};
use gridview::{dispatch, Damage, EngineConfig, UserAction};

use super::input::{map_key, AppCommand, KeyOutcome};
use super::mouse::{cursor_icon, wheel_delta, ClickTracker};
use crate::view::{load_font, Painter};

/// Palette cycled by the mark-column/mark-row shortcuts
const MARK_COLORS: &[Color] = &[
    Color::rgba(0xE5, 0xC0, 0x7B, 0x40),
    Color::rgba(0x61, 0xAF, 0xEF, 0x40),
    Color::rgba(0x98, 0xC3, 0x79, 0x40),
    Color::rgba(0xE0, 0x6C, 0x75, 0x40),
];

/// How often pending dialog results are polled
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Results of work done off the event loop
#[derive(Debug)]
enum AppEvent {
    OpenDialogResult(Option<PathBuf>),
    SaveDialogResult(Option<PathBuf>),
}

pub struct App {
    table: Table,
    /// File the dataset was loaded from or last saved to
    path: Option<PathBuf>,
    painter: Option<Painter>,
    window: Option<Rc<Window>>,
    /// Keeps the softbuffer context alive for the painter
    _context: Option<Context<Rc<Window>>>,
    clipboard: Option<arboard::Clipboard>,
    modifiers: ModifiersState,
    /// Pointer position in logical pixels
    cursor: (f64, f64),
    left_mouse_down: bool,
    clicks: ClickTracker,
    marks_used: usize,
    event_tx: Sender<AppEvent>,
    event_rx: Receiver<AppEvent>,
}

impl App {
    pub fn new(model: DataFrame, path: Option<PathBuf>, config: EngineConfig, theme: Theme) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        let clipboard = arboard::Clipboard::new()
            .map_err(|e| tracing::warn!("Clipboard unavailable: {}", e))
            .ok();
        Self {
            table: Table::new(model, config, theme, 1024.0, 720.0),
            path,
            painter: None,
            window: None,
            _context: None,
            clipboard,
            modifiers: ModifiersState::empty(),
            cursor: (0.0, 0.0),
            left_mouse_down: false,
            clicks: ClickTracker::default(),
            marks_used: 0,
            event_tx,
            event_rx,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.title())
            .with_inner_size(LogicalSize::new(1024.0, 720.0));
        let window = Rc::new(event_loop.create_window(attributes)?);
        let context = Context::new(Rc::clone(&window))
            .map_err(|e| anyhow::anyhow!("Failed to create graphics context: {}", e))?;
        let font = load_font(self.table.config().font_path.as_deref())?;
        let painter = Painter::new(Rc::clone(&window), &context, font)?;

        let (width, height) = painter.logical_size();
        self.table.set_size(width, height);
        self.painter = Some(painter);
        self.window = Some(window);
        self._context = Some(context);
        Ok(())
    }

    fn title(&self) -> String {
        let name = self
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        format!("{} - gridview - {}", name, self.table.status())
    }

    fn run(&mut self, action: UserAction) -> Damage {
        dispatch(&mut self.table, action)
    }

    fn handle_event(&mut self, event: &WindowEvent) -> Damage {
        match event {
            WindowEvent::Resized(size) => {
                let Some(painter) = &mut self.painter else {
                    return Damage::None;
                };
                if let Err(e) = painter.resize(size.width, size.height) {
                    tracing::error!("{}", e);
                }
                let (width, height) = painter.logical_size();
                if width <= 0.0 || height <= 0.0 {
                    return Damage::None;
                }
                self.run(UserAction::Resize { width, height })
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(painter) = &mut self.painter {
                    painter.set_scale_factor(*scale_factor);
                }
                Damage::Full
            }
            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
                Damage::None
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return Damage::None;
                }
                let editing = self.table.editor().is_editing();
                match map_key(&event.logical_key, self.modifiers, editing) {
                    Some(KeyOutcome::Action(action)) => self.run(action),
                    Some(KeyOutcome::Command(command)) => self.run_command(command),
                    None => Damage::None,
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.scale_factor();
                self.cursor = (position.x / scale, position.y / scale);
                let (x, y) = self.cursor;
                if self.left_mouse_down {
                    return self.run(UserAction::MouseDrag { x, y });
                }
                if let Some(window) = &self.window {
                    window.set_cursor(cursor_icon(self.table.hover(x, y)));
                }
                Damage::None
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.cursor;
                match state {
                    ElementState::Pressed => {
                        self.left_mouse_down = true;
                        if self.clicks.track_click(x, y) == 2 {
                            return self.run(UserAction::DoubleClick { x, y });
                        }
                        let modifiers = ClickModifiers {
                            shift: self.modifiers.shift_key(),
                            ctrl: self.modifiers.control_key() || self.modifiers.super_key(),
                        };
                        self.run(UserAction::MouseDown { x, y, modifiers })
                    }
                    ElementState::Released => {
                        self.left_mouse_down = false;
                        self.run(UserAction::MouseUp { x, y })
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (mut dx, mut dy) = wheel_delta(delta, self.scale_factor());
                // Shift turns vertical wheels into horizontal scrolling
                if self.modifiers.shift_key() && dx == 0.0 {
                    std::mem::swap(&mut dx, &mut dy);
                }
                self.run(UserAction::ScrollBy { dx, dy })
            }
            WindowEvent::DroppedFile(path) => self.open(path.clone()),
            _ => Damage::None,
        }
    }

    fn scale_factor(&self) -> f64 {
        self.painter.as_ref().map_or(1.0, Painter::scale_factor)
    }

    fn run_command(&mut self, command: AppCommand) -> Damage {
        match command {
            AppCommand::Copy | AppCommand::Cut => {
                let text = if let Some(session) = self.table.editor().session() {
                    session.pending_text()
                } else {
                    self.table.copy_selection_tsv()
                };
                if let Some(clipboard) = &mut self.clipboard {
                    if let Err(e) = clipboard.set_text(text) {
                        tracing::warn!("Copy failed: {}", e);
                        return Damage::None;
                    }
                }
                if command == AppCommand::Cut {
                    self.run(UserAction::ClearValues)
                } else {
                    Damage::None
                }
            }
            AppCommand::Paste => {
                let text = match self.clipboard.as_mut().map(|c| c.get_text()) {
                    Some(Ok(text)) => text,
                    Some(Err(e)) => {
                        tracing::warn!("Paste failed: {}", e);
                        return Damage::None;
                    }
                    None => return Damage::None,
                };
                self.run(UserAction::Paste(text))
            }
            AppCommand::Open => {
                let tx = self.event_tx.clone();
                let start_dir = self.path.as_ref().and_then(|p| p.parent()).map(PathBuf::from);
                std::thread::spawn(move || {
                    let mut dlg = rfd::FileDialog::new()
                        .add_filter("Delimited text", &["csv", "tsv", "tab", "psv", "txt"]);
                    if let Some(dir) = start_dir {
                        dlg = dlg.set_directory(dir);
                    }
                    let _ = tx.send(AppEvent::OpenDialogResult(dlg.pick_file()));
                });
                Damage::None
            }
            AppCommand::Save => match self.path.clone() {
                Some(path) => {
                    self.save(&path);
                    Damage::None
                }
                None => self.run_command(AppCommand::SaveAs),
            },
            AppCommand::SaveAs => {
                let tx = self.event_tx.clone();
                let suggested = self.path.clone();
                std::thread::spawn(move || {
                    let mut dlg = rfd::FileDialog::new();
                    if let Some(ref path) = suggested {
                        if let Some(dir) = path.parent() {
                            dlg = dlg.set_directory(dir);
                        }
                        if let Some(name) = path.file_name() {
                            dlg = dlg.set_file_name(name.to_string_lossy());
                        }
                    }
                    let _ = tx.send(AppEvent::SaveDialogResult(dlg.save_file()));
                });
                Damage::None
            }
            AppCommand::AddColumn => {
                let name = unused_column_name(self.table.model());
                self.run(UserAction::AddColumn {
                    name,
                    kind: ColumnType::Text,
                })
            }
            AppCommand::MarkColumn | AppCommand::MarkRow => {
                let Some(current) = self.table.selection().current() else {
                    return Damage::None;
                };
                let color = MARK_COLORS[self.marks_used % MARK_COLORS.len()];
                self.marks_used += 1;
                if command == AppCommand::MarkColumn {
                    self.run(UserAction::SetColumnColor {
                        col: current.col,
                        color: Some(color),
                    })
                } else {
                    self.run(UserAction::SetRowColor {
                        row: current.row,
                        color: Some(color),
                    })
                }
            }
        }
    }

    fn open(&mut self, path: PathBuf) -> Damage {
        match csv::load_file(&path) {
            Ok(model) => {
                self.path = Some(path);
                self.table.replace_dataset(model)
            }
            Err(e) => {
                tracing::error!("Failed to open {}: {}", path.display(), e);
                Damage::None
            }
        }
    }

    fn save(&mut self, path: &Path) {
        match csv::save_file(&self.table.snapshot(), path) {
            Ok(()) => self.path = Some(path.to_path_buf()),
            Err(e) => tracing::error!("Failed to save {}: {}", path.display(), e),
        }
    }

    fn process_async_events(&mut self) -> Damage {
        let mut damage = Damage::None;
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::OpenDialogResult(Some(path)) => damage.merge(self.open(path)),
                AppEvent::SaveDialogResult(Some(path)) => self.save(&path),
                AppEvent::OpenDialogResult(None) | AppEvent::SaveDialogResult(None) => {}
            }
        }
        damage
    }

    fn render(&mut self) {
        let Some(painter) = &mut self.painter else {
            return;
        };
        if let Err(e) = painter.render(&self.table) {
            tracing::error!("Render failed: {}", e);
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.set_title(&self.title());
            window.request_redraw();
        }
    }
}

/// First of `column1`, `column2`, ... not already in the model
fn unused_column_name(model: &DataFrame) -> String {
    (model.column_count() + 1..)
        .map(|n| format!("column{}", n))
        .find(|name| model.column_index(name).is_none())
        .unwrap_or_default()
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                tracing::error!("Failed to open window: {:#}", e);
                eprintln!("gridview: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = &self.window else {
            return;
        };
        if window.id() != window_id {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.render(),
            event => {
                if self.handle_event(&event).needs_redraw() {
                    self.request_redraw();
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
        if self.process_async_events().needs_redraw() {
            self.request_redraw();
        }
    }
}
