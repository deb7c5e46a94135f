//! Terminal host for the interpreter using crossterm and ratatui.
//!
//! Run with: cargo run --example tui_crossterm [FILE]
//! Logs go to `vim_interp.log`; set `RUST_LOG=vim=debug` for more detail.

use crossterm::{
    event::{self, Event, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDirection, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use ropey::Rope;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use unicode_segmentation::UnicodeSegmentation;
use vim_interp::{
    Edit, HostError, Key, KeyCode, KeyEvent, Modifiers, MoveUnit, Outcome, Point, PromptChange,
    PromptKind, Region, Registry, SelectionSet, TextBuffer, WindowAction,
};

const WELCOME: &str = "Welcome to vim_interp!\n\n\
Press 'i' to insert, 'Esc' to return to command mode.\n\
Try dd, yy, p, o, cb, de, f<char>, Ctrl+A on 41.\n\
Search with /word and n / N, jump with :3 or :+2.\n\
Save with :w, quit with :q or :q!\n";

/// Rope-backed buffer, optionally tied to a file.
struct RopeBuffer {
    rope: Rope,
    path: Option<PathBuf>,
    saved: String,
    status: HashMap<String, String>,
    top_row: usize,
    height: usize,
    closed: bool,
}

impl RopeBuffer {
    fn open(path: Option<PathBuf>) -> io::Result<Self> {
        let saved = match &path {
            Some(path) if path.exists() => fs::read_to_string(path)?,
            Some(_) => String::new(),
            None => WELCOME.to_owned(),
        };
        Ok(Self {
            rope: Rope::from_str(&saved),
            path,
            saved,
            status: HashMap::new(),
            top_row: 0,
            height: 20,
            closed: false,
        })
    }

    /// Word starts (or ends) as char offsets.
    fn word_bounds(&self, ends: bool) -> Vec<Point> {
        let text = self.rope.to_string();
        let mut out = Vec::new();
        let mut at = 0;
        for segment in text.split_word_bounds() {
            let len = segment.chars().count();
            if !segment.chars().all(char::is_whitespace) {
                out.push(if ends { at + len } else { at });
            }
            at += len;
        }
        out
    }
}

impl TextBuffer for RopeBuffer {
    fn size(&self) -> usize {
        self.rope.len_chars()
    }

    fn substr(&self, region: Region) -> String {
        let end = region.end().min(self.size());
        self.rope.slice(region.begin().min(end)..end).to_string()
    }

    fn line(&self, p: Point) -> Region {
        let full = self.full_line(p);
        let newline = full.end() > full.begin() && self.rope.char(full.end() - 1) == '\n';
        Region::new(full.begin(), full.end() - usize::from(newline))
    }

    fn full_line(&self, p: Point) -> Region {
        let row = self.rope.char_to_line(p.min(self.size()));
        let start = self.rope.line_to_char(row);
        Region::new(start, start + self.rope.line(row).len_chars())
    }

    fn row_col(&self, p: Point) -> (usize, usize) {
        let p = p.min(self.size());
        let row = self.rope.char_to_line(p);
        (row, p - self.rope.line_to_char(row))
    }

    fn text_point(&self, row: usize, col: usize) -> Point {
        let row = row.min(self.rope.len_lines().saturating_sub(1));
        let line = self.line(self.rope.line_to_char(row));
        (line.begin() + col).min(line.end())
    }

    fn visible_region(&self) -> Region {
        let last = self.rope.len_lines().saturating_sub(1);
        let top = self.top_row.min(last);
        let bottom = (top + self.height.saturating_sub(1)).min(last);
        let end = self.line(self.rope.line_to_char(bottom)).end();
        Region::new(self.rope.line_to_char(top), end)
    }

    fn move_by(&self, p: Point, unit: MoveUnit, forward: bool) -> Point {
        let bounds = self.word_bounds(unit == MoveUnit::SubwordEnd);
        if forward {
            bounds.into_iter().find(|q| *q > p).unwrap_or(self.size())
        } else {
            bounds.into_iter().rev().find(|q| *q < p).unwrap_or(0)
        }
    }

    fn is_dirty(&self) -> bool {
        self.rope != self.saved.as_str()
    }

    fn insert(&mut self, p: Point, text: &str) -> usize {
        self.rope.insert(p, text);
        text.chars().count()
    }

    fn erase(&mut self, region: Region) {
        self.rope.remove(region.begin()..region.end());
    }

    // A real host would group undo history here.
    fn begin_edit(&mut self) {}

    fn end_edit(&mut self) {}

    fn set_status(&mut self, key: &str, text: &str) {
        self.status.insert(key.to_owned(), text.to_owned());
    }

    fn show(&mut self, region: Region, center: bool) {
        let (row, _) = self.row_col(region.b);
        if center {
            self.top_row = row.saturating_sub(self.height / 2);
        } else if row < self.top_row {
            self.top_row = row;
        } else if row >= self.top_row + self.height {
            self.top_row = row + 1 - self.height;
        }
    }

    fn run(&mut self, action: WindowAction) -> Result<(), HostError> {
        match action {
            WindowAction::Save => {
                let Some(path) = &self.path else {
                    return Err(HostError::SaveFailed("no file name".to_owned()));
                };
                let text = self.rope.to_string();
                fs::write(path, &text).map_err(|err| HostError::SaveFailed(err.to_string()))?;
                self.saved = text;
            }
            WindowAction::Revert => self.rope = Rope::from_str(&self.saved),
            WindowAction::Close => self.closed = true,
            WindowAction::HidePanels => {}
            other => return Err(HostError::Unsupported(other)),
        }
        Ok(())
    }
}

/// The host's input panel for `:` and `/`.
struct Panel {
    kind: PromptKind,
    content: String,
}

struct App {
    registry: Registry<usize>,
    buffer: RopeBuffer,
    selection: SelectionSet,
    panel: Option<Panel>,
}

impl App {
    const BUFFER_ID: usize = 0;

    fn new(path: Option<PathBuf>) -> io::Result<Self> {
        let mut buffer = RopeBuffer::open(path)?;
        let mut registry = Registry::default();
        registry.attach(Self::BUFFER_ID, &mut buffer);
        Ok(Self {
            registry,
            buffer,
            selection: SelectionSet::default(),
            panel: None,
        })
    }

    fn handle(&mut self, event: CKeyEvent) {
        if self.panel.is_some() {
            self.handle_panel(event);
            return;
        }

        let engine = self.registry.engine(Self::BUFFER_ID);
        let Some(host_event) = convert_crossterm_event(event) else {
            return;
        };
        let outcome = match Key::from_event(host_event) {
            Some(key) => engine.handle(&mut self.buffer, &mut self.selection, key),
            None => Outcome::Unhandled,
        };

        match outcome {
            Outcome::Handled => {}
            Outcome::Prompt(kind) => {
                self.panel = Some(Panel {
                    kind,
                    content: kind.trigger().to_string(),
                });
            }
            Outcome::Unhandled => self.default_action(host_event),
        }
        let visible = self.buffer.visible_region();
        if let Some(first) = self.selection.first() {
            if !visible.contains(first.b) {
                self.buffer.show(first, false);
            }
        }
    }

    /// What the terminal does with keys the interpreter leaves alone.
    fn default_action(&mut self, event: KeyEvent) {
        let mut edit = Edit::begin(&mut self.buffer, &mut self.selection);
        match event.code {
            KeyCode::Char(c) if !event.mods.contains(Modifiers::CTRL) => {
                edit.insert_text(&c.to_string());
            }
            KeyCode::Enter => {
                edit.insert_text("\n");
            }
            _ => {}
        }
    }

    fn handle_panel(&mut self, event: CKeyEvent) {
        let engine = self.registry.engine(Self::BUFFER_ID);
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        match event.code {
            CKeyCode::Enter => {
                let content = std::mem::take(&mut panel.content);
                self.panel = None;
                engine.prompt_done(&mut self.buffer, &mut self.selection, &content);
            }
            CKeyCode::Esc => {
                self.panel = None;
                engine.prompt_cancel();
            }
            CKeyCode::Backspace => {
                panel.content.pop();
                if engine.prompt_changed(&panel.content) == PromptChange::Dismiss {
                    self.panel = None;
                }
            }
            CKeyCode::Char(c) => {
                panel.content.push(c);
                engine.prompt_changed(&panel.content);
            }
            _ => {}
        }
    }

    fn status_line(&self) -> String {
        match &self.panel {
            Some(panel) => format!("{}: {}", panel.kind.caption(), panel.content),
            None => self.buffer.status.get("vim").cloned().unwrap_or_default(),
        }
    }
}

fn convert_crossterm_event(event: CKeyEvent) -> Option<KeyEvent> {
    let mut mods = Modifiers::empty();
    if event.modifiers.contains(KeyModifiers::SHIFT) {
        mods |= Modifiers::SHIFT;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        mods |= Modifiers::CTRL;
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        mods |= Modifiers::ALT;
    }
    let code = match event.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Right => KeyCode::Right,
        _ => return None,
    };
    Some(KeyEvent::new(code, mods))
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(f.size());
    let text_area = chunks[0];
    app.buffer.height = usize::from(text_area.height.saturating_sub(2)).max(1);

    let buffer = &app.buffer;
    let last_row = buffer.rope.len_lines();
    let rows = buffer.top_row..(buffer.top_row + buffer.height).min(last_row);
    let mut lines = Vec::new();
    for row in rows {
        let start = buffer.rope.line_to_char(row);
        let line = buffer.line(start);
        let spans: Vec<Span> = (line.begin()..line.end())
            .map(|p| {
                let selected = app
                    .selection
                    .iter()
                    .any(|r| !r.is_empty() && r.begin() <= p && p < r.end());
                let style = if selected {
                    Style::default().bg(Color::Blue)
                } else {
                    Style::default()
                };
                Span::styled(buffer.rope.char(p).to_string(), style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let title = match &buffer.path {
        Some(path) => path.display().to_string(),
        None => "vim_interp demo".to_owned(),
    };
    let text = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(text, text_area);

    let status = Paragraph::new(app.status_line())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);

    if let Some(first) = app.selection.first() {
        let (row, col) = buffer.row_col(first.b);
        if row >= buffer.top_row {
            let col = u16::try_from(col).unwrap_or(u16::MAX);
            let row = u16::try_from(row - buffer.top_row).unwrap_or(u16::MAX);
            f.set_cursor(
                text_area.x.saturating_add(1).saturating_add(col),
                text_area.y.saturating_add(1).saturating_add(row),
            );
        }
    }
}

fn init_logging() -> io::Result<()> {
    let file = fs::File::create("vim_interp.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> io::Result<()> {
    init_logging()?;
    let mut app = App::new(std::env::args_os().nth(1).map(PathBuf::from))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == CKeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            app.handle(key);

            if app.buffer.closed {
                break;
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
