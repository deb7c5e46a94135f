use std::fmt;

use tracing::{debug, trace, warn};

use crate::colon;
use crate::edit::Edit;
use crate::key::Key;
use crate::operator::{self, Resolution};
use crate::register::Register;
use crate::search::{self, SearchDirection};
use crate::selection::SelectionSet;
use crate::traits::{Clipboard, TextBuffer, WindowAction};
use crate::types::{Direction, Mode, MoveUnit, Operator, Point, Region};

/// Result of delivering one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The key was consumed.
    Handled,
    /// The host should apply its default behaviour (insert the character).
    Unhandled,
    /// The host should open an input panel pre-filled with the trigger and
    /// report back through the `prompt_*` callbacks.
    Prompt(PromptKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// `:` line jumps and file actions.
    Colon,
    /// `/` forward search.
    Search,
}

impl PromptKind {
    pub fn trigger(&self) -> char {
        match self {
            PromptKind::Colon => ':',
            PromptKind::Search => '/',
        }
    }

    /// Caption for the host's input panel.
    pub fn caption(&self) -> &'static str {
        match self {
            PromptKind::Colon => "Line",
            PromptKind::Search => "Search",
        }
    }
}

/// What the host should do with its panel after a live edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChange {
    Keep,
    /// The trigger character was deleted; hide the panel.
    Dismiss,
}

/// Single-key commands available in Command mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKey {
    Enter(Mode),
    Append,
    AppendLineEnd,
    OpenLine { below: bool },
    Move(Direction),
    MoveBy(MoveUnit, bool),
    DeleteChar,
    DeleteToLineEnd,
    YankLine,
    Paste { after: bool },
    LineStart,
    LineEnd,
    RepeatSearch(SearchDirection),
    Pending(Operator),
    Undo,
    Count,
}

impl CommandKey {
    fn lookup(c: char) -> Option<Self> {
        let command = match c {
            'i' => CommandKey::Enter(Mode::Insert),
            'r' => CommandKey::Enter(Mode::Replace),
            'v' => CommandKey::Enter(Mode::Visual),
            'V' => CommandKey::Enter(Mode::VisualLine),
            'a' => CommandKey::Append,
            'A' => CommandKey::AppendLineEnd,
            'o' => CommandKey::OpenLine { below: true },
            'O' => CommandKey::OpenLine { below: false },
            'h' => CommandKey::Move(Direction::Left),
            'j' => CommandKey::Move(Direction::Down),
            'k' => CommandKey::Move(Direction::Up),
            'l' => CommandKey::Move(Direction::Right),
            'w' => CommandKey::MoveBy(MoveUnit::Subword, true),
            'b' => CommandKey::MoveBy(MoveUnit::Subword, false),
            'e' => CommandKey::MoveBy(MoveUnit::SubwordEnd, true),
            'x' => CommandKey::DeleteChar,
            'D' => CommandKey::DeleteToLineEnd,
            'Y' => CommandKey::YankLine,
            'p' => CommandKey::Paste { after: true },
            'P' => CommandKey::Paste { after: false },
            '0' => CommandKey::LineStart,
            '$' => CommandKey::LineEnd,
            'n' => CommandKey::RepeatSearch(SearchDirection::Forward),
            'N' => CommandKey::RepeatSearch(SearchDirection::Backward),
            'u' => CommandKey::Undo,
            '1'..='9' => CommandKey::Count,
            c => CommandKey::Pending(Operator::from_char(c)?),
        };
        Some(command)
    }
}

/// Settings for a new engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Key under which the mode is written to the host status bar.
    pub status_key: String,
    pub initial_mode: Mode,
    /// Plain typing: no modes, no status, keys insert themselves.
    pub insert_only: bool,
    /// Copy the register to the system clipboard after each yank
    /// (needs the `clipboard` feature).
    pub mirror_clipboard: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            status_key: "vim".to_owned(),
            initial_mode: Mode::Command,
            insert_only: false,
            mirror_clipboard: false,
        }
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    clipboard: Option<Box<dyn Clipboard + Send>>,
}

impl EngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.initial_mode = mode;
        self
    }

    pub fn status_key(mut self, key: impl Into<String>) -> Self {
        self.config.status_key = key.into();
        self
    }

    pub fn insert_only(mut self, insert_only: bool) -> Self {
        self.config.insert_only = insert_only;
        self
    }

    /// Mirror the register into `clipboard` after every yank.
    pub fn clipboard(mut self, clipboard: Box<dyn Clipboard + Send>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn build(self) -> Engine {
        let mode = if self.config.insert_only {
            Mode::Insert
        } else {
            self.config.initial_mode
        };
        let clipboard = match self.clipboard {
            Some(clipboard) => Some(clipboard),
            None if self.config.mirror_clipboard => system_clipboard(),
            None => None,
        };
        Engine {
            config: self.config,
            mode,
            pending: None,
            register: Register::new(),
            last_search: String::new(),
            prompt: None,
            clipboard,
        }
    }
}

#[cfg(feature = "clipboard")]
fn system_clipboard() -> Option<Box<dyn Clipboard + Send>> {
    match crate::traits::SystemClipboard::new() {
        Ok(clipboard) => Some(Box::new(clipboard)),
        Err(err) => {
            warn!(target: "vim.register", %err, "system_clipboard_unavailable");
            None
        }
    }
}

#[cfg(not(feature = "clipboard"))]
fn system_clipboard() -> Option<Box<dyn Clipboard + Send>> {
    warn!(target: "vim.register", "clipboard_feature_disabled");
    None
}

/// Interpreter state for one buffer.
pub struct Engine {
    config: EngineConfig,
    mode: Mode,
    pending: Option<Operator>,
    register: Register,
    last_search: String,
    prompt: Option<PromptKind>,
    clipboard: Option<Box<dyn Clipboard + Send>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("mode", &self.mode)
            .field("pending", &self.pending)
            .field("register", &self.register)
            .field("last_search", &self.last_search)
            .field("prompt", &self.prompt)
            .field("clipboard", &self.clipboard.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub mode: Mode,
    pub pending: Option<Operator>,
    pub register: Vec<String>,
    pub last_search: String,
    pub prompt: Option<PromptKind>,
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::default().build()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine for buffers that never got attached: keys just type.
    pub fn insert_only() -> Self {
        EngineBuilder::default().insert_only(true).build()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pending(&self) -> Option<Operator> {
        self.pending
    }

    pub fn register(&self) -> &Register {
        &self.register
    }

    pub fn last_search(&self) -> &str {
        &self.last_search
    }

    pub fn is_insert_only(&self) -> bool {
        self.config.insert_only
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            mode: self.mode,
            pending: self.pending,
            register: self.register.lines().to_vec(),
            last_search: self.last_search.clone(),
            prompt: self.prompt,
        }
    }

    /// Show the current mode in the host status bar.
    pub fn announce<B: TextBuffer + ?Sized>(&self, buffer: &mut B) {
        if !self.config.insert_only {
            buffer.set_status(&self.config.status_key, &self.mode.status_text());
        }
    }

    /// Deliver one key. Every buffer change it causes is one undo group.
    pub fn handle<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        selection: &mut SelectionSet,
        key: Key,
    ) -> Outcome {
        trace!(target: "vim.engine", mode = %self.mode, pending = ?self.pending, ?key, "key");
        let mut edit = Edit::begin(buffer, selection);
        match key {
            Key::Char(c) => {
                self.key_char(&mut edit, c);
                Outcome::Handled
            }
            Key::Arrow(direction) => {
                move_cursors(&mut edit, direction);
                Outcome::Handled
            }
            Key::Escape => {
                self.key_escape(&mut edit);
                Outcome::Handled
            }
            Key::Colon => self.key_prompt(&mut edit, PromptKind::Colon),
            Key::Slash => self.key_prompt(&mut edit, PromptKind::Search),
            Key::Increment => {
                self.key_adjust(&mut edit, 1);
                Outcome::Handled
            }
            Key::Decrement => {
                self.key_adjust(&mut edit, -1);
                Outcome::Handled
            }
        }
    }

    /// The host's input panel was submitted with `content`, trigger included.
    pub fn prompt_done<B: TextBuffer + ?Sized>(
        &mut self,
        buffer: &mut B,
        selection: &mut SelectionSet,
        content: &str,
    ) {
        let Some(kind) = self.prompt.take() else {
            trace!(target: "vim.prompt", "prompt_done_without_prompt");
            return;
        };
        let content = content.replacen(kind.trigger(), "", 1);
        trace!(target: "vim.prompt", ?kind, %content, "prompt_done");

        match kind {
            PromptKind::Colon => {
                if content.is_empty() {
                    return;
                }
                let mut edit = Edit::begin(buffer, selection);
                colon::run(&mut edit, &content);
            }
            PromptKind::Search => {
                let mut edit = Edit::begin(buffer, selection);
                self.search(&mut edit, &content, SearchDirection::Forward);
            }
        }
    }

    /// Live edit of the panel contents.
    pub fn prompt_changed(&mut self, content: &str) -> PromptChange {
        match self.prompt {
            Some(kind) if !content.starts_with(kind.trigger()) => {
                trace!(target: "vim.prompt", ?kind, "prompt_dismissed");
                self.prompt = None;
                PromptChange::Dismiss
            }
            _ => PromptChange::Keep,
        }
    }

    pub fn prompt_cancel(&mut self) {
        if let Some(kind) = self.prompt.take() {
            trace!(target: "vim.prompt", ?kind, "prompt_cancelled");
        }
    }

    fn set_mode<B: TextBuffer + ?Sized>(&mut self, edit: &mut Edit<'_, B>, mode: Mode) {
        if self.config.insert_only {
            return;
        }
        if mode != self.mode {
            debug!(target: "vim.engine", from = %self.mode, to = %mode, "mode_change");
            self.pending = None;
            self.mode = mode;
        }
        let text = self.mode.status_text();
        edit.host().set_status(&self.config.status_key, &text);
    }

    fn key_char<B: TextBuffer + ?Sized>(&mut self, edit: &mut Edit<'_, B>, c: char) {
        match self.mode {
            Mode::Command => self.command(edit, c),
            Mode::Insert => {
                edit.insert_text(&c.to_string());
            }
            Mode::Replace => {
                erase_under_carets(edit);
                edit.insert_text(&c.to_string());
                self.set_mode(edit, Mode::Command);
            }
            Mode::Visual | Mode::VisualLine => {}
        }
    }

    fn key_escape<B: TextBuffer + ?Sized>(&mut self, edit: &mut Edit<'_, B>) {
        self.pending = None;
        if self.mode != Mode::Command && edit.selection().len() == 1 && !self.config.insert_only {
            self.set_mode(edit, Mode::Command);
        } else {
            escape(edit);
        }
    }

    fn key_prompt<B: TextBuffer + ?Sized>(
        &mut self,
        edit: &mut Edit<'_, B>,
        kind: PromptKind,
    ) -> Outcome {
        if self.config.insert_only {
            edit.insert_text(&kind.trigger().to_string());
            return Outcome::Handled;
        }
        if self.mode != Mode::Command {
            return Outcome::Unhandled;
        }
        self.pending = None;
        self.prompt = Some(kind);
        Outcome::Prompt(kind)
    }

    fn key_adjust<B: TextBuffer + ?Sized>(&mut self, edit: &mut Edit<'_, B>, delta: i64) {
        if self.mode == Mode::Command {
            let cursors = edit.selection().to_vec();
            for cur in cursors.iter().rev() {
                edit.adjust_number(cur.b, delta);
            }
        } else if delta > 0 {
            let visible = edit.buffer().visible_region();
            edit.selection_mut().replace_all([visible]);
        }
    }

    fn command<B: TextBuffer + ?Sized>(&mut self, edit: &mut Edit<'_, B>, c: char) {
        let mut mode = self.mode;
        if let Some(op) = self.pending.take() {
            match operator::resolve(edit, &mut self.register, op, c) {
                Resolution::Discarded => {}
                Resolution::Applied => self.publish(op),
                Resolution::EnterInsert => {
                    self.publish(op);
                    mode = Mode::Insert;
                }
            }
        } else if let Some(command) = CommandKey::lookup(c) {
            mode = self.run_command(edit, command);
        } else {
            trace!(target: "vim.engine", key = %c, "unbound_key");
        }
        self.set_mode(edit, mode);
    }

    fn run_command<B: TextBuffer + ?Sized>(
        &mut self,
        edit: &mut Edit<'_, B>,
        command: CommandKey,
    ) -> Mode {
        match command {
            CommandKey::Enter(mode) => return mode,
            CommandKey::Append => {
                let moved = map_cursors(edit, |buffer, cur| {
                    let next = cur.b + 1;
                    if cur.is_empty() && next <= buffer.line(cur.b).end() {
                        Region::caret(next)
                    } else {
                        Region::caret(cur.b)
                    }
                });
                edit.selection_mut().replace_all(moved);
                return Mode::Insert;
            }
            CommandKey::AppendLineEnd => {
                let moved = map_cursors(edit, |buffer, cur| {
                    Region::caret(buffer.line(cur.b).end())
                });
                edit.selection_mut().replace_all(moved);
                return Mode::Insert;
            }
            CommandKey::OpenLine { below } => {
                open_line(edit, below);
                return Mode::Insert;
            }
            CommandKey::Move(direction) => move_cursors(edit, direction),
            CommandKey::MoveBy(unit, forward) => {
                let moved = map_cursors(edit, |buffer, cur| {
                    Region::caret(buffer.move_by(cur.b, unit, forward))
                });
                edit.selection_mut().replace_all(moved);
            }
            CommandKey::DeleteChar => delete_char(edit),
            CommandKey::DeleteToLineEnd => {
                self.delete_to_line_end(edit);
                self.publish(Operator::Delete);
            }
            CommandKey::YankLine => {
                self.register.set(operator::yank_lines(edit));
                self.publish(Operator::Yank);
            }
            CommandKey::Paste { after: true } => self.paste_after(edit),
            CommandKey::Paste { after: false } => self.paste_before(edit),
            CommandKey::LineStart => {
                let moved = map_cursors(edit, |buffer, cur| {
                    Region::caret(buffer.line(cur.b).begin())
                });
                edit.selection_mut().replace_all(moved);
            }
            CommandKey::LineEnd => {
                let moved = map_cursors(edit, |buffer, cur| {
                    Region::caret(buffer.line(cur.b).end())
                });
                edit.selection_mut().replace_all(moved);
            }
            CommandKey::RepeatSearch(direction) => {
                let pattern = self.last_search.clone();
                self.search(edit, &pattern, direction);
            }
            CommandKey::Pending(op) => self.pending = Some(op),
            CommandKey::Undo => trace!(target: "vim.engine", "undo_not_implemented"),
            CommandKey::Count => trace!(target: "vim.engine", "count_not_implemented"),
        }
        self.mode
    }

    fn search<B: TextBuffer + ?Sized>(
        &mut self,
        edit: &mut Edit<'_, B>,
        pattern: &str,
        direction: SearchDirection,
    ) {
        self.last_search = pattern.to_owned();
        // From the start of the first region, so `N` right after a forward
        // hit moves past the current match.
        let from = edit.selection().first().map(|r| r.begin()).unwrap_or(0);
        match search::find_next(edit.buffer(), pattern, from, direction) {
            Some(hit) => {
                debug!(target: "vim.search", pattern, ?hit, "search_hit");
                let region = hit.selection();
                edit.selection_mut().replace_all([region]);
                edit.host().show(region, true);
            }
            None => debug!(target: "vim.search", pattern, "search_miss"),
        }
    }

    /// `D`: yank and delete from each cursor to its line end.
    fn delete_to_line_end<B: TextBuffer + ?Sized>(&mut self, edit: &mut Edit<'_, B>) {
        let spans = map_cursors(edit, |buffer, cur| {
            Region::new(cur.a, buffer.line(cur.a).end())
        });
        self.register
            .set(spans.iter().map(|span| edit.buffer().substr(*span)).collect());
        for span in SelectionSet::from_regions(spans).iter().rev() {
            edit.erase(*span);
        }
    }

    /// `p`: register lines as new lines below each cursor's line.
    fn paste_after<B: TextBuffer + ?Sized>(&mut self, edit: &mut Edit<'_, B>) {
        if self.register.is_empty() {
            return;
        }

        // The block needs a line of its own even after an unterminated last line.
        let size = edit.buffer().size();
        let touches_end = edit
            .selection()
            .iter()
            .any(|cur| edit.buffer().full_line(cur.b).end() == size);
        if touches_end && size > 0 && edit.buffer().char_at(size - 1) != Some('\n') {
            edit.insert(size, "\n");
        }

        let targets = map_cursors(edit, |buffer, cur| {
            Region::caret(buffer.full_line(cur.b).end())
        });
        edit.selection_mut().replace_all(targets);

        let cursors = edit.selection().len();
        let assigned = if self.register.len() == cursors {
            self.register
                .lines()
                .iter()
                .map(|line| format!("{line}\n"))
                .collect()
        } else {
            vec![format!("{}\n", self.register.joined()); cursors]
        };
        let spans = edit.insert_assigned(assigned);
        edit.selection_mut()
            .replace_all(spans.iter().map(|span| Region::caret(span.begin())));
    }

    /// `P`: register text at each cursor; cursors keep their offsets.
    fn paste_before<B: TextBuffer + ?Sized>(&mut self, edit: &mut Edit<'_, B>) {
        if self.register.is_empty() {
            return;
        }
        let old = edit.selection().to_vec();
        edit.insert_text(&self.register.joined());
        let size = edit.buffer().size();
        edit.selection_mut().replace_all(
            old.into_iter()
                .map(|r| Region::new(r.a.min(size), r.b.min(size))),
        );
    }

    /// Mirror the register after `op` yanked into it.
    fn publish(&mut self, op: Operator) {
        if op == Operator::Find {
            return;
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            clipboard.set(self.register.joined());
        }
    }
}

/// New region for every cursor, computed against the current buffer.
fn map_cursors<B: TextBuffer + ?Sized>(
    edit: &Edit<'_, B>,
    mut f: impl FnMut(&B, Region) -> Region,
) -> Vec<Region> {
    let buffer = edit.buffer();
    edit.selection().iter().map(|cur| f(buffer, *cur)).collect()
}

fn move_cursors<B: TextBuffer + ?Sized>(edit: &mut Edit<'_, B>, direction: Direction) {
    let moved = map_cursors(edit, |buffer, cur| {
        let p = cur.b;
        let q = match direction {
            Direction::Left => p.saturating_sub(1),
            Direction::Right => (p + 1).min(buffer.size()),
            Direction::Up | Direction::Down => {
                let (row, col) = buffer.row_col(p);
                let last_row = buffer.row_col(buffer.size()).0;
                match direction {
                    Direction::Up if row > 0 => buffer.text_point(row - 1, col),
                    Direction::Down if row < last_row => buffer.text_point(row + 1, col),
                    _ => p,
                }
            }
        };
        Region::caret(q)
    });
    edit.selection_mut().replace_all(moved);
}

/// Erase the character under every caret that is not at its line end.
fn erase_under_carets<B: TextBuffer + ?Sized>(edit: &mut Edit<'_, B>) {
    let targets: Vec<Region> = edit
        .selection()
        .iter()
        .filter(|cur| cur.is_empty() && cur.a < edit.buffer().line(cur.a).end())
        .map(|cur| Region::new(cur.a, cur.a + 1))
        .collect();
    for target in targets.into_iter().rev() {
        edit.erase(target);
    }
}

/// `x`: carets at a line end step back onto the last character first.
fn delete_char<B: TextBuffer + ?Sized>(edit: &mut Edit<'_, B>) {
    let stepped = map_cursors(edit, |buffer, cur| {
        let line = buffer.line(cur.a);
        if cur.is_empty() && cur.a == line.end() && cur.a > line.begin() {
            Region::caret(cur.a - 1)
        } else {
            cur
        }
    });
    edit.selection_mut().replace_all(stepped);
    erase_under_carets(edit);
}

/// `o` / `O`: open an empty line next to each cursor's line.
fn open_line<B: TextBuffer + ?Sized>(edit: &mut Edit<'_, B>, below: bool) {
    let mut lines = map_cursors(edit, |buffer, cur| buffer.line(cur.a));
    lines.dedup();
    let visible_end = edit.buffer().visible_region().end();

    edit.selection_mut().clear();
    for line in lines.into_iter().rev() {
        let (at, caret): (Point, Point) = if below {
            if line.end() < visible_end {
                (line.end(), line.end() + 1)
            } else {
                (visible_end, visible_end + 1)
            }
        } else if line.begin() == 0 {
            (0, 0)
        } else {
            let prev = edit.buffer().line(line.begin() - 1);
            if prev.end() < visible_end {
                (prev.end(), line.begin())
            } else {
                (visible_end, visible_end + 1)
            }
        };
        edit.insert(at, "\n");
        edit.selection_mut().add(Region::caret(caret));
    }

    // Indent like the line we came from, unless that line is flush left.
    let carets = edit.selection().to_vec();
    for caret in carets.iter().rev() {
        let buffer = edit.buffer();
        let opened = buffer.line(caret.a);
        let origin = if below {
            match opened.begin().checked_sub(1) {
                Some(p) => buffer.line(p),
                None => continue,
            }
        } else {
            if opened.end() >= buffer.size() {
                continue;
            }
            buffer.line(opened.end() + 1)
        };
        let origin_text = buffer.substr(origin);
        if !origin_text.starts_with(char::is_whitespace) {
            continue;
        }
        let indent = buffer.auto_indent(origin.begin());
        edit.insert(caret.a, &indent);
    }
}

/// Escape with nothing to leave: collapse cursors or hide panels.
fn escape<B: TextBuffer + ?Sized>(edit: &mut Edit<'_, B>) {
    if edit.selection().len() > 1 {
        edit.selection_mut().single();
    } else {
        colon::run_action(edit.host(), WindowAction::HidePanels);
    }
}
