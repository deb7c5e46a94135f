use std::collections::HashMap;

use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;
use vim_interp::traits::{HostError, TextBuffer, WindowAction};
use vim_interp::types::{MoveUnit, Point, Region};

pub struct MockBuffer {
    rope: Rope,
    /// Visible part of the buffer; the whole text when `None`.
    pub visible: Option<Region>,
    pub dirty: bool,
    pub closed: bool,
    pub status: HashMap<String, String>,
    pub actions: Vec<WindowAction>,
    /// Actions that report failure.
    pub failing: Vec<WindowAction>,
    pub shown: Vec<(Region, bool)>,
    pub edits_begun: usize,
    pub edits_ended: usize,
    depth: usize,
}

impl MockBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            visible: None,
            dirty: false,
            closed: false,
            status: HashMap::new(),
            actions: Vec::new(),
            failing: Vec::new(),
            shown: Vec::new(),
            edits_begun: 0,
            edits_ended: 0,
            depth: 0,
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.get("vim").map(String::as_str)
    }

    pub fn edits_balanced(&self) -> bool {
        self.depth == 0 && self.edits_begun == self.edits_ended
    }

    /// (char start, char end) of every non-blank word-bound segment.
    fn words(&self) -> Vec<(Point, Point)> {
        let text = self.text();
        let mut out = Vec::new();
        let mut chars = 0;
        for segment in text.split_word_bounds() {
            let len = segment.chars().count();
            if !segment.chars().all(char::is_whitespace) {
                out.push((chars, chars + len));
            }
            chars += len;
        }
        out
    }
}

impl TextBuffer for MockBuffer {
    fn size(&self) -> usize {
        self.rope.len_chars()
    }

    fn substr(&self, region: Region) -> String {
        let end = region.end().min(self.size());
        let begin = region.begin().min(end);
        self.rope.slice(begin..end).to_string()
    }

    fn line(&self, p: Point) -> Region {
        let full = self.full_line(p);
        let text = self.substr(full);
        let trailing = if text.ends_with('\n') { 1 } else { 0 };
        Region::new(full.a, full.b - trailing)
    }

    fn full_line(&self, p: Point) -> Region {
        let p = p.min(self.size());
        let row = self.rope.char_to_line(p);
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
        self.visible.unwrap_or(Region::new(0, self.size()))
    }

    fn move_by(&self, p: Point, unit: MoveUnit, forward: bool) -> Point {
        let words = self.words();
        match (unit, forward) {
            (MoveUnit::Subword, true) => words
                .iter()
                .map(|w| w.0)
                .find(|start| *start > p)
                .unwrap_or(self.size()),
            (MoveUnit::Subword, false) => words
                .iter()
                .rev()
                .map(|w| w.0)
                .find(|start| *start < p)
                .unwrap_or(0),
            (MoveUnit::SubwordEnd, true) => words
                .iter()
                .map(|w| w.1)
                .find(|end| *end > p)
                .unwrap_or(self.size()),
            (MoveUnit::SubwordEnd, false) => words
                .iter()
                .rev()
                .map(|w| w.1)
                .find(|end| *end < p)
                .unwrap_or(0),
        }
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn insert(&mut self, p: Point, text: &str) -> usize {
        self.rope.insert(p, text);
        self.dirty = true;
        text.chars().count()
    }

    fn erase(&mut self, region: Region) {
        self.rope.remove(region.begin()..region.end());
        self.dirty = true;
    }

    fn begin_edit(&mut self) {
        self.depth += 1;
        self.edits_begun += 1;
    }

    fn end_edit(&mut self) {
        self.depth -= 1;
        self.edits_ended += 1;
    }

    fn set_status(&mut self, key: &str, text: &str) {
        self.status.insert(key.to_owned(), text.to_owned());
    }

    fn show(&mut self, region: Region, center: bool) {
        self.shown.push((region, center));
    }

    fn run(&mut self, action: WindowAction) -> Result<(), HostError> {
        self.actions.push(action);
        if self.failing.contains(&action) {
            return Err(match action {
                WindowAction::Save => HostError::SaveFailed("disk full".to_owned()),
                other => HostError::Unsupported(other),
            });
        }
        match action {
            WindowAction::Save | WindowAction::Revert => self.dirty = false,
            WindowAction::Close => self.closed = true,
            _ => {}
        }
        Ok(())
    }
}
