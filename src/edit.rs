//! Scoped edit transactions and the multi-cursor edit primitives built on them.

use tracing::debug;

use crate::selection::SelectionSet;
use crate::traits::TextBuffer;
use crate::types::{Point, Region};

/// One undoable group of edits.
///
/// Opening an `Edit` calls [`TextBuffer::begin_edit`]; dropping it calls
/// [`TextBuffer::end_edit`], whichever way the caller leaves. Text changes made
/// through it shift the selection so cursors follow the text.
pub struct Edit<'a, B: TextBuffer + ?Sized> {
    buffer: &'a mut B,
    selection: &'a mut SelectionSet,
}

impl<'a, B: TextBuffer + ?Sized> Edit<'a, B> {
    pub fn begin(buffer: &'a mut B, selection: &'a mut SelectionSet) -> Self {
        buffer.begin_edit();
        Self { buffer, selection }
    }

    pub fn buffer(&self) -> &B {
        self.buffer
    }

    /// Mutable access for presentation and window actions. Text changes must
    /// go through [`Edit::insert`] and friends instead.
    pub fn host(&mut self) -> &mut B {
        self.buffer
    }

    pub fn selection(&self) -> &SelectionSet {
        self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        self.selection
    }

    /// Insert `text` at `p`, returning the number of characters inserted.
    pub fn insert(&mut self, p: Point, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let n = self.buffer.insert(p, text);
        self.selection.shift_insert(p, n);
        n
    }

    pub fn erase(&mut self, region: Region) {
        if region.is_empty() {
            return;
        }
        self.buffer.erase(region);
        self.selection.shift_erase(region);
    }

    pub fn replace(&mut self, region: Region, text: &str) -> usize {
        self.erase(region);
        self.insert(region.begin(), text)
    }

    /// Type `text` at every cursor.
    ///
    /// When `text` has exactly one newline-separated segment per cursor, the
    /// segments are handed out in order; otherwise every cursor gets all of it.
    pub fn insert_text(&mut self, text: &str) -> Vec<Region> {
        let assigned = distribute(text, self.selection.len());
        self.insert_assigned(assigned)
    }

    /// Insert `assigned[i]` at cursor `i`, replacing non-empty selections.
    ///
    /// Cursors are handled back to front so offsets taken before the loop stay
    /// valid. Each cursor ends as a caret after its text. Returns the inserted
    /// spans in document order, in final coordinates.
    pub fn insert_assigned(&mut self, assigned: Vec<String>) -> Vec<Region> {
        let cursors = self.selection.to_vec();
        let mut spans: Vec<Region> = Vec::with_capacity(cursors.len());
        for (cur, text) in cursors.iter().zip(assigned).rev() {
            let removed = cur.len();
            self.erase(*cur);
            let at = cur.begin();
            let n = self.insert(at, &text);
            for span in &mut spans {
                *span = Region::new(span.a + n - removed, span.b + n - removed);
            }
            spans.push(Region::new(at, at + n));
        }
        spans.reverse();
        self.selection
            .replace_all(spans.iter().map(|span| Region::caret(span.end())));
        spans
    }

    /// Add `delta` to the number touching `p`. Returns the rewritten span.
    pub fn adjust_number(&mut self, p: Point, delta: i64) -> Option<Region> {
        let run = number_at(&*self.buffer, p)?;
        let text = self.buffer.substr(run);
        let value = match text.parse::<i64>() {
            Ok(value) => value,
            Err(err) => {
                debug!(target: "vim.number", %text, %err, "number_parse_failed");
                return None;
            }
        };
        let Some(next) = value.checked_add(delta) else {
            debug!(target: "vim.number", value, delta, "number_overflow");
            return None;
        };
        let n = self.replace(run, &next.to_string());
        Some(Region::new(run.begin(), run.begin() + n))
    }
}

impl<B: TextBuffer + ?Sized> Drop for Edit<'_, B> {
    fn drop(&mut self) {
        self.selection.normalize();
        self.buffer.end_edit();
    }
}

/// Split `text` into one piece per cursor, or repeat it for each.
pub fn distribute(text: &str, cursors: usize) -> Vec<String> {
    let segments: Vec<&str> = text.split('\n').collect();
    if segments.len() == cursors {
        segments.into_iter().map(str::to_owned).collect()
    } else {
        vec![text.to_owned(); cursors]
    }
}

/// The digit run on `p`'s line that `p` sits on or just after, with a
/// leading `-` if there is one.
pub fn number_at<B: TextBuffer + ?Sized>(buffer: &B, p: Point) -> Option<Region> {
    let is_digit = |q: Point| buffer.char_at(q).is_some_and(|c| c.is_ascii_digit());
    let p = if is_digit(p) {
        p
    } else if p > 0 && is_digit(p - 1) {
        p - 1
    } else {
        return None;
    };

    let line = buffer.line(p);
    let mut start = p;
    while start > line.begin() && is_digit(start - 1) {
        start -= 1;
    }
    if start > line.begin() && buffer.char_at(start - 1) == Some('-') {
        start -= 1;
    }
    let mut end = p + 1;
    while end < line.end() && is_digit(end) {
        end += 1;
    }
    Some(Region::new(start, end))
}
