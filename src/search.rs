//! Regex search with wrap-around.

use regex::Regex;
use tracing::debug;

use crate::traits::TextBuffer;
use crate::types::{Point, Region};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// A match, with the direction that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    /// The matched text, `a` at its start.
    pub matched: Region,
    pub direction: SearchDirection,
    /// Whether the search ran off the end of the buffer and restarted.
    pub wrapped: bool,
}

impl SearchHit {
    /// The region to select: the active end sits where the search was heading
    /// from, so a backward hit has its caret at the match start.
    pub fn selection(&self) -> Region {
        match self.direction {
            SearchDirection::Forward => self.matched,
            SearchDirection::Backward => self.matched.reversed(),
        }
    }
}

/// All non-overlapping, non-empty matches of the regular expression
/// `pattern`, in document order. An empty or invalid pattern matches nothing.
pub fn find_all<B: TextBuffer + ?Sized>(buffer: &B, pattern: &str) -> Vec<Region> {
    if pattern.is_empty() {
        return Vec::new();
    }
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(err) => {
            debug!(target: "vim.search", pattern, %err, "invalid_pattern");
            return Vec::new();
        }
    };
    let text = buffer.substr(Region::new(0, buffer.size()));

    let mut found = Vec::new();
    let mut chars_seen = 0;
    let mut bytes_seen = 0;
    for m in re.find_iter(&text).filter(|m| !m.is_empty()) {
        chars_seen += text[bytes_seen..m.start()].chars().count();
        bytes_seen = m.start();
        let len = m.as_str().chars().count();
        found.push(Region::new(chars_seen, chars_seen + len));
    }
    found
}

/// The next match of `pattern` strictly after (or before) `from`, wrapping
/// around the buffer when nothing qualifies.
pub fn find_next<B: TextBuffer + ?Sized>(
    buffer: &B,
    pattern: &str,
    from: Point,
    direction: SearchDirection,
) -> Option<SearchHit> {
    let matches = find_all(buffer, pattern);
    let hit = |matched: Region, wrapped: bool| SearchHit {
        matched,
        direction,
        wrapped,
    };

    match direction {
        SearchDirection::Forward => matches
            .iter()
            .find(|m| m.begin() > from)
            .map(|m| hit(*m, false))
            .or_else(|| matches.first().map(|m| hit(*m, true))),
        SearchDirection::Backward => matches
            .iter()
            .rev()
            .find(|m| m.begin() < from)
            .map(|m| hit(*m, false))
            .or_else(|| matches.last().map(|m| hit(*m, true))),
    }
}
