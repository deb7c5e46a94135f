#![allow(dead_code)]

pub mod mock_buffer;
pub mod mock_clipboard;

use vim_interp::{Engine, Key, Outcome, PromptKind, Region, SelectionSet};

use mock_buffer::MockBuffer;

/// A buffer, its cursors and an engine wired together.
pub struct Harness {
    pub buf: MockBuffer,
    pub sel: SelectionSet,
    pub engine: Engine,
}

impl Harness {
    pub fn new(text: &str, caret: usize) -> Self {
        Self::with_regions(text, &[Region::caret(caret)])
    }

    pub fn with_carets(text: &str, carets: &[usize]) -> Self {
        let regions: Vec<Region> = carets.iter().map(|p| Region::caret(*p)).collect();
        Self::with_regions(text, &regions)
    }

    pub fn with_regions(text: &str, regions: &[Region]) -> Self {
        Self {
            buf: MockBuffer::new(text),
            sel: SelectionSet::from_regions(regions.iter().copied()),
            engine: Engine::new(),
        }
    }

    pub fn key(&mut self, key: Key) -> Outcome {
        self.engine.handle(&mut self.buf, &mut self.sel, key)
    }

    /// Feed each character as its own key.
    pub fn keys(&mut self, keys: &str) {
        for c in keys.chars() {
            self.key(Key::from(c));
        }
    }

    pub fn colon(&mut self, content: &str) {
        assert_eq!(self.key(Key::Colon), Outcome::Prompt(PromptKind::Colon));
        self.engine
            .prompt_done(&mut self.buf, &mut self.sel, &format!(":{content}"));
    }

    pub fn search(&mut self, pattern: &str) {
        assert_eq!(self.key(Key::Slash), Outcome::Prompt(PromptKind::Search));
        self.engine
            .prompt_done(&mut self.buf, &mut self.sel, &format!("/{pattern}"));
    }

    pub fn text(&self) -> String {
        self.buf.text()
    }

    pub fn regions(&self) -> Vec<Region> {
        self.sel.regions().to_vec()
    }

    /// Active ends of every cursor.
    pub fn carets(&self) -> Vec<usize> {
        self.sel.iter().map(|r| r.b).collect()
    }

    pub fn register(&self) -> Vec<String> {
        self.engine.register().lines().to_vec()
    }
}
