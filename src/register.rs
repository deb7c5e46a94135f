/// The single implicit yank register.
///
/// Holds one entry per yanked line (or per cursor, for partial-line yanks).
/// Every yanking command replaces the contents wholesale; pasting only reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    lines: Vec<String>,
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Replace the contents.
    pub fn set(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    /// Entries joined by newlines.
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}
