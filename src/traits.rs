use crate::types::{MoveUnit, Point, Region};

/// Failure reported by the host when it could not carry out an action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("save failed: {0}")]
    SaveFailed(String),
    #[error("revert failed: {0}")]
    RevertFailed(String),
    #[error("window refused to close")]
    CloseRefused,
    #[error("action not supported by host: {0:?}")]
    Unsupported(WindowAction),
}

/// File and window level actions the interpreter can ask the host for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Save,
    /// Discard unsaved changes.
    Revert,
    Close,
    NextView,
    PrevView,
    /// Clear snippet fields and hide panels, overlays and completion popups.
    HidePanels,
}

/// The host buffer the interpreter drives.
///
/// Offsets are character offsets. Line regions never include the trailing
/// newline; full-line regions do.
pub trait TextBuffer {
    // Queries
    fn size(&self) -> usize;
    fn substr(&self, region: Region) -> String;

    fn char_at(&self, p: Point) -> Option<char> {
        if p >= self.size() {
            return None;
        }
        self.substr(Region::new(p, p + 1)).chars().next()
    }

    /// The line containing `p`, without its newline.
    fn line(&self, p: Point) -> Region;
    /// The line containing `p`, including its newline if it has one.
    fn full_line(&self, p: Point) -> Region;

    /// Zero-based (row, column) of `p`.
    fn row_col(&self, p: Point) -> (usize, usize);
    /// Offset of (row, col); rows past the end clamp to the last line and
    /// columns clamp to the line end.
    fn text_point(&self, row: usize, col: usize) -> Point;

    /// The part of the buffer currently on screen.
    fn visible_region(&self) -> Region;

    /// Next boundary of `unit` from `p`.
    fn move_by(&self, p: Point, unit: MoveUnit, forward: bool) -> Point;

    /// Indentation for a line opened next to the line containing `p`.
    fn auto_indent(&self, p: Point) -> String {
        let line = self.line(p);
        self.substr(line)
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }

    fn is_dirty(&self) -> bool;

    // Mutation. Callers go through `edit::Edit` so selections stay in step.
    fn insert(&mut self, p: Point, text: &str) -> usize;
    fn erase(&mut self, region: Region);

    /// Start of an undoable group of edits.
    fn begin_edit(&mut self);
    /// End of the group opened by `begin_edit`.
    fn end_edit(&mut self);

    // Presentation
    fn set_status(&mut self, key: &str, text: &str);
    fn show(&mut self, region: Region, center: bool);

    fn run(&mut self, action: WindowAction) -> Result<(), HostError>;
}

/// Sink the yank register can be mirrored to.
pub trait Clipboard {
    fn set(&mut self, text: String);
}

/// The system clipboard, via `arboard`.
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, arboard::Error> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn set(&mut self, text: String) {
        if let Err(err) = self.inner.set_text(text) {
            tracing::warn!(target: "vim.register", %err, "clipboard_set_failed");
        }
    }
}
