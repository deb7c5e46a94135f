use std::fmt;

/// A character offset into a text buffer.
///
/// Offsets count Unicode scalar values, not bytes, so hosts backed by a rope
/// or a `Vec<char>` can hand them straight through.
pub type Point = usize;

/// A range of text with a direction.
///
/// `a` is the anchor and `b` is the active end (where the caret is drawn).
/// The covered text is the half-open interval between the two ends, in
/// whichever order they appear. `a == b` is an empty region, i.e. a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    /// The anchor end.
    pub a: Point,
    /// The active end.
    pub b: Point,
}

impl Region {
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// An empty region at `p`.
    pub const fn caret(p: Point) -> Self {
        Self { a: p, b: p }
    }

    pub fn begin(&self) -> Point {
        self.a.min(self.b)
    }

    pub fn end(&self) -> Point {
        self.a.max(self.b)
    }

    pub fn len(&self) -> usize {
        self.end() - self.begin()
    }

    pub fn is_empty(&self) -> bool {
        self.a == self.b
    }

    /// Whether `p` lies within the region, bounds included.
    pub fn contains(&self, p: Point) -> bool {
        self.begin() <= p && p <= self.end()
    }

    /// Whether two regions should be merged into one.
    ///
    /// Non-empty regions must share interior; a caret overlaps anything it
    /// touches.
    pub fn overlaps(&self, other: &Region) -> bool {
        if self.is_empty() || other.is_empty() {
            self.begin() <= other.end() && other.begin() <= self.end()
        } else {
            self.begin() < other.end() && other.begin() < self.end()
        }
    }

    /// The smallest region covering both, keeping `self`'s direction.
    pub fn cover(&self, other: &Region) -> Region {
        let begin = self.begin().min(other.begin());
        let end = self.end().max(other.end());
        if self.a > self.b {
            Region::new(end, begin)
        } else {
            Region::new(begin, end)
        }
    }

    /// The same span with anchor and active end swapped.
    pub fn reversed(&self) -> Region {
        Region::new(self.b, self.a)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// The current mode of the interpreter.
///
/// Vim is a modal editor where the same keys perform different
/// actions depending on the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Command mode - single-key commands and operators.
    #[default]
    Command,
    /// Insert mode - for typing text.
    Insert,
    /// Replace mode - overwrite exactly one character, then back to Command.
    Replace,
    /// Character-wise visual mode (v).
    Visual,
    /// Line-wise visual mode (V).
    VisualLine,
}

impl Mode {
    /// Upper-case name used in the host status bar.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Command => "COMMAND",
            Mode::Insert => "INSERT",
            Mode::Replace => "REPLACE",
            Mode::Visual => "VISUAL",
            Mode::VisualLine => "VISUAL LINE",
        }
    }

    /// Text written to the status bar when the mode is entered.
    pub fn status_text(&self) -> String {
        format!("{} mode", self.label())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A first keystroke waiting for a second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `c`
    Change,
    /// `d`
    Delete,
    /// `y`
    Yank,
    /// `f`
    Find,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(Operator::Change),
            'd' => Some(Operator::Delete),
            'y' => Some(Operator::Yank),
            'f' => Some(Operator::Find),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Operator::Change => 'c',
            Operator::Delete => 'd',
            Operator::Yank => 'y',
            Operator::Find => 'f',
        }
    }
}

/// Arrow directions, also used by `h`/`j`/`k`/`l`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Down,
    Up,
    Right,
}

/// Units the host knows how to move by.
///
/// Segmentation is the host's business; the interpreter only asks for the
/// next boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveUnit {
    /// Start of the next (or previous) subword.
    Subword,
    /// End of the next subword.
    SubwordEnd,
}
