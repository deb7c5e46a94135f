//! A modal (vi-style) key interpreter.
//!
//! The host owns the text, the cursors and the UI; it implements
//! [`TextBuffer`] and feeds every key to the [`Engine`] of the buffer that has
//! focus. The engine turns keys into edits, cursor moves and mode changes.

pub mod colon;
pub mod edit;
pub mod engine;
pub mod key;
pub mod operator;
pub mod register;
pub mod registry;
pub mod search;
pub mod selection;
pub mod traits;
pub mod types;

pub use crate::edit::Edit;
pub use crate::engine::{
    Engine, EngineBuilder, EngineConfig, EngineSnapshot, Outcome, PromptChange, PromptKind,
};
pub use crate::key::{Key, KeyCode, KeyEvent, Modifiers};
pub use crate::register::Register;
pub use crate::registry::Registry;
pub use crate::search::{SearchDirection, SearchHit};
pub use crate::selection::SelectionSet;
pub use crate::traits::{Clipboard, HostError, TextBuffer, WindowAction};
#[cfg(feature = "clipboard")]
pub use crate::traits::SystemClipboard;
pub use crate::types::{Direction, Mode, MoveUnit, Operator, Point, Region};
