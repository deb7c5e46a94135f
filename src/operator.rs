//! Second keystroke of a compound command (`dd`, `yy`, `fx`, `cb`, `de`, ...).

use tracing::debug;

use crate::edit::Edit;
use crate::register::Register;
use crate::selection::SelectionSet;
use crate::traits::TextBuffer;
use crate::types::{MoveUnit, Operator, Region};

/// What a resolved compound command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The command ran; stay in Command mode.
    Applied,
    /// The command ran and Insert mode should follow (`c` + motion).
    EnterInsert,
    /// Not a combination the interpreter knows. Nothing changed.
    Discarded,
}

/// Resolve `op` followed by `key`.
pub fn resolve<B: TextBuffer + ?Sized>(
    edit: &mut Edit<'_, B>,
    register: &mut Register,
    op: Operator,
    key: char,
) -> Resolution {
    let resolution = match (op, key) {
        (Operator::Delete, 'd') => {
            delete_lines(edit, register);
            Resolution::Applied
        }
        (Operator::Yank, 'y') => {
            register.set(yank_lines(edit));
            Resolution::Applied
        }
        (Operator::Find, c) if c != 'f' => {
            find_in_line(edit, c);
            Resolution::Applied
        }
        (Operator::Change | Operator::Delete | Operator::Yank, 'b') => {
            motion(edit, register, op, MoveUnit::Subword, false)
        }
        (Operator::Change | Operator::Delete | Operator::Yank, 'e') => {
            motion(edit, register, op, MoveUnit::SubwordEnd, true)
        }
        _ => Resolution::Discarded,
    };
    debug!(target: "vim.operator", op = %op.as_char(), key = %key, ?resolution, "operator_resolved");
    resolution
}

/// Full lines under the cursors, each line once, in document order.
fn cursor_lines<B: TextBuffer + ?Sized>(edit: &Edit<'_, B>) -> Vec<Region> {
    let mut lines: Vec<Region> = edit
        .selection()
        .iter()
        .map(|cur| edit.buffer().full_line(cur.b))
        .collect();
    lines.dedup();
    lines
}

/// Text of the line under each cursor, without newlines. Cursors sharing a
/// line each contribute a copy.
pub fn yank_lines<B: TextBuffer + ?Sized>(edit: &Edit<'_, B>) -> Vec<String> {
    let buffer = edit.buffer();
    edit.selection()
        .iter()
        .map(|cur| buffer.substr(buffer.line(cur.b)))
        .collect()
}

fn delete_lines<B: TextBuffer + ?Sized>(edit: &mut Edit<'_, B>, register: &mut Register) {
    register.set(yank_lines(edit));
    for full in cursor_lines(edit).into_iter().rev() {
        edit.erase(full);
    }
}

/// `f<c>`: move each cursor's active end onto the next `c` on its line.
///
/// A caret skips the character under it and moves onto the match; a
/// selection extends its active end to include the match.
fn find_in_line<B: TextBuffer + ?Sized>(edit: &mut Edit<'_, B>, target: char) {
    let moved = edit
        .selection()
        .iter()
        .map(|cur| {
            let buffer = edit.buffer();
            let eol = buffer.line(cur.b).end();
            let start = if cur.is_empty() { cur.b + 1 } else { cur.b };
            if start > eol {
                return *cur;
            }
            let rest = buffer.substr(Region::new(start, eol));
            match rest.chars().position(|c| c == target) {
                Some(i) if cur.is_empty() => Region::caret(start + i),
                Some(i) => Region::new(cur.a, start + i + 1),
                None => *cur,
            }
        })
        .collect::<Vec<_>>();
    edit.selection_mut().replace_all(moved);
}

/// Operator over the span a subword motion covers from each cursor.
fn motion<B: TextBuffer + ?Sized>(
    edit: &mut Edit<'_, B>,
    register: &mut Register,
    op: Operator,
    unit: MoveUnit,
    forward: bool,
) -> Resolution {
    let carets: Vec<Region> = edit
        .selection()
        .iter()
        .map(|cur| Region::caret(cur.b))
        .collect();
    let spans: Vec<Region> = carets
        .iter()
        .map(|caret| Region::new(caret.b, edit.buffer().move_by(caret.b, unit, forward)))
        .collect();

    register.set(spans.iter().map(|span| edit.buffer().substr(*span)).collect());
    edit.selection_mut().replace_all(carets);

    if op == Operator::Yank {
        return Resolution::Applied;
    }

    let merged = SelectionSet::from_regions(spans);
    for span in merged.iter().rev() {
        edit.erase(*span);
    }

    if op == Operator::Change {
        Resolution::EnterInsert
    } else {
        Resolution::Applied
    }
}
