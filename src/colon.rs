//! Line jumps and file actions typed after `:`.

use tracing::{debug, warn};

use crate::edit::Edit;
use crate::traits::{TextBuffer, WindowAction};
use crate::types::Region;

/// A parsed colon command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColonCommand {
    /// `+N` / `-N`, relative to the first cursor's line.
    RelativeLine(isize),
    /// `$`
    LastVisibleLine,
    /// `N`, stored zero-based.
    Line(usize),
    /// `w`
    Write,
    /// `wq`
    WriteQuit,
    /// `q!`
    ForceQuit,
    /// `q`
    Quit,
    /// `x`
    Exit,
    /// `n`
    NextView,
    /// `N`
    PrevView,
}

/// Parse the text after the `:`. Anything unrecognised is `None`.
pub fn parse(content: &str) -> Option<ColonCommand> {
    let mut chars = content.chars();
    let sign = chars.next()?;
    let rest = chars.as_str();
    if (sign == '+' || sign == '-') && is_number(rest) {
        let shift = rest.parse::<isize>().unwrap_or(isize::MAX);
        let shift = if sign == '-' { -shift } else { shift };
        return Some(ColonCommand::RelativeLine(shift));
    }

    if content == "$" {
        return Some(ColonCommand::LastVisibleLine);
    }

    if is_number(content) {
        let line = content.parse::<usize>().unwrap_or(usize::MAX);
        return Some(ColonCommand::Line(line.saturating_sub(1)));
    }

    match content {
        "w" => Some(ColonCommand::Write),
        "wq" => Some(ColonCommand::WriteQuit),
        "q!" => Some(ColonCommand::ForceQuit),
        "q" => Some(ColonCommand::Quit),
        "x" => Some(ColonCommand::Exit),
        "n" => Some(ColonCommand::NextView),
        "N" => Some(ColonCommand::PrevView),
        _ => None,
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Parse and run `content`. Returns the zero-based row jumped to, if any.
pub fn run<B: TextBuffer + ?Sized>(edit: &mut Edit<'_, B>, content: &str) -> Option<usize> {
    let Some(command) = parse(content) else {
        debug!(target: "vim.colon", content, "colon_ignored");
        return None;
    };
    debug!(target: "vim.colon", ?command, "colon_command");
    execute(edit, command)
}

/// Carry out a parsed command.
pub fn execute<B: TextBuffer + ?Sized>(
    edit: &mut Edit<'_, B>,
    command: ColonCommand,
) -> Option<usize> {
    let row = match command {
        ColonCommand::RelativeLine(shift) => {
            edit.selection_mut().single();
            let first = edit.selection().first().unwrap_or_default();
            let (row, _) = edit.buffer().row_col(first.a);
            Some(row.saturating_add_signed(shift))
        }
        ColonCommand::LastVisibleLine => {
            let visible = edit.buffer().visible_region();
            Some(edit.buffer().row_col(visible.end()).0)
        }
        ColonCommand::Line(row) => Some(row),
        ColonCommand::Write => {
            run_action(edit.host(), WindowAction::Save);
            None
        }
        ColonCommand::WriteQuit => {
            if run_action(edit.host(), WindowAction::Save) {
                run_action(edit.host(), WindowAction::Close);
            }
            None
        }
        ColonCommand::ForceQuit => {
            if edit.buffer().is_dirty() {
                run_action(edit.host(), WindowAction::Revert);
            }
            run_action(edit.host(), WindowAction::Close);
            None
        }
        ColonCommand::Quit => {
            if edit.buffer().is_dirty() {
                debug!(target: "vim.colon", "quit_refused_dirty");
            } else {
                run_action(edit.host(), WindowAction::Close);
            }
            None
        }
        ColonCommand::Exit => {
            let saved = !edit.buffer().is_dirty() || run_action(edit.host(), WindowAction::Save);
            if saved {
                run_action(edit.host(), WindowAction::Close);
            }
            None
        }
        ColonCommand::NextView => {
            run_action(edit.host(), WindowAction::NextView);
            None
        }
        ColonCommand::PrevView => {
            run_action(edit.host(), WindowAction::PrevView);
            None
        }
    }?;

    jump_to_row(edit, row);
    Some(edit.buffer().row_col(edit.selection().first().unwrap_or_default().a).0)
}

/// Collapse to a caret at the start of `row` and scroll it into view.
pub fn jump_to_row<B: TextBuffer + ?Sized>(edit: &mut Edit<'_, B>, row: usize) {
    let point = edit.buffer().text_point(row, 0);
    let line = edit.buffer().line(point);
    let caret = Region::caret(line.begin());
    edit.selection_mut().replace_all([caret]);
    edit.host().show(caret, false);
}

/// Run a host action, logging failure. Returns whether it succeeded.
pub(crate) fn run_action<B: TextBuffer + ?Sized>(host: &mut B, action: WindowAction) -> bool {
    match host.run(action) {
        Ok(()) => true,
        Err(err) => {
            warn!(target: "vim.host", ?action, %err, "host_action_failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_addresses() {
        assert_eq!(parse("+3"), Some(ColonCommand::RelativeLine(3)));
        assert_eq!(parse("-12"), Some(ColonCommand::RelativeLine(-12)));
        assert_eq!(parse("$"), Some(ColonCommand::LastVisibleLine));
        assert_eq!(parse("1"), Some(ColonCommand::Line(0)));
        assert_eq!(parse("0"), Some(ColonCommand::Line(0)));
        assert_eq!(parse("42"), Some(ColonCommand::Line(41)));
    }

    #[test]
    fn parses_file_actions() {
        assert_eq!(parse("w"), Some(ColonCommand::Write));
        assert_eq!(parse("wq"), Some(ColonCommand::WriteQuit));
        assert_eq!(parse("q!"), Some(ColonCommand::ForceQuit));
        assert_eq!(parse("q"), Some(ColonCommand::Quit));
        assert_eq!(parse("x"), Some(ColonCommand::Exit));
        assert_eq!(parse("n"), Some(ColonCommand::NextView));
        assert_eq!(parse("N"), Some(ColonCommand::PrevView));
    }

    #[test]
    fn rejects_everything_else() {
        for content in ["", "+", "-", "zzz", "+3a", "w!", " q", "1.5"] {
            assert_eq!(parse(content), None, "{content:?}");
        }
    }
}
