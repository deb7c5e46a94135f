use vim_interp::{Key, Operator, PromptChange, Region, WindowAction};

mod support;
use support::Harness;

/// Twelve lines of three characters each, newline included.
fn twelve_lines() -> String {
    "0123456789ab"
        .chars()
        .map(|c| format!("l{c}\n"))
        .collect()
}

fn row_start(row: usize) -> usize {
    row * 3
}

#[test]
fn relative_jump_down() {
    let mut h = Harness::new(&twelve_lines(), row_start(4));
    h.colon("+3");
    assert_eq!(h.regions(), vec![Region::caret(row_start(7))]);
    assert_eq!(h.buf.shown.last(), Some(&(Region::caret(row_start(7)), false)));
}

#[test]
fn relative_jump_up_clamps_at_the_top() {
    let mut h = Harness::new(&twelve_lines(), row_start(4) + 1);
    h.colon("-3");
    assert_eq!(h.carets(), vec![row_start(1)]);
    h.colon("-10");
    assert_eq!(h.carets(), vec![0]);
}

#[test]
fn relative_jump_uses_the_first_cursor_only() {
    let mut h = Harness::with_carets(&twelve_lines(), &[row_start(1), row_start(6)]);
    h.colon("+1");
    assert_eq!(h.carets(), vec![row_start(2)]);
}

#[test]
fn dollar_jumps_to_last_visible_line() {
    let mut h = Harness::new(&twelve_lines(), 0);
    h.buf.visible = Some(Region::new(0, row_start(5) + 2));
    h.colon("$");
    assert_eq!(h.carets(), vec![row_start(5)]);
}

#[test]
fn absolute_line_numbers_are_one_based() {
    let mut h = Harness::new(&twelve_lines(), row_start(6));
    h.colon("1");
    assert_eq!(h.carets(), vec![0]);
    h.colon("4");
    assert_eq!(h.carets(), vec![row_start(3)]);
    h.colon("0");
    assert_eq!(h.carets(), vec![0]);
    h.colon("99");
    assert_eq!(h.carets(), vec![row_start(12)]);
}

#[test]
fn unknown_content_is_ignored() {
    let mut h = Harness::new(&twelve_lines(), 4);
    h.colon("zzz");
    assert_eq!(h.carets(), vec![4]);
    assert!(h.buf.actions.is_empty());
    assert!(h.buf.shown.is_empty());
}

#[test]
fn empty_content_does_nothing() {
    let mut h = Harness::new("abc", 1);
    let begun = h.buf.edits_begun;
    h.colon("");
    assert_eq!(h.buf.edits_begun, begun + 1);
    assert_eq!(h.carets(), vec![1]);
}

#[test]
fn w_saves() {
    let mut h = Harness::new("abc", 0);
    h.buf.dirty = true;
    h.colon("w");
    assert_eq!(h.buf.actions, vec![WindowAction::Save]);
    assert!(!h.buf.dirty);
    assert!(!h.buf.closed);
}

#[test]
fn wq_saves_then_closes() {
    let mut h = Harness::new("abc", 0);
    h.colon("wq");
    assert_eq!(h.buf.actions, vec![WindowAction::Save, WindowAction::Close]);
    assert!(h.buf.closed);
}

#[test]
fn wq_keeps_the_window_when_save_fails() {
    let mut h = Harness::new("abc", 0);
    h.buf.failing.push(WindowAction::Save);
    h.colon("wq");
    assert_eq!(h.buf.actions, vec![WindowAction::Save]);
    assert!(!h.buf.closed);
}

#[test]
fn q_refuses_a_dirty_buffer() {
    let mut h = Harness::new("abc", 0);
    h.buf.dirty = true;
    h.colon("q");
    assert!(h.buf.actions.is_empty());
    assert!(!h.buf.closed);

    h.buf.dirty = false;
    h.colon("q");
    assert_eq!(h.buf.actions, vec![WindowAction::Close]);
}

#[test]
fn q_bang_reverts_and_closes() {
    let mut h = Harness::new("abc", 0);
    h.buf.dirty = true;
    h.colon("q!");
    assert_eq!(h.buf.actions, vec![WindowAction::Revert, WindowAction::Close]);

    let mut h = Harness::new("abc", 0);
    h.colon("q!");
    assert_eq!(h.buf.actions, vec![WindowAction::Close]);
}

#[test]
fn x_saves_only_when_dirty() {
    let mut h = Harness::new("abc", 0);
    h.colon("x");
    assert_eq!(h.buf.actions, vec![WindowAction::Close]);

    let mut h = Harness::new("abc", 0);
    h.buf.dirty = true;
    h.colon("x");
    assert_eq!(h.buf.actions, vec![WindowAction::Save, WindowAction::Close]);
}

#[test]
fn n_and_capital_n_switch_views() {
    let mut h = Harness::new("abc", 0);
    h.colon("n");
    h.colon("N");
    assert_eq!(
        h.buf.actions,
        vec![WindowAction::NextView, WindowAction::PrevView]
    );
}

#[test]
fn deleting_the_trigger_dismisses_the_prompt() {
    let mut h = Harness::new("abc", 1);
    h.key(Key::Colon);
    assert_eq!(h.engine.prompt_changed(":1"), PromptChange::Keep);
    assert_eq!(h.engine.prompt_changed("1"), PromptChange::Dismiss);

    // The prompt is gone, so a late completion is ignored.
    h.engine.prompt_done(&mut h.buf, &mut h.sel, ":1");
    assert_eq!(h.carets(), vec![1]);
}

#[test]
fn cancel_performs_no_mutation() {
    let mut h = Harness::new("abc", 1);
    h.key(Key::Colon);
    let begun = h.buf.edits_begun;
    h.engine.prompt_cancel();
    h.engine.prompt_done(&mut h.buf, &mut h.sel, ":q");
    assert_eq!(h.buf.edits_begun, begun);
    assert!(h.buf.actions.is_empty());
    assert_eq!(h.engine.snapshot().prompt, None);
}

#[test]
fn opening_a_prompt_consumes_a_pending_operator() {
    let mut h = Harness::new("abc", 0);
    h.keys("d");
    assert_eq!(h.engine.pending(), Some(Operator::Delete));
    h.key(Key::Colon);
    assert_eq!(h.engine.pending(), None);
}
