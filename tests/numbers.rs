use vim_interp::edit::number_at;
use vim_interp::{Key, Region};

mod support;
use support::Harness;
use support::mock_buffer::MockBuffer;

#[test]
fn increment_a_negative_number_from_any_digit() {
    // "x = -42;" : '-' at 4, digits at 5 and 6, ';' at 7
    for caret in [5, 6, 7] {
        let mut h = Harness::new("x = -42;", caret);
        h.key(Key::Increment);
        assert_eq!(h.text(), "x = -41;", "caret {caret}");
        assert_eq!(h.carets(), vec![7]);
    }
}

#[test]
fn decrement_crosses_zero() {
    let mut h = Harness::new("0", 0);
    h.key(Key::Decrement);
    assert_eq!(h.text(), "-1");
    h.key(Key::Increment);
    h.key(Key::Increment);
    assert_eq!(h.text(), "1");
}

#[test]
fn carrying_grows_the_number() {
    let mut h = Harness::new("a 99\nb", 2);
    h.key(Key::Increment);
    assert_eq!(h.text(), "a 100\nb");

    let mut h = Harness::new("10", 1);
    h.key(Key::Decrement);
    assert_eq!(h.text(), "9");
}

#[test]
fn no_digit_nearby_is_a_no_op() {
    let mut h = Harness::new("abc 12", 1);
    h.key(Key::Increment);
    assert_eq!(h.text(), "abc 12");
    assert!(!h.buf.dirty);
}

#[test]
fn each_cursor_adjusts_its_own_number() {
    let mut h = Harness::with_carets("1 2 3", &[0, 2, 4]);
    h.key(Key::Increment);
    assert_eq!(h.text(), "2 3 4");
}

#[test]
fn increment_outside_command_mode_selects_visible_text() {
    let mut h = Harness::new("abc 1", 0);
    h.keys("i");
    h.key(Key::Increment);
    assert_eq!(h.regions(), vec![Region::new(0, 5)]);
    assert_eq!(h.text(), "abc 1");

    h.key(Key::Decrement);
    assert_eq!(h.text(), "abc 1");
}

#[test]
fn overflow_is_ignored() {
    let max = i64::MAX.to_string();
    let mut h = Harness::new(&max, 0);
    h.key(Key::Increment);
    assert_eq!(h.text(), max);
}

#[test]
fn number_runs_stay_on_their_line() {
    let buf = MockBuffer::new("12\n34");
    assert_eq!(number_at(&buf, 2), Some(Region::new(0, 2)));
    assert_eq!(number_at(&buf, 3), Some(Region::new(3, 5)));
    assert_eq!(number_at(&buf, 5), Some(Region::new(3, 5)));

    let buf = MockBuffer::new("a-7b");
    assert_eq!(number_at(&buf, 2), Some(Region::new(1, 3)));
    assert_eq!(number_at(&buf, 0), None);
}
