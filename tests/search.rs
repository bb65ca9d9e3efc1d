use vim_core::offset::Offset;
use vim_core::search::{compile_pattern, search, search_next, search_pattern};
use vim_core::{Direction, ExError, RopeEditor, VimEditor, execute};

mod support;
use support::caret;

#[test]
fn pattern_translation() {
    let cases = [
        (r"\(ab\)\+", "ababx", true),
        (r"a\{2}", "aa", true),
        (r"a\{2}", "ab", false),
        (r"\<the\>", "other", false),
        (r"\<the\>", "the end", true),
        (r"colou\=r", "color", true),
        ("a+b", "a+b", true),
        ("a+b", "aab", false),
        ("f(x)", "f(x)", true),
        (r"foo\|bar", "bar", true),
        (r"\d\d", "a12", true),
        ("[abc]x", "bx", true),
        ("[]a]x", "]x", true),
    ];
    for (pattern, text, expected) in cases {
        let regex = compile_pattern(pattern, false).unwrap();
        assert_eq!(regex.is_match(text), expected, "{pattern} on {text}");
    }
}

#[test]
fn case_switches_in_pattern() {
    assert!(compile_pattern(r"\cFOO", false).unwrap().is_match("foo"));
    assert!(!compile_pattern(r"\CFOO", true).unwrap().is_match("foo"));
    assert!(compile_pattern("FOO", true).unwrap().is_match("foo"));
}

#[test]
fn search_wraps_when_asked() {
    let editor = RopeEditor::new("ab\nab\n");
    let regex = compile_pattern("a", false).unwrap();
    let found = |from, direction, wrap| search(&editor, &regex, Offset::new(from), direction, wrap);

    assert_eq!(found(0, Direction::Forward, false), Some((Offset::new(3), Offset::new(4))));
    assert_eq!(found(3, Direction::Forward, false), None);
    assert_eq!(found(3, Direction::Forward, true), Some((Offset::new(0), Offset::new(1))));
    assert_eq!(found(3, Direction::Backward, false), Some((Offset::new(0), Offset::new(1))));
    assert_eq!(found(0, Direction::Backward, true), Some((Offset::new(3), Offset::new(4))));
}

#[test]
fn search_and_repeat() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("x foo\nfoo\nbar foo\n");
    let c = editor.primary_caret();

    assert_eq!(
        search_pattern(&mut session, &mut editor, c, "foo", Direction::Forward, 1),
        Ok(Offset::new(2))
    );
    assert_eq!(session.register(Some('/')).unwrap().text(), "foo");
    assert_eq!(search_next(&mut session, &mut editor, c, 2, false), Ok(Offset::new(14)));
    assert_eq!(search_next(&mut session, &mut editor, c, 1, true), Ok(Offset::new(6)));
    assert_eq!(caret(&editor), 6);
    // Past the end wraps back to the top.
    assert_eq!(search_next(&mut session, &mut editor, c, 2, false), Ok(Offset::new(2)));
}

#[test]
fn search_errors() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("abc\n");
    let c = editor.primary_caret();
    assert_eq!(search_next(&mut session, &mut editor, c, 1, false), Err(ExError::NoPreviousRegex));
    assert_eq!(
        search_pattern(&mut session, &mut editor, c, "zzz", Direction::Backward, 1),
        Err(ExError::PatternNotFound("zzz".to_string()))
    );
    assert_eq!(session.search().last_direction, Direction::Backward);

    execute(&mut session, &mut editor, "set nows").unwrap();
    assert_eq!(
        search_pattern(&mut session, &mut editor, c, "a", Direction::Forward, 1),
        Err(ExError::PatternNotFound("a".to_string()))
    );
    assert_eq!(caret(&editor), 0);
}
