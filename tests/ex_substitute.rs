use vim_core::{ExError, RopeEditor, Session, execute};

mod support;
use support::mock_host::MockHost;
use support::{caret, run};

fn setup(text: &str) -> (Session, MockHost, RopeEditor) {
    let (session, host, _) = support::session();
    (session, host, RopeEditor::new(text))
}

fn substitute(text: &str, line: &str) -> String {
    let (mut session, _, mut editor) = setup(text);
    execute(&mut session, &mut editor, line).unwrap();
    editor.contents()
}

#[test]
fn substitute_basics() {
    let cases = [
        ("foo foo\nbar\n", "s/foo/x/", "x foo\nbar\n"),
        ("foo foo\nbar\n", "s/foo/x/g", "x x\nbar\n"),
        ("foo foo\nbar\n", "2s/a/A/", "foo foo\nbAr\n"),
        ("foo foo\nbar\n", "%s/o//g", "f f\nbar\n"),
        ("a/b\n", r"s/\//-/", "a-b\n"),
        ("a/b\n", "s#/#-#", "a-b\n"),
        ("a.b\n", "s/./x/", "x.b\n"),
        ("hello world\n", r"s/\(\w\+\)/\u\1/", "Hello world\n"),
        ("hello world\n", r"s/\(\w\+\) \(\w\+\)/\2 \1/", "world hello\n"),
        ("hello world\n", r"s/hello/\U&/", "HELLO world\n"),
        ("hello world\n", r"s/hello/\Uab\Ecd/", "ABcd world\n"),
        ("HELLO\n", r"s/HELLO/\L&/", "hello\n"),
        ("hello world\n", r"s/\w\+/[&]/g", "[hello] [world]\n"),
        ("a,b,c\n", r"s/,/\t/g", "a\tb\tc\n"),
        ("a\na\na\n", "s/a/b/ 2", "b\nb\na\n"),
        ("a\na\na\n", "2s/a/b/ 5", "a\nb\nb\n"),
    ];
    for (text, line, expected) in cases {
        assert_eq!(substitute(text, line), expected, "{line}");
    }
}

#[test]
fn substitute_reports_changed_lines() {
    let (mut session, host, mut editor) = setup("foo\nbar\nbaz\n");
    execute(&mut session, &mut editor, r"%s/a\|o/_/g").unwrap();
    assert_eq!(editor.contents(), "f__\nb_r\nb_z\n");
    assert_eq!(host.messages(), vec!["4 substitutions on 3 lines".to_string()]);
}

#[test]
fn small_substitute_is_quiet() {
    let (mut session, host, mut editor) = setup("  foo\nbar\n");
    execute(&mut session, &mut editor, "s/o/0/").unwrap();
    assert_eq!(editor.contents(), "  f0o\nbar\n");
    assert!(host.messages().is_empty());
    assert_eq!(caret(&editor), 2);
}

#[test]
fn count_only_flag() {
    let (mut session, host, mut editor) = setup("foo foo\nbar\n");
    execute(&mut session, &mut editor, "%s/o//gn").unwrap();
    assert_eq!(editor.contents(), "foo foo\nbar\n");
    assert_eq!(host.messages(), vec!["4 matches on 1 line".to_string()]);

    execute(&mut session, &mut editor, "%s/a//n").unwrap();
    assert_eq!(host.messages().last().map(String::as_str), Some("1 match on 1 line"));
}

#[test]
fn no_match() {
    let (mut session, _, mut editor) = setup("abc\n");
    assert_eq!(
        execute(&mut session, &mut editor, "s/x/y/"),
        Err(ExError::PatternNotFound("x".to_string()))
    );
    assert_eq!(execute(&mut session, &mut editor, "s/x/y/e"), Ok(()));
    assert_eq!(editor.contents(), "abc\n");
}

#[test]
fn replacement_with_line_break() {
    let (mut session, _, mut editor) = setup("a,b,c\nd\n");
    execute(&mut session, &mut editor, r"s/,/\r/g").unwrap();
    assert_eq!(editor.contents(), "a\nb\nc\nd\n");
    assert_eq!(caret(&editor), 4);
}

#[test]
fn split_lines_stay_in_range() {
    let (mut session, _, mut editor) = setup("a,b\nc,d\ne,f\n");
    execute(&mut session, &mut editor, r"1,2s/,/\r/").unwrap();
    assert_eq!(editor.contents(), "a\nb\nc\nd\ne,f\n");
}

#[test]
fn repeat_substitute() {
    let (mut session, _, mut editor) = setup("foo\nfoo\nfoo\n");
    assert_eq!(run(&mut session, &mut editor, "s/o/0/g"), "f00\nfoo\nfoo\n");
    // `:&&` keeps the flags, plain `:s` drops them.
    assert_eq!(run(&mut session, &mut editor, "3&&"), "f00\nfoo\nf00\n");
    assert_eq!(run(&mut session, &mut editor, "2s"), "f00\nf0o\nf00\n");
    assert_eq!(run(&mut session, &mut editor, "2&g"), "f00\nf00\nf00\n");
}

#[test]
fn repeat_without_previous_substitute() {
    let (mut session, _, mut editor) = setup("foo\n");
    assert_eq!(execute(&mut session, &mut editor, "&"), Err(ExError::NoPreviousRegex));
    assert_eq!(execute(&mut session, &mut editor, "s"), Err(ExError::NoPreviousRegex));
    assert_eq!(execute(&mut session, &mut editor, "s//x/"), Err(ExError::NoPreviousRegex));
}

#[test]
fn empty_pattern_uses_last_search() {
    let (mut session, _, mut editor) = setup("ab\nab\n");
    execute(&mut session, &mut editor, "/b/").unwrap();
    assert_eq!(run(&mut session, &mut editor, "1s//x/"), "ax\nab\n");
}

#[test]
fn tilde_is_previous_replacement() {
    let (mut session, _, mut editor) = setup("ab\nb\n");
    assert_eq!(run(&mut session, &mut editor, "s/a/x/"), "xb\nb\n");
    assert_eq!(run(&mut session, &mut editor, "2s/b/~y/"), "xb\nxy\n");
    assert_eq!(run(&mut session, &mut editor, r"2s/x/\~/"), "xb\n~y\n");
}

#[test]
fn case_options() {
    let (mut session, _, mut editor) = setup("foo\n");
    execute(&mut session, &mut editor, "set ic").unwrap();
    assert_eq!(
        execute(&mut session, &mut editor, "s/FOO/x/I"),
        Err(ExError::PatternNotFound("FOO".to_string()))
    );
    execute(&mut session, &mut editor, "set scs").unwrap();
    assert!(execute(&mut session, &mut editor, "s/FOO/x/").is_err());
    assert_eq!(run(&mut session, &mut editor, "s/FOO/x/i"), "x\n");

    let (mut session, _, mut editor) = setup("Foo\n");
    execute(&mut session, &mut editor, "set ic").unwrap();
    assert_eq!(run(&mut session, &mut editor, "s/foo/x/"), "x\n");
}

#[test]
fn gdefault_inverts_g_flag() {
    let (mut session, _, mut editor) = setup("aaa\n");
    execute(&mut session, &mut editor, "set gd").unwrap();
    assert_eq!(run(&mut session, &mut editor, "s/a/b/"), "bbb\n");
    assert_eq!(run(&mut session, &mut editor, "s/b/c/g"), "cbb\n");
}

#[test]
fn substitute_updates_search_state() {
    let (mut session, _, mut editor) = setup("foo\n");
    execute(&mut session, &mut editor, "s/o/0/").unwrap();
    assert_eq!(session.search().last_search.as_deref(), Some("o"));
    assert_eq!(session.search().last_substitute.as_deref(), Some("o"));
    assert_eq!(session.search().last_replacement.as_deref(), Some("0"));
    assert_eq!(session.register(Some('/')).unwrap().text(), "o");
}

#[test]
fn substitute_argument_errors() {
    let cases = [
        ("s\"a\"b\"", ExError::BadDelimiter),
        ("s|a|b|", ExError::BadDelimiter),
        ("s/a/b/gx", ExError::TrailingCharacters("x".to_string())),
        ("s/a/b/ 0", ExError::PositiveCountRequired),
    ];
    for (line, expected) in cases {
        let (mut session, _, mut editor) = setup("abc\n");
        assert_eq!(execute(&mut session, &mut editor, line), Err(expected), "{line}");
        assert_eq!(editor.contents(), "abc\n");
    }
}

#[test]
fn substitute_on_guarded_line_fails() {
    let (mut session, _, mut editor) = setup("abc\n");
    editor.guard(0, 3);
    assert_eq!(execute(&mut session, &mut editor, "s/b/x/"), Err(ExError::Failed));
    assert_eq!(editor.contents(), "abc\n");
}
