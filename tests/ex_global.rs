use vim_core::{ExError, RopeEditor, Session, execute};

mod support;
use support::mock_host::MockHost;
use support::run;

fn setup(text: &str) -> (Session, MockHost, RopeEditor) {
    let (session, host, _) = support::session();
    (session, host, RopeEditor::new(text))
}

#[test]
fn global_delete() {
    let (mut session, _, mut editor) = setup("a1\nb\na2\nc\n");
    assert_eq!(run(&mut session, &mut editor, "g/a/d"), "b\nc\n");
    assert_eq!(session.search().last_search.as_deref(), Some("a"));
    assert_eq!(session.register(Some('/')).unwrap().text(), "a");
    assert!(!session.is_global_busy());
}

#[test]
fn inverted_global() {
    for line in ["v/a/d", "g!/a/d"] {
        let (mut session, _, mut editor) = setup("a1\nb\na2\nc\n");
        assert_eq!(run(&mut session, &mut editor, line), "a1\na2\n", "{line}");
    }
}

#[test]
fn global_deleting_last_line() {
    let (mut session, _, mut editor) = setup("a\nb\na");
    assert_eq!(run(&mut session, &mut editor, "g/a/d"), "b");
}

#[test]
fn global_move_reverses_buffer() {
    let (mut session, _, mut editor) = setup("a\nb\nc\n");
    assert_eq!(run(&mut session, &mut editor, "g/^/m0"), "c\nb\na\n");
}

#[test]
fn global_with_range() {
    let (mut session, _, mut editor) = setup("x\nx\nx\nx\n");
    assert_eq!(run(&mut session, &mut editor, "2,3g/x/s/x/y/"), "x\ny\ny\nx\n");
}

#[test]
fn global_default_command_prints() {
    let (mut session, host, mut editor) = setup("a1\nb\na2\n");
    execute(&mut session, &mut editor, "g/a").unwrap();
    assert_eq!(host.output(), vec!["a1".to_string(), "a2".to_string()]);
}

#[test]
fn global_substitute() {
    let (mut session, _, mut editor) = setup("a1\nb\na2\nc\n");
    assert_eq!(run(&mut session, &mut editor, "g/a/s/a/x/"), "x1\nb\nx2\nc\n");
}

#[test]
fn global_reuses_last_search() {
    let (mut session, _, mut editor) = setup("a\nb\na\n");
    execute(&mut session, &mut editor, "/a/").unwrap();
    assert_eq!(run(&mut session, &mut editor, "g//d"), "b\n");
}

#[test]
fn global_errors() {
    let (mut session, _, mut editor) = setup("a\nb\n");
    assert_eq!(
        execute(&mut session, &mut editor, "g/zzz/d"),
        Err(ExError::PatternNotFound("zzz".to_string()))
    );
    assert_eq!(
        execute(&mut session, &mut editor, "v/[a-z]/d"),
        Err(ExError::PatternInEveryLine("[a-z]".to_string()))
    );
    assert_eq!(execute(&mut session, &mut editor, "g a d"), Err(ExError::BadDelimiter));
    assert_eq!(execute(&mut session, &mut editor, "g"), Err(ExError::ArgumentRequired));
    assert_eq!(editor.contents(), "a\nb\n");
}

#[test]
fn nested_global_runs_on_current_line() {
    let (mut session, _, mut editor) = setup("a1\nb\na2\nc\n");
    execute(&mut session, &mut editor, "g/a/g/1/d").unwrap();
    assert_eq!(editor.contents(), "b\na2\nc\n");
    assert!(!session.is_global_busy());
}

#[test]
fn nested_global_with_range_is_rejected() {
    let (mut session, _, mut editor) = setup("a1\nb\na2\n");
    assert_eq!(
        execute(&mut session, &mut editor, "g/a/1,2g/b/d"),
        Err(ExError::GlobalRecursive)
    );
    assert_eq!(editor.contents(), "a1\nb\na2\n");
    assert!(!session.is_global_busy());
}

#[test]
fn global_stops_at_first_failing_line() {
    let (mut session, _, mut editor) = setup("a\nb\na");
    // Joining the last line fails, after the first line was already joined.
    assert_eq!(execute(&mut session, &mut editor, "g/a/j"), Err(ExError::Failed));
    assert_eq!(editor.contents(), "a b\na");
}

#[test]
fn interrupt_stops_global() {
    let (mut session, host, mut editor) = setup("a\nb\na\n");
    session.interrupt();
    assert_eq!(execute(&mut session, &mut editor, "g/a/d"), Err(ExError::Interrupted));
    assert_eq!(editor.contents(), "a\nb\na\n");
    assert_eq!(host.messages(), vec!["Interrupted".to_string()]);
}
