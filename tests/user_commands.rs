use vim_core::ex::alias::{CommandAlias, Nargs};
use vim_core::{ExError, RopeEditor, Session, execute};

mod support;
use support::mock_host::MockHost;
use support::run;

fn setup(text: &str) -> (Session, MockHost, RopeEditor) {
    let (session, host, _) = support::session();
    (session, host, RopeEditor::new(text))
}

#[test]
fn define_and_run() {
    let (mut session, _, mut editor) = setup("abc\n");
    execute(&mut session, &mut editor, "command Hi s/a/b/").unwrap();
    assert_eq!(run(&mut session, &mut editor, "Hi"), "bbc\n");

    let alias = session.alias("Hi").unwrap();
    assert_eq!(alias.nargs(), Nargs::None);
    assert_eq!(alias.replacement(), "s/a/b/");
}

#[test]
fn redefine_needs_bang() {
    let (mut session, _, mut editor) = setup("abc\n");
    execute(&mut session, &mut editor, "command Hi s/a/b/").unwrap();
    assert_eq!(
        execute(&mut session, &mut editor, "command Hi s/a/c/"),
        Err(ExError::CommandExists)
    );
    execute(&mut session, &mut editor, "command! Hi s/a/c/").unwrap();
    assert_eq!(run(&mut session, &mut editor, "Hi"), "cbc\n");
}

#[test]
fn arguments_are_substituted() {
    let (mut session, _, mut editor) = setup("a\nb\nc\n");
    execute(&mut session, &mut editor, "command -nargs=1 Del <args>d").unwrap();
    assert_eq!(run(&mut session, &mut editor, "Del 2"), "a\nc\n");
    assert_eq!(execute(&mut session, &mut editor, "Del"), Err(ExError::ArgumentRequired));
    assert_eq!(
        execute(&mut session, &mut editor, "Del 1 2"),
        Err(ExError::TrailingCharacters("1 2".to_string()))
    );
}

#[test]
fn argument_rules() {
    let cases = [
        (Nargs::None, "", Ok("x".to_string())),
        (Nargs::None, "a", Err(ExError::TrailingCharacters("a".to_string()))),
        (Nargs::One, "", Err(ExError::ArgumentRequired)),
        (Nargs::Optional, "", Ok("x".to_string())),
        (Nargs::Optional, "a b", Err(ExError::TrailingCharacters("a b".to_string()))),
        (Nargs::Any, "a b", Ok("xa b".to_string())),
        (Nargs::AtLeastOne, "", Err(ExError::ArgumentRequired)),
        (Nargs::AtLeastOne, "a b", Ok("xa b".to_string())),
    ];
    for (nargs, args, expected) in cases {
        let alias = CommandAlias::new("X", nargs, "x<args>");
        assert_eq!(alias.expand(args), expected, "{nargs:?} {args:?}");
    }
}

#[test]
fn definition_errors() {
    let cases = [
        ("command hi s/a/b/", ExError::LowercaseUserCommand),
        ("command H-i s/a/b/", ExError::LowercaseUserCommand),
        ("command -bar Hi s/a/b/", ExError::InvalidAttribute("-bar".to_string())),
        ("command -nargs Hi s/a/b/", ExError::NoAttribute),
        ("command -nargs=2 Hi s/a/b/", ExError::InvalidArgumentCount),
    ];
    for (line, expected) in cases {
        let (mut session, _, mut editor) = setup("abc\n");
        assert_eq!(execute(&mut session, &mut editor, line), Err(expected), "{line}");
        assert!(session.alias("Hi").is_none());
    }
}

#[test]
fn delete_and_clear() {
    let (mut session, _, mut editor) = setup("abc\n");
    execute(&mut session, &mut editor, "command Hi s/a/b/").unwrap();
    execute(&mut session, &mut editor, "command Ho s/a/c/").unwrap();

    execute(&mut session, &mut editor, "delc Hi").unwrap();
    assert!(session.alias("Hi").is_none());
    assert_eq!(
        execute(&mut session, &mut editor, "delc Hi"),
        Err(ExError::NoSuchUserCommand("Hi".to_string()))
    );

    execute(&mut session, &mut editor, "comc").unwrap();
    assert_eq!(session.aliases().count(), 0);
    assert_eq!(
        execute(&mut session, &mut editor, "Ho"),
        Err(ExError::NotACommand("Ho".to_string()))
    );
}

#[test]
fn recursion_is_bounded() {
    let host = MockHost::new();
    let mut session = Session::builder().host(host.clone()).max_alias_depth(5).build();
    let mut editor = RopeEditor::new("abc\n");
    execute(&mut session, &mut editor, "command Loop Loop").unwrap();
    assert_eq!(execute(&mut session, &mut editor, "Loop"), Err(ExError::AliasDepth));
    assert_eq!(
        host.messages(),
        vec!["E169: Maximum alias depth reached".to_string()]
    );
}

#[test]
fn listing() {
    let (mut session, host, mut editor) = setup("abc\n");
    execute(&mut session, &mut editor, "command Hi s/a/b/").unwrap();
    execute(&mut session, &mut editor, "command -nargs=* Go <args>d").unwrap();

    execute(&mut session, &mut editor, "command").unwrap();
    assert_eq!(
        host.last_output().as_deref(),
        Some("    Name        Args    Definition\n    Go          *    <args>d\n    Hi          0    s/a/b/")
    );

    execute(&mut session, &mut editor, "command H").unwrap();
    assert_eq!(
        host.last_output().as_deref(),
        Some("    Name        Args    Definition\n    Hi          0    s/a/b/")
    );
}
