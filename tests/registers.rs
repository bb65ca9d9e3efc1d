use vim_core::offset::{LinePointer, Offset};
use vim_core::operator::{change_range, delete_range, put_register, put_text, yank_range};
use vim_core::traits::TransferableItem;
use vim_core::{
    ClipboardMode, ExError, Mode, Options, Register, RegisterOp, RopeEditor, SelectionType, Session, VimEditor,
    VimRange,
};

mod support;
use support::mock_clipboard::MockClipboard;

fn text_of(session: &mut Session, name: char) -> Option<String> {
    session.register(Some(name)).map(|r| r.text().to_string())
}

fn line(editor: &RopeEditor, n: usize) -> VimRange {
    VimRange::lines(LinePointer::init(n, editor), LinePointer::init(n, editor))
}

#[test]
fn line_delete_goes_to_numbered_and_unnamed() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("one\ntwo\n");
    let caret = editor.primary_caret();
    let range = line(&editor, 0);
    delete_range(&mut session, &mut editor, caret, &range, None, None).unwrap();

    assert_eq!(text_of(&mut session, '1').as_deref(), Some("one\n"));
    assert_eq!(text_of(&mut session, '"').as_deref(), Some("one\n"));
    assert_eq!(text_of(&mut session, '-'), None);
}

#[test]
fn small_delete_goes_to_minus() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("hello world");
    let caret = editor.primary_caret();
    let range = VimRange::chars(Offset::new(0), Offset::new(6));
    delete_range(&mut session, &mut editor, caret, &range, Some('w'), None).unwrap();

    assert_eq!(editor.contents(), "world");
    assert_eq!(text_of(&mut session, '-').as_deref(), Some("hello "));
    assert_eq!(text_of(&mut session, '"').as_deref(), Some("hello "));
    assert_eq!(text_of(&mut session, '1'), None);
}

#[test]
fn not_small_motion_also_fills_numbered() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("(ab) c");
    let caret = editor.primary_caret();
    let range = VimRange::chars(Offset::new(0), Offset::new(4));
    delete_range(&mut session, &mut editor, caret, &range, Some('%'), None).unwrap();

    assert_eq!(text_of(&mut session, '1').as_deref(), Some("(ab)"));
    assert_eq!(text_of(&mut session, '-').as_deref(), Some("(ab)"));
}

#[test]
fn numbered_registers_shift() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("a\nb\nc\nd\n");
    let caret = editor.primary_caret();
    for _ in 0..3 {
        let range = line(&editor, 0);
        delete_range(&mut session, &mut editor, caret, &range, None, None).unwrap();
    }
    assert_eq!(text_of(&mut session, '1').as_deref(), Some("c\n"));
    assert_eq!(text_of(&mut session, '2').as_deref(), Some("b\n"));
    assert_eq!(text_of(&mut session, '3').as_deref(), Some("a\n"));
    assert_eq!(editor.contents(), "d\n");
}

#[test]
fn numbered_registers_drop_the_oldest() {
    let (mut session, _, _) = support::session();
    let text: String = (0..=11).map(|i| format!("l{i}\n")).collect();
    let mut editor = RopeEditor::new(&text);
    let caret = editor.primary_caret();
    for _ in 0..11 {
        let range = line(&editor, 0);
        delete_range(&mut session, &mut editor, caret, &range, None, None).unwrap();
    }
    assert_eq!(editor.contents(), "l11\n");
    assert_eq!(text_of(&mut session, '1').as_deref(), Some("l10\n"));
    assert_eq!(text_of(&mut session, '5').as_deref(), Some("l6\n"));
    assert_eq!(text_of(&mut session, '9').as_deref(), Some("l2\n"));
    for name in '1'..='9' {
        let held = text_of(&mut session, name);
        assert!(!matches!(held.as_deref(), Some("l0\n" | "l1\n")), "{name}");
    }
}

#[test]
fn explicit_register_skips_numbered() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("one\ntwo\n");
    let caret = editor.primary_caret();
    let range = line(&editor, 0);
    delete_range(&mut session, &mut editor, caret, &range, None, Some('a')).unwrap();

    assert_eq!(text_of(&mut session, 'a').as_deref(), Some("one\n"));
    assert_eq!(text_of(&mut session, '"').as_deref(), Some("one\n"));
    assert_eq!(text_of(&mut session, '1'), None);
}

#[test]
fn uppercase_register_appends() {
    let (mut session, _, _) = support::session();
    session
        .store_text(Some('a'), "foo", SelectionType::CharacterWise, RegisterOp::Yank)
        .unwrap();
    session
        .store_text(Some('A'), "bar", SelectionType::CharacterWise, RegisterOp::Yank)
        .unwrap();
    assert_eq!(text_of(&mut session, 'a').as_deref(), Some("foobar"));

    session
        .store_text(Some('A'), "line", SelectionType::LineWise, RegisterOp::Yank)
        .unwrap();
    let register = session.register(Some('a')).unwrap();
    assert_eq!(register.text(), "foobar\nline\n");
    assert_eq!(register.kind(), SelectionType::LineWise);
}

#[test]
fn yank_goes_to_zero() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("one\ntwo\n").with_carets(&[5]);
    let caret = editor.primary_caret();
    let range = VimRange::lines(LinePointer::init(0, &editor), LinePointer::init(1, &editor));
    yank_range(&mut session, &mut editor, caret, &range, None).unwrap();

    assert_eq!(text_of(&mut session, '0').as_deref(), Some("one\ntwo\n"));
    assert_eq!(text_of(&mut session, '1'), None);
    // Line-wise yank moves the caret up to the first line, keeping its column.
    assert_eq!(editor.caret_offset(caret), Offset::new(1));
}

#[test]
fn black_hole_and_read_only_registers() {
    let (mut session, _, _) = support::session();
    session
        .store_text(Some('_'), "gone", SelectionType::CharacterWise, RegisterOp::Yank)
        .unwrap();
    assert_eq!(text_of(&mut session, '"'), None);

    let err = session
        .store_text(Some(':'), "x", SelectionType::CharacterWise, RegisterOp::Yank)
        .unwrap_err();
    assert_eq!(err, ExError::InvalidRegister(':'));
}

#[test]
fn clipboard_register_carries_caret_marker() {
    let clipboard = MockClipboard::new();
    let mut session = Session::builder().clipboard(clipboard.clone()).build();
    session
        .store_text(Some('+'), "text", SelectionType::CharacterWise, RegisterOp::Yank)
        .unwrap();

    assert_eq!(clipboard.text().as_deref(), Some("text"));
    assert!(
        clipboard
            .transferable()
            .iter()
            .any(|t| matches!(t, TransferableItem::CaretState { .. }))
    );
    assert_eq!(text_of(&mut session, '"').as_deref(), Some("text"));
}

#[test]
fn unnamedplus_routes_default_register_to_clipboard() {
    let clipboard = MockClipboard::new();
    let options = Options {
        clipboard: ClipboardMode::UnnamedPlus,
        ..Options::default()
    };
    let mut session = Session::builder()
        .options(options)
        .clipboard(clipboard.clone())
        .build();
    session
        .store_text(None, "yanked\n", SelectionType::LineWise, RegisterOp::Yank)
        .unwrap();

    assert_eq!(clipboard.text().as_deref(), Some("yanked\n"));
    assert_eq!(text_of(&mut session, '0').as_deref(), Some("yanked\n"));

    clipboard.set_external("outside");
    let register = session.register(None).unwrap();
    assert_eq!(register.text(), "outside");
    assert_eq!(register.kind(), SelectionType::CharacterWise);
}

#[test]
fn line_wise_register_always_ends_in_newline() {
    assert_eq!(Register::new('a', SelectionType::LineWise, "x").text(), "x\n");
    assert_eq!(Register::new('a', SelectionType::CharacterWise, "x").text(), "x");
}

#[test]
fn put_character_and_line_text() {
    let mut editor = RopeEditor::new("abc\ndef\n");
    let caret = editor.primary_caret();
    assert!(put_text(&mut editor, caret, "X", SelectionType::CharacterWise, false, 2));
    assert_eq!(editor.contents(), "aXXbc\ndef\n");
    assert_eq!(editor.caret_offset(caret), Offset::new(2));

    assert!(put_text(&mut editor, caret, "new\n", SelectionType::LineWise, false, 1));
    assert_eq!(editor.contents(), "aXXbc\nnew\ndef\n");
    assert_eq!(editor.caret_offset(caret), Offset::new(6));

    assert!(put_text(&mut editor, caret, "top", SelectionType::LineWise, true, 1));
    assert_eq!(editor.contents(), "aXXbc\ntop\nnew\ndef\n");
}

#[test]
fn put_line_after_last_line_without_newline() {
    let mut editor = RopeEditor::new("abc");
    let caret = editor.primary_caret();
    assert!(put_text(&mut editor, caret, "x\n", SelectionType::LineWise, false, 1));
    assert_eq!(editor.contents(), "abc\nx\n");
}

#[test]
fn put_block_pads_short_lines() {
    let mut editor = RopeEditor::new("abcd\nd\n").with_carets(&[1]);
    let caret = editor.primary_caret();
    assert!(put_text(&mut editor, caret, "12\n34", SelectionType::BlockWise, false, 1));
    assert_eq!(editor.contents(), "ab12cd\nd 34\n");
    assert_eq!(editor.caret_offset(caret), Offset::new(2));
}

#[test]
fn put_empty_register_fails() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("abc");
    let caret = editor.primary_caret();
    let err = put_register(&mut session, &mut editor, caret, Some('q'), false, 1).unwrap_err();
    assert_eq!(err, ExError::EmptyRegister('q'));
}

#[test]
fn change_lines_keeps_indent_and_enters_insert() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("  one\n  two\nthree\n");
    let caret = editor.primary_caret();
    let range = VimRange::lines(LinePointer::init(0, &editor), LinePointer::init(1, &editor));
    assert!(change_range(&mut session, &mut editor, caret, &range, None, None));

    assert_eq!(editor.contents(), "  \nthree\n");
    assert_eq!(editor.caret_offset(caret), Offset::new(2));
    assert_eq!(editor.mode(), Mode::Insert);
    assert_eq!(text_of(&mut session, '"').as_deref(), Some("  one\n  two\n"));
}

#[test]
fn change_last_line() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("a\n  b");
    let caret = editor.primary_caret();
    let range = line(&editor, 1);
    assert!(change_range(&mut session, &mut editor, caret, &range, None, None));
    assert_eq!(editor.contents(), "a\n  ");
    assert_eq!(editor.caret_offset(caret), Offset::new(4));
}

#[test]
fn change_lines_next_to_guarded_text_fails() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("one\ntwo\nthree\n");
    editor.guard_greedy(8, 13);
    let caret = editor.primary_caret();
    let range = line(&editor, 1);
    assert!(!change_range(&mut session, &mut editor, caret, &range, None, None));

    assert_eq!(editor.contents(), "one\nthree\n");
    assert_eq!(editor.mode(), Mode::Normal);
    assert_eq!(text_of(&mut session, '"').as_deref(), Some("two\n"));
}

#[test]
fn delete_on_read_only_buffer_does_nothing() {
    let (mut session, _, _) = support::session();
    let mut editor = RopeEditor::new("abc");
    editor.set_writable(false);
    let caret = editor.primary_caret();
    let range = VimRange::chars(Offset::new(0), Offset::new(1));
    assert!(delete_range(&mut session, &mut editor, caret, &range, None, None).is_none());
    assert_eq!(editor.contents(), "abc");
}
