use vim_core::delete::{caret_after_delete, delete, delete_dry_run, fallback_shapes};
use vim_core::offset::{LineOffset, LinePointer, Offset};
use vim_core::range::{CharacterRange, LineRangeKind};
use vim_core::{OperatedRange, RopeEditor, SelectionType, ShiftType, VimEditor, VimRange};

fn line_range(editor: &RopeEditor, a: usize, b: usize) -> VimRange {
    VimRange::lines(LinePointer::init(a, editor), LinePointer::init(b, editor))
}

#[test]
fn middle_line_takes_newline_after() {
    let mut editor = RopeEditor::new("one\ntwo\nthree\n");
    let range = line_range(&editor, 1, 1);
    let operated = delete(&mut editor, &range).unwrap();

    assert_eq!(editor.contents(), "one\nthree\n");
    assert_eq!(
        operated,
        OperatedRange::Lines {
            text: "two\n".to_string(),
            line_above: LineOffset::init(1, &editor),
            lines_operated: 1,
            shift: ShiftType::NlOnEnd,
        }
    );
    assert_eq!(caret_after_delete(&editor, &operated), Offset::new(4));
}

#[test]
fn last_line_without_newline_takes_newline_before() {
    let mut editor = RopeEditor::new("one\ntwo");
    let range = line_range(&editor, 1, 1);
    let operated = delete(&mut editor, &range).unwrap();

    assert_eq!(editor.contents(), "one");
    assert!(matches!(
        operated,
        OperatedRange::Lines {
            shift: ShiftType::NlOnStart,
            ..
        }
    ));
    assert_eq!(operated.text(), "two\n");
    assert_eq!(caret_after_delete(&editor, &operated), Offset::new(0));
}

#[test]
fn only_line_takes_no_newline() {
    let mut editor = RopeEditor::new("only");
    let range = line_range(&editor, 0, 0);
    let operated = delete(&mut editor, &range).unwrap();

    assert_eq!(editor.contents(), "");
    assert_eq!(editor.line_count(), 1);
    assert!(matches!(operated, OperatedRange::Lines { shift: ShiftType::NoNl, .. }));
    assert_eq!(operated.text(), "only\n");
}

#[test]
fn without_lf_new_line_last_line_keeps_previous_newline() {
    let mut editor = RopeEditor::new("one\ntwo");
    editor.set_lf_makes_new_line(false);
    let range = line_range(&editor, 1, 1);
    delete(&mut editor, &range).unwrap();
    assert_eq!(editor.contents(), "one\n");
}

#[test]
fn whole_buffer() {
    let mut editor = RopeEditor::new("one\ntwo\nthree\n");
    let range = line_range(&editor, 0, 2);
    let operated = delete(&mut editor, &range).unwrap();
    assert_eq!(editor.contents(), "");
    assert_eq!(operated.text(), "one\ntwo\nthree\n");
}

#[test]
fn dry_run_leaves_buffer_alone() {
    let editor = RopeEditor::new("one\ntwo\nthree\n");
    let plan = delete_dry_run(&editor, &line_range(&editor, 0, 1)).unwrap();
    assert_eq!(plan.spans(), &[(Offset::new(0), Offset::new(8))]);
    assert_eq!(plan.operated().text(), "one\ntwo\n");
    assert_eq!(editor.contents(), "one\ntwo\nthree\n");
}

#[test]
fn fallback_table() {
    assert!(fallback_shapes(ShiftType::NoNl).is_empty());
    assert_eq!(
        fallback_shapes(ShiftType::NlOnEnd),
        &[(-1, -1, ShiftType::NlOnStart), (0, -1, ShiftType::NoNl)]
    );
    assert_eq!(fallback_shapes(ShiftType::NlOnStart), &[(1, 0, ShiftType::NoNl)]);
}

#[test]
fn guarded_newline_after_shifts_to_newline_before() {
    let mut editor = RopeEditor::new("one\ntwo\nthree\n");
    editor.guard(7, 8);
    let range = line_range(&editor, 1, 1);
    let operated = delete(&mut editor, &range).unwrap();

    assert_eq!(editor.contents(), "one\nthree\n");
    assert!(matches!(
        operated,
        OperatedRange::Lines {
            shift: ShiftType::NlOnStart,
            ..
        }
    ));
}

#[test]
fn guarded_both_newlines_keeps_an_empty_line() {
    let mut editor = RopeEditor::new("one\ntwo\nthree\n");
    editor.guard(3, 4);
    editor.guard(7, 8);
    let range = line_range(&editor, 1, 1);
    let operated = delete(&mut editor, &range).unwrap();

    assert_eq!(editor.contents(), "one\n\nthree\n");
    assert!(matches!(operated, OperatedRange::Lines { shift: ShiftType::NoNl, .. }));
}

#[test]
fn guarded_line_content_blocks_delete() {
    let mut editor = RopeEditor::new("one\ntwo\nthree\n");
    editor.guard(4, 7);
    let range = line_range(&editor, 1, 1);
    assert!(delete(&mut editor, &range).is_none());
    assert_eq!(editor.contents(), "one\ntwo\nthree\n");
}

#[test]
fn character_delete_and_empty_range() {
    let mut editor = RopeEditor::new("hello world");
    let operated = delete(&mut editor, &VimRange::chars(Offset::new(5), Offset::new(0))).unwrap();
    assert_eq!(editor.contents(), " world");
    assert_eq!(operated.text(), "hello");
    assert_eq!(caret_after_delete(&editor, &operated), Offset::new(0));

    assert!(delete(&mut editor, &VimRange::chars(Offset::new(2), Offset::new(2))).is_none());
}

#[test]
fn per_caret_character_ranges() {
    let mut editor = RopeEditor::new("abc\ndef");
    let range = VimRange::Character(CharacterRange::Multiple(vec![
        (Offset::new(4), Offset::new(5)),
        (Offset::new(0), Offset::new(1)),
    ]));
    let operated = delete(&mut editor, &range).unwrap();
    assert_eq!(editor.contents(), "bc\nef");
    assert_eq!(operated.text(), "a\nd");
    assert_eq!(operated.selection_type(), SelectionType::CharacterWise);
}

#[test]
fn discontinuous_lines() {
    let mut editor = RopeEditor::new("a\nb\nc\nd\n");
    let lines = vec![LinePointer::init(2, &editor), LinePointer::init(0, &editor)];
    let operated = delete(&mut editor, &VimRange::Line(LineRangeKind::Multiple(lines))).unwrap();
    assert_eq!(editor.contents(), "b\nd\n");
    assert_eq!(operated.text(), "a\nc\n");
}

#[test]
fn block_deletes_same_columns_on_each_line() {
    let mut editor = RopeEditor::new("abcd\nefgh\nij");
    let range = VimRange::Block {
        start: Offset::new(1),
        end: Offset::new(12),
    };
    let operated = delete(&mut editor, &range).unwrap();
    assert_eq!(editor.contents(), "ad\neh\ni");
    assert_eq!(operated.text(), "bc\nfg\nj");
    assert_eq!(caret_after_delete(&editor, &operated), Offset::new(1));
}

#[test]
fn delete_records_last_columns() {
    let mut editor = RopeEditor::new("one\ntwo\nthree\n").with_carets(&[10]);
    let range = line_range(&editor, 0, 0);
    delete(&mut editor, &range).unwrap();
    let caret = editor.primary_caret();
    assert_eq!(editor.last_column(caret), Some(2));
}
