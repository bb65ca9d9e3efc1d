//! Parsed ex commands, their declared requirements and the execution
//! pipeline every command goes through.

use bitflags::bitflags;
use tracing::debug;

use crate::error::{ExError, ExResult};
use crate::ex::commands;
use crate::ex::range::Range;
use crate::session::Session;
use crate::traits::{CaretId, VimEditor};
use crate::types::{LineRange, Mode};

/// Whether a command takes a `[range]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFlag {
    Required,
    Optional,
    Forbidden,
    /// The range is a count (`:5goto`), not a line range.
    IsCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentFlag {
    Required,
    Optional,
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    Write,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CommandFlags: u8 {
        /// Keep the visual selection alive while the command runs.
        const SAVE_VISUAL = 0b0000_0001;
        /// Line `0` is a valid address (`:0put`).
        const ZERO_LINE = 0b0000_0010;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHandlerFlags {
    pub range: RangeFlag,
    pub argument: ArgumentFlag,
    pub access: Access,
    pub flags: CommandFlags,
}

impl CommandHandlerFlags {
    const fn new(range: RangeFlag, argument: ArgumentFlag, access: Access) -> Self {
        CommandHandlerFlags {
            range,
            argument,
            access,
            flags: CommandFlags::empty(),
        }
    }

    const fn with(mut self, flags: CommandFlags) -> Self {
        self.flags = flags;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandModifier {
    #[default]
    None,
    Bang,
}

/// How often a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// Once, against the primary caret.
    Single,
    /// Once per caret in document order, stopping at the first failure.
    ForEachCaret,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandName {
    Delete,
    Yank,
    Put,
    Copy,
    Move,
    Join,
    Global { invert: bool },
    Substitute,
    /// `:&` and `:&&`.
    RepeatSubstitute,
    Sort,
    Mark,
    Marks,
    Registers,
    GotoLine,
    Goto,
    Shift { right: bool, amount: usize },
    Print,
    Action,
    Command,
    DelCommand,
    ComClear,
    NoHlSearch,
    Set,
    User(String),
}

impl CommandName {
    pub fn flags(&self) -> CommandHandlerFlags {
        use Access::*;
        use ArgumentFlag as A;
        use RangeFlag as R;
        match self {
            CommandName::Delete => CommandHandlerFlags::new(R::Optional, A::Optional, Write),
            CommandName::Yank => CommandHandlerFlags::new(R::Optional, A::Optional, ReadOnly),
            CommandName::Put => {
                CommandHandlerFlags::new(R::Optional, A::Optional, Write).with(CommandFlags::ZERO_LINE)
            }
            CommandName::Copy | CommandName::Move => CommandHandlerFlags::new(R::Optional, A::Required, Write),
            CommandName::Join => CommandHandlerFlags::new(R::Optional, A::Optional, Write),
            CommandName::Global { .. } => CommandHandlerFlags::new(R::Optional, A::Required, Write),
            CommandName::Substitute | CommandName::RepeatSubstitute => {
                CommandHandlerFlags::new(R::Optional, A::Optional, Write)
            }
            CommandName::Sort => {
                CommandHandlerFlags::new(R::Optional, A::Optional, Write).with(CommandFlags::SAVE_VISUAL)
            }
            CommandName::Mark => CommandHandlerFlags::new(R::Optional, A::Required, ReadOnly),
            CommandName::Marks | CommandName::Registers => {
                CommandHandlerFlags::new(R::Forbidden, A::Optional, ReadOnly)
            }
            CommandName::GotoLine => CommandHandlerFlags::new(R::Required, A::Forbidden, ReadOnly),
            CommandName::Goto => CommandHandlerFlags::new(R::IsCount, A::Optional, ReadOnly),
            CommandName::Shift { .. } => CommandHandlerFlags::new(R::Optional, A::Optional, Write),
            CommandName::Print => CommandHandlerFlags::new(R::Optional, A::Optional, ReadOnly),
            CommandName::Action => CommandHandlerFlags::new(R::Forbidden, A::Required, ReadOnly),
            CommandName::Command => CommandHandlerFlags::new(R::Forbidden, A::Optional, ReadOnly),
            CommandName::DelCommand => CommandHandlerFlags::new(R::Forbidden, A::Required, ReadOnly),
            CommandName::ComClear | CommandName::NoHlSearch => {
                CommandHandlerFlags::new(R::Forbidden, A::Forbidden, ReadOnly)
            }
            CommandName::Set => CommandHandlerFlags::new(R::Forbidden, A::Optional, ReadOnly),
            CommandName::User(_) => CommandHandlerFlags::new(R::Forbidden, A::Optional, ReadOnly),
        }
    }

    pub fn execution(&self) -> Execution {
        match self {
            CommandName::Delete
            | CommandName::Copy
            | CommandName::Join
            | CommandName::Substitute
            | CommandName::RepeatSubstitute
            | CommandName::GotoLine
            | CommandName::Shift { .. } => Execution::ForEachCaret,
            _ => Execution::Single,
        }
    }
}

/// One parsed `[range]command[!] [argument]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub range: Range,
    pub modifier: CommandModifier,
    pub argument: String,
    pub name: CommandName,
}

impl Command {
    pub fn bang(&self) -> bool {
        self.modifier == CommandModifier::Bang
    }

    fn validate(&self, flags: &CommandHandlerFlags) -> ExResult {
        match flags.range {
            RangeFlag::Forbidden if !self.range.is_empty() => return Err(ExError::NoRangeAllowed),
            RangeFlag::Required if self.range.is_empty() => return Err(ExError::InvalidRange),
            _ => {}
        }
        match flags.argument {
            ArgumentFlag::Forbidden if !self.argument.is_empty() => {
                Err(ExError::TrailingCharacters(self.argument.clone()))
            }
            ArgumentFlag::Required if self.argument.is_empty() => Err(ExError::ArgumentRequired),
            _ => Ok(()),
        }
    }

    /// Validates, prepares the editor and dispatches.
    pub(crate) fn execute(&self, session: &mut Session, editor: &mut dyn VimEditor, depth: usize) -> ExResult {
        let flags = self.name.flags();
        self.validate(&flags)?;
        if !flags.flags.contains(CommandFlags::SAVE_VISUAL) {
            exit_visual(editor);
        }
        if flags.access == Access::Write && !editor.is_writable() {
            return Err(ExError::ReadOnly);
        }
        debug!(command = ?self.name, argument = %self.argument, bang = self.bang(), "ex command");

        match self.name.execution() {
            Execution::Single => {
                let caret = editor.primary_caret();
                commands::run(self, session, editor, caret, depth)
            }
            Execution::ForEachCaret => {
                for caret in editor.carets() {
                    commands::run(self, session, editor, caret, depth)?;
                }
                Ok(())
            }
        }
    }

    /// Resolves the range to raw 1-based lines, defaulting to the caret line.
    ///
    /// Line `0` survives only for commands flagged [`CommandFlags::ZERO_LINE`];
    /// anything past the last line or before the first is `E16`.
    pub fn line_numbers(
        &self,
        session: &mut Session,
        editor: &dyn VimEditor,
        caret: CaretId,
    ) -> ExResult<(usize, usize)> {
        let zero_ok = self.name.flags().flags.contains(CommandFlags::ZERO_LINE);
        let current = editor.caret_line(caret) as isize + 1;
        let (first, last) = self.range.resolve(session, editor, caret)?.unwrap_or((current, current));
        let count = editor.line_count() as isize;
        let check = |line: isize| -> ExResult<usize> {
            if line < 0 || line > count {
                return Err(ExError::InvalidRange);
            }
            Ok(if line == 0 && !zero_ok { 1 } else { line as usize })
        };
        let (first, last) = (check(first)?, check(last)?);
        Ok((first.min(last), first.max(last)))
    }

    /// The range as 0-based lines.
    pub fn line_range(&self, session: &mut Session, editor: &dyn VimEditor, caret: CaretId) -> ExResult<LineRange> {
        let (first, last) = self.line_numbers(session, editor, caret)?;
        Ok(LineRange::new(first.max(1) - 1, last.max(1) - 1))
    }
}

/// Leaves visual mode: remembers `'<`/`'>`, drops block carets and collapses
/// every selection to its start.
pub(crate) fn exit_visual(editor: &mut dyn VimEditor) {
    let primary = editor.primary_caret();
    if let Some((a, b)) = editor.selection(primary) {
        let (start, end) = (a.min(b), a.max(b));
        editor.set_mark('<', start);
        editor.set_mark('>', if end > start { end - 1 } else { end });
    }
    if editor.in_block_selection() {
        editor.remove_secondary_carets();
        editor.set_block_selection(false);
    }
    for caret in editor.native_carets() {
        if let Some((a, b)) = editor.selection(caret) {
            editor.move_caret(caret, a.min(b));
            editor.remove_selection(caret);
        }
    }
    if matches!(editor.mode(), Mode::Visual(_)) {
        editor.set_mode(Mode::Normal);
    }
}
