//! Splits a command line into range, name, `!` and argument.

use crate::error::{ExError, ExResult};
use crate::ex::command::{Command, CommandModifier, CommandName};
use crate::ex::range::Range;

/// `(full name, shortest accepted abbreviation)`.
const COMMANDS: &[(&str, usize)] = &[
    ("action", 2),
    ("comclear", 4),
    ("command", 3),
    ("copy", 2),
    ("delcommand", 4),
    ("delete", 1),
    ("display", 2),
    ("global", 1),
    ("goto", 2),
    ("join", 1),
    ("k", 1),
    ("mark", 2),
    ("marks", 5),
    ("move", 1),
    ("nohlsearch", 3),
    ("print", 1),
    ("put", 2),
    ("registers", 3),
    ("set", 2),
    ("sort", 3),
    ("substitute", 1),
    ("t", 1),
    ("vglobal", 1),
    ("yank", 1),
];

fn lookup(word: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .find(|(full, min)| word.len() >= *min && full.starts_with(word))
        .map(|(full, _)| *full)
}

fn name_for(full: &str) -> CommandName {
    match full {
        "action" => CommandName::Action,
        "comclear" => CommandName::ComClear,
        "command" => CommandName::Command,
        "copy" | "t" => CommandName::Copy,
        "delcommand" => CommandName::DelCommand,
        "delete" => CommandName::Delete,
        "display" | "registers" => CommandName::Registers,
        "global" => CommandName::Global { invert: false },
        "goto" => CommandName::Goto,
        "join" => CommandName::Join,
        "k" | "mark" => CommandName::Mark,
        "marks" => CommandName::Marks,
        "move" => CommandName::Move,
        "nohlsearch" => CommandName::NoHlSearch,
        "print" => CommandName::Print,
        "put" => CommandName::Put,
        "set" => CommandName::Set,
        "sort" => CommandName::Sort,
        "substitute" => CommandName::Substitute,
        "vglobal" => CommandName::Global { invert: true },
        _ => CommandName::Yank,
    }
}

/// Parses one command line (without the leading `:`s).
///
/// Returns `None` for a blank line.
pub fn parse(line: &str) -> ExResult<Option<Command>> {
    let line = line.trim_start_matches([':', ' ', '\t']);
    let (range, rest) = Range::parse(line)?;
    let rest = rest.trim_start();

    if rest.is_empty() {
        if range.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Command {
            range,
            modifier: CommandModifier::None,
            argument: String::new(),
            name: CommandName::GotoLine,
        }));
    }

    let first = rest.chars().next().unwrap_or_default();
    let (name, rest) = match first {
        '&' => (CommandName::RepeatSubstitute, &rest[1..]),
        '>' | '<' => {
            let amount = rest.chars().take_while(|c| *c == first).count();
            (
                CommandName::Shift {
                    right: first == '>',
                    amount,
                },
                &rest[amount..],
            )
        }
        c if c.is_ascii_alphabetic() => {
            // User commands may contain digits, builtins never do (`:d3`).
            let in_word = |c: char| c.is_ascii_alphabetic() || first.is_ascii_uppercase() && c.is_ascii_digit();
            let end = rest.find(|c: char| !in_word(c)).unwrap_or(rest.len());
            let word = &rest[..end];
            if first.is_ascii_uppercase() {
                (CommandName::User(word.to_string()), &rest[end..])
            } else if let Some(full) = lookup(word) {
                (name_for(full), &rest[end..])
            } else if let Some(mark) = word.strip_prefix('k').filter(|m| m.chars().count() == 1) {
                // `:ka` sets mark a.
                let rest = &rest[end - mark.len()..];
                (CommandName::Mark, rest)
            } else {
                return Err(ExError::NotACommand(rest.to_string()));
            }
        }
        _ => return Err(ExError::NotACommand(rest.to_string())),
    };

    let (modifier, rest) = match rest.strip_prefix('!') {
        Some(tail) => (CommandModifier::Bang, tail),
        None => (CommandModifier::None, rest),
    };

    let argument = rest.trim_start().to_string();
    Ok(Some(Command {
        range,
        modifier,
        argument,
        name,
    }))
}
