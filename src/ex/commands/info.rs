//! Commands that talk to the host or the session rather than the buffer:
//! `:registers`, `:set`, `:action` and the user command family.

use tracing::debug;

use crate::error::{ExError, ExResult};
use crate::ex::alias::{AliasDefinition, CommandAlias};
use crate::ex::command::Command;
use crate::session::Session;
use crate::traits::VimEditor;

const REGISTERS_HEADER: &str = "Type Name Content";
const ALIASES_HEADER: &str = "    Name        Args    Definition";
const ALL_OPTIONS: &str = "clipboard? expandtab? gdefault? ignorecase? report? shiftwidth? smartcase? wrapscan?";

pub(super) fn registers(cmd: &Command, session: &mut Session) -> ExResult {
    let filter: String = cmd.argument.chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = String::from(REGISTERS_HEADER);
    for register in session.list_registers() {
        if !filter.is_empty() && !filter.contains(register.name()) {
            continue;
        }
        let content = register.text().replace('\n', "^J");
        out.push_str(&format!(
            "\n  {}  \"{}   {}",
            register.kind().tag(),
            register.name(),
            content
        ));
    }
    session.output(&out);
    Ok(())
}

pub(super) fn set(cmd: &Command, session: &mut Session) -> ExResult {
    let argument = cmd.argument.trim();
    let argument = if argument.is_empty() { ALL_OPTIONS } else { argument };
    if let Some(text) = session.options_mut().apply(argument)? {
        session.output(&text);
    }
    Ok(())
}

pub(super) fn action(cmd: &Command, session: &mut Session) -> ExResult {
    let name = cmd.argument.trim();
    if session.host_mut().execute_action(name) {
        Ok(())
    } else {
        Err(ExError::InvalidArgument(name.to_string()))
    }
}

pub(super) fn command(cmd: &Command, session: &mut Session) -> ExResult {
    match CommandAlias::parse(&cmd.argument)? {
        AliasDefinition::List(prefix) => {
            let mut out = String::from(ALIASES_HEADER);
            for alias in session.aliases().filter(|a| a.name().starts_with(prefix.as_str())) {
                out.push('\n');
                out.push_str(&alias.to_string());
            }
            session.output(&out);
            Ok(())
        }
        AliasDefinition::Define(alias) => {
            if session.alias(alias.name()).is_some() && !cmd.bang() {
                return Err(ExError::CommandExists);
            }
            debug!(name = alias.name(), "user command defined");
            session.add_alias(alias);
            Ok(())
        }
    }
}

pub(super) fn del_command(cmd: &Command, session: &mut Session) -> ExResult {
    let name = cmd.argument.trim();
    match session.remove_alias(name) {
        Some(_) => Ok(()),
        None => Err(ExError::NoSuchUserCommand(name.to_string())),
    }
}

/// Expands a user command and runs the result one level deeper.
pub(super) fn user(
    cmd: &Command,
    name: &str,
    session: &mut Session,
    editor: &mut dyn VimEditor,
    depth: usize,
) -> ExResult {
    let alias = session
        .alias(name)
        .cloned()
        .ok_or_else(|| ExError::NotACommand(name.to_string()))?;
    if depth >= session.max_alias_depth() {
        return Err(ExError::AliasDepth);
    }
    let line = alias.expand(&cmd.argument)?;
    crate::ex::run(session, editor, &line, depth + 1)
}
