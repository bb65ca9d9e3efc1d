//! The ex command interpreter.
//!
//! [`execute`] is the entry point hosts call with a `:` command line. Nested
//! command lines (`:global` bodies, user commands) go through [`run`], which
//! skips the top-level error reporting.

pub mod alias;
pub mod command;
mod commands;
pub mod parser;
pub mod range;

use tracing::warn;

use crate::error::ExResult;
use crate::session::Session;
use crate::traits::VimEditor;

/// Runs one command line.
///
/// A failure is shown once in the status bar, rings the (throttled) bell
/// and is kept as the session's last error.
pub fn execute(session: &mut Session, editor: &mut dyn VimEditor, line: &str) -> ExResult {
    session.clear_error();
    let result = run(session, editor, line, 0);
    match &result {
        Ok(()) => {
            let line = line.trim_start_matches(':').trim();
            if !line.is_empty() {
                session.registers_mut().set_last_command(line);
            }
        }
        Err(err) => {
            warn!(%err, command = line, "ex command failed");
            session.report_error(err);
        }
    }
    result
}

pub(crate) fn run(session: &mut Session, editor: &mut dyn VimEditor, line: &str, depth: usize) -> ExResult {
    match parser::parse(line)? {
        Some(command) => command.execute(session, editor, depth),
        None => Ok(()),
    }
}
