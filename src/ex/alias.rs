//! User-defined commands (`:command`).

use std::fmt;

use crate::error::{ExError, ExResult};

/// How many arguments a user command accepts (`-nargs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nargs {
    /// `-nargs=0`, the default.
    #[default]
    None,
    /// `-nargs=1`
    One,
    /// `-nargs=*`
    Any,
    /// `-nargs=?`
    Optional,
    /// `-nargs=+`
    AtLeastOne,
}

impl Nargs {
    fn parse(value: &str) -> ExResult<Self> {
        Ok(match value {
            "0" => Nargs::None,
            "1" => Nargs::One,
            "*" => Nargs::Any,
            "?" => Nargs::Optional,
            "+" => Nargs::AtLeastOne,
            _ => return Err(ExError::InvalidArgumentCount),
        })
    }

    fn symbol(self) -> char {
        match self {
            Nargs::None => '0',
            Nargs::One => '1',
            Nargs::Any => '*',
            Nargs::Optional => '?',
            Nargs::AtLeastOne => '+',
        }
    }
}

/// A user command: `name` expands to `replacement`, with `<args>` substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAlias {
    name: String,
    nargs: Nargs,
    replacement: String,
}

/// Result of parsing a `:command` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AliasDefinition {
    /// `:command` or `:command Prefix` lists.
    List(String),
    Define(CommandAlias),
}

impl CommandAlias {
    pub fn new(name: impl Into<String>, nargs: Nargs, replacement: impl Into<String>) -> Self {
        CommandAlias {
            name: name.into(),
            nargs,
            replacement: replacement.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nargs(&self) -> Nargs {
        self.nargs
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Parses `[-nargs=N] Name replacement`.
    pub(crate) fn parse(argument: &str) -> ExResult<AliasDefinition> {
        let mut rest = argument.trim_start();
        let mut nargs = Nargs::default();
        while let Some(attr) = rest.strip_prefix('-') {
            let end = attr.find(char::is_whitespace).unwrap_or(attr.len());
            let (word, tail) = attr.split_at(end);
            match word.split_once('=') {
                Some(("nargs", value)) => nargs = Nargs::parse(value)?,
                None if word == "nargs" => return Err(ExError::NoAttribute),
                _ => return Err(ExError::InvalidAttribute(format!("-{word}"))),
            }
            rest = tail.trim_start();
        }

        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (name, replacement) = rest.split_at(end);
        let replacement = replacement.trim();
        if name.is_empty() || replacement.is_empty() {
            return Ok(AliasDefinition::List(name.to_string()));
        }
        if !name.starts_with(|c: char| c.is_ascii_uppercase())
            || !name.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ExError::LowercaseUserCommand);
        }
        Ok(AliasDefinition::Define(CommandAlias::new(name, nargs, replacement)))
    }

    /// The command line this alias runs for `args`.
    pub fn expand(&self, args: &str) -> ExResult<String> {
        let args = args.trim();
        match self.nargs {
            Nargs::None if !args.is_empty() => return Err(ExError::TrailingCharacters(args.to_string())),
            Nargs::One | Nargs::AtLeastOne if args.is_empty() => return Err(ExError::ArgumentRequired),
            Nargs::One | Nargs::Optional if args.contains(char::is_whitespace) => {
                return Err(ExError::TrailingCharacters(args.to_string()));
            }
            _ => {}
        }
        Ok(self.replacement.replace("<args>", args))
    }
}

impl fmt::Display for CommandAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    {:<12}{}    {}", self.name, self.nargs.symbol(), self.replacement)
    }
}

