//! User-facing errors.
//!
//! Each variant renders the message Vim shows for the same condition,
//! including its `E###` code.

/// Errors raised while validating or executing a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExError {
    #[error("E14: Invalid address")]
    InvalidAddress,
    #[error("E16: Invalid range")]
    InvalidRange,
    #[error("E20: Mark not set")]
    MarkNotSet,
    #[error("E21: Cannot make changes, 'modifiable' is off")]
    ReadOnly,
    #[error("E35: No previous regular expression")]
    NoPreviousRegex,
    #[error("E78: Unknown mark")]
    UnknownMark,
    #[error("E134: Cannot move a range of lines into itself")]
    MoveIntoItself,
    #[error("E146: Regular expressions can't be delimited by letters")]
    BadDelimiter,
    #[error("E147: Cannot do :global recursive with a range")]
    GlobalRecursive,
    #[error("E169: Maximum alias depth reached")]
    AliasDepth,
    #[error("E174: Command already exists: add ! to replace it")]
    CommandExists,
    #[error("E175: No attribute specified")]
    NoAttribute,
    #[error("E176: Invalid number of arguments")]
    InvalidArgumentCount,
    #[error("E181: Invalid attribute: {0}")]
    InvalidAttribute(String),
    #[error("E183: User defined commands must start with an uppercase letter")]
    LowercaseUserCommand,
    #[error("E184: No such user-defined command: {0}")]
    NoSuchUserCommand(String),
    #[error("E191: Argument must be a letter or forward/backward quote")]
    BadMarkName,
    #[error("E353: Nothing in register {0}")]
    EmptyRegister(char),
    #[error("E354: Invalid register name: '{0}'")]
    InvalidRegister(char),
    #[error("E383: Invalid search string: {0}")]
    InvalidPattern(String),
    #[error("E471: Argument required")]
    ArgumentRequired,
    #[error("E474: Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("E481: No range allowed")]
    NoRangeAllowed,
    #[error("E486: Pattern not found: {0}")]
    PatternNotFound(String),
    #[error("E488: Trailing characters: {0}")]
    TrailingCharacters(String),
    #[error("E492: Not an editor command: {0}")]
    NotACommand(String),
    #[error("E518: Unknown option: {0}")]
    UnknownOption(String),
    #[error("E521: Number required after =: {0}")]
    NumberRequired(String),
    #[error("E939: Positive count required")]
    PositiveCountRequired,
    #[error("Pattern found in every line: {0}")]
    PatternInEveryLine(String),
    #[error("Interrupted")]
    Interrupted,
    /// A per-caret step failed without a message of its own; only the bell
    /// is rung.
    #[error("")]
    Failed,
}

impl ExError {
    /// The text shown in the status bar, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            ExError::Failed => None,
            other => Some(other.to_string()),
        }
    }
}

pub type ExResult<T = ()> = Result<T, ExError>;
