//! The subset of Vim options the engine honours, and `:set` parsing.

use crate::error::{ExError, ExResult};

/// Which clipboard register stands in for the unnamed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipboardMode {
    /// `clipboard=` - plain unnamed register.
    #[default]
    Off,
    /// `clipboard=unnamed` - unnamed register is `*`.
    Unnamed,
    /// `clipboard=unnamedplus` - unnamed register is `+`.
    UnnamedPlus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub clipboard: ClipboardMode,
    pub ignorecase: bool,
    pub smartcase: bool,
    pub wrapscan: bool,
    pub gdefault: bool,
    pub shiftwidth: usize,
    pub expandtab: bool,
    /// Changed-line threshold above which commands report a count.
    pub report: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            clipboard: ClipboardMode::Off,
            ignorecase: false,
            smartcase: false,
            wrapscan: true,
            gdefault: false,
            shiftwidth: 4,
            expandtab: true,
            report: 2,
        }
    }
}

enum Value<'a> {
    Toggle(bool),
    Invert,
    Query,
    Assign(&'a str),
}

impl Options {
    /// Applies a `:set` argument such as `ic sw=2 noexpandtab`.
    ///
    /// Returns the text `:set` would echo for `opt?` queries, if any.
    pub fn apply(&mut self, args: &str) -> ExResult<Option<String>> {
        let mut echoed = Vec::new();
        for arg in args.split_whitespace() {
            if let Some(text) = self.apply_one(arg)? {
                echoed.push(text);
            }
        }
        Ok((!echoed.is_empty()).then(|| echoed.join("\n")))
    }

    fn apply_one(&mut self, arg: &str) -> ExResult<Option<String>> {
        let (name, value) = if let Some((name, v)) = arg.split_once('=') {
            (name, Value::Assign(v))
        } else if let Some(name) = arg.strip_suffix('?') {
            (name, Value::Query)
        } else if let Some(name) = arg.strip_suffix('!') {
            (name, Value::Invert)
        } else if let Some(name) = arg.strip_prefix("inv") {
            (name, Value::Invert)
        } else if let Some(name) = arg.strip_prefix("no").filter(|n| Self::is_bool(n)) {
            (name, Value::Toggle(false))
        } else {
            (arg, Value::Toggle(true))
        };

        match Self::canonical(name) {
            Some(name @ ("ignorecase" | "smartcase" | "wrapscan" | "gdefault" | "expandtab")) => {
                let slot = self.bool_slot(name);
                match value {
                    Value::Toggle(v) => *slot = v,
                    Value::Invert => *slot = !*slot,
                    Value::Query => {
                        let prefix = if *slot { "" } else { "no" };
                        return Ok(Some(format!("  {prefix}{name}")));
                    }
                    Value::Assign(_) => return Err(ExError::InvalidArgument(arg.to_string())),
                }
            }
            Some(name @ ("shiftwidth" | "report")) => match value {
                Value::Assign(v) => {
                    let n = v
                        .parse::<usize>()
                        .map_err(|_| ExError::NumberRequired(arg.to_string()))?;
                    *self.number_slot(name) = n;
                }
                Value::Toggle(true) | Value::Query => {
                    return Ok(Some(format!("  {name}={}", *self.number_slot(name))));
                }
                _ => return Err(ExError::InvalidArgument(arg.to_string())),
            },
            Some("clipboard") => match value {
                Value::Assign(v) => {
                    self.clipboard = match v {
                        "" => ClipboardMode::Off,
                        "unnamed" => ClipboardMode::Unnamed,
                        "unnamedplus" => ClipboardMode::UnnamedPlus,
                        _ => return Err(ExError::InvalidArgument(arg.to_string())),
                    }
                }
                Value::Toggle(true) | Value::Query => {
                    let v = match self.clipboard {
                        ClipboardMode::Off => "",
                        ClipboardMode::Unnamed => "unnamed",
                        ClipboardMode::UnnamedPlus => "unnamedplus",
                    };
                    return Ok(Some(format!("  clipboard={v}")));
                }
                _ => return Err(ExError::InvalidArgument(arg.to_string())),
            },
            _ => return Err(ExError::UnknownOption(arg.to_string())),
        }
        Ok(None)
    }

    fn canonical(name: &str) -> Option<&'static str> {
        Some(match name {
            "ignorecase" | "ic" => "ignorecase",
            "smartcase" | "scs" => "smartcase",
            "wrapscan" | "ws" => "wrapscan",
            "gdefault" | "gd" => "gdefault",
            "expandtab" | "et" => "expandtab",
            "shiftwidth" | "sw" => "shiftwidth",
            "report" => "report",
            "clipboard" | "cb" => "clipboard",
            _ => return None,
        })
    }

    fn is_bool(name: &str) -> bool {
        matches!(
            Self::canonical(name),
            Some("ignorecase" | "smartcase" | "wrapscan" | "gdefault" | "expandtab")
        )
    }

    fn bool_slot(&mut self, name: &str) -> &mut bool {
        match name {
            "ignorecase" => &mut self.ignorecase,
            "smartcase" => &mut self.smartcase,
            "wrapscan" => &mut self.wrapscan,
            "gdefault" => &mut self.gdefault,
            _ => &mut self.expandtab,
        }
    }

    fn number_slot(&mut self, name: &str) -> &mut usize {
        match name {
            "shiftwidth" => &mut self.shiftwidth,
            _ => &mut self.report,
        }
    }

    /// Whether a pattern should match case-insensitively.
    pub fn ignore_case_for(&self, pattern: &str) -> bool {
        self.ignorecase && !(self.smartcase && pattern.chars().any(char::is_uppercase))
    }

    /// The indent unit used by `:>` and `:<`.
    pub fn indent_unit(&self) -> String {
        if self.expandtab {
            " ".repeat(self.shiftwidth)
        } else {
            "\t".to_string()
        }
    }
}
