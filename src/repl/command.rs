//! # Command Parsing
//!
//! Splits one line of operator input into a command and its parameters.
//! Parsing never touches session state; the controller executes the result.
//!
//! ## Grammar
//!
//! ```text
//! held IDENTIFIER
//! verbose [on|off|true|false]
//! exact [on|off|true|false]
//! types [geo|civ|ref ...]
//! deref [URI]
//! last
//! help | quit
//! ```
//!
//! `last` takes no parameters; `last foo` is a usage error and is not
//! stored as the last command.

use thiserror::Error;

/// A malformed command line
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("usage: held IDENTIFIER")]
    MissingIdentifier,

    #[error("usage: last")]
    LastWithParameters,
}

/// A parsed REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit a lookup for the identifier
    Held(String),
    Verbose(bool),
    Exact(bool),
    /// Replace the requested location types; tokens are mapped on execution
    /// so unrecognized ones can be reported one by one
    Types(Vec<String>),
    /// Dereference the given URI, or the last reference when `None`
    Deref(Option<String>),
    /// Replay the stored command line
    Last,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse a line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, UsageError> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };
        let params: Vec<&str> = tokens.collect();

        let command = match name {
            "held" => {
                let identifier = params.first().ok_or(UsageError::MissingIdentifier)?;
                Self::Held(identifier.to_string())
            }
            "verbose" => Self::Verbose(flag_value(params.first().copied())),
            "exact" => Self::Exact(flag_value(params.first().copied())),
            "types" => Self::Types(params.iter().map(|t| t.to_string()).collect()),
            "deref" => Self::Deref(params.first().map(|uri| uri.to_string())),
            "last" if params.is_empty() => Self::Last,
            "last" => return Err(UsageError::LastWithParameters),
            "help" => Self::Help,
            "quit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        };
        Ok(Some(command))
    }

    /// Whether executing this command should overwrite the stored last
    /// command line
    pub fn updates_last_command(&self) -> bool {
        !matches!(self, Self::Last)
    }
}

/// A missing parameter or a truthy token switches a flag on; any other
/// token switches it off
pub fn flag_value(param: Option<&str>) -> bool {
    match param {
        None => true,
        Some(token) => token.eq_ignore_ascii_case("on") || token.eq_ignore_ascii_case("true"),
    }
}
