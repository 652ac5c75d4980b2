//! # Views Module
//!
//! Operator-facing text: the prompt, the welcome banner, the help screen
//! and the rendering of lookup results.

pub mod result_renderer;

pub use result_renderer::{RenderContext, ResultRenderer};

use std::io::{self, Write};

/// Prompt printed whenever the REPL waits for input
pub const PROMPT: &str = "> ";

const HELP_TEXT: &str = "\
held IDENTIFIER\t\tExecute HELD request for the given identifier
types [geo civ ref]\tSet requested location types (none = server default)
exact [true|false]\tRequest exact location types
verbose [on|off]\tShow raw request/response and dereference results
deref [URI]\t\tDereference URI, or the last received location reference
last\t\t\tRepeat the last command
help\t\t\tPrint help
quit\t\t\tQuit";

/// Print the startup banner
pub fn write_welcome(out: &mut (dyn Write + Send)) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out)?;
    writeln!(out, "*********************************")?;
    writeln!(out, "HELD Commandline Client v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "*********************************")?;
    Ok(())
}

/// Print the command summary
pub fn write_help(out: &mut (dyn Write + Send)) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{HELP_TEXT}")?;
    writeln!(out)?;
    Ok(())
}
