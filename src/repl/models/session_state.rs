//! Session state
//!
//! Settings and bookkeeping the REPL reads and writes between commands.
//! Only the REPL task touches it; completions reach it through the
//! controller's message channel.

use super::lookup::LocationType;

/// Command replayed by `last` before anything else was entered
pub const DEFAULT_LAST_COMMAND: &str = "help";

/// Mutable state of one interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    verbose: bool,
    exact: bool,
    location_types: Vec<LocationType>,
    last_command: String,
    last_reference: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            verbose: false,
            exact: false,
            location_types: Vec::new(),
            last_command: DEFAULT_LAST_COMMAND.to_string(),
            last_reference: None,
        }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn exact(&self) -> bool {
        self.exact
    }

    pub fn set_exact(&mut self, exact: bool) {
        self.exact = exact;
    }

    /// Requested location types in the order they were configured.
    /// Empty means the server picks.
    pub fn location_types(&self) -> &[LocationType] {
        &self.location_types
    }

    pub fn clear_location_types(&mut self) {
        self.location_types.clear();
    }

    /// Add a location type; duplicates keep their first position
    pub fn add_location_type(&mut self, location_type: LocationType) {
        if !self.location_types.contains(&location_type) {
            self.location_types.push(location_type);
        }
    }

    pub fn last_command(&self) -> &str {
        &self.last_command
    }

    pub fn set_last_command(&mut self, line: impl Into<String>) {
        self.last_command = line.into();
    }

    pub fn last_reference(&self) -> Option<&str> {
        self.last_reference.as_deref()
    }

    pub fn set_last_reference(&mut self, uri: impl Into<String>) {
        self.last_reference = Some(uri.into());
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
