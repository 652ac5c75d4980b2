//! Configuration for heldline
//!
//! Startup settings come from the command line and, underneath it, from an
//! optional INI profile file:
//!
//! ```ini
//! [default]
//! uri = https://held.example.com/held
//! header = Authorization:Bearer abc
//! header = X-Client:heldline
//! timeout = 30
//! ```
//!
//! Command line values win over profile values.

use crate::cmd_args::CommandLineArgs;
use anyhow::{anyhow, Context, Result};
use ini::Ini;
use std::path::Path;
use std::time::Duration;

/// Default profile file path for heldline
pub const DEFAULT_PROFILE_PATH: &str = "~/.heldline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "HELDLINE_PROFILE_PATH";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Values read from one profile section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub uri: Option<String>,
    pub headers: Vec<String>,
    pub timeout: Option<u64>,
}

/// Load profile `name` from the INI file at `path`. A missing file or
/// section yields `Ok(None)`.
pub fn load_profile(path: &str, name: &str) -> Result<Option<Profile>> {
    let expanded = shellexpand::tilde(path);
    let file = Path::new(expanded.as_ref());
    if !file.exists() {
        tracing::debug!("Profile file '{}' not found", expanded);
        return Ok(None);
    }

    let ini = Ini::load_from_file(file)
        .with_context(|| format!("failed to read profile file '{expanded}'"))?;
    let Some(section) = ini.section(Some(name)) else {
        tracing::debug!("Profile '{}' not found in '{}'", name, expanded);
        return Ok(None);
    };

    let timeout = section
        .get("timeout")
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid timeout '{value}' in profile '{name}'"))
        })
        .transpose()?;

    Ok(Some(Profile {
        uri: section.get("uri").map(|uri| uri.trim().to_string()),
        headers: section.get_all("header").map(str::to_string).collect(),
        timeout,
    }))
}

/// Split a `name:value` header at the first colon
pub fn parse_header(header: &str) -> Result<(String, String)> {
    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| anyhow!("header '{header}' is not in NAME:VALUE form"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("header '{header}' has an empty name"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Fully resolved startup settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub verbose: bool,
    pub exact: bool,
}

impl ClientSettings {
    /// Merge command line arguments over an optional profile. Headers from
    /// both sources are sent, profile headers first.
    pub fn resolve(args: &CommandLineArgs, profile: Option<Profile>) -> Result<Self> {
        let profile = profile.unwrap_or_default();

        let endpoint = args
            .uri()
            .map(str::to_string)
            .or(profile.uri)
            .ok_or_else(|| anyhow!("no HELD server URI given; use -u or set 'uri' in a profile"))?;

        let headers = profile
            .headers
            .iter()
            .chain(args.headers())
            .map(|header| parse_header(header))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            endpoint,
            headers,
            timeout: args.timeout().or(profile.timeout).map(Duration::from_secs),
            verbose: args.verbose(),
            exact: args.exact(),
        })
    }
}
